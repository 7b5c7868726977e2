//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::forest::artifact::DEFAULT_MODEL_PATH;

/// Which engine answers `/predict-risk`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerMode {
    /// Forest ensemble, heuristic if the model cannot be loaded
    Ensemble,
    /// Formula only; no model load is attempted
    Heuristic,
}

impl ScorerMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ensemble" | "forest" => Some(Self::Ensemble),
            "heuristic" | "formula" => Some(Self::Heuristic),
            _ => None,
        }
    }

    /// Resolve a `SCORER` value, warning when it is set but unrecognised.
    fn resolve(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return Self::Ensemble;
        };
        Self::parse(raw).unwrap_or_else(|| {
            tracing::warn!("Unrecognised SCORER value {:?}, using ensemble", raw);
            Self::Ensemble
        })
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Serialized forest, read once at startup
    pub model_path: PathBuf,

    pub scorer: ScorerMode,

    /// Message broker URL, echoed by `/health` and otherwise unused
    pub redis_url: Option<String>,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            scorer: ScorerMode::Ensemble,
            redis_url: None,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            scorer: ScorerMode::resolve(env::var("SCORER").ok().as_deref()),

            redis_url: env::var("REDIS_URL").ok(),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// `LOG_FORMAT=json`; read before the rest so logging is up first
    pub fn json_logs_from_env() -> bool {
        env::var("LOG_FORMAT")
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scorer_mode_parse() {
        assert_eq!(ScorerMode::parse("ensemble"), Some(ScorerMode::Ensemble));
        assert_eq!(ScorerMode::parse(" Heuristic "), Some(ScorerMode::Heuristic));
        assert_eq!(ScorerMode::parse("xgboost"), None);
    }

    #[test]
    fn test_scorer_mode_resolve() {
        assert_eq!(ScorerMode::resolve(None), ScorerMode::Ensemble);
        assert_eq!(ScorerMode::resolve(Some("heuristic")), ScorerMode::Heuristic);
        // Unknown values warn and keep the ensemble
        assert_eq!(ScorerMode::resolve(Some("xgboost")), ScorerMode::Ensemble);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.model_path, PathBuf::from("models/flood_rf_model.json"));
        assert_eq!(config.scorer, ScorerMode::Ensemble);
        assert!(config.redis_url.is_none());
        assert!(!config.is_production());
    }
}
