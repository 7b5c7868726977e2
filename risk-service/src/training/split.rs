//! Train/test split

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle and split off `test_fraction` of the records for evaluation.
///
/// The test set gets `ceil(len * test_fraction)` records.
pub fn train_test_split<T, R: Rng + ?Sized>(
    mut records: Vec<T>,
    test_fraction: f64,
    rng: &mut R,
) -> (Vec<T>, Vec<T>) {
    let fraction = test_fraction.clamp(0.0, 1.0);
    let test_len = ((records.len() as f64) * fraction).ceil() as usize;

    records.shuffle(rng);
    let test = records.split_off(records.len() - test_len);
    (records, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_split_sizes() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (train, test) = train_test_split((0..15000).collect::<Vec<_>>(), 0.2, &mut rng);
        assert_eq!(train.len(), 12000);
        assert_eq!(test.len(), 3000);

        let (train, test) = train_test_split((0..11).collect::<Vec<_>>(), 0.2, &mut rng);
        assert_eq!((train.len(), test.len()), (8, 3));
    }

    #[test]
    fn test_split_is_partition() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (train, test) = train_test_split((0..100).collect::<Vec<_>>(), 0.2, &mut rng);
        let mut all: Vec<i32> = train.into_iter().chain(test).collect();
        all.sort();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }
}
