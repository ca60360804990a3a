use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::error::QuizError;
use crate::utils::pick_index;

/// Remembers which positions of the daily set were already served today
#[derive(Debug, Default, Clone)]
pub struct DrawTracker {
    used: HashSet<usize>,
}

impl DrawTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn used(&self) -> &HashSet<usize> {
        &self.used
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }

    fn available(&self, set_len: usize) -> Vec<usize> {
        (0..set_len).filter(|i| !self.used.contains(i)).collect()
    }

    /// Draw an unused index in `0..set_len`. Once every index has been
    /// served the cycle restarts from the full set.
    pub fn draw<R: Rng + ?Sized>(&mut self, set_len: usize, rng: &mut R) -> Result<usize, QuizError> {
        if set_len == 0 {
            return Err(QuizError::SelectionFailure("daily set is empty".to_string()));
        }

        // Indices from a previous, larger set are meaningless now
        self.used.retain(|&i| i < set_len);

        let mut available = self.available(set_len);
        if available.is_empty() {
            debug!("All {} figures served, starting a new cycle", set_len);
            self.used.clear();
            available = (0..set_len).collect();
        }

        let index = pick_index(&available, rng)
            .filter(|&i| i < set_len)
            .ok_or_else(|| QuizError::SelectionFailure("no index available".to_string()))?;

        self.used.insert(index);
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_no_repeat_until_exhausted() {
        let mut tracker = DrawTracker::new();
        let mut rng = StdRng::seed_from_u64(17);

        let mut seen = HashSet::new();
        for _ in 0..6 {
            let index = tracker.draw(6, &mut rng).unwrap();
            assert!(index < 6);
            assert!(seen.insert(index), "index {} drawn twice", index);
        }
        assert_eq!(tracker.used().len(), 6);
    }

    #[test]
    fn test_cycle_restarts_after_exhaustion() {
        let mut tracker = DrawTracker::new();
        let mut rng = StdRng::seed_from_u64(23);

        for _ in 0..3 {
            tracker.draw(3, &mut rng).unwrap();
        }
        let fourth = tracker.draw(3, &mut rng).unwrap();
        assert!(fourth < 3);
        assert_eq!(tracker.used().len(), 1);
        assert!(tracker.used().contains(&fourth));

        // The second cycle is again a permutation
        let mut second: HashSet<usize> = [fourth].into_iter().collect();
        for _ in 0..2 {
            assert!(second.insert(tracker.draw(3, &mut rng).unwrap()));
        }
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn test_empty_set_is_selection_failure() {
        let mut tracker = DrawTracker::new();
        let mut rng = StdRng::seed_from_u64(1);

        let err = tracker.draw(0, &mut rng).unwrap_err();
        assert!(matches!(err, QuizError::SelectionFailure(_)));
        assert!(tracker.used().is_empty());
    }

    #[test]
    fn test_stale_indices_are_dropped() {
        let mut tracker = DrawTracker::new();
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..5 {
            tracker.draw(5, &mut rng).unwrap();
        }
        let index = tracker.draw(2, &mut rng).unwrap();
        assert!(index < 2);
        assert!(tracker.used().iter().all(|&i| i < 2));
    }

    #[test]
    fn test_reset() {
        let mut tracker = DrawTracker::new();
        let mut rng = StdRng::seed_from_u64(8);

        tracker.draw(4, &mut rng).unwrap();
        tracker.reset();
        assert!(tracker.used().is_empty());
    }
}
