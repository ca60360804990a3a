use chrono::{Local, NaiveDate};
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Current calendar day in the server's local timezone
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Pick `count` distinct items uniformly at random, without replacement.
/// Uses a partial Fisher-Yates over indices, so the input is left untouched.
pub fn sample_distinct<T: Clone, R: Rng + ?Sized>(items: &[T], count: usize, rng: &mut R) -> Vec<T> {
    let amount = count.min(items.len());
    index::sample(rng, items.len(), amount)
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}

/// Pick one value uniformly from a list of candidate indices
pub fn pick_index<R: Rng + ?Sized>(candidates: &[usize], rng: &mut R) -> Option<usize> {
    candidates.choose(rng).copied()
}
