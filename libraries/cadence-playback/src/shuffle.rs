//! Shuffle order generation
//!
//! The queue never reorders its items to shuffle; it keeps a permutation of
//! natural indices next to them. These helpers build and extend that
//! permutation.

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

/// Uniformly random permutation of `0..len`
///
/// `pinned`, if it is a valid index, is forced into slot 0 and the remaining
/// indices are shuffled behind it.
pub fn shuffled_order(len: usize, pinned: Option<usize>) -> Vec<usize> {
    shuffled_order_with(&mut thread_rng(), len, pinned)
}

/// Same as [`shuffled_order`] with a caller-supplied RNG
pub fn shuffled_order_with<R: Rng + ?Sized>(
    rng: &mut R,
    len: usize,
    pinned: Option<usize>,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();

    match pinned.filter(|&index| index < len) {
        Some(index) => {
            order.swap(0, index);
            order[1..].shuffle(rng);
        }
        None => order.shuffle(rng),
    }

    order
}

/// Random slot for a newly appended index in a shuffle order of `len` slots
///
/// With `keep_head` the slot is never 0, so whatever plays first keeps its
/// place. Returns `len` (append) when no other slot is available.
pub fn insertion_slot<R: Rng + ?Sized>(rng: &mut R, len: usize, keep_head: bool) -> usize {
    let low = usize::from(keep_head && len > 0);
    if low >= len {
        return len;
    }
    rng.gen_range(low..=len)
}
