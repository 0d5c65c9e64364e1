use rand::Rng;

use super::rng::SeededRng;

pub const MIN_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 30;
const DEFAULT_LIMIT: usize = 20;

/// One shuffled window plus the cursor bookkeeping the client echoes back.
#[derive(Debug, Clone, PartialEq)]
pub struct Window<T> {
    pub data: Vec<T>,
    /// Count of items consumed so far in the shuffled order, i.e. the
    /// offset the client should send for the next page.
    pub offset: usize,
    pub has_more: bool,
    pub total: usize,
}

/// Fisher–Yates over a copy, driven by the seeded generator. Identical
/// `(items, seed)` always produces the identical permutation, which is
/// what makes stateless paging possible.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: &str) -> Vec<T> {
    let mut shuffled = items.to_vec();
    if shuffled.len() <= 1 {
        return shuffled;
    }
    let mut rng = SeededRng::new(seed);
    for i in (1..shuffled.len()).rev() {
        let j = rng.next_index(i + 1);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Shuffle deterministically from `seed` and slice out one page.
///
/// The caller hands in the already-filtered collection; it must be in a
/// stable order across requests for page-to-page consistency.
pub fn paginate<T: Clone>(items: &[T], seed: &str, offset: usize, limit: usize) -> Window<T> {
    if items.is_empty() {
        return Window {
            data: Vec::new(),
            offset: 0,
            has_more: false,
            total: 0,
        };
    }

    let shuffled = seeded_shuffle(items, seed);
    let total = shuffled.len();
    let start = offset.min(total);
    let end = (start + limit).min(total);
    let data: Vec<T> = shuffled[start..end].to_vec();
    let next_offset = offset + data.len();

    Window {
        data,
        offset: next_offset,
        has_more: next_offset < total,
        total,
    }
}

/// Clamp the client-requested page size to the served bounds. Absent ⇒
/// the default, unparseable ⇒ the minimum.
pub fn clamp_limit(raw: Option<&str>) -> usize {
    match raw {
        None => DEFAULT_LIMIT,
        Some(value) => match value.trim().parse::<usize>() {
            Ok(n) => n.clamp(MIN_LIMIT, MAX_LIMIT),
            Err(_) => MIN_LIMIT,
        },
    }
}

/// Client offsets below zero or unparseable both normalize to zero.
pub fn parse_offset(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0)
}

/// Mint a fresh opaque seed: two 13-character base-36 fragments. Only
/// called when the request carries no seed; a supplied seed is echoed
/// verbatim and never validated.
pub fn mint_seed() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..26)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shuffle_is_a_permutation() {
        let items: Vec<u32> = (0..100).collect();
        let shuffled = seeded_shuffle(&items, "permutation");
        assert_eq!(shuffled.len(), items.len());
        let mut sorted = shuffled.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, items);
    }

    #[test]
    fn test_shuffle_is_reproducible() {
        let items: Vec<u32> = (0..50).collect();
        assert_eq!(
            seeded_shuffle(&items, "stable"),
            seeded_shuffle(&items, "stable")
        );
    }

    #[test]
    fn test_shuffle_of_tiny_collections_is_identity() {
        let empty: Vec<u32> = vec![];
        assert_eq!(seeded_shuffle(&empty, "any"), empty);
        assert_eq!(seeded_shuffle(&[7u32], "any"), vec![7]);
    }

    #[test]
    fn test_different_seeds_reorder() {
        let items: Vec<u32> = (0..64).collect();
        assert_ne!(
            seeded_shuffle(&items, "one"),
            seeded_shuffle(&items, "two")
        );
    }

    #[test]
    fn test_concatenated_windows_reproduce_the_shuffle() {
        let items: Vec<u32> = (0..37).collect();
        let seed = "paging";
        let full = seeded_shuffle(&items, seed);

        for chunk in [10usize, 13, 30] {
            let mut walked = Vec::new();
            let mut offset = 0;
            loop {
                let window = paginate(&items, seed, offset, chunk);
                walked.extend(window.data.iter().copied());
                offset = window.offset;
                if !window.has_more {
                    break;
                }
            }
            assert_eq!(walked, full, "chunk size {}", chunk);
        }
    }

    #[test]
    fn test_small_collection_fits_one_window() {
        let items = vec![1u32, 2, 3];
        let window = paginate(&items, "small", 0, 10);
        assert_eq!(window.data.len(), 3);
        assert_eq!(window.total, 3);
        assert_eq!(window.offset, 3);
        assert!(!window.has_more);
    }

    #[test]
    fn test_empty_collection_short_circuits() {
        let items: Vec<u32> = vec![];
        let window = paginate(&items, "empty", 12, 10);
        assert_eq!(window.data, Vec::<u32>::new());
        assert_eq!(window.offset, 0);
        assert_eq!(window.total, 0);
        assert!(!window.has_more);
    }

    #[test]
    fn test_offset_past_the_end_yields_empty_window() {
        let items: Vec<u32> = (0..5).collect();
        let window = paginate(&items, "past", 99, 10);
        assert!(window.data.is_empty());
        assert_eq!(window.offset, 99);
        assert!(!window.has_more);
        assert_eq!(window.total, 5);
    }

    #[test]
    fn test_limit_clamping() {
        assert_eq!(clamp_limit(None), 20);
        assert_eq!(clamp_limit(Some("15")), 15);
        assert_eq!(clamp_limit(Some("5")), MIN_LIMIT);
        assert_eq!(clamp_limit(Some("500")), MAX_LIMIT);
        assert_eq!(clamp_limit(Some("not-a-number")), MIN_LIMIT);
        assert_eq!(clamp_limit(Some("-3")), MIN_LIMIT);
    }

    #[test]
    fn test_offset_parsing() {
        assert_eq!(parse_offset(None), 0);
        assert_eq!(parse_offset(Some("42")), 42);
        assert_eq!(parse_offset(Some("junk")), 0);
        assert_eq!(parse_offset(Some("-1")), 0);
    }

    #[test]
    fn test_minted_seeds_are_base36_and_distinct() {
        let a = mint_seed();
        let b = mint_seed();
        assert_eq!(a.len(), 26);
        assert!(a.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(a, b);
    }
}
