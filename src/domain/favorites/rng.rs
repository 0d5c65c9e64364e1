/// Deterministic pseudo-random generator keyed by an opaque seed string.
///
/// The shuffle ordering is part of the API contract: a client replays the
/// seed on follow-up pages and expects the exact same ordering, so every
/// operation here is fixed-width unsigned 32-bit arithmetic with wraparound.
/// The seed is folded one UTF-16 code unit at a time so multi-byte seeds
/// hash identically to the web client that mints them.
pub struct SeededRng {
    state: u32,
}

const SEED_MIX: u32 = 2_654_435_761;
const STEP: u32 = 0x6D2B_79F5;

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        let mut h: u32 = 0xdead_beef;
        for unit in seed.encode_utf16() {
            h = (h ^ u32::from(unit)).wrapping_mul(SEED_MIX);
        }
        h ^= h >> 16;
        Self { state: h }
    }

    /// Next draw in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(STEP);
        let h = self.state;
        let mut t = (h ^ (h >> 15)).wrapping_mul(h | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Uniform index in `[0, bound)`, matching `floor(rng() * bound)`.
    pub fn next_index(&mut self, bound: usize) -> usize {
        (self.next_f64() * bound as f64).floor() as usize
    }
}
