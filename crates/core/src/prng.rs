//! Deterministic randomness for palette generation.
//!
//! [`Xorshift64`] is the sequential stream behind the mood-driven and
//! strategy generators. [`unit_hash`] maps an integer key straight to [0, 1)
//! and backs the lock-aware generator, whose draws are keyed by
//! `seed + position * 1000 + branch` so that one locked slot never shifts the
//! draws of another. [`fnv1a`] turns the joined input colors into a seed.

use serde::{Deserialize, Serialize};

/// Xorshift64 stream with shifts (13, 7, 17).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Zero is a fixed point of xorshift.
    const ZERO_SEED_REPLACEMENT: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a stream from `seed`. A zero seed is replaced.
    pub fn new(seed: u64) -> Self {
        let state = match seed {
            0 => Self::ZERO_SEED_REPLACEMENT,
            s => s,
        };
        Self { state }
    }

    /// Advances the state and returns it.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in [0, 1), built from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        to_unit(self.next_u64())
    }

    /// `true` when the next unit draw exceeds one half.
    pub fn next_bool(&mut self) -> bool {
        self.next_f64() > 0.5
    }

    /// `1.0` or `-1.0`.
    pub fn next_sign(&mut self) -> f64 {
        if self.next_bool() {
            1.0
        } else {
            -1.0
        }
    }

    /// Centered draw in [-0.5, 0.5).
    pub fn next_jitter(&mut self) -> f64 {
        self.next_f64() - 0.5
    }

    /// Index in [0, len). `len` must be non-zero.
    pub fn next_usize(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}

fn to_unit(bits: u64) -> f64 {
    (bits >> 11) as f64 / (1u64 << 53) as f64
}

/// Stateless keyed draw in [0, 1) (SplitMix64 finalizer).
///
/// Negative keys are hashed by their two's-complement bits, so keys derived
/// from a negative seed still land in range.
pub fn unit_hash(key: i64) -> f64 {
    let mut z = (key as u64).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    to_unit(z ^ (z >> 31))
}

/// 32-bit FNV-1a.
pub fn fnv1a(s: &str) -> u32 {
    s.bytes().fold(0x811C_9DC5_u32, |h, b| {
        (h ^ u32::from(b)).wrapping_mul(0x0100_0193)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_42_first_output_is_stable() {
        // Shared palettes replay from their seed; changing this breaks them.
        assert_eq!(Xorshift64::new(42).next_u64(), 45_454_805_674);
    }

    #[test]
    fn zero_seed_is_replaced() {
        let mut zero = Xorshift64::new(0);
        let mut replaced = Xorshift64::new(Xorshift64::ZERO_SEED_REPLACEMENT);
        let first = zero.next_u64();
        assert_ne!(first, 0);
        assert_eq!(first, replaced.next_u64());
    }

    #[test]
    fn same_seed_same_hue_sequence() {
        let mut a = Xorshift64::new(2024);
        let mut b = Xorshift64::new(2024);
        let hues_a: Vec<f64> = (0..64).map(|_| a.next_f64() * 360.0).collect();
        let hues_b: Vec<f64> = (0..64).map(|_| b.next_f64() * 360.0).collect();
        assert_eq!(hues_a, hues_b);
    }

    #[test]
    fn jitter_and_sign_cover_both_sides() {
        let mut rng = Xorshift64::new(5);
        let jitters: Vec<f64> = (0..200).map(|_| rng.next_jitter()).collect();
        assert!(jitters.iter().all(|j| (-0.5..0.5).contains(j)));
        assert!(jitters.iter().any(|j| *j < 0.0));
        assert!(jitters.iter().any(|j| *j > 0.0));

        let signs: Vec<f64> = (0..100).map(|_| rng.next_sign()).collect();
        assert!(signs.contains(&1.0));
        assert!(signs.contains(&-1.0));
    }

    #[test]
    fn next_usize_reaches_every_index() {
        let mut rng = Xorshift64::new(77);
        let mut seen = [false; 6];
        for _ in 0..500 {
            seen[rng.next_usize(6)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn unit_hash_neighbouring_keys_differ() {
        let base = 1_000;
        let draws: Vec<f64> = (0..5).map(|k| unit_hash(base + k)).collect();
        for w in draws.windows(2) {
            assert_ne!(w[0], w[1]);
        }
        assert_eq!(unit_hash(base), draws[0]);
    }

    #[test]
    fn fnv1a_matches_reference_vectors() {
        assert_eq!(fnv1a(""), 0x811C_9DC5);
        assert_eq!(fnv1a("a"), 0xE40C_292C);
    }

    #[test]
    fn fnv1a_depends_on_color_order() {
        assert_ne!(fnv1a("#FF0000,#00FF00"), fnv1a("#00FF00,#FF0000"));
    }

    #[test]
    fn state_survives_json_round_trip() {
        let mut rng = Xorshift64::new(9);
        rng.next_u64();
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        assert_eq!(rng.next_u64(), restored.next_u64());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn draws_stay_in_range(seed: u64, len in 1_usize..64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..50 {
                    let f = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&f), "next_f64 = {f}");
                    prop_assert!(rng.next_usize(len) < len);
                }
            }

            #[test]
            fn unit_hash_in_range_for_any_key(key: i64) {
                let v = unit_hash(key);
                prop_assert!((0.0..1.0).contains(&v), "unit_hash({key}) = {v}");
            }
        }
    }
}
