use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ShapeKind;

/// Draws shapes uniformly at random from a stage's allowed set.
///
/// Each draw is independent; there is no bag. Duplicates in the allowed list
/// are ignored, and an empty list means every shape is allowed.
///
/// # Example
///
/// ```
/// use blockfall_engine::{ShapeGenerator, ShapeKind};
///
/// let mut generator = ShapeGenerator::new(&[ShapeKind::O, ShapeKind::I]);
/// let kind = generator.pop_next();
/// assert!(matches!(kind, ShapeKind::O | ShapeKind::I));
/// ```
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    rng: Pcg32,
    allowed: ArrayVec<ShapeKind, { ShapeKind::LEN }>,
}

/// Seed for deterministic shape generation.
///
/// A 128-bit value, serialized as a 32-character hex string so a recorded run
/// can be replayed with the same shape sequence.
///
/// ```
/// use blockfall_engine::ShapeSeed;
///
/// let seed: ShapeSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdef0123456789abcdef");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeSeed([u8; 16]);

impl ShapeSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

/// Error returned when parsing a [`ShapeSeed`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex: {reason}")]
pub struct ParseSeedError {
    #[error(not(source))]
    reason: String,
}

impl fmt::Display for ShapeSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num = u128::from_be_bytes(self.0);
        write!(f, "{num:032x}")
    }
}

impl FromStr for ShapeSeed {
    type Err = ParseSeedError;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(ParseSeedError {
                reason: format!("expected 32 characters, got {}", hex_str.len()),
            });
        }
        let num = u128::from_str_radix(hex_str, 16).map_err(|e| ParseSeedError {
            reason: format!("{hex_str} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for ShapeSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShapeSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `ShapeSeed` values with `rng.random()`.
impl Distribution<ShapeSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ShapeSeed(seed)
    }
}

impl ShapeGenerator {
    /// Creates a generator with a fresh random seed.
    #[must_use]
    pub fn new(allowed: &[ShapeKind]) -> Self {
        Self::with_seed(rand::rng().random(), allowed)
    }

    /// Like [`Self::new`], but with a specific seed for deterministic generation.
    #[must_use]
    pub fn with_seed(seed: ShapeSeed, allowed: &[ShapeKind]) -> Self {
        let mut set = ArrayVec::new();
        for &kind in allowed {
            if !set.contains(&kind) {
                set.push(kind);
            }
        }
        if set.is_empty() {
            set.extend(ShapeKind::ALL);
        }
        Self {
            rng: Pcg32::from_seed(seed.0),
            allowed: set,
        }
    }

    /// The shapes this generator draws from.
    #[must_use]
    pub fn allowed(&self) -> &[ShapeKind] {
        &self.allowed
    }

    /// Draws the next shape.
    pub fn pop_next(&mut self) -> ShapeKind {
        let index = self.rng.random_range(0..self.allowed.len());
        self.allowed[index]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const FIXED_SEED: ShapeSeed = ShapeSeed([
        0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77,
        0x88,
    ]);

    #[test]
    fn test_draws_only_allowed_shapes() {
        let allowed = [ShapeKind::O, ShapeKind::I, ShapeKind::T];
        let mut generator = ShapeGenerator::with_seed(FIXED_SEED, &allowed);
        let drawn: HashSet<_> = (0..200).map(|_| generator.pop_next()).collect();
        assert_eq!(drawn, allowed.into_iter().collect());
    }

    #[test]
    fn test_single_shape_stage() {
        let mut generator = ShapeGenerator::new(&[ShapeKind::O]);
        for _ in 0..20 {
            assert_eq!(generator.pop_next(), ShapeKind::O);
        }
    }

    #[test]
    fn test_empty_or_duplicate_allowed_list() {
        let generator = ShapeGenerator::with_seed(FIXED_SEED, &[]);
        assert_eq!(generator.allowed(), &ShapeKind::ALL);

        let generator =
            ShapeGenerator::with_seed(FIXED_SEED, &[ShapeKind::L, ShapeKind::L, ShapeKind::S]);
        assert_eq!(generator.allowed(), &[ShapeKind::L, ShapeKind::S]);
    }

    #[test]
    fn test_deterministic_shape_generation() {
        let mut generator1 = ShapeGenerator::with_seed(FIXED_SEED, &ShapeKind::ALL);
        let mut generator2 = ShapeGenerator::with_seed(FIXED_SEED, &ShapeKind::ALL);
        for _ in 0..20 {
            assert_eq!(generator1.pop_next(), generator2.pop_next());
        }
    }

    mod shape_seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: ShapeSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: ShapeSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            let serialized = serde_json::to_string(&FIXED_SEED).unwrap();
            // Big-endian: bytes appear in order as hex pairs
            assert_eq!(serialized, "\"123456789abcdef01122334455667788\"");
        }

        #[test]
        fn test_known_value_all_zeros() {
            let seed = ShapeSeed::from_bytes([0; 16]);
            assert_eq!(seed.to_string(), "0".repeat(32));
        }

        #[test]
        fn test_parse_uppercase_hex() {
            let seed: ShapeSeed = "123456789ABCDEF01122334455667788".parse().unwrap();
            assert_eq!(seed, FIXED_SEED);
        }

        #[test]
        fn test_error_invalid_hex_characters() {
            let json = "\"ghijklmnopqrstuvwxyzghijklmnopqr\"";
            let err = serde_json::from_str::<ShapeSeed>(json).unwrap_err();
            assert!(err.to_string().contains("invalid hex"));
        }

        #[test]
        fn test_error_wrong_length() {
            for hex in ["", "0123456789abcdef0123456789abcde", "0123456789abcdef0123456789abcdef0"] {
                let err = hex.parse::<ShapeSeed>().unwrap_err();
                assert!(err.to_string().contains("invalid hex"), "{hex:?}");
            }
        }

        #[test]
        fn test_serialize_deserialize_preserves_generation() {
            let seed: ShapeSeed = rand::rng().random();
            let restored: ShapeSeed =
                serde_json::from_str(&serde_json::to_string(&seed).unwrap()).unwrap();

            let mut generator1 = ShapeGenerator::with_seed(seed, &ShapeKind::ALL);
            let mut generator2 = ShapeGenerator::with_seed(restored, &ShapeKind::ALL);
            for _ in 0..20 {
                assert_eq!(generator1.pop_next(), generator2.pop_next());
            }
        }
    }
}
