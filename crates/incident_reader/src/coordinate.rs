use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// Largest number of decimal places [`Coordinate::rounded`] rounds to
pub const MAX_DECIMALS: u32 = f64::DIGITS;

/// A `(latitude, longitude)` pair in WGS84 degrees.
///
/// Equality and hashing use the exact bit pattern of both values, so two
/// coordinates are the same location only if they are numerically identical.
/// `-0.0` and `0.0` compare equal. No tolerance is applied; use
/// [`Coordinate::rounded`] to cluster nearby points explicitly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Rounds both components to `decimals` decimal places. Values above
    /// [`MAX_DECIMALS`] are clamped, an `f64` carries no more significant digits.
    pub fn rounded(&self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
        Coordinate {
            lat: (self.lat * factor).round() / factor,
            lon: (self.lon * factor).round() / factor,
        }
    }

    // Adding +0.0 maps -0.0 to +0.0
    fn key(&self) -> (u64, u64) {
        ((self.lat + 0.0).to_bits(), (self.lon + 0.0).to_bits())
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Coordinate::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;

    use super::*;

    #[test]
    fn exact_equality() {
        let a = Coordinate::new(-27.48, -58.83);
        let b = Coordinate::new(-27.48, -58.83);
        let c = Coordinate::new(-27.480000001, -58.83);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: FxHashSet<Coordinate> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn negative_zero_is_zero() {
        let a = Coordinate::new(0.0, -0.0);
        let b = Coordinate::new(-0.0, 0.0);

        assert_eq!(a, b);

        let set: FxHashSet<Coordinate> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn rounding() {
        let c = Coordinate::new(-27.481234, -58.839876).rounded(3);
        assert_eq!(c, Coordinate::new(-27.481, -58.84));
    }

    #[test]
    fn rounding_clamps_decimals() {
        let a = Coordinate::new(-27.48, -58.83);
        let b = Coordinate::new(-27.49, -58.84);

        for decimals in [MAX_DECIMALS + 1, 309, i32::MAX as u32 + 1, u32::MAX] {
            let rounded = a.rounded(decimals);
            assert!(rounded.is_finite());
            assert_eq!(rounded, a.rounded(MAX_DECIMALS));
            assert_ne!(rounded, b.rounded(decimals));
        }
    }

    #[test]
    fn finiteness() {
        assert!(Coordinate::new(-27.48, -58.83).is_finite());
        assert!(!Coordinate::new(f64::NAN, -58.83).is_finite());
        assert!(!Coordinate::new(-27.48, f64::INFINITY).is_finite());
    }
}
