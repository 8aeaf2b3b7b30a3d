//! Star rating display
//!
//! Converts a friendliness score into a fixed row of five stars plus the
//! unrounded score as a label.

use crate::error::{BreedViewError, Result};
use std::fmt;

/// Number of star positions in every rating row
pub const STAR_COUNT: usize = 5;

pub const FILLED_STAR: char = '\u{2605}';
pub const EMPTY_STAR: char = '\u{2606}';

/// A validated rating ready for display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating {
    value: f64,
    filled: usize,
}

impl Rating {
    /// Validate `value` and compute the filled star count.
    ///
    /// NaN, infinities and negative scores are rejected: they mean the
    /// upstream data is broken, not that the score is low.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(BreedViewError::InvalidRating(value));
        }
        let filled = (value.floor() as usize).min(STAR_COUNT);
        Ok(Self { value, filled })
    }

    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Empty positions, clamped at zero for scores above five
    pub fn empty(&self) -> usize {
        STAR_COUNT.saturating_sub(self.value.floor() as usize)
    }

    /// The star row alone, e.g. `★★★☆☆`
    pub fn stars(&self) -> String {
        let mut out = String::with_capacity(STAR_COUNT * 3);
        out.extend(std::iter::repeat(FILLED_STAR).take(self.filled));
        out.extend(std::iter::repeat(EMPTY_STAR).take(self.empty()));
        out
    }

    /// The raw score as shown next to the stars
    pub fn label(&self) -> String {
        self.value.to_string()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.stars(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_five_positions_in_range() {
        for tenth in 0..=50 {
            let value = tenth as f64 / 10.0;
            let rating = Rating::new(value).unwrap();
            assert_eq!(rating.filled() + rating.empty(), STAR_COUNT, "value {value}");
            assert_eq!(rating.filled(), value.floor() as usize);
            assert_eq!(rating.stars().chars().count(), STAR_COUNT);
        }
    }

    #[test]
    fn scores_above_five_clamp_empty_stars() {
        let rating = Rating::new(7.0).unwrap();
        assert_eq!(rating.empty(), 0);
        assert_eq!(rating.filled(), STAR_COUNT);
        assert_eq!(rating.stars(), "★★★★★");
    }

    #[test]
    fn label_keeps_unrounded_value() {
        let rating = Rating::new(3.7).unwrap();
        assert_eq!(rating.stars(), "★★★☆☆");
        assert_eq!(rating.label(), "3.7");
        assert_eq!(Rating::new(4.0).unwrap().label(), "4");
        assert_eq!(rating.to_string(), "★★★☆☆ 3.7");
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(matches!(Rating::new(f64::NAN), Err(BreedViewError::InvalidRating(_))));
        assert!(Rating::new(f64::INFINITY).is_err());
        assert!(Rating::new(-1.0).is_err());
    }
}
