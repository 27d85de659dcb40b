//! Validated overwrite pass count.

use crate::Result;
use crate::ShredError;
use std::fmt;

/// Number of overwrite passes applied to every file of a batch.
///
/// A `PassCount` is always at least 1; there is no way to construct a zero
/// count. The presets are suggestions for user interfaces only: any
/// positive value is accepted and never clamped.
///
/// # Examples
///
/// ```
/// use wipeout_core::PassCount;
///
/// let passes = PassCount::new(12)?;
/// assert_eq!(passes.get(), 12);
///
/// assert!(PassCount::new(0).is_err());
/// assert_eq!(PassCount::default(), PassCount::STANDARD);
/// # Ok::<(), wipeout_core::ShredError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PassCount(usize);

impl PassCount {
    /// Quick preset: 3 passes.
    pub const QUICK: Self = Self(3);

    /// Standard preset: 7 passes.
    pub const STANDARD: Self = Self(7);

    /// Paranoid preset: 35 passes.
    pub const PARANOID: Self = Self(35);

    /// Creates a pass count, rejecting zero.
    pub const fn new(passes: usize) -> Result<Self> {
        if passes == 0 {
            return Err(ShredError::InvalidPassCount);
        }
        Ok(Self(passes))
    }

    /// Returns the number of passes.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns `true` if this count is above the paranoid preset.
    #[must_use]
    pub const fn exceeds_presets(self) -> bool {
        self.0 > Self::PARANOID.0
    }
}

impl Default for PassCount {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TryFrom<usize> for PassCount {
    type Error = ShredError;

    fn try_from(value: usize) -> Result<Self> {
        Self::new(value)
    }
}

impl fmt::Display for PassCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(
            PassCount::new(0),
            Err(ShredError::InvalidPassCount)
        ));
        assert!(PassCount::try_from(0).is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(PassCount::QUICK.get(), 3);
        assert_eq!(PassCount::STANDARD.get(), 7);
        assert_eq!(PassCount::PARANOID.get(), 35);
    }

    #[test]
    fn test_large_counts_not_clamped() {
        let passes = PassCount::new(100).unwrap();
        assert_eq!(passes.get(), 100);
        assert!(passes.exceeds_presets());
        assert!(!PassCount::PARANOID.exceeds_presets());
    }

    #[test]
    fn test_display() {
        assert_eq!(PassCount::new(1).unwrap().to_string(), "1");
    }
}
