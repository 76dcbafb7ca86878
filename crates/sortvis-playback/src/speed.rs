//! Playback speed selection.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Per-event delays offered by the speed selector, in milliseconds.
///
/// 67 ms appears twice (indices 2 and 4). The table is kept as published so
/// that stored speed indices keep their meaning; see
/// [`Speed::has_duplicate_delays`].
pub const SPEED_OPTIONS_MS: [u64; 10] = [33, 50, 67, 100, 67, 133, 150, 175, 200, 400];

/// Index of the 100 ms entry, the delay used before any selection is made.
pub const DEFAULT_SPEED_INDEX: usize = 3;

/// A position in [`SPEED_OPTIONS_MS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Speed(usize);

impl Speed {
    /// Select a speed by its index in the option table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `index` is past the end of the table.
    pub fn from_index(index: usize) -> Result<Self> {
        if index < SPEED_OPTIONS_MS.len() {
            Ok(Self(index))
        } else {
            Err(Error::InvalidInput(format!(
                "speed index {index} out of range 0..{}",
                SPEED_OPTIONS_MS.len()
            )))
        }
    }

    /// Position in the option table.
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Delay in milliseconds.
    #[inline]
    pub const fn millis(&self) -> u64 {
        SPEED_OPTIONS_MS[self.0]
    }

    /// Delay between successive events.
    #[inline]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.millis())
    }

    /// Every selectable speed, in table order.
    pub fn options() -> impl Iterator<Item = Speed> {
        (0..SPEED_OPTIONS_MS.len()).map(Speed)
    }

    /// Whether two table entries share a delay.
    pub fn has_duplicate_delays() -> bool {
        SPEED_OPTIONS_MS
            .iter()
            .enumerate()
            .any(|(i, ms)| SPEED_OPTIONS_MS[i + 1..].contains(ms))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(DEFAULT_SPEED_INDEX)
    }
}

impl TryFrom<usize> for Speed {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Self::from_index(index)
    }
}

impl From<Speed> for usize {
    fn from(speed: Speed) -> Self {
        speed.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup() {
        assert_eq!(Speed::from_index(0).unwrap().millis(), 33);
        assert_eq!(Speed::from_index(9).unwrap().delay(), Duration::from_millis(400));
        assert!(matches!(Speed::from_index(10), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn default_is_100ms() {
        assert_eq!(Speed::default().millis(), 100);
    }

    #[test]
    fn duplicate_entry_is_preserved() {
        assert!(Speed::has_duplicate_delays());
        assert_eq!(Speed::from_index(2).unwrap().millis(), 67);
        assert_eq!(Speed::from_index(4).unwrap().millis(), 67);
        assert_eq!(Speed::options().count(), 10);
    }

    #[test]
    fn serializes_as_index() {
        let speed = Speed::from_index(5).unwrap();
        assert_eq!(serde_json::to_string(&speed).unwrap(), "5");

        let parsed: Speed = serde_json::from_str("8").unwrap();
        assert_eq!(parsed.millis(), 200);
        assert!(serde_json::from_str::<Speed>("12").is_err());
    }
}
