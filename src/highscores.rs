//! Best score
//!
//! A single integer, stored as plain text.

use crate::error::Error;
use crate::persistence::Storage;

/// The best total score seen on this device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "asteroid_rush_highscore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Record a finished run's score. Returns true if it is a new record.
    pub fn submit(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    fn read(store: &impl Storage) -> crate::Result<Option<u64>> {
        let Some(raw) = store.get_item(Self::STORAGE_KEY)? else {
            return Ok(None);
        };
        raw.trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| Error::InvalidValue {
                key: Self::STORAGE_KEY.to_string(),
                value: raw,
            })
    }

    /// Load the high score; missing or unreadable data counts as 0
    pub fn load(store: &impl Storage) -> Self {
        match Self::read(store) {
            Ok(Some(best)) => {
                log::info!("Loaded high score {best}");
                Self { best }
            }
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load high score ({e}), starting fresh");
                Self::default()
            }
        }
    }

    /// Save the high score; failures are logged and otherwise ignored
    pub fn save(&self, store: &mut impl Storage) {
        match store.set_item(Self::STORAGE_KEY, &self.best.to_string()) {
            Ok(()) => log::info!("High score saved ({})", self.best),
            Err(e) => log::warn!("Could not save high score: {e}"),
        }
    }
}
