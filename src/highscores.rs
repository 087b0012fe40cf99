//! The single persisted high score
//!
//! Stored as a decimal integer under one key. Reads and writes are best
//! effort: a broken or corrupt store never takes the game down, it just
//! means the best score starts from zero.

use crate::persistence::{KeyValueStore, StorageError};

/// Storage key for the high score
pub const HIGH_SCORE_KEY: &str = "not_the_player_high_score";

fn read_high_score<S: KeyValueStore + ?Sized>(store: &S) -> Result<u32, StorageError> {
    let Some(raw) = store.get(HIGH_SCORE_KEY)? else {
        return Ok(0);
    };
    raw.trim().parse().map_err(|_| StorageError::Corrupt {
        key: HIGH_SCORE_KEY.to_string(),
        value: raw,
    })
}

/// Best score on record, or 0 if there is none or it can't be read
pub fn load_high_score<S: KeyValueStore + ?Sized>(store: &S) -> u32 {
    match read_high_score(store) {
        Ok(score) => {
            log::info!("Loaded high score {}", score);
            score
        }
        Err(e) => {
            log::warn!("Could not load high score: {}", e);
            0
        }
    }
}

/// Merge a finished run's score into the stored high score.
///
/// The stored value only ever goes up. Returns the merged best, which is
/// what the death screen should show even if the write failed. If the
/// stored value can't be read at all nothing is written and `score` is
/// returned as is.
pub fn persist_high_score<S: KeyValueStore + ?Sized>(store: &mut S, score: u32) -> u32 {
    let stored = match read_high_score(store) {
        Ok(stored) => stored,
        // Readable garbage: safe to replace
        Err(e @ StorageError::Corrupt { .. }) => {
            log::warn!("Replacing unreadable high score: {}", e);
            0
        }
        // The real record may be higher; don't risk overwriting it
        Err(e) => {
            log::warn!("Could not read high score, not saving {}: {}", score, e);
            return score;
        }
    };

    if score <= stored {
        return stored;
    }

    match store.set(HIGH_SCORE_KEY, &score.to_string()) {
        Ok(()) => log::info!("New high score {} (was {})", score, stored),
        Err(e) => log::warn!("Could not save high score {}: {}", score, e),
    }
    score
}
