//! Scripted key presses for unattended runs.
//!
//! A press is written `KEY:FROM-TO`, with both bounds in game milliseconds
//! and `TO` exclusive, e.g. `a:1000-2500`.

use std::collections::BTreeSet;
use std::str::FromStr;

use thiserror::Error;

use crate::model::input::Keyboard;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("expected KEY:FROM-TO, got {0:?}")]
    Malformed(String),
    #[error("key must be a single character, got {0:?}")]
    BadKey(String),
    #[error("invalid time {0:?}")]
    BadTime(String),
    #[error("press ends at {to} before it starts at {from}")]
    Backwards { from: u64, to: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: char,
    pub from_ms: u64,
    pub to_ms: u64,
}

impl KeyPress {
    pub fn covers(&self, now_ms: u64) -> bool {
        (self.from_ms..self.to_ms).contains(&now_ms)
    }
}

impl FromStr for KeyPress {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, window) = s
            .split_once(':')
            .ok_or_else(|| ScriptError::Malformed(s.to_string()))?;
        let (from, to) = window
            .split_once('-')
            .ok_or_else(|| ScriptError::Malformed(s.to_string()))?;

        let mut chars = key.trim().chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_lowercase(),
            _ => return Err(ScriptError::BadKey(key.to_string())),
        };
        let parse = |t: &str| {
            t.trim()
                .parse::<u64>()
                .map_err(|_| ScriptError::BadTime(t.to_string()))
        };
        let (from_ms, to_ms) = (parse(from)?, parse(to)?);
        if to_ms < from_ms {
            return Err(ScriptError::Backwards {
                from: from_ms,
                to: to_ms,
            });
        }
        Ok(Self { key, from_ms, to_ms })
    }
}

/// Drives a [`Keyboard`] from a list of presses.
#[derive(Debug, Clone, Default)]
pub struct KeyScript {
    presses: Vec<KeyPress>,
}

impl KeyScript {
    pub fn new(presses: Vec<KeyPress>) -> Self {
        Self { presses }
    }

    /// Holds every scripted key whose window covers `now_ms`; releases the rest.
    pub fn apply(&self, keyboard: &Keyboard, now_ms: u64) {
        let keys: BTreeSet<char> = self.presses.iter().map(|p| p.key).collect();
        for key in keys {
            let held = self
                .presses
                .iter()
                .any(|p| p.key == key && p.covers(now_ms));
            if held && !keyboard.is_pressed(key) {
                tracing::debug!(%key, now_ms, "Scripted key down");
                keyboard.press(key);
            } else if !held && keyboard.is_pressed(key) {
                tracing::debug!(%key, now_ms, "Scripted key up");
                keyboard.release(key);
            }
        }
    }
}
