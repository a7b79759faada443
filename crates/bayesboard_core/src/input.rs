//! Boundary nodes driven from outside the network.
//!
//! Inputs take part in a tick like any other node but never consult a
//! probability table: the heat input counts down against a [`Clock`], key
//! inputs mirror a [`KeySource`] capability handed in at construction.

use crate::error::{EngineError, Result};
use crate::random::RandomSource;
use bayesboard_data::{Activation, NodeKindTag};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Millisecond time source for the heat input.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Monotonic wall clock, counted from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock advanced explicitly by the driver; clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    now: Arc<AtomicU64>,
}

impl SimulatedClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for SimulatedClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Countdown input whose activation odds decay linearly to zero.
///
/// Once the deadline passes the input is in heat death and stays at
/// probability 0 for good, whatever the clock does afterwards.
pub struct HeatAdapter {
    clock: Arc<dyn Clock>,
    duration_ms: u64,
    deadline_ms: u64,
    heat_death: bool,
}

impl fmt::Debug for HeatAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeatAdapter")
            .field("duration_ms", &self.duration_ms)
            .field("deadline_ms", &self.deadline_ms)
            .field("heat_death", &self.heat_death)
            .finish()
    }
}

impl HeatAdapter {
    pub fn new(clock: Arc<dyn Clock>, duration_ms: u64) -> Self {
        let deadline_ms = clock.now_ms().saturating_add(duration_ms);
        Self {
            clock,
            duration_ms,
            deadline_ms,
            heat_death: false,
        }
    }

    /// Remaining fraction of the game; latches heat death on expiry.
    pub fn probability(&mut self) -> f64 {
        if self.heat_death {
            return 0.0;
        }
        let remaining = self.deadline_ms.saturating_sub(self.clock.now_ms());
        if remaining == 0 {
            tracing::info!(deadline_ms = self.deadline_ms, "Heat death");
            self.heat_death = true;
        }
        if self.duration_ms == 0 {
            return 0.0;
        }
        remaining as f64 / self.duration_ms as f64
    }

    #[must_use]
    pub fn is_heat_death(&self) -> bool {
        self.heat_death
    }

    pub fn recalculate<R: RandomSource>(&mut self, rng: &mut R) -> bool {
        let prob = self.probability();
        rng.bool_with_prob(prob)
    }
}

/// External key-state capability injected into a [`KeyAdapter`].
pub trait KeySource: Send {
    /// Most recently observed state of the key.
    fn current_state(&self) -> bool;
    fn subscribe(&mut self) -> Result<()>;
    fn unsubscribe(&mut self);
}

#[derive(Debug, Default, Clone, Copy)]
struct KeyEntry {
    pressed: bool,
    subscribers: usize,
}

/// In-process key table fed by whatever drives the game.
///
/// Clones share state, so the driver keeps one handle to press and release
/// keys while the network holds per-key sources.
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    keys: Arc<Mutex<HashMap<char, KeyEntry>>>,
}

impl Keyboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, key: char) {
        self.with_entry(key, |entry| entry.pressed = true);
    }

    pub fn release(&self, key: char) {
        self.with_entry(key, |entry| entry.pressed = false);
    }

    #[must_use]
    pub fn is_pressed(&self, key: char) -> bool {
        self.read_entry(key).pressed
    }

    #[must_use]
    pub fn subscriber_count(&self, key: char) -> usize {
        self.read_entry(key).subscribers
    }

    /// Source for a single key, not yet subscribed.
    #[must_use]
    pub fn source(&self, key: char) -> KeyHandle {
        KeyHandle {
            keyboard: self.clone(),
            key: key.to_ascii_lowercase(),
            subscribed: false,
        }
    }

    fn with_entry<F: FnOnce(&mut KeyEntry)>(&self, key: char, f: F) {
        let mut keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        f(keys.entry(key.to_ascii_lowercase()).or_default());
    }

    fn read_entry(&self, key: char) -> KeyEntry {
        let keys = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        keys.get(&key.to_ascii_lowercase())
            .copied()
            .unwrap_or_default()
    }
}

/// One key of a [`Keyboard`].
#[derive(Debug)]
pub struct KeyHandle {
    keyboard: Keyboard,
    key: char,
    subscribed: bool,
}

impl KeySource for KeyHandle {
    fn current_state(&self) -> bool {
        self.keyboard.is_pressed(self.key)
    }

    fn subscribe(&mut self) -> Result<()> {
        if self.subscribed {
            return Err(EngineError::Subscription(format!(
                "key {:?} already subscribed",
                self.key
            )));
        }
        self.keyboard.with_entry(self.key, |entry| entry.subscribers += 1);
        self.subscribed = true;
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if self.subscribed {
            self.keyboard.with_entry(self.key, |entry| {
                entry.subscribers = entry.subscribers.saturating_sub(1);
            });
            self.subscribed = false;
        }
    }
}

/// Key-driven input; holds its subscription until released or dropped.
pub struct KeyAdapter {
    key: char,
    source: Box<dyn KeySource>,
    subscribed: bool,
}

impl fmt::Debug for KeyAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyAdapter")
            .field("key", &self.key)
            .field("subscribed", &self.subscribed)
            .finish()
    }
}

impl KeyAdapter {
    pub fn new(key: char, mut source: Box<dyn KeySource>) -> Result<Self> {
        source.subscribe()?;
        tracing::debug!(key = %key, "Key input subscribed");
        Ok(Self {
            key,
            source,
            subscribed: true,
        })
    }

    #[must_use]
    pub fn key(&self) -> char {
        self.key
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    #[must_use]
    pub fn active_state(&self) -> bool {
        self.subscribed && self.source.current_state()
    }

    /// Unsubscribes from the source. Safe to call more than once.
    pub fn release(&mut self) {
        if self.subscribed {
            self.source.unsubscribe();
            self.subscribed = false;
            tracing::debug!(key = %self.key, "Key input released");
        }
    }
}

impl Drop for KeyAdapter {
    fn drop(&mut self) {
        self.release();
    }
}

/// The closed set of input kinds.
#[derive(Debug)]
pub enum InputAdapter {
    Heat(HeatAdapter),
    Key(KeyAdapter),
}

impl InputAdapter {
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Heat(_) => "Heat".to_string(),
            Self::Key(k) => format!("Key[{}]", k.key().to_ascii_uppercase()),
        }
    }

    #[must_use]
    pub fn kind_tag(&self) -> NodeKindTag {
        match self {
            Self::Heat(_) => NodeKindTag::Heat,
            Self::Key(_) => NodeKindTag::Key,
        }
    }

    /// State before the first tick: heat starts hot, keys mirror their source.
    #[must_use]
    pub fn initial_activation(&self) -> Activation {
        match self {
            Self::Heat(_) => Activation::Active,
            Self::Key(k) => Activation::from(k.active_state()),
        }
    }

    pub fn recalculate<R: RandomSource>(&mut self, rng: &mut R) -> bool {
        match self {
            Self::Heat(h) => h.recalculate(rng),
            Self::Key(k) => k.active_state(),
        }
    }

    pub fn release(&mut self) {
        if let Self::Key(k) = self {
            k.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;

    #[test]
    fn test_heat_probability_decays_linearly() {
        let clock = SimulatedClock::new();
        let mut heat = HeatAdapter::new(Arc::new(clock.clone()), 1000);
        assert_eq!(heat.probability(), 1.0);
        clock.advance(250);
        assert_eq!(heat.probability(), 0.75);
        clock.advance(500);
        assert_eq!(heat.probability(), 0.25);
        assert!(!heat.is_heat_death());
    }

    #[test]
    fn test_heat_death_is_permanent() {
        let clock = SimulatedClock::new();
        clock.set(100);
        let mut heat = HeatAdapter::new(Arc::new(clock.clone()), 50);
        clock.set(200);
        assert_eq!(heat.probability(), 0.0);
        assert!(heat.is_heat_death());
        clock.set(0);
        assert_eq!(heat.probability(), 0.0);
        let mut rng = SeededRandom::from_u64(1);
        for _ in 0..50 {
            assert!(!heat.recalculate(&mut rng));
        }
    }

    #[test]
    fn test_zero_duration_heat_never_divides() {
        let clock = SimulatedClock::new();
        let mut heat = HeatAdapter::new(Arc::new(clock), 0);
        let p = heat.probability();
        assert_eq!(p, 0.0);
        assert!(heat.is_heat_death());
    }

    #[test]
    fn test_key_adapter_mirrors_keyboard() {
        let keyboard = Keyboard::new();
        let mut input = InputAdapter::Key(
            KeyAdapter::new('a', Box::new(keyboard.source('a'))).expect("subscribes"),
        );
        let mut rng = SeededRandom::from_u64(1);
        assert!(!input.recalculate(&mut rng));
        keyboard.press('A');
        assert!(input.recalculate(&mut rng));
        keyboard.release('a');
        assert!(!input.recalculate(&mut rng));
        assert_eq!(input.name(), "Key[A]");
    }

    #[test]
    fn test_key_adapter_releases_on_drop() {
        let keyboard = Keyboard::new();
        {
            let _adapter = KeyAdapter::new('s', Box::new(keyboard.source('s'))).expect("subscribes");
            assert_eq!(keyboard.subscriber_count('s'), 1);
        }
        assert_eq!(keyboard.subscriber_count('s'), 0);
    }

    #[test]
    fn test_release_is_idempotent() {
        let keyboard = Keyboard::new();
        let mut adapter = KeyAdapter::new('k', Box::new(keyboard.source('k'))).expect("subscribes");
        adapter.release();
        adapter.release();
        assert_eq!(keyboard.subscriber_count('k'), 0);
        keyboard.press('k');
        assert!(!adapter.active_state(), "released inputs stop observing");
        drop(adapter);
        assert_eq!(keyboard.subscriber_count('k'), 0);
    }

    #[test]
    fn test_double_subscribe_fails() {
        let keyboard = Keyboard::new();
        let mut handle = keyboard.source('l');
        handle.subscribe().expect("first subscribe");
        assert!(matches!(
            handle.subscribe(),
            Err(EngineError::Subscription(_))
        ));
        handle.unsubscribe();
        assert_eq!(keyboard.subscriber_count('l'), 0);
    }
}
