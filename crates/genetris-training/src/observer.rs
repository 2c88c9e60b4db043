//! Per-tick hooks for visualization and playback pacing.
//!
//! A [`TickObserver`] sees a read-only [`TickSnapshot`] after every gravity
//! tick of every individual. Observers never change the simulation; the only
//! thing they can do is abort the run by returning an [`ObserverError`].

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use genetris_engine::WellSnapshot;

use crate::config::TrainingConfig;

/// State of one individual's game after a tick.
#[derive(Debug, Clone, Copy)]
pub struct TickSnapshot<'a> {
    pub generation: usize,
    pub individual_id: u64,
    pub well: WellSnapshot<'a>,
}

/// Receives a snapshot after every tick.
///
/// Observers are shared between playthroughs that may run on different
/// threads.
pub trait TickObserver: Send + Sync {
    /// Called once per tick; an error aborts the whole run.
    fn on_tick(&self, snapshot: &TickSnapshot<'_>) -> Result<(), ObserverError>;
}

/// A tick observer stopped the run.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("tick observer aborted the run: {reason}")]
pub struct ObserverError {
    reason: String,
}

impl ObserverError {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TickObserver for NoopObserver {
    fn on_tick(&self, _snapshot: &TickSnapshot<'_>) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// Slows playback down so that a human can follow it.
///
/// Each tick sleeps for the configured delay when `reasonable_speed` is set,
/// or when `spectator_mode` is set and the game has outlived the spectator
/// threshold. Raising the interrupt flag makes the next tick fail.
#[derive(Debug, Clone)]
pub struct PlaybackPacer {
    delay: Duration,
    reasonable_speed: bool,
    spectator_mode: bool,
    spectator_threshold: u64,
    interrupted: Arc<AtomicBool>,
}

impl PlaybackPacer {
    #[must_use]
    pub fn from_config(config: &TrainingConfig) -> Self {
        Self {
            delay: config.tick_delay(),
            reasonable_speed: config.reasonable_speed,
            spectator_mode: config.spectator_mode,
            spectator_threshold: config.spectator_threshold,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the flag that interrupts playback when set.
    #[must_use]
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    fn should_wait(&self, lifetime: u64) -> bool {
        self.reasonable_speed || (self.spectator_mode && lifetime > self.spectator_threshold)
    }
}

impl TickObserver for PlaybackPacer {
    fn on_tick(&self, snapshot: &TickSnapshot<'_>) -> Result<(), ObserverError> {
        if self.interrupted.load(Ordering::Relaxed) {
            return Err(ObserverError::new("playback interrupted"));
        }
        if self.should_wait(snapshot.well.lifetime) {
            thread::sleep(self.delay);
        }
        Ok(())
    }
}
