//! Board engine for a 10×20 falling-block puzzle.
//!
//! [`core`] holds the passive data model (pieces and the board grid), and
//! [`engine`] the game state machine built on top of it.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
