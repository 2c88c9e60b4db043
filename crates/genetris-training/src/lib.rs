//! Training system that evolves placement networks with a genetic algorithm.
//!
//! Every individual owns a [`NeuralNetwork`](genetris_evaluator::neural_network::NeuralNetwork)
//! and plays one game per generation. The network picks a placement for each
//! new piece; the moves towards it are applied one per gravity tick. The game
//! ends when a new piece collides at its spawn point (natural death) or when
//! the lifetime limit is reached (timed death).
//!
//! # How Training Works
//!
//! 1. **Population** - Create individuals with random network weights
//! 2. **Play** - Each individual plays one game with its own piece bag
//! 3. **Fitness** - `score + 0.1 * lifetime` of that game
//! 4. **Leaderboard** - The best individuals of the whole run are recorded
//! 5. **Reproduction** - Elitism, roulette selection, crossover and mutation
//! 6. **Repeat** - Continue for the configured number of generations
//!
//! # Architecture
//!
//! ```text
//! Trainer (config, random stream, leaderboard)
//!     ↓ owns
//! Population (genetic)
//!     ↓ holds
//! Individual (network + well + pending moves)
//!     ↓ asks
//! Placement Search (genetris-evaluator)
//!     ↓ notifies
//! Tick Observer (pacing, visualization)
//! ```
//!
//! # Modules
//!
//! - [`config`] - Training parameters and their validation
//! - [`genetic`] - Population, selection and generation reports
//! - [`individual`] - A single network playing its game
//! - [`leaderboard`] - Best individuals across the run
//! - [`observer`] - Per-tick hooks and playback pacing
//! - [`trainer`] - The generation loop

pub mod config;
pub mod genetic;
pub mod individual;
pub mod leaderboard;
pub mod observer;
pub mod trainer;
