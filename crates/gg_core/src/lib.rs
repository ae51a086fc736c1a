//! # gg_core - Match Action Sequence Generator
//!
//! Learns a Markov chain of football actions from recorded matches and
//! samples plausible action sequences from it.
//!
//! ## Features
//! - Empirical transition matrix, never crossing match boundaries
//! - Per-action log-normal measurement and normal gait-length profiles
//! - Style reweighting (attacking / defensive / neutral) and anti-repetition
//! - Deterministic output for a fixed seed
//! - JSON API for easy integration
//!
//! ```no_run
//! use gg_core::{Dataset, GameContext, GameStyle};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let dataset = Dataset::load_files(&["data/match_1.json", "data/match_2.json"])?;
//! let context = GameContext::build(&dataset)?;
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let sequence = context.generate("pass", 90, GameStyle::Attacking, &mut rng)?;
//! println!("{} actions", sequence.len());
//! # Ok::<(), gg_core::GenError>(())
//! ```

pub mod api;
pub mod data;
pub mod error;
pub mod model;
pub mod sampler;

pub use api::{generate_game, generate_game_json, GameRequest, GameResponse};
pub use data::{ActionRecord, Dataset, DatasetProvider, JsonFileSource};
pub use error::{GenError, Result};
pub use model::{ActionProfile, GameContext, GameStyle, ProfileSet, TransitionMatrix};
pub use sampler::{GameSequence, GameStep, GenerationRequest, SequenceSampler};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
