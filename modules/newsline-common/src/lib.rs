pub mod config;
pub mod embedder;
pub mod error;
pub mod seeds;
pub mod types;

pub use config::Config;
pub use embedder::{Embedder, HashingEmbedder};
pub use error::{NewslineError, Result};
pub use seeds::{Seeds, SeedEntry};
pub use types::*;
