//! JSON run configurations for the command-line tools.

pub mod seeding;

pub use seeding::{load_config, OutputConfig, SeedingRunConfig};
