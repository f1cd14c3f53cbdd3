//! Seed data sources for the chat store.

mod builtin;
mod file;

pub use builtin::BuiltinSeed;
pub use file::FileSeed;

use crate::infra::{config::SeedConfig, contracts::SeedSource};

/// File-backed seed when `seed.path` is configured, built-in fixtures otherwise.
pub fn source_for(config: &SeedConfig, now_ms: i64) -> Box<dyn SeedSource> {
    match &config.path {
        Some(path) => Box::new(FileSeed::new(path.clone())),
        None => Box::new(BuiltinSeed::new(now_ms)),
    }
}
