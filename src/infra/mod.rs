//! Infrastructure layer: config, logging, seed data and OS integrations.

pub mod clipboard;
pub mod config;
pub mod contracts;
pub mod error;
pub mod logging;
pub mod opener;
pub mod seed;
pub mod storage_layout;
#[cfg(test)]
pub mod stubs;
