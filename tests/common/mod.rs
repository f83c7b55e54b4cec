//! Common test utilities for pal CLI tests.
//!
//! This module provides:
//! - `TestEnv`: isolated project directory plus CLI execution helpers
//! - Fixtures: reusable PAL document constants

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
