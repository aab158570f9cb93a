//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - A scripted mutation runner with an optional gate
//! - A recorder for completion callbacks
//! - Custom assertion macros

pub mod runner;

pub use runner::*;
