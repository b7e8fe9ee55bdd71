//! AV Common Library
//!
//! Shared types and configuration loading for the AV simulation workspace.
//!
//! # Module Structure
//!
//! - [`types`] - Message structs exchanged over the per-tick blackboard
//! - [`config`] - Scenario configuration loading and validation
//! - [`consts`] - System-wide numeric constants and bounds
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use av_common::prelude::*;
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
pub mod types;
