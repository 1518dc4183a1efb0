//! # Utilities Module
//!
//! ## Role
//! Cross-cutting helpers that don't belong in the clustering kernel itself.
//!
//! ## Sub-modules
//! - `progress`: Rate-limited progress / cancellation protocol and clocks
//! - `telemetry`: Console progress reporter used by the binary

pub mod progress;
pub mod telemetry;
