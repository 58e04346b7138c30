//! Unit tests for configuration loading and resolution.
//!
//! - `cli_flags`: Command-line flag parsing
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Token, query, owner, date, and endpoint resolution
//! - `validation`: Pre-flight validation tests

mod helpers;
mod precedence;
