//! churnwatch - Terminal Churn Prediction Wizard
//!
//! A terminal wizard that collects a fixed schema of customer attributes
//! across four steps, submits them to a remote prediction service, and
//! renders the returned risk classification.
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive wizard
//! churnwatch
//!
//! # Non-interactive prediction with the default profile
//! churnwatch predict
//!
//! # Against a specific backend
//! churnwatch --backend-url http://predictor:8000 predict --format json
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod logging;
pub mod schema;
pub mod tui;
pub mod wizard;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
