//! # Engine Module
//!
//! Configuration, progress reporting and error types shared by the workflows.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - The calculation setup and its builder, including the bond
//!   inference policy
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends
//! - **Error Handling** ([`error`]) - The error type a workflow reports per molecule

pub mod config;
pub mod error;
pub mod progress;
