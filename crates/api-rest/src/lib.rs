//! # API REST
//!
//! REST API implementation for MediAid.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! The triage decision pipeline itself lives in `mediaid-core`; this crate is
//! the presentation seam that invokes it and records history.

#![warn(rust_2018_idioms)]

pub use mediaid_core::TriageEngine;
