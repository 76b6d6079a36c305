//! Core utilities for the orrery.
//!
//! This crate provides foundational types used by the render host:
//! - Error types and result aliases
//! - Logging initialization
//! - Frame clock for the per-frame time step

mod error;
mod logging;
mod timer;

pub use error::{Error, Result};
pub use logging::{DEFAULT_FILTER, init_logging};
pub use timer::{DEFAULT_MAX_DELTA, FrameClock};
