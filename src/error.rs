//! Error type for the one fallible construction path in this crate.
//!
//! Detection and analysis themselves are infallible on well-formed or even
//! pathological sample data (spec.md §7) — they saturate and coalesce
//! rather than fail. The only thing that can go wrong is building a
//! [`crate::config::DetectorConfig`] with a nonsensical sample rate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PulseCoreError {
    #[error("sample rate must be nonzero")]
    ZeroSampleRate,
    #[error("invalid detector config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PulseCoreError>;
