//! Adaptive OOK/FSK pulse detection and modulation classification for
//! sub-GHz ISM-band envelope/FM-discriminator sample streams.
//!
//! This crate covers the detection and analysis core only: turning a raw
//! envelope (and, in parallel, an FM-discriminator) sample stream into
//! pulse/gap timing for one packet, and optionally guessing what
//! modulation produced that timing. It does not acquire samples, does not
//! read or write files, and does not decode data bits out of the timing it
//! finds — those are all callers' jobs.
//!
//! The typical flow:
//!
//! ```no_run
//! use pulse_core::{DetectResult, DetectorConfig, OokDetector, PulseBuffer};
//!
//! let cfg = DetectorConfig::new(250_000).unwrap();
//! let mut detector = OokDetector::new();
//! let mut ook_packet = PulseBuffer::new();
//! let mut fsk_packet = PulseBuffer::new();
//!
//! let envelope: Vec<i16> = vec![];
//! let fm: Vec<i16> = vec![];
//! match detector.detect(
//!     &envelope,
//!     &fm,
//!     envelope.len(),
//!     cfg.level_limit,
//!     cfg.sample_rate,
//!     0,
//!     &mut ook_packet,
//!     &mut fsk_packet,
//! ) {
//!     DetectResult::OokPacket => { /* inspect ook_packet */ }
//!     DetectResult::FskPacket => { /* inspect fsk_packet */ }
//!     DetectResult::NoPacket => { /* keep feeding chunks */ }
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod constants;
pub mod error;
pub mod fsk;
pub mod histogram;
pub mod ook;
pub mod pulse_buffer;

pub use analyzer::{analyze, Classification, Modulation, Thresholds};
pub use config::DetectorConfig;
pub use error::{PulseCoreError, Result};
pub use fsk::{FskDetector, FskState};
pub use histogram::{HistBin, Histogram};
pub use ook::{DetectResult, OokDetector};
pub use pulse_buffer::PulseBuffer;
