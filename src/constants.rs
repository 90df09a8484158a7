//! Named constants for the pulse detector and modulation analyzer.
//!
//! Values come from `original_source/src/pulse_detect.c` (rtl_433's
//! `pulse_detect.h`/`pulse_detect.c`), which spec.md describes by name and
//! role but does not always spell out numerically.

/// Hard cap on recorded pulses in a single packet. Exceeding it is a normal
/// end-of-packet condition (spec.md §7), not an error.
pub const PD_MAX_PULSES: usize = 1200;

/// Intervals shorter than this are glitches and get coalesced into the
/// neighboring interval rather than recorded.
pub const PD_MIN_PULSE_SAMPLES: u32 = 10;

/// FSK commit threshold: once the FSK buffer holds more symbols than this at
/// the OOK GAP_START→GAP transition, the packet is declared FSK.
pub const PD_MIN_PULSES: usize = 16;

/// Minimum idle gap, in milliseconds, before the ratio-based OOK end-of-packet
/// heuristic is allowed to fire.
pub const PD_MIN_GAP_MS: u32 = 10;

/// Absolute idle gap, in milliseconds, above which OOK end-of-packet fires
/// unconditionally regardless of the pulse/gap ratio.
pub const PD_MAX_GAP_MS: u32 = 50;

/// Gap-to-max-pulse ratio above which OOK end-of-packet may fire (subject to
/// `PD_MIN_GAP_MS` also being exceeded).
pub const PD_MAX_GAP_RATIO: u32 = 10;

/// Default ratio between the high and low (noise) level estimates while IDLE.
pub const OOK_HIGH_LOW_RATIO: i32 = 8;

/// Floor for the OOK high-level estimate.
pub const OOK_MIN_HIGH_LEVEL: i32 = 1000;

/// Ceiling for the OOK high-level estimate (a unit phasor is 128; anything
/// above `128*128` is overdrive).
pub const OOK_MAX_HIGH_LEVEL: i32 = 128 * 128;

/// Ceiling for the OOK low-level (noise) estimate.
pub const OOK_MAX_LOW_LEVEL: i32 = OOK_MAX_HIGH_LEVEL / 2;

/// Divisor controlling the slowness of the OOK high-level IIR estimator.
pub const OOK_EST_HIGH_RATIO: i32 = 64;

/// Divisor controlling the slowness of the OOK low-level (noise) IIR
/// estimator. Deliberately very slow — see the `±1` nudge in `ook.rs`.
pub const OOK_EST_LOW_RATIO: i32 = 1024;

/// Default frequency delta (in FM-discriminator units) used to decide
/// whether a sample is "close enough" to the current FSK frequency estimate
/// while in `FskState::Init`. Half of this is the actual comparison delta.
pub const FSK_DEFAULT_FM_DELTA: i32 = 6000;

/// Divisor controlling the slowness of the FSK frequency IIR estimators.
pub const FSK_EST_RATIO: i32 = 32;

/// Relative two-sided tolerance used by the histogram builder and by the
/// modulation analyzer's classification rules.
pub const TOLERANCE: f64 = 0.2;

/// Hard cap on the number of histogram bins. The design relies on pulse
/// streams having few distinct widths; this does not grow dynamically.
pub const MAX_HIST_BINS: usize = 16;
