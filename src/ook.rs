//! Component D: the sample-wise OOK packet detector, which owns and drives
//! the FSK sub-detector (Component C).
//!
//! Grounded on `original_source/src/pulse_detect.c`'s `pulse_detect_package`
//! and its `PD_OOK_STATE_*` switch. The original keeps `pulse_state_t
//! pulse_state` as a file-level `static` (process-wide singleton);
//! spec.md §9 flags this as a design note to undo, so [`OokDetector`] is an
//! explicit struct the caller constructs, threads through every call, and
//! drops — enabling independent concurrent streams (spec.md §5).
//!
//! A quirk worth calling out because it is easy to "fix" by accident: when
//! `detect` emits a packet, it returns *before* advancing its internal
//! sample cursor past the triggering sample. Call `detect` again with the
//! same `envelope`/`fm`/`len` to keep draining further packets out of one
//! chunk; the cursor only resets to the start once a call runs out of
//! samples without finding one.

use crate::constants::{
    OOK_EST_HIGH_RATIO, OOK_EST_LOW_RATIO, OOK_HIGH_LOW_RATIO, OOK_MAX_HIGH_LEVEL,
    OOK_MIN_HIGH_LEVEL, PD_MAX_GAP_MS, PD_MAX_GAP_RATIO, PD_MAX_PULSES, PD_MIN_GAP_MS,
    PD_MIN_PULSE_SAMPLES, PD_MIN_PULSES,
};
use crate::fsk::FskDetector;
use crate::pulse_buffer::PulseBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OokState {
    Idle,
    Pulse,
    GapStart,
    Gap,
}

/// Outcome of a [`OokDetector::detect`] call (spec.md §6 return codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectResult {
    /// Buffer exhausted without a packet; cursor reset for the next chunk.
    NoPacket,
    /// An OOK packet is ready in the caller's OOK buffer.
    OokPacket,
    /// An FSK packet is ready in the caller's FSK buffer.
    FskPacket,
}

/// Long-lived, caller-owned OOK detector state. Construct once, feed it
/// chunks repeatedly, drop when the stream ends (spec.md §9 lifecycle).
pub struct OokDetector {
    state: OokState,
    pulse_length: u32,
    max_pulse: u32,
    cursor: usize,
    lead_in_counter: u32,
    ook_low_estimate: i32,
    ook_high_estimate: i32,
    fsk: FskDetector,
}

impl Default for OokDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl OokDetector {
    pub fn new() -> Self {
        Self {
            state: OokState::Idle,
            pulse_length: 0,
            max_pulse: 0,
            cursor: 0,
            lead_in_counter: 0,
            ook_low_estimate: 0,
            ook_high_estimate: 0,
            fsk: FskDetector::new(),
        }
    }

    pub fn ook_low_estimate(&self) -> i32 {
        self.ook_low_estimate
    }

    pub fn ook_high_estimate(&self) -> i32 {
        self.ook_high_estimate
    }

    /// Consume samples from `envelope`/`fm` (parallel streams of length at
    /// least `len`) starting at the internal cursor, up to `len`. Returns
    /// `NoPacket` if nothing terminated within the chunk (cursor resets to
    /// continue on the next chunk), or the detected packet kind with the
    /// cursor left ready to resume on the next sample (spec.md §4.1).
    #[allow(clippy::too_many_arguments)]
    pub fn detect(
        &mut self,
        envelope: &[i16],
        fm: &[i16],
        len: usize,
        level_limit: i16,
        sample_rate: u32,
        sample_offset: u64,
        out_ook: &mut PulseBuffer,
        out_fsk: &mut PulseBuffer,
    ) -> DetectResult {
        debug_assert!(envelope.len() >= len && fm.len() >= len);
        // Be sure the initial minimum level is set before the first sample.
        self.ook_high_estimate = self.ook_high_estimate.max(OOK_MIN_HIGH_LEVEL);

        let samples_per_ms = sample_rate / 1000;

        while self.cursor < len {
            let am_n = envelope[self.cursor] as i32;
            let fm_n = fm[self.cursor] as i32;
            let mut ook_threshold =
                self.ook_low_estimate + (self.ook_high_estimate - self.ook_low_estimate) / 2;
            if level_limit != 0 {
                ook_threshold = level_limit as i32;
            }
            let ook_hysteresis = ook_threshold / 8;

            let result = match self.state {
                OokState::Idle => {
                    self.idle_step(am_n, ook_threshold, ook_hysteresis, sample_offset, out_ook, out_fsk);
                    None
                }
                OokState::Pulse => {
                    self.pulse_step(am_n, fm_n, ook_threshold, ook_hysteresis, out_ook, out_fsk);
                    None
                }
                OokState::GapStart => {
                    self.gap_start_step(am_n, fm_n, ook_threshold, ook_hysteresis, out_ook, out_fsk)
                }
                OokState::Gap => self.gap_step(am_n, ook_threshold, ook_hysteresis, samples_per_ms, out_ook),
            };
            if let Some(result) = result {
                return result;
            }
            self.cursor += 1;
        }

        self.cursor = 0;
        DetectResult::NoPacket
    }

    #[allow(clippy::too_many_arguments)]
    fn idle_step(
        &mut self,
        am_n: i32,
        ook_threshold: i32,
        ook_hysteresis: i32,
        sample_offset: u64,
        out_ook: &mut PulseBuffer,
        out_fsk: &mut PulseBuffer,
    ) {
        if am_n > ook_threshold + ook_hysteresis && self.lead_in_counter > OOK_EST_LOW_RATIO as u32 {
            // Rising edge, and the noise estimate has had time to settle.
            out_ook.clear();
            out_fsk.clear();
            out_ook.offset = sample_offset + self.cursor as u64;
            out_fsk.offset = sample_offset + self.cursor as u64;
            self.pulse_length = 0;
            self.max_pulse = 0;
            self.fsk = FskDetector::new();
            self.state = OokState::Pulse;
        } else {
            // Still idle: estimate the low (noise) level.
            let ook_low_delta = am_n - self.ook_low_estimate;
            self.ook_low_estimate += ook_low_delta / OOK_EST_LOW_RATIO;
            // Fixed-point nudge: without this the integer IIR stalls when
            // delta/OOK_EST_LOW_RATIO truncates to zero, and the noise
            // floor never rises in quiet conditions (spec.md §9).
            self.ook_low_estimate += if ook_low_delta > 0 { 1 } else { -1 };
            // Default high-level estimate is a ratio of the low level.
            self.ook_high_estimate = (OOK_HIGH_LOW_RATIO * self.ook_low_estimate)
                .clamp(OOK_MIN_HIGH_LEVEL, OOK_MAX_HIGH_LEVEL);
            if self.lead_in_counter <= OOK_EST_LOW_RATIO as u32 {
                self.lead_in_counter += 1;
            }
        }
    }

    fn pulse_step(
        &mut self,
        am_n: i32,
        fm_n: i32,
        ook_threshold: i32,
        ook_hysteresis: i32,
        out_ook: &mut PulseBuffer,
        out_fsk: &mut PulseBuffer,
    ) {
        self.pulse_length += 1;
        if am_n < ook_threshold - ook_hysteresis {
            // End of pulse.
            if self.pulse_length < PD_MIN_PULSE_SAMPLES {
                // Spurious short pulse: discard, go back to idle.
                self.state = OokState::Idle;
            } else {
                out_ook.pulse[out_ook.num_pulses] = self.pulse_length;
                self.max_pulse = self.max_pulse.max(self.pulse_length);
                self.pulse_length = 0;
                self.state = OokState::GapStart;
            }
        } else {
            self.ook_high_estimate += am_n / OOK_EST_HIGH_RATIO - self.ook_high_estimate / OOK_EST_HIGH_RATIO;
            self.ook_high_estimate = self.ook_high_estimate.clamp(OOK_MIN_HIGH_LEVEL, OOK_MAX_HIGH_LEVEL);
            // Track the packet carrier frequency for the side channel.
            out_ook.fsk_f1_est += fm_n / OOK_EST_HIGH_RATIO - out_ook.fsk_f1_est / OOK_EST_HIGH_RATIO;
        }
        // FSK demodulation only during the very first pulse.
        if out_ook.num_pulses == 0 {
            self.fsk.step(fm_n, out_fsk);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn gap_start_step(
        &mut self,
        am_n: i32,
        fm_n: i32,
        ook_threshold: i32,
        ook_hysteresis: i32,
        out_ook: &mut PulseBuffer,
        out_fsk: &mut PulseBuffer,
    ) -> Option<DetectResult> {
        self.pulse_length += 1;
        let mut result = None;
        if am_n > ook_threshold + ook_hysteresis {
            // Spurious short gap: the two pulses (and the gap) fuse back
            // into one ongoing pulse.
            self.pulse_length += out_ook.pulse[out_ook.num_pulses];
            self.state = OokState::Pulse;
        } else if self.pulse_length >= PD_MIN_PULSE_SAMPLES {
            self.state = OokState::Gap;
            if out_fsk.num_pulses > PD_MIN_PULSES {
                self.fsk.wrap_up(out_fsk);
                out_fsk.fsk_f1_est = self.fsk.fm_f1_est();
                out_fsk.fsk_f2_est = self.fsk.fm_f2_est();
                out_fsk.ook_low_estimate = self.ook_low_estimate;
                out_fsk.ook_high_estimate = self.ook_high_estimate;
                self.state = OokState::Idle;
                result = Some(DetectResult::FskPacket);
            }
        }
        // FSK demodulation continues during the short gap (we might still
        // return as FSK above), only during the very first pulse.
        if out_ook.num_pulses == 0 {
            self.fsk.step(fm_n, out_fsk);
        }
        result
    }

    fn gap_step(
        &mut self,
        am_n: i32,
        ook_threshold: i32,
        ook_hysteresis: i32,
        samples_per_ms: u32,
        out_ook: &mut PulseBuffer,
    ) -> Option<DetectResult> {
        self.pulse_length += 1;
        if am_n > ook_threshold + ook_hysteresis {
            out_ook.gap[out_ook.num_pulses] = self.pulse_length;
            out_ook.num_pulses += 1;

            if out_ook.num_pulses >= PD_MAX_PULSES {
                self.state = OokState::Idle;
                out_ook.ook_low_estimate = self.ook_low_estimate;
                out_ook.ook_high_estimate = self.ook_high_estimate;
                return Some(DetectResult::OokPacket);
            }

            self.pulse_length = 0;
            self.state = OokState::Pulse;
        }

        // End-of-packet heuristic, checked every sample regardless of
        // whether a new pulse just started above (spec.md §4.1).
        let ratio_eop = self.pulse_length > PD_MAX_GAP_RATIO * self.max_pulse
            && self.pulse_length > PD_MIN_GAP_MS * samples_per_ms;
        let absolute_eop = self.pulse_length > PD_MAX_GAP_MS * samples_per_ms;
        if ratio_eop || absolute_eop {
            out_ook.gap[out_ook.num_pulses] = self.pulse_length;
            out_ook.num_pulses += 1;
            self.state = OokState::Idle;
            out_ook.ook_low_estimate = self.ook_low_estimate;
            out_ook.ook_high_estimate = self.ook_high_estimate;
            return Some(DetectResult::OokPacket);
        }
        None
    }
}
