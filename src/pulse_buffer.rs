//! Component A: the fixed-capacity pulse/gap record for one packet.
//!
//! Grounded on `original_source/src/pulse_detect.c`'s `pulse_data_t`, a
//! fixed-size C struct (`int pulse[PD_MAX_PULSES]`). The Rust port keeps
//! that fixed-capacity shape: `pulse`/`gap` are pre-sized to
//! [`PD_MAX_PULSES`] and zero-filled, so slot `num_pulses` is always valid
//! to stage a write into before a symbol is committed — the FSK detector's
//! rewind logic (`fsk.rs`) depends on reading a not-yet-committed slot.

use serde::{Deserialize, Serialize};

use crate::constants::PD_MAX_PULSES;

/// One detected packet: pulse/gap widths in samples, plus the side-channel
/// estimates captured when the packet was committed (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseBuffer {
    /// Absolute sample offset of the packet's first rising edge.
    pub offset: u64,
    /// Number of recorded pulses, `0 <= num_pulses <= PD_MAX_PULSES`.
    pub num_pulses: usize,
    /// Width of the k-th high interval, in samples.
    pub pulse: Vec<u32>,
    /// Width of the low interval immediately following the k-th pulse.
    pub gap: Vec<u32>,
    /// OOK noise-floor estimate at packet commit time.
    pub ook_low_estimate: i32,
    /// OOK high-level estimate at packet commit time.
    pub ook_high_estimate: i32,
    /// FSK "F1" (initially observed) frequency estimate.
    pub fsk_f1_est: i32,
    /// FSK "F2" (other) frequency estimate.
    pub fsk_f2_est: i32,
}

impl Default for PulseBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseBuffer {
    pub fn new() -> Self {
        Self {
            offset: 0,
            num_pulses: 0,
            pulse: vec![0; PD_MAX_PULSES],
            gap: vec![0; PD_MAX_PULSES],
            ook_low_estimate: 0,
            ook_high_estimate: 0,
            fsk_f1_est: 0,
            fsk_f2_est: 0,
        }
    }

    /// Reset to an empty buffer, as at the start of a new candidate packet.
    pub fn clear(&mut self) {
        self.offset = 0;
        self.num_pulses = 0;
        self.pulse.iter_mut().for_each(|v| *v = 0);
        self.gap.iter_mut().for_each(|v| *v = 0);
        self.ook_low_estimate = 0;
        self.ook_high_estimate = 0;
        self.fsk_f1_est = 0;
        self.fsk_f2_est = 0;
    }

    /// Whether the buffer has room for another symbol.
    pub fn has_room(&self) -> bool {
        self.num_pulses < PD_MAX_PULSES
    }

    /// Pulse widths actually recorded, `&pulse[..num_pulses]`.
    pub fn pulses(&self) -> &[u32] {
        &self.pulse[..self.num_pulses]
    }

    /// Gap widths actually recorded, `&gap[..num_pulses]`.
    pub fn gaps(&self) -> &[u32] {
        &self.gap[..self.num_pulses]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let buf = PulseBuffer::new();
        assert_eq!(buf.num_pulses, 0);
        assert_eq!(buf.pulse.len(), PD_MAX_PULSES);
        assert!(buf.has_room());
    }

    #[test]
    fn clear_resets_counters_but_keeps_capacity() {
        let mut buf = PulseBuffer::new();
        buf.offset = 42;
        buf.num_pulses = 3;
        buf.pulse[0] = 100;
        buf.gap[0] = 200;
        buf.ook_low_estimate = 500;
        buf.clear();
        assert_eq!(buf.offset, 0);
        assert_eq!(buf.num_pulses, 0);
        assert_eq!(buf.pulse[0], 0);
        assert_eq!(buf.gap[0], 0);
        assert_eq!(buf.ook_low_estimate, 0);
        assert_eq!(buf.pulse.len(), PD_MAX_PULSES);
    }

    #[test]
    fn pulses_and_gaps_are_bounded_by_num_pulses() {
        let mut buf = PulseBuffer::new();
        buf.num_pulses = 2;
        buf.pulse[0] = 10;
        buf.pulse[1] = 20;
        buf.gap[0] = 30;
        buf.gap[1] = 40;
        assert_eq!(buf.pulses(), &[10, 20]);
        assert_eq!(buf.gaps(), &[30, 40]);
    }
}
