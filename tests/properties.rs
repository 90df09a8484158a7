//! Property tests for SPEC_FULL.md §8's universal invariants, driven with
//! `proptest` over randomly generated pulse/gap trains and histogram inputs.
//!
//! Grounded on the wider pack's use of `proptest` for stateful DSP testing
//! (`other_examples/manifests/paiml-probar` and `.../dignifiedquire-sonora`
//! both pull it in for exactly this kind of property testing); this crate
//! has no teacher precedent for `proptest` itself; `tests/scenarios.rs`
//! supplies the teacher-grounded end-to-end style this file complements.

use pulse_core::{DetectResult, Histogram, OokDetector, PulseBuffer};
use pulse_core::constants::{
    OOK_MAX_HIGH_LEVEL, OOK_MIN_HIGH_LEVEL, PD_MAX_PULSES, PD_MIN_PULSE_SAMPLES, TOLERANCE,
};
use proptest::prelude::*;

const SAMPLE_RATE: u32 = 250_000;

/// Build an envelope/fm stream from a list of (pulse_width, gap_width) pairs,
/// bracketed by idle on both ends, entirely above `PD_MIN_PULSE_SAMPLES` so
/// none of it gets coalesced as a glitch.
fn pulse_train_signal(widths: &[(u32, u32)]) -> (Vec<i16>, Vec<i16>) {
    let mut env = vec![200i16; 2000];
    for &(pulse, gap) in widths {
        env.extend(std::iter::repeat(4000i16).take(pulse as usize));
        env.extend(std::iter::repeat(200i16).take(gap as usize));
    }
    env.extend(vec![200i16; 20_000]);
    let fm = vec![0i16; env.len()];
    (env, fm)
}

proptest! {
    /// Property 1 & 6 (partial): num_pulses never exceeds the cap, and
    /// offsets across successive packets from one stream are non-decreasing.
    #[test]
    fn packet_offsets_are_non_decreasing_and_bounded(
        widths in proptest::collection::vec(
            (PD_MIN_PULSE_SAMPLES + 1..500u32, PD_MIN_PULSE_SAMPLES + 1..500u32),
            1..40,
        )
    ) {
        let (env, fm) = pulse_train_signal(&widths);
        let mut det = OokDetector::new();
        let mut ook = PulseBuffer::new();
        let mut fsk = PulseBuffer::new();

        let mut last_offset = 0u64;
        loop {
            let result = det.detect(&env, &fm, env.len(), 0, SAMPLE_RATE, 0, &mut ook, &mut fsk);
            match result {
                DetectResult::OokPacket => {
                    prop_assert!(ook.num_pulses <= PD_MAX_PULSES);
                    prop_assert!(ook.offset >= last_offset);
                    last_offset = ook.offset;
                }
                DetectResult::FskPacket => {
                    prop_assert!(fsk.num_pulses <= PD_MAX_PULSES);
                    prop_assert!(fsk.offset >= last_offset);
                    last_offset = fsk.offset;
                }
                DetectResult::NoPacket => break,
            }
        }
    }

    /// Property 2: every recorded pulse/gap is at least the glitch floor,
    /// save for the two documented exceptions (FSK sentinel, final OOK gap).
    #[test]
    fn recorded_intervals_respect_the_glitch_floor(
        widths in proptest::collection::vec(
            (PD_MIN_PULSE_SAMPLES + 1..500u32, PD_MIN_PULSE_SAMPLES + 1..500u32),
            1..40,
        )
    ) {
        let (env, fm) = pulse_train_signal(&widths);
        let mut det = OokDetector::new();
        let mut ook = PulseBuffer::new();
        let mut fsk = PulseBuffer::new();

        let result = det.detect(&env, &fm, env.len(), 0, SAMPLE_RATE, 0, &mut ook, &mut fsk);
        if result == DetectResult::OokPacket {
            for k in 0..ook.num_pulses {
                prop_assert!(ook.pulse[k] >= PD_MIN_PULSE_SAMPLES);
                if k + 1 < ook.num_pulses {
                    prop_assert!(ook.gap[k] >= PD_MIN_PULSE_SAMPLES);
                }
            }
        }
    }

    /// Property 3 (first half): sum/count round-trip exactly for any integer
    /// vector, regardless of clustering.
    #[test]
    fn histogram_sum_preserves_count_and_total(
        data in proptest::collection::vec(1u32..20_000, 0..200)
    ) {
        let mut h = Histogram::new();
        h.sum(&data, TOLERANCE);
        let total_count: u32 = h.bins().iter().map(|b| b.count).sum();
        let total_sum: i64 = h.bins().iter().map(|b| b.sum).sum();
        // Histogram caps at MAX_HIST_BINS; once every bin is full, further
        // dissimilar values are silently dropped (spec.md §4.3), so only
        // assert the round-trip when every value found a home.
        if h.bins().len() < 16 || data.len() as u32 == total_count {
            prop_assert_eq!(total_count as usize, data.len());
            prop_assert_eq!(total_sum, data.iter().map(|&v| v as i64).sum::<i64>());
        }
    }

    /// Property 3 (second half): after fuse, no two surviving bins are
    /// within tolerance of each other.
    #[test]
    fn fuse_leaves_no_two_bins_within_tolerance(
        data in proptest::collection::vec(1u32..20_000, 0..200)
    ) {
        let mut h = Histogram::new();
        h.sum(&data, TOLERANCE);
        h.fuse(TOLERANCE);
        let bins = h.bins();
        for i in 0..bins.len() {
            for j in (i + 1)..bins.len() {
                let a = bins[i].mean;
                let b = bins[j].mean;
                prop_assert!((a - b).abs() as f64 >= TOLERANCE * a.max(b) as f64);
            }
        }
    }

    /// Property 4: fuse is idempotent.
    #[test]
    fn fuse_is_idempotent(
        data in proptest::collection::vec(1u32..20_000, 0..200)
    ) {
        let mut h = Histogram::new();
        h.sum(&data, TOLERANCE);
        h.fuse(TOLERANCE);
        let once = h.bins().to_vec();
        h.fuse(TOLERANCE);
        prop_assert_eq!(h.bins().to_vec(), once);
    }

    /// Property 5: the OOK high-level estimate never leaves its documented
    /// bounds, across arbitrary envelope noise.
    #[test]
    fn high_estimate_stays_within_bounds(
        samples in proptest::collection::vec(0i16..20_000, 1..5000)
    ) {
        let mut det = OokDetector::new();
        let mut ook = PulseBuffer::new();
        let mut fsk = PulseBuffer::new();
        let fm = vec![0i16; samples.len()];
        let _ = det.detect(&samples, &fm, samples.len(), 0, SAMPLE_RATE, 0, &mut ook, &mut fsk);
        prop_assert!(det.ook_high_estimate() >= OOK_MIN_HIGH_LEVEL);
        prop_assert!(det.ook_high_estimate() <= OOK_MAX_HIGH_LEVEL);
    }
}
