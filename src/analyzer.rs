//! Component E: histogram-based modulation classifier.
//!
//! Grounded on `original_source/src/pulse_detect.c`'s `pulse_analyzer`, with
//! its `fprintf` tracing and demodulator dispatch stripped out — this crate
//! stops at "what kind of signal is this, and what thresholds would a
//! bit-slicer need," per spec.md §1's explicit non-goal of doing that
//! slicing itself (spec.md §4.4).
//!
//! Classification is first-match-wins over the shape of three histograms
//! (pulse widths, gap widths, pulse+gap periods), in the same order the
//! original checks them.

use crate::constants::TOLERANCE;
use crate::histogram::Histogram;
use crate::pulse_buffer::PulseBuffer;

/// A guessed modulation scheme, with the timing thresholds a downstream
/// bit-slicer (out of scope here) would need to decode it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modulation {
    /// Pulse Position Modulation: fixed pulse width, data in the gap width.
    PpmRaw,
    /// Pulse Width Modulation: data in the pulse width, fixed gap or period.
    PwmRaw,
    /// Manchester coding with a zero-bit convention.
    ManchesterZerobit,
    /// Pulse Code Modulation, non-return-to-zero.
    PcmNrz,
    /// Pulse Width Modulation with an explicit sync/delimiter symbol.
    PwmPrecise,
}

/// Timing thresholds a bit-slicer would use to decode the classified
/// modulation. Fields not meaningful for a given [`Modulation`] are left at
/// zero (mirrors the original's unconditionally-populated `short_limit` /
/// `long_limit` / `reset_limit` / `sync_width` fields).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thresholds {
    pub short_limit: f64,
    pub long_limit: f64,
    pub reset_limit: f64,
    pub sync_width: f64,
}

/// Outcome of [`analyze`]: either a guessed modulation with thresholds, or
/// one of the two reasons no guess was made.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Too little information to guess anything (spec.md §4.4: a lone
    /// pulse is "probably FSK or just noise").
    SinglePulse,
    /// One pulse-width bin and one gap-width bin: likely an unmodulated
    /// carrier or preamble, not data-bearing.
    Unmodulated,
    /// A modulation scheme was identified.
    Guessed(Modulation, Thresholds),
    /// None of the classification rules matched.
    Unclassified,
}

/// Classify a committed packet's pulse/gap timing into a modulation guess
/// (spec.md §4.4). Mirrors `pulse_analyzer`'s control flow exactly,
/// including its two explicit Open Questions (see SPEC_FULL.md §5):
/// the PCM rule only inspects the first three gap bins, and sub-10kHz
/// sample rates are out of scope for the millisecond-based gap limits this
/// analyzer's downstream consumers rely on (unaffected here directly, but
/// worth flagging at the call site).
///
/// When a modulation is found, the packet's trailing gap is overwritten with
/// `reset_limit + 1` so a downstream demodulator sees an unambiguous
/// terminator — the same `data->gap[data->num_pulses-1] = reset_limit + 1`
/// the original performs at each dispatch site, except for PCM, which never
/// gets that override (spec.md §4.4).
pub fn analyze(data: &mut PulseBuffer) -> Classification {
    if data.num_pulses == 0 {
        return Classification::Unclassified;
    }
    if data.num_pulses == 1 {
        return Classification::SinglePulse;
    }

    let mut periods: Vec<u32> = Vec::with_capacity(data.num_pulses);
    for n in 0..data.num_pulses {
        periods.push(data.pulse[n] + data.gap[n]);
    }

    let mut hist_pulses = Histogram::new();
    let mut hist_gaps = Histogram::new();
    let mut hist_periods = Histogram::new();

    hist_pulses.sum(&data.pulse[..data.num_pulses], TOLERANCE);
    // Leave out the last (trailing, end-of-packet) gap, as it is not a real
    // data-bearing interval.
    hist_gaps.sum(&data.gap[..data.num_pulses - 1], TOLERANCE);
    hist_periods.sum(&periods[..periods.len() - 1], TOLERANCE);

    hist_pulses.fuse(TOLERANCE);
    hist_gaps.fuse(TOLERANCE);
    hist_periods.fuse(TOLERANCE);

    hist_pulses.sort_mean();
    hist_gaps.sort_mean();

    if hist_pulses.bins().first().map(|b| b.mean) == Some(0) {
        // Remove the FSK sentinel zero-bin, which isn't a real pulse width.
        hist_pulses.delete(0);
    }

    let result = classify(&mut hist_pulses, &mut hist_gaps, &hist_periods);
    if let Classification::Guessed(modulation, thresholds) = &result {
        if !matches!(modulation, Modulation::PcmNrz) {
            data.gap[data.num_pulses - 1] = (thresholds.reset_limit + 1.0) as u32;
        }
    }
    result
}

fn classify(
    hist_pulses: &mut Histogram,
    hist_gaps: &mut Histogram,
    hist_periods: &Histogram,
) -> Classification {
    let p = hist_pulses.bins();
    let g = hist_gaps.bins();

    if p.len() == 1 && g.len() == 1 {
        Classification::Unmodulated
    } else if p.len() == 1 && g.len() > 1 {
        // Pulse Position Modulation with fixed pulse width.
        let short_limit = (g[0].mean + g[1].mean) as f64 / 2.0;
        let long_limit = (g[1].max + 1) as f64;
        let reset_limit = (g[g.len() - 1].max + 1) as f64;
        Classification::Guessed(
            Modulation::PpmRaw,
            Thresholds {
                short_limit,
                long_limit,
                reset_limit,
                sync_width: 0.0,
            },
        )
    } else if p.len() == 2 && g.len() == 1 {
        // Pulse Width Modulation with fixed gap.
        let short_limit = (p[0].mean + p[1].mean) as f64 / 2.0;
        let long_limit = (g[g.len() - 1].max + 1) as f64;
        Classification::Guessed(
            Modulation::PwmRaw,
            Thresholds {
                short_limit,
                long_limit,
                reset_limit: long_limit,
                sync_width: 0.0,
            },
        )
    } else if p.len() == 2 && g.len() == 2 && hist_periods.bins_count() == 1 {
        // Pulse Width Modulation with fixed period.
        let short_limit = (p[0].mean + p[1].mean) as f64 / 2.0;
        let long_limit = (g[g.len() - 1].max + 1) as f64;
        Classification::Guessed(
            Modulation::PwmRaw,
            Thresholds {
                short_limit,
                long_limit,
                reset_limit: long_limit,
                sync_width: 0.0,
            },
        )
    } else if p.len() == 2 && g.len() == 2 && hist_periods.bins_count() == 3 {
        // Manchester coding: shortest pulse is assumed to be the half period.
        let short_limit = p[0].mean.min(p[1].mean) as f64;
        let reset_limit = (g[g.len() - 1].max + 1) as f64;
        Classification::Guessed(
            Modulation::ManchesterZerobit,
            Thresholds {
                short_limit,
                long_limit: 0.0,
                reset_limit,
                sync_width: 0.0,
            },
        )
    } else if p.len() == 2 && g.len() >= 3 {
        // Pulse Width Modulation spanning multiple packets.
        let short_limit = (p[0].mean + p[1].mean) as f64 / 2.0;
        let long_limit = (g[1].max + 1) as f64;
        let reset_limit = (g[g.len() - 1].max + 1) as f64;
        Classification::Guessed(
            Modulation::PwmRaw,
            Thresholds {
                short_limit,
                long_limit,
                reset_limit,
                sync_width: 0.0,
            },
        )
    } else if p.len() >= 3
        && g.len() >= 3
        && (p[1].mean - 2 * p[0].mean).abs() <= p[0].mean / 8
        && (p[2].mean - 3 * p[0].mean).abs() <= p[0].mean / 8
        && (g[0].mean - p[0].mean).abs() <= p[0].mean / 8
        && (g[1].mean - 2 * p[0].mean).abs() <= p[0].mean / 8
        && (g[2].mean - 3 * p[0].mean).abs() <= p[0].mean / 8
    {
        // Pulse Code Modulation, non-return-to-zero: pulses and gaps are
        // multiples of the shortest pulse width.
        //
        // Open question (preserved verbatim, see SPEC_FULL.md §5): this
        // rule only inspects the first three gap bins even when more
        // exist, matching the original exactly rather than generalizing to
        // `g.len()` bins.
        Classification::Guessed(
            Modulation::PcmNrz,
            Thresholds {
                short_limit: p[0].mean as f64,
                long_limit: p[0].mean as f64,
                reset_limit: p[0].mean as f64 * 1024.0,
                sync_width: 0.0,
            },
        )
    } else if p.len() == 3 {
        // Pulse Width Modulation with a sync/delimiter symbol: re-sort by
        // count to find the least-frequent pulse width (the delimiter).
        hist_pulses.sort_count();
        let p = hist_pulses.bins();
        let p1 = p[1].mean;
        let p2 = p[2].mean;
        let (short_limit, long_limit) = if p1 < p2 {
            (p1 as f64, p2 as f64)
        } else {
            (p2 as f64, p1 as f64)
        };
        let reset_limit = (g[g.len() - 1].max + 1) as f64;
        Classification::Guessed(
            Modulation::PwmPrecise,
            Thresholds {
                short_limit,
                long_limit,
                reset_limit,
                sync_width: p[0].mean as f64,
            },
        )
    } else {
        Classification::Unclassified
    }
}
