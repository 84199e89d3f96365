//! Reflected binary Gray code generation and analysis.
//!
//! Bit order: element `i` of a position's bit vector is bit `i` of its Gray
//! value (LSB first), and element 0 drives the outermost track. A `1` is a
//! cutout (light passes), a `0` is solid material.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported code width.
pub const MAX_BITS: u32 = u64::BITS;

/// Caller misuse of the Gray code functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("track index {track_index} out of range for {num_bits} bits")]
    TrackIndexOutOfRange { track_index: u32, num_bits: u32 },

    #[error("bit count {num_bits} exceeds the supported maximum of {MAX_BITS}")]
    TooManyBits { num_bits: u32 },
}

/// Gray value of `n`.
#[inline]
pub fn gray_value(n: u64) -> u64 {
    n ^ (n >> 1)
}

/// Inverse of [`gray_value`].
pub fn gray_to_binary(gray: u64) -> u64 {
    let mut binary = gray;
    let mut shift = gray >> 1;
    while shift != 0 {
        binary ^= shift;
        shift >>= 1;
    }
    binary
}

/// Gray bits of `position`, LSB first, `num_bits` long.
pub fn bits_for_position(position: u64, num_bits: u32) -> Result<Vec<u8>, DomainError> {
    if num_bits > MAX_BITS {
        return Err(DomainError::TooManyBits { num_bits });
    }
    let gray = gray_value(position);
    Ok((0..num_bits).map(|bit| ((gray >> bit) & 1) as u8).collect())
}

/// Sequence of 0/1 values for one track, one per position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackPattern(Vec<u8>);

impl TrackPattern {
    /// Wrap a bit vector; any nonzero value counts as `1`.
    pub fn from_bits(bits: impl IntoIterator<Item = u8>) -> Self {
        Self(bits.into_iter().map(|b| u8::from(b != 0)).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn bits(&self) -> &[u8] {
        &self.0
    }

    /// Number of transmissive positions.
    pub fn ones(&self) -> usize {
        self.0.iter().filter(|&&b| b == 1).count()
    }
}

/// Pattern for one track: bit `track_index` of every position's Gray value.
pub fn track_pattern(
    track_index: u32,
    num_positions: u32,
    num_bits: u32,
) -> Result<TrackPattern, DomainError> {
    if num_bits > MAX_BITS {
        return Err(DomainError::TooManyBits { num_bits });
    }
    if track_index >= num_bits {
        return Err(DomainError::TrackIndexOutOfRange {
            track_index,
            num_bits,
        });
    }
    Ok(TrackPattern::from_bits(
        (0..u64::from(num_positions)).map(|p| ((gray_value(p) >> track_index) & 1) as u8),
    ))
}

/// Gray values of positions `0..num_positions`.
pub fn gray_sequence(num_positions: u32) -> Vec<u64> {
    (0..u64::from(num_positions)).map(gray_value).collect()
}

/// Outcome of a single-bit transition check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionCheck {
    pub valid: bool,
    /// Index pairs whose codes differ in other than exactly one bit.
    pub offending: Vec<(usize, usize)>,
}

/// Check that consecutive codes differ in exactly one bit. With `cyclic`, the
/// last/first pair is checked as well. An empty sequence is invalid.
pub fn validate_single_bit_transitions(sequence: &[u64], cyclic: bool) -> TransitionCheck {
    if sequence.is_empty() {
        return TransitionCheck {
            valid: false,
            offending: Vec::new(),
        };
    }

    let mut offending: Vec<(usize, usize)> = sequence
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| (pair[0] ^ pair[1]).count_ones() != 1)
        .map(|(i, _)| (i, i + 1))
        .collect();

    let last = sequence.len() - 1;
    if cyclic && last > 0 && (sequence[last] ^ sequence[0]).count_ones() != 1 {
        offending.push((last, 0));
    }

    TransitionCheck {
        valid: offending.is_empty(),
        offending,
    }
}

/// Maximal run of equal values in a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRun {
    pub value: u8,
    pub start: usize,
    pub length: usize,
}

/// Linear runs, in order. The pattern is not treated as cyclic.
pub fn pattern_runs(pattern: &TrackPattern) -> Vec<PatternRun> {
    let mut runs: Vec<PatternRun> = Vec::new();
    for (i, &bit) in pattern.bits().iter().enumerate() {
        match runs.last_mut() {
            Some(run) if run.value == bit => run.length += 1,
            _ => runs.push(PatternRun {
                value: bit,
                start: i,
                length: 1,
            }),
        }
    }
    runs
}

/// Transition counts and run lengths of a pattern read as a closed loop.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitionStats {
    pub transitions: usize,
    pub zero_runs: Vec<usize>,
    pub one_runs: Vec<usize>,
}

impl TransitionStats {
    pub fn max_zero_run(&self) -> usize {
        self.zero_runs.iter().copied().max().unwrap_or(0)
    }

    pub fn max_one_run(&self) -> usize {
        self.one_runs.iter().copied().max().unwrap_or(0)
    }

    pub fn min_run(&self) -> usize {
        self.zero_runs
            .iter()
            .chain(&self.one_runs)
            .copied()
            .min()
            .unwrap_or(0)
    }
}

/// Cyclic statistics: the end/start pair counts as a transition, and a run
/// crossing the boundary is a single run.
pub fn transition_statistics(pattern: &TrackPattern) -> TransitionStats {
    let bits = pattern.bits();
    let n = bits.len();
    let mut stats = TransitionStats::default();
    if n == 0 {
        return stats;
    }

    let boundaries: Vec<usize> = (0..n).filter(|&i| bits[i] != bits[(i + 1) % n]).collect();
    stats.transitions = boundaries.len();

    if boundaries.is_empty() {
        if bits[0] == 0 {
            stats.zero_runs.push(n);
        } else {
            stats.one_runs.push(n);
        }
        return stats;
    }

    // A run starts right after each boundary; walk them in order, wrapping.
    for (k, &b) in boundaries.iter().enumerate() {
        let start = (b + 1) % n;
        let next = boundaries[(k + 1) % boundaries.len()];
        let end = (next + 1) % n;
        let length = (end + n - start) % n;
        let length = if length == 0 { n } else { length };
        if bits[start] == 0 {
            stats.zero_runs.push(length);
        } else {
            stats.one_runs.push(length);
        }
    }
    stats
}

/// Per-track summary used in the code report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCodeSummary {
    pub track_index: u32,
    pub transitions: usize,
    pub min_run: usize,
    pub max_run: usize,
    pub zero_fraction: f64,
}

/// Result of checking the codes a disk will carry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GrayCodeReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub tracks: Vec<TrackCodeSummary>,
    /// `num_positions / 2^num_tracks`, capped at 1.
    pub efficiency: f64,
}

/// Check the Gray codes of `num_positions` positions as read by `num_tracks`
/// tracks: single-bit transitions and unique codes are hard requirements,
/// run lengths and track balance produce warnings.
pub fn validate_encoder_codes(num_positions: u32, num_tracks: u32) -> GrayCodeReport {
    let mut report = GrayCodeReport {
        efficiency: code_efficiency(num_positions, num_tracks),
        ..Default::default()
    };

    if num_positions == 0 {
        report.errors.push("no positions to encode".to_string());
        return report;
    }
    if num_tracks == 0 || num_tracks > MAX_BITS {
        report
            .errors
            .push(format!("unsupported track count {num_tracks}"));
        return report;
    }

    let mask = if num_tracks == MAX_BITS {
        u64::MAX
    } else {
        (1u64 << num_tracks) - 1
    };
    let codes: Vec<u64> = gray_sequence(num_positions)
        .into_iter()
        .map(|g| g & mask)
        .collect();

    let transitions = validate_single_bit_transitions(&codes, false);
    if !transitions.valid {
        for (a, b) in transitions.offending.iter().take(5) {
            report.errors.push(format!(
                "positions {a} and {b} differ in {} bits",
                (codes[*a] ^ codes[*b]).count_ones()
            ));
        }
        if transitions.offending.len() > 5 {
            report.errors.push(format!(
                "{} more invalid transitions",
                transitions.offending.len() - 5
            ));
        }
    }

    let mut sorted = codes.clone();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != codes.len() {
        report.errors.push(format!(
            "{} positions share a code with another position",
            codes.len() - sorted.len()
        ));
    }

    let long_run = (num_positions as usize / 4).max(8);
    for track_index in 0..num_tracks {
        let pattern = TrackPattern::from_bits(codes.iter().map(|c| ((c >> track_index) & 1) as u8));
        let runs = pattern_runs(&pattern);
        let min_run = runs.iter().map(|r| r.length).min().unwrap_or(0);
        let max_run = runs.iter().map(|r| r.length).max().unwrap_or(0);
        let zero_fraction = 1.0 - pattern.ones() as f64 / pattern.len() as f64;

        if min_run == 1 && runs.len() > 1 {
            report.warnings.push(format!(
                "track {track_index} has single-position features"
            ));
        }
        if max_run > long_run {
            report.warnings.push(format!(
                "track {track_index} has a run of {max_run} positions"
            ));
        }
        if !(0.25..=0.75).contains(&zero_fraction) {
            report.warnings.push(format!(
                "track {track_index} is unbalanced ({:.0}% solid)",
                zero_fraction * 100.0
            ));
        }

        report.tracks.push(TrackCodeSummary {
            track_index,
            transitions: transition_statistics(&pattern).transitions,
            min_run,
            max_run,
            zero_fraction,
        });
    }

    if report.efficiency < 0.5 {
        report.warnings.push(format!(
            "only {:.0}% of the code space is used",
            report.efficiency * 100.0
        ));
    }

    report.valid = report.errors.is_empty();
    report
}

/// `num_positions / 2^num_tracks`, capped at 1.
pub fn code_efficiency(num_positions: u32, num_tracks: u32) -> f64 {
    let capacity = 2f64.powi(num_tracks.min(1023) as i32);
    (f64::from(num_positions) / capacity).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn consecutive_values_differ_in_one_bit(n in 0u64..u64::MAX) {
            prop_assert_eq!((gray_value(n) ^ gray_value(n + 1)).count_ones(), 1);
        }

        #[test]
        fn gray_inverts(n in any::<u64>()) {
            prop_assert_eq!(gray_to_binary(gray_value(n)), n);
        }
    }

    #[test]
    fn test_power_of_two_boundaries() {
        for k in 1..63 {
            let below = (1u64 << k) - 1;
            assert_eq!((gray_value(below) ^ gray_value(below + 1)).count_ones(), 1);
        }
    }

    #[test]
    fn test_bits_for_position_fixture() {
        assert_eq!(bits_for_position(5, 5).unwrap(), vec![1, 1, 1, 0, 0]);
        assert!(matches!(
            bits_for_position(5, 65),
            Err(DomainError::TooManyBits { num_bits: 65 })
        ));
    }

    #[test]
    fn test_power_of_two_sequences_are_cyclic() {
        for bits in 1..=10 {
            let sequence = gray_sequence(1 << bits);
            let check = validate_single_bit_transitions(&sequence, true);
            assert!(check.valid, "{bits} bits: {:?}", check.offending);
        }
    }

    #[test]
    fn test_non_power_of_two_wrap_fails() {
        let sequence = gray_sequence(6);
        assert!(validate_single_bit_transitions(&sequence, false).valid);
        let cyclic = validate_single_bit_transitions(&sequence, true);
        assert!(!cyclic.valid);
        assert_eq!(cyclic.offending, vec![(5, 0)]);
    }

    #[test]
    fn test_empty_sequence_invalid() {
        assert!(!validate_single_bit_transitions(&[], true).valid);
    }

    #[test]
    fn test_track_pattern() {
        let msb = track_pattern(2, 8, 3).unwrap();
        assert_eq!(msb.bits(), &[0, 0, 0, 0, 1, 1, 1, 1]);
        let lsb = track_pattern(0, 8, 3).unwrap();
        assert_eq!(lsb.bits(), &[0, 1, 1, 0, 0, 1, 1, 0]);
        assert_eq!(
            track_pattern(3, 8, 3),
            Err(DomainError::TrackIndexOutOfRange {
                track_index: 3,
                num_bits: 3
            })
        );
    }

    #[test]
    fn test_transition_statistics_wraps() {
        // Ones at both ends join into one run of 3.
        let pattern = TrackPattern::from_bits([1, 1, 0, 0, 0, 1]);
        let stats = transition_statistics(&pattern);
        assert_eq!(stats.transitions, 2);
        assert_eq!(stats.one_runs, vec![3]);
        assert_eq!(stats.zero_runs, vec![3]);

        let uniform = transition_statistics(&TrackPattern::from_bits([0; 4]));
        assert_eq!(uniform.transitions, 0);
        assert_eq!(uniform.zero_runs, vec![4]);
    }

    #[test]
    fn test_pattern_runs() {
        let runs = pattern_runs(&TrackPattern::from_bits([0, 0, 1, 1, 1, 0]));
        assert_eq!(runs.len(), 3);
        assert_eq!(
            runs[1],
            PatternRun {
                value: 1,
                start: 2,
                length: 3
            }
        );
    }

    #[test]
    fn test_encoder_codes_report() {
        let report = validate_encoder_codes(32, 5);
        assert!(report.valid, "{:?}", report.errors);
        assert_eq!(report.tracks.len(), 5);
        assert_eq!(report.efficiency, 1.0);

        // Four tracks cannot give 32 positions unique codes.
        let short = validate_encoder_codes(32, 4);
        assert!(!short.valid);
    }

    #[test]
    fn test_code_efficiency() {
        assert_eq!(code_efficiency(32, 5), 1.0);
        assert_eq!(code_efficiency(16, 5), 0.5);
    }
}
