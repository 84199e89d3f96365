//! Compiles Gray-code track patterns into angular cutout intervals.
//!
//! Each maximal run of `1`s becomes one interval rather than one primitive
//! per position. Run boundaries are widened by a small overlap so adjacent
//! extrusions fuse and the cut clears material despite tessellation error.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constraints::{gap_linear_size, track_inner_radius, track_outer_radius};
use super::gray::{DomainError, TrackPattern, pattern_runs, track_pattern};
use crate::schema::{CutoutInterval, EncoderParameters, FULL_CIRCLE_DEG, TrackGeometry};

/// Default widening of each cutout boundary, in degrees.
pub const DEFAULT_OVERLAP_DEG: f64 = 0.1;

/// Errors from building track geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error(
        "track {track_index} inner radius {inner_radius_mm:.3} mm is below the disk inner radius {min_radius_mm:.3} mm"
    )]
    TrackBelowInnerRadius {
        track_index: u32,
        inner_radius_mm: f64,
        min_radius_mm: f64,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Overlap actually applied for a position pitch of `step_deg`.
///
/// Capped at a quarter pitch so widened intervals never meet across a solid
/// position and every position centre keeps its value.
#[inline]
pub fn effective_overlap_deg(overlap_deg: f64, step_deg: f64) -> f64 {
    overlap_deg.max(0.0).min(step_deg.abs() / 4.0)
}

/// Cutout intervals for a pattern spread evenly over `arc_angle_deg`.
///
/// On a partial arc, intervals are clamped to `[0, arc]`. On a full circle
/// (arc >= 360°) the pattern is cyclic: a run crossing the last/first
/// boundary is one interval ending past 360°, listed last.
pub fn compile_cutouts(
    pattern: &TrackPattern,
    arc_angle_deg: f64,
    overlap_deg: f64,
) -> Vec<CutoutInterval> {
    let n = pattern.len();
    if n == 0 || pattern.ones() == 0 {
        return Vec::new();
    }

    let cyclic = arc_angle_deg >= FULL_CIRCLE_DEG;
    if pattern.ones() == n {
        let end = if cyclic { FULL_CIRCLE_DEG } else { arc_angle_deg };
        return vec![CutoutInterval::new(0.0, end)];
    }

    let step = arc_angle_deg / n as f64;
    let overlap = effective_overlap_deg(overlap_deg, step);

    let mut runs: Vec<(usize, usize)> = pattern_runs(pattern)
        .into_iter()
        .filter(|r| r.value == 1)
        .map(|r| (r.start, r.length))
        .collect();

    if cyclic && runs.len() > 1 {
        let (first_start, head) = runs[0];
        let (last_start, last_len) = runs[runs.len() - 1];
        if first_start == 0 && last_start + last_len == n {
            runs.remove(0);
            if let Some(last) = runs.last_mut() {
                last.1 += head;
            }
        }
    }

    runs.into_iter()
        .map(|(start, length)| {
            let lo = start as f64 * step - overlap;
            let hi = (start + length) as f64 * step + overlap;
            if cyclic {
                CutoutInterval::new(lo, hi)
            } else {
                CutoutInterval::new(lo.max(0.0), hi.min(arc_angle_deg))
            }
        })
        .collect()
}

/// Read a pattern back from intervals by testing each position centre.
pub fn decode_cutouts(
    intervals: &[CutoutInterval],
    num_positions: usize,
    arc_angle_deg: f64,
) -> TrackPattern {
    if num_positions == 0 {
        return TrackPattern::default();
    }
    let cyclic = arc_angle_deg >= FULL_CIRCLE_DEG;
    let step = arc_angle_deg / num_positions as f64;
    TrackPattern::from_bits((0..num_positions).map(|p| {
        let centre = (p as f64 + 0.5) * step;
        u8::from(intervals.iter().any(|i| i.covers(centre, cyclic)))
    }))
}

/// Radii and cutouts of one track.
pub fn compile_track_geometry(
    track_index: u32,
    params: &EncoderParameters,
) -> Result<TrackGeometry, GeometryError> {
    let pattern = track_pattern(track_index, params.num_positions, params.num_tracks)?;

    let outer = track_outer_radius(params.radius_outer(), track_index, params.track_pitch_mm());
    let inner = track_inner_radius(outer, params.track_width_mm);
    if inner < params.radius_inner() {
        return Err(GeometryError::TrackBelowInnerRadius {
            track_index,
            inner_radius_mm: inner,
            min_radius_mm: params.radius_inner(),
        });
    }

    let cutouts = compile_cutouts(&pattern, params.arc_angle_deg, DEFAULT_OVERLAP_DEG);
    debug!(
        "Track {}: r=[{:.2}, {:.2}] mm, {} cutouts",
        track_index,
        inner,
        outer,
        cutouts.len()
    );

    Ok(TrackGeometry {
        track_index,
        inner_radius_mm: inner,
        outer_radius_mm: outer,
        cutouts,
    })
}

/// One run of equal values, measured at its track's centre radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFeature {
    pub value: u8,
    pub start: usize,
    pub length_positions: usize,
    pub angle_deg: f64,
    pub size_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFeatures {
    pub track_index: u32,
    pub radius_mm: f64,
    pub runs: Vec<RunFeature>,
    pub min_feature_mm: f64,
    pub max_feature_mm: f64,
}

/// Physical size of every solid and open run on the disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureAnalysis {
    pub tracks: Vec<TrackFeatures>,
    pub min_feature_size_mm: f64,
    pub max_feature_size_mm: f64,
    /// Whether the smallest run is at least the printer's minimum gap.
    pub printable: bool,
}

pub fn feature_analysis(params: &EncoderParameters) -> Result<FeatureAnalysis, DomainError> {
    let step = params.angular_resolution_deg();
    let mut tracks = Vec::with_capacity(params.num_tracks as usize);
    let mut min_all = f64::INFINITY;
    let mut max_all: f64 = 0.0;

    for track_index in 0..params.num_tracks {
        let pattern = track_pattern(track_index, params.num_positions, params.num_tracks)?;
        let outer = track_outer_radius(params.radius_outer(), track_index, params.track_pitch_mm());
        let radius = outer - params.track_width_mm / 2.0;

        let runs: Vec<RunFeature> = pattern_runs(&pattern)
            .into_iter()
            .map(|run| {
                let angle_deg = run.length as f64 * step;
                RunFeature {
                    value: run.value,
                    start: run.start,
                    length_positions: run.length,
                    angle_deg,
                    size_mm: gap_linear_size(angle_deg, radius),
                }
            })
            .collect();

        let min_feature_mm = runs.iter().map(|r| r.size_mm).fold(f64::INFINITY, f64::min);
        let max_feature_mm = runs.iter().map(|r| r.size_mm).fold(0.0, f64::max);
        min_all = min_all.min(min_feature_mm);
        max_all = max_all.max(max_feature_mm);

        tracks.push(TrackFeatures {
            track_index,
            radius_mm: radius,
            runs,
            min_feature_mm,
            max_feature_mm,
        });
    }

    let min_feature_size_mm = if min_all.is_finite() { min_all } else { 0.0 };
    Ok(FeatureAnalysis {
        printable: !tracks.is_empty() && min_feature_size_mm >= params.printer.min_gap_size_mm,
        tracks,
        min_feature_size_mm,
        max_feature_size_mm: max_all,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(bits: [u8; 8], arc: f64) {
        let pattern = TrackPattern::from_bits(bits);
        let cutouts = compile_cutouts(&pattern, arc, DEFAULT_OVERLAP_DEG);
        assert_eq!(decode_cutouts(&cutouts, 8, arc), pattern, "arc {arc}: {cutouts:?}");
    }

    #[test]
    fn test_round_trip_patterns() {
        for arc in [57.1, 360.0] {
            round_trip([0, 0, 1, 1, 1, 1, 0, 0], arc);
            round_trip([1, 1, 1, 1, 1, 1, 1, 1], arc);
            round_trip([0, 0, 0, 0, 0, 0, 0, 0], arc);
            round_trip([0, 1, 0, 0, 0, 0, 0, 0], arc);
            round_trip([1, 1, 0, 0, 0, 0, 1, 1], arc);
        }
    }

    #[test]
    fn test_single_run_gets_overlap() {
        let pattern = TrackPattern::from_bits([0, 1, 0, 0, 0, 0, 0, 0]);
        let cutouts = compile_cutouts(&pattern, 80.0, 0.1);
        assert_eq!(cutouts.len(), 1);
        assert!((cutouts[0].start_deg - 9.9).abs() < 1e-9);
        assert!((cutouts[0].end_deg - 20.1).abs() < 1e-9);
    }

    #[test]
    fn test_partial_arc_clamps_to_edges() {
        let pattern = TrackPattern::from_bits([1, 0, 0, 1]);
        let cutouts = compile_cutouts(&pattern, 40.0, 0.5);
        assert_eq!(cutouts.len(), 2);
        assert_eq!(cutouts[0].start_deg, 0.0);
        assert_eq!(cutouts[1].end_deg, 40.0);

        let full = compile_cutouts(&TrackPattern::from_bits([1; 4]), 40.0, 0.5);
        assert_eq!(full, vec![CutoutInterval::new(0.0, 40.0)]);
        assert!(compile_cutouts(&TrackPattern::from_bits([0; 4]), 40.0, 0.5).is_empty());
    }

    #[test]
    fn test_full_circle_wraps_into_one_interval() {
        let pattern = TrackPattern::from_bits([1, 1, 0, 0, 1, 0, 1, 1]);
        let cutouts = compile_cutouts(&pattern, 360.0, 0.1);
        assert_eq!(cutouts.len(), 2);
        // Positions 6, 7, 0, 1 form one run from 270° to 450°.
        let wrap = cutouts[1];
        assert!((wrap.start_deg - 269.9).abs() < 1e-9);
        assert!((wrap.end_deg - 450.1).abs() < 1e-9);
        assert!(cutouts[0].start_deg < wrap.start_deg);

        let ring = compile_cutouts(&TrackPattern::from_bits([1; 8]), 360.0, 0.1);
        assert_eq!(ring, vec![CutoutInterval::new(0.0, 360.0)]);
    }

    #[test]
    fn test_overlap_capped_by_pitch() {
        assert_eq!(effective_overlap_deg(0.1, 2.0), 0.1);
        assert_eq!(effective_overlap_deg(1.0, 2.0), 0.5);
        assert_eq!(effective_overlap_deg(-1.0, 2.0), 0.0);
    }

    #[test]
    fn test_track_geometry_default() {
        let params = EncoderParameters::default();
        let outer = compile_track_geometry(0, &params).unwrap();
        assert!((outer.outer_radius_mm - 58.1).abs() < 1e-9);
        assert!((outer.width_mm() - 3.3).abs() < 1e-9);

        let msb = compile_track_geometry(4, &params).unwrap();
        assert_eq!(msb.cutouts.len(), 1);
        // Upper half of the arc is open.
        assert!((msb.cutouts[0].end_deg - params.arc_angle_deg).abs() < 1e-9);
    }

    #[test]
    fn test_track_geometry_errors() {
        let params = EncoderParameters::default();
        assert!(matches!(
            compile_track_geometry(5, &params),
            Err(GeometryError::Domain(DomainError::TrackIndexOutOfRange { .. }))
        ));

        let cramped = EncoderParameters {
            outer_diameter_mm: 60.0,
            ..Default::default()
        };
        assert!(matches!(
            compile_track_geometry(4, &cramped),
            Err(GeometryError::TrackBelowInnerRadius { track_index: 4, .. })
        ));
    }

    #[test]
    fn test_feature_analysis() {
        let analysis = feature_analysis(&EncoderParameters::default()).unwrap();
        assert_eq!(analysis.tracks.len(), 5);
        assert!(analysis.printable);
        assert!(analysis.min_feature_size_mm > 0.5);
        assert!(analysis.max_feature_size_mm >= analysis.min_feature_size_mm);
        // MSB track: two runs of 16 positions.
        assert_eq!(analysis.tracks[4].runs.len(), 2);
    }
}
