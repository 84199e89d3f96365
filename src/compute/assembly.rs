//! Assembles the full disk from its base sector, bumpers and tracks.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::arc::{arc_length, chord_length, sector_area};
use super::constraints::gap_linear_size;
use super::gray::code_efficiency;
use super::tracks::{GeometryError, compile_track_geometry};
use crate::schema::{AnnularSector, Bumper, DiskGeometry, EncoderParameters};

/// Extra height added to each through-cut beyond the disk thickness.
pub const CUT_CLEARANCE_MM: f64 = 2.0;

/// Largest open fraction a track may have before it is treated as a
/// misconfiguration.
pub const MAX_OPEN_FRACTION: f64 = 0.95;

/// Bumpers may reach at most this multiple of the outer radius.
pub const MAX_BUMPER_REACH: f64 = 1.2;

/// Bumpers sit flush on the rim; contact within this distance is not overlap.
const RADIAL_TOLERANCE_MM: f64 = 1e-6;

/// Build the disk geometry for `params`.
///
/// The solid is `(base ∪ bumpers) − ⋃ cutouts`, with every cutout extruded
/// from below the disk to above it.
pub fn assemble(
    params: &EncoderParameters,
    include_bumpers: bool,
) -> Result<DiskGeometry, GeometryError> {
    let base = AnnularSector {
        inner_radius_mm: params.radius_inner(),
        outer_radius_mm: params.radius_outer(),
        start_deg: 0.0,
        end_deg: params.arc_angle_deg,
        height_mm: params.disk_thickness_mm,
        z_offset_mm: 0.0,
    };

    let tracks = (0..params.num_tracks)
        .map(|i| compile_track_geometry(i, params))
        .collect::<Result<Vec<_>, _>>()?;

    let bumpers = if include_bumpers {
        limit_bumpers(params)
    } else {
        Vec::new()
    };

    let geometry = DiskGeometry {
        base,
        bumpers,
        tracks,
        cut_height_mm: params.disk_thickness_mm + CUT_CLEARANCE_MM,
        cut_z_offset_mm: -CUT_CLEARANCE_MM / 2.0,
        full_circle: params.is_full_circle(),
    };

    debug!(
        "Assembled disk: {} tracks, {} cutouts, {} bumpers",
        geometry.track_count(),
        geometry.cutout_count(),
        geometry.bumpers.len()
    );
    Ok(geometry)
}

/// Bumpers at both ends of the arc, standing radially out from the rim.
fn limit_bumpers(params: &EncoderParameters) -> Vec<Bumper> {
    let radius = params.radius_outer();
    let width = gap_linear_size(params.bump_width_deg, radius);
    [0.0, params.arc_angle_deg]
        .into_iter()
        .map(|angle_deg| Bumper {
            angle_deg,
            center_radius_mm: radius + params.bump_extension_mm / 2.0,
            length_mm: params.bump_extension_mm,
            width_mm: width,
            height_mm: params.disk_thickness_mm,
        })
        .collect()
}

/// Consistency problems in an assembled disk.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum AssemblyIssue {
    #[error("base sector encloses no area")]
    DegenerateBase,

    #[error("track {track_index} has no radial extent")]
    DegenerateTrack { track_index: u32 },

    #[error("track {track_index} has an empty cutout at {start_deg:.2}°")]
    DegenerateCutout { track_index: u32, start_deg: f64 },

    #[error("bumper at {angle_deg:.1}° overlaps track {track_index} radially")]
    BumperOverlapsTrack { angle_deg: f64, track_index: u32 },

    #[error("bumper at {angle_deg:.1}° reaches {reach_mm:.2} mm, beyond {limit_mm:.2} mm")]
    BumperTooLong {
        angle_deg: f64,
        reach_mm: f64,
        limit_mm: f64,
    },

    #[error("track {track_index} is {percent:.0}% open")]
    MostlyOpenTrack { track_index: u32, percent: f64 },

    #[error("cut height {cut_height_mm:.2} mm does not pass through the disk")]
    CutNotThrough { cut_height_mm: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyReport {
    pub valid: bool,
    pub issues: Vec<AssemblyIssue>,
}

/// Sanity checks on an assembled disk.
pub fn validate_assembly(geometry: &DiskGeometry) -> AssemblyReport {
    let mut issues = Vec::new();
    let base = &geometry.base;

    if base.is_degenerate() {
        issues.push(AssemblyIssue::DegenerateBase);
    }

    let arc_span = if geometry.full_circle {
        360.0
    } else {
        base.end_deg - base.start_deg
    };

    for track in &geometry.tracks {
        if !(track.width_mm() > 0.0) {
            issues.push(AssemblyIssue::DegenerateTrack {
                track_index: track.track_index,
            });
        }
        for cut in &track.cutouts {
            if !(cut.span_deg() > 0.0) {
                issues.push(AssemblyIssue::DegenerateCutout {
                    track_index: track.track_index,
                    start_deg: cut.start_deg,
                });
            }
        }
        // A full ring is a legitimate always-open track only on a closed circle.
        if arc_span > 0.0 && !(geometry.full_circle && track.cutouts.len() == 1) {
            let fraction = track.open_span_deg() / arc_span;
            if fraction > MAX_OPEN_FRACTION {
                issues.push(AssemblyIssue::MostlyOpenTrack {
                    track_index: track.track_index,
                    percent: fraction * 100.0,
                });
            }
        }
    }

    let limit = MAX_BUMPER_REACH * base.outer_radius_mm;
    for bumper in &geometry.bumpers {
        let (near, far) = bumper.radial_extent_mm();
        for track in &geometry.tracks {
            if near < track.outer_radius_mm - RADIAL_TOLERANCE_MM
                && far > track.inner_radius_mm + RADIAL_TOLERANCE_MM
            {
                issues.push(AssemblyIssue::BumperOverlapsTrack {
                    angle_deg: bumper.angle_deg,
                    track_index: track.track_index,
                });
            }
        }
        if far > limit {
            issues.push(AssemblyIssue::BumperTooLong {
                angle_deg: bumper.angle_deg,
                reach_mm: far,
                limit_mm: limit,
            });
        }
    }

    let cut_bottom = geometry.cut_z_offset_mm;
    let cut_top = cut_bottom + geometry.cut_height_mm;
    if cut_bottom >= base.z_offset_mm || cut_top <= base.z_offset_mm + base.height_mm {
        issues.push(AssemblyIssue::CutNotThrough {
            cut_height_mm: geometry.cut_height_mm,
        });
    }

    for issue in &issues {
        warn!("Assembly issue: {issue}");
    }

    AssemblyReport {
        valid: issues.is_empty(),
        issues,
    }
}

/// Summary figures for a generated disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyInfo {
    pub num_tracks: usize,
    pub num_cutouts: usize,
    pub num_bumpers: usize,
    pub base_area_mm2: f64,
    pub open_area_mm2: f64,
    /// Fraction of the base area removed by cutouts.
    pub open_fraction: f64,
    pub outer_arc_length_mm: f64,
    pub inner_arc_length_mm: f64,
    /// Straight distance between the rim corners of the sector.
    pub outer_chord_mm: f64,
    /// Radial room between the mounting hole and the rim.
    pub usable_radius_mm: f64,
    /// Segments per arc for a polygonal outline of the base.
    pub outline_segments: usize,
    pub angular_resolution_deg: f64,
    pub encoding_efficiency: f64,
}

pub fn assembly_info(geometry: &DiskGeometry, params: &EncoderParameters) -> AssemblyInfo {
    let base = &geometry.base;
    let base_area = base.area_mm2();
    let open_area: f64 = geometry
        .tracks
        .iter()
        .flat_map(|t| {
            t.cutouts
                .iter()
                .map(|c| sector_area(t.inner_radius_mm, t.outer_radius_mm, c.span_deg()))
        })
        .sum();
    let span = base.end_deg - base.start_deg;

    AssemblyInfo {
        num_tracks: geometry.track_count(),
        num_cutouts: geometry.cutout_count(),
        num_bumpers: geometry.bumpers.len(),
        base_area_mm2: base_area,
        open_area_mm2: open_area,
        open_fraction: if base_area > 0.0 {
            open_area / base_area
        } else {
            0.0
        },
        outer_arc_length_mm: arc_length(base.outer_radius_mm, span),
        inner_arc_length_mm: arc_length(base.inner_radius_mm, span),
        outer_chord_mm: chord_length(base.outer_radius_mm, span),
        usable_radius_mm: params.usable_radius_mm(),
        outline_segments: base.outline_segments(),
        angular_resolution_deg: params.angular_resolution_deg(),
        encoding_efficiency: code_efficiency(params.num_positions, params.num_tracks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_default() {
        let params = EncoderParameters::default();
        let geometry = assemble(&params, true).unwrap();
        assert_eq!(geometry.track_count(), 5);
        assert_eq!(geometry.bumpers.len(), 2);
        assert_eq!(geometry.bumpers[1].angle_deg, params.arc_angle_deg);
        assert!((geometry.cut_height_mm - 4.3).abs() < 1e-9);
        assert_eq!(geometry.cut_z_offset_mm, -1.0);

        let innermost = geometry.innermost_track().unwrap();
        assert!(innermost.inner_radius_mm >= params.radius_inner());

        let report = validate_assembly(&geometry);
        assert!(report.valid, "{:?}", report.issues);
    }

    #[test]
    fn test_assemble_without_bumpers() {
        let geometry = assemble(&EncoderParameters::default(), false).unwrap();
        assert!(geometry.bumpers.is_empty());
    }

    #[test]
    fn test_assemble_propagates_track_error() {
        let params = EncoderParameters {
            outer_diameter_mm: 60.0,
            ..Default::default()
        };
        assert!(matches!(
            assemble(&params, true),
            Err(GeometryError::TrackBelowInnerRadius { .. })
        ));
    }

    #[test]
    fn test_validate_flags_issues() {
        let params = EncoderParameters::default();
        let mut geometry = assemble(&params, true).unwrap();
        geometry.cut_height_mm = params.disk_thickness_mm;
        geometry.bumpers[0].length_mm = 40.0;
        geometry.tracks[2].cutouts = vec![crate::schema::CutoutInterval::new(0.0, params.arc_angle_deg)];

        let issues = validate_assembly(&geometry).issues;
        assert!(issues.contains(&AssemblyIssue::CutNotThrough {
            cut_height_mm: params.disk_thickness_mm
        }));
        assert!(issues.iter().any(|i| matches!(i, AssemblyIssue::BumperTooLong { .. })));
        assert!(issues.iter().any(|i| matches!(i, AssemblyIssue::BumperOverlapsTrack { .. })));
        assert!(issues
            .iter()
            .any(|i| matches!(i, AssemblyIssue::MostlyOpenTrack { track_index: 2, .. })));
    }

    #[test]
    fn test_assembly_info() {
        let params = EncoderParameters::default();
        let geometry = assemble(&params, true).unwrap();
        let info = assembly_info(&geometry, &params);
        assert_eq!(info.num_tracks, 5);
        assert_eq!(info.encoding_efficiency, 1.0);
        assert!(info.open_fraction > 0.0 && info.open_fraction < 1.0);
        assert!(info.outer_arc_length_mm > info.inner_arc_length_mm);
        assert!(info.outer_chord_mm < info.outer_arc_length_mm);
        assert!((info.usable_radius_mm - 40.3).abs() < 1e-9);
        assert!(info.outline_segments >= 3);
        assert_eq!(
            geometry.base.outline(info.outline_segments).len(),
            2 * (info.outline_segments + 1)
        );
    }
}
