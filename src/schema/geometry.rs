//! Symbolic disk geometry produced by the assembler.
//!
//! Angles are in degrees measured counter-clockwise from the disk's 0° edge,
//! lengths in mm. Nothing here is rasterized: an external renderer turns a
//! [`DiskGeometry`] into a solid-modeling description.

use serde::{Deserialize, Serialize};

use super::FULL_CIRCLE_DEG;
use crate::compute::{DEFAULT_CHORD_ERROR_MM, sector_area, sector_outline, segment_count};

/// One maximal run of transmissive positions on a track, already expanded
/// by the cut overlap.
///
/// On a closed circle angles are read modulo 360°: a run that wraps past the
/// last position is a single interval with `end_deg > 360`, and a run that
/// starts at position 0 may have a slightly negative `start_deg`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoutInterval {
    pub start_deg: f64,
    pub end_deg: f64,
}

impl CutoutInterval {
    pub fn new(start_deg: f64, end_deg: f64) -> Self {
        Self { start_deg, end_deg }
    }

    /// Angular span in degrees.
    #[inline]
    pub fn span_deg(&self) -> f64 {
        self.end_deg - self.start_deg
    }

    /// Whether `angle_deg` lies inside the interval. With `cyclic` set, the
    /// angle is also tested one turn up and down.
    pub fn covers(&self, angle_deg: f64, cyclic: bool) -> bool {
        let inside = |a: f64| a >= self.start_deg && a <= self.end_deg;
        if cyclic {
            inside(angle_deg) || inside(angle_deg + FULL_CIRCLE_DEG) || inside(angle_deg - FULL_CIRCLE_DEG)
        } else {
            inside(angle_deg)
        }
    }
}

/// Radial band and cutouts of one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackGeometry {
    /// Track index (0 = outermost, carries the Gray LSB).
    pub track_index: u32,
    pub inner_radius_mm: f64,
    pub outer_radius_mm: f64,
    /// Cutouts ordered by start angle.
    pub cutouts: Vec<CutoutInterval>,
}

impl TrackGeometry {
    /// Radial width of the track band.
    #[inline]
    pub fn width_mm(&self) -> f64 {
        self.outer_radius_mm - self.inner_radius_mm
    }

    /// Radius halfway across the band.
    #[inline]
    pub fn center_radius_mm(&self) -> f64 {
        (self.outer_radius_mm + self.inner_radius_mm) / 2.0
    }

    /// Total angular span of all cutouts.
    pub fn open_span_deg(&self) -> f64 {
        self.cutouts.iter().map(CutoutInterval::span_deg).sum()
    }
}

/// Annular sector extruded along Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnularSector {
    pub inner_radius_mm: f64,
    pub outer_radius_mm: f64,
    pub start_deg: f64,
    pub end_deg: f64,
    /// Extrusion height.
    pub height_mm: f64,
    /// Z of the bottom face.
    pub z_offset_mm: f64,
}

impl AnnularSector {
    /// Planar area of the sector in mm².
    pub fn area_mm2(&self) -> f64 {
        sector_area(self.inner_radius_mm, self.outer_radius_mm, self.end_deg - self.start_deg)
    }

    /// Segments per arc that keep the outer edge within
    /// [`DEFAULT_CHORD_ERROR_MM`] of the true circle.
    pub fn outline_segments(&self) -> usize {
        segment_count(
            self.outer_radius_mm,
            self.end_deg - self.start_deg,
            DEFAULT_CHORD_ERROR_MM,
        )
    }

    /// Closed outline: outer arc counter-clockwise, then inner arc back.
    pub fn outline(&self, segments: usize) -> Vec<(f64, f64)> {
        sector_outline(
            self.inner_radius_mm,
            self.outer_radius_mm,
            self.start_deg,
            self.end_deg,
            segments,
        )
    }

    /// Whether the sector encloses no area.
    pub fn is_degenerate(&self) -> bool {
        !(self.outer_radius_mm > self.inner_radius_mm)
            || !(self.end_deg > self.start_deg)
            || !(self.height_mm > 0.0)
    }
}

/// Rectangular limit-switch bumper standing out from the rim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bumper {
    /// Angle of the bumper's centre line.
    pub angle_deg: f64,
    /// Distance from the disk centre to the bumper's centre.
    pub center_radius_mm: f64,
    /// Radial length.
    pub length_mm: f64,
    /// Tangential width.
    pub width_mm: f64,
    pub height_mm: f64,
}

impl Bumper {
    /// Radial extent `(near, far)` of the bumper.
    pub fn radial_extent_mm(&self) -> (f64, f64) {
        let half = self.length_mm / 2.0;
        (self.center_radius_mm - half, self.center_radius_mm + half)
    }
}

/// Final disk: `(base ∪ bumpers) − ⋃ cutouts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskGeometry {
    pub base: AnnularSector,
    pub bumpers: Vec<Bumper>,
    /// Tracks ordered outermost first.
    pub tracks: Vec<TrackGeometry>,
    /// Height of every cutout extrusion; exceeds the disk thickness.
    pub cut_height_mm: f64,
    /// Z of the cutout extrusions' bottom face (below the disk).
    pub cut_z_offset_mm: f64,
    /// Whether track patterns wrap around (closed circle).
    pub full_circle: bool,
}

impl DiskGeometry {
    #[inline]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Track with the smallest radius.
    pub fn innermost_track(&self) -> Option<&TrackGeometry> {
        self.tracks.iter().min_by(|a, b| a.inner_radius_mm.total_cmp(&b.inner_radius_mm))
    }

    /// Every cutout as an extruded sector, in track order.
    pub fn cutout_sectors(&self) -> Vec<AnnularSector> {
        self.tracks
            .iter()
            .flat_map(|track| {
                track.cutouts.iter().map(move |cut| AnnularSector {
                    inner_radius_mm: track.inner_radius_mm,
                    outer_radius_mm: track.outer_radius_mm,
                    start_deg: cut.start_deg,
                    end_deg: cut.end_deg,
                    height_mm: self.cut_height_mm,
                    z_offset_mm: self.cut_z_offset_mm,
                })
            })
            .collect()
    }

    /// Total number of cutout primitives.
    pub fn cutout_count(&self) -> usize {
        self.tracks.iter().map(|t| t.cutouts.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_cover_wraps() {
        let wrapping = CutoutInterval::new(315.0, 405.0);
        assert!(wrapping.covers(350.0, true));
        assert!(wrapping.covers(20.0, true));
        assert!(!wrapping.covers(20.0, false));
        assert!(!wrapping.covers(60.0, true));
    }

    #[test]
    fn test_sector_degenerate() {
        let sector = AnnularSector {
            inner_radius_mm: 10.0,
            outer_radius_mm: 10.0,
            start_deg: 0.0,
            end_deg: 30.0,
            height_mm: 2.0,
            z_offset_mm: 0.0,
        };
        assert!(sector.is_degenerate());
        assert_eq!(sector.area_mm2(), 0.0);
    }

    #[test]
    fn test_bumper_extent() {
        let bumper = Bumper {
            angle_deg: 0.0,
            center_radius_mm: 60.0,
            length_mm: 4.0,
            width_mm: 3.0,
            height_mm: 2.0,
        };
        assert_eq!(bumper.radial_extent_mm(), (58.0, 62.0));
    }
}
