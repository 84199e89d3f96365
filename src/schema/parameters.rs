//! Encoder disk parameter set and named presets.

use serde::{Deserialize, Serialize};

use super::PrinterProfile;

/// Arc angles at or above this are treated as a closed circle.
pub const FULL_CIRCLE_DEG: f64 = 360.0;

/// Complete parameter set for one encoder disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderParameters {
    /// Outer diameter of the disk in mm.
    pub outer_diameter_mm: f64,
    /// Diameter of the mounting hole in mm.
    pub inner_diameter_mm: f64,
    /// Disk thickness in mm.
    pub disk_thickness_mm: f64,
    /// Angular sweep of the disk sector in degrees.
    pub arc_angle_deg: f64,
    /// Number of encoded positions.
    pub num_positions: u32,
    /// Number of concentric tracks (bits).
    pub num_tracks: u32,
    /// Radial width of each track in mm.
    pub track_width_mm: f64,
    /// Radial solid web between adjacent tracks in mm.
    pub track_spacing_mm: f64,
    /// Optical gap angle in degrees.
    pub gap_angle_deg: f64,
    /// Radial extension of the limit bumpers beyond the rim in mm.
    pub bump_extension_mm: f64,
    /// Angular width of the limit bumpers in degrees.
    pub bump_width_deg: f64,
    /// Manufacturing limits.
    pub printer: PrinterProfile,
}

impl Default for EncoderParameters {
    fn default() -> Self {
        Self {
            outer_diameter_mm: 116.2,
            inner_diameter_mm: 35.6,
            disk_thickness_mm: 2.3,
            arc_angle_deg: 57.1,
            num_positions: 32,
            num_tracks: 5,
            track_width_mm: 3.3,
            track_spacing_mm: 1.7,
            gap_angle_deg: 2.8,
            bump_extension_mm: 5.8,
            bump_width_deg: 3.0,
            printer: PrinterProfile::standard(),
        }
    }
}

impl EncoderParameters {
    /// Outer radius in mm.
    #[inline]
    pub fn radius_outer(&self) -> f64 {
        self.outer_diameter_mm / 2.0
    }

    /// Inner radius in mm.
    #[inline]
    pub fn radius_inner(&self) -> f64 {
        self.inner_diameter_mm / 2.0
    }

    /// Radial band available for tracks.
    #[inline]
    pub fn usable_radius_mm(&self) -> f64 {
        self.radius_outer() - self.radius_inner()
    }

    /// Angular span of one position in degrees.
    pub fn angular_resolution_deg(&self) -> f64 {
        crate::compute::angular_resolution(self.arc_angle_deg, self.num_positions)
    }

    /// Distance between corresponding edges of adjacent tracks.
    pub fn track_pitch_mm(&self) -> f64 {
        crate::compute::track_pitch(self.track_width_mm, self.track_spacing_mm)
    }

    /// Bits needed to give every position a distinct code.
    pub fn required_bits(&self) -> u32 {
        required_bits(self.num_positions)
    }

    /// Whether the sector closes on itself, making track patterns cyclic.
    #[inline]
    pub fn is_full_circle(&self) -> bool {
        self.arc_angle_deg >= FULL_CIRCLE_DEG
    }

    /// Parameters of a named preset.
    pub fn from_preset(preset: Preset) -> Self {
        preset.parameters()
    }
}

/// `ceil(log2(n))`, with 0 for `n <= 1`.
pub fn required_bits(num_positions: u32) -> u32 {
    if num_positions <= 1 {
        0
    } else {
        u32::BITS - (num_positions - 1).leading_zeros()
    }
}

/// Named parameter presets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// The reference 32-position rudder disk.
    #[default]
    Default,
    /// 64 positions on a larger disk.
    HighResolution,
    /// 8 positions on a small disk.
    Compact,
}

impl Preset {
    /// Build the parameter set for this preset.
    pub fn parameters(self) -> EncoderParameters {
        match self {
            Preset::Default => EncoderParameters::default(),
            Preset::HighResolution => EncoderParameters {
                num_positions: 64,
                num_tracks: 6,
                outer_diameter_mm: 120.0,
                gap_angle_deg: 1.5,
                ..Default::default()
            },
            Preset::Compact => EncoderParameters {
                num_positions: 8,
                num_tracks: 3,
                outer_diameter_mm: 70.0,
                track_width_mm: 5.0,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_bits() {
        assert_eq!(required_bits(0), 0);
        assert_eq!(required_bits(1), 0);
        assert_eq!(required_bits(2), 1);
        assert_eq!(required_bits(16), 4);
        assert_eq!(required_bits(17), 5);
        assert_eq!(required_bits(32), 5);
        assert_eq!(required_bits(33), 6);
    }

    #[test]
    fn test_default_derived_values() {
        let params = EncoderParameters::default();
        assert!((params.radius_outer() - 58.1).abs() < 1e-9);
        assert!((params.radius_inner() - 17.8).abs() < 1e-9);
        assert!((params.track_pitch_mm() - 5.0).abs() < 1e-9);
        assert_eq!(params.required_bits(), params.num_tracks);
        assert!(!params.is_full_circle());
    }

    #[test]
    fn test_presets_match_bit_count() {
        for preset in [Preset::Default, Preset::HighResolution, Preset::Compact] {
            let params = EncoderParameters::from_preset(preset);
            assert_eq!(params.required_bits(), params.num_tracks, "{preset:?}");
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: EncoderParameters =
            serde_json::from_str(r#"{"num_positions": 16, "num_tracks": 4}"#).unwrap();
        assert_eq!(params.num_positions, 16);
        assert_eq!(params.outer_diameter_mm, 116.2);
        assert_eq!(params.printer, PrinterProfile::standard());
    }
}
