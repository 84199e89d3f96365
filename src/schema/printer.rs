//! Printer profiles: the single source of manufacturing tolerances.

use serde::{Deserialize, Serialize};

/// Manufacturing limits of the printer a disk is designed for.
///
/// Constraint checks and fitness scoring both read their minimums from this
/// value, so switching printers is a matter of selecting another profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterProfile {
    /// Profile name (for reports).
    pub name: String,
    /// Nozzle diameter in mm.
    pub nozzle_diameter_mm: f64,
    /// Layer height in mm.
    pub layer_height_mm: f64,
    /// Smallest printable solid feature (track width, spacing) in mm.
    pub min_feature_size_mm: f64,
    /// Smallest gap that prints open reliably, in mm.
    pub min_gap_size_mm: f64,
    /// Minimum wall thickness in mm.
    pub min_wall_thickness_mm: f64,
    /// Smallest printable hole diameter in mm.
    pub min_hole_diameter_mm: f64,
    /// Longest unsupported bridge in mm.
    pub max_bridge_distance_mm: f64,
    /// Largest disk diameter the build plate accepts, in mm.
    pub max_build_diameter_mm: f64,
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self::standard()
    }
}

impl PrinterProfile {
    /// 0.4mm nozzle, three perimeters.
    pub fn standard() -> Self {
        Self {
            name: "standard".to_string(),
            nozzle_diameter_mm: 0.4,
            layer_height_mm: 0.2,
            min_feature_size_mm: 0.4,
            min_gap_size_mm: 0.5,
            min_wall_thickness_mm: 1.2,
            min_hole_diameter_mm: 1.0,
            max_bridge_distance_mm: 5.0,
            max_build_diameter_mm: 250.0,
        }
    }

    /// 0.16mm line width, two perimeters.
    pub fn fine_line() -> Self {
        Self {
            name: "fine_line".to_string(),
            nozzle_diameter_mm: 0.16,
            layer_height_mm: 0.08,
            min_feature_size_mm: 0.16,
            min_gap_size_mm: 0.2,
            min_wall_thickness_mm: 0.32,
            min_hole_diameter_mm: 0.5,
            max_bridge_distance_mm: 3.0,
            max_build_diameter_mm: 250.0,
        }
    }

    /// Look up a built-in profile by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "standard" => Some(Self::standard()),
            "fine_line" => Some(Self::fine_line()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(PrinterProfile::by_name("standard"), Some(PrinterProfile::standard()));
        assert_eq!(PrinterProfile::by_name("fine_line"), Some(PrinterProfile::fine_line()));
        assert!(PrinterProfile::by_name("resin").is_none());
    }

    #[test]
    fn test_fine_line_is_finer() {
        let standard = PrinterProfile::standard();
        let fine = PrinterProfile::fine_line();
        assert!(fine.min_feature_size_mm < standard.min_feature_size_mm);
        assert!(fine.min_gap_size_mm < standard.min_gap_size_mm);
        assert!(fine.min_wall_thickness_mm < standard.min_wall_thickness_mm);
    }
}
