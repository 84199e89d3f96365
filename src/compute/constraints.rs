//! Geometric and manufacturing constraints on an encoder parameter set.
//!
//! Every check is a pure function of [`EncoderParameters`] producing one or
//! more [`ConstraintCheck`]s. [`evaluate_checks`] runs them in a fixed order
//! and nothing here fails: infeasibility is returned as data so callers can
//! decide whether it is an error (validation) or a score (fitness).

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::gray::{
    TrackPattern, pattern_runs, track_pattern, transition_statistics, validate_encoder_codes,
};
use super::tracks::{DEFAULT_OVERLAP_DEG, effective_overlap_deg};
use crate::schema::{EncoderParameters, Gene, GenomeConstraints};

/// Largest track count accepted.
pub const MAX_TRACKS: u32 = 32;

/// Largest position count accepted. Larger disks are rejected before any
/// per-position pattern is built.
pub const MAX_POSITIONS: u32 = 1 << 20;

/// Minimum number of layers the disk must be printed with.
pub const MIN_LAYERS: f64 = 3.0;

/// Distance between corresponding edges of adjacent tracks.
#[inline]
pub fn track_pitch(width_mm: f64, spacing_mm: f64) -> f64 {
    width_mm + spacing_mm
}

/// Outer radius of track `track_index` (0 = outermost).
#[inline]
pub fn track_outer_radius(outer_radius_mm: f64, track_index: u32, pitch_mm: f64) -> f64 {
    outer_radius_mm - f64::from(track_index) * pitch_mm
}

/// Inner radius of a track given its outer radius.
#[inline]
pub fn track_inner_radius(track_outer_radius_mm: f64, width_mm: f64) -> f64 {
    track_outer_radius_mm - width_mm
}

/// Arc length subtended by `angle_deg` at `radius_mm`.
#[inline]
pub fn gap_linear_size(angle_deg: f64, radius_mm: f64) -> f64 {
    angle_deg * PI * radius_mm / 180.0
}

/// Angular span of one position.
#[inline]
pub fn angular_resolution(arc_angle_deg: f64, num_positions: u32) -> f64 {
    if num_positions == 0 {
        0.0
    } else {
        arc_angle_deg / f64::from(num_positions)
    }
}

/// Which constraint a check evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    Radii,
    ArcAngle,
    PositionCount,
    TrackCount,
    CodeCapacity,
    TrackFit,
    GapSize,
    WallThickness,
    FeatureSize,
    DiskThickness,
    HoleDiameter,
    BuildVolume,
}

impl ConstraintKind {
    /// Whether the check only gets easier as track width and spacing shrink
    /// and the gap angle grows, so the bound corner decides it.
    pub fn monotone_in_genes(self) -> bool {
        matches!(self, Self::TrackFit | Self::GapSize)
    }

    /// Relative importance when checks are scored rather than gated.
    pub fn weight(self) -> f64 {
        match self {
            Self::GapSize | Self::FeatureSize => 2.0,
            _ => 1.0,
        }
    }
}

/// Result of one constraint evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintCheck {
    pub kind: ConstraintKind,
    pub passed: bool,
    /// Bound the value is compared against.
    pub required: f64,
    pub actual: f64,
    /// Signed distance from the bound, relative to the bound. Positive when
    /// the constraint holds.
    pub margin: f64,
    pub weight: f64,
    pub message: String,
    /// Genes whose values feed this check.
    #[serde(skip)]
    pub reads: Vec<Gene>,
}

impl ConstraintCheck {
    /// `actual >= required`.
    pub fn at_least(kind: ConstraintKind, actual: f64, required: f64, what: &str) -> Self {
        let passed = actual >= required;
        let margin = relative_margin(actual - required, required);
        let message = if passed {
            format!("{what} {actual:.3} meets minimum {required:.3}")
        } else {
            format!("{what} {actual:.3} below minimum {required:.3}")
        };
        Self {
            kind,
            passed,
            required,
            actual,
            margin,
            weight: kind.weight(),
            message,
            reads: Vec::new(),
        }
    }

    /// `actual <= required`.
    pub fn at_most(kind: ConstraintKind, actual: f64, required: f64, what: &str) -> Self {
        let passed = actual <= required;
        let margin = relative_margin(required - actual, required);
        let message = if passed {
            format!("{what} {actual:.3} within maximum {required:.3}")
        } else {
            format!("{what} {actual:.3} exceeds maximum {required:.3}")
        };
        Self {
            kind,
            passed,
            required,
            actual,
            margin,
            weight: kind.weight(),
            message,
            reads: Vec::new(),
        }
    }

    /// Boolean condition with no meaningful magnitude.
    pub fn predicate(kind: ConstraintKind, passed: bool, message: impl Into<String>) -> Self {
        Self {
            kind,
            passed,
            required: 1.0,
            actual: if passed { 1.0 } else { 0.0 },
            margin: if passed { 1.0 } else { -1.0 },
            weight: kind.weight(),
            message: message.into(),
            reads: Vec::new(),
        }
    }

    /// Record the genes this check depends on.
    pub fn reading(mut self, genes: &[Gene]) -> Self {
        self.reads = genes.to_vec();
        self
    }

    /// Whether any of `genes` feeds this check.
    pub fn reads_any(&self, genes: &[Gene]) -> bool {
        self.reads.iter().any(|g| genes.contains(g))
    }
}

fn relative_margin(delta: f64, reference: f64) -> f64 {
    if reference.abs() > f64::EPSILON {
        delta / reference.abs()
    } else {
        delta
    }
}

/// A failed check, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ConstraintKind,
    pub message: String,
}

impl From<&ConstraintCheck> for Violation {
    fn from(check: &ConstraintCheck) -> Self {
        Self {
            kind: check.kind,
            message: check.message.clone(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

type CheckFn = fn(&EncoderParameters) -> Vec<ConstraintCheck>;

/// Checks in evaluation order.
pub const CHECKS: &[CheckFn] = &[
    check_radii,
    check_arc_angle,
    check_position_count,
    check_track_count,
    check_code_capacity,
    check_track_fit,
    check_gap_size,
    check_wall_thickness,
    check_feature_size,
    check_disk_thickness,
    check_hole_diameter,
    check_build_volume,
];

/// Run every check in order.
pub fn evaluate_checks(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    CHECKS.iter().flat_map(|check| check(params)).collect()
}

/// All checks plus the subset that failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feasibility {
    pub checks: Vec<ConstraintCheck>,
    pub violations: Vec<Violation>,
}

impl Feasibility {
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Evaluate every constraint and collect every violation.
pub fn feasible(params: &EncoderParameters) -> Feasibility {
    let checks = evaluate_checks(params);
    let violations = checks
        .iter()
        .filter(|c| !c.passed)
        .map(Violation::from)
        .collect();
    Feasibility { checks, violations }
}

fn check_radii(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    let ok = params.radius_outer() > params.radius_inner() && params.radius_inner() >= 0.0;
    vec![ConstraintCheck::predicate(
        ConstraintKind::Radii,
        ok,
        format!(
            "outer radius {:.2} mm vs inner radius {:.2} mm",
            params.radius_outer(),
            params.radius_inner()
        ),
    )]
}

fn check_arc_angle(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    let arc = params.arc_angle_deg;
    vec![ConstraintCheck::predicate(
        ConstraintKind::ArcAngle,
        arc > 0.0 && arc <= 360.0,
        format!("arc angle {arc:.2}° must lie in (0, 360]"),
    )]
}

fn check_position_count(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    let n = f64::from(params.num_positions);
    vec![
        ConstraintCheck::at_least(ConstraintKind::PositionCount, n, 2.0, "position count"),
        ConstraintCheck::at_most(
            ConstraintKind::PositionCount,
            n,
            f64::from(MAX_POSITIONS),
            "position count",
        ),
    ]
}

fn check_track_count(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    let n = params.num_tracks;
    vec![ConstraintCheck::predicate(
        ConstraintKind::TrackCount,
        (1..=MAX_TRACKS).contains(&n),
        format!("track count {n} must lie in 1..={MAX_TRACKS}"),
    )]
}

fn code_capacity(num_tracks: u32) -> f64 {
    2f64.powi(num_tracks.min(1023) as i32)
}

fn check_code_capacity(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    vec![ConstraintCheck::at_most(
        ConstraintKind::CodeCapacity,
        f64::from(params.num_positions),
        code_capacity(params.num_tracks),
        "position count vs code capacity",
    )]
}

/// Whether position and track counts are in range, so per-position patterns
/// are both meaningful and affordable to build.
fn codes_buildable(params: &EncoderParameters) -> bool {
    let n = params.num_positions;
    (2..=MAX_POSITIONS).contains(&n)
        && (1..=MAX_TRACKS).contains(&params.num_tracks)
        && f64::from(n) <= code_capacity(params.num_tracks)
}

/// Inner radius of the innermost track.
fn innermost_inner_radius(params: &EncoderParameters, width_mm: f64, spacing_mm: f64) -> f64 {
    let last = params.num_tracks.saturating_sub(1);
    let outer = track_outer_radius(params.radius_outer(), last, track_pitch(width_mm, spacing_mm));
    track_inner_radius(outer, width_mm)
}

fn check_track_fit(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    let innermost = innermost_inner_radius(params, params.track_width_mm, params.track_spacing_mm);
    vec![
        ConstraintCheck::at_least(
            ConstraintKind::TrackFit,
            innermost,
            params.radius_inner(),
            "innermost track inner radius",
        )
        .reading(&[Gene::TrackWidth, Gene::TrackSpacing]),
    ]
}

fn check_gap_size(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    let innermost = innermost_inner_radius(params, params.track_width_mm, params.track_spacing_mm);
    let centre = innermost + params.track_width_mm / 2.0;
    vec![
        ConstraintCheck::at_least(
            ConstraintKind::GapSize,
            gap_linear_size(params.gap_angle_deg, centre.max(0.0)),
            params.printer.min_gap_size_mm,
            "gap at innermost track",
        )
        .reading(&Gene::ALL),
    ]
}

/// Radial web between tracks and the narrowest angular web between two
/// cutouts on the same track.
fn check_wall_thickness(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    let min_wall = params.printer.min_wall_thickness_mm;
    let mut checks = Vec::with_capacity(2);
    if params.num_tracks > 1 {
        checks.push(
            ConstraintCheck::at_least(
                ConstraintKind::WallThickness,
                params.track_spacing_mm,
                min_wall,
                "radial web between tracks",
            )
            .reading(&[Gene::TrackSpacing]),
        );
    }

    if let Some(web) = narrowest_angular_web(params) {
        checks.push(
            ConstraintCheck::at_least(
                ConstraintKind::WallThickness,
                web,
                min_wall,
                "solid web between cutouts",
            )
            .reading(&[Gene::TrackWidth, Gene::TrackSpacing]),
        );
    }
    checks
}

/// Shortest solid run bounded by cutouts on both sides, in mm at the inner
/// edge of its track. `None` when no track has such a run.
fn narrowest_angular_web(params: &EncoderParameters) -> Option<f64> {
    if !codes_buildable(params) {
        return None;
    }
    let step = angular_resolution(params.arc_angle_deg, params.num_positions);
    let overlap = effective_overlap_deg(DEFAULT_OVERLAP_DEG, step);
    let cyclic = params.is_full_circle();
    let pitch = params.track_pitch_mm();

    let mut narrowest: Option<f64> = None;
    for track_index in 0..params.num_tracks {
        let Ok(pattern) = track_pattern(track_index, params.num_positions, params.num_tracks) else {
            continue;
        };
        let Some(run) = shortest_enclosed_zero_run(&pattern, cyclic) else {
            continue;
        };
        let radius = track_inner_radius(
            track_outer_radius(params.radius_outer(), track_index, pitch),
            params.track_width_mm,
        );
        let web = gap_linear_size(run as f64 * step - 2.0 * overlap, radius.max(0.0));
        narrowest = Some(narrowest.map_or(web, |w: f64| w.min(web)));
    }
    narrowest
}

/// Shortest run of zeros with a one on each side.
fn shortest_enclosed_zero_run(pattern: &TrackPattern, cyclic: bool) -> Option<usize> {
    let bits = pattern.bits();
    let n = bits.len();
    if n == 0 || pattern.ones() == 0 || pattern.ones() == n {
        return None;
    }
    if cyclic {
        return transition_statistics(pattern)
            .zero_runs
            .into_iter()
            .min();
    }
    pattern_runs(pattern)
        .into_iter()
        .filter(|r| r.value == 0 && r.start > 0 && r.start + r.length < n)
        .map(|r| r.length)
        .min()
}

fn check_feature_size(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    let min = params.printer.min_feature_size_mm;
    let mut checks = vec![
        ConstraintCheck::at_least(
            ConstraintKind::FeatureSize,
            params.track_width_mm,
            min,
            "track width",
        )
        .reading(&[Gene::TrackWidth]),
    ];
    if params.num_tracks > 1 {
        checks.push(
            ConstraintCheck::at_least(
                ConstraintKind::FeatureSize,
                params.track_spacing_mm,
                min,
                "track spacing",
            )
            .reading(&[Gene::TrackSpacing]),
        );
    }
    checks
}

fn check_disk_thickness(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    let printer = &params.printer;
    let required = printer
        .min_wall_thickness_mm
        .max(MIN_LAYERS * printer.layer_height_mm);
    vec![ConstraintCheck::at_least(
        ConstraintKind::DiskThickness,
        params.disk_thickness_mm,
        required,
        "disk thickness",
    )]
}

fn check_hole_diameter(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    // A solid disk has no hole to print.
    if params.inner_diameter_mm <= 0.0 {
        return Vec::new();
    }
    vec![ConstraintCheck::at_least(
        ConstraintKind::HoleDiameter,
        params.inner_diameter_mm,
        params.printer.min_hole_diameter_mm,
        "mounting hole diameter",
    )]
}

fn check_build_volume(params: &EncoderParameters) -> Vec<ConstraintCheck> {
    let footprint = params.outer_diameter_mm + 2.0 * params.bump_extension_mm.max(0.0);
    vec![ConstraintCheck::at_most(
        ConstraintKind::BuildVolume,
        footprint,
        params.printer.max_build_diameter_mm,
        "disk footprint",
    )]
}

/// Pre-flight report for a parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<Violation>,
    pub warnings: Vec<String>,
}

/// Feasibility plus Gray code checks, with advisory warnings.
pub fn validate_parameters(params: &EncoderParameters) -> ValidationReport {
    let feasibility = feasible(params);
    let mut errors = feasibility.violations;
    let mut warnings = Vec::new();

    let n = params.num_positions;
    if n > 0 && !n.is_power_of_two() {
        warnings.push(format!(
            "position count {n} is not a power of two; some codes stay unused and the \
             sequence is not cyclic"
        ));
    }

    let required = params.required_bits();
    if params.num_tracks > required {
        warnings.push(format!(
            "{} tracks for {n} positions; {required} would suffice",
            params.num_tracks
        ));
    }

    let resolution = params.angular_resolution_deg();
    if resolution > 0.0 && resolution < 0.5 {
        warnings.push(format!(
            "angular resolution {resolution:.2}° may be too fine for reliable optical sensing"
        ));
    }

    if params.num_tracks > 1 && params.track_spacing_mm < 1.0 {
        warnings.push("track spacing may be too tight for an optical sensor array".to_string());
    }

    if codes_buildable(params) {
        let codes = validate_encoder_codes(n, params.num_tracks);
        errors.extend(codes.errors.into_iter().map(|message| Violation {
            kind: ConstraintKind::CodeCapacity,
            message,
        }));
        warnings.extend(codes.warnings);
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Violations that no choice of the active genes can remove.
///
/// Checks run on a best case where every active width/spacing gene sits at
/// its lower bound and an active gap angle at its upper bound. A failure
/// counts when the check reads only inactive genes, or when it is monotone
/// in the genes so the best case already bounds it.
pub fn fixed_feasibility(
    fixed: &EncoderParameters,
    bounds: &GenomeConstraints,
    genes: &[Gene],
) -> Vec<Violation> {
    let mut best_case = fixed.clone();
    for gene in genes {
        match gene {
            Gene::TrackWidth => best_case.track_width_mm = bounds.track_width_mm.0,
            Gene::TrackSpacing => best_case.track_spacing_mm = bounds.track_spacing_mm.0,
            Gene::GapAngle => best_case.gap_angle_deg = bounds.gap_angle_deg.1,
        }
    }

    evaluate_checks(&best_case)
        .iter()
        .filter(|c| !c.passed)
        .filter(|c| !c.reads_any(genes) || c.kind.monotone_in_genes())
        .map(Violation::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivations() {
        assert_eq!(track_pitch(3.3, 1.7), 5.0);
        assert_eq!(track_outer_radius(58.0, 2, 5.0), 48.0);
        assert_eq!(track_inner_radius(48.0, 3.0), 45.0);
        assert!((gap_linear_size(180.0, 1.0) - PI).abs() < 1e-12);
        assert_eq!(angular_resolution(64.0, 32), 2.0);
        assert_eq!(angular_resolution(64.0, 0), 0.0);
    }

    #[test]
    fn test_default_is_feasible() {
        let report = feasible(&EncoderParameters::default());
        assert!(report.is_feasible(), "{:?}", report.violations);
        assert!(report.checks.iter().any(|c| c.kind == ConstraintKind::WallThickness));
    }

    #[test]
    fn test_insufficient_radial_space() {
        let params = EncoderParameters {
            outer_diameter_mm: 60.0,
            inner_diameter_mm: 35.6,
            ..Default::default()
        };
        let report = feasible(&params);
        assert!(!report.is_feasible());
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ConstraintKind::TrackFit));
    }

    #[test]
    fn test_reports_every_violation() {
        let params = EncoderParameters {
            outer_diameter_mm: 20.0,
            inner_diameter_mm: 30.0,
            track_width_mm: 0.1,
            gap_angle_deg: 0.01,
            ..Default::default()
        };
        let kinds: Vec<_> = feasible(&params).violations.iter().map(|v| v.kind).collect();
        for kind in [
            ConstraintKind::Radii,
            ConstraintKind::TrackFit,
            ConstraintKind::GapSize,
            ConstraintKind::FeatureSize,
        ] {
            assert!(kinds.contains(&kind), "missing {kind:?} in {kinds:?}");
        }
    }

    #[test]
    fn test_thin_angular_web_fails() {
        // 1° per position: the two-position webs on track 0 are far too thin.
        let params = EncoderParameters {
            arc_angle_deg: 32.0,
            outer_diameter_mm: 60.0,
            inner_diameter_mm: 10.0,
            ..Default::default()
        };
        let wall: Vec<_> = feasible(&params)
            .checks
            .into_iter()
            .filter(|c| c.kind == ConstraintKind::WallThickness)
            .collect();
        assert_eq!(wall.len(), 2);
        assert!(wall[0].passed);
        assert!(!wall[1].passed);
    }

    #[test]
    fn test_margins() {
        let pass = ConstraintCheck::at_least(ConstraintKind::FeatureSize, 0.8, 0.4, "width");
        assert!(pass.passed);
        assert!((pass.margin - 1.0).abs() < 1e-12);
        assert_eq!(pass.weight, 2.0);

        let fail = ConstraintCheck::at_most(ConstraintKind::BuildVolume, 300.0, 250.0, "size");
        assert!(!fail.passed);
        assert!(fail.margin < 0.0);
    }

    #[test]
    fn test_validate_default() {
        let report = validate_parameters(&EncoderParameters::default());
        assert!(report.valid, "{:?}", report.errors);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_validate_warnings() {
        let params = EncoderParameters {
            num_positions: 24,
            num_tracks: 6,
            track_spacing_mm: 0.8,
            track_width_mm: 2.0,
            ..Default::default()
        };
        let report = validate_parameters(&params);
        assert!(report.warnings.iter().any(|w| w.contains("power of two")));
        assert!(report.warnings.iter().any(|w| w.contains("would suffice")));
        assert!(report.warnings.iter().any(|w| w.contains("sensor array")));
    }

    #[test]
    fn test_too_few_tracks_is_error() {
        let params = EncoderParameters {
            num_tracks: 4,
            ..Default::default()
        };
        let report = validate_parameters(&params);
        assert!(!report.valid);
        assert!(report
            .errors
            .iter()
            .any(|v| v.kind == ConstraintKind::CodeCapacity));
    }

    #[test]
    fn test_fixed_feasibility() {
        let bounds = GenomeConstraints::default();
        let genes = [Gene::TrackWidth, Gene::TrackSpacing, Gene::GapAngle];
        assert!(fixed_feasibility(&EncoderParameters::default(), &bounds, &genes).is_empty());

        // Even the thinnest tracks cannot fit 5 tracks in 2 mm.
        let cramped = EncoderParameters {
            outer_diameter_mm: 39.6,
            ..Default::default()
        };
        let violations = fixed_feasibility(&cramped, &bounds, &genes);
        assert!(violations.iter().any(|v| v.kind == ConstraintKind::TrackFit));

        let inverted = EncoderParameters {
            outer_diameter_mm: 10.0,
            ..Default::default()
        };
        let violations = fixed_feasibility(&inverted, &bounds, &genes);
        assert!(violations.iter().any(|v| v.kind == ConstraintKind::Radii));
    }

    #[test]
    fn test_fixed_feasibility_respects_inactive_genes() {
        let bounds = GenomeConstraints::default();
        let thin_spacing = EncoderParameters {
            track_spacing_mm: 0.1,
            ..Default::default()
        };

        // Spacing is searched, so a thin fixed value is not a dead end.
        assert!(fixed_feasibility(&thin_spacing, &bounds, &Gene::ALL).is_empty());

        // Spacing is held: the radial web and spacing feature checks are final.
        let kinds: Vec<_> = fixed_feasibility(&thin_spacing, &bounds, &[Gene::GapAngle])
            .iter()
            .map(|v| v.kind)
            .collect();
        assert!(kinds.contains(&ConstraintKind::WallThickness));
        assert!(kinds.contains(&ConstraintKind::FeatureSize));

        let tiny_gap = EncoderParameters {
            gap_angle_deg: 0.01,
            ..Default::default()
        };
        assert!(fixed_feasibility(&tiny_gap, &bounds, &Gene::ALL).is_empty());
        let violations =
            fixed_feasibility(&tiny_gap, &bounds, &[Gene::TrackWidth, Gene::TrackSpacing]);
        assert!(violations.iter().any(|v| v.kind == ConstraintKind::GapSize));
    }

    #[test]
    fn test_huge_position_count_is_rejected() {
        let params = EncoderParameters {
            num_positions: u32::MAX,
            num_tracks: MAX_TRACKS,
            ..Default::default()
        };
        let report = feasible(&params);
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ConstraintKind::PositionCount));

        let report = validate_parameters(&params);
        assert!(!report.valid);
        assert!(report
            .errors
            .iter()
            .all(|v| v.kind != ConstraintKind::CodeCapacity));
    }
}
