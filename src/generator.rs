//! Entry points consumed by renderers, exporters and the CLI.

use serde::{Deserialize, Serialize};

use crate::compute::evolution::{EvolutionEngine, EvolutionError};
use crate::compute::{
    DomainError, FeatureAnalysis, GeometryError, GrayCodeReport, PatternRun, TrackPattern,
    TransitionStats, assemble, bits_for_position, feature_analysis, gray_value, pattern_runs,
    track_pattern, transition_statistics, validate_encoder_codes,
};
use crate::schema::{
    DiskGeometry, EncoderParameters, EvolutionConfig, EvolutionResult, GenerationProgress,
    OptimizationGoals,
};

pub use crate::compute::{ValidationReport, validate_parameters};

/// Build the disk geometry. Run [`validate_parameters`] first for a full
/// diagnosis; this only fails when a track cannot be placed.
pub fn generate(
    params: &EncoderParameters,
    include_bumpers: bool,
) -> Result<DiskGeometry, GeometryError> {
    assemble(params, include_bumpers)
}

/// Code of one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionCode {
    pub position: u64,
    pub gray: u64,
    /// Gray bits, LSB (outermost track) first.
    pub bits: Vec<u8>,
    /// Angle of the position centre in degrees.
    pub center_deg: f64,
}

/// Bit pattern and statistics of one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackExport {
    pub track_index: u32,
    pub pattern: TrackPattern,
    pub runs: Vec<PatternRun>,
    pub statistics: TransitionStats,
}

/// Everything an external serializer needs about the encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternExport {
    pub num_positions: u32,
    pub num_tracks: u32,
    pub angular_resolution_deg: f64,
    pub positions: Vec<PositionCode>,
    pub tracks: Vec<TrackExport>,
    pub features: FeatureAnalysis,
    pub code_report: GrayCodeReport,
}

/// Gray sequence, per-track patterns and transition statistics.
pub fn export_pattern_data(params: &EncoderParameters) -> Result<PatternExport, DomainError> {
    let step = params.angular_resolution_deg();
    let positions = (0..u64::from(params.num_positions))
        .map(|position| {
            Ok(PositionCode {
                position,
                gray: gray_value(position),
                bits: bits_for_position(position, params.num_tracks)?,
                center_deg: (position as f64 + 0.5) * step,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    let tracks = (0..params.num_tracks)
        .map(|track_index| {
            let pattern = track_pattern(track_index, params.num_positions, params.num_tracks)?;
            Ok(TrackExport {
                track_index,
                runs: pattern_runs(&pattern),
                statistics: transition_statistics(&pattern),
                pattern,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;

    Ok(PatternExport {
        num_positions: params.num_positions,
        num_tracks: params.num_tracks,
        angular_resolution_deg: step,
        positions,
        tracks,
        features: feature_analysis(params)?,
        code_report: validate_encoder_codes(params.num_positions, params.num_tracks),
    })
}

/// Optimize the default genes for `goals`, holding `fixed` constant.
pub fn optimize(
    goals: OptimizationGoals,
    fixed: EncoderParameters,
) -> Result<EvolutionResult, EvolutionError> {
    let config = EvolutionConfig {
        goals,
        ..Default::default()
    };
    optimize_with_progress(config, fixed, |_| {})
}

/// Optimize with full settings, calling `callback` after every generation.
pub fn optimize_with_progress<F>(
    config: EvolutionConfig,
    fixed: EncoderParameters,
    callback: F,
) -> Result<EvolutionResult, EvolutionError>
where
    F: FnMut(&GenerationProgress),
{
    EvolutionEngine::new(config, fixed).run_with_callback(callback)
}
