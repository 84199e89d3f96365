//! Versioned encoder configuration and optimization artifacts.
//!
//! The configuration is loaded once at startup and never mutated. An
//! optimization run produces an [`OptimizationArtifact`]; merging it is an
//! explicit step that yields a new configuration with a bumped version.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{EncoderParameters, EvolutionConfig, EvolutionConfigError, EvolutionResult, FitnessReport, Gene};

/// Configuration format version this build reads.
pub const CONFIG_FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    1
}

/// Top-level encoder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Format version. Reading requires [`CONFIG_FORMAT_VERSION`] or newer
    /// revisions produced by [`EncoderConfig::apply_artifact`].
    #[serde(default = "default_version")]
    pub version: u32,
    /// Disk parameters.
    #[serde(default)]
    pub parameters: EncoderParameters,
    /// Optimizer settings.
    #[serde(default)]
    pub evolution: EvolutionConfig,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            parameters: EncoderParameters::default(),
            evolution: EvolutionConfig::default(),
        }
    }
}

impl EncoderConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration record.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version < CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        self.evolution.validate()?;
        Ok(())
    }

    /// New configuration with the artifact's genes applied.
    ///
    /// The artifact must come from this exact configuration version; the
    /// returned configuration carries the next version.
    pub fn apply_artifact(&self, artifact: &OptimizationArtifact) -> Result<Self, ConfigError> {
        if artifact.source_version != self.version {
            return Err(ConfigError::StaleArtifact {
                artifact: artifact.source_version,
                config: self.version,
            });
        }
        let mut parameters = self.parameters.clone();
        for (&gene, &value) in &artifact.genes {
            gene.set(&mut parameters, value);
        }
        Ok(Self {
            version: self.version + 1,
            parameters,
            evolution: self.evolution.clone(),
        })
    }
}

/// Output of an optimization run, kept apart from the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationArtifact {
    /// Version of the configuration the run started from.
    pub source_version: u32,
    /// Optimized gene values.
    pub genes: BTreeMap<Gene, f64>,
    /// Full parameter set of the best genome.
    pub parameters: EncoderParameters,
    pub report: FitnessReport,
    pub generation: usize,
}

impl OptimizationArtifact {
    pub fn from_result(result: &EvolutionResult, source_version: u32) -> Self {
        Self {
            source_version,
            genes: result.best_genome.genes.clone(),
            parameters: result.best_parameters.clone(),
            report: result.best_report.clone(),
            generation: result.best_generation,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unsupported configuration version {0}")]
    UnsupportedVersion(u32),
    #[error("Artifact was produced from version {artifact}, configuration is version {config}")]
    StaleArtifact { artifact: u32, config: u32 },
    #[error("Invalid evolution settings: {0}")]
    Evolution(#[from] EvolutionConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FitnessComponents;
    use std::io::Write;

    fn artifact(source_version: u32) -> OptimizationArtifact {
        let mut genes = BTreeMap::new();
        genes.insert(Gene::TrackWidth, 3.0);
        genes.insert(Gene::GapAngle, 2.0);
        OptimizationArtifact {
            source_version,
            genes,
            parameters: EncoderParameters::default(),
            report: FitnessReport {
                total: 1.1,
                components: FitnessComponents::default(),
                valid: true,
                violations: Vec::new(),
            },
            generation: 12,
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"version": 1, "parameters": {{"num_positions": 16, "num_tracks": 4}}}}"#
        )
        .unwrap();

        let config = EncoderConfig::load(file.path()).unwrap();
        assert_eq!(config.parameters.num_positions, 16);
        assert_eq!(config.evolution, EvolutionConfig::default());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(EncoderConfig::load(&missing), Err(ConfigError::Io(_))));
        assert!(matches!(
            EncoderConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EncoderConfig::from_json_str(r#"{"version": 0}"#),
            Err(ConfigError::UnsupportedVersion(0))
        ));
        assert!(matches!(
            EncoderConfig::from_json_str(r#"{"evolution": {"population": {"size": 1}}}"#),
            Err(ConfigError::Evolution(EvolutionConfigError::PopulationTooSmall))
        ));
    }

    #[test]
    fn test_apply_artifact_returns_new_version() {
        let config = EncoderConfig::default();
        let merged = config.apply_artifact(&artifact(1)).unwrap();

        assert_eq!(merged.version, 2);
        assert_eq!(merged.parameters.track_width_mm, 3.0);
        assert_eq!(merged.parameters.gap_angle_deg, 2.0);
        assert_eq!(merged.parameters.track_spacing_mm, config.parameters.track_spacing_mm);
        // The source is untouched.
        assert_eq!(config.version, 1);
        assert_eq!(config.parameters.track_width_mm, 3.3);
    }

    #[test]
    fn test_stale_artifact_rejected() {
        let merged = EncoderConfig::default().apply_artifact(&artifact(1)).unwrap();
        assert!(matches!(
            merged.apply_artifact(&artifact(1)),
            Err(ConfigError::StaleArtifact {
                artifact: 1,
                config: 2
            })
        ));
    }

    #[test]
    fn test_round_trip_json() {
        let config = EncoderConfig::default();
        let json = config.to_json_string().unwrap();
        assert_eq!(EncoderConfig::from_json_str(&json).unwrap(), config);
    }
}
