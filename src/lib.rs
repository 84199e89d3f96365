//! Gray encoder - Optical encoder disk synthesis from Gray-code position schemes.
//!
//! This crate turns a parameter set (disk radii, arc, position count, track
//! layout, printer limits) into symbolic disk geometry whose concentric
//! tracks carry a reflected binary Gray code, and searches the free layout
//! parameters with a constrained genetic algorithm.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Parameters, printer profiles, geometry, and configuration types
//! - `compute`: Gray code, constraints, track compilation, assembly, evolution
//!
//! The functions in `generator` are the entry points for external renderers
//! and the CLI, and are re-exported here.
//!
//! # Example
//!
//! ```rust,no_run
//! use gray_encoder::{generate, validate_parameters, schema::EncoderParameters};
//!
//! let params = EncoderParameters::default();
//!
//! let report = validate_parameters(&params);
//! assert!(report.valid);
//!
//! let disk = generate(&params, true).unwrap();
//! for track in &disk.tracks {
//!     println!(
//!         "track {}: r = [{:.2}, {:.2}] mm, {} cutouts",
//!         track.track_index,
//!         track.inner_radius_mm,
//!         track.outer_radius_mm,
//!         track.cutouts.len()
//!     );
//! }
//! ```

pub mod compute;
pub mod generator;
pub mod schema;

// Re-export commonly used types
pub use generator::{
    PatternExport, ValidationReport, export_pattern_data, generate, optimize,
    optimize_with_progress, validate_parameters,
};
pub use schema::{DiskGeometry, EncoderConfig, EncoderParameters, PrinterProfile};
