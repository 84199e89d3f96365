//! Schema module - Parameter, geometry, and configuration types for encoder disks.

mod config;
mod evolution;
mod geometry;
mod parameters;
mod printer;

pub use config::*;
pub use evolution::*;
pub use geometry::*;
pub use parameters::*;
pub use printer::*;
