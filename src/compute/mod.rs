//! Compute module - Gray code, constraints, and geometry synthesis for encoder disks.

mod arc;
mod assembly;
mod constraints;
mod gray;
mod tracks;

pub mod evolution;

pub use arc::*;
pub use assembly::*;
pub use constraints::*;
pub use gray::*;
pub use tracks::*;
