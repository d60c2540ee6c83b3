//! # Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`particle_count`] - ISO 14644-1 maximum particle concentration

pub mod particle_count;

// Re-export commonly used types
pub use particle_count::{ParticleCountInput, ParticleCountResult};
