//! # ISO Cleanroom Particle Count
//!
//! Maximum permitted airborne particle concentration for an ISO 14644-1
//! class at a given particle size:
//!
//! ```text
//! Cn = 10^N × (0.1 / D)^2.08
//! ```
//!
//! - `N` - ISO class number
//! - `D` - considered particle size (µm)
//! - `Cn` - particles per m³ at or above size `D`
//!
//! ## Example
//!
//! ```rust
//! use cleanroom_core::calculations::particle_count::{calculate, ParticleCountInput};
//!
//! let input = ParticleCountInput { iso_class: 5.0, particle_size_um: 0.5 };
//! let result = calculate(&input)?;
//! assert!((result.particles_per_m3 - 3520.0).abs() < 5.0);
//! # Ok::<(), cleanroom_core::errors::CalcError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::descriptors::{ISO_CLASS, ISO_CLEANROOM_PARTICLE, PARTICLE_SIZE};
use crate::errors::{CalcError, CalcResult};
use crate::validation::FieldValues;

/// Reference particle size in µm
pub const REFERENCE_SIZE_UM: f64 = 0.1;

/// Size-distribution exponent
pub const SIZE_EXPONENT: f64 = 2.08;

/// Inputs to the particle count formula.
///
/// ## JSON Example
///
/// ```json
/// { "iso_class": 5.0, "particle_size_um": 0.5 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleCountInput {
    /// ISO class number N
    pub iso_class: f64,

    /// Considered particle size D in µm
    pub particle_size_um: f64,
}

impl ParticleCountInput {
    /// Pull the formula inputs out of a validated form.
    pub fn from_values(values: &FieldValues) -> CalcResult<Self> {
        let iso_class = values
            .number(ISO_CLASS)
            .ok_or_else(|| CalcError::missing_field(ISO_CLASS))?;
        let particle_size_um = values
            .number(PARTICLE_SIZE)
            .ok_or_else(|| CalcError::missing_field(PARTICLE_SIZE))?;
        Ok(Self {
            iso_class,
            particle_size_um,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.iso_class.is_finite() {
            return Err(CalcError::calculation_failed(
                ISO_CLEANROOM_PARTICLE,
                format!("ISO class {} is not a finite number", self.iso_class),
            ));
        }
        if !self.particle_size_um.is_finite() || self.particle_size_um <= 0.0 {
            return Err(CalcError::calculation_failed(
                ISO_CLEANROOM_PARTICLE,
                format!("Particle size {} µm must be positive", self.particle_size_um),
            ));
        }
        Ok(())
    }
}

/// Result of the particle count formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleCountResult {
    /// Maximum concentration Cn (particles/m³)
    pub particles_per_m3: f64,

    /// Inputs the result was computed from
    pub input: ParticleCountInput,
}

/// Evaluate `10^N × (0.1 / D)^2.08`.
///
/// # Returns
///
/// * `Ok(ParticleCountResult)` - Concentration in particles/m³
/// * `Err(CalcError::CalculationFailed)` - Size not positive or inputs not finite
pub fn calculate(input: &ParticleCountInput) -> CalcResult<ParticleCountResult> {
    input.validate()?;

    let size_factor = (REFERENCE_SIZE_UM / input.particle_size_um).powf(SIZE_EXPONENT);
    let particles_per_m3 = 10f64.powf(input.iso_class) * size_factor;

    if !particles_per_m3.is_finite() {
        return Err(CalcError::calculation_failed(
            ISO_CLEANROOM_PARTICLE,
            "Result overflowed",
        ));
    }

    Ok(ParticleCountResult {
        particles_per_m3,
        input: *input,
    })
}
