use crate::error::{GeometryError, Result};

/// Tolerances shared by the registry, the arrangement engine and the kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkConfig {
    param_tolerance: f64,
    plane_tolerance: f64,
    tessellation_tolerance: f64,
}

impl NetworkConfig {
    /// Creates a new configuration.
    ///
    /// * `param_tolerance` - Two cut parameters closer than this produce no fragment
    /// * `plane_tolerance` - Maximum normal offset for two planes to be coincident
    /// * `tessellation_tolerance` - Maximum chord deviation when building regions
    ///
    /// # Errors
    ///
    /// Returns an error if any tolerance is not a positive finite number.
    pub fn new(
        param_tolerance: f64,
        plane_tolerance: f64,
        tessellation_tolerance: f64,
    ) -> Result<Self> {
        check_positive("param_tolerance", param_tolerance)?;
        check_positive("plane_tolerance", plane_tolerance)?;
        check_positive("tessellation_tolerance", tessellation_tolerance)?;
        Ok(Self {
            param_tolerance,
            plane_tolerance,
            tessellation_tolerance,
        })
    }

    /// Returns the parameter tolerance used for degenerate fragments.
    #[must_use]
    pub fn param_tolerance(&self) -> f64 {
        self.param_tolerance
    }

    /// Returns the plane coincidence tolerance.
    #[must_use]
    pub fn plane_tolerance(&self) -> f64 {
        self.plane_tolerance
    }

    /// Returns the tessellation tolerance used by region building.
    #[must_use]
    pub fn tessellation_tolerance(&self) -> f64 {
        self.tessellation_tolerance
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            param_tolerance: 1e-5,
            plane_tolerance: 1e-3,
            tessellation_tolerance: 1e-3,
        }
    }
}

fn check_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter,
            value,
            min: 0.0,
            max: f64::INFINITY,
        }
        .into())
    }
}
