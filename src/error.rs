use thiserror::Error;

use crate::scene::CurveHandle;

/// Top-level error type for the curve network.
#[derive(Debug, Error)]
pub enum SketchError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Violations of the arrangement's programming contract.
///
/// These are fatal for the operation that raised them: continuing would
/// silently corrupt the touched graph or the fragment partition.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("a transaction is already open")]
    NestedTransaction,

    #[error("{0} must be called inside a transaction")]
    TransactionRequired(&'static str),

    #[error("intersection parameter {t} lies outside the curve domain [{t_min}, {t_max}]")]
    ParameterOutsideDomain { t: f64, t_min: f64, t_max: f64 },

    #[error("intersection refers to unknown planar curve #{0}")]
    UnknownPlanarCurve(u64),

    #[error("curve {0:?} does not exist in the scene")]
    UnknownCurve(CurveHandle),

    #[error("plane is not registered")]
    UnknownPlane,

    #[error("arrangement is inconsistent: {0}")]
    Corrupted(String),
}

/// Failures reported by the geometry oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("projection failed: {0}")]
    Projection(String),

    #[error("oracle failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`SketchError`].
pub type Result<T> = std::result::Result<T, SketchError>;
