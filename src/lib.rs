pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod math;
pub mod network;
pub mod oracle;
pub mod regions;
pub mod registry;
pub mod scene;
pub mod transaction;

pub use config::NetworkConfig;
pub use error::{Result, SketchError};
pub use kernel::PlanarKernel;
pub use network::{CurveEvent, CurveNetwork};
pub use oracle::GeometryOracle;
pub use scene::{CurveHandle, MemoryScene, SceneDatabase};
