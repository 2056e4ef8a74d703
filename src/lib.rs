pub mod config;
pub mod controller;
pub mod field;
pub mod geometry;
pub mod logging;
pub mod scene;

pub use config::{AnimationConfig, StarFieldParams, StimulusConfig};
pub use field::animation::Motion;
pub use field::{FieldHooks, StarField};
pub use geometry::{Color, PrimitiveKind, StarPrimitive};
pub use logging::TrialLogger;
pub use scene::{FrameDriven, SceneContainer, StarGroup};

#[cfg(feature = "pybindings")]
mod pybindings;

/// Common types used in the library
pub type Quaternion = nalgebra::Unit<nalgebra::Quaternion<f64>>;
pub type Vector3 = nalgebra::Vector3<f64>;
