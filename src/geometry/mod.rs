//! Star primitive construction
//!
//! Each star is a small primitive placed on a virtual spherical shell of
//! radius `shell_radius` centered on the viewpoint. Star positions come from
//! an external source and are used verbatim; this module only derives the
//! per-star size and color.
//!

pub mod color;

use serde::{Deserialize, Serialize};

pub use color::Color;

use crate::config::StarFieldParams;
use crate::Vector3;

/// Shape used to draw each star
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Solid sphere centered on the star position
    #[default]
    Sphere,
    /// Flat disc facing the viewpoint
    Disc,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::Disc => "disc",
        }
    }
}

/// A single star as handed to the scene container
#[derive(Debug, Clone, PartialEq)]
pub struct StarPrimitive {
    pub index: usize,
    pub radius: f64,
    pub color: Color,
    pub position: Vector3,
    pub kind: PrimitiveKind,
}

impl StarPrimitive {
    /// Unit vector from the viewpoint toward the star
    pub fn direction(&self) -> Vector3 {
        self.position.normalize()
    }

    /// For discs, the normal that faces the viewpoint; spheres have no facing
    pub fn facing_normal(&self) -> Option<Vector3> {
        match self.kind {
            PrimitiveKind::Disc => Some(-self.direction()),
            PrimitiveKind::Sphere => None,
        }
    }
}

/// Linear radius on the shell subtended by an angular radius
///
/// This is the sine projection `shell_radius * sin(angle)`, an approximation
/// that is only meaningful for small to moderate angular sizes.
///
/// # Arguments
/// * `shell_radius` - distance from the viewpoint to the shell
/// * `angular_radius_deg` - apparent angular radius in degrees
///
/// # Returns
/// Radius of the star primitive in scene units
pub fn angular_to_linear_radius(shell_radius: f64, angular_radius_deg: f64) -> f64 {
    shell_radius * angular_radius_deg.to_radians().sin()
}

/// Build exactly `params.star_count` primitives
///
/// Radii and colors are taken cyclically from `params.angular_radius_deg`
/// and `params.color`; star `i` sits at `positions[i]`.
///
/// # Panics
/// If `positions` is shorter than `star_count`, or if either cyclic array is
/// empty while `star_count > 0`. These are caller errors and are not
/// silently repaired.
pub fn build_primitives(params: &StarFieldParams, positions: &[Vector3]) -> Vec<StarPrimitive> {
    let n_radii = params.angular_radius_deg.len();
    let n_colors = params.color.len();

    (0..params.star_count)
        .map(|i| StarPrimitive {
            index: i,
            radius: angular_to_linear_radius(
                params.shell_radius,
                params.angular_radius_deg[i % n_radii],
            ),
            color: params.color[i % n_colors],
            position: positions[i],
            kind: params.primitive,
        })
        .collect()
}
