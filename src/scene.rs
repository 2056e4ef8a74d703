//! Seams between the star field and the host's render loop
//!
//! The host owns the scene graph; the star field only needs somewhere to
//! put its primitives ([`SceneContainer`]) and exposes a single per-frame
//! entry point ([`FrameDriven`]).

use crate::geometry::StarPrimitive;

/// Group node that holds star primitives
pub trait SceneContainer {
    fn add_child(&mut self, child: StarPrimitive);

    fn clear_children(&mut self);

    fn children(&self) -> &[StarPrimitive];

    fn len(&self) -> usize {
        self.children().len()
    }

    fn is_empty(&self) -> bool {
        self.children().is_empty()
    }
}

/// Anything the host loop advances once per rendered frame
pub trait FrameDriven {
    /// Advance by `delta_seconds` of elapsed time since the previous frame
    fn advance(&mut self, delta_seconds: f64);
}

/// Plain in-memory container
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarGroup {
    children: Vec<StarPrimitive>,
}

impl StarGroup {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneContainer for StarGroup {
    fn add_child(&mut self, child: StarPrimitive) {
        self.children.push(child);
    }

    fn clear_children(&mut self) {
        self.children.clear();
    }

    fn children(&self) -> &[StarPrimitive] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, PrimitiveKind};
    use crate::Vector3;

    fn star(index: usize) -> StarPrimitive {
        StarPrimitive {
            index,
            radius: 0.1,
            color: Color::WHITE,
            position: Vector3::new(0.0, 0.0, 1.0),
            kind: PrimitiveKind::Sphere,
        }
    }

    #[test]
    fn test_group_add_and_clear() {
        let mut group = StarGroup::new();
        assert!(group.is_empty());
        group.add_child(star(0));
        group.add_child(star(1));
        assert_eq!(group.len(), 2);
        assert_eq!(
            group.children().iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![0, 1]
        );
        group.clear_children();
        assert!(group.is_empty());
    }
}
