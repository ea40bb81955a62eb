use glam::{Affine2, Vec2 as GlamVec2};
use serde::{Deserialize, Serialize};

use crate::math::{Rect, Size, Vec2};

/// The parts of a scene-graph node the layout and touch helpers need.
///
/// `position` is where the anchor point sits in the parent's space, with y
/// growing upwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub position: Vec2,
    /// Normalized anchor, (0, 0) is bottom-left and (1, 1) is top-right.
    pub anchor_point: Vec2,
    pub content_size: Size,
    pub scale: Vec2,
    /// Clockwise rotation in degrees.
    pub rotation: f32,
    pub visible: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            anchor_point: Vec2::new(0.5, 0.5),
            content_size: Size::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            visible: true,
        }
    }
}

impl Node {
    pub fn new(content_size: Size) -> Self {
        Self {
            content_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_anchor_point(mut self, anchor_point: Vec2) -> Self {
        self.anchor_point = anchor_point;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec2::new(scale, scale);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Anchor point in content (unscaled) coordinates.
    pub fn anchor_point_in_points(&self) -> Vec2 {
        self.anchor_point.scaled(self.content_size.to_vec2())
    }

    /// Content size after scaling, ignoring rotation.
    pub fn scaled_size(&self) -> Size {
        Size::new(
            self.content_size.width * self.scale.x.abs(),
            self.content_size.height * self.scale.y.abs(),
        )
    }

    /// Transform from node space to parent space.
    pub fn node_to_parent(&self) -> Affine2 {
        Affine2::from_translation(self.position.to_glam())
            * Affine2::from_angle(-self.rotation.to_radians())
            * Affine2::from_scale(self.scale.to_glam())
            * Affine2::from_translation(-self.anchor_point_in_points().to_glam())
    }

    /// Inverse of [`Node::node_to_parent`], `None` when the node is scaled to zero.
    pub fn parent_to_node(&self) -> Option<Affine2> {
        let forward = self.node_to_parent();
        if forward.matrix2.determinant().abs() <= f32::EPSILON {
            return None;
        }
        Some(forward.inverse())
    }

    pub fn convert_to_node_space(&self, parent_point: Vec2) -> Option<Vec2> {
        self.parent_to_node()
            .map(|m| Vec2::from_glam(m.transform_point2(parent_point.to_glam())))
    }

    pub fn convert_to_parent_space(&self, node_point: Vec2) -> Vec2 {
        Vec2::from_glam(self.node_to_parent().transform_point2(node_point.to_glam()))
    }

    /// Axis-aligned bounds of the transformed content in parent space.
    pub fn bounding_box(&self) -> Rect {
        let Size { width, height } = self.content_size;
        let m = self.node_to_parent();
        let corners = [
            GlamVec2::new(0.0, 0.0),
            GlamVec2::new(width, 0.0),
            GlamVec2::new(0.0, height),
            GlamVec2::new(width, height),
        ]
        .map(|c| Vec2::from_glam(m.transform_point2(c)));
        Rect::bounding(&corners)
    }

    /// True if `point` (parent space) lies inside this node's content.
    pub fn is_touched_by(&self, point: Vec2) -> bool {
        let local_bounds = Rect {
            origin: Vec2::ZERO,
            size: self.content_size,
        };
        self.convert_to_node_space(point)
            .map(|local| local_bounds.contains_point(local))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn bounding_box_respects_anchor_and_scale() {
        let node = Node::new(Size::new(20.0, 10.0))
            .with_position(Vec2::new(100.0, 50.0))
            .with_scale(2.0);
        assert_eq!(node.bounding_box(), Rect::new(80.0, 40.0, 40.0, 20.0));
    }

    #[test]
    fn rotation_is_clockwise() {
        let node = Node::new(Size::new(10.0, 10.0))
            .with_anchor_point(Vec2::ZERO)
            .with_rotation(90.0);
        // The content's right edge now points down.
        let p = node.convert_to_parent_space(Vec2::new(10.0, 0.0));
        assert!(approx(p, Vec2::new(0.0, -10.0)));
    }

    #[test]
    fn node_space_round_trip() {
        let node = Node::new(Size::new(30.0, 20.0))
            .with_position(Vec2::new(5.0, 7.0))
            .with_rotation(30.0)
            .with_scale(1.5);
        let local = Vec2::new(3.0, 4.0);
        let parent = node.convert_to_parent_space(local);
        assert!(approx(node.convert_to_node_space(parent).unwrap(), local));
    }

    #[test]
    fn hit_testing() {
        let node = Node::new(Size::new(10.0, 10.0)).with_position(Vec2::new(50.0, 50.0));
        assert!(node.is_touched_by(Vec2::new(50.0, 50.0)));
        assert!(node.is_touched_by(Vec2::new(45.0, 55.0)));
        assert!(!node.is_touched_by(Vec2::new(56.0, 50.0)));
    }

    #[test]
    fn zero_scale_is_never_touched() {
        let node = Node::new(Size::new(10.0, 10.0)).with_scale(0.0);
        assert!(!node.is_touched_by(Vec2::ZERO));
        assert!(node.parent_to_node().is_none());
    }
}
