//! Layout helpers for positioning nodes against the screen or each other.
//!
//! Edges are computed from the node's anchor, content size and scale. Rotation
//! is ignored, matching how UI nodes are normally laid out. Every placement
//! takes an `offset` that is added once the node has been aligned.

use crate::config::Screen;
use crate::math::Vec2;
use crate::node::Node;

/// A named point on a node's frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Spot {
    Center,
    CenterBottom,
    CenterTop,
    CenterLeft,
    CenterRight,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Spot {
    /// Position of the spot as a fraction of the node's size.
    pub fn fraction(self) -> Vec2 {
        match self {
            Spot::Center => Vec2::new(0.5, 0.5),
            Spot::CenterBottom => Vec2::new(0.5, 0.0),
            Spot::CenterTop => Vec2::new(0.5, 1.0),
            Spot::CenterLeft => Vec2::new(0.0, 0.5),
            Spot::CenterRight => Vec2::new(1.0, 0.5),
            Spot::TopLeft => Vec2::new(0.0, 1.0),
            Spot::TopRight => Vec2::new(1.0, 1.0),
            Spot::BottomLeft => Vec2::new(0.0, 0.0),
            Spot::BottomRight => Vec2::new(1.0, 0.0),
        }
    }
}

impl Node {
    /// `spot` in the node's own (unscaled) coordinates.
    pub fn local_point(&self, spot: Spot) -> Vec2 {
        spot.fraction().scaled(self.content_size.to_vec2())
    }

    /// `spot` in the parent's coordinates.
    pub fn parent_point(&self, spot: Spot) -> Vec2 {
        self.position + (spot.fraction() - self.anchor_point).scaled(self.scaled_size().to_vec2())
    }

    /// The position that puts this node's `spot` on `p`.
    pub fn local_from(&self, spot: Spot, p: Vec2) -> Vec2 {
        p + (self.anchor_point - spot.fraction()).scaled(self.scaled_size().to_vec2())
    }

    pub fn center(&self) -> Vec2 {
        self.local_point(Spot::Center)
    }

    pub fn center_bottom(&self) -> Vec2 {
        self.local_point(Spot::CenterBottom)
    }

    pub fn center_top(&self) -> Vec2 {
        self.local_point(Spot::CenterTop)
    }

    pub fn center_left(&self) -> Vec2 {
        self.local_point(Spot::CenterLeft)
    }

    pub fn center_right(&self) -> Vec2 {
        self.local_point(Spot::CenterRight)
    }

    pub fn top_left(&self) -> Vec2 {
        self.local_point(Spot::TopLeft)
    }

    pub fn top_right(&self) -> Vec2 {
        self.local_point(Spot::TopRight)
    }

    pub fn bottom_left(&self) -> Vec2 {
        self.local_point(Spot::BottomLeft)
    }

    pub fn bottom_right(&self) -> Vec2 {
        self.local_point(Spot::BottomRight)
    }

    pub fn local_from_center(&self, p: Vec2) -> Vec2 {
        self.local_from(Spot::Center, p)
    }

    pub fn local_from_center_bottom(&self, p: Vec2) -> Vec2 {
        self.local_from(Spot::CenterBottom, p)
    }

    pub fn local_from_center_top(&self, p: Vec2) -> Vec2 {
        self.local_from(Spot::CenterTop, p)
    }

    pub fn local_from_center_left(&self, p: Vec2) -> Vec2 {
        self.local_from(Spot::CenterLeft, p)
    }

    pub fn local_from_center_right(&self, p: Vec2) -> Vec2 {
        self.local_from(Spot::CenterRight, p)
    }

    pub fn local_from_top_left(&self, p: Vec2) -> Vec2 {
        self.local_from(Spot::TopLeft, p)
    }

    pub fn local_from_top_right(&self, p: Vec2) -> Vec2 {
        self.local_from(Spot::TopRight, p)
    }

    pub fn local_from_bottom_left(&self, p: Vec2) -> Vec2 {
        self.local_from(Spot::BottomLeft, p)
    }

    pub fn local_from_bottom_right(&self, p: Vec2) -> Vec2 {
        self.local_from(Spot::BottomRight, p)
    }

    pub fn left_x(&self) -> f32 {
        self.parent_point(Spot::BottomLeft).x
    }

    pub fn right_x(&self) -> f32 {
        self.parent_point(Spot::TopRight).x
    }

    pub fn bottom_y(&self) -> f32 {
        self.parent_point(Spot::BottomLeft).y
    }

    pub fn top_y(&self) -> f32 {
        self.parent_point(Spot::TopRight).y
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    fn place(&mut self, spot: Spot, p: Vec2, offset: Vec2) {
        self.position = self.local_from(spot, p) + offset;
    }

    /// Align one axis only: `x` when `Some`, `y` when `Some`.
    fn place_axis(&mut self, spot: Spot, x: Option<f32>, y: Option<f32>, offset: Vec2) {
        let current = self.parent_point(spot);
        let target = Vec2::new(x.unwrap_or(current.x), y.unwrap_or(current.y));
        self.place(spot, target, offset);
    }

    /// Centre the node on the screen.
    pub fn layout_in_center(&mut self, screen: &Screen, offset: Vec2) {
        self.place(Spot::Center, screen.center(), offset);
    }

    pub fn align_screen_top(&mut self, screen: &Screen, offset: Vec2) {
        self.place_axis(Spot::CenterTop, None, Some(screen.height()), offset);
    }

    pub fn align_screen_bottom(&mut self, _screen: &Screen, offset: Vec2) {
        self.place_axis(Spot::CenterBottom, None, Some(0.0), offset);
    }

    pub fn align_screen_left(&mut self, _screen: &Screen, offset: Vec2) {
        self.place_axis(Spot::CenterLeft, Some(0.0), None, offset);
    }

    pub fn align_screen_right(&mut self, screen: &Screen, offset: Vec2) {
        self.place_axis(Spot::CenterRight, Some(screen.width()), None, offset);
    }

    /// Align with the top of the letterboxed content area.
    pub fn align_content_screen_top(&mut self, screen: &Screen, offset: Vec2) {
        let top = screen.content_rect().max_y();
        self.place_axis(Spot::CenterTop, None, Some(top), offset);
    }

    /// Align with the bottom of the letterboxed content area.
    pub fn align_content_screen_bottom(&mut self, screen: &Screen, offset: Vec2) {
        let bottom = screen.content_rect().min_y();
        self.place_axis(Spot::CenterBottom, None, Some(bottom), offset);
    }

    /// Place directly under `other`, centred horizontally on it.
    pub fn layout_below(&mut self, other: &Node, offset: Vec2) {
        self.place(Spot::CenterTop, other.parent_point(Spot::CenterBottom), offset);
    }

    /// Place directly over `other`, centred horizontally on it.
    pub fn layout_above(&mut self, other: &Node, offset: Vec2) {
        self.place(Spot::CenterBottom, other.parent_point(Spot::CenterTop), offset);
    }

    /// Place against the left side of `other`, centred vertically on it.
    pub fn layout_to_left_of(&mut self, other: &Node, offset: Vec2) {
        self.place(Spot::CenterRight, other.parent_point(Spot::CenterLeft), offset);
    }

    /// Place against the right side of `other`, centred vertically on it.
    pub fn layout_to_right_of(&mut self, other: &Node, offset: Vec2) {
        self.place(Spot::CenterLeft, other.parent_point(Spot::CenterRight), offset);
    }

    /// Share `other`'s horizontal centre.
    pub fn align_horizontal(&mut self, other: &Node, offset: Vec2) {
        let x = other.parent_point(Spot::Center).x;
        self.place_axis(Spot::Center, Some(x), None, offset);
    }

    /// Share `other`'s vertical centre.
    pub fn align_vertical(&mut self, other: &Node, offset: Vec2) {
        let y = other.parent_point(Spot::Center).y;
        self.place_axis(Spot::Center, None, Some(y), offset);
    }

    pub fn align_top(&mut self, other: &Node, offset: Vec2) {
        self.place_axis(Spot::CenterTop, None, Some(other.top_y()), offset);
    }

    pub fn align_bottom(&mut self, other: &Node, offset: Vec2) {
        self.place_axis(Spot::CenterBottom, None, Some(other.bottom_y()), offset);
    }

    pub fn align_left(&mut self, other: &Node, offset: Vec2) {
        self.place_axis(Spot::CenterLeft, Some(other.left_x()), None, offset);
    }

    pub fn align_right(&mut self, other: &Node, offset: Vec2) {
        self.place_axis(Spot::CenterRight, Some(other.right_x()), None, offset);
    }
}
