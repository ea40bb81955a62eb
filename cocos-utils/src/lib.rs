//! Cocos Utils - conveniences for 2D scene graphs.
//!
//! Sprite-frame animations with bounce-back looping, layout helpers for
//! positioning nodes, and a touch distributor for per-node touch handlers.

pub mod animation;
pub mod config;
pub mod error;
pub mod frames;
pub mod layout;
pub mod math;
pub mod node;
pub mod touch;

pub use crate::animation::{Action, Animation, AnimationDef, AnimationPlayer, LoopMode};
pub use crate::config::Screen;
pub use crate::error::{UtilsError, UtilsResult};
pub use crate::frames::{FrameSource, SpriteFrame, SpriteFrameCache, TextureHandle};
pub use crate::layout::Spot;
pub use crate::math::{Rect, Size, Vec2};
pub use crate::node::Node;
pub use crate::touch::{NodeLookup, TouchDistributor, TouchEvent, TouchKind};
pub use winit::event::TouchPhase;
