//! Sprite-frame animations and the actions that play them.

mod action;
mod format;
mod player;
mod sequence;

pub use action::Action;
pub use format::FrameFormat;
pub use player::AnimationPlayer;
pub use sequence::{Animation, AnimationDef, FramesDef, LoopMode, LoopModeDef, DEFAULT_DELAY_PER_UNIT};
