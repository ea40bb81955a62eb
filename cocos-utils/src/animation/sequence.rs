use serde::{Deserialize, Serialize};

use super::action::Action;
use super::format::FrameFormat;
use crate::error::{UtilsError, UtilsResult};
use crate::frames::{FrameSource, SpriteFrame};

/// Default time each frame stays on screen (12 fps).
pub const DEFAULT_DELAY_PER_UNIT: f32 = 1.0 / 12.0;

/// How one cycle of an animation walks its frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Forward only.
    #[default]
    Normal,
    /// Forward, then back down without repeating the turnaround frames.
    ForwardBounceBack,
    /// Backward, then forward without repeating the turnaround frames.
    ReverseBounceBack,
}

impl LoopMode {
    /// Integer code: `0` normal, `1` forward bounce-back, `-1` reverse bounce-back.
    pub fn code(self) -> i32 {
        match self {
            LoopMode::Normal => 0,
            LoopMode::ForwardBounceBack => 1,
            LoopMode::ReverseBounceBack => -1,
        }
    }
}

impl TryFrom<i32> for LoopMode {
    type Error = UtilsError;

    fn try_from(code: i32) -> UtilsResult<Self> {
        match code {
            0 => Ok(LoopMode::Normal),
            1 => Ok(LoopMode::ForwardBounceBack),
            -1 => Ok(LoopMode::ReverseBounceBack),
            other => Err(UtilsError::invalid_argument(format!(
                "invalid loop mode {other}, expected 0, 1 or -1"
            ))),
        }
    }
}

/// An ordered, named list of sprite frames and how to loop over them.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    frames: Vec<String>,
    frame_format: Option<String>,
    start_frame: Option<i32>,
    loop_mode: LoopMode,
    relative_loops: u32,
    delay_per_unit: f32,
}

impl Animation {
    /// Frames named by substituting `start_frame .. start_frame + total_frames`
    /// into `frame_format`, e.g. `walk%02d.png`.
    pub fn from_format(frame_format: &str, start_frame: i32, total_frames: i32) -> UtilsResult<Self> {
        if total_frames < 1 {
            return Err(UtilsError::invalid_argument(format!(
                "total frames must be at least 1, got {total_frames}"
            )));
        }
        let format = FrameFormat::parse(frame_format)?;
        let start = i64::from(start_frame);
        let frames = (0..i64::from(total_frames))
            .map(|i| format.format(start + i))
            .collect();

        Ok(Self {
            frames,
            frame_format: Some(frame_format.to_string()),
            start_frame: Some(start_frame),
            ..Self::base()
        })
    }

    /// Frames named explicitly, in playback order.
    pub fn from_names<I, S>(names: I) -> UtilsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let frames: Vec<String> = names.into_iter().map(Into::into).collect();
        if frames.is_empty() {
            return Err(UtilsError::invalid_argument(
                "an animation needs at least one frame name",
            ));
        }
        Ok(Self {
            frames,
            ..Self::base()
        })
    }

    fn base() -> Self {
        Self {
            frames: Vec::new(),
            frame_format: None,
            start_frame: None,
            loop_mode: LoopMode::Normal,
            relative_loops: 0,
            delay_per_unit: DEFAULT_DELAY_PER_UNIT,
        }
    }

    /// Use `loop_mode` for every cycle.
    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    /// Play `relative_loops` extra cycles after the first one.
    ///
    /// Every value is valid: `u32::MAX` plays `u32::MAX + 1` cycles.
    #[must_use]
    pub fn with_relative_loops(mut self, relative_loops: u32) -> Self {
        self.relative_loops = relative_loops;
        self
    }

    /// Show each frame for `delay_per_unit` seconds. Fails unless finite and positive.
    pub fn with_delay_per_unit(mut self, delay_per_unit: f32) -> UtilsResult<Self> {
        self.set_delay_per_unit(delay_per_unit)?;
        Ok(self)
    }

    /// Frame names in playback order.
    pub fn frame_names(&self) -> &[String] {
        &self.frames
    }

    /// Number of frames in one forward pass.
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    /// Template the names were generated from, if any.
    pub fn frame_format(&self) -> Option<&str> {
        self.frame_format.as_deref()
    }

    /// First number substituted into the template, if any.
    pub fn start_frame(&self) -> Option<i32> {
        self.start_frame
    }

    /// How each cycle walks the frames.
    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Change the loop mode used by the next [`action`](Self::action).
    pub fn set_loop_mode(&mut self, loop_mode: LoopMode) {
        self.loop_mode = loop_mode;
    }

    /// Set the loop mode from its integer code. Leaves the mode unchanged on error.
    pub fn set_loop_mode_code(&mut self, code: i32) -> UtilsResult<()> {
        self.loop_mode = LoopMode::try_from(code)?;
        Ok(())
    }

    /// Extra cycles after the first one.
    pub fn relative_loops(&self) -> u32 {
        self.relative_loops
    }

    /// Change the extra cycle count. `u32::MAX` plays `u32::MAX + 1` cycles.
    pub fn set_relative_loops(&mut self, relative_loops: u32) {
        self.relative_loops = relative_loops;
    }

    /// Seconds each frame stays on screen.
    pub fn delay_per_unit(&self) -> f32 {
        self.delay_per_unit
    }

    /// Change the frame delay. Leaves it unchanged unless finite and positive.
    pub fn set_delay_per_unit(&mut self, delay_per_unit: f32) -> UtilsResult<()> {
        if !delay_per_unit.is_finite() || delay_per_unit <= 0.0 {
            return Err(UtilsError::invalid_argument(format!(
                "delay per unit must be a positive number of seconds, got {delay_per_unit}"
            )));
        }
        self.delay_per_unit = delay_per_unit;
        Ok(())
    }

    /// Name of the frame at `index`, or `IndexOutOfRange`.
    pub fn frame_name(&self, index: usize) -> UtilsResult<&str> {
        self.frames
            .get(index)
            .map(String::as_str)
            .ok_or(UtilsError::IndexOutOfRange {
                index,
                len: self.frames.len(),
            })
    }

    /// Resolve the frame at `index` through `source`.
    pub fn frame_at_index(&self, index: usize, source: &impl FrameSource) -> UtilsResult<SpriteFrame> {
        source.sprite_frame(self.frame_name(index)?)
    }

    /// Resolve every frame, failing on the first one `source` does not know.
    pub fn sprite_frames(&self, source: &impl FrameSource) -> UtilsResult<Vec<SpriteFrame>> {
        self.frames.iter().map(|name| source.sprite_frame(name)).collect()
    }

    /// One loop of the animation according to the loop mode.
    fn cycle(&self) -> Action {
        let delay = self.delay_per_unit;
        let len = self.frames.len();
        // Frames between the two endpoints; empty for fewer than three frames.
        let inner = if len > 2 { &self.frames[1..len - 1] } else { &[][..] };

        let (first, second): (Vec<String>, Vec<String>) = match self.loop_mode {
            LoopMode::Normal => return Action::animate(self.frames.clone(), delay),
            LoopMode::ForwardBounceBack => (
                self.frames.clone(),
                inner.iter().rev().cloned().collect(),
            ),
            LoopMode::ReverseBounceBack => (
                self.frames.iter().rev().cloned().collect(),
                inner.to_vec(),
            ),
        };

        if second.is_empty() {
            Action::animate(first, delay)
        } else {
            Action::Sequence(vec![
                Action::animate(first, delay),
                Action::animate(second, delay),
            ])
        }
    }

    fn check(&self) -> UtilsResult<()> {
        if self.frames.is_empty() {
            return Err(UtilsError::invalid_argument("animation has no frames"));
        }
        if !self.delay_per_unit.is_finite() || self.delay_per_unit <= 0.0 {
            return Err(UtilsError::invalid_argument(format!(
                "invalid delay per unit {}",
                self.delay_per_unit
            )));
        }
        Ok(())
    }

    /// The action that plays this animation `relative_loops + 1` cycles.
    pub fn action(&self) -> UtilsResult<Action> {
        self.check()?;
        let cycle = self.cycle();
        let times = u64::from(self.relative_loops) + 1;
        log::trace!(
            "Built {:?} action over {} frames x{}",
            self.loop_mode,
            self.frames.len(),
            times
        );
        Ok(if times == 1 {
            cycle
        } else {
            Action::repeat(cycle, times)
        })
    }

    /// The action that repeats one cycle until stopped. Ignores `relative_loops`.
    pub fn action_forever(&self) -> UtilsResult<Action> {
        self.check()?;
        Ok(Action::repeat_forever(self.cycle()))
    }

    /// Build from a declarative definition.
    pub fn from_def(def: &AnimationDef) -> UtilsResult<Self> {
        let animation = match &def.frames {
            FramesDef::Format {
                format,
                start,
                count,
            } => Self::from_format(format, *start, *count)?,
            FramesDef::Names { names } => Self::from_names(names.iter().cloned())?,
        };
        animation
            .with_loop_mode(def.loop_mode.0)
            .with_relative_loops(def.relative_loops)
            .with_delay_per_unit(def.delay_per_unit)
    }

    /// Parse an [`AnimationDef`] from JSON and build it.
    pub fn from_json(json: &str) -> UtilsResult<Self> {
        let def: AnimationDef = serde_json::from_str(json)
            .map_err(|e| UtilsError::invalid_argument(format!("bad animation definition: {e}")))?;
        Self::from_def(&def)
    }
}

/// JSON-friendly description of an [`Animation`].
///
/// ```json
/// { "format": "walk%02d.png", "start": 1, "count": 8, "loop_mode": "forward_bounce_back" }
/// { "names": ["a.png", "b.png"], "loop_mode": -1, "relative_loops": 2 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationDef {
    #[serde(flatten)]
    pub frames: FramesDef,
    #[serde(default)]
    pub loop_mode: LoopModeDef,
    #[serde(default)]
    pub relative_loops: u32,
    #[serde(default = "default_delay")]
    pub delay_per_unit: f32,
}

fn default_delay() -> f32 {
    DEFAULT_DELAY_PER_UNIT
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FramesDef {
    Format {
        format: String,
        #[serde(default)]
        start: i32,
        count: i32,
    },
    Names {
        names: Vec<String>,
    },
}

/// Loop mode written either by name or by integer code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LoopModeDef(pub LoopMode);

impl<'de> Deserialize<'de> for LoopModeDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(i32),
            Name(LoopMode),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => LoopMode::try_from(code)
                .map(LoopModeDef)
                .map_err(serde::de::Error::custom),
            Raw::Name(mode) => Ok(LoopModeDef(mode)),
        }
    }
}
