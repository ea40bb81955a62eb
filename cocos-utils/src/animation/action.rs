use serde::{Deserialize, Serialize};

/// Playback description produced by an [`Animation`](super::Animation).
///
/// An action is a static tree: it can be inspected, reversed or handed to an
/// [`AnimationPlayer`](super::AnimationPlayer) any number of times.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Show each frame for `delay_per_unit` seconds, in order.
    Animate {
        frames: Vec<String>,
        delay_per_unit: f32,
    },
    /// Run each action after the previous one.
    Sequence(Vec<Action>),
    /// Run `action` `times` times.
    Repeat { action: Box<Action>, times: u64 },
    /// Run `action` until stopped.
    RepeatForever(Box<Action>),
}

impl Action {
    pub fn animate(frames: Vec<String>, delay_per_unit: f32) -> Self {
        Self::Animate {
            frames,
            delay_per_unit,
        }
    }

    pub fn repeat(action: Action, times: u64) -> Self {
        Self::Repeat {
            action: Box::new(action),
            times,
        }
    }

    pub fn repeat_forever(action: Action) -> Self {
        Self::RepeatForever(Box::new(action))
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Action::Animate { .. } => true,
            Action::Sequence(actions) => actions.iter().all(Action::is_finite),
            Action::Repeat { action, .. } => action.is_finite(),
            Action::RepeatForever(_) => false,
        }
    }

    /// Number of frames shown by one full run, `None` when infinite.
    pub fn frame_count(&self) -> Option<usize> {
        match self {
            Action::Animate { frames, .. } => Some(frames.len()),
            Action::Sequence(actions) => actions.iter().map(Action::frame_count).sum(),
            Action::Repeat { action, times } => {
                let times = usize::try_from(*times).unwrap_or(usize::MAX);
                action.frame_count().map(|n| n.saturating_mul(times))
            }
            Action::RepeatForever(_) => None,
        }
    }

    /// Total playback time in seconds, `None` when infinite.
    pub fn duration(&self) -> Option<f32> {
        match self {
            Action::Animate {
                frames,
                delay_per_unit,
            } => Some(frames.len() as f32 * delay_per_unit),
            Action::Sequence(actions) => actions.iter().map(Action::duration).sum(),
            Action::Repeat { action, times } => action.duration().map(|d| d * *times as f32),
            Action::RepeatForever(_) => None,
        }
    }

    /// Flattened playback order, `None` when infinite.
    ///
    /// Allocates one entry per played frame, repeats included. Check
    /// [`frame_count`](Self::frame_count) first when repeat counts may be large;
    /// [`AnimationPlayer`](super::AnimationPlayer) plays the tree without expanding it.
    pub fn frames(&self) -> Option<Vec<&str>> {
        let mut out = Vec::with_capacity(self.frame_count()?);
        self.collect_frames(&mut out);
        Some(out)
    }

    fn collect_frames<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Action::Animate { frames, .. } => out.extend(frames.iter().map(String::as_str)),
            Action::Sequence(actions) => {
                for action in actions {
                    action.collect_frames(out);
                }
            }
            Action::Repeat { action, times } => {
                for _ in 0..*times {
                    action.collect_frames(out);
                }
            }
            // Guarded by `frames()`.
            Action::RepeatForever(_) => {}
        }
    }

    /// Same action played backwards.
    pub fn reversed(&self) -> Self {
        match self {
            Action::Animate {
                frames,
                delay_per_unit,
            } => Action::Animate {
                frames: frames.iter().rev().cloned().collect(),
                delay_per_unit: *delay_per_unit,
            },
            Action::Sequence(actions) => {
                Action::Sequence(actions.iter().rev().map(Action::reversed).collect())
            }
            Action::Repeat { action, times } => Action::repeat(action.reversed(), *times),
            Action::RepeatForever(action) => Action::repeat_forever(action.reversed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn nested_frames_flatten_in_order() {
        let action = Action::repeat(
            Action::Sequence(vec![
                Action::animate(names(&["a", "b"]), 0.1),
                Action::animate(names(&["c"]), 0.2),
            ]),
            2,
        );
        assert_eq!(action.frames().unwrap(), vec!["a", "b", "c", "a", "b", "c"]);
        assert_eq!(action.frame_count(), Some(6));
        let duration = action.duration().unwrap();
        assert!((duration - 0.8).abs() < 1e-6);
    }

    #[test]
    fn reversed_plays_backwards() {
        let action = Action::Sequence(vec![
            Action::animate(names(&["a", "b", "c"]), 0.1),
            Action::animate(names(&["d", "e"]), 0.1),
        ]);
        let mut expected = action.frames().unwrap();
        expected.reverse();
        assert_eq!(action.reversed().frames().unwrap(), expected);
    }

    #[test]
    fn repeat_forever_is_infinite() {
        let action = Action::repeat_forever(Action::animate(names(&["a"]), 0.1));
        assert!(!action.is_finite());
        assert_eq!(action.frames(), None);
        assert_eq!(action.duration(), None);
        assert_eq!(action.frame_count(), None);
    }

    #[test]
    fn zero_repeats_is_empty() {
        let action = Action::repeat(Action::animate(names(&["a"]), 0.1), 0);
        assert_eq!(action.frames().unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn counts_large_repeats_without_expanding() {
        let action = Action::repeat(Action::animate(names(&["a", "b", "c"]), 0.5), 200_000_001);
        assert_eq!(action.frame_count(), Some(600_000_003));
        assert!(action.duration().unwrap() > 3.0e8);
    }

    #[test]
    fn serializes_as_tagged_tree() {
        let action = Action::repeat(Action::animate(names(&["a"]), 0.5), 3);
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["repeat"]["times"], 3);
        let back: Action = serde_json::from_value(json).unwrap();
        assert_eq!(back, action);
    }
}
