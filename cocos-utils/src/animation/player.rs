use super::action::Action;
use super::sequence::DEFAULT_DELAY_PER_UNIT;

/// Compiled form of an [`Action`]: one pass of every node, repeats kept as counts.
#[derive(Clone, Debug)]
enum Track {
    Frames {
        names: Vec<String>,
        /// End time of each frame relative to the start of this track.
        ends: Vec<f64>,
    },
    Sequence(Vec<Track>),
    Repeat { body: Box<Track>, times: u64 },
}

impl Track {
    fn compile(action: &Action) -> Self {
        match action {
            Action::Animate {
                frames,
                delay_per_unit,
            } => {
                let delay = if delay_per_unit.is_finite() && *delay_per_unit > 0.0 {
                    f64::from(*delay_per_unit)
                } else {
                    log::warn!(
                        "Invalid frame delay {}, using {}",
                        delay_per_unit,
                        DEFAULT_DELAY_PER_UNIT
                    );
                    f64::from(DEFAULT_DELAY_PER_UNIT)
                };
                Track::Frames {
                    names: frames.clone(),
                    ends: (1..=frames.len()).map(|i| i as f64 * delay).collect(),
                }
            }
            Action::Sequence(actions) => Track::Sequence(actions.iter().map(Track::compile).collect()),
            Action::Repeat { action, times } => Track::Repeat {
                body: Box::new(Track::compile(action)),
                times: *times,
            },
            // Nested forever loops never finish, so the outer body ends here.
            Action::RepeatForever(action) => {
                log::warn!("Nested RepeatForever played as a single pass");
                Track::compile(action)
            }
        }
    }

    fn duration(&self) -> f64 {
        match self {
            Track::Frames { ends, .. } => ends.last().copied().unwrap_or(0.0),
            Track::Sequence(tracks) => tracks.iter().map(Track::duration).sum(),
            Track::Repeat { body, times } => body.duration() * *times as f64,
        }
    }

    fn frame_count(&self) -> u64 {
        match self {
            Track::Frames { names, .. } => names.len() as u64,
            Track::Sequence(tracks) => tracks
                .iter()
                .fold(0u64, |acc, t| acc.saturating_add(t.frame_count())),
            Track::Repeat { body, times } => body.frame_count().saturating_mul(*times),
        }
    }

    /// Frame shown at time `t`, clamped to the last frame. `None` for empty tracks.
    fn locate(&self, t: f64) -> Option<(&str, u64)> {
        match self {
            Track::Frames { names, ends } => {
                let last = names.len().checked_sub(1)?;
                let i = ends.partition_point(|&end| end <= t).min(last);
                Some((names[i].as_str(), i as u64))
            }
            Track::Sequence(tracks) => {
                let playable: Vec<&Track> = tracks.iter().filter(|t| t.duration() > 0.0).collect();
                let mut t = t;
                let mut offset = 0u64;
                for (i, track) in playable.iter().enumerate() {
                    let duration = track.duration();
                    if t < duration || i + 1 == playable.len() {
                        let (name, index) = track.locate(t.min(duration))?;
                        return Some((name, offset.saturating_add(index)));
                    }
                    t -= duration;
                    offset = offset.saturating_add(track.frame_count());
                }
                None
            }
            Track::Repeat { body, times } => {
                let duration = body.duration();
                if *times == 0 || duration <= 0.0 {
                    return None;
                }
                let rep = ((t / duration).floor().max(0.0) as u64).min(times - 1);
                let inner = (t - rep as f64 * duration).clamp(0.0, duration);
                let (name, index) = body.locate(inner)?;
                Some((name, rep.saturating_mul(body.frame_count()).saturating_add(index)))
            }
        }
    }
}

/// Steps through an [`Action`] over time.
///
/// Finite actions stop on their last frame; `RepeatForever` wraps around and
/// counts completed loops. Repeats are never expanded, and each update does a
/// fixed amount of work however much time has passed.
#[derive(Clone, Debug)]
pub struct AnimationPlayer {
    track: Track,
    duration: f64,
    looping: bool,
    /// Time into the current pass.
    elapsed: f64,
    playing: bool,
    finished: bool,
    pub speed: f32,
    loop_count: u64,
}

impl AnimationPlayer {
    pub fn new(action: &Action) -> Self {
        let (body, looping) = match action {
            Action::RepeatForever(inner) => (inner.as_ref(), true),
            other => (other, false),
        };
        let track = Track::compile(body);
        let duration = track.duration();
        let empty = !(duration > 0.0 && duration.is_finite());
        if empty {
            log::warn!("Animation player created for an action with no frames");
        }

        Self {
            track,
            duration,
            looping,
            elapsed: 0.0,
            playing: !empty,
            finished: empty,
            speed: 1.0,
            loop_count: 0,
        }
    }

    /// Advance playback by `dt` seconds scaled by `speed`.
    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        let step = f64::from(dt) * f64::from(self.speed);
        if !step.is_finite() || step <= 0.0 {
            return;
        }

        self.elapsed += step;
        if self.elapsed < self.duration {
            return;
        }

        if self.looping {
            let loops = (self.elapsed / self.duration).floor();
            self.loop_count = self.loop_count.saturating_add(loops as u64);
            self.elapsed = (self.elapsed - loops * self.duration).max(0.0);
            if self.elapsed >= self.duration {
                self.elapsed = 0.0;
            }
        } else {
            self.elapsed = self.duration;
            self.playing = false;
            self.finished = true;
        }
    }

    /// Name of the frame currently on screen.
    pub fn current_frame(&self) -> Option<&str> {
        self.track.locate(self.elapsed).map(|(name, _)| name)
    }

    /// Position of the current frame in the expanded playback order.
    pub fn current_index(&self) -> u64 {
        self.track.locate(self.elapsed).map_or(0, |(_, index)| index)
    }

    /// Frames in one full pass, counting every repeat.
    pub fn frame_count(&self) -> u64 {
        self.track.frame_count()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Completed passes of a `RepeatForever` action.
    pub fn loop_count(&self) -> u64 {
        self.loop_count
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Resume after [`pause`](Self::pause); does nothing once finished.
    pub fn resume(&mut self) {
        if !self.finished {
            self.playing = true;
        }
    }

    /// Reset to the first frame.
    pub fn reset(&mut self) {
        let empty = !(self.duration > 0.0 && self.duration.is_finite());
        self.elapsed = 0.0;
        self.loop_count = 0;
        self.playing = !empty;
        self.finished = empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animation, LoopMode};

    fn player_for(names: &[&str], mode: LoopMode, loops: u32) -> AnimationPlayer {
        let anim = Animation::from_names(names.iter().copied())
            .unwrap()
            .with_loop_mode(mode)
            .with_relative_loops(loops)
            .with_delay_per_unit(0.5)
            .unwrap();
        AnimationPlayer::new(&anim.action().unwrap())
    }

    #[test]
    fn steps_and_stops_on_last_frame() {
        let mut player = player_for(&["a", "b", "c"], LoopMode::ForwardBounceBack, 0);
        assert_eq!(player.current_frame(), Some("a"));
        player.update(0.5);
        assert_eq!(player.current_frame(), Some("b"));
        player.update(1.5);
        assert_eq!(player.current_frame(), Some("b"));
        assert_eq!(player.current_index(), 3);
        assert!(player.is_finished());
        player.update(10.0);
        assert_eq!(player.current_index(), 3);
    }

    #[test]
    fn forever_wraps_and_counts_loops() {
        let anim = Animation::from_names(["a", "b"])
            .unwrap()
            .with_delay_per_unit(0.25)
            .unwrap();
        let mut player = AnimationPlayer::new(&anim.action_forever().unwrap());
        player.update(1.0);
        assert_eq!(player.loop_count(), 2);
        assert_eq!(player.current_frame(), Some("a"));
        assert!(!player.is_finished());
    }

    #[test]
    fn tiny_delay_with_large_step_returns() {
        let anim = Animation::from_names(["a", "b"])
            .unwrap()
            .with_delay_per_unit(1e-30)
            .unwrap();
        let mut player = AnimationPlayer::new(&anim.action_forever().unwrap());
        player.update(1.0);
        player.update(f32::MAX);
        assert!(player.current_frame().is_some());
        assert!(player.loop_count() > 0);
        assert!(player.is_playing());
    }

    #[test]
    fn large_step_on_finite_action_finishes() {
        let mut player = player_for(&["a", "b", "c"], LoopMode::Normal, 1000);
        player.update(1e9);
        assert!(player.is_finished());
        assert_eq!(player.current_frame(), Some("c"));
        assert_eq!(player.current_index(), 3 * 1001 - 1);
    }

    #[test]
    fn huge_repeat_counts_are_not_expanded() {
        let mut player = player_for(&["a", "b", "c"], LoopMode::Normal, 200_000_000);
        assert_eq!(player.frame_count(), 600_000_003);
        // Middle of the fourth frame: second cycle, frame "a".
        player.update(1.75);
        assert_eq!(player.current_frame(), Some("a"));
        assert_eq!(player.current_index(), 3);
        assert!(!player.is_finished());
    }

    #[test]
    fn repeats_walk_through_bounce_cycles() {
        let mut player = player_for(&["a", "b", "c"], LoopMode::ReverseBounceBack, 1);
        let mut seen = vec![player.current_frame().unwrap().to_string()];
        for _ in 0..7 {
            player.update(0.5);
            seen.push(player.current_frame().unwrap().to_string());
        }
        assert_eq!(seen, ["c", "b", "a", "b", "c", "b", "a", "b"]);
        assert_eq!(player.current_index(), 7);
    }

    #[test]
    fn speed_scales_time() {
        let mut player = player_for(&["a", "b", "c"], LoopMode::Normal, 0);
        player.speed = 2.0;
        player.update(0.25);
        assert_eq!(player.current_frame(), Some("b"));
    }

    #[test]
    fn reversed_action_plays_backwards() {
        let anim = Animation::from_names(["a", "b", "c"])
            .unwrap()
            .with_delay_per_unit(1.0)
            .unwrap();
        let mut player = AnimationPlayer::new(&anim.action().unwrap().reversed());
        assert_eq!(player.current_frame(), Some("c"));
        player.update(1.0);
        assert_eq!(player.current_frame(), Some("b"));
    }

    #[test]
    fn pause_resume_and_reset() {
        let mut player = player_for(&["a", "b"], LoopMode::Normal, 1);
        player.pause();
        player.update(5.0);
        assert_eq!(player.current_frame(), Some("a"));
        player.resume();
        player.update(0.5);
        assert_eq!(player.current_frame(), Some("b"));
        player.update(5.0);
        assert!(player.is_finished());
        player.resume();
        assert!(!player.is_playing());
        player.reset();
        assert!(player.is_playing());
        assert_eq!(player.current_frame(), Some("a"));
    }

    #[test]
    fn zero_delay_falls_back_to_default() {
        let mut player = AnimationPlayer::new(&Action::repeat_forever(Action::animate(
            vec!["a".into(), "b".into()],
            0.0,
        )));
        player.update(DEFAULT_DELAY_PER_UNIT * 1.5);
        assert_eq!(player.current_frame(), Some("b"));
    }

    #[test]
    fn empty_action_never_plays() {
        let player = AnimationPlayer::new(&Action::Sequence(Vec::new()));
        assert!(!player.is_playing());
        assert_eq!(player.current_frame(), None);
    }

    #[test]
    fn zero_repeat_segments_are_skipped() {
        let action = Action::Sequence(vec![
            Action::repeat(Action::animate(vec!["x".into()], 1.0), 0),
            Action::animate(vec!["a".into(), "b".into()], 1.0),
        ]);
        let mut player = AnimationPlayer::new(&action);
        assert_eq!(player.current_frame(), Some("a"));
        player.update(1.0);
        assert_eq!(player.current_frame(), Some("b"));
    }
}
