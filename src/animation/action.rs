use std::sync::Arc;

use crate::animation::clip::AnimationClip;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Play once and clamp at the last frame.
    Once,
    /// Repeat forever.
    Repeat,
}

/// Weight fade in progress on an action.
#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

/// The currently playing instance of a clip.
///
/// At most one action is active at a time; a successful transition
/// replaces the whole instance instead of mutating it in place.
#[derive(Debug, Clone)]
pub struct ClipAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,

    fade: Option<Fade>,
    finished: bool,
}

impl ClipAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>, loop_mode: LoopMode) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode,
            paused: false,
            fade: None,
            finished: false,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn clip_name(&self) -> &str {
        &self.clip.name
    }

    /// Starts a weight fade from the current weight to `target` over
    /// `duration` seconds. A zero duration applies immediately.
    pub fn fade_to(&mut self, target: f32, duration: f32) {
        if duration <= f32::EPSILON {
            self.weight = target;
            self.fade = None;
            return;
        }
        self.fade = Some(Fade {
            from: self.weight,
            to: target,
            elapsed: 0.0,
            duration,
        });
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Whether a play-once action has reached its clamped end frame.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances playback time and any weight fade.
    ///
    /// Returns `true` exactly once, on the tick a play-once action
    /// reaches the end of its clip.
    pub fn update(&mut self, dt: f32) -> bool {
        // Weight fade runs even while paused
        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
            let t = (fade.elapsed / fade.duration).clamp(0.0, 1.0);
            self.weight = fade.from + (fade.to - fade.from) * t;
            if t >= 1.0 {
                self.fade = None;
            }
        }

        if self.paused {
            return false;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return false;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration && !self.finished {
                    // Clamp at the last frame and report completion once
                    self.time = duration;
                    self.paused = true;
                    self.finished = true;
                    return true;
                }
            }
            LoopMode::Repeat => {
                if self.time >= duration {
                    self.time %= duration;
                }
            }
        }

        false
    }
}
