use crate::animation::action::{ClipAction, LoopMode};
use crate::animation::clip::ClipLibrary;
use crate::timing::{TimerKey, TimerQueue};

/// Delayed work owned by the blender, keyed by the logical clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlendTask {
    /// Frees the transition slot once the cross-fade has elapsed.
    ClearTransition,
    /// Automatic return to the idle clip after a play-once clip finished.
    FadeToIdle,
}

/// In-flight cross-fade handle. While this slot is occupied, `play` is
/// rejected instead of queued.
#[derive(Debug)]
struct Transition {
    timer: TimerKey,
}

/// The clip blend manager.
///
/// Owns the clip table and the single active [`ClipAction`], cross-fades
/// between clips, and enforces at most one transition at a time via a
/// single-slot in-flight handle rather than an ad hoc flag.
#[derive(Debug)]
pub struct ClipBlender {
    library: ClipLibrary,

    active: Option<ClipAction>,
    fading_out: Option<ClipAction>,
    transition: Option<Transition>,

    timers: TimerQueue<BlendTask>,
    idle_return: Option<TimerKey>,

    idle_clip: String,
    idle_return_grace: f32,
    default_fade: f32,
}

impl ClipBlender {
    #[must_use]
    pub fn new(library: ClipLibrary, idle_clip: &str, idle_return_grace: f32, default_fade: f32) -> Self {
        Self {
            library,
            active: None,
            fading_out: None,
            transition: None,
            timers: TimerQueue::new(),
            idle_return: None,
            idle_clip: idle_clip.to_string(),
            idle_return_grace,
            default_fade,
        }
    }

    #[must_use]
    pub fn library(&self) -> &ClipLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut ClipLibrary {
        &mut self.library
    }

    /// Requests a cross-fade to the named clip.
    ///
    /// Returns the new active action on success, or the unchanged current
    /// action when the clip is already active. Returns `None` (logged, no
    /// state change) when the clip is unknown or a transition is already
    /// in flight; re-entrant calls are rejected, never queued.
    pub fn play(
        &mut self,
        name: &str,
        fade: f32,
        loop_mode: LoopMode,
        now: f64,
    ) -> Option<&ClipAction> {
        let Some(clip) = self.library.get(name) else {
            log::warn!("play: unknown animation clip '{name}', ignoring");
            return None;
        };

        if self.transition.is_some() {
            log::debug!("play('{name}'): transition already in progress, rejected");
            return None;
        }

        if let Some(active) = &self.active {
            if active.clip_name() == name {
                return self.active.as_ref();
            }
        }

        // A pending automatic idle return is superseded by this transition.
        self.cancel_idle_return();

        // Outgoing clip fades down to zero; incoming starts from scratch
        // and fades up to full weight (from zero when nothing was active).
        if let Some(mut outgoing) = self.active.take() {
            outgoing.fade_to(0.0, fade);
            self.fading_out = Some(outgoing);
        }

        let mut incoming = ClipAction::new(clip, loop_mode);
        if fade > f32::EPSILON {
            incoming.weight = 0.0;
            incoming.fade_to(1.0, fade);

            let timer = self.timers.schedule(now + f64::from(fade), BlendTask::ClearTransition);
            self.transition = Some(Transition { timer });
        }
        self.active = Some(incoming);

        self.active.as_ref()
    }

    /// Fades the active clip out without starting a replacement.
    pub fn stop(&mut self, fade: f32, _now: f64) {
        self.cancel_idle_return();

        if let Some(mut outgoing) = self.active.take() {
            outgoing.fade_to(0.0, fade);
            self.fading_out = Some(outgoing);
        }
    }

    /// Rescales the active clip's playback rate without restarting it.
    pub fn set_speed(&mut self, scale: f32) {
        if let Some(active) = &mut self.active {
            active.time_scale = scale;
        }
    }

    /// Advances fades, playback time and scheduled blend tasks.
    pub fn update(&mut self, dt: f32, now: f64) {
        for task in self.timers.poll(now) {
            match task {
                BlendTask::ClearTransition => self.transition = None,
                BlendTask::FadeToIdle => {
                    self.idle_return = None;
                    if self.transition.is_some() {
                        // A cross-fade is still in flight; retry after
                        // another grace period instead of losing the
                        // idle return.
                        let key = self
                            .timers
                            .schedule(now + f64::from(self.idle_return_grace), BlendTask::FadeToIdle);
                        self.idle_return = Some(key);
                    } else {
                        let idle = self.idle_clip.clone();
                        let fade = self.default_fade;
                        self.play(&idle, fade, LoopMode::Repeat, now);
                    }
                }
            }
        }

        if let Some(outgoing) = &mut self.fading_out {
            outgoing.update(dt);
            if !outgoing.is_fading() && outgoing.weight <= f32::EPSILON {
                self.fading_out = None;
            }
        }

        let mut finished = false;
        if let Some(active) = &mut self.active {
            finished = active.update(dt);
        }

        // A play-once clip that just reached its end returns to idle
        // after a short grace delay, unless a newer transition supersedes
        // the pending task first.
        if finished {
            self.cancel_idle_return();
            let key = self
                .timers
                .schedule(now + f64::from(self.idle_return_grace), BlendTask::FadeToIdle);
            self.idle_return = Some(key);
        }
    }

    /// Teardown: invalidates every pending blend continuation (the
    /// transition-clear task and any automatic idle return) and drops
    /// both actions.
    pub fn reset(&mut self) {
        if let Some(transition) = self.transition.take() {
            self.timers.cancel(transition.timer);
        }
        self.cancel_idle_return();
        self.timers.clear();
        self.active = None;
        self.fading_out = None;
    }

    /// Requests the idle clip with the default fade.
    pub fn fade_to_idle(&mut self, now: f64) {
        let idle = self.idle_clip.clone();
        let fade = self.default_fade;
        self.play(&idle, fade, LoopMode::Repeat, now);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    #[must_use]
    pub fn active(&self) -> Option<&ClipAction> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn active_clip_name(&self) -> Option<&str> {
        self.active.as_ref().map(ClipAction::clip_name)
    }

    /// The outgoing action still fading down, if any.
    #[must_use]
    pub fn fading_out(&self) -> Option<&ClipAction> {
        self.fading_out.as_ref()
    }

    /// Whether an automatic idle return is currently pending.
    #[must_use]
    pub fn idle_return_pending(&self) -> bool {
        self.idle_return.is_some()
    }

    #[must_use]
    pub fn idle_clip(&self) -> &str {
        &self.idle_clip
    }

    fn cancel_idle_return(&mut self) {
        if let Some(key) = self.idle_return.take() {
            self.timers.cancel(key);
        }
    }
}
