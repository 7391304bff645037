use glam::Quat;
use rand::RngExt;
use rand::rngs::StdRng;

use crate::animation::{ClipBlender, LoopMode};
use crate::behavior::descriptor::ActionDescriptor;
use crate::behavior::mood::Mood;
use crate::behavior::scheduler::ActionScheduler;
use crate::config::BehaviorConfig;
use crate::procedural::{EarSide, ProceduralAnimator};
use crate::rig::Rig;

/// Z-axis posture tilt applied for the sleep pose, undone on wake.
const SLEEP_TILT: f32 = 0.25;
/// Cross-fade into the sleep pose.
const SLEEP_FADE: f32 = 0.6;

/// The character's high-level behavior state.
///
/// `Processing` and `Listening` are entered and exited only by external
/// triggers from the speech/text pipeline; they have no autonomous
/// timeout here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Idle,
    Playful,
    Curious,
    Talking,
    Sleep,
    Processing,
    Listening,
}

/// Borrowed collaborators for one state-machine tick.
pub struct StateCtx<'a> {
    pub blender: &'a mut ClipBlender,
    pub scheduler: &'a mut ActionScheduler,
    pub procedural: &'a mut ProceduralAnimator,
    pub rig: &'a mut Rig,
    pub rng: &'a mut StdRng,
    pub config: &'a BehaviorConfig,
    pub now: f64,
    pub talking: bool,
}

/// Owner of the current behavior state, the mood and the timers driving
/// idle-to-sleep and idle-to-activity transitions.
#[derive(Debug)]
pub struct BehaviorMachine {
    current: StateKind,
    previous: StateKind,
    entered_at: f64,
    mood: Mood,
    last_interaction: f64,
    next_idle_behavior_at: Option<f64>,
    sleep_tilt_applied: bool,
}

impl Default for BehaviorMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl BehaviorMachine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: StateKind::Idle,
            previous: StateKind::Idle,
            entered_at: 0.0,
            mood: Mood::Neutral,
            last_interaction: 0.0,
            next_idle_behavior_at: None,
            sleep_tilt_applied: false,
        }
    }

    /// Runs the idle entry actions once at startup so the character
    /// begins in a primed idle state.
    pub fn start(&mut self, ctx: &mut StateCtx<'_>) {
        self.entered_at = ctx.now;
        self.apply_entry(StateKind::Idle, ctx);
    }

    /// Evaluates timed transitions once per tick.
    pub fn update(&mut self, ctx: &mut StateCtx<'_>) {
        match self.current {
            StateKind::Idle => {
                let idle_for = ctx.now - self.last_interaction;
                if idle_for > f64::from(ctx.config.inactivity_threshold) && !ctx.talking {
                    self.enter(StateKind::Sleep, ctx);
                    return;
                }

                match self.next_idle_behavior_at {
                    None => self.reroll_idle_timer(ctx),
                    Some(at) if ctx.now >= at => {
                        Self::trigger_idle_behavior(ctx);
                        self.reroll_idle_timer(ctx);
                    }
                    Some(_) => {}
                }
            }

            StateKind::Playful => {
                if ctx.now - self.entered_at >= f64::from(ctx.config.playful_timeout) {
                    self.enter(StateKind::Idle, ctx);
                }
            }

            StateKind::Curious => {
                if ctx.now - self.entered_at >= f64::from(ctx.config.curious_timeout) {
                    self.enter(StateKind::Idle, ctx);
                }
            }

            StateKind::Talking => {
                if !ctx.talking {
                    self.enter(StateKind::Idle, ctx);
                }
            }

            StateKind::Sleep => {
                // Wake only for a *recent* interaction, not the stale one
                // that preceded falling asleep.
                if ctx.now - self.last_interaction <= f64::from(ctx.config.wake_recency_window) {
                    self.enter(StateKind::Playful, ctx);
                }
            }

            // Owned entirely by the external speech/text pipeline.
            StateKind::Processing | StateKind::Listening => {}
        }
    }

    /// Externally requested state change (speech/chat pipeline, UI).
    pub fn change_state(&mut self, state: StateKind, ctx: &mut StateCtx<'_>) {
        self.enter(state, ctx);
    }

    /// Records a user interaction on any input channel.
    pub fn register_interaction(&mut self, now: f64) {
        self.last_interaction = now;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn state(&self) -> StateKind {
        self.current
    }

    #[must_use]
    pub fn previous_state(&self) -> StateKind {
        self.previous
    }

    #[must_use]
    pub fn mood(&self) -> Mood {
        self.mood
    }

    #[must_use]
    pub fn is_asleep(&self) -> bool {
        self.current == StateKind::Sleep
    }

    #[must_use]
    pub fn time_in_state(&self, now: f64) -> f64 {
        now - self.entered_at
    }

    #[must_use]
    pub fn last_interaction(&self) -> f64 {
        self.last_interaction
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn enter(&mut self, state: StateKind, ctx: &mut StateCtx<'_>) {
        if state == self.current {
            return;
        }

        // Exit actions: the sleep posture tilt is undone before anything
        // else runs.
        if self.current == StateKind::Sleep && self.sleep_tilt_applied {
            ctx.rig.root.rotation *= Quat::from_rotation_z(-SLEEP_TILT);
            self.sleep_tilt_applied = false;
        }

        self.previous = self.current;
        self.current = state;
        self.entered_at = ctx.now;
        log::debug!("behavior state: {:?} -> {state:?}", self.previous);

        self.apply_entry(state, ctx);
    }

    fn apply_entry(&mut self, state: StateKind, ctx: &mut StateCtx<'_>) {
        match state {
            StateKind::Idle => {
                self.mood = Mood::Neutral;
                ctx.blender.play(
                    &ctx.config.idle_clip,
                    ctx.config.default_fade,
                    LoopMode::Repeat,
                    ctx.now,
                );
                self.reroll_idle_timer(ctx);
            }
            StateKind::Playful => self.mood = Mood::Happy,
            StateKind::Curious => self.mood = Mood::Curious,
            StateKind::Talking => self.mood = Mood::Engaged,
            StateKind::Sleep => {
                self.mood = Mood::Sleepy;
                ctx.blender
                    .play(&ctx.config.sleep_clip, SLEEP_FADE, LoopMode::Repeat, ctx.now);
                ctx.blender.set_speed(Mood::Sleepy.speed_scale());
                ctx.rig.root.rotation *= Quat::from_rotation_z(SLEEP_TILT);
                self.sleep_tilt_applied = true;
            }
            // Mood only; animation side effects are owned by the caller.
            StateKind::Processing => self.mood = Mood::Engaged,
            StateKind::Listening => self.mood = Mood::Curious,
        }
    }

    fn reroll_idle_timer(&mut self, ctx: &mut StateCtx<'_>) {
        let interval = ctx
            .rng
            .random_range(ctx.config.idle_behavior_min..ctx.config.idle_behavior_max);
        self.next_idle_behavior_at = Some(ctx.now + f64::from(interval));
    }

    /// Picks one of the small idle behaviors: a tail flick, an ear
    /// twitch, or a stretch one-shot.
    fn trigger_idle_behavior(ctx: &mut StateCtx<'_>) {
        match ctx.rng.random_range(0..3u32) {
            0 => ctx.procedural.perform_tail_flick(ctx.now),
            1 => {
                let side = if ctx.rng.random_bool(0.5) {
                    EarSide::Left
                } else {
                    EarSide::Right
                };
                ctx.procedural.perform_ear_twitch(side, ctx.now);
            }
            _ => ctx
                .scheduler
                .schedule(ActionDescriptor::oneshot("stretch", 1.5)),
        }
    }
}
