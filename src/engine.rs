//! Engine Core Module
//!
//! This module contains [`CharacterEngine`], the single owning
//! orchestration object. It holds every mutable piece of state (rig,
//! blender, motion, procedural layer, scheduler, selector, state machine,
//! RNG, logical clock) and passes explicit borrows into each component's
//! update, so the frame tick stays deterministic and each component is
//! testable in isolation — nothing is reached through ambient globals.
//!
//! # Lifecycle
//!
//! 1. Build a [`Rig`] and a [`ClipLibrary`], create the engine
//! 2. Call [`cache_baselines`](CharacterEngine::cache_baselines) once
//!    after bone discovery
//! 3. Drive [`update`](CharacterEngine::update) once per frame with the
//!    frame's delta time; the renderer consumes the rig's transforms
//!    after each update
//!
//! # Example
//!
//! ```rust,ignore
//! use familiar::{AnimationClip, BehaviorConfig, CharacterEngine, ClipLibrary, Rig};
//!
//! let mut library = ClipLibrary::new();
//! library.register(AnimationClip::new("idle", 2.0));
//!
//! let mut engine = CharacterEngine::new(BehaviorConfig::default(), Rig::new(), library);
//! engine.cache_baselines();
//!
//! loop {
//!     engine.update(dt);
//!     // ... renderer reads engine.rig() transforms ...
//! }
//! ```

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::animation::{ClipAction, ClipBlender, ClipLibrary, LoopMode};
use crate::behavior::{
    ActionDescriptor, ActionScheduler, BehaviorMachine, ContextSelector, Mood, SchedulerCtx,
    StateCtx, StateKind,
};
use crate::config::BehaviorConfig;
use crate::motion::MotionController;
use crate::procedural::{ProceduralAnimator, ProceduralTick};
use crate::rig::Rig;
use crate::timing::FrameClock;

/// Yaw jitter when turning back toward the camera after a contextual
/// action completes.
const FACE_CAMERA_JITTER: f32 = 0.15;
const FACE_CAMERA_DURATION: f32 = 0.5;

/// The orchestration core: owns all components and advances them in a
/// fixed order inside each frame tick.
pub struct CharacterEngine {
    config: BehaviorConfig,
    clock: FrameClock,

    rig: Rig,
    blender: ClipBlender,
    motion: MotionController,
    procedural: ProceduralAnimator,
    scheduler: ActionScheduler,
    selector: ContextSelector,
    machine: BehaviorMachine,

    rng: StdRng,

    talking: bool,
    talk_intensity: f32,
}

impl CharacterEngine {
    /// Creates an engine with an OS-seeded RNG.
    #[must_use]
    pub fn new(config: BehaviorConfig, rig: Rig, library: ClipLibrary) -> Self {
        Self::with_seed(config, rig, library, rand::random())
    }

    /// Creates an engine with a fixed RNG seed, for reproducible runs.
    #[must_use]
    pub fn with_seed(config: BehaviorConfig, rig: Rig, library: ClipLibrary, seed: u64) -> Self {
        let blender = ClipBlender::new(
            library,
            &config.idle_clip,
            config.idle_return_grace,
            config.default_fade,
        );
        let selector = ContextSelector::with_defaults(config.context_score_threshold);

        let mut engine = Self {
            config,
            clock: FrameClock::new(),
            rig,
            blender,
            motion: MotionController::new(),
            procedural: ProceduralAnimator::new(),
            scheduler: ActionScheduler::new(),
            selector,
            machine: BehaviorMachine::new(),
            rng: StdRng::seed_from_u64(seed),
            talking: false,
            talk_intensity: 0.0,
        };

        let now = engine.clock.now();
        let mut ctx = StateCtx {
            blender: &mut engine.blender,
            scheduler: &mut engine.scheduler,
            procedural: &mut engine.procedural,
            rig: &mut engine.rig,
            rng: &mut engine.rng,
            config: &engine.config,
            now,
            talking: false,
        };
        engine.machine.start(&mut ctx);

        engine
    }

    // ========================================================================
    // Frame tick
    // ========================================================================

    /// Advances the whole engine by one frame.
    ///
    /// Fixed update order: state machine, scheduler, contextual
    /// completion check, clip blending, tweens, then additive procedural
    /// offsets — so skeletal and tween writes always land before the
    /// procedural layer's offsets, which would otherwise be overwritten.
    pub fn update(&mut self, dt: f32) {
        self.clock.advance(dt);
        let now = self.clock.now();

        // 1. Behavior state machine
        let mut state_ctx = StateCtx {
            blender: &mut self.blender,
            scheduler: &mut self.scheduler,
            procedural: &mut self.procedural,
            rig: &mut self.rig,
            rng: &mut self.rng,
            config: &self.config,
            now,
            talking: self.talking,
        };
        self.machine.update(&mut state_ctx);

        // 2. Action scheduler
        let mut sched_ctx = SchedulerCtx {
            blender: &mut self.blender,
            motion: &mut self.motion,
            rig: &mut self.rig,
            rng: &mut self.rng,
            now,
            dt,
        };
        self.scheduler.update(&mut sched_ctx);

        // 3. Contextual single-flight completion
        if self.selector.is_busy() && !self.scheduler.is_busy() {
            self.finish_contextual(now);
        }

        // 4. Clip blending (fades, loop handling, scheduled blend tasks)
        self.blender.update(dt, now);

        // 5. Tweens write the root transform
        self.motion.update(dt, &mut self.rig.root);

        // 6. Additive procedural offsets, last
        let tick = ProceduralTick {
            dt,
            now,
            mood: self.machine.mood(),
            asleep: self.machine.is_asleep(),
            talking: self.talking,
            talk_intensity: self.talk_intensity,
        };
        self.procedural
            .tick(&tick, &mut self.rig, &mut self.blender, &mut self.rng);

        // Renderer-facing matrices
        self.rig.update_matrices();
    }

    // ========================================================================
    // Exposed collaborator interface
    // ========================================================================

    /// Requests a cross-fade to the named clip. See [`ClipBlender::play`].
    pub fn play_animation(
        &mut self,
        name: &str,
        fade: f32,
        loop_mode: LoopMode,
    ) -> Option<&ClipAction> {
        let now = self.clock.now();
        self.blender.play(name, fade, loop_mode, now)
    }

    /// Externally requested behavior state change (speech pipeline, UI).
    pub fn change_state(&mut self, state: StateKind) {
        let now = self.clock.now();
        let mut ctx = StateCtx {
            blender: &mut self.blender,
            scheduler: &mut self.scheduler,
            procedural: &mut self.procedural,
            rig: &mut self.rig,
            rng: &mut self.rng,
            config: &self.config,
            now,
            talking: self.talking,
        };
        self.machine.change_state(state, &mut ctx);
    }

    /// Records a user interaction on any input channel.
    pub fn register_interaction(&mut self) {
        self.machine.register_interaction(self.clock.now());
    }

    /// Submits an action descriptor to the scheduler.
    pub fn schedule_action(&mut self, descriptor: ActionDescriptor) {
        self.scheduler.schedule(descriptor);
    }

    /// Drops queued actions, frees the execution slot and returns to the
    /// idle clip. An in-flight tween runs to completion.
    pub fn cancel_all(&mut self) {
        let now = self.clock.now();
        self.scheduler.cancel_all(&mut self.blender, now);
    }

    /// Scores conversation text against the context table and, when a
    /// mapping fires, submits its actions to the scheduler.
    pub fn evaluate_context(&mut self, user_text: &str, response_text: &str) {
        let Some(decision) = self.selector.evaluate(user_text, response_text, &mut self.rng)
        else {
            return;
        };

        let origin = self.rig.root.position;
        match decision
            .handler
            .build(self.blender.library(), origin, &mut self.rng)
        {
            Ok(outcome) => {
                for descriptor in outcome.descriptors {
                    self.scheduler.schedule(descriptor);
                }
                if outcome.enter_sleep {
                    self.change_state(StateKind::Sleep);
                }
            }
            Err(err) => {
                // Handler failures never propagate: log, then run the
                // same cleanup a completed action would get.
                log::warn!("context handler '{}' failed: {err}", decision.name);
                self.finish_contextual(self.clock.now());
            }
        }
    }

    /// Updates the externally driven talking flag (speech playback).
    pub fn set_talking(&mut self, talking: bool) {
        self.talking = talking;
    }

    /// Updates the external talking-intensity signal in `[0, 1]`.
    pub fn set_talking_intensity(&mut self, intensity: f32) {
        self.talk_intensity = intensity.clamp(0.0, 1.0);
    }

    /// Snapshots bone baselines for the procedural layer. Call once
    /// after bone discovery, and again only to re-cache deliberately.
    pub fn cache_baselines(&mut self) {
        self.procedural.cache_baselines(&self.rig);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn state(&self) -> StateKind {
        self.machine.state()
    }

    #[must_use]
    pub fn mood(&self) -> Mood {
        self.machine.mood()
    }

    #[must_use]
    pub fn rig(&self) -> &Rig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut Rig {
        &mut self.rig
    }

    #[must_use]
    pub fn blender(&self) -> &ClipBlender {
        &self.blender
    }

    #[must_use]
    pub fn motion(&self) -> &MotionController {
        &self.motion
    }

    #[must_use]
    pub fn scheduler(&self) -> &ActionScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn selector(&self) -> &ContextSelector {
        &self.selector
    }

    #[must_use]
    pub fn procedural(&self) -> &ProceduralAnimator {
        &self.procedural
    }

    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    #[must_use]
    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Cleanup shared by contextual completion and handler failure:
    /// clear the single-flight guard, return to idle, face the camera
    /// with a small random offset.
    fn finish_contextual(&mut self, now: f64) {
        self.selector.finish();
        self.blender.fade_to_idle(now);
        let jitter = self.rng.random_range(-FACE_CAMERA_JITTER..FACE_CAMERA_JITTER);
        self.motion
            .rotate_to(&self.rig.root, jitter, FACE_CAMERA_DURATION);
    }
}
