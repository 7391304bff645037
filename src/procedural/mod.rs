//! Procedural Layer
//!
//! Additive, continuous motion applied on top of the skeletal pose every
//! frame: tail wag, ear twitches, breathing and talk-bob, plus transient
//! micro-gestures (flicks, twitches). All offsets are computed from bone
//! baselines captured once at startup — each tick first restores the
//! baselines (undoing the previous tick's offsets), then recomputes every
//! offset from scratch, so effects never compound across ticks.

pub mod baseline;
pub mod effects;

pub use baseline::BaselineCache;
pub use effects::EarSide;

use glam::Quat;
use rand::rngs::StdRng;

use crate::animation::ClipBlender;
use crate::behavior::Mood;
use crate::procedural::effects::{Breathing, EarState, TailWag, TalkBob};
use crate::rig::{BoneRole, Rig};

/// Per-tick inputs the procedural layer reads but does not own.
#[derive(Debug, Clone, Copy)]
pub struct ProceduralTick {
    pub dt: f32,
    pub now: f64,
    pub mood: Mood,
    pub asleep: bool,
    pub talking: bool,
    /// External talking-intensity signal in `[0, 1]`, derived from audio
    /// energy by the speech pipeline.
    pub talk_intensity: f32,
}

/// Owner of all procedural per-effect state.
#[derive(Debug, Default)]
pub struct ProceduralAnimator {
    baselines: BaselineCache,
    tail: TailWag,
    ears: EarState,
    breathing: Breathing,
    talk_bob: TalkBob,
}

impl ProceduralAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the current bone rotations and root scale as the
    /// zero-point for all additive offsets. Call once after bone
    /// discovery; calling again re-caches against the live pose.
    pub fn cache_baselines(&mut self, rig: &Rig) {
        self.baselines.cache(rig);
    }

    #[must_use]
    pub fn baselines_cached(&self) -> bool {
        self.baselines.is_cached()
    }

    /// Triggers a short, time-boxed tail flick overriding the steady wag.
    pub fn perform_tail_flick(&mut self, now: f64) {
        self.tail.start_flick(now);
    }

    /// Triggers a short twitch on one ear.
    pub fn perform_ear_twitch(&mut self, side: EarSide, now: f64) {
        self.ears.start_twitch(side, now);
    }

    /// Advances every effect for one frame.
    ///
    /// Write order per tick: restore baselines first, then recompute each
    /// offset from the baseline. A missing bone disables that effect for
    /// the tick, never more.
    pub fn tick(
        &mut self,
        ctx: &ProceduralTick,
        rig: &mut Rig,
        blender: &mut ClipBlender,
        rng: &mut StdRng,
    ) {
        if !self.baselines.is_cached() {
            return;
        }

        self.baselines.restore(rig);

        // Mood forwards a playback-speed scale to the blend manager.
        blender.set_speed(ctx.mood.speed_scale());

        self.apply_tail(ctx, rig, rng);
        self.apply_ears(ctx, rig, rng);
        self.apply_breathing(ctx, rig);
        self.apply_talk_bob(ctx, rig);
    }

    // ========================================================================
    // Effects
    // ========================================================================

    fn apply_tail(&mut self, ctx: &ProceduralTick, rig: &mut Rig, rng: &mut StdRng) {
        let offset = self.tail.advance(ctx, rng);
        let Some(key) = rig.role_key(BoneRole::Tail) else {
            return;
        };
        let Some(baseline) = self.baselines.rotation(key) else {
            return;
        };
        if let Some(bone) = rig.bone_mut(key) {
            bone.transform.rotation = baseline * Quat::from_rotation_y(offset);
        }
    }

    fn apply_ears(&mut self, ctx: &ProceduralTick, rig: &mut Rig, rng: &mut StdRng) {
        let offsets = self.ears.advance(ctx, rng);

        for (side, offset) in [(EarSide::Left, offsets.left), (EarSide::Right, offsets.right)] {
            let role = match side {
                EarSide::Left => BoneRole::EarLeft,
                EarSide::Right => BoneRole::EarRight,
            };
            let Some(key) = rig.role_key(role) else {
                continue;
            };
            let Some(baseline) = self.baselines.rotation(key) else {
                continue;
            };
            if let Some(bone) = rig.bone_mut(key) {
                bone.transform.rotation = baseline * Quat::from_rotation_z(offset);
            }
        }
    }

    fn apply_breathing(&mut self, ctx: &ProceduralTick, rig: &mut Rig) {
        let factor = self.breathing.advance(ctx);
        let Some(base_scale) = self.baselines.root_scale() else {
            return;
        };
        // Modulate against the cached baseline, never the live scale.
        let mut scale = base_scale;
        scale.y *= 1.0 + factor;
        rig.root.scale = scale;
    }

    fn apply_talk_bob(&mut self, ctx: &ProceduralTick, rig: &mut Rig) {
        let offset = self.talk_bob.advance(ctx);
        let Some(key) = rig.role_key(BoneRole::Head) else {
            return;
        };
        let Some(baseline) = self.baselines.rotation(key) else {
            return;
        };
        if let Some(bone) = rig.bone_mut(key) {
            bone.transform.rotation = baseline * Quat::from_rotation_x(offset);
        }
    }

    // ========================================================================
    // Read accessors (observability for callers and tests)
    // ========================================================================

    #[must_use]
    pub fn tail_intensity(&self) -> f32 {
        self.tail.intensity()
    }

    #[must_use]
    pub fn tail_speed(&self) -> f32 {
        self.tail.speed()
    }

    #[must_use]
    pub fn is_tail_flicking(&self, now: f64) -> bool {
        self.tail.is_flicking(now)
    }

    #[must_use]
    pub fn is_ear_twitching(&self, side: EarSide, now: f64) -> bool {
        self.ears.is_twitching(side, now)
    }
}
