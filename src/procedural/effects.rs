use rand::RngExt;
use rand::rngs::StdRng;

use crate::behavior::Mood;
use crate::procedural::ProceduralTick;
use crate::utils::damp;

/// Per-second probability rates are converted to a per-tick draw here.
fn chance(rng: &mut StdRng, rate_per_sec: f32, dt: f32) -> bool {
    let p = f64::from((rate_per_sec * dt).clamp(0.0, 1.0));
    p > 0.0 && rng.random_bool(p)
}

// ============================================================================
// Tail
// ============================================================================

const TAIL_GLIDE_RATE: f32 = 3.0;
const TAIL_WAG_MAX_ANGLE: f32 = 0.6;
const TAIL_FLICK_CHANCE: f32 = 0.35;
const TAIL_FLICK_DURATION: f64 = 0.4;
const TAIL_FLICK_FREQ: f32 = 18.0;
const TAIL_FLICK_ANGLE: f32 = 0.8;

/// Steady tail wag with mood-driven targets and transient flicks.
///
/// Intensity and oscillation speed glide toward the current mood's
/// targets with frame-rate independent smoothing, so the wag character
/// changes gradually rather than snapping on mood switches.
#[derive(Debug, Default)]
pub struct TailWag {
    intensity: f32,
    speed: f32,
    phase: f32,
    flick_until: Option<f64>,
}

impl TailWag {
    /// Advances the wag state and returns this tick's yaw offset.
    pub fn advance(&mut self, ctx: &ProceduralTick, rng: &mut StdRng) -> f32 {
        let targets = ctx.mood.tail_targets();
        self.intensity = damp(self.intensity, targets.intensity, TAIL_GLIDE_RATE, ctx.dt);
        self.speed = damp(self.speed, targets.speed, TAIL_GLIDE_RATE, ctx.dt);
        self.phase += ctx.dt * self.speed;

        if self.flick_until.is_none() && chance(rng, TAIL_FLICK_CHANCE, ctx.dt) {
            self.start_flick(ctx.now);
        }

        if let Some(until) = self.flick_until {
            if ctx.now < until {
                // Flick overrides the steady wag for its whole window
                return (ctx.now as f32 * TAIL_FLICK_FREQ).sin() * TAIL_FLICK_ANGLE;
            }
            self.flick_until = None;
        }

        self.phase.sin() * self.intensity * TAIL_WAG_MAX_ANGLE
    }

    pub fn start_flick(&mut self, now: f64) {
        self.flick_until = Some(now + TAIL_FLICK_DURATION);
    }

    #[must_use]
    pub fn is_flicking(&self, now: f64) -> bool {
        self.flick_until.is_some_and(|until| now < until)
    }

    #[must_use]
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }
}

// ============================================================================
// Ears
// ============================================================================

const EAR_TWITCH_CHANCE: f32 = 0.25;
const EAR_TWITCH_DURATION: f64 = 0.3;
const EAR_TWITCH_FREQ: f32 = 26.0;
const EAR_TWITCH_ANGLE: f32 = 0.35;
const EAR_SWAY_SPEED: f32 = 4.0;
const EAR_SWAY_ANGLE: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarSide {
    Left,
    Right,
}

/// Rotation offsets for both ears this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarOffsets {
    pub left: f32,
    pub right: f32,
}

/// Random per-ear twitches, plus a continuous both-ear sway while the
/// mood is curious.
#[derive(Debug, Default)]
pub struct EarState {
    twitch_until: [Option<f64>; 2],
    sway_phase: f32,
}

impl EarState {
    pub fn advance(&mut self, ctx: &ProceduralTick, rng: &mut StdRng) -> EarOffsets {
        if chance(rng, EAR_TWITCH_CHANCE, ctx.dt) {
            let side = if rng.random_bool(0.5) {
                EarSide::Left
            } else {
                EarSide::Right
            };
            self.start_twitch(side, ctx.now);
        }

        let mut offsets = EarOffsets::default();

        if ctx.mood == Mood::Curious {
            self.sway_phase += ctx.dt * EAR_SWAY_SPEED;
            let sway = self.sway_phase.sin() * EAR_SWAY_ANGLE;
            offsets.left = sway;
            offsets.right = -sway;
        }

        for (i, offset) in [&mut offsets.left, &mut offsets.right].into_iter().enumerate() {
            if let Some(until) = self.twitch_until[i] {
                if ctx.now < until {
                    *offset += (ctx.now as f32 * EAR_TWITCH_FREQ).sin() * EAR_TWITCH_ANGLE;
                } else {
                    self.twitch_until[i] = None;
                }
            }
        }

        offsets
    }

    pub fn start_twitch(&mut self, side: EarSide, now: f64) {
        self.twitch_until[side_index(side)] = Some(now + EAR_TWITCH_DURATION);
    }

    #[must_use]
    pub fn is_twitching(&self, side: EarSide, now: f64) -> bool {
        self.twitch_until[side_index(side)].is_some_and(|until| now < until)
    }
}

fn side_index(side: EarSide) -> usize {
    match side {
        EarSide::Left => 0,
        EarSide::Right => 1,
    }
}

// ============================================================================
// Breathing
// ============================================================================

const BREATH_AWAKE_RATE: f32 = 2.0;
const BREATH_AWAKE_INTENSITY: f32 = 0.02;
const BREATH_ASLEEP_RATE: f32 = 1.1;
const BREATH_ASLEEP_INTENSITY: f32 = 0.05;

/// Sinusoidal scale modulation on the model's vertical axis. Slower and
/// deeper while asleep.
#[derive(Debug, Default)]
pub struct Breathing {
    phase: f32,
}

impl Breathing {
    /// Returns this tick's relative scale offset (applied against the
    /// cached scale baseline, never the live scale).
    pub fn advance(&mut self, ctx: &ProceduralTick) -> f32 {
        let (rate, intensity) = if ctx.asleep {
            (BREATH_ASLEEP_RATE, BREATH_ASLEEP_INTENSITY)
        } else {
            (BREATH_AWAKE_RATE, BREATH_AWAKE_INTENSITY)
        };
        self.phase += ctx.dt * rate;
        self.phase.sin() * intensity
    }
}

// ============================================================================
// Talk-bob
// ============================================================================

const TALK_BOB_FREQ: f32 = 14.0;
const TALK_BOB_AMOUNT: f32 = 0.12;

/// Sinusoidal head-rotation offset while the character is talking,
/// proportional to the external talking-intensity signal.
#[derive(Debug, Default)]
pub struct TalkBob {
    phase: f32,
}

impl TalkBob {
    pub fn advance(&mut self, ctx: &ProceduralTick) -> f32 {
        if !ctx.talking {
            return 0.0;
        }
        self.phase += ctx.dt * TALK_BOB_FREQ;
        self.phase.sin() * TALK_BOB_AMOUNT * ctx.talk_intensity.clamp(0.0, 1.0)
    }
}
