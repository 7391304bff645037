/// Coarse emotional tag, distinct from the discrete behavior state.
///
/// Mood influences procedural-layer parameters (tail wag targets) and the
/// active clip's playback speed; it never gates transitions by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mood {
    #[default]
    Neutral,
    Happy,
    Excited,
    Curious,
    Engaged,
    Sleepy,
}

/// Steady-state targets the tail wag glides toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailTargets {
    /// Wag amplitude factor in `[0, 1]`.
    pub intensity: f32,
    /// Oscillation speed in radians per second.
    pub speed: f32,
}

impl Mood {
    /// Playback-speed scale forwarded to the clip blend manager.
    #[must_use]
    pub fn speed_scale(self) -> f32 {
        match self {
            Mood::Neutral => 1.0,
            Mood::Happy => 1.2,
            Mood::Excited => 1.35,
            Mood::Curious => 1.1,
            Mood::Engaged => 1.05,
            Mood::Sleepy => 0.5,
        }
    }

    /// Tail wag targets for this mood.
    #[must_use]
    pub fn tail_targets(self) -> TailTargets {
        match self {
            Mood::Neutral => TailTargets { intensity: 0.4, speed: 1.2 },
            Mood::Happy => TailTargets { intensity: 0.7, speed: 2.2 },
            Mood::Excited => TailTargets { intensity: 0.9, speed: 3.0 },
            Mood::Curious => TailTargets { intensity: 0.5, speed: 1.5 },
            Mood::Engaged => TailTargets { intensity: 0.6, speed: 1.8 },
            Mood::Sleepy => TailTargets { intensity: 0.1, speed: 0.5 },
        }
    }
}
