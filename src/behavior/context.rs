use glam::Vec3;
use rand::RngExt;
use rand::rngs::StdRng;

use crate::animation::ClipLibrary;
use crate::behavior::descriptor::ActionDescriptor;
use crate::errors::{EngineError, Result};

/// Points per keyword substring match.
const KEYWORD_POINTS: f32 = 2.0;
/// Points per emotion-keyword substring match.
const EMOTION_POINTS: f32 = 1.0;

/// Contextual reactions, enum-dispatched at selection time — no dynamic
/// dispatch by handler name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextHandler {
    /// Multi-waypoint stroll through randomized points.
    Stroll,
    /// Sprint to a far randomized point.
    Run,
    /// Several small hops, each turning toward its landing point.
    JumpSequence,
    /// One randomly chosen playful one-shot clip.
    PlayfulPick,
    /// Wind down into the sleep-like state.
    Doze,
}

/// One row of the static context table: trigger words, an emotion
/// vocabulary, the reaction to fire and its weight in `(0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct ContextMapping {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub emotion_keywords: &'static [&'static str],
    pub handler: ContextHandler,
    pub weight: f32,
}

static DEFAULT_MAPPINGS: &[ContextMapping] = &[
    ContextMapping {
        name: "walking",
        keywords: &["walk", "wander", "roam", "stroll", "outside"],
        emotion_keywords: &["calm", "relaxed", "curious"],
        handler: ContextHandler::Stroll,
        weight: 0.8,
    },
    ContextMapping {
        name: "running",
        keywords: &["run", "chase", "fetch", "fast", "zoom"],
        emotion_keywords: &["excited", "energetic", "thrilled"],
        handler: ContextHandler::Run,
        weight: 0.7,
    },
    ContextMapping {
        name: "jumping",
        keywords: &["jump", "hop", "bounce", "leap"],
        emotion_keywords: &["happy", "excited", "joyful"],
        handler: ContextHandler::JumpSequence,
        weight: 0.6,
    },
    ContextMapping {
        name: "playing",
        keywords: &["play", "toy", "game", "fun", "trick"],
        emotion_keywords: &["happy", "playful", "silly"],
        handler: ContextHandler::PlayfulPick,
        weight: 0.75,
    },
    ContextMapping {
        name: "sleeping",
        keywords: &["sleep", "nap", "tired", "rest", "bed"],
        emotion_keywords: &["sleepy", "calm", "drowsy"],
        handler: ContextHandler::Doze,
        weight: 0.5,
    },
];

/// The built-in context table.
#[must_use]
pub fn default_mappings() -> &'static [ContextMapping] {
    DEFAULT_MAPPINGS
}

/// Deterministic part of a mapping's score against lowercased text:
/// weighted keyword and emotion-keyword substring hits.
#[must_use]
pub fn score_mapping(mapping: &ContextMapping, text: &str) -> f32 {
    let mut points = 0.0;
    for kw in mapping.keywords {
        if text.contains(kw) {
            points += KEYWORD_POINTS;
        }
    }
    for kw in mapping.emotion_keywords {
        if text.contains(kw) {
            points += EMOTION_POINTS;
        }
    }
    points * mapping.weight
}

/// The winning mapping of an evaluation, ready to be built into actions.
#[derive(Debug, Clone, Copy)]
pub struct ContextDecision {
    pub name: &'static str,
    pub handler: ContextHandler,
}

/// What a fired handler wants to happen.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextOutcome {
    pub descriptors: Vec<ActionDescriptor>,
    /// The doze handler transitions into the sleep-like state directly.
    pub enter_sleep: bool,
}

impl ContextHandler {
    /// Builds the concrete action descriptors for this reaction.
    ///
    /// Clip names are validated against the library up front so a broken
    /// table row fails here, at the orchestration boundary, instead of
    /// degrading into silent half-played actions.
    pub fn build(
        self,
        library: &ClipLibrary,
        origin: Vec3,
        rng: &mut StdRng,
    ) -> Result<ContextOutcome> {
        match self {
            ContextHandler::Stroll => {
                require_clip(library, "walk")?;
                let waypoints = rng.random_range(2..=4);
                let mut cursor = origin;
                let mut legs = Vec::with_capacity(waypoints);
                for _ in 0..waypoints {
                    cursor += random_offset(rng, 1.0, 2.5);
                    let duration = rng.random_range(2.0..3.5);
                    legs.push(ActionDescriptor::locomotion("walk", Some(cursor), duration));
                }
                Ok(ContextOutcome {
                    descriptors: vec![ActionDescriptor::sequence(legs)],
                    enter_sleep: false,
                })
            }

            ContextHandler::Run => {
                require_clip(library, "run")?;
                let target = origin + random_offset(rng, 3.0, 5.0);
                Ok(ContextOutcome {
                    descriptors: vec![ActionDescriptor::locomotion("run", Some(target), 1.5)],
                    enter_sleep: false,
                })
            }

            ContextHandler::JumpSequence => {
                require_clip(library, "jump")?;
                let jumps = rng.random_range(2..=4);
                let mut cursor = origin;
                let mut hops = Vec::with_capacity(jumps);
                for _ in 0..jumps {
                    cursor += random_offset(rng, 0.4, 0.9);
                    // Each hop is a short locomotion so the character
                    // turns toward its landing point before the jump.
                    hops.push(ActionDescriptor::locomotion("jump", Some(cursor), 0.5));
                }
                Ok(ContextOutcome {
                    descriptors: vec![ActionDescriptor::sequence(hops)],
                    enter_sleep: false,
                })
            }

            ContextHandler::PlayfulPick => {
                let options = ["spin", "stretch", "wag"];
                let pick = options[rng.random_range(0..options.len())];
                require_clip(library, pick)?;
                Ok(ContextOutcome {
                    descriptors: vec![ActionDescriptor::oneshot(pick, 1.2)],
                    enter_sleep: false,
                })
            }

            ContextHandler::Doze => {
                require_clip(library, "stretch")?;
                Ok(ContextOutcome {
                    descriptors: vec![ActionDescriptor::oneshot("stretch", 1.0)],
                    enter_sleep: true,
                })
            }
        }
    }
}

fn require_clip(library: &ClipLibrary, name: &str) -> Result<()> {
    if library.contains(name) {
        Ok(())
    } else {
        Err(EngineError::ClipNotFound(name.to_string()))
    }
}

/// Random horizontal offset with magnitude in `[min, max)`.
fn random_offset(rng: &mut StdRng, min: f32, max: f32) -> Vec3 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let distance = rng.random_range(min..max);
    Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Scores free-form conversation text against the context table and
/// stochastically picks a reaction.
///
/// Single-flight: while an action this selector triggered is still
/// running, every evaluation is a no-op.
#[derive(Debug)]
pub struct ContextSelector {
    mappings: &'static [ContextMapping],
    score_threshold: f32,
    in_flight: bool,
}

impl ContextSelector {
    #[must_use]
    pub fn new(mappings: &'static [ContextMapping], score_threshold: f32) -> Self {
        Self {
            mappings,
            score_threshold,
            in_flight: false,
        }
    }

    #[must_use]
    pub fn with_defaults(score_threshold: f32) -> Self {
        Self::new(default_mappings(), score_threshold)
    }

    /// Scores both texts and picks the winning mapping, if any fires.
    ///
    /// Each mapping's deterministic score is multiplied by an independent
    /// jitter in `[0.8, 1.2)`; the best score must exceed the threshold,
    /// ties keep configuration order, and the winner still only fires
    /// with probability equal to its own weight.
    pub fn evaluate(
        &mut self,
        user_text: &str,
        response_text: &str,
        rng: &mut StdRng,
    ) -> Option<ContextDecision> {
        if self.in_flight {
            log::debug!("context evaluate: previous contextual action still in flight, skipping");
            return None;
        }

        let combined = format!("{user_text} {response_text}").to_lowercase();

        let mut best: Option<(&ContextMapping, f32)> = None;
        for mapping in self.mappings {
            let raw = score_mapping(mapping, &combined);
            if raw <= 0.0 {
                continue;
            }
            let jitter = rng.random_range(0.8..1.2);
            let scored = raw * jitter;
            // Strict comparison keeps the first mapping on ties
            if best.is_none_or(|(_, s)| scored > s) {
                best = Some((mapping, scored));
            }
        }

        let (mapping, scored) = best?;
        if scored <= self.score_threshold {
            return None;
        }

        // A high score does not guarantee execution: the winner fires
        // with probability equal to its weight.
        if !rng.random_bool(f64::from(mapping.weight.clamp(0.0, 1.0))) {
            log::debug!("context '{}' won scoring but did not fire", mapping.name);
            return None;
        }

        log::debug!("context '{}' fired (score {scored:.2})", mapping.name);
        self.in_flight = true;
        Some(ContextDecision {
            name: mapping.name,
            handler: mapping.handler,
        })
    }

    /// Whether a contextual action triggered by this selector is still
    /// running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Clears the single-flight guard. Called by the orchestration layer
    /// once the triggered action completed or its handler failed.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }
}
