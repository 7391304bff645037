#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod behavior;
pub mod config;
pub mod engine;
pub mod errors;
pub mod motion;
pub mod procedural;
pub mod rig;
pub mod timing;
pub mod utils;

pub use animation::{AnimationClip, ClipAction, ClipBlender, ClipLibrary, LoopMode};
pub use behavior::{
    ActionDescriptor, ActionScheduler, BehaviorMachine, ContextSelector, Mood, StateKind,
};
pub use config::BehaviorConfig;
pub use engine::CharacterEngine;
pub use errors::{EngineError, Result};
pub use motion::{MotionController, TweenTicket};
pub use procedural::{EarSide, ProceduralAnimator};
pub use rig::{Bone, BoneKey, BoneRole, Rig, Transform};
pub use timing::{FrameClock, TimerKey, TimerQueue};
