pub mod action;
pub mod blend;
pub mod clip;

pub use action::{ClipAction, LoopMode};
pub use blend::ClipBlender;
pub use clip::{AnimationClip, ClipLibrary};
