//! Behavior Layer
//!
//! The decision-making half of the engine:
//! - [`Mood`]: coarse emotional tag modulating procedural motion and playback speed
//! - [`ActionDescriptor`]: declarative, schedulable units of behavior
//! - [`ActionScheduler`]: at-most-one executing action, FIFO queue, composite staging
//! - [`ContextSelector`]: keyword/emotion scoring of conversation text into actions
//! - [`BehaviorMachine`]: the high-level state machine driving everything else

pub mod context;
pub mod descriptor;
pub mod mood;
pub mod scheduler;
pub mod state;

pub use context::{
    ContextDecision, ContextHandler, ContextMapping, ContextOutcome, ContextSelector,
    default_mappings, score_mapping,
};
pub use descriptor::ActionDescriptor;
pub use mood::{Mood, TailTargets};
pub use scheduler::{ActionScheduler, SchedulerCtx};
pub use state::{BehaviorMachine, StateCtx, StateKind};
