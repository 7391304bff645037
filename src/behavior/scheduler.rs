use std::collections::VecDeque;

use glam::Vec3;
use rand::RngExt;
use rand::rngs::StdRng;

use crate::animation::{ClipBlender, LoopMode};
use crate::behavior::descriptor::ActionDescriptor;
use crate::motion::MotionController;
use crate::rig::Rig;

const LOCOMOTION_FADE: f32 = 0.3;
const ONESHOT_FADE: f32 = 0.2;
const ROTATE_DURATION: f32 = 0.6;
const FACE_CAMERA_DURATION: f32 = 0.5;
/// Small random yaw offset applied when turning back toward the camera.
const CAMERA_JITTER: f32 = 0.15;

/// Everything a running action may drive, borrowed for one update.
pub struct SchedulerCtx<'a> {
    pub blender: &'a mut ClipBlender,
    pub motion: &'a mut MotionController,
    pub rig: &'a mut Rig,
    pub rng: &'a mut StdRng,
    pub now: f64,
    pub dt: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskStatus {
    Pending,
    Done,
}

/// Stages of a locomotion action. Each stage must complete before the
/// next begins.
#[derive(Debug, Clone, Copy)]
enum LocomotionStage {
    Start,
    RotateToTarget(Vec3),
    Move,
    FaceCamera,
}

/// The in-flight form of a descriptor: an explicit state machine
/// advanced once per tick.
#[derive(Debug)]
enum ActionTask {
    Locomotion {
        animation: String,
        target: Option<Vec3>,
        duration: f32,
        stage: LocomotionStage,
    },
    Sequence {
        current: Option<Box<ActionTask>>,
        remaining: VecDeque<ActionDescriptor>,
    },
    Parallel {
        tasks: Vec<ActionTask>,
    },
    OneShot {
        animation: String,
        remaining: f32,
        started: bool,
    },
}

impl ActionTask {
    fn build(descriptor: ActionDescriptor) -> Self {
        match descriptor {
            ActionDescriptor::Locomotion {
                animation,
                target,
                duration,
            } => ActionTask::Locomotion {
                animation,
                target,
                duration,
                stage: LocomotionStage::Start,
            },
            ActionDescriptor::Composite { actions, parallel } => {
                if parallel {
                    ActionTask::Parallel {
                        tasks: actions.into_iter().map(ActionTask::build).collect(),
                    }
                } else {
                    ActionTask::Sequence {
                        current: None,
                        remaining: actions.into(),
                    }
                }
            }
            ActionDescriptor::OneShot {
                animation,
                duration,
            } => ActionTask::OneShot {
                animation,
                remaining: duration,
                started: false,
            },
        }
    }

    fn advance(&mut self, ctx: &mut SchedulerCtx<'_>) -> TaskStatus {
        match self {
            ActionTask::Locomotion {
                animation,
                target,
                duration,
                stage,
            } => advance_locomotion(animation, *target, *duration, stage, ctx),

            ActionTask::Sequence { current, remaining } => {
                if current.is_none() {
                    match remaining.pop_front() {
                        Some(next) => *current = Some(Box::new(ActionTask::build(next))),
                        None => return TaskStatus::Done,
                    }
                }
                if let Some(task) = current {
                    if task.advance(ctx) == TaskStatus::Done {
                        *current = None;
                        if remaining.is_empty() {
                            return TaskStatus::Done;
                        }
                    }
                }
                TaskStatus::Pending
            }

            ActionTask::Parallel { tasks } => {
                // No ordering guarantee among siblings; the composite is
                // done only once every one of them is.
                tasks.retain_mut(|task| task.advance(ctx) == TaskStatus::Pending);
                if tasks.is_empty() {
                    TaskStatus::Done
                } else {
                    TaskStatus::Pending
                }
            }

            ActionTask::OneShot {
                animation,
                remaining,
                started,
            } => {
                if !*started {
                    ctx.blender.play(animation, ONESHOT_FADE, LoopMode::Once, ctx.now);
                    *started = true;
                }
                // Completion follows the declared duration, not the
                // clip's authored length.
                *remaining -= ctx.dt;
                if *remaining <= 0.0 {
                    TaskStatus::Done
                } else {
                    TaskStatus::Pending
                }
            }
        }
    }
}

fn advance_locomotion(
    animation: &str,
    target: Option<Vec3>,
    duration: f32,
    stage: &mut LocomotionStage,
    ctx: &mut SchedulerCtx<'_>,
) -> TaskStatus {
    match *stage {
        LocomotionStage::Start => {
            ctx.blender
                .play(animation, LOCOMOTION_FADE, LoopMode::Repeat, ctx.now);
            let Some(point) = target else {
                // No destination: the clip request is the whole action.
                return TaskStatus::Done;
            };
            let to = point - ctx.rig.root.position;
            let yaw = to.x.atan2(to.z);
            ctx.motion.rotate_to(&ctx.rig.root, yaw, ROTATE_DURATION);
            *stage = LocomotionStage::RotateToTarget(point);
            TaskStatus::Pending
        }

        LocomotionStage::RotateToTarget(point) => {
            if ctx.motion.is_rotating() {
                return TaskStatus::Pending;
            }
            ctx.motion.move_to(&ctx.rig.root, point, duration);
            *stage = LocomotionStage::Move;
            TaskStatus::Pending
        }

        LocomotionStage::Move => {
            if ctx.motion.is_moving() {
                return TaskStatus::Pending;
            }
            ctx.blender.fade_to_idle(ctx.now);
            let jitter = ctx.rng.random_range(-CAMERA_JITTER..CAMERA_JITTER);
            ctx.motion
                .rotate_to(&ctx.rig.root, jitter, FACE_CAMERA_DURATION);
            *stage = LocomotionStage::FaceCamera;
            TaskStatus::Pending
        }

        LocomotionStage::FaceCamera => {
            if ctx.motion.is_rotating() {
                TaskStatus::Pending
            } else {
                TaskStatus::Done
            }
        }
    }
}

/// The action scheduler: at most one action executes at a time, the rest
/// wait in a FIFO queue.
#[derive(Debug, Default)]
pub struct ActionScheduler {
    current: Option<ActionTask>,
    queue: VecDeque<ActionDescriptor>,
}

impl ActionScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a descriptor: begins executing it immediately when idle,
    /// otherwise enqueues it.
    pub fn schedule(&mut self, descriptor: ActionDescriptor) {
        if self.current.is_some() {
            log::debug!("schedule: busy, queueing descriptor ({} pending)", self.queue.len() + 1);
            self.queue.push_back(descriptor);
        } else {
            self.current = Some(ActionTask::build(descriptor));
        }
    }

    /// Advances the executing action by one tick. When it completes, the
    /// head of the queue (if any) begins automatically.
    pub fn update(&mut self, ctx: &mut SchedulerCtx<'_>) {
        if let Some(task) = &mut self.current {
            if task.advance(ctx) == TaskStatus::Done {
                self.current = None;
            }
        }

        if self.current.is_none() {
            if let Some(next) = self.queue.pop_front() {
                self.current = Some(ActionTask::build(next));
            }
        }
    }

    /// Drops all queued work, frees the execution slot and requests the
    /// idle clip. A tween already in flight on the motion controller is
    /// left to run to completion; only new stages are prevented.
    pub fn cancel_all(&mut self, blender: &mut ClipBlender, now: f64) {
        let dropped = self.queue.len();
        self.queue.clear();
        self.current = None;
        if dropped > 0 {
            log::debug!("cancel_all: dropped {dropped} queued action(s)");
        }
        blender.fade_to_idle(now);
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}
