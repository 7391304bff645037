//! Action Scheduler tests
//!
//! Tests for:
//! - Immediate execution when idle and FIFO ordering when busy
//! - Sequential composites: each sub-action completes before the next starts
//! - Parallel composites: done only after every sub-action resolved
//! - One-shot completion tied to the declared duration
//! - Locomotion staging (rotate → move → idle restore → face camera)
//! - cancel_all semantics

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use familiar::animation::{AnimationClip, ClipBlender, ClipLibrary};
use familiar::behavior::{ActionDescriptor, ActionScheduler, SchedulerCtx};
use familiar::motion::MotionController;
use familiar::rig::Rig;

/// Everything a scheduler drives, advanced tick by tick.
struct Harness {
    blender: ClipBlender,
    motion: MotionController,
    rig: Rig,
    rng: StdRng,
    now: f64,
}

impl Harness {
    fn new() -> Self {
        let mut library = ClipLibrary::new();
        for name in ["idle", "walk", "run", "a", "b", "c"] {
            library.register(AnimationClip::new(name, 10.0));
        }
        Self {
            blender: ClipBlender::new(library, "idle", 0.25, 0.4),
            motion: MotionController::new(),
            rig: Rig::new(),
            rng: StdRng::seed_from_u64(7),
            now: 0.0,
        }
    }

    fn tick(&mut self, scheduler: &mut ActionScheduler, dt: f32) {
        self.now += f64::from(dt);
        let mut ctx = SchedulerCtx {
            blender: &mut self.blender,
            motion: &mut self.motion,
            rig: &mut self.rig,
            rng: &mut self.rng,
            now: self.now,
            dt,
        };
        scheduler.update(&mut ctx);
        self.blender.update(dt, self.now);
        self.motion.update(dt, &mut self.rig.root);
    }

    /// Ticks until the scheduler drains or the step budget runs out.
    fn run_until_idle(&mut self, scheduler: &mut ActionScheduler, dt: f32, max_steps: usize) {
        for _ in 0..max_steps {
            if !scheduler.is_busy() && scheduler.queue_len() == 0 {
                return;
            }
            self.tick(scheduler, dt);
        }
        panic!("scheduler did not drain within {max_steps} steps");
    }
}

// ============================================================================
// Queueing
// ============================================================================

#[test]
fn schedule_while_idle_begins_immediately() {
    let mut scheduler = ActionScheduler::new();
    assert!(!scheduler.is_busy());

    scheduler.schedule(ActionDescriptor::oneshot("a", 0.5));
    assert!(scheduler.is_busy());
    assert_eq!(scheduler.queue_len(), 0);
}

#[test]
fn schedule_while_busy_queues_fifo() {
    let mut harness = Harness::new();
    let mut scheduler = ActionScheduler::new();

    scheduler.schedule(ActionDescriptor::oneshot("a", 0.3));
    scheduler.schedule(ActionDescriptor::oneshot("b", 0.3));
    scheduler.schedule(ActionDescriptor::oneshot("c", 0.3));
    assert_eq!(scheduler.queue_len(), 2);

    // Record the order in which the one-shots request their clips
    let mut order: Vec<String> = Vec::new();
    for _ in 0..30 {
        harness.tick(&mut scheduler, 0.1);
        if let Some(name) = harness.blender.active_clip_name() {
            if order.last().map(String::as_str) != Some(name) {
                order.push(name.to_string());
            }
        }
        if !scheduler.is_busy() && scheduler.queue_len() == 0 {
            break;
        }
    }

    assert_eq!(order, ["a", "b", "c"], "descriptors must execute in arrival order");
    assert!(!scheduler.is_busy());
}

// ============================================================================
// One-shot
// ============================================================================

#[test]
fn oneshot_completes_after_declared_duration_not_clip_length() {
    let mut harness = Harness::new();
    let mut scheduler = ActionScheduler::new();

    // The clip itself is 10s long; the descriptor declares 0.4s
    scheduler.schedule(ActionDescriptor::oneshot("a", 0.4));

    harness.tick(&mut scheduler, 0.1);
    assert!(scheduler.is_busy());
    assert_eq!(harness.blender.active_clip_name(), Some("a"));

    harness.tick(&mut scheduler, 0.1);
    harness.tick(&mut scheduler, 0.1);
    assert!(scheduler.is_busy());

    harness.tick(&mut scheduler, 0.1);
    assert!(!scheduler.is_busy(), "done once the declared duration elapsed");
}

// ============================================================================
// Composites
// ============================================================================

#[test]
fn sequential_composite_orders_sub_actions_strictly() {
    let mut harness = Harness::new();
    let mut scheduler = ActionScheduler::new();

    scheduler.schedule(ActionDescriptor::sequence(vec![
        ActionDescriptor::oneshot("a", 0.3),
        ActionDescriptor::oneshot("b", 0.3),
        ActionDescriptor::oneshot("c", 0.3),
    ]));

    let mut order: Vec<String> = Vec::new();
    let mut saw_b_while_a_pending = false;
    let mut elapsed = 0.0_f32;
    while scheduler.is_busy() {
        harness.tick(&mut scheduler, 0.1);
        elapsed += 0.1;
        if let Some(name) = harness.blender.active_clip_name() {
            if order.last().map(String::as_str) != Some(name) {
                order.push(name.to_string());
            }
            // A runs for its full 0.3s before B may start
            if name == "b" && elapsed < 0.3 {
                saw_b_while_a_pending = true;
            }
        }
        assert!(elapsed < 5.0, "sequence did not finish");
    }

    assert_eq!(order, ["a", "b", "c"]);
    assert!(!saw_b_while_a_pending, "B started before A completed");
}

#[test]
fn parallel_composite_waits_for_all_sub_actions() {
    let mut harness = Harness::new();
    let mut scheduler = ActionScheduler::new();

    // A resolves after 0.2s, B after 0.6s; the composite only after both
    scheduler.schedule(ActionDescriptor::parallel(vec![
        ActionDescriptor::oneshot("a", 0.2),
        ActionDescriptor::oneshot("b", 0.6),
    ]));

    for _ in 0..4 {
        harness.tick(&mut scheduler, 0.1);
    }
    assert!(scheduler.is_busy(), "B has not resolved yet");

    for _ in 0..3 {
        harness.tick(&mut scheduler, 0.1);
    }
    assert!(!scheduler.is_busy(), "both sub-actions resolved");
}

#[test]
fn empty_composites_complete_immediately() {
    let mut harness = Harness::new();
    let mut scheduler = ActionScheduler::new();

    scheduler.schedule(ActionDescriptor::sequence(vec![]));
    harness.tick(&mut scheduler, 0.05);
    assert!(!scheduler.is_busy());

    scheduler.schedule(ActionDescriptor::parallel(vec![]));
    harness.tick(&mut scheduler, 0.05);
    assert!(!scheduler.is_busy());
}

#[test]
fn nested_composites_resolve_depth_first() {
    let mut harness = Harness::new();
    let mut scheduler = ActionScheduler::new();

    scheduler.schedule(ActionDescriptor::sequence(vec![
        ActionDescriptor::parallel(vec![
            ActionDescriptor::oneshot("a", 0.2),
            ActionDescriptor::oneshot("b", 0.3),
        ]),
        ActionDescriptor::oneshot("c", 0.2),
    ]));

    harness.run_until_idle(&mut scheduler, 0.1, 50);
    // The trailing one-shot ran last
    assert_eq!(harness.blender.active_clip_name(), Some("c"));
}

// ============================================================================
// Locomotion
// ============================================================================

#[test]
fn locomotion_without_target_only_plays_the_clip() {
    let mut harness = Harness::new();
    let mut scheduler = ActionScheduler::new();

    scheduler.schedule(ActionDescriptor::locomotion("walk", None, 1.0));
    harness.tick(&mut scheduler, 0.1);

    assert_eq!(harness.blender.active_clip_name(), Some("walk"));
    assert!(!harness.motion.is_moving());
    assert!(!scheduler.is_busy(), "clip-only locomotion completes immediately");
}

#[test]
fn locomotion_stages_rotate_then_move_then_idle() {
    let mut harness = Harness::new();
    let mut scheduler = ActionScheduler::new();

    let target = Vec3::new(0.5, 0.0, 2.0);
    scheduler.schedule(ActionDescriptor::locomotion("walk", Some(target), 1.0));

    // Stage 1: clip requested, rotation toward the target in flight
    harness.tick(&mut scheduler, 0.1);
    assert_eq!(harness.blender.active_clip_name(), Some("walk"));
    assert!(harness.motion.is_rotating());
    assert!(!harness.motion.is_moving(), "move must wait for the rotation");

    // Let the rotation finish, then the move starts
    let mut started_moving = false;
    for _ in 0..20 {
        harness.tick(&mut scheduler, 0.1);
        if harness.motion.is_moving() {
            assert!(!harness.motion.is_rotating(), "rotation completed before the move");
            started_moving = true;
            break;
        }
    }
    assert!(started_moving, "move stage never started");

    // Run the rest of the action: position reached, idle restored
    harness.run_until_idle(&mut scheduler, 0.1, 100);
    assert!((harness.rig.root.position - target).length() < 1e-3);
    assert_eq!(harness.blender.active_clip_name(), Some("idle"));
}

// ============================================================================
// cancel_all
// ============================================================================

#[test]
fn cancel_all_drops_queue_and_requests_idle() {
    let mut harness = Harness::new();
    let mut scheduler = ActionScheduler::new();

    scheduler.schedule(ActionDescriptor::oneshot("a", 5.0));
    scheduler.schedule(ActionDescriptor::oneshot("b", 5.0));
    scheduler.schedule(ActionDescriptor::oneshot("c", 5.0));
    scheduler.schedule(ActionDescriptor::oneshot("a", 5.0));
    assert_eq!(scheduler.queue_len(), 3);

    // Run past the one-shot's own cross-fade so the idle request lands
    for _ in 0..4 {
        harness.tick(&mut scheduler, 0.1);
    }

    scheduler.cancel_all(&mut harness.blender, harness.now);
    assert_eq!(scheduler.queue_len(), 0);
    assert!(!scheduler.is_busy());
    assert_eq!(harness.blender.active_clip_name(), Some("idle"));
}

#[test]
fn cancel_all_does_not_abort_inflight_tweens() {
    let mut harness = Harness::new();
    let mut scheduler = ActionScheduler::new();

    scheduler.schedule(ActionDescriptor::locomotion(
        "walk",
        Some(Vec3::new(0.0, 0.0, 3.0)),
        1.0,
    ));
    harness.tick(&mut scheduler, 0.1);
    assert!(harness.motion.is_rotating());

    scheduler.cancel_all(&mut harness.blender, harness.now);
    assert!(!scheduler.is_busy());
    // The rotation already in flight keeps running to completion
    assert!(harness.motion.is_rotating());

    let mut harness_steps = 0;
    while harness.motion.is_rotating() {
        harness.tick(&mut scheduler, 0.1);
        harness_steps += 1;
        assert!(harness_steps < 20, "tween should still complete");
    }
    // No new stage starts afterwards
    assert!(!harness.motion.is_moving());
    assert!(!scheduler.is_busy());
}
