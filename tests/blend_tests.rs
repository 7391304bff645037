//! Clip Blend Manager tests
//!
//! Tests for:
//! - Unknown-clip and re-entrant play rejection
//! - Same-clip no-op behavior
//! - Cross-fade weight progression and fade-in from zero
//! - Transition slot clearing after the fade duration
//! - Play-once completion and the automatic, cancellable idle return
//! - stop / set_speed

use familiar::animation::{AnimationClip, ClipBlender, ClipLibrary, LoopMode};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn test_blender() -> ClipBlender {
    let mut library = ClipLibrary::new();
    library.register(AnimationClip::new("idle", 2.0));
    library.register(AnimationClip::new("walk", 1.5));
    library.register(AnimationClip::new("jump", 0.8));
    ClipBlender::new(library, "idle", 0.25, 0.4)
}

// ============================================================================
// Rejection paths
// ============================================================================

#[test]
fn play_unknown_clip_is_a_noop() {
    let mut blender = test_blender();
    assert!(blender.play("somersault", 0.3, LoopMode::Repeat, 0.0).is_none());
    assert_eq!(blender.active_clip_name(), None);
    assert!(!blender.is_transitioning());
}

#[test]
fn play_during_transition_is_rejected() {
    let mut blender = test_blender();
    assert!(blender.play("walk", 0.3, LoopMode::Repeat, 0.0).is_some());
    assert!(blender.is_transitioning());

    // Re-entrant call during the active cross-fade: rejected, not queued
    assert!(blender.play("jump", 0.3, LoopMode::Once, 0.05).is_none());
    assert_eq!(blender.active_clip_name(), Some("walk"));
}

#[test]
fn transition_slot_clears_after_fade_duration() {
    let mut blender = test_blender();
    blender.play("walk", 0.3, LoopMode::Repeat, 0.0);
    assert!(blender.is_transitioning());

    blender.update(0.1, 0.1);
    assert!(blender.is_transitioning());

    blender.update(0.25, 0.35);
    assert!(!blender.is_transitioning());

    // A new transition is accepted now
    assert!(blender.play("jump", 0.2, LoopMode::Once, 0.35).is_some());
}

#[test]
fn play_active_clip_returns_current_action_without_restart() {
    let mut blender = test_blender();
    blender.play("walk", 0.2, LoopMode::Repeat, 0.0);
    blender.update(0.3, 0.3);
    blender.update(0.3, 0.6);

    let time_before = blender.active().expect("active action").time;
    assert!(time_before > 0.0);

    // Requesting the already-active clip is a no-op returning the
    // unchanged current action
    let action = blender.play("walk", 0.2, LoopMode::Repeat, 0.6).expect("current action");
    assert!(approx(action.time, time_before));
}

// ============================================================================
// Cross-fade weights
// ============================================================================

#[test]
fn fade_in_from_zero_when_nothing_active() {
    let mut blender = test_blender();
    let action = blender.play("idle", 0.5, LoopMode::Repeat, 0.0).expect("accepted");
    assert!(approx(action.weight, 0.0));

    blender.update(0.25, 0.25);
    let weight = blender.active().expect("active").weight;
    assert!(approx(weight, 0.5), "expected half weight, got {weight}");

    blender.update(0.25, 0.5);
    assert!(approx(blender.active().expect("active").weight, 1.0));
}

#[test]
fn cross_fade_ramps_incoming_up_and_outgoing_down() {
    let mut blender = test_blender();
    blender.play("idle", 0.0, LoopMode::Repeat, 0.0);
    blender.play("walk", 1.0, LoopMode::Repeat, 0.0);

    blender.update(0.5, 0.5);
    let incoming = blender.active().expect("incoming").weight;
    let outgoing = blender.fading_out().expect("outgoing").weight;
    assert!(approx(incoming, 0.5), "incoming weight {incoming}");
    assert!(approx(outgoing, 0.5), "outgoing weight {outgoing}");

    // At the end of the fade the outgoing action is dropped entirely
    blender.update(0.5, 1.0);
    assert!(approx(blender.active().expect("incoming").weight, 1.0));
    assert!(blender.fading_out().is_none());
}

// ============================================================================
// Play-once completion and automatic idle return
// ============================================================================

#[test]
fn once_clip_returns_to_idle_after_grace_delay() {
    let mut blender = test_blender();
    blender.play("jump", 0.2, LoopMode::Once, 0.0);

    // Run past the clip's 0.8s duration
    blender.update(0.5, 0.5);
    blender.update(0.5, 1.0);
    assert!(blender.idle_return_pending());
    assert_eq!(blender.active_clip_name(), Some("jump"));

    // Grace delay (0.25s) elapses: the idle clip is requested
    blender.update(0.3, 1.3);
    assert_eq!(blender.active_clip_name(), Some("idle"));
    assert!(!blender.idle_return_pending());
}

#[test]
fn newer_transition_supersedes_pending_idle_return() {
    let mut blender = test_blender();
    blender.play("jump", 0.2, LoopMode::Once, 0.0);
    blender.update(0.5, 0.5);
    blender.update(0.5, 1.0);
    assert!(blender.idle_return_pending());

    // A newer accepted transition cancels the pending return
    assert!(blender.play("walk", 0.2, LoopMode::Repeat, 1.1).is_some());
    assert!(!blender.idle_return_pending());

    blender.update(0.5, 1.6);
    blender.update(0.5, 2.1);
    assert_eq!(blender.active_clip_name(), Some("walk"));
}

#[test]
fn once_clip_clamps_at_last_frame() {
    let mut blender = test_blender();
    blender.play("jump", 0.0, LoopMode::Once, 0.0);
    blender.update(2.0, 2.0);

    let action = blender.active().expect("active");
    assert!(approx(action.time, 0.8), "clamped at duration, got {}", action.time);
    assert!(action.is_finished());
}

// ============================================================================
// stop / set_speed
// ============================================================================

#[test]
fn stop_fades_out_without_replacement() {
    let mut blender = test_blender();
    blender.play("walk", 0.0, LoopMode::Repeat, 0.0);
    assert_eq!(blender.active_clip_name(), Some("walk"));

    blender.stop(0.2, 1.0);
    assert_eq!(blender.active_clip_name(), None);
    assert!(blender.fading_out().is_some());

    blender.update(0.25, 1.25);
    assert!(blender.fading_out().is_none());
}

#[test]
fn reset_invalidates_every_pending_continuation() {
    let mut blender = test_blender();
    blender.play("jump", 0.2, LoopMode::Once, 0.0);
    blender.update(1.0, 1.0);
    assert!(blender.idle_return_pending());

    blender.reset();
    assert_eq!(blender.active_clip_name(), None);
    assert!(!blender.is_transitioning());
    assert!(!blender.idle_return_pending());

    // The cancelled idle return never fires, and play works right away
    blender.update(1.0, 2.0);
    assert_eq!(blender.active_clip_name(), None);
    assert!(blender.play("walk", 0.2, LoopMode::Repeat, 2.0).is_some());
}

#[test]
fn set_speed_rescales_without_restarting() {
    let mut blender = test_blender();
    blender.play("walk", 0.0, LoopMode::Repeat, 0.0);
    blender.update(0.2, 0.2);
    let time_before = blender.active().expect("active").time;

    blender.set_speed(2.0);
    let action = blender.active().expect("active");
    assert!(approx(action.time_scale, 2.0));
    assert!(approx(action.time, time_before), "playback position preserved");

    blender.update(0.2, 0.4);
    assert!(approx(blender.active().expect("active").time, time_before + 0.4));
}
