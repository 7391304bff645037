//! Motion Controller
//!
//! Tweens the rig root's position (smoothstep-eased linear interpolation)
//! and orientation (spherical interpolation toward a yaw-clamped target
//! quaternion) over time. Each tween kind is a single-slot operation: a
//! second request of the same kind while one is in flight is rejected
//! with an immediately-resolved ticket rather than queued.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Quat, Vec3};

use crate::rig::Transform;
use crate::utils::{normalize_angle, smoothstep};

/// Lower bound of the allowed yaw arc (−90°).
pub const YAW_MIN: f32 = -FRAC_PI_2;
/// Upper bound of the allowed yaw arc (+45°).
pub const YAW_MAX: f32 = FRAC_PI_4;

/// Clamps a requested yaw angle into the allowed arc.
///
/// The angle is first normalized into `(-π, π]`, then clamped to
/// `[-90°, +45°]` around the object's local axis. This is a fixed
/// behavioral constraint: callers must expect the achieved angle to
/// differ from the requested one outside that arc.
#[inline]
#[must_use]
pub fn clamp_yaw(angle: f32) -> f32 {
    normalize_angle(angle).clamp(YAW_MIN, YAW_MAX)
}

/// Outcome of a move/rotate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenTicket {
    /// The tween was accepted and is now in flight.
    Started,
    /// An equivalent tween was already in flight; the request completes
    /// immediately as a no-op.
    Rejected,
}

impl TweenTicket {
    #[must_use]
    pub fn accepted(self) -> bool {
        self == TweenTicket::Started
    }
}

#[derive(Debug, Clone)]
struct PositionTween {
    start: Vec3,
    target: Vec3,
    elapsed: f32,
    duration: f32,
}

#[derive(Debug, Clone)]
struct RotationTween {
    start: Quat,
    target: Quat,
    elapsed: f32,
    duration: f32,
}

/// Completions reported by one controller update; each fires exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionEvents {
    pub move_finished: bool,
    pub rotate_finished: bool,
}

/// Position/orientation tween driver for a single transform.
#[derive(Debug, Default)]
pub struct MotionController {
    position: Option<PositionTween>,
    rotation: Option<RotationTween>,
}

impl MotionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a position tween from the transform's current position.
    ///
    /// Rejected while another move is in flight.
    pub fn move_to(&mut self, transform: &Transform, target: Vec3, duration: f32) -> TweenTicket {
        if self.position.is_some() {
            log::debug!("move_to: a move is already in progress, rejected");
            return TweenTicket::Rejected;
        }
        self.position = Some(PositionTween {
            start: transform.position,
            target,
            elapsed: 0.0,
            duration,
        });
        TweenTicket::Started
    }

    /// Starts an orientation tween toward the requested yaw angle.
    ///
    /// Operates on orientation, not raw angle: the yaw is normalized and
    /// clamped (see [`clamp_yaw`]), a target quaternion is built from it,
    /// and the transform slerps from its current orientation to that
    /// target. Rejected while another rotation is in flight.
    pub fn rotate_to(&mut self, transform: &Transform, yaw: f32, duration: f32) -> TweenTicket {
        if self.rotation.is_some() {
            log::debug!("rotate_to: a rotation is already in progress, rejected");
            return TweenTicket::Rejected;
        }
        let target = Quat::from_rotation_y(clamp_yaw(yaw));
        self.rotation = Some(RotationTween {
            start: transform.rotation,
            target,
            elapsed: 0.0,
            duration,
        });
        TweenTicket::Started
    }

    /// Advances both tweens and writes the interpolated fields back to
    /// the transform. Completions are reported exactly once, on the tick
    /// the tween reaches its end; the slot is freed so a new tween of
    /// the same kind can start.
    pub fn update(&mut self, dt: f32, transform: &mut Transform) -> MotionEvents {
        let mut events = MotionEvents::default();

        if let Some(tween) = &mut self.position {
            tween.elapsed += dt;
            let t = progress(tween.elapsed, tween.duration);
            let eased = smoothstep(t);
            transform.position = tween.start.lerp(tween.target, eased);
            if t >= 1.0 {
                self.position = None;
                events.move_finished = true;
            }
        }

        if let Some(tween) = &mut self.rotation {
            tween.elapsed += dt;
            let t = progress(tween.elapsed, tween.duration);
            let eased = smoothstep(t);
            transform.rotation = tween.start.slerp(tween.target, eased);
            if t >= 1.0 {
                self.rotation = None;
                events.rotate_finished = true;
            }
        }

        events
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.position.is_some()
    }

    #[must_use]
    pub fn is_rotating(&self) -> bool {
        self.rotation.is_some()
    }
}

/// Normalized tween progress, clamped to `[0, 1]`. Zero-length tweens
/// complete on their first update.
#[inline]
fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= f32::EPSILON {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}
