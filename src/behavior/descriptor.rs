use glam::Vec3;

/// A declarative request describing one schedulable unit of behavior.
///
/// Descriptors are immutable value objects created by callers (context
/// selector, state machine, UI) and consumed exactly once by the
/// [`ActionScheduler`](crate::behavior::ActionScheduler).
#[derive(Debug, Clone, PartialEq)]
pub enum ActionDescriptor {
    /// Play a movement clip and, when a target is given, walk the staged
    /// rotate → move → idle → face-camera sequence toward it.
    Locomotion {
        animation: String,
        target: Option<Vec3>,
        duration: f32,
    },
    /// Nested sub-actions, executed strictly in order or all at once.
    Composite {
        actions: Vec<ActionDescriptor>,
        parallel: bool,
    },
    /// Play a clip without looping; completion is signaled after the
    /// declared duration, not the clip's authored length.
    OneShot { animation: String, duration: f32 },
}

impl ActionDescriptor {
    #[must_use]
    pub fn locomotion(animation: &str, target: Option<Vec3>, duration: f32) -> Self {
        Self::Locomotion {
            animation: animation.to_string(),
            target,
            duration,
        }
    }

    #[must_use]
    pub fn oneshot(animation: &str, duration: f32) -> Self {
        Self::OneShot {
            animation: animation.to_string(),
            duration,
        }
    }

    #[must_use]
    pub fn sequence(actions: Vec<ActionDescriptor>) -> Self {
        Self::Composite {
            actions,
            parallel: false,
        }
    }

    #[must_use]
    pub fn parallel(actions: Vec<ActionDescriptor>) -> Self {
        Self::Composite {
            actions,
            parallel: true,
        }
    }
}
