//! Rotation state machine and the two tick-driven animations that move the wheel on its own.
//!
//! The controller never owns a clock. The host calls [`MotionController::tick`] with the time
//! elapsed since the previous frame for as long as [`MotionController::is_animating`] holds.

use crate::angle::normalize;
use crate::error::ChartError;
use crate::model::FULL_CIRCLE;
use crate::gesture;
use std::f64::consts::PI;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};

/// Deceleration applied to flings, in degrees per second squared. Earth gravity in inches at a
/// 160 dpi baseline, scaled by the usual scroll friction of 0.015.
pub const FLING_DECELERATION: f64 = 9.806_65 * 39.37 * 160.0 * 0.015;

pub const AUTO_CENTER_DURATION: Duration = Duration::from_millis(250);

/// A tick-driven value source. Both strategies produce absolute, unnormalized rotations.
pub trait Animation {
    /// Advances the animation by `elapsed` and returns the rotation for this frame.
    fn advance(&mut self, elapsed: Duration) -> i32;

    fn is_finished(&self) -> bool;

    /// Stops the animation where it currently is.
    fn force_finish(&mut self);
}

/// Inertial spin that decelerates at a constant rate until it stops.
#[derive(Debug, Clone, PartialEq)]
pub struct FlingDecay {
    start: i32,
    velocity: f64,
    deceleration: f64,
    duration: Duration,
    elapsed: Duration,
    finished: bool,
}

impl FlingDecay {
    /// `velocity` is in degrees per second and may be negative. `deceleration` must be positive.
    /// A spin too long to represent runs for [`Duration::MAX`].
    pub fn new(start: i32, velocity: f64, deceleration: f64) -> Self {
        let duration =
            Duration::try_from_secs_f64(velocity.abs() / deceleration).unwrap_or(Duration::MAX);
        Self {
            start,
            velocity,
            deceleration,
            duration,
            elapsed: Duration::ZERO,
            finished: duration.is_zero(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Where the spin comes to rest, in `0..360`.
    pub fn final_rotation(&self) -> i32 {
        self.rotation_at(self.duration)
    }

    fn offset_at(&self, t: f64) -> f64 {
        self.velocity * t - self.velocity.signum() * self.deceleration * t * t / 2.0
    }

    /// Rotation after `t`, wrapped in floating point so long spins cannot overflow.
    fn rotation_at(&self, t: Duration) -> i32 {
        let turn = FULL_CIRCLE as f64;
        let travel = self.offset_at(t.as_secs_f64()).round().rem_euclid(turn);
        normalize(normalize(self.start) + travel as i32)
    }

    fn current(&self) -> i32 {
        self.rotation_at(self.elapsed)
    }
}

impl Animation for FlingDecay {
    fn advance(&mut self, elapsed: Duration) -> i32 {
        if self.finished {
            return self.current();
        }

        self.elapsed = self.elapsed.saturating_add(elapsed);
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.finished = true;
            return self.final_rotation();
        }
        self.current()
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn force_finish(&mut self) {
        self.finished = true;
    }
}

/// Accelerate-decelerate curve, `cos((t + 1)π) / 2 + 0.5`. Monotonic on `0..=1` with
/// `ease(0) == 0` and `ease(1) == 1`.
pub fn ease_in_out(t: f64) -> f64 {
    ((t + 1.0) * PI).cos() / 2.0 + 0.5
}

/// Eased rotation towards a fixed target over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoCenter {
    from: i32,
    to: i32,
    duration: Duration,
    elapsed: Duration,
    finished: bool,
}

impl AutoCenter {
    pub fn new(from: i32, to: i32, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            finished: false,
        }
    }

    fn current(&self) -> i32 {
        if self.duration.is_zero() {
            return self.to;
        }
        let t = (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        self.from + ((self.to - self.from) as f64 * ease_in_out(t)) as i32
    }
}

impl Animation for AutoCenter {
    fn advance(&mut self, elapsed: Duration) -> i32 {
        if self.finished {
            return self.current();
        }

        self.elapsed = self.elapsed.saturating_add(elapsed);
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.finished = true;
            return self.to;
        }
        self.current()
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn force_finish(&mut self) {
        self.finished = true;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MotionSession {
    Fling(FlingDecay),
    AutoCenter(AutoCenter),
}

impl MotionSession {
    fn settle(&self) -> Settle {
        match self {
            Self::Fling(_) => Settle::Released,
            Self::AutoCenter(_) => Settle::Centered,
        }
    }

    fn animation(&mut self) -> &mut dyn Animation {
        match self {
            Self::Fling(decay) => decay,
            Self::AutoCenter(ease) => ease,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum MotionState {
    #[default]
    Idle,
    Dragging,
    Flinging,
    AutoCentering,
}

/// How a piece of motion came to rest. `Released` may be followed by auto-centering,
/// `Centered` never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    Released,
    Centered,
}

/// Result of one animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub rotation: i32,
    pub settled: Option<Settle>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOptions {
    pub fling_velocity_downscale: i32,
    pub auto_center_duration: Duration,
    pub fling_deceleration: f64,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            fling_velocity_downscale: gesture::FLING_VELOCITY_DOWNSCALE,
            auto_center_duration: AUTO_CENTER_DURATION,
            fling_deceleration: FLING_DECELERATION,
        }
    }
}

impl MotionOptions {
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.fling_velocity_downscale < 1 {
            return Err(ChartError::ZeroDownscale);
        }
        // the fastest fling a downscaled velocity can express must still end
        let decel = self.fling_deceleration;
        let longest = Duration::try_from_secs_f64(i32::MAX as f64 / decel);
        if !(decel.is_finite() && decel > 0.0) || longest.is_err() {
            return Err(ChartError::InvalidDeceleration(decel));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MotionController {
    rotation: i32,
    state: MotionState,
    session: Option<MotionSession>,
    options: MotionOptions,
}

impl MotionController {
    pub fn new(rotation: i32, options: MotionOptions) -> Self {
        Self {
            rotation: normalize(rotation),
            state: MotionState::Idle,
            session: None,
            options,
        }
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    /// Applies a rotation directly. The motion state is left alone.
    pub fn set_rotation(&mut self, degrees: i32) -> i32 {
        self.rotation = normalize(degrees);
        self.rotation
    }

    fn transition(&mut self, state: MotionState) {
        if self.state != state {
            log::debug!("Motion: {} -> {}", self.state, state);
            self.state = state;
        }
    }

    /// Gesture down: any running fling or auto-center is discarded, not resumed.
    pub fn press(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Motion: discarded running animation on press");
        }
        self.transition(MotionState::Dragging);
    }

    /// Applies a drag delta immediately and returns the new rotation.
    pub fn drag(&mut self, delta: f64) -> i32 {
        if self.state != MotionState::Dragging {
            self.press();
        }
        let step = gesture::downscale(delta, self.options.fling_velocity_downscale);
        self.set_rotation(self.rotation - step % FULL_CIRCLE)
    }

    /// Hands off to inertial motion. Returns `false` when the downscaled velocity is zero.
    pub fn fling(&mut self, velocity: f64) -> bool {
        let velocity = gesture::downscale(velocity, self.options.fling_velocity_downscale);
        if velocity == 0 {
            return false;
        }

        let decay = FlingDecay::new(self.rotation, velocity as f64, self.options.fling_deceleration);
        log::debug!(
            "Motion: fling at {}°/s for {:?}",
            velocity,
            decay.duration()
        );
        self.session = Some(MotionSession::Fling(decay));
        self.transition(MotionState::Flinging);
        true
    }

    /// Gesture up. Returns how the wheel settled, or `None` if it is still moving on its own.
    pub fn release(&mut self) -> Option<Settle> {
        match self.state {
            MotionState::Idle | MotionState::Dragging => {
                self.transition(MotionState::Idle);
                Some(Settle::Released)
            }
            MotionState::Flinging | MotionState::AutoCentering => None,
        }
    }

    /// Starts easing from the current rotation towards `target`, replacing any running motion.
    pub fn center_to(&mut self, target: i32) {
        let ease = AutoCenter::new(self.rotation, target, self.options.auto_center_duration);
        log::debug!("Motion: auto-center {}° -> {}°", self.rotation, target);
        self.session = Some(MotionSession::AutoCenter(ease));
        self.transition(MotionState::AutoCentering);
    }

    /// Advances the running animation. Returns `None` when nothing is animating.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Step> {
        let session = self.session.as_mut()?;
        let animation = session.animation();
        let value = animation.advance(elapsed);
        let finished = animation.is_finished();
        let settle = session.settle();

        let rotation = self.set_rotation(value);
        log::trace!("Motion: tick {:?} -> {}°", elapsed, rotation);

        let settled = finished.then(|| {
            self.session = None;
            self.transition(MotionState::Idle);
            settle
        });

        Some(Step { rotation, settled })
    }

    /// Forces the running animation to finish where it is. The returned settle kind is the same
    /// one natural completion would have produced.
    pub fn stop(&mut self) -> Option<Settle> {
        let mut session = self.session.take()?;
        session.animation().force_finish();
        self.transition(MotionState::Idle);
        Some(session.settle())
    }
}
