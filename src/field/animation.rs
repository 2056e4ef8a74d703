//! Rotation state machine for the star field
//!
//! The field is either still, spinning at a constant rate, or swinging
//! sinusoidally about its start orientation. Oscillation always wins over a
//! constant rate while it is active. Time is passed in by the caller so the
//! state machine itself stays a pure value type.

use std::f64::consts::PI;

pub const TWO_PI: f64 = 2.0 * PI;

/// Wrap an angle into [0, 2π)
///
/// Non-finite input is returned unchanged.
pub fn normalize_angle(angle_rad: f64) -> f64 {
    let wrapped = angle_rad.rem_euclid(TWO_PI);
    // rem_euclid rounds up to 2π for tiny negative inputs
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Idle,
    Rotating,
    Oscillating,
}

/// Active sinusoidal swing, anchored at `start_time`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    pub rate_hz: f64,
    pub max_angle_rad: f64,
    pub start_time: f64,
}

impl Oscillation {
    /// Signed angle at time `now`, within [-max_angle_rad, max_angle_rad]
    pub fn angle_at(&self, now: f64) -> f64 {
        (TWO_PI * self.rate_hz * (now - self.start_time)).sin() * self.max_angle_rad
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Animation {
    rotation: f64,
    rotate_rate_rad_hz: Option<f64>,
    oscillation: Option<Oscillation>,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current angle in radians, in [0, 2π)
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn rotate_rate_rad_hz(&self) -> Option<f64> {
        self.rotate_rate_rad_hz
    }

    pub fn oscillation(&self) -> Option<&Oscillation> {
        self.oscillation.as_ref()
    }

    pub fn motion(&self) -> Motion {
        match (&self.oscillation, self.rotate_rate_rad_hz) {
            (Some(_), _) => Motion::Oscillating,
            (None, Some(rate)) if rate != 0.0 => Motion::Rotating,
            // a zero rate integrates to nothing
            (None, _) => Motion::Idle,
        }
    }

    /// Set the constant angular velocity. Does not leave oscillation.
    pub fn set_rotate_rate_rad_hz(&mut self, rad_hz: f64) {
        self.rotate_rate_rad_hz = Some(rad_hz);
    }

    pub fn set_rotate_rate_deg_hz(&mut self, deg_hz: f64) {
        self.set_rotate_rate_rad_hz(deg_hz.to_radians());
    }

    pub fn clear_rotate_rate(&mut self) {
        self.rotate_rate_rad_hz = None;
    }

    /// Start oscillating at `now` when `rate_hz > 0`, otherwise stop
    ///
    /// Returns the oscillation that is now active, if any.
    pub fn set_oscillation(
        &mut self,
        rate_hz: f64,
        max_angle_deg: f64,
        now: f64,
    ) -> Option<Oscillation> {
        self.oscillation = if rate_hz > 0.0 {
            Some(Oscillation {
                rate_hz,
                max_angle_rad: max_angle_deg.to_radians(),
                start_time: now,
            })
        } else {
            None
        };
        self.oscillation
    }

    pub fn set_rotation_absolute(&mut self, angle_rad: f64) {
        self.rotation = normalize_angle(angle_rad);
    }

    /// Zero the angle and restart any active oscillation at `now`
    ///
    /// The rate and oscillation settings themselves are kept.
    pub fn reset_rotation(&mut self, now: f64) {
        self.rotation = 0.0;
        if let Some(osc) = self.oscillation.as_mut() {
            osc.start_time = now;
        }
    }

    /// Advance one frame and return the new angle
    ///
    /// While oscillating the angle is a function of `now` alone and
    /// `delta_seconds` is ignored. Otherwise the rate is integrated over
    /// `delta_seconds`.
    pub fn step(&mut self, delta_seconds: f64, now: f64) -> f64 {
        let raw = match (&self.oscillation, self.rotate_rate_rad_hz) {
            (Some(osc), _) => osc.angle_at(now),
            (None, Some(rate)) => self.rotation + delta_seconds * rate,
            (None, None) => self.rotation,
        };
        self.rotation = normalize_angle(raw);
        self.rotation
    }
}
