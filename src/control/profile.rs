// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Trapezoidal motion profile.
//!
//! Generates a position setpoint that accelerates at a constant rate up to a cruise velocity,
//! cruises, and decelerates symmetrically into the goal. Short moves that never reach cruise
//! velocity become triangular.
//!
//! ```
//! use drivebase::control::TrapezoidProfile;
//!
//! let mut profile = TrapezoidProfile::new(150.0, 5.0);
//! profile.set_goal(0.0, 1200.0);
//!
//! assert_eq!(profile.setpoint(0.0), 0.0);
//! let total = profile.total_time();
//! assert!(profile.is_done(total));
//! assert_eq!(profile.setpoint(total), 1200.0);
//! ```

use micromath::F32Ext;

/// Velocity-limited, acceleration-limited position profile.
#[derive(Copy, Clone, Debug)]
pub struct TrapezoidProfile {
    max_velocity: f32,
    time_to_max_velocity: f32,

    start: f32,
    distance: f32,
    direction: f32,

    acceleration: f32,
    accel_time: f32,
    cruise_time: f32,
    peak_velocity: f32,
}

impl TrapezoidProfile {
    /// `max_velocity` in distance units per second, `time_to_max_velocity` in seconds.
    pub fn new(max_velocity: f32, time_to_max_velocity: f32) -> Self {
        Self {
            max_velocity: max_velocity.abs(),
            time_to_max_velocity: time_to_max_velocity.max(0.0),
            start: 0.0,
            distance: 0.0,
            direction: 1.0,
            acceleration: 0.0,
            accel_time: 0.0,
            cruise_time: 0.0,
            peak_velocity: 0.0,
        }
    }

    #[inline]
    pub fn max_velocity(&self) -> f32 {
        self.max_velocity
    }

    #[inline]
    pub fn time_to_max_velocity(&self) -> f32 {
        self.time_to_max_velocity
    }

    /// Plan a move from `start` to `goal`. Elapsed time for [`setpoint`](Self::setpoint) is
    /// measured from this call.
    pub fn set_goal(&mut self, start: f32, goal: f32) {
        self.start = start;
        self.distance = (goal - start).abs();
        self.direction = if goal >= start { 1.0 } else { -1.0 };

        if self.max_velocity <= 0.0 {
            // Nothing to plan with; jump straight to the goal.
            self.acceleration = 0.0;
            self.accel_time = 0.0;
            self.cruise_time = 0.0;
            self.peak_velocity = 0.0;
            return;
        }

        if self.time_to_max_velocity <= 0.0 {
            self.acceleration = 0.0;
            self.accel_time = 0.0;
            self.peak_velocity = self.max_velocity;
            self.cruise_time = self.distance / self.max_velocity;
            return;
        }

        self.acceleration = self.max_velocity / self.time_to_max_velocity;

        // Distance covered by a full ramp up plus a full ramp down
        let ramp_distance = self.max_velocity * self.time_to_max_velocity;

        if self.distance <= ramp_distance {
            self.accel_time = (self.distance / self.acceleration).sqrt();
            self.peak_velocity = self.acceleration * self.accel_time;
            self.cruise_time = 0.0;
        } else {
            self.accel_time = self.time_to_max_velocity;
            self.peak_velocity = self.max_velocity;
            self.cruise_time = (self.distance - ramp_distance) / self.max_velocity;
        }
    }

    /// Total duration of the planned move in seconds.
    #[inline]
    pub fn total_time(&self) -> f32 {
        2.0 * self.accel_time + self.cruise_time
    }

    /// Goal of the planned move.
    #[inline]
    pub fn goal(&self) -> f32 {
        self.start + self.direction * self.distance
    }

    pub fn is_done(&self, elapsed: f32) -> bool {
        elapsed >= self.total_time()
    }

    /// Position setpoint `elapsed` seconds into the move.
    pub fn setpoint(&self, elapsed: f32) -> f32 {
        let total = self.total_time();
        let t = if elapsed > total {
            total
        } else if elapsed > 0.0 {
            elapsed
        } else {
            0.0
        };
        let ramp_distance = 0.5 * self.acceleration * self.accel_time * self.accel_time;

        let travelled = if t >= total {
            self.distance
        } else if t < self.accel_time {
            0.5 * self.acceleration * t * t
        } else if t < self.accel_time + self.cruise_time {
            ramp_distance + self.peak_velocity * (t - self.accel_time)
        } else {
            let remaining = total - t;
            self.distance - 0.5 * self.acceleration * remaining * remaining
        };

        self.start + self.direction * travelled
    }

    /// Velocity setpoint `elapsed` seconds into the move.
    pub fn velocity(&self, elapsed: f32) -> f32 {
        let total = self.total_time();
        if elapsed <= 0.0 || elapsed >= total {
            return 0.0;
        }

        let speed = if elapsed < self.accel_time {
            self.acceleration * elapsed
        } else if elapsed < self.accel_time + self.cruise_time {
            self.peak_velocity
        } else {
            self.acceleration * (total - elapsed)
        };

        self.direction * speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-2
    }

    #[test]
    fn long_move_cruises() {
        let mut p = TrapezoidProfile::new(150.0, 5.0);
        p.set_goal(0.0, 1000.0);

        // 750 units spent ramping, 250 cruising at 150/s
        assert!(approx(p.total_time(), 10.0 + 250.0 / 150.0));
        assert!(approx(p.setpoint(5.0), 375.0));
        assert!(approx(p.velocity(6.0), 150.0));
        assert_eq!(p.setpoint(p.total_time()), 1000.0);
        assert!(p.is_done(p.total_time()));
    }

    #[test]
    fn short_move_is_triangular() {
        let mut p = TrapezoidProfile::new(150.0, 5.0);
        p.set_goal(0.0, 300.0);

        let half = p.total_time() / 2.0;
        assert!(approx(half, 10.0_f32.sqrt()));
        assert!(approx(p.setpoint(half), 150.0));
        assert!(p.velocity(half) < 150.0);
    }

    #[test]
    fn reverse_move_counts_down() {
        let mut p = TrapezoidProfile::new(100.0, 1.0);
        p.set_goal(100.0, -200.0);

        assert_eq!(p.goal(), -200.0);
        assert_eq!(p.setpoint(0.0), 100.0);
        assert!(p.setpoint(1.0) < 100.0);
        assert!(p.velocity(1.0) < 0.0);
        assert_eq!(p.setpoint(100.0), -200.0);
    }

    #[test]
    fn instant_acceleration_cruises_whole_way() {
        let mut p = TrapezoidProfile::new(50.0, 0.0);
        p.set_goal(0.0, 100.0);
        assert!(approx(p.total_time(), 2.0));
        assert!(approx(p.setpoint(1.0), 50.0));
        assert_eq!(p.setpoint(2.0), 100.0);
    }

    #[test]
    fn zero_velocity_jumps_to_goal() {
        let mut p = TrapezoidProfile::new(0.0, 5.0);
        p.set_goal(0.0, 10.0);
        assert!(p.is_done(0.0));
        assert_eq!(p.setpoint(0.0), 10.0);
    }
}
