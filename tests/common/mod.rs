// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Shared test rig: hardware doubles whose state stays visible after the drivetrain takes
//! ownership of them.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use drivebase::config::{Settings, SettingsSource};
use drivebase::control::{Pid, PidGains};
use drivebase::hw::{MotorOutput, Sensor, ShiftActuator};
use drivebase::motors::{GearBox, MotorGroup};
use drivebase::DriveTrain;

pub const TUNING: &str = "\
# test robot
LOW_GEAR_SENSITIVE  = 0.8
HIGH_GEAR_SENSITIVE = 0.5
TURN_NON_LINEARITY  = 0.6
PID_DRIVE_P = 0.05
PID_DRIVE_I = 0.0
PID_DRIVE_D = 0.0
";

pub struct Motor(Rc<Cell<f32>>);

impl MotorOutput for Motor {
    fn set(&mut self, fraction: f32) {
        self.0.set(fraction);
    }

    fn get(&self) -> f32 {
        self.0.get()
    }
}

pub struct Encoder {
    distance: Rc<Cell<f32>>,
    rate: Rc<Cell<f32>>,
    distance_per_pulse: Rc<Cell<f32>>,
}

impl Sensor for Encoder {
    fn distance(&self) -> f32 {
        self.distance.get()
    }

    fn rate(&self) -> f32 {
        self.rate.get()
    }

    fn reset(&mut self) {
        self.distance.set(0.0);
    }

    fn set_distance_per_pulse(&mut self, distance_per_pulse: f32) {
        self.distance_per_pulse.set(distance_per_pulse);
    }
}

pub struct Shifter {
    state: Rc<Cell<bool>>,
    shifts: Rc<Cell<u32>>,
}

impl ShiftActuator for Shifter {
    fn set(&mut self, high_gear: bool) {
        if self.state.get() != high_gear {
            self.shifts.set(self.shifts.get() + 1);
        }
        self.state.set(high_gear);
    }

    fn get(&self) -> bool {
        self.state.get()
    }
}

/// Settings text that tests can rewrite between reloads.
pub struct Tuning {
    shared: Rc<RefCell<String>>,
    snapshot: String,
}

impl SettingsSource for Tuning {
    fn contents(&mut self) -> &str {
        self.snapshot = self.shared.borrow().clone();
        &self.snapshot
    }
}

pub type Gearbox = GearBox<Motor, Encoder, Pid, Shifter>;
pub type Drive = DriveTrain<Motor, Encoder, Pid, Shifter, Settings<Tuning>>;

/// Observation handles for one side.
#[derive(Default)]
pub struct Probe {
    pub motors: Vec<Rc<Cell<f32>>>,
    pub distance: Rc<Cell<f32>>,
    pub rate: Rc<Cell<f32>>,
    pub distance_per_pulse: Rc<Cell<f32>>,
    pub gear: Rc<Cell<bool>>,
    pub shifts: Rc<Cell<u32>>,
}

impl Probe {
    /// Raw commands as the motors received them.
    pub fn commands(&self) -> Vec<f32> {
        self.motors.iter().map(|m| m.get()).collect()
    }

    pub fn all_below(&self, threshold: f32) -> bool {
        self.commands().iter().all(|c| c.abs() < threshold)
    }

    pub fn side(&self) -> Gearbox {
        let motors = MotorGroup::new(self.motors.iter().map(|m| Motor(m.clone())))
            .expect("1 to 3 motors");
        let encoder = Encoder {
            distance: self.distance.clone(),
            rate: self.rate.clone(),
            distance_per_pulse: self.distance_per_pulse.clone(),
        };
        let shifter = Shifter {
            state: self.gear.clone(),
            shifts: self.shifts.clone(),
        };

        GearBox::new(motors)
            .with_closed_loop(encoder, Pid::new(PidGains::default()))
            .with_shifter(shifter)
    }
}

pub struct Rig {
    pub drive: Drive,
    pub left: Probe,
    pub right: Probe,
    pub tuning: Rc<RefCell<String>>,
}

impl Rig {
    pub fn retune(&self, text: &str) {
        *self.tuning.borrow_mut() = text.to_string();
    }
}

fn probe(motors: usize) -> Probe {
    Probe {
        motors: (0..motors).map(|_| Rc::new(Cell::new(0.0))).collect(),
        ..Probe::default()
    }
}

/// Two three-motor sides with encoders and shifters, loaded from `tuning`.
pub fn rig(tuning: &str) -> Rig {
    let left = probe(3);
    let right = probe(3);
    let shared = Rc::new(RefCell::new(tuning.to_string()));

    let settings = Settings::new(Tuning {
        shared: shared.clone(),
        snapshot: String::new(),
    });
    let drive = DriveTrain::new(left.side(), right.side(), settings);

    Rig {
        drive,
        left,
        right,
        tuning: shared,
    }
}

pub fn approx(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

/// Deterministic input sweep in [-1.5, 1.5] (xorshift32).
pub struct Inputs(u32);

impl Inputs {
    pub fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }
}

impl Iterator for Inputs {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        Some((x as f32 / u32::MAX as f32) * 3.0 - 1.5)
    }
}
