use glam::{Vec3, Vec4};
use rand::prelude::*;
use vr_tunnelling::angle::euler_to_quat;
use vr_tunnelling::smoothing::SmoothedSignal;
use vr_tunnelling::{
    BackgroundMode, CounterVelocityMode, MotionConfig, Pose, Preset, PresetValue,
};

/// Input held from `start_sec` until the next step starts.
struct Step {
    start_sec: f32,
    forward: f32,     // m/s
    strafe: f32,      // m/s
    turn: f32,        // deg/s
}

#[rustfmt::skip]
const SCRIPT: &[Step] = &[
    Step { start_sec: 0.0, forward: 0.0, strafe: 0.0, turn: 0.0 },
    Step { start_sec: 2.0, forward: 0.0, strafe: 0.0, turn: 90.0 },
    Step { start_sec: 4.0, forward: 3.0, strafe: 0.0, turn: 0.0 },
    Step { start_sec: 7.0, forward: 3.0, strafe: 0.0, turn: -45.0 },
    Step { start_sec: 9.0, forward: 0.0, strafe: 2.0, turn: 0.0 },
    Step { start_sec: 11.0, forward: 0.0, strafe: 0.0, turn: 0.0 },
    Step { start_sec: 13.0, forward: 5.0, strafe: -1.0, turn: 30.0 },
    Step { start_sec: 16.0, forward: 0.0, strafe: 0.0, turn: 0.0 },
];

const INPUT_SMOOTH_SEC: f32 = 0.2; // ramp time of the locomotion input
const HEAD_JITTER_DEG: f32 = 0.3; // peak per-axis tracking noise

/// Player rig walking through [`SCRIPT`] with smoothed locomotion input and
/// a little seeded head jitter.
pub struct ScriptedRig {
    position: Vec3,
    yaw_deg: f32,
    forward: SmoothedSignal,
    strafe: SmoothedSignal,
    turn: SmoothedSignal,
    rng: StdRng,
}

impl ScriptedRig {
    pub fn new(seed: u64) -> Self {
        Self {
            position: Vec3::new(0.0, 1.7, 0.0),
            yaw_deg: 0.0,
            forward: SmoothedSignal::default(),
            strafe: SmoothedSignal::default(),
            turn: SmoothedSignal::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Script length in seconds, with one second of rest at the end.
    pub fn duration_sec() -> f32 {
        SCRIPT.last().map_or(0.0, |s| s.start_sec + 1.0)
    }

    pub fn step(&mut self, t: f32, dt: f32) -> Pose {
        let input = SCRIPT
            .iter()
            .rev()
            .find(|s| t >= s.start_sec)
            .unwrap_or(&SCRIPT[0]);

        let forward = self.forward.update(input.forward, INPUT_SMOOTH_SEC, dt);
        let strafe = self.strafe.update(input.strafe, INPUT_SMOOTH_SEC, dt);
        let turn = self.turn.update(input.turn, INPUT_SMOOTH_SEC, dt);

        self.yaw_deg += turn * dt;
        let body = euler_to_quat(Vec3::new(0.0, self.yaw_deg, 0.0));
        self.position += body * Vec3::new(strafe, 0.0, forward) * dt;

        let jitter = Vec3::new(
            self.rng.gen_range(-HEAD_JITTER_DEG..=HEAD_JITTER_DEG),
            self.rng.gen_range(-HEAD_JITTER_DEG..=HEAD_JITTER_DEG),
            0.0,
        );
        let head = euler_to_quat(Vec3::new(0.0, self.yaw_deg, 0.0) + jitter);
        Pose::new(self.position, head)
    }
}

/// Presets the host can start with or switch to.
pub fn presets() -> Vec<Preset> {
    vec![
        Preset::new("default"),
        Preset::new("comfort")
            .with(PresetValue::Coverage(0.9))
            .with(PresetValue::Feather(0.2))
            .with(PresetValue::Velocity(MotionConfig {
                enabled: true,
                strength: 0.5,
                min: 0.5,
                max: 4.0,
                smoothing_time: 0.25,
            }))
            .with(PresetValue::Acceleration(MotionConfig {
                enabled: true,
                strength: 0.5,
                min: 0.0,
                max: 10.0,
                smoothing_time: 0.15,
            })),
        Preset::new("cage")
            .with(PresetValue::BackgroundMode(BackgroundMode::CageColor))
            .with(PresetValue::Color(Vec4::new(0.1, 0.1, 0.2, 1.0)))
            .with(PresetValue::ApplyColorToBackground(true))
            .with(PresetValue::CounterMotion(true))
            .with(PresetValue::CounterVelocityMode(CounterVelocityMode::Real))
            .with(PresetValue::CounterVelocityResetDistance(3.0))
            .with(PresetValue::ArtificialTilt(true))
            .with(PresetValue::FramerateDivision(3)),
    ]
}
