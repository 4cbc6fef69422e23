//! The per-frame effect instance: owns every piece of motion state and is
//! ticked exactly once per rendered frame by the host.

use crate::backend::{
    build_eye_matrices, EyeMatrices, MaskObjectId, RenderBackend, StereoCamera, VignetteParams,
};
use crate::constants::MISSING_TARGET_WARN_INTERVAL_SEC;
use crate::counter_motion::{Cage, CounterMotion, CounterMotionState};
use crate::diagnostics::{Diagnostics, RawMotion};
use crate::error::ConfigError;
use crate::framerate::FramerateDivider;
use crate::motion::{self, floor_dt, MotionHistory, MotionSample, Pose};
use crate::preset::Preset;
use crate::settings::TunnellingSettings;
use crate::strength::{composite, ChannelValues, EffectState, StrengthCalculator};
use crate::tilt::{ArtificialTilt, EffectTarget};
use glam::{Mat4, Quat, Vec3};

/// Result of one [`TunnellingEffect::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameOutput {
    /// Final vignette strength, always within `[0, 1]`.
    pub strength: f32,
    pub raw_strength: f32,
    pub levels: ChannelValues,
    /// World pose to write to the motion-effect target, after tilt and
    /// framerate division.
    pub effect_target: Option<Pose>,
    pub cage: Option<Pose>,
    pub counter_rotation: Quat,
    /// Shader-side cage offset (zero unless counter-velocity runs in shader mode).
    pub cage_offset: Vec3,
    /// Counter-motion accumulators were cleared this tick.
    pub counter_reset: bool,
}

pub struct TunnellingEffect {
    settings: TunnellingSettings,
    enabled: bool,
    history: Option<MotionHistory>,
    strength: StrengthCalculator,
    counter: CounterMotion,
    tilt: ArtificialTilt,
    framerate: FramerateDivider,
    effect_target: Option<EffectTarget>,
    cage: Option<Cage>,
    mask: Vec<MaskObjectId>,
    mask_dirty: bool,
    diagnostics: Diagnostics,
    missing_for: Option<f32>,
    next_missing_warn: f32,
    effect_target_warned: bool,
    last_output: FrameOutput,
}

impl Default for TunnellingEffect {
    fn default() -> Self {
        let settings = TunnellingSettings::default();
        Self {
            counter: CounterMotion::new(&settings.counter_motion),
            framerate: FramerateDivider::new(&settings.framerate),
            settings,
            enabled: true,
            history: None,
            strength: StrengthCalculator::new(),
            tilt: ArtificialTilt::new(),
            effect_target: None,
            cage: None,
            mask: Vec::new(),
            mask_dirty: true,
            diagnostics: Diagnostics::default(),
            missing_for: None,
            next_missing_warn: 0.0,
            effect_target_warned: false,
            last_output: FrameOutput::default(),
        }
    }
}

impl TunnellingEffect {
    pub fn new(settings: TunnellingSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            counter: CounterMotion::new(&settings.counter_motion),
            framerate: FramerateDivider::new(&settings.framerate),
            settings,
            ..Self::default()
        })
    }

    pub fn settings(&self) -> &TunnellingSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: TunnellingSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        self.mask_dirty |= settings.backend != self.settings.backend;
        self.settings = settings;
        self.check_effect_target();
        Ok(())
    }

    /// Overlay `preset` on the current settings. Nothing changes if the
    /// result does not validate.
    pub fn apply_preset(&mut self, preset: &Preset) -> Result<(), ConfigError> {
        let mut next = self.settings;
        preset.apply(&mut next);
        next.validate()?;
        log::debug!("[preset] applied '{}'", preset.name);
        self.mask_dirty |= next.backend != self.settings.backend;
        self.settings = next;
        self.check_effect_target();
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enabling starts from the current pose, so the first tick sees no motion.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.reset_motion();
        }
        self.enabled = enabled;
    }

    /// Forget the last pose and zero every smoother and accumulator.
    pub fn reset_motion(&mut self) {
        self.history = None;
        self.strength.reset();
        self.counter.reset(self.cage.as_mut());
    }

    pub fn reset_counter_motion(&mut self) {
        self.counter.reset(self.cage.as_mut());
    }

    /// Assign the transform driven by tilt and framerate division.
    ///
    /// The previous target is handed back with its pre-tilt orientation.
    pub fn set_motion_effect_target(
        &mut self,
        target: Option<EffectTarget>,
    ) -> Option<EffectTarget> {
        let mut old = std::mem::replace(&mut self.effect_target, target);
        if let Some(old) = old.as_mut() {
            self.tilt.restore(old);
        }
        self.tilt.capture(self.effect_target.as_ref());
        let parent = self.last_pose();
        if let Some(t) = &self.effect_target {
            self.framerate.attach(t.world(&parent));
        }
        self.effect_target_warned = false;
        self.check_effect_target();
        old
    }

    pub fn effect_target(&self) -> Option<&EffectTarget> {
        self.effect_target.as_ref()
    }

    pub fn effect_target_mut(&mut self) -> Option<&mut EffectTarget> {
        self.effect_target.as_mut()
    }

    pub fn set_cage(&mut self, cage: Option<Cage>) -> Option<Cage> {
        std::mem::replace(&mut self.cage, cage)
    }

    pub fn cage(&self) -> Option<&Cage> {
        self.cage.as_ref()
    }

    pub fn counter_motion(&self) -> &CounterMotionState {
        self.counter.state()
    }

    pub fn strength_calculator(&self) -> &StrengthCalculator {
        &self.strength
    }

    pub fn tilt(&self) -> &ArtificialTilt {
        &self.tilt
    }

    pub fn framerate(&self) -> &FramerateDivider {
        &self.framerate
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn last_output(&self) -> &FrameOutput {
        &self.last_output
    }

    /// Register a mask object and its children. Returns how many were new.
    pub fn add_mask_object(&mut self, id: MaskObjectId, children: &[MaskObjectId]) -> usize {
        let mut added = 0;
        for &m in std::iter::once(&id).chain(children) {
            if !self.mask.contains(&m) {
                self.mask.push(m);
                added += 1;
            }
        }
        self.mask_dirty |= added > 0;
        added
    }

    /// Returns how many were removed.
    pub fn remove_mask_object(&mut self, id: MaskObjectId, children: &[MaskObjectId]) -> usize {
        let before = self.mask.len();
        self.mask.retain(|m| *m != id && !children.contains(m));
        let removed = before - self.mask.len();
        self.mask_dirty |= removed > 0;
        removed
    }

    pub fn mask_objects(&self) -> &[MaskObjectId] {
        &self.mask
    }

    /// Advance one frame. `motion_target` is the tracked pose this frame, or
    /// `None` if the host has lost it.
    pub fn tick(&mut self, dt: f32, motion_target: Option<Pose>) -> FrameOutput {
        if !self.enabled {
            self.last_output = FrameOutput {
                strength: 0.0,
                raw_strength: 0.0,
                levels: ChannelValues::default(),
                counter_reset: false,
                ..self.last_output
            };
            return self.last_output;
        }

        let Some(pose) = motion_target else {
            return self.tick_without_target(floor_dt(dt));
        };
        if let Some(missing) = self.missing_for.take() {
            log::info!("[tunnelling] motion target re-acquired after {:.1}s", missing);
            self.diagnostics.set_missing_target(false);
            self.history = None;
        }

        let history = self
            .history
            .get_or_insert_with(|| MotionHistory::at_rest(&pose));
        let sample = motion::sample(&pose, history, dt);
        history.advance(&pose, &sample);

        self.diagnostics.record(RawMotion {
            angular_velocity: sample.angular_velocity,
            acceleration: sample.acceleration,
            velocity: sample.speed,
        });
        let state = self.strength.update(
            &self.settings,
            &sample,
            self.diagnostics.analyze_all_channels,
        );

        let tilt_enabled = self.settings.tilt.enabled;
        self.tilt.sync(tilt_enabled, self.effect_target.as_mut());
        let mut effect_target = None;
        if let Some(target) = self.effect_target.as_mut() {
            if tilt_enabled {
                self.tilt
                    .update(&self.settings.tilt, sample.local_acceleration, sample.dt, target);
            }
            let live = target.world(&pose);
            effect_target = Some(self.framerate.update(&self.settings.framerate, live));
        }

        let counter_reset = self.counter.update(
            &self.settings.counter_motion,
            &sample,
            pose.rotation,
            self.cage.as_mut(),
        );

        self.finish(state, effect_target, counter_reset)
    }

    fn tick_without_target(&mut self, dt: f32) -> FrameOutput {
        match self.missing_for.as_mut() {
            None => {
                log::warn!("[tunnelling] no motion target; effect treated as stationary");
                self.missing_for = Some(0.0);
                self.next_missing_warn = MISSING_TARGET_WARN_INTERVAL_SEC;
                self.diagnostics.set_missing_target(true);
                self.diagnostics.count_missing_warning();
            }
            Some(missing) => {
                *missing += dt;
                if *missing >= self.next_missing_warn {
                    log::warn!(
                        "[tunnelling] motion target still missing after {:.0}s",
                        *missing
                    );
                    self.next_missing_warn += MISSING_TARGET_WARN_INTERVAL_SEC;
                    self.diagnostics.count_missing_warning();
                }
            }
        }

        self.diagnostics.record(RawMotion::default());
        let state = self.strength.update(
            &self.settings,
            &MotionSample::stationary(dt),
            self.diagnostics.analyze_all_channels,
        );
        self.finish(state, self.last_output.effect_target, false)
    }

    fn finish(
        &mut self,
        state: EffectState,
        effect_target: Option<Pose>,
        counter_reset: bool,
    ) -> FrameOutput {
        let effect = &self.settings.effect;
        let strength = if self.diagnostics.force_on {
            composite(self.diagnostics.force_value, effect.coverage, effect.coverage_floor)
        } else {
            state.final_strength
        };
        self.last_output = FrameOutput {
            strength,
            raw_strength: state.raw_strength,
            levels: state.levels,
            effect_target,
            cage: self.cage.map(|c| c.pose),
            counter_rotation: self.counter.state().rotation,
            cage_offset: self.counter.shader_offset(&self.settings.counter_motion),
            counter_reset,
        };
        self.last_output
    }

    /// Hand the last tick's result to a backend. The mask list is only
    /// resubmitted after it or the backend options changed.
    pub fn render(&mut self, backend: &mut impl RenderBackend) {
        if !self.enabled {
            return;
        }
        backend.configure(&self.settings.backend);
        if self.mask_dirty {
            backend.submit_mask(&self.mask);
            self.mask_dirty = false;
        }
        backend.apply_vignette(&self.vignette_params());
    }

    pub fn vignette_params(&self) -> VignetteParams {
        let e = &self.settings.effect;
        VignetteParams {
            strength: self.last_output.strength,
            feather: e.feather,
            color: e.color,
            overlay: e.overlay,
            background_mode: e.background_mode,
            apply_color_to_background: e.apply_color_to_background,
            counter_rotation: self.last_output.counter_rotation,
            cage_offset: self.last_output.cage_offset,
        }
    }

    /// Eye matrices for the last tracked pose. Outside of VR pass
    /// `head_tracked = false` to use the identity world-to-target.
    pub fn eye_matrices(
        &self,
        camera: &StereoCamera,
        head_tracked: bool,
        backend: &dyn RenderBackend,
    ) -> EyeMatrices {
        let world_to_target = if head_tracked {
            self.last_pose().world_to_local()
        } else {
            Mat4::IDENTITY
        };
        build_eye_matrices(camera, world_to_target, self.last_output.counter_rotation, backend)
    }

    fn last_pose(&self) -> Pose {
        self.history
            .map_or(Pose::IDENTITY, |h| Pose::new(h.position, h.rotation))
    }

    fn check_effect_target(&mut self) {
        if self.settings.uses_motion_effect_target()
            && self.effect_target.is_none()
            && !self.effect_target_warned
        {
            log::warn!(
                "[tunnelling] artificial tilt and framerate division need a motion effect target"
            );
            self.effect_target_warned = true;
        }
    }
}
