//! Rendering collaborators. The core never talks to a graphics API; it hands
//! a [`VignetteParams`] and the eye matrices to whatever implements
//! [`RenderBackend`].

use crate::constants::{FAR_CLIP_CORRECTION, IRIS_INNER_SCALE};
use crate::settings::{BackendSettings, BackgroundMode};
use glam::{Mat4, Quat, Vec3, Vec4};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaskObjectId(pub u32);

/// Everything a backend needs to draw one frame of the vignette.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VignetteParams {
    pub strength: f32,
    pub feather: f32,
    pub color: Vec4,
    pub overlay: f32,
    pub background_mode: BackgroundMode,
    pub apply_color_to_background: bool,
    /// Accumulated counter-rotation, for the skybox.
    pub counter_rotation: Quat,
    /// Cage offset for shader-driven counter-translation.
    pub cage_offset: Vec3,
}

/// Per-eye inverse projection and eye-to-world matrices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeMatrices {
    pub inverse_projection: [Mat4; 2],
    pub eye_to_world: [Mat4; 2],
}

/// Stereo camera as reported by the host. Index 0 is the left eye.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StereoCamera {
    pub projection: [Mat4; 2],
    pub view: [Mat4; 2],
    /// Flip Y of the inverse projection (D3D-style clip space).
    pub flip_y: bool,
}

pub trait RenderBackend {
    /// Pick up the backend options of the current settings.
    fn configure(&mut self, _settings: &BackendSettings) {}

    fn apply_vignette(&mut self, params: &VignetteParams);

    /// Backend-specific fix-ups of the eye matrices.
    fn correct_projection(&self, _matrices: &mut EyeMatrices) {}

    fn submit_mask(&mut self, objects: &[MaskObjectId]);
}

/// Eye-to-world is `counter_rotation * world_to_target * view⁻¹`.
pub fn build_eye_matrices(
    camera: &StereoCamera,
    world_to_target: Mat4,
    counter_rotation: Quat,
    backend: &dyn RenderBackend,
) -> EyeMatrices {
    let local = Mat4::from_quat(counter_rotation) * world_to_target;
    let mut inverse_projection = camera.projection.map(|p| p.inverse());
    if camera.flip_y {
        for p in &mut inverse_projection {
            p.y_axis.y = -p.y_axis.y;
        }
    }
    let mut m = EyeMatrices {
        inverse_projection,
        eye_to_world: [Mat4::IDENTITY; 2],
    };
    backend.correct_projection(&mut m);
    m.eye_to_world = camera.view.map(|v| local * v.inverse());
    m
}

/// Where a full-screen effect runs in the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EffectStage {
    #[default]
    AfterEverything,
    /// Before transparent geometry.
    AfterOpaque,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaskMode {
    #[default]
    Off,
    Mask,
    Window,
    Portal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ApertureUniforms {
    pub fx_inner: f32,
    pub fx_outer: f32,
}

impl ApertureUniforms {
    fn new(inner: f32, feather: f32) -> Self {
        Self {
            fx_inner: inner,
            fx_outer: inner - feather,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PostProcessUniforms {
    pub aperture: ApertureUniforms,
    pub overlay: f32,
    pub color: Vec4,
    pub cage_offset: Vec3,
    pub counter_rotation: Quat,
    /// Set only while the iris pre-pass is usable.
    pub iris: Option<ApertureUniforms>,
}

/// Full-screen image-effect backend.
#[derive(Clone, Debug, Default)]
pub struct PostProcessBackend {
    pub stage: EffectStage,
    pub mask_mode: MaskMode,
    /// Reject covered pixels early with an iris mesh.
    pub iris_z_rejection: bool,
    uniforms: PostProcessUniforms,
    mask: Vec<MaskObjectId>,
    mask_submissions: u32,
}

impl PostProcessBackend {
    pub fn new(stage: EffectStage) -> Self {
        Self {
            stage,
            ..Self::default()
        }
    }

    pub fn uniforms(&self) -> &PostProcessUniforms {
        &self.uniforms
    }

    pub fn mask(&self) -> &[MaskObjectId] {
        &self.mask
    }

    pub fn mask_submissions(&self) -> u32 {
        self.mask_submissions
    }

    /// The iris pre-pass needs an opaque colour and no mask, blur or cage-only view.
    pub fn can_draw_iris(&self, params: &VignetteParams) -> bool {
        self.iris_z_rejection
            && self.mask_mode == MaskMode::Off
            && !matches!(
                params.background_mode,
                BackgroundMode::Blur | BackgroundMode::CageOnly
            )
            && params.color.w == 1.0
    }
}

/// Colour the effect material uses for the given background mode.
pub fn background_color(params: &VignetteParams) -> Vec4 {
    match params.background_mode {
        BackgroundMode::Color => params.color,
        _ => {
            let bkg = if params.apply_color_to_background {
                params.color
            } else {
                Vec4::ONE
            };
            bkg.truncate().extend(params.color.w)
        }
    }
}

impl RenderBackend for PostProcessBackend {
    fn configure(&mut self, settings: &BackendSettings) {
        self.mask_mode = settings.mask_mode;
        self.iris_z_rejection = settings.iris_z_rejection;
    }

    fn apply_vignette(&mut self, params: &VignetteParams) {
        let iris = self.can_draw_iris(params).then(|| {
            ApertureUniforms::new(params.strength * IRIS_INNER_SCALE, params.feather)
        });
        self.uniforms = PostProcessUniforms {
            aperture: ApertureUniforms::new(params.strength, params.feather),
            overlay: params.overlay,
            color: background_color(params),
            cage_offset: params.cage_offset,
            counter_rotation: params.counter_rotation,
            iris,
        };
    }

    /// Hard-codes the far clip of both inverse projections.
    fn correct_projection(&self, matrices: &mut EyeMatrices) {
        for p in &mut matrices.inverse_projection {
            p.w_axis.w = FAR_CLIP_CORRECTION;
        }
    }

    fn submit_mask(&mut self, objects: &[MaskObjectId]) {
        self.mask.clear();
        self.mask.extend_from_slice(objects);
        self.mask_submissions += 1;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StencilSettings {
    pub reference: u8,
    pub mask: u8,
    pub bias: f32,
}

/// Iris-mesh backend for constrained GPUs: no projection fix-up, optional
/// stencil mask and skybox.
#[derive(Clone, Debug, Default)]
pub struct MobileBackend {
    pub draw_skybox: bool,
    pub stencil: Option<StencilSettings>,
    aperture: ApertureUniforms,
    color: Vec4,
    mask: Vec<MaskObjectId>,
}

impl MobileBackend {
    pub fn new(draw_skybox: bool) -> Self {
        Self {
            draw_skybox,
            ..Self::default()
        }
    }

    pub fn aperture(&self) -> ApertureUniforms {
        self.aperture
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn mask(&self) -> &[MaskObjectId] {
        &self.mask
    }

    /// Stencil bias as written to the shader (negated).
    pub fn stencil_bias(&self) -> Option<f32> {
        self.stencil.map(|s| -s.bias)
    }
}

impl RenderBackend for MobileBackend {
    fn configure(&mut self, settings: &BackendSettings) {
        self.draw_skybox = settings.draw_skybox;
        self.stencil = settings.use_mask.then_some(settings.stencil);
    }

    fn apply_vignette(&mut self, params: &VignetteParams) {
        self.aperture = ApertureUniforms::new(params.strength, params.feather);
        self.color = if !self.draw_skybox || params.apply_color_to_background {
            params.color
        } else {
            Vec4::ONE
        };
    }

    fn submit_mask(&mut self, objects: &[MaskObjectId]) {
        self.mask.clear();
        if self.stencil.is_some() {
            self.mask.extend_from_slice(objects);
        }
    }
}
