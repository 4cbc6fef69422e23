// Render backends and eye matrices.

use glam::{Mat4, Quat, Vec3, Vec4};
use vr_tunnelling::backend::{
    background_color, build_eye_matrices, EffectStage, MaskMode, StencilSettings,
};
use vr_tunnelling::constants::FAR_CLIP_CORRECTION;
use vr_tunnelling::{
    BackgroundMode, MaskObjectId, MobileBackend, PostProcessBackend, Preset, PresetValue,
    RenderBackend, StereoCamera, TunnellingEffect, VignetteParams,
};

fn params(strength: f32) -> VignetteParams {
    VignetteParams {
        strength,
        feather: 0.1,
        color: Vec4::new(0.2, 0.3, 0.4, 1.0),
        overlay: 0.25,
        background_mode: BackgroundMode::Color,
        apply_color_to_background: false,
        counter_rotation: Quat::IDENTITY,
        cage_offset: Vec3::ZERO,
    }
}

fn camera(flip_y: bool) -> StereoCamera {
    let proj = Mat4::perspective_rh(90f32.to_radians(), 1.0, 0.1, 100.0);
    StereoCamera {
        projection: [proj, proj],
        view: [
            Mat4::from_translation(Vec3::new(0.03, 0.0, 0.0)),
            Mat4::from_translation(Vec3::new(-0.03, 0.0, 0.0)),
        ],
        flip_y,
    }
}

#[test]
fn post_process_aperture_and_iris() {
    let mut b = PostProcessBackend::new(EffectStage::AfterEverything);
    b.iris_z_rejection = true;
    b.apply_vignette(&params(0.8));
    let u = b.uniforms();
    assert!((u.aperture.fx_inner - 0.8).abs() < 1e-6);
    assert!((u.aperture.fx_outer - 0.7).abs() < 1e-6);
    assert_eq!(u.overlay, 0.25);
    let iris = u.iris.expect("iris should be drawn");
    assert!((iris.fx_inner - 0.784).abs() < 1e-5);
    assert!((iris.fx_outer - 0.684).abs() < 1e-5);
}

#[test]
fn iris_needs_opaque_color_and_no_mask() {
    let mut b = PostProcessBackend::new(EffectStage::AfterOpaque);
    b.iris_z_rejection = true;

    let mut translucent = params(0.5);
    translucent.color.w = 0.5;
    b.apply_vignette(&translucent);
    assert!(b.uniforms().iris.is_none());

    let mut blur = params(0.5);
    blur.background_mode = BackgroundMode::Blur;
    b.apply_vignette(&blur);
    assert!(b.uniforms().iris.is_none());

    b.mask_mode = MaskMode::Window;
    b.apply_vignette(&params(0.5));
    assert!(b.uniforms().iris.is_none());

    b.mask_mode = MaskMode::Off;
    b.iris_z_rejection = false;
    b.apply_vignette(&params(0.5));
    assert!(b.uniforms().iris.is_none());
}

#[test]
fn background_color_rules() {
    let mut p = params(0.5);
    assert_eq!(background_color(&p), p.color);

    p.background_mode = BackgroundMode::Skybox;
    p.color.w = 0.6;
    assert_eq!(background_color(&p), Vec4::new(1.0, 1.0, 1.0, 0.6));

    p.apply_color_to_background = true;
    assert_eq!(background_color(&p), p.color);
}

#[test]
fn post_process_hard_codes_far_clip() {
    let b = PostProcessBackend::default();
    let m = build_eye_matrices(&camera(false), Mat4::IDENTITY, Quat::IDENTITY, &b);
    for p in m.inverse_projection {
        assert_eq!(p.w_axis.w, FAR_CLIP_CORRECTION);
    }

    let mobile = MobileBackend::default();
    let m = build_eye_matrices(&camera(false), Mat4::IDENTITY, Quat::IDENTITY, &mobile);
    let expected = camera(false).projection[0].inverse();
    assert_eq!(m.inverse_projection[0], expected);
}

#[test]
fn eye_matrices_flip_and_counter_rotate() {
    let mobile = MobileBackend::default();
    let plain = build_eye_matrices(&camera(false), Mat4::IDENTITY, Quat::IDENTITY, &mobile);
    let flipped = build_eye_matrices(&camera(true), Mat4::IDENTITY, Quat::IDENTITY, &mobile);
    assert_eq!(
        flipped.inverse_projection[1].y_axis.y,
        -plain.inverse_projection[1].y_axis.y
    );

    let r = Quat::from_rotation_y(0.5);
    let mut cam = camera(false);
    cam.view = [Mat4::IDENTITY; 2];
    let m = build_eye_matrices(&cam, Mat4::IDENTITY, r, &mobile);
    assert!(m.eye_to_world[0].abs_diff_eq(Mat4::from_quat(r), 1e-6));
    // left eye view offset ends up inverted in eye-to-world
    let m = build_eye_matrices(&camera(false), Mat4::IDENTITY, Quat::IDENTITY, &mobile);
    let origin = m.eye_to_world[0].transform_point3(Vec3::ZERO);
    assert!((origin.x + 0.03).abs() < 1e-6);
}

#[test]
fn mobile_color_and_stencil() {
    let mut b = MobileBackend::new(true);
    let mut p = params(0.6);
    b.apply_vignette(&p);
    assert_eq!(b.color(), Vec4::ONE);
    assert!((b.aperture().fx_outer - 0.5).abs() < 1e-6);

    p.apply_color_to_background = true;
    b.apply_vignette(&p);
    assert_eq!(b.color(), p.color);

    b.submit_mask(&[MaskObjectId(1)]);
    assert!(b.mask().is_empty());
    b.stencil = Some(StencilSettings {
        reference: 1,
        mask: 0xff,
        bias: 0.01,
    });
    b.submit_mask(&[MaskObjectId(1)]);
    assert_eq!(b.mask(), &[MaskObjectId(1)]);
    assert_eq!(b.stencil_bias(), Some(-0.01));
}

#[test]
fn effect_resubmits_mask_only_after_change() {
    let mut effect = TunnellingEffect::default();
    let mut b = PostProcessBackend::default();
    assert_eq!(effect.add_mask_object(MaskObjectId(1), &[MaskObjectId(2)]), 2);
    assert_eq!(effect.add_mask_object(MaskObjectId(2), &[]), 0);

    effect.tick(0.016, None);
    effect.render(&mut b);
    effect.render(&mut b);
    assert_eq!(b.mask_submissions(), 1);
    assert_eq!(b.mask(), &[MaskObjectId(1), MaskObjectId(2)]);

    assert_eq!(effect.remove_mask_object(MaskObjectId(1), &[]), 1);
    effect.render(&mut b);
    assert_eq!(b.mask_submissions(), 2);
    assert_eq!(b.mask(), &[MaskObjectId(2)]);
}

#[test]
fn presets_reach_the_backends_on_render() {
    let mut effect = TunnellingEffect::default();
    effect.add_mask_object(MaskObjectId(4), &[]);
    let mut post = PostProcessBackend::default();
    let mut mobile = MobileBackend::new(false);

    effect.tick(0.016, None);
    effect.render(&mut post);
    assert!(post.iris_z_rejection);
    assert_eq!(post.mask_mode, MaskMode::Off);
    assert!(post.uniforms().iris.is_some());

    effect.render(&mut mobile);
    assert!(mobile.stencil.is_none());
    assert!(mobile.mask().is_empty());

    let preset = Preset::new("masked")
        .with(PresetValue::MaskMode(MaskMode::Window))
        .with(PresetValue::UseMask(true))
        .with(PresetValue::DrawSkybox(true));
    effect.apply_preset(&preset).unwrap();

    // option change forces the mask to be resubmitted
    effect.render(&mut mobile);
    assert!(mobile.draw_skybox);
    assert_eq!(mobile.stencil_bias(), Some(-1.0));
    assert_eq!(mobile.mask(), &[MaskObjectId(4)]);

    effect.render(&mut post);
    assert_eq!(post.mask_mode, MaskMode::Window);
    assert!(post.uniforms().iris.is_none());
}
