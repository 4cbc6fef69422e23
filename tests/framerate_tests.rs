// Stepped motion-effect target updates.

use glam::{Quat, Vec3};
use vr_tunnelling::framerate::FramerateDivider;
use vr_tunnelling::motion::Pose;
use vr_tunnelling::FramerateSettings;

fn live(tick: u32) -> Pose {
    Pose::new(
        Vec3::new(tick as f32, 0.0, 0.0),
        Quat::from_rotation_y(0.1 * tick as f32),
    )
}

fn divided(division: u32) -> FramerateSettings {
    FramerateSettings {
        division,
        ..FramerateSettings::default()
    }
}

#[test]
fn resamples_every_nth_tick_starting_from_one() {
    let settings = divided(4);
    let mut div = FramerateDivider::new(&settings);
    div.attach(live(0));

    let mut held = live(0);
    for tick in 1..=8 {
        let out = div.update(&settings, live(tick));
        if tick % 4 == 0 {
            assert_eq!(out, live(tick), "tick {tick} should resample");
            held = out;
        } else {
            assert_ne!(out, live(tick), "tick {tick} should hold");
            assert_eq!(out, held);
        }
    }
    assert_eq!(div.tick_count(), 8);
}

#[test]
fn division_change_forces_resample() {
    let mut settings = divided(4);
    let mut div = FramerateDivider::new(&settings);
    div.attach(live(0));
    assert_eq!(div.update(&settings, live(1)), live(0));

    settings.division = 3;
    assert_eq!(div.update(&settings, live(2)), live(2));
    // tick 3 is a multiple of the new division anyway
    assert_eq!(div.update(&settings, live(3)), live(3));
    assert_eq!(div.update(&settings, live(4)), live(3));
}

#[test]
fn undivided_components_track_live() {
    let settings = FramerateSettings {
        division: 4,
        divide_translation: true,
        divide_rotation: false,
    };
    let mut div = FramerateDivider::new(&settings);
    div.attach(live(0));
    let out = div.update(&settings, live(1));
    assert_eq!(out.position, live(0).position);
    assert_eq!(out.rotation, live(1).rotation);
}

#[test]
fn division_of_one_is_pass_through() {
    let settings = divided(1);
    assert!(!settings.active());
    let mut div = FramerateDivider::new(&settings);
    for tick in 1..5 {
        assert_eq!(div.update(&settings, live(tick)), live(tick));
    }

    let neither = FramerateSettings {
        division: 5,
        divide_translation: false,
        divide_rotation: false,
    };
    assert!(!neither.active());
    assert_eq!(div.update(&neither, live(9)), live(9));
}
