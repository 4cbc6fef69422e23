//! Stepped updates of the motion-effect target.
//!
//! The live pose is only taken every `division` ticks; in between, the cached
//! components are handed back verbatim. Ticks are counted from 1.

use crate::motion::Pose;
use crate::settings::FramerateSettings;

#[derive(Clone, Debug, PartialEq)]
pub struct FramerateDivider {
    tick: u64,
    last_division: u32,
    cached: Pose,
}

impl FramerateDivider {
    pub fn new(settings: &FramerateSettings) -> Self {
        Self {
            tick: 0,
            last_division: settings.division,
            cached: Pose::IDENTITY,
        }
    }

    /// Seed the cache with the pose of a newly assigned target.
    pub fn attach(&mut self, live: Pose) {
        self.cached = live;
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn cached(&self) -> Pose {
        self.cached
    }

    /// Returns the pose to apply this tick.
    pub fn update(&mut self, settings: &FramerateSettings, live: Pose) -> Pose {
        self.tick += 1;

        let mut refresh = false;
        if self.last_division != settings.division {
            log::debug!(
                "[framerate] division {} -> {}",
                self.last_division,
                settings.division
            );
            self.last_division = settings.division;
            refresh = true;
        }

        if !settings.active() {
            self.cached = live;
            return live;
        }
        if self.tick % u64::from(settings.division) == 0 {
            refresh = true;
        }

        if refresh {
            if settings.divide_translation {
                self.cached.position = live.position;
            }
            if settings.divide_rotation {
                self.cached.rotation = live.rotation;
            }
        }

        Pose {
            position: if settings.divide_translation {
                self.cached.position
            } else {
                live.position
            },
            rotation: if settings.divide_rotation {
                self.cached.rotation
            } else {
                live.rotation
            },
        }
    }
}
