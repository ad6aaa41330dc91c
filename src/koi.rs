//! Host-facing pond: the constellation of ponds plus the water surface
//!
//! The host owns the pattern atlas, the random source and the sprite batch,
//! and drives the pond with fixed-timestep `update` calls followed by one
//! interpolated `render` per frame.

use glam::Vec2;
use rand::Rng;

use crate::consts::SPLASH_RADIUS;
use crate::error::PondError;
use crate::pattern::PatternAtlas;
use crate::renderer::FishBatch;
use crate::settings::{Settings, WaveConfig};
use crate::sim::{Constellation, Fish};
use crate::water::{WaterPlane, WaveSimulator};

pub struct Koi<S: WaveSimulator> {
    constellation: Constellation,
    water: WaterPlane<S::Buffer>,
    waves: S,
    wave_config: WaveConfig,
    next_id: u32,
}

impl<S: WaveSimulator> Koi<S> {
    pub fn new(settings: &Settings, waves: S) -> Result<Self, PondError> {
        settings.validate()?;

        let constellation = Constellation::new(settings.width, settings.height, settings.layout)?;
        let water = WaterPlane::new(&waves, settings.width, settings.height, settings.wave.resolution)?;

        log::info!(
            "Koi pond ready: {}x{} scene, capacity {} fish, {} quality",
            settings.width,
            settings.height,
            constellation.capacity(),
            settings.quality.as_str()
        );

        Ok(Self {
            constellation,
            water,
            waves,
            wave_config: settings.wave,
            next_id: 0,
        })
    }

    pub fn constellation(&self) -> &Constellation {
        &self.constellation
    }

    pub fn water(&self) -> &WaterPlane<S::Buffer> {
        &self.water
    }

    pub fn waves(&self) -> &S {
        &self.waves
    }

    /// Lay the ponds out for a new viewport and start a fresh water surface
    pub fn resize(
        &mut self,
        width: f32,
        height: f32,
        atlas: &mut PatternAtlas,
    ) -> Result<(), PondError> {
        self.constellation.resize(width, height, atlas)?;
        self.water = WaterPlane::new(&self.waves, width, height, self.wave_config.resolution)?;
        Ok(())
    }

    /// Advance fish and water by one simulation tick
    pub fn update<R: Rng + ?Sized>(&mut self, atlas: &mut PatternAtlas, random: &mut R) {
        self.constellation.update(atlas, random);
        self.waves.propagate(&mut self.water);
    }

    /// Queue every fish sprite, interpolated `time` of the way into the tick
    pub fn render(&self, primitives: &mut FishBatch, time: f32) {
        self.constellation.render(primitives, time);
    }

    pub fn pick(&mut self, x: f32, y: f32) -> Option<Fish> {
        let fish = self.constellation.pick(x, y)?;
        log::debug!("Picked fish {} at ({:.2}, {:.2})", fish.id, x, y);
        Some(fish)
    }

    /// Let go of a fish; it lands in the nearest pond with a splash
    pub fn drop(&mut self, fish: Fish) {
        let Vec2 { x, y } = fish.position;
        if let Err(e) = self.water.add_flare(x, y, SPLASH_RADIUS) {
            log::warn!("Splash skipped: {}", e);
        }
        self.constellation.drop(fish);
    }

    /// Disturb the water at (x, y)
    pub fn splash(&mut self, x: f32, y: f32, radius: f32) -> Result<(), PondError> {
        self.water.add_flare(x, y, radius)
    }

    pub fn capacity(&self) -> usize {
        self.constellation.capacity()
    }

    pub fn fish_count(&self) -> usize {
        self.constellation.fish_count()
    }

    /// Release a new random fish into the river
    ///
    /// Returns the new fish's id, or `None` when the ponds are full.
    pub fn spawn<R: Rng + ?Sized>(&mut self, random: &mut R) -> Option<u32> {
        if self.fish_count() >= self.capacity() {
            log::debug!("Pond full ({} fish), not spawning", self.fish_count());
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;

        let fish = Fish::random(
            id,
            self.constellation.spawn_point(),
            self.constellation.spawn_direction(),
            random,
        );
        self.constellation.spawn(fish);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::water::CpuWaves;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn koi() -> Koi<CpuWaves> {
        let settings = Settings::default();
        Koi::new(&settings, CpuWaves::new(&settings.wave)).unwrap()
    }

    #[test]
    fn test_spawn_until_full() {
        let mut koi = koi();
        let mut random = Pcg32::seed_from_u64(9);

        let mut spawned = 0;
        while koi.spawn(&mut random).is_some() {
            spawned += 1;
        }

        assert_eq!(spawned, koi.capacity());
        assert_eq!(koi.fish_count(), koi.capacity());
        assert_eq!(koi.constellation().river().len(), spawned);
    }

    #[test]
    fn test_drop_splashes_and_update_drains() {
        let mut koi = koi();
        let mut random = Pcg32::seed_from_u64(2);
        let mut atlas = PatternAtlas::new(8, 8);
        let id = koi.spawn(&mut random).unwrap();

        let position = koi.constellation().river().fishes()[0].position;
        let mut fish = koi.pick(position.x, position.y).unwrap();
        assert_eq!(fish.id, id);
        assert_eq!(koi.fish_count(), 0);

        let center = koi.constellation().layout().big.center;
        fish.position = center;
        koi.drop(fish);
        assert_eq!(koi.constellation().big().len(), 1);
        assert_eq!(koi.water().pending_flares().len(), 1);

        koi.update(&mut atlas, &mut random);
        assert!(koi.water().pending_flares().is_empty());
        assert!(koi.water().front().peak() > 0.0);
    }

    #[test]
    fn test_new_rejects_padding_wider_than_small_pond() {
        let mut settings = Settings::default();
        settings.layout.factor_small = 0.3;
        settings.layout.factor_padding = 0.4;
        let result = Koi::new(&settings, CpuWaves::new(&settings.wave));
        assert!(matches!(
            result,
            Err(PondError::RangeViolation {
                field: "layout.factor_padding",
                ..
            })
        ));
    }

    #[test]
    fn test_resize_keeps_fish() {
        let mut koi = koi();
        let mut random = Pcg32::seed_from_u64(4);
        let mut atlas = PatternAtlas::new(8, 8);
        for _ in 0..10 {
            koi.spawn(&mut random);
        }
        for _ in 0..200 {
            koi.update(&mut atlas, &mut random);
        }

        koi.resize(9.0, 16.0, &mut atlas).unwrap();
        assert_eq!(koi.fish_count(), 10);
        assert_eq!(atlas.len(), 10);
        assert_eq!(koi.water().width(), 9 * 12);

        assert!(koi.resize(0.0, 16.0, &mut atlas).is_err());

        let mut batch = FishBatch::new();
        koi.render(&mut batch, 0.5);
        assert_eq!(batch.len(), 10);
    }
}
