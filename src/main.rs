//! Koi Pond - headless runner
//!
//! Runs the pond simulation with the CPU wave stepper and logs what the fish
//! and the water are doing. Pass a settings file path as the first argument.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use koi_pond::pattern::PatternAtlas;
use koi_pond::renderer::FishBatch;
use koi_pond::sim::FrameClock;
use koi_pond::water::CpuWaves;
use koi_pond::{Koi, PondError, Settings};

/// Simulated frame rate of the host
const FRAME_DT: f32 = 1.0 / 60.0;
/// Simulated run length in seconds
const RUN_SECONDS: u32 = 20;
/// Atlas slots per side
const ATLAS_SLOTS: u32 = 16;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("Koi pond stopped: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `Koi` directly
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn run() -> Result<(), PondError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "koi-pond.json".to_string());
    let settings = Settings::load(&path)?;

    let mut random = Pcg32::seed_from_u64(settings.seed);
    let mut atlas = PatternAtlas::new(settings.quality.atlas_slot_size(), ATLAS_SLOTS);
    let mut koi = Koi::new(&settings, CpuWaves::new(&settings.wave))?;

    for _ in 0..settings.initial_fish {
        if koi.spawn(&mut random).is_none() {
            break;
        }
    }

    let mut clock = FrameClock::new();
    let mut batch = FishBatch::new();
    let frames = RUN_SECONDS * 60;

    for frame in 1..=frames {
        let time = frame as f64 * FRAME_DT as f64 * 1000.0;
        for _ in 0..clock.advance(FRAME_DT, time) {
            koi.update(&mut atlas, &mut random);
        }

        batch.clear();
        koi.render(&mut batch, clock.interpolation());

        // Every two seconds a hand lifts a fish and lets it go elsewhere
        if frame % 120 == 0 {
            relocate_random_fish(&mut koi, &mut random);
        }

        // Halfway through, rotate the viewport
        if frame == frames / 2 {
            koi.resize(settings.height, settings.width, &mut atlas)?;
        }

        if frame % 300 == 0 {
            let constellation = koi.constellation();
            log::info!(
                "t={:>4.1}s fish={}/{} (big {}, small {}, river {}) sprites={} water peak={:.4} fps={}",
                time / 1000.0,
                koi.fish_count(),
                koi.capacity(),
                constellation.big().len(),
                constellation.small().len(),
                constellation.river().len(),
                batch.len(),
                koi.water().front().peak(),
                clock.fps()
            );
        }
    }

    Ok(())
}

#[cfg_attr(target_arch = "wasm32", allow(dead_code))]
fn relocate_random_fish<R: Rng>(koi: &mut Koi<CpuWaves>, random: &mut R) {
    let constellation = koi.constellation();
    let Some(position) = [constellation.big(), constellation.small(), constellation.river()]
        .into_iter()
        .flat_map(|pond| pond.fishes())
        .map(|fish| fish.position)
        .next()
    else {
        return;
    };

    let target = Vec2::new(
        random.random_range(0.0..constellation.width()),
        random.random_range(0.0..constellation.height()),
    );

    if let Some(mut fish) = koi.pick(position.x, position.y) {
        log::debug!("Moving fish {} to ({:.2}, {:.2})", fish.id, target.x, target.y);
        fish.position = target;
        koi.drop(fish);
    }
}
