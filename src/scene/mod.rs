//! The pond simulation : a fixed school of wandering fish and one scrolling
//! water overlay, advanced in lockstep by [`Scene::tick`].
//!
//! Everything in this module is plain arithmetic on in-memory state; the
//! renderer reads the results after each tick. No web types appear here, so
//! the whole simulation runs under native `cargo test`.

pub mod fish;
pub mod water;

use fish::Fish;
use rand::Rng;
use water::WaterOverlay;

/// Margin around the viewport inside which fish keep swimming before the
/// toroidal wrap fires, so they slide off one edge and back in the other
/// instead of popping.
pub const STAGE_PADDING: f32 = 100.0;

pub const FISH_COUNT: usize = 20;
pub const FISH_VARIANTS: usize = 5;

/// Wrap boundary for fish positions, derived from the current viewport.
/// Recomputed on resize, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Bounds { width, height }
    }

    /// Full horizontal span of the padded wrap region.
    pub fn padded_width(&self) -> f32 {
        self.width + STAGE_PADDING * 2.0
    }

    /// Full vertical span of the padded wrap region.
    pub fn padded_height(&self) -> f32 {
        self.height + STAGE_PADDING * 2.0
    }
}

/// Session object owning all mutable scene state. There is exactly one
/// writer : the host loop calls [`Scene::tick`] once per frame, and the draw
/// pass reads the results strictly afterwards within the same frame.
pub struct Scene {
    fishes: Vec<Fish>,
    water: WaterOverlay,
    bounds: Bounds,
}

impl Scene {
    /// Spawn the full school inside the given viewport. All randomized spawn
    /// state comes from `rng`, so a seeded generator reproduces the scene.
    pub fn new(rng: &mut impl Rng, width: f32, height: f32) -> Self {
        let bounds = Bounds::new(width, height);
        let fishes = (0..FISH_COUNT)
            .map(|i| Fish::spawn(rng, i % FISH_VARIANTS, &bounds))
            .collect();
        Scene {
            fishes,
            water: WaterOverlay::new(width, height),
            bounds,
        }
    }

    /// Advance the scene by one frame. Fish motion is per-tick and ignores
    /// `delta`; only the overlay scroll is delta-scaled. Fish do not interact,
    /// so update order is irrelevant.
    pub fn tick(&mut self, delta: f32) {
        for fish in &mut self.fishes {
            fish.update(&self.bounds);
        }
        self.water.advance(delta);
    }

    /// Adopt a new viewport : replace the wrap bounds and resize the overlay.
    /// Fish state is untouched; positions outside the new bounds wrap on the
    /// next tick.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Bounds::new(width, height);
        self.water.resize(width, height);
    }

    pub fn fishes(&self) -> &[Fish] {
        &self.fishes
    }

    pub fn water(&self) -> &WaterOverlay {
        &self.water
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn school_never_escapes_the_padded_bounds() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut scene = Scene::new(&mut rng, 1024.0, 768.0);
        assert_eq!(scene.fishes().len(), FISH_COUNT);

        for _ in 0..1000 {
            scene.tick(1.0);
            for fish in scene.fishes() {
                assert!(
                    (-STAGE_PADDING..=1024.0 + STAGE_PADDING).contains(&fish.x()),
                    "fish x escaped : {}",
                    fish.x()
                );
                assert!(
                    (-STAGE_PADDING..=768.0 + STAGE_PADDING).contains(&fish.y()),
                    "fish y escaped : {}",
                    fish.y()
                );
            }
        }
    }

    #[test]
    fn variants_cycle_through_the_sprite_set() {
        let mut rng = SmallRng::seed_from_u64(7);
        let scene = Scene::new(&mut rng, 800.0, 600.0);
        for (i, fish) in scene.fishes().iter().enumerate() {
            assert_eq!(fish.variant(), i % FISH_VARIANTS);
        }
    }

    #[test]
    fn resize_updates_overlay_and_bounds_but_not_fish() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut scene = Scene::new(&mut rng, 800.0, 600.0);
        let before: Vec<(f32, f32)> = scene.fishes().iter().map(|f| (f.x(), f.y())).collect();

        scene.resize(1920.0, 1080.0);

        assert_eq!(scene.bounds(), Bounds::new(1920.0, 1080.0));
        assert_eq!(scene.water().width(), 1920.0);
        assert_eq!(scene.water().height(), 1080.0);
        let after: Vec<(f32, f32)> = scene.fishes().iter().map(|f| (f.x(), f.y())).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn seeded_scenes_are_reproducible() {
        let mut a = Scene::new(&mut SmallRng::seed_from_u64(99), 800.0, 600.0);
        let mut b = Scene::new(&mut SmallRng::seed_from_u64(99), 800.0, 600.0);
        for _ in 0..50 {
            a.tick(1.0);
            b.tick(1.0);
        }
        for (fa, fb) in a.fishes().iter().zip(b.fishes()) {
            assert_eq!((fa.x(), fa.y()), (fb.x(), fb.y()));
            assert_eq!(fa.rotation(), fb.rotation());
        }
    }
}
