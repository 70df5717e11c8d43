use super::{Bounds, STAGE_PADDING};
use rand::Rng;
use std::f32::consts::{PI, TAU};

// spawn ranges, carried over exactly from the reference scene
const SPEED_MIN: f32 = 2.0;
const SPEED_SPAN: f32 = 2.0;
// single uniform draw shifted down : [-0.8, 0.2). The asymmetry gives the
// school a slight aggregate left-turning drift, which is an observable part
// of the scene, not an accident to correct.
const TURN_RATE_SHIFT: f32 = -0.8;
const SCALE_MIN: f32 = 0.5;
const SCALE_SPAN: f32 = 0.2;

// fraction of the turn rate applied to the heading each tick
const TURN_STEP: f32 = 0.01;

/// One wandering fish. Speed and turn rate are fixed at spawn; heading and
/// position advance every tick. `rotation` is the render-facing orientation
/// and plays no part in the motion math.
#[derive(Debug, Clone, Copy)]
pub struct Fish {
    x: f32,
    y: f32,
    heading: f32,
    speed: f32,
    turn_rate: f32,
    rotation: f32,
    scale: f32,
    variant: usize,
}

impl Fish {
    /// Spawn one fish somewhere inside the viewport with randomized motion
    /// parameters : heading in [0, 2π), speed in [2, 4), turn rate in
    /// [-0.8, 0.2), render scale in [0.5, 0.7).
    pub fn spawn(rng: &mut impl Rng, variant: usize, bounds: &Bounds) -> Self {
        let heading = rng.gen::<f32>() * TAU;
        Fish {
            x: rng.gen::<f32>() * bounds.width,
            y: rng.gen::<f32>() * bounds.height,
            heading,
            speed: SPEED_MIN + rng.gen::<f32>() * SPEED_SPAN,
            turn_rate: rng.gen::<f32>() + TURN_RATE_SHIFT,
            rotation: render_rotation(heading),
            scale: SCALE_MIN + rng.gen::<f32>() * SCALE_SPAN,
            variant,
        }
    }

    /// One tick of motion : turn, move along the new heading, then wrap
    /// against the padded bounds. The wrap is lazy - it is checked only after
    /// the move, so a fish may sit just outside the padded region for a
    /// single frame before reappearing on the far side.
    pub fn update(&mut self, bounds: &Bounds) {
        self.heading += self.turn_rate * TURN_STEP;
        self.x += self.heading.sin() * self.speed;
        self.y += self.heading.cos() * self.speed;
        self.rotation = render_rotation(self.heading);

        let bound_width = bounds.padded_width();
        let bound_height = bounds.padded_height();
        if self.x < -STAGE_PADDING {
            self.x += bound_width;
        }
        if self.x > bounds.width + STAGE_PADDING {
            self.x -= bound_width;
        }
        if self.y < -STAGE_PADDING {
            self.y += bound_height;
        }
        if self.y > bounds.height + STAGE_PADDING {
            self.y -= bound_height;
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn variant(&self) -> usize {
        self.variant
    }
}

/// Heading increases counter-clockwise while canvas rotation is clockwise,
/// and the fish art points down at rotation zero, hence the flip and the
/// quarter-turn.
fn render_rotation(heading: f32) -> f32 {
    -heading - PI / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const BOUNDS: Bounds = Bounds {
        width: 800.0,
        height: 600.0,
    };

    fn still_fish(x: f32, y: f32) -> Fish {
        Fish {
            x,
            y,
            heading: 0.0,
            speed: 0.0,
            turn_rate: 0.0,
            rotation: 0.0,
            scale: 0.5,
            variant: 0,
        }
    }

    #[test]
    fn one_tick_moves_along_the_advanced_heading() {
        let mut fish = still_fish(400.0, 300.0);
        fish.heading = 1.0;
        fish.speed = 3.0;
        fish.turn_rate = 0.2;

        fish.update(&BOUNDS);

        let heading: f32 = 1.0 + 0.2 * 0.01;
        assert_relative_eq!(fish.x(), 400.0 + heading.sin() * 3.0, max_relative = 1e-6);
        assert_relative_eq!(fish.y(), 300.0 + heading.cos() * 3.0, max_relative = 1e-6);
        assert_relative_eq!(
            fish.rotation(),
            -heading - PI / 2.0,
            max_relative = 1e-6
        );
    }

    #[test]
    fn wraps_across_all_four_padded_edges() {
        // bound spans : 1000 x 800 for an 800 x 600 viewport
        let mut fish = still_fish(-101.0, 300.0);
        fish.update(&BOUNDS);
        assert_relative_eq!(fish.x(), 899.0);

        let mut fish = still_fish(901.0, 300.0);
        fish.update(&BOUNDS);
        assert_relative_eq!(fish.x(), -99.0);

        let mut fish = still_fish(400.0, -101.0);
        fish.update(&BOUNDS);
        assert_relative_eq!(fish.y(), 699.0);

        let mut fish = still_fish(400.0, 701.0);
        fish.update(&BOUNDS);
        assert_relative_eq!(fish.y(), -99.0);
    }

    #[test]
    fn inside_the_padded_region_nothing_wraps() {
        let mut fish = still_fish(-100.0, 700.0);
        fish.update(&BOUNDS);
        assert_relative_eq!(fish.x(), -100.0);
        assert_relative_eq!(fish.y(), 700.0);
    }

    #[test]
    fn spawn_draws_stay_inside_the_documented_ranges() {
        let mut rng = SmallRng::seed_from_u64(0xF15);
        for _ in 0..1000 {
            let fish = Fish::spawn(&mut rng, 0, &BOUNDS);
            assert!((0.0..TAU).contains(&fish.heading), "heading {}", fish.heading);
            assert!((2.0..4.0).contains(&fish.speed), "speed {}", fish.speed);
            assert!(
                (-0.8..0.2).contains(&fish.turn_rate),
                "turn rate {}",
                fish.turn_rate
            );
            assert!((0.0..BOUNDS.width).contains(&fish.x()));
            assert!((0.0..BOUNDS.height).contains(&fish.y()));
            assert!((0.5..0.7).contains(&fish.scale()), "scale {}", fish.scale());
        }
    }
}
