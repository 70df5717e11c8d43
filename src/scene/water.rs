/// The tiled water overlay. Only the texture phase moves; the geometry stays
/// pinned to the viewport. Offsets shrink without bound - the renderer reads
/// them modulo the tile size, so no wrap bookkeeping is needed here.
#[derive(Debug, Clone, Copy)]
pub struct WaterOverlay {
    tile_offset_x: f32,
    tile_offset_y: f32,
    width: f32,
    height: f32,
}

impl WaterOverlay {
    pub fn new(width: f32, height: f32) -> Self {
        WaterOverlay {
            tile_offset_x: 0.0,
            tile_offset_y: 0.0,
            width,
            height,
        }
    }

    /// Scroll the texture diagonally by `delta` frame units.
    pub fn advance(&mut self, delta: f32) {
        self.tile_offset_x -= delta;
        self.tile_offset_y -= delta;
    }

    /// Pin the overlay to a new viewport. The scroll phase carries over so a
    /// resize does not visibly jump the water.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn tile_offset_x(&self) -> f32 {
        self.tile_offset_x
    }

    pub fn tile_offset_y(&self) -> f32 {
        self.tile_offset_y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn offsets_decrease_every_tick() {
        let mut water = WaterOverlay::new(800.0, 600.0);
        let mut last = (water.tile_offset_x(), water.tile_offset_y());
        for _ in 0..10 {
            water.advance(1.0);
            assert!(water.tile_offset_x() < last.0);
            assert!(water.tile_offset_y() < last.1);
            last = (water.tile_offset_x(), water.tile_offset_y());
        }
        assert_relative_eq!(water.tile_offset_x(), -10.0);
        assert_relative_eq!(water.tile_offset_y(), -10.0);
    }

    #[test]
    fn zero_delta_holds_the_phase() {
        let mut water = WaterOverlay::new(800.0, 600.0);
        water.advance(1.5);
        let held = (water.tile_offset_x(), water.tile_offset_y());
        water.advance(0.0);
        assert_eq!((water.tile_offset_x(), water.tile_offset_y()), held);
    }

    #[test]
    fn resize_matches_the_viewport_and_keeps_the_phase() {
        let mut water = WaterOverlay::new(800.0, 600.0);
        water.advance(3.0);
        water.resize(1920.0, 1080.0);
        assert_eq!(water.width(), 1920.0);
        assert_eq!(water.height(), 1080.0);
        assert_relative_eq!(water.tile_offset_x(), -3.0);
        assert_relative_eq!(water.tile_offset_y(), -3.0);
    }
}
