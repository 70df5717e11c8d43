use crate::browser;
use crate::engine::{self, Game, Point, Rect, Renderer, Size};
use crate::scene::Scene;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use web_sys::{CanvasPattern, HtmlImageElement};

const FISH_SPRITES: [&str; 5] = ["fish1", "fish2", "fish3", "fish4", "fish5"];
const BACKGROUND_ALIAS: &str = "background";
const OVERLAY_ALIAS: &str = "overlay";

// pond art is shot loose; overscanning hides the edges during resize
const BACKGROUND_OVERSCAN: f32 = 1.2;

/// The pond game, following the loading-state pattern : `initialize` consumes
/// `Loading` and hands the loop a `Loaded` instance, so the per-frame path
/// never checks whether assets exist.
pub enum FishPond {
    /// Initialize state while resources are being loaded
    /// Transition to `Loaded` once initialization is complete
    Loading,

    /// Active game state with the scene and its decoded textures
    Loaded(Pond),
}

pub struct Pond {
    scene: Scene,
    background: HtmlImageElement,
    fish_sprites: Vec<HtmlImageElement>,
    overlay: HtmlImageElement,
    // built on first draw; a CanvasPattern needs a context to exist
    water_pattern: RefCell<Option<CanvasPattern>>,
}

/// One entry of the asset manifest : a stable alias the game refers to, and
/// wherever the texture actually lives.
#[derive(Debug, Deserialize, Serialize, Clone)]
struct AssetEntry {
    alias: String,
    src: String,
}

impl FishPond {
    // string literals are implicitly static because they are stored in
    // read-only memory
    const MANIFEST_PATH: &'static str = "assets.json";

    pub fn new() -> Self {
        FishPond::Loading
    }

    async fn load_manifest() -> Result<Vec<AssetEntry>> {
        browser::fetch_json::<Vec<AssetEntry>>(Self::MANIFEST_PATH)
            .await
            .with_context(|| {
                format!("Failed to load asset manifest from : {}", Self::MANIFEST_PATH)
            })
    }

    /// Load every manifest entry concurrently; total time is the slowest
    /// texture, not the sum. Any single failure aborts startup, per policy.
    async fn load_images(manifest: &[AssetEntry]) -> Result<HashMap<String, HtmlImageElement>> {
        let loads = manifest.iter().map(|entry| async move {
            let image = engine::load_image(&entry.src).await.with_context(|| {
                format!("Failed to load '{}' from : {}", entry.alias, entry.src)
            })?;
            Ok::<_, anyhow::Error>((entry.alias.clone(), image))
        });
        Ok(try_join_all(loads).await?.into_iter().collect())
    }
}

impl Default for FishPond {
    fn default() -> Self {
        Self::new()
    }
}

fn take_image(
    images: &mut HashMap<String, HtmlImageElement>,
    alias: &str,
) -> Result<HtmlImageElement> {
    images
        .remove(alias)
        .ok_or_else(|| anyhow!("Asset manifest is missing alias : '{}'", alias))
}

#[async_trait(?Send)]
impl Game for FishPond {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            FishPond::Loading => {
                let manifest = Self::load_manifest().await?;
                let mut images = Self::load_images(&manifest).await?;

                let background = take_image(&mut images, BACKGROUND_ALIAS)?;
                let overlay = take_image(&mut images, OVERLAY_ALIAS)?;
                let fish_sprites = FISH_SPRITES
                    .iter()
                    .map(|alias| take_image(&mut images, alias))
                    .collect::<Result<Vec<_>>>()?;

                let size = engine::viewport_size()?;
                let mut rng = SmallRng::from_entropy();
                let scene = Scene::new(&mut rng, size.width, size.height);
                log!(
                    "fish pond ready : {} fish in a {}x{} viewport",
                    scene.fishes().len(),
                    size.width,
                    size.height
                );

                Ok(Box::new(FishPond::Loaded(Pond {
                    scene,
                    background,
                    fish_sprites,
                    overlay,
                    water_pattern: RefCell::new(None),
                })))
            }
            FishPond::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, delta: f32) {
        if let FishPond::Loaded(pond) = self {
            pond.scene.tick(delta);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let FishPond::Loaded(pond) = self {
            let bounds = pond.scene.bounds();
            let screen = Size {
                width: bounds.width,
                height: bounds.height,
            };
            renderer.clear(&Rect::new(Point { x: 0.0, y: 0.0 }, screen));

            // Draw order matters : background -> fish -> water on top
            renderer.draw_image_fit(
                &pond.background,
                &cover_rect(screen, natural_size(&pond.background)),
            );

            for fish in pond.scene.fishes() {
                renderer.draw_sprite(
                    &pond.fish_sprites[fish.variant()],
                    &Point {
                        x: fish.x(),
                        y: fish.y(),
                    },
                    fish.rotation(),
                    fish.scale(),
                );
            }

            let mut cached = pond.water_pattern.borrow_mut();
            let pattern = cached.get_or_insert_with(|| {
                renderer
                    .tile_pattern(&pond.overlay)
                    .expect("Water overlay pattern is unavailable! Unrecoverable error")
            });
            let water = pond.scene.water();
            renderer.draw_tiled(
                pattern,
                &Point {
                    x: water.tile_offset_x(),
                    y: water.tile_offset_y(),
                },
                &Rect::new(
                    Point { x: 0.0, y: 0.0 },
                    Size {
                        width: water.width(),
                        height: water.height(),
                    },
                ),
            );
        }
    }

    fn resize(&mut self, size: Size) {
        if let FishPond::Loaded(pond) = self {
            pond.scene.resize(size.width, size.height);
            log!("viewport resized to {}x{}", size.width, size.height);
        }
    }
}

fn natural_size(image: &HtmlImageElement) -> Size {
    Size {
        width: image.width() as f32,
        height: image.height() as f32,
    }
}

/// Destination rect that covers the screen with an overscanned, centered
/// image : scale uniformly so the longer screen dimension is filled, and let
/// the other axis spill symmetrically past the edges.
fn cover_rect(screen: Size, texture: Size) -> Rect {
    let scale = if screen.width > screen.height {
        screen.width * BACKGROUND_OVERSCAN / texture.width
    } else {
        screen.height * BACKGROUND_OVERSCAN / texture.height
    };
    let size = Size {
        width: texture.width * scale,
        height: texture.height * scale,
    };
    Rect::new(
        Point {
            x: (screen.width - size.width) / 2.0,
            y: (screen.height - size.height) / 2.0,
        },
        size,
    )
}
