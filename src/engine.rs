use crate::browser;
use anyhow::{anyhow, Error, Result};
// web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref (unsafe) cast from Javascript type to Rust type
    // - because we control the closure creation and specify the expected type,
    // in principle this should be generally safe (unsafe) code
    JsCast,
    JsValue,
};
use web_sys::{CanvasPattern, CanvasRenderingContext2d, Event, HtmlImageElement};

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    /// `delta` is in frame-relative units : 1.0 at the 60 Hz reference rate.
    fn update(&mut self, delta: f32);
    fn draw(&self, renderer: &Renderer);
    fn resize(&mut self, size: Size);
}

// length of a frame in milliseconds
const FRAME_SIZE: f32 = 1.0 / 60.0 * 1000.0;
// cap on frame-relative delta, so a backgrounded tab resuming after seconds
// does not scroll the overlay across half the screen in one tick
const MAX_DELTA: f32 = 6.0;

pub struct GameLoop {
    last_frame: f64,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;
type PendingResize = Rc<RefCell<Option<Size>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        // size the drawing buffer before the first asset is placed
        let size = viewport_size()?;
        browser::set_canvas_size(size.width as u32, size.height as u32)?;

        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
        };
        let renderer = Renderer {
            context: browser::context()?,
        };

        // resize events land here; the frame closure drains the latest one
        // before updating, so the game never observes a half-applied resize
        let pending_resize: PendingResize = Rc::new(RefCell::new(None));
        let resize_target = pending_resize.clone();
        let on_resize = browser::closure_wrap(Box::new(move |_: Event| {
            if let Ok(size) = viewport_size() {
                *resize_target.borrow_mut() = Some(size);
            }
        }) as Box<dyn FnMut(_)>);
        browser::set_onresize(&on_resize)?;
        on_resize.forget();

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            if let Some(size) = pending_resize.borrow_mut().take() {
                if let Err(err) = browser::set_canvas_size(size.width as u32, size.height as u32) {
                    log!("Could not resize canvas buffer : {:#?}", err);
                }
                game.resize(size);
            }
            let elapsed = (perf - game_loop.last_frame) as f32;
            game_loop.last_frame = perf;
            game.update((elapsed / FRAME_SIZE).min(MAX_DELTA));
            game.draw(&renderer);
            let _ = browser::request_animation_frame(f.borrow().as_ref().unwrap());
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }
}

pub fn viewport_size() -> Result<Size> {
    let (width, height) = browser::inner_size()?;
    Ok(Size {
        width: width as f32,
        height: height as f32,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.position.x.into(),
            rect.position.y.into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    /// Stretch an image over `destination`, natural size discarded.
    pub fn draw_image_fit(&self, image: &HtmlImageElement, destination: &Rect) {
        self.context
            .draw_image_with_html_image_element_and_dw_and_dh(
                image,
                destination.position.x.into(),
                destination.position.y.into(),
                destination.size.width.into(),
                destination.size.height.into(),
            )
            .expect("Drawing is throwing exceptions! Unrecoverable error");
    }

    /// Draw an image at natural size, centered on `position`, rotated and
    /// scaled about that center.
    pub fn draw_sprite(
        &self,
        image: &HtmlImageElement,
        position: &Point,
        rotation: f32,
        scale: f32,
    ) {
        let width = f64::from(image.width());
        let height = f64::from(image.height());
        self.context.save();
        self.context
            .translate(position.x.into(), position.y.into())
            .and_then(|_| self.context.rotate(rotation.into()))
            .and_then(|_| self.context.scale(scale.into(), scale.into()))
            .expect("Transform is throwing exceptions! Unrecoverable error");
        self.context
            .draw_image_with_html_image_element_and_dw_and_dh(
                image,
                -width / 2.0,
                -height / 2.0,
                width,
                height,
            )
            .expect("Drawing is throwing exceptions! Unrecoverable error");
        self.context.restore();
    }

    /// A repeating pattern suitable for [`Renderer::draw_tiled`]. Created once
    /// per texture and reused across frames.
    pub fn tile_pattern(&self, image: &HtmlImageElement) -> Result<CanvasPattern> {
        self.context
            .create_pattern_with_html_image_element(image, "repeat")
            .map_err(|err| anyhow!("Error creating tile pattern : {:#?}", err))?
            .ok_or_else(|| anyhow!("Tile pattern unavailable for image"))
    }

    /// Fill `destination` with a repeating pattern, phase-shifted by `offset`.
    /// The offset is consumed modulo the tile size by the pattern itself, so
    /// callers may let it grow without bound.
    pub fn draw_tiled(&self, pattern: &CanvasPattern, offset: &Point, destination: &Rect) {
        self.context.save();
        self.context.set_fill_style_canvas_pattern(pattern);
        // translate the pattern space, then fill the same screen rect
        self.context
            .translate(offset.x.into(), offset.y.into())
            .expect("Transform is throwing exceptions! Unrecoverable error");
        self.context.fill_rect(
            f64::from(destination.position.x - offset.x),
            f64::from(destination.position.y - offset.y),
            destination.size.width.into(),
            destination.size.height.into(),
        );
        self.context.restore();
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine.rs::load_image] Error loading image: {:#?}",
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - double unwrap because Result<Result<(), Error>, oneshot::Canceled>
    // - first unwrap yields channel result : Result<(), Error>
    // - second unwrap yields image load result : () or propagating Error
    rx.await??;

    Ok(image)
}
