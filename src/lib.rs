// ==================== Imports ====================
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

#[macro_use]
mod browser;
pub mod engine;
mod game;
pub mod scene;

use engine::GameLoop;
use game::FishPond;

// ==================== Main Functions ====================
/// Main entry for the Webassembly module
/// - installs the panic hook
/// - spawns the async game loop on the local thread
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    // spawns a new asynchronous task in local thread, for web assembly
    // environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        GameLoop::start(FishPond::new())
            .await
            .expect("Could not start the fish pond");
    });

    Ok(())
}
