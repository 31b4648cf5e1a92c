#[macro_use]
mod utils;

pub mod background;
pub mod capability;
pub mod clock;
pub mod color;
pub mod config;
pub mod cursor_glow;
pub mod dom_helpers;
pub mod field;
pub mod particle;
pub mod project_card;
pub mod renderer;
pub mod reveal;
pub mod scheduler;
pub mod smooth_scroll;
pub mod stars;

use capability::BrowserCapabilities;
use config::FieldConfig;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

pub use capability::{Capabilities, Gate, GateReason, StaticCapabilities};
pub use field::{FieldState, ParticleField};
pub use particle::Particle;
pub use renderer::{DrawCommand, RecordingSurface, Surface};
pub use scheduler::{FrameScheduler, ManualScheduler};
pub use utils::Timer;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

thread_local! {
    // Keeps the running field reachable from JS-land for the page lifetime.
    static FIELD: RefCell<Option<std::rc::Rc<RefCell<background::BrowserField>>>> = RefCell::new(None);
}

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Wires every page effect with the default (optimized) field and the cursor glow.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    start_with("optimized", true)
}

/// `revision` picks the field preset: `"optimized"` or `"classic"`.
#[wasm_bindgen]
pub fn start_with(revision: &str, cursor_glow: bool) -> Result<(), JsValue> {
    utils::set_panic_hook();
    let config: FieldConfig = revision
        .parse()
        .map_err(|err: config::UnknownRevision| JsValue::from_str(&err.to_string()))?;

    let window = web_sys::window().ok_or("no global window")?;
    let document = window.document().ok_or("window has no document")?;

    stars::init_stars(&document)?;
    reveal::init_scroll_reveal(&window, &document)?;
    smooth_scroll::init_smooth_scroll(&document)?;
    project_card::init_project_cards(&document)?;
    if cursor_glow {
        let caps = BrowserCapabilities::new(window.clone());
        cursor_glow::init_cursor_glow(&window, &document, &caps)?;
    }

    // the backdrop is decoration, a broken canvas must not take the page down
    match background::init_particle_field(&window, &document, config) {
        Ok(field) => FIELD.with(|slot| *slot.borrow_mut() = field),
        Err(err) => warn!("particle field failed: {:?}", err),
    }
    log!("portfolio backdrop {} started ({})", version(), revision);
    Ok(())
}

/// Wraps every drawn frame of the running field in `console.time`.
#[wasm_bindgen]
pub fn set_profiling(enabled: bool) {
    FIELD.with(|slot| {
        if let Some(field) = slot.borrow().as_ref() {
            field.borrow_mut().set_profile(enabled);
        }
    });
}

