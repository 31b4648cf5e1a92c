// Browser wiring for the particle field: canvas lookup, animation frames,
// debounced resize and page visibility.

use crate::capability::{BrowserCapabilities, Capabilities};
use crate::clock::Debounce;
use crate::config::FieldConfig;
use crate::dom_helpers;
use crate::field::ParticleField;
use crate::renderer::CanvasRenderer;
use crate::scheduler::AnimationFrameScheduler;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, VisibilityState, Window};

pub const CANVAS_SELECTOR: &str = "#particles-canvas";

pub type BrowserField = ParticleField<CanvasRenderer, AnimationFrameScheduler>;

/// Sets up the particle background. Returns `Ok(None)` when the page has no
/// usable canvas for it: none at all, an element of another type, or one
/// without a 2d context.
pub fn init_particle_field(
    window: &Window,
    document: &Document,
    config: FieldConfig,
) -> Result<Option<Rc<RefCell<BrowserField>>>, JsValue> {
    let canvas = match dom_helpers::query::<HtmlCanvasElement>(document, CANVAS_SELECTOR) {
        Ok(Some(canvas)) => canvas,
        Ok(None) => return Ok(None),
        Err(err) => {
            warn!("particle field skipped: {}", err);
            return Ok(None);
        }
    };
    let renderer = match CanvasRenderer::new(canvas) {
        Ok(renderer) => renderer,
        Err(err) => {
            warn!("particle field skipped: {}", err);
            return Ok(None);
        }
    };

    let caps = BrowserCapabilities::new(window.clone());
    let scheduler = AnimationFrameScheduler::new(window.clone());
    let slot = scheduler.callback_slot();
    let field = ParticleField::new(config, &caps, renderer, scheduler, StdRng::from_entropy());
    if !field.gate().is_enabled() {
        return Ok(Some(Rc::new(RefCell::new(field))));
    }
    let field = Rc::new(RefCell::new(field));

    {
        let field = Rc::downgrade(&field);
        *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            if let Some(field) = field.upgrade() {
                field.borrow_mut().tick(now);
            }
        }) as Box<dyn FnMut(f64)>));
    }

    {
        let field = field.clone();
        let caps = caps.clone();
        let start_document = document.clone();
        dom_helpers::when_idle(window, move || {
            let (width, height) = caps.viewport();
            let visible = start_document.visibility_state() == VisibilityState::Visible;
            field.borrow_mut().start(width, height, visible);
        })?;
    }

    {
        let resize = ResizeDebounce::install(window.clone(), caps, config.resize_debounce_ms, field.clone());
        dom_helpers::listen(window, "resize", move |_| {
            resize.borrow_mut().trigger(js_sys::Date::now());
        })?;
    }

    {
        let field = field.clone();
        let visibility_document = document.clone();
        dom_helpers::listen(document, "visibilitychange", move |_| {
            let visible = visibility_document.visibility_state() == VisibilityState::Visible;
            field.borrow_mut().set_visible(visible);
        })?;
    }

    Ok(Some(field))
}

/// One timer and one callback for the whole page. Events only move the
/// deadline; the timer re-arms itself for the remaining time until the
/// window has been quiet for the full delay.
struct ResizeDebounce {
    window: Window,
    debounce: Debounce,
    timer: Option<i32>,
    callback: Option<Closure<dyn FnMut()>>,
}

impl ResizeDebounce {
    fn install(
        window: Window,
        caps: BrowserCapabilities,
        delay_ms: i32,
        field: Rc<RefCell<BrowserField>>,
    ) -> Rc<RefCell<ResizeDebounce>> {
        let resize = Rc::new(RefCell::new(ResizeDebounce {
            window,
            debounce: Debounce::new(delay_ms as f64),
            timer: None,
            callback: None,
        }));
        let weak: Weak<RefCell<ResizeDebounce>> = Rc::downgrade(&resize);
        resize.borrow_mut().callback = Some(Closure::wrap(Box::new(move || {
            let resize = match weak.upgrade() {
                Some(resize) => resize,
                None => return,
            };
            let fired = resize.borrow_mut().expire(js_sys::Date::now());
            if fired {
                let (width, height) = caps.viewport();
                field.borrow_mut().resize(width, height);
            }
        }) as Box<dyn FnMut()>));
        resize
    }

    fn trigger(&mut self, now_ms: f64) {
        self.debounce.trigger(now_ms);
        if self.timer.is_none() {
            self.arm(self.debounce.delay_ms());
        }
    }

    // Timer callback. True when the quiet period is over.
    fn expire(&mut self, now_ms: f64) -> bool {
        self.timer = None;
        if self.debounce.fire(now_ms) {
            return true;
        }
        if let Some(remaining) = self.debounce.remaining_ms(now_ms) {
            self.arm(remaining);
        }
        false
    }

    fn arm(&mut self, delay_ms: f64) {
        let callback = match &self.callback {
            Some(callback) => callback,
            None => return,
        };
        let scheduled = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), delay_ms.ceil() as i32);
        match scheduled {
            Ok(handle) => self.timer = Some(handle),
            Err(err) => warn!("resize debounce failed: {:?}", err),
        }
    }
}
