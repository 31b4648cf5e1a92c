// Soft radial glow that trails the pointer on hover-capable devices.
// Pointer moves only record a target; the element is moved at most once per
// display refresh.

use crate::capability::Capabilities;
use crate::dom_helpers;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, MouseEvent, Window};

#[derive(Debug, Clone, PartialEq)]
pub struct CursorGlow {
    pub pos: [f64; 2],
    pub opacity: f64,
    target: Option<[f64; 2]>,
    frame_pending: bool,
}

impl CursorGlow {
    pub fn new() -> Self {
        CursorGlow {
            pos: [0.0, 0.0],
            opacity: 0.0,
            target: None,
            frame_pending: false,
        }
    }

    /// Records the latest pointer position. Returns true when the caller
    /// needs to request an animation frame.
    pub fn pointer_moved(&mut self, x: f64, y: f64) -> bool {
        self.target = Some([x, y]);
        if self.frame_pending {
            false
        } else {
            self.frame_pending = true;
            true
        }
    }

    /// Applies the most recent pointer position. Returns false if there was
    /// nothing to apply.
    pub fn apply_frame(&mut self) -> bool {
        self.frame_pending = false;
        match self.target.take() {
            Some(pos) => {
                self.pos = pos;
                self.opacity = 1.0;
                true
            }
            None => false,
        }
    }

    pub fn pointer_left(&mut self) {
        self.opacity = 0.0;
    }

    pub fn pointer_entered(&mut self) {
        self.opacity = 1.0;
    }
}

impl Default for CursorGlow {
    fn default() -> Self {
        CursorGlow::new()
    }
}

const GLOW_STYLE: &str = "position: fixed; left: 0; top: 0; width: 400px; height: 400px; \
    background: radial-gradient(circle, rgba(139, 92, 246, 0.1) 0%, transparent 70%); \
    pointer-events: none; z-index: -1; transform: translate(-50%, -50%); \
    opacity: 0; transition: opacity 0.3s ease;";

fn sync_element(element: &HtmlElement, glow: &CursorGlow) {
    let style = element.style();
    let _ = style.set_property("left", &format!("{}px", glow.pos[0]));
    let _ = style.set_property("top", &format!("{}px", glow.pos[1]));
    sync_opacity(element, glow);
}

fn sync_opacity(element: &HtmlElement, glow: &CursorGlow) {
    let _ = element
        .style()
        .set_property("opacity", &glow.opacity.to_string());
}

/// Attaches the glow element and its listeners. Does nothing on devices
/// without a hovering pointer.
pub fn init_cursor_glow(window: &Window, document: &Document, caps: &dyn Capabilities) -> Result<(), JsValue> {
    if !caps.hover_pointer() {
        return Ok(());
    }
    let body = document.body().ok_or("document has no body")?;
    let element = document.create_element("div")?.dyn_into::<HtmlElement>()?;
    element.set_class_name("cursor-glow");
    element.set_attribute("style", GLOW_STYLE)?;
    element.set_attribute("aria-hidden", "true")?;
    body.append_child(&element)?;

    let glow = Rc::new(RefCell::new(CursorGlow::new()));

    let on_frame = {
        let glow = glow.clone();
        let element = element.clone();
        Closure::wrap(Box::new(move |_now: f64| {
            let mut glow = glow.borrow_mut();
            if glow.apply_frame() {
                sync_element(&element, &glow);
            }
        }) as Box<dyn FnMut(f64)>)
    };

    {
        let glow = glow.clone();
        let element = element.clone();
        let window = window.clone();
        dom_helpers::listen(document, "mousemove", move |event| {
            let event = match event.dyn_ref::<MouseEvent>() {
                Some(event) => event,
                None => return,
            };
            let needs_frame = glow
                .borrow_mut()
                .pointer_moved(event.client_x() as f64, event.client_y() as f64);
            if needs_frame {
                if window
                    .request_animation_frame(on_frame.as_ref().unchecked_ref())
                    .is_err()
                {
                    // no frame will come, apply right away
                    let mut glow = glow.borrow_mut();
                    glow.apply_frame();
                    sync_element(&element, &glow);
                }
            }
        })?;
    }

    {
        let glow = glow.clone();
        let element = element.clone();
        dom_helpers::listen(document, "mouseleave", move |_| {
            let mut glow = glow.borrow_mut();
            glow.pointer_left();
            sync_opacity(&element, &glow);
        })?;
    }

    dom_helpers::listen(document, "mouseenter", move |_| {
        let mut glow = glow.borrow_mut();
        glow.pointer_entered();
        sync_opacity(&element, &glow);
    })?;

    Ok(())
}
