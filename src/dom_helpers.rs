// Helper functions for dealing with the DOM: element lookup, canvas contexts,
// event listeners and timers.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement, Window};

pub fn query<T: JsCast>(document: &Document, selector: &str) -> Result<Option<T>, String> {
    let element = document
        .query_selector(selector)
        .map_err(|_| format!("invalid selector '{}'", selector))?;
    match element {
        Some(element) => element
            .dyn_into::<T>()
            .map(Some)
            .map_err(|_| format!("'{}' matched an element of the wrong type", selector)),
        None => Ok(None),
    }
}

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, String> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|_| format!("invalid selector '{}'", selector))?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, String> {
    canvas
        .get_context("2d")
        .map_err(|_| String::from("Unable to request 2d context"))?
        .ok_or_else(|| String::from("Canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| String::from("2d context has unexpected type"))
}

pub fn viewport_size(window: &Window) -> (f64, f64) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0);
    (width, height)
}

// Listeners live for the lifetime of the page, so the closure is leaked.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

// The callback is released when it runs. Do not clear the returned handle,
// that would leak it; see `background::ResizeDebounce` for a reusable timer.
pub fn set_timeout<F>(window: &Window, timeout_ms: i32, callback: F) -> Result<i32, JsValue>
where
    F: FnOnce() + 'static,
{
    let callback = Closure::once_into_js(callback);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), timeout_ms)
}

/// Runs `callback` when the browser is idle, falling back to a zero timeout
/// where `requestIdleCallback` is unavailable.
pub fn when_idle<F>(window: &Window, callback: F) -> Result<(), JsValue>
where
    F: FnOnce() + 'static,
{
    let request_idle = js_sys::Reflect::get(window, &JsValue::from_str("requestIdleCallback"))?;
    match request_idle.dyn_into::<js_sys::Function>() {
        Ok(request_idle) => {
            let callback = Closure::once_into_js(callback);
            request_idle.call1(window, &callback)?;
        }
        Err(_) => {
            set_timeout(window, 0, callback)?;
        }
    }
    Ok(())
}
