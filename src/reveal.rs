// Scroll reveal: elements get the `visible` class the first time they enter
// the viewport, staggered by their position among their siblings.

use crate::dom_helpers;
use std::convert::TryFrom;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

pub const REVEAL_CLASS: &str = "visible";
pub const STAGGER_STEP_MS: i32 = 100;
pub const REVEAL_THRESHOLD: f64 = 0.1;

pub fn stagger_delay_ms(sibling_index: usize, step_ms: i32) -> i32 {
    i32::try_from(sibling_index)
        .unwrap_or(i32::MAX)
        .saturating_mul(step_ms)
}

/// Position of `element` among the element children of its parent.
fn sibling_index(element: &Element) -> usize {
    let mut index = 0;
    let mut current = element.previous_element_sibling();
    while let Some(sibling) = current {
        index += 1;
        current = sibling.previous_element_sibling();
    }
    index
}

#[allow(deprecated)]
fn observer_options() -> IntersectionObserverInit {
    let mut options = IntersectionObserverInit::new();
    options.threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
    options
}

fn reveal_after(window: &Window, element: Element, delay_ms: i32) -> Result<(), JsValue> {
    if delay_ms <= 0 {
        return element.class_list().add_1(REVEAL_CLASS);
    }
    dom_helpers::set_timeout(window, delay_ms, move || {
        let _ = element.class_list().add_1(REVEAL_CLASS);
    })?;
    Ok(())
}

/// Observes every element matching `selector`; each is revealed once and
/// then unobserved. With `stagger` unset the reveal is immediate.
pub fn observe_once(window: &Window, document: &Document, selector: &str, stagger: bool) -> Result<(), JsValue> {
    let targets = dom_helpers::query_all(document, selector)?;
    if targets.is_empty() {
        return Ok(());
    }

    let window = window.clone();
    let callback = Closure::wrap(Box::new(move |entries: js_sys::Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let entry = match entry.dyn_into::<IntersectionObserverEntry>() {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            if !entry.is_intersecting() {
                continue;
            }
            let target = entry.target();
            observer.unobserve(&target);
            let delay = if stagger {
                stagger_delay_ms(sibling_index(&target), STAGGER_STEP_MS)
            } else {
                0
            };
            if let Err(err) = reveal_after(&window, target, delay) {
                warn!("reveal failed: {:?}", err);
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &observer_options())?;
    callback.forget();
    for target in &targets {
        observer.observe(target);
    }
    Ok(())
}

pub fn init_scroll_reveal(window: &Window, document: &Document) -> Result<(), JsValue> {
    observe_once(window, document, ".project-card", true)?;
    observe_once(window, document, ".contact", false)
}
