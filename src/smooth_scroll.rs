// Same-page anchors scroll smoothly instead of jumping.

use crate::dom_helpers;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

/// The selector an in-page `href` points at, or `None` for a bare `#`.
pub fn anchor_target(href: &str) -> Option<&str> {
    let href = href.trim();
    if href.len() > 1 && href.starts_with('#') {
        Some(href)
    } else {
        None
    }
}

#[allow(deprecated)]
pub fn smooth_scroll_to(element: &Element, block: ScrollLogicalPosition) {
    let mut options = ScrollIntoViewOptions::new();
    options.behavior(ScrollBehavior::Smooth).block(block);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

pub fn init_smooth_scroll(document: &Document) -> Result<(), JsValue> {
    for link in dom_helpers::query_all(document, "a[href^=\"#\"]")? {
        let document = document.clone();
        let anchor = link.clone();
        dom_helpers::listen(&link, "click", move |event| {
            // in-page links never jump, even when the target is missing
            event.prevent_default();
            let href = match anchor.get_attribute("href") {
                Some(href) => href,
                None => return,
            };
            let selector = match anchor_target(&href) {
                Some(selector) => selector,
                None => return,
            };
            if let Ok(Some(target)) = document.query_selector(selector) {
                smooth_scroll_to(&target, ScrollLogicalPosition::Start);
            }
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_resolve_to_selectors() {
        assert_eq!(anchor_target("#projects"), Some("#projects"));
        assert_eq!(anchor_target(" #contact "), Some("#contact"));
    }

    #[test]
    fn bare_hash_is_ignored() {
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target(""), None);
        assert_eq!(anchor_target("/about#team"), None);
    }
}
