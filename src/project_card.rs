// Expand/collapse for project cards.

use crate::dom_helpers;
use crate::smooth_scroll;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, ScrollLogicalPosition};

pub const EXPANDED_CLASS: &str = "expanded";
pub const LABEL_EXPAND: &str = "Подробнее";
pub const LABEL_COLLAPSE: &str = "Свернуть";

/// What the DOM should look like after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardView {
    pub expanded: bool,
    pub aria_expanded: &'static str,
    pub label: &'static str,
    pub scroll_into_view: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardState {
    expanded: bool,
}

impl CardState {
    pub fn new(expanded: bool) -> Self {
        CardState { expanded }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn view(&self) -> CardView {
        CardView {
            expanded: self.expanded,
            aria_expanded: if self.expanded { "true" } else { "false" },
            label: if self.expanded { LABEL_COLLAPSE } else { LABEL_EXPAND },
            scroll_into_view: self.expanded,
        }
    }

    pub fn toggle(&mut self) -> CardView {
        self.expanded = !self.expanded;
        self.view()
    }
}

fn apply(card: &Element, button: &Element, view: CardView) -> Result<(), JsValue> {
    card.class_list().toggle_with_force(EXPANDED_CLASS, view.expanded)?;
    button.set_attribute("aria-expanded", view.aria_expanded)?;
    button.set_text_content(Some(view.label));
    if view.scroll_into_view {
        smooth_scroll::smooth_scroll_to(card, ScrollLogicalPosition::Nearest);
    }
    Ok(())
}

pub fn init_project_cards(document: &Document) -> Result<(), JsValue> {
    for card in dom_helpers::query_all(document, ".project-card")? {
        let button = match card.query_selector(".project-card__toggle")? {
            Some(button) => button,
            None => continue,
        };
        let state = Rc::new(Cell::new(CardState::new(card.class_list().contains(EXPANDED_CLASS))));
        button.set_attribute("aria-expanded", state.get().view().aria_expanded)?;

        let target = button.clone();
        dom_helpers::listen(&button, "click", move |event| {
            event.prevent_default();
            let mut current = state.get();
            let view = current.toggle();
            state.set(current);
            if let Err(err) = apply(&card, &target, view) {
                warn!("card toggle failed: {:?}", err);
            }
        })?;
    }
    Ok(())
}
