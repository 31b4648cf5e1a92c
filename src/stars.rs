// Twinkling star backdrop: a fixed number of small absolutely positioned
// divs, animated by the page stylesheet.

use crate::dom_helpers;
use rand::Rng;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

pub const STAR_COUNT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Percent of the container, [0, 100)
    pub left: f64,
    pub top: f64,
    /// Pixels, [1, 3)
    pub size: f64,
    /// Seconds
    pub delay: f64,
    pub duration: f64,
}

impl Star {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Star {
        Star {
            left: rng.gen::<f64>() * 100.0,
            top: rng.gen::<f64>() * 100.0,
            size: rng.gen::<f64>() * 2.0 + 1.0,
            delay: rng.gen::<f64>() * 3.0,
            duration: 2.0 + rng.gen::<f64>() * 2.0,
        }
    }

    pub fn style(&self) -> String {
        format!(
            "left: {}%; top: {}%; width: {size}px; height: {size}px; animation-delay: {}s; animation-duration: {}s;",
            self.left,
            self.top,
            self.delay,
            self.duration,
            size = self.size,
        )
    }
}

pub fn generate<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Star> {
    (0..count).map(|_| Star::random(rng)).collect()
}

/// Fills `.stars` with star elements. A page without the container is left
/// untouched.
pub fn init_stars(document: &Document) -> Result<(), JsValue> {
    let container = match dom_helpers::query::<HtmlElement>(document, ".stars")? {
        Some(container) => container,
        None => return Ok(()),
    };
    let mut rng = rand::thread_rng();
    for star in generate(&mut rng, STAR_COUNT) {
        let element = document.create_element("div")?.dyn_into::<HtmlElement>()?;
        element.set_class_name("star");
        element.set_attribute("style", &star.style())?;
        container.append_child(&element)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn stars_fall_in_their_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        let stars = generate(&mut rng, STAR_COUNT);
        assert_eq!(stars.len(), 50);
        for star in stars {
            assert!(star.left >= 0.0 && star.left <= 100.0);
            assert!(star.top >= 0.0 && star.top <= 100.0);
            assert!(star.size >= 1.0 && star.size <= 3.0);
            assert!(star.delay >= 0.0 && star.delay <= 3.0);
            assert!(star.duration >= 2.0 && star.duration <= 4.0);
        }
    }

    #[test]
    fn style_sets_square_size() {
        let star = Star {
            left: 12.5,
            top: 50.0,
            size: 2.0,
            delay: 0.5,
            duration: 3.0,
        };
        assert_eq!(
            star.style(),
            "left: 12.5%; top: 50%; width: 2px; height: 2px; animation-delay: 0.5s; animation-duration: 3s;"
        );
    }
}
