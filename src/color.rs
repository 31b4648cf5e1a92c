// Simple color struct, created from an unsigned 32 representing RRGGBBAA

use std::fmt::Write;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;
        let a = num as u8;

        Color { r, g, b, a }
    }

    // CSS string for canvas fill/stroke styles. The stored alpha byte is
    // scaled by `alpha` so palette entries can be faded per draw call.
    pub fn to_css_rgba(self, alpha: f64) -> String {
        let alpha = (self.a as f64 / 255.0) * alpha.max(0.0).min(1.0);
        let mut css = String::with_capacity(32);
        let _ = write!(css, "rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha);
        css
    }
}

pub const VIOLET: Color = Color::from_u32(0x8b5cf6ff);
pub const CYAN: Color = Color::from_u32(0x06b6d4ff);
pub const PINK: Color = Color::from_u32(0xec4899ff);
pub const BLUE: Color = Color::from_u32(0x3b82f6ff);

pub const PALETTE: [Color; 4] = [VIOLET, CYAN, PINK, BLUE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpacks_rrggbbaa() {
        let c = Color::from_u32(0x11223344);
        assert_eq!(c, Color { r: 0x11, g: 0x22, b: 0x33, a: 0x44 });
    }

    #[test]
    fn css_alpha_is_scaled_and_clamped() {
        assert_eq!(VIOLET.to_css_rgba(0.5), "rgba(139, 92, 246, 0.5)");
        assert_eq!(VIOLET.to_css_rgba(3.0), "rgba(139, 92, 246, 1)");
        assert_eq!(VIOLET.to_css_rgba(-1.0), "rgba(139, 92, 246, 0)");
    }
}
