// Tunable constants for the particle field. The page shipped two sets of
// numbers over its lifetime; both are kept as presets.

use crate::color::{self, Color};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    pub max_particles: usize,
    pub area_per_particle: f64,
    pub mobile_particle_count: usize,
    pub mobile_breakpoint: f64,
    pub connection_distance: f64,
    pub mobile_connection_distance: f64,
    /// How many following particles each particle is checked against on
    /// narrow viewports. `None` checks every pair.
    pub mobile_neighbor_window: Option<usize>,
    /// Grid spacing in pixels, `0.0` disables the grid.
    pub grid_size: f64,
    pub target_fps: f64,
    /// Per-axis speed bound in pixels per frame.
    pub max_speed: f64,
    pub radius_range: (f64, f64),
    pub palette: [Color; 4],
    pub line_color: Color,
    pub line_alpha: f64,
    pub grid_color: Color,
    pub grid_alpha: f64,
    pub low_power_max_cores: u32,
    pub constrained_connections: &'static [&'static str],
    pub resize_debounce_ms: i32,
    pub profile: bool,
}

impl FieldConfig {
    pub fn optimized() -> Self {
        FieldConfig {
            max_particles: 40,
            area_per_particle: 50_000.0,
            mobile_particle_count: 15,
            mobile_breakpoint: 768.0,
            connection_distance: 120.0,
            mobile_connection_distance: 80.0,
            mobile_neighbor_window: Some(5),
            grid_size: 60.0,
            target_fps: 30.0,
            max_speed: 0.25,
            radius_range: (0.5, 2.0),
            palette: color::PALETTE,
            line_color: color::VIOLET,
            line_alpha: 0.15,
            grid_color: color::VIOLET,
            grid_alpha: 0.03,
            low_power_max_cores: 2,
            constrained_connections: &["slow-2g", "2g"],
            resize_debounce_ms: 250,
            profile: false,
        }
    }

    pub fn classic() -> Self {
        FieldConfig {
            max_particles: 80,
            area_per_particle: 15_000.0,
            mobile_particle_count: 30,
            connection_distance: 150.0,
            mobile_connection_distance: 100.0,
            mobile_neighbor_window: Some(10),
            grid_size: 50.0,
            target_fps: 60.0,
            max_speed: 0.4,
            radius_range: (1.0, 3.0),
            line_alpha: 0.2,
            grid_alpha: 0.05,
            ..FieldConfig::optimized()
        }
    }

    pub fn is_mobile(&self, width: f64) -> bool {
        width < self.mobile_breakpoint
    }

    pub fn particle_count(&self, width: f64, height: f64) -> usize {
        if self.is_mobile(width) {
            return self.mobile_particle_count;
        }
        let area = (width.max(0.0) * height.max(0.0)) / self.area_per_particle;
        (area.floor() as usize).min(self.max_particles)
    }

    pub fn connection_distance_for(&self, mobile: bool) -> f64 {
        if mobile {
            self.mobile_connection_distance
        } else {
            self.connection_distance
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig::optimized()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRevision(pub String);

impl fmt::Display for UnknownRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field revision '{}', expected 'optimized' or 'classic'", self.0)
    }
}

impl std::error::Error for UnknownRevision {}

impl FromStr for FieldConfig {
    type Err = UnknownRevision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "optimized" => Ok(FieldConfig::optimized()),
            "classic" => Ok(FieldConfig::classic()),
            other => Err(UnknownRevision(other.to_owned())),
        }
    }
}
