// Simple particle struct to keep track of individual position, velocity, size, and color

use crate::color::Color;
use crate::config::FieldConfig;
use rand::seq::SliceRandom;
use rand::Rng;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub radius: f64,
    pub color: Color,
}

impl Particle {
    pub fn new(pos: Vector2<f64>, vel: Vector2<f64>, radius: f64, color: Color) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            color,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64, config: &FieldConfig) -> Particle {
        let pos = [rng.gen::<f64>() * width, rng.gen::<f64>() * height];
        // gen() is in [0, 1), so each axis lands in [-max_speed, max_speed)
        let vel = [
            (rng.gen::<f64>() - 0.5) * 2.0 * config.max_speed,
            (rng.gen::<f64>() - 0.5) * 2.0 * config.max_speed,
        ];
        let (min_radius, max_radius) = config.radius_range;
        let radius = min_radius + rng.gen::<f64>() * (max_radius - min_radius);
        let color = *config
            .palette
            .choose(rng)
            .unwrap_or(&config.line_color);
        Particle::new(pos, vel, radius, color)
    }

    // Moves one frame and reflects off the surface edges. Only the velocity
    // sign changes; an overshooting position is pulled back by the next step.
    pub fn advance(&mut self, width: f64, height: f64) {
        self.pos = vecmath::vec2_add(self.pos, self.vel);
        if self.pos[0] < 0.0 || self.pos[0] > width {
            self.vel[0] = -self.vel[0];
        }
        if self.pos[1] < 0.0 || self.pos[1] > height {
            self.vel[1] = -self.vel[1];
        }
    }

    pub fn distance_squared(&self, other: &Particle) -> f64 {
        vecmath::vec2_square_len(vecmath::vec2_sub(self.pos, other.pos))
    }
}

pub fn spawn_batch<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    width: f64,
    height: f64,
    config: &FieldConfig,
) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle::random(rng, width, height, config))
        .collect()
}
