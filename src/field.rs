// The particle field: owns the particles, the throttle clock and the pending
// frame request. Everything the animation loop touches lives here and is
// passed to each step by reference.

use crate::capability::{Capabilities, Gate};
use crate::clock::FrameClock;
use crate::config::FieldConfig;
use crate::particle::{self, Particle};
use crate::renderer::Surface;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::utils::Timer;
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// Gated off at startup; never leaves this state.
    Disabled,
    /// Waiting for the first `start`.
    Idle,
    Running,
    /// Page hidden, no frame requested.
    Suspended,
}

/// Opacity for a connection between two particles `dist_sq` apart.
/// Falls linearly from `max_alpha` at distance zero to exactly zero at
/// `threshold`, and stays zero beyond it.
pub fn connection_alpha(dist_sq: f64, threshold: f64, max_alpha: f64) -> f64 {
    if dist_sq >= threshold * threshold {
        return 0.0;
    }
    max_alpha * (1.0 - dist_sq.sqrt() / threshold)
}

pub struct ParticleField<S: Surface, F: FrameScheduler> {
    config: FieldConfig,
    gate: Gate,
    state: FieldState,
    surface: S,
    scheduler: F,
    rng: StdRng,
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    mobile: bool,
    clock: FrameClock,
    pending_frame: Option<FrameHandle>,
}

impl<S: Surface, F: FrameScheduler> ParticleField<S, F> {
    /// Evaluates the device gate once. A gated field hides its surface and
    /// ignores every later call.
    pub fn new(
        config: FieldConfig,
        caps: &dyn Capabilities,
        mut surface: S,
        scheduler: F,
        rng: StdRng,
    ) -> Self {
        let gate = Gate::evaluate(caps, &config);
        let state = match &gate {
            Gate::Enabled => FieldState::Idle,
            Gate::Disabled(reason) => {
                log!("particle field disabled: {}", reason);
                surface.set_hidden(true);
                FieldState::Disabled
            }
        };
        ParticleField {
            clock: FrameClock::from_fps(config.target_fps),
            config,
            gate,
            state,
            surface,
            scheduler,
            rng,
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            mobile: false,
            pending_frame: None,
        }
    }

    /// Sizes the surface, generates the first batch and requests the first
    /// frame. A page that is already hidden starts suspended and waits for
    /// `set_visible(true)`. Calling it on a started field only resizes.
    pub fn start(&mut self, width: f64, height: f64, visible: bool) {
        match self.state {
            FieldState::Disabled => return,
            FieldState::Idle if visible => self.state = FieldState::Running,
            FieldState::Idle => self.state = FieldState::Suspended,
            FieldState::Running | FieldState::Suspended => {}
        }
        self.resize(width, height);
        if self.state == FieldState::Running {
            self.schedule();
        }
    }

    /// Replaces the whole particle set for the new surface size.
    pub fn resize(&mut self, width: f64, height: f64) {
        if self.state == FieldState::Disabled {
            return;
        }
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.mobile = self.config.is_mobile(self.width);
        self.surface.resize(self.width, self.height);

        let count = self.config.particle_count(self.width, self.height);
        self.particles = particle::spawn_batch(&mut self.rng, count, self.width, self.height, &self.config);
        log!(
            "particle field {}x{}: {} particles{}",
            self.width,
            self.height,
            count,
            if self.mobile { " (mobile)" } else { "" }
        );
    }

    /// Page visibility changed. Hiding cancels the outstanding request;
    /// showing again requests exactly one fresh frame.
    pub fn set_visible(&mut self, visible: bool) {
        match (self.state, visible) {
            (FieldState::Running, false) => {
                if let Some(handle) = self.pending_frame.take() {
                    self.scheduler.cancel_frame(handle);
                }
                self.state = FieldState::Suspended;
            }
            (FieldState::Suspended, true) => {
                self.state = FieldState::Running;
                self.clock.reset();
                self.schedule();
            }
            _ => {}
        }
    }

    /// Toggles `console.time` around each drawn frame.
    pub fn set_profile(&mut self, enabled: bool) {
        self.config.profile = enabled;
    }

    /// Animation callback. Returns whether a frame was drawn.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.pending_frame = None;
        if self.state != FieldState::Running {
            return false;
        }
        let drawn = self.clock.ready(now_ms);
        if drawn {
            self.draw_frame();
        }
        self.schedule();
        drawn
    }

    fn schedule(&mut self) {
        if self.pending_frame.is_some() {
            return;
        }
        match self.scheduler.request_frame() {
            Ok(handle) => self.pending_frame = Some(handle),
            Err(err) => warn!("particle field stopped: {}", err),
        }
    }

    fn draw_frame(&mut self) {
        let _timer = if self.config.profile {
            Some(Timer::new("ParticleField::draw_frame"))
        } else {
            None
        };

        self.surface.clear();
        if !self.mobile && self.config.grid_size > 0.0 {
            self.draw_grid();
        }

        let (width, height) = (self.width, self.height);
        for p in self.particles.iter_mut() {
            p.advance(width, height);
            self.surface.fill_circle(p.pos, p.radius, p.color);
        }

        self.draw_connections();
    }

    fn draw_grid(&mut self) {
        let spacing = self.config.grid_size;
        let (color, alpha) = (self.config.grid_color, self.config.grid_alpha);
        let mut x = 0.0;
        while x <= self.width {
            self.surface.stroke_line([x, 0.0], [x, self.height], color, alpha);
            x += spacing;
        }
        let mut y = 0.0;
        while y <= self.height {
            self.surface.stroke_line([0.0, y], [self.width, y], color, alpha);
            y += spacing;
        }
    }

    // Runs after every particle has moved this frame.
    fn draw_connections(&mut self) {
        let threshold = self.config.connection_distance_for(self.mobile);
        let threshold_sq = threshold * threshold;
        let window = if self.mobile {
            self.config.mobile_neighbor_window
        } else {
            None
        };
        let n = self.particles.len();
        for i in 0..n {
            let end = match window {
                Some(w) => (i + 1 + w).min(n),
                None => n,
            };
            for j in (i + 1)..end {
                let (a, b) = (&self.particles[i], &self.particles[j]);
                let dist_sq = a.distance_squared(b);
                if dist_sq < threshold_sq {
                    let alpha = connection_alpha(dist_sq, threshold, self.config.line_alpha);
                    self.surface
                        .stroke_line(a.pos, b.pos, self.config.line_color, alpha);
                }
            }
        }
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::StaticCapabilities;
    use crate::color;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use crate::scheduler::ManualScheduler;
    use rand::SeedableRng;

    type TestField = ParticleField<RecordingSurface, ManualScheduler>;

    fn field_with(config: FieldConfig, caps: StaticCapabilities) -> TestField {
        ParticleField::new(
            config,
            &caps,
            RecordingSurface::new(),
            ManualScheduler::new(),
            StdRng::seed_from_u64(42),
        )
    }

    fn fire(field: &mut TestField, now: f64) -> bool {
        let frames = field.scheduler_mut().drain();
        let mut drawn = false;
        for _ in frames {
            drawn |= field.tick(now);
        }
        drawn
    }

    #[test]
    fn alpha_falls_to_zero_at_threshold() {
        let threshold = 120.0;
        let mut previous = f64::INFINITY;
        for d in 0..=130 {
            let d = d as f64;
            let alpha = connection_alpha(d * d, threshold, 0.15);
            assert!(alpha <= previous);
            assert!(alpha >= 0.0);
            previous = alpha;
        }
        assert_eq!(connection_alpha(0.0, threshold, 0.15), 0.15);
        assert_eq!(connection_alpha(threshold * threshold, threshold, 0.15), 0.0);
        assert_eq!(connection_alpha(200.0 * 200.0, threshold, 0.15), 0.0);
    }

    #[test]
    fn new_field_waits_for_start() {
        let field = field_with(FieldConfig::default(), StaticCapabilities::default());
        assert_eq!(field.state(), FieldState::Idle);
        assert!(field.particles().is_empty());
        assert_eq!(field.scheduler().requested(), 0);
    }

    #[test]
    fn start_generates_and_requests_one_frame() {
        let mut field = field_with(FieldConfig::default(), StaticCapabilities::default());
        field.start(1024.0, 768.0, true);
        assert_eq!(field.state(), FieldState::Running);
        assert_eq!(field.particles().len(), 15);
        assert_eq!(field.surface().width, 1024.0);
        assert_eq!(field.scheduler().pending(), 1);
    }

    #[test]
    fn throttled_tick_still_reschedules() {
        let mut field = field_with(FieldConfig::default(), StaticCapabilities::default());
        field.start(1024.0, 768.0, true);
        assert!(fire(&mut field, 0.0));
        assert!(!fire(&mut field, 10.0));
        assert_eq!(field.surface().frames, 1);
        assert_eq!(field.scheduler().pending(), 1);
        assert!(fire(&mut field, 40.0));
        assert_eq!(field.surface().frames, 2);
    }

    #[test]
    fn frame_draws_every_particle_and_grid_on_desktop() {
        let mut field = field_with(FieldConfig::default(), StaticCapabilities::default());
        field.start(1024.0, 768.0, true);
        fire(&mut field, 0.0);

        let surface = field.surface();
        assert_eq!(surface.circles().count(), 15);
        let grid_lines = surface
            .lines()
            .filter(|c| match c {
                DrawCommand::Line { alpha, .. } => *alpha == 0.03,
                _ => false,
            })
            .count();
        // 0, 60, .., 1020 vertical and 0, 60, .., 720 horizontal
        assert_eq!(grid_lines, 18 + 13);
    }

    #[test]
    fn mobile_skips_grid_and_uses_fixed_count() {
        let mut field = field_with(FieldConfig::default(), StaticCapabilities::default());
        field.start(375.0, 812.0, true);
        assert!(field.is_mobile());
        fire(&mut field, 0.0);
        let surface = field.surface();
        assert_eq!(surface.circles().count(), 15);
        let max_alpha = field.config().line_alpha;
        for line in surface.lines() {
            if let DrawCommand::Line { from, to, alpha, .. } = line {
                let d = vecmath::vec2_len(vecmath::vec2_sub(*from, *to));
                assert!(d < 80.0);
                assert!(*alpha > 0.0 && *alpha <= max_alpha);
            }
        }
    }

    #[test]
    fn connections_use_positions_after_the_move() {
        let config = FieldConfig {
            grid_size: 0.0,
            ..FieldConfig::default()
        };
        let mut field = field_with(config, StaticCapabilities::default());
        field.start(1024.0, 768.0, true);
        field.particles = vec![
            Particle::new([100.0, 100.0], [0.0, 0.0], 1.0, color::VIOLET),
            // 121px away before the move, 119px after it
            Particle::new([221.0, 100.0], [-2.0, 0.0], 1.0, color::CYAN),
        ];
        fire(&mut field, 0.0);
        let lines: Vec<_> = field.surface().lines().cloned().collect();
        assert_eq!(lines.len(), 1);
        match &lines[0] {
            DrawCommand::Line { from, to, .. } => {
                assert_eq!(*from, [100.0, 100.0]);
                assert_eq!(*to, [219.0, 100.0]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn mobile_neighbor_window_limits_pairs() {
        let config = FieldConfig {
            mobile_neighbor_window: Some(1),
            ..FieldConfig::default()
        };
        let mut field = field_with(config, StaticCapabilities::default());
        field.start(400.0, 400.0, true);
        field.particles = (0..4)
            .map(|i| Particle::new([10.0 + i as f64, 10.0], [0.0, 0.0], 1.0, color::BLUE))
            .collect();
        fire(&mut field, 0.0);
        // only (0,1), (1,2), (2,3)
        assert_eq!(field.surface().lines().count(), 3);
    }

    #[test]
    fn low_power_device_is_disabled() {
        let caps = StaticCapabilities {
            hardware_concurrency: Some(2),
            ..StaticCapabilities::default()
        };
        let mut field = field_with(FieldConfig::default(), caps);
        assert_eq!(field.state(), FieldState::Disabled);
        assert!(field.surface().hidden);

        field.start(1024.0, 768.0, true);
        field.resize(1920.0, 1080.0);
        field.set_visible(false);
        field.set_visible(true);
        assert!(field.particles().is_empty());
        assert_eq!(field.scheduler().requested(), 0);
        assert_eq!(field.surface().frames, 0);
    }

    #[test]
    fn hidden_page_requests_nothing_and_resumes_once() {
        let mut field = field_with(FieldConfig::default(), StaticCapabilities::default());
        field.start(1024.0, 768.0, true);
        fire(&mut field, 0.0);
        fire(&mut field, 40.0);

        field.set_visible(false);
        assert_eq!(field.state(), FieldState::Suspended);
        assert_eq!(field.scheduler().pending(), 0);
        assert_eq!(field.scheduler().cancelled(), 1);
        let requested = field.scheduler().requested();

        // stale callbacks delivered while hidden do nothing
        assert!(!field.tick(60.0));
        assert_eq!(field.scheduler().requested(), requested);

        field.set_visible(false);
        field.set_visible(true);
        field.set_visible(true);
        assert_eq!(field.scheduler().requested(), requested + 1);
        assert_eq!(field.scheduler().pending(), 1);

        // fresh clock: the first frame back draws right away
        assert!(fire(&mut field, 5000.0));
        assert_eq!(field.scheduler().pending(), 1);
    }

    #[test]
    fn resize_replaces_the_whole_set() {
        let mut field = field_with(FieldConfig::default(), StaticCapabilities::default());
        field.start(1024.0, 768.0, true);
        let before = field.particles().to_vec();
        field.resize(1920.0, 1080.0);
        assert_eq!(field.particles().len(), 40);
        assert_eq!(field.size(), (1920.0, 1080.0));
        assert!(field.particles().iter().all(|p| !before.contains(p)));
        // resize does not stack frame requests
        assert_eq!(field.scheduler().pending(), 1);
    }

    #[test]
    fn particles_stay_in_bounds() {
        let mut field = field_with(FieldConfig::classic(), StaticCapabilities::default());
        field.start(300.0, 200.0, true);
        field.resize(800.0, 600.0);
        let slack = field.config().max_speed;
        let mut now = 0.0;
        for _ in 0..5_000 {
            fire(&mut field, now);
            now += 20.0;
            for p in field.particles() {
                assert!(p.pos[0] >= -slack && p.pos[0] <= 800.0 + slack);
                assert!(p.pos[1] >= -slack && p.pos[1] <= 600.0 + slack);
            }
        }
    }

    #[test]
    fn starting_hidden_waits_for_visibility() {
        let mut field = field_with(FieldConfig::default(), StaticCapabilities::default());
        field.start(1024.0, 768.0, false);
        assert_eq!(field.state(), FieldState::Suspended);
        assert_eq!(field.particles().len(), 15);
        assert_eq!(field.scheduler().requested(), 0);

        field.set_visible(true);
        assert_eq!(field.state(), FieldState::Running);
        assert_eq!(field.scheduler().requested(), 1);
        assert!(fire(&mut field, 0.0));
    }

    #[test]
    fn profiling_keeps_drawing() {
        let mut field = field_with(FieldConfig::default(), StaticCapabilities::default());
        field.set_profile(true);
        assert!(field.config().profile);
        field.start(1024.0, 768.0, true);
        assert!(fire(&mut field, 0.0));
        assert!(fire(&mut field, 40.0));
        assert_eq!(field.surface().frames, 2);
        field.set_profile(false);
        assert!(!field.config().profile);
    }
}
