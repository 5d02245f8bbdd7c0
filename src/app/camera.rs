use eframe::egui::{Pos2, Rect, Vec2};

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;

// At most +/-8% zoom change per wheel event.
const MAX_WHEEL_STEP: f32 = 0.08;
const WHEEL_SENSITIVITY: f32 = 0.0016;

const COAST_FRICTION_PER_FRAME: f32 = 0.94;
const COAST_MIN_SPEED: f32 = 24.0;

/// Pan/zoom view state. The same transform pair serves rendering,
/// hit-testing, drag capture and click-to-add, so a card's on-screen spot
/// always matches its stored world coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn world_to_screen(&self, rect: Rect, world: Vec2) -> Pos2 {
        rect.center() + self.pan + world * self.zoom
    }

    pub fn screen_to_world(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.pan) / self.zoom
    }

    /// Multiplicative zoom keeping the world point under `pointer` fixed on
    /// screen: read the point under the old zoom, then re-solve the pan for
    /// the new one.
    pub fn zoom_at(&mut self, rect: Rect, pointer: Pos2, scroll: f32) {
        let world_before = self.screen_to_world(rect, pointer);

        let factor =
            (1.0 + scroll * WHEEL_SENSITIVITY).clamp(1.0 - MAX_WHEEL_STEP, 1.0 + MAX_WHEEL_STEP);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - rect.center() - world_before * self.zoom;
    }

    /// Re-center the view on a world point.
    pub fn focus_on(&mut self, world: Vec2) {
        self.pan = -world * self.zoom;
    }
}

/// Post-release pan coasting. Velocity is sampled (screen px/s) while the
/// canvas is dragged; after release it decays by a fixed per-frame friction
/// factor, time-scaled so decay is frame-rate independent.
#[derive(Clone, Copy, Debug, Default)]
pub struct Inertia {
    velocity: Vec2,
    coasting: bool,
}

impl Inertia {
    pub fn sample(&mut self, drag_delta: Vec2, dt: f32) {
        self.velocity = drag_delta / dt.max(1.0 / 240.0);
    }

    pub fn release(&mut self) {
        if self.velocity.length() >= COAST_MIN_SPEED {
            self.coasting = true;
        } else {
            self.velocity = Vec2::ZERO;
        }
    }

    pub fn cancel(&mut self) {
        self.velocity = Vec2::ZERO;
        self.coasting = false;
    }

    pub fn is_coasting(&self) -> bool {
        self.coasting
    }

    /// Advance one frame while coasting: returns the pan delta to apply, or
    /// `None` once the velocity has decayed below the stop threshold.
    pub fn step(&mut self, dt: f32) -> Option<Vec2> {
        if !self.coasting {
            return None;
        }

        let delta = self.velocity * dt;
        let decay = COAST_FRICTION_PER_FRAME.powf((dt * 60.0).clamp(0.25, 3.0));
        self.velocity *= decay;

        if self.velocity.length() < COAST_MIN_SPEED {
            self.cancel();
        }
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(1280.0, 800.0))
    }

    #[test]
    fn transforms_round_trip_within_tolerance() {
        let camera = Camera {
            pan: vec2(-133.0, 71.5),
            zoom: 1.7,
        };
        let rect = canvas();

        for screen in [pos2(0.0, 0.0), pos2(640.0, 400.0), pos2(1111.0, 13.0)] {
            let back = camera.world_to_screen(rect, camera.screen_to_world(rect, screen));
            assert!((back - screen).length() < 1e-3, "{screen:?} -> {back:?}");
        }
    }

    #[test]
    fn zoom_is_clamped_to_bounds_under_repeated_wheel_events() {
        let rect = canvas();
        let pointer = pos2(400.0, 300.0);

        let mut camera = Camera::default();
        for _ in 0..500 {
            camera.zoom_at(rect, pointer, 120.0);
        }
        assert_eq!(camera.zoom, MAX_ZOOM);

        for _ in 0..500 {
            camera.zoom_at(rect, pointer, -120.0);
        }
        assert_eq!(camera.zoom, MIN_ZOOM);
    }

    #[test]
    fn zoom_keeps_the_point_under_the_cursor_fixed() {
        let rect = canvas();
        let pointer = pos2(870.0, 215.0);
        let mut camera = Camera {
            pan: vec2(40.0, -25.0),
            zoom: 1.0,
        };

        let world_before = camera.screen_to_world(rect, pointer);
        camera.zoom_at(rect, pointer, 90.0);
        let world_after = camera.screen_to_world(rect, pointer);

        assert!((world_after - world_before).length() < 1e-3);
        assert!(camera.zoom > 1.0);
    }

    #[test]
    fn wheel_step_is_capped_at_eight_percent() {
        let rect = canvas();
        let mut camera = Camera::default();
        camera.zoom_at(rect, pos2(0.0, 0.0), 10_000.0);
        assert!((camera.zoom - 1.08).abs() < 1e-5);
    }

    #[test]
    fn slow_release_does_not_coast() {
        let mut inertia = Inertia::default();
        inertia.sample(vec2(0.1, 0.0), 1.0 / 60.0);
        inertia.release();
        assert!(!inertia.is_coasting());
        assert_eq!(inertia.step(1.0 / 60.0), None);
    }

    #[test]
    fn coasting_decays_to_a_stop_and_cancels_on_new_input() {
        let mut inertia = Inertia::default();
        inertia.sample(vec2(30.0, 0.0), 1.0 / 60.0);
        inertia.release();
        assert!(inertia.is_coasting());

        let first = inertia.step(1.0 / 60.0).expect("coasting");
        assert!(first.x > 0.0);

        let mut frames = 0;
        while inertia.is_coasting() {
            inertia.step(1.0 / 60.0);
            frames += 1;
            assert!(frames < 10_000, "coasting never stopped");
        }

        inertia.sample(vec2(30.0, 0.0), 1.0 / 60.0);
        inertia.release();
        inertia.cancel();
        assert!(!inertia.is_coasting());
        assert_eq!(inertia.step(1.0 / 60.0), None);
    }
}
