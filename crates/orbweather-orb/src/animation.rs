//! Per-frame animation state for the orb.

use crate::hover::{hover_target, DEFAULT_FALLOFF};
use crate::uniforms::{Resolution, UniformSet};

/// Tunables for the animation loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbSettings {
    pub hue: f32,
    pub hover_intensity: f32,
    /// Fraction of the distance to the target covered each frame
    pub smoothing: f32,
    /// Radians per second
    pub rotation_speed: f32,
    pub hover_falloff: f32,
    pub fps: u32,
    /// Derive the smoothing factor from elapsed time instead of frame count
    pub time_normalized: bool,
}

impl Default for OrbSettings {
    fn default() -> Self {
        Self {
            hue: 0.0,
            hover_intensity: 0.4,
            smoothing: 0.05,
            rotation_speed: 0.1,
            hover_falloff: DEFAULT_FALLOFF,
            fps: 60,
            time_normalized: false,
        }
    }
}

impl OrbSettings {
    /// Time constant (seconds) that reproduces `smoothing` at `fps`.
    pub fn time_constant(&self) -> f32 {
        let frame = 1.0 / self.fps.max(1) as f32;
        -frame / (1.0 - self.smoothing.clamp(f32::EPSILON, 1.0 - f32::EPSILON)).ln()
    }
}

#[derive(Debug, Clone)]
pub struct AnimationState {
    settings: OrbSettings,
    uniforms: UniformSet,
    target_hover: f32,
    last_time_ms: f64,
    current_rot: f64,
    tau: f32,
}

impl AnimationState {
    pub fn new(settings: OrbSettings) -> Self {
        Self {
            settings,
            uniforms: UniformSet::new(settings.hue, settings.hover_intensity),
            target_hover: 0.0,
            last_time_ms: 0.0,
            current_rot: 0.0,
            tau: settings.time_constant(),
        }
    }

    pub fn settings(&self) -> &OrbSettings {
        &self.settings
    }

    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    pub fn target_hover(&self) -> f32 {
        self.target_hover
    }

    /// Recompute the hover target from a pointer position in a viewport.
    pub fn pointer_moved(&mut self, x: f32, y: f32, viewport_width: f32, viewport_height: f32) {
        self.target_hover = hover_target(
            x,
            y,
            viewport_width,
            viewport_height,
            self.settings.hover_falloff,
        );
    }

    pub fn set_target_hover(&mut self, target: f32) {
        self.target_hover = if target.is_finite() {
            target.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.uniforms.resolution = resolution;
    }

    /// Advance to host timestamp `t_ms` (milliseconds) and return the
    /// uniforms for this frame's draw.
    pub fn advance(&mut self, t_ms: f64) -> &UniformSet {
        // a clock that steps backwards must not unwind the rotation
        let dt = ((t_ms - self.last_time_ms) * 0.001).max(0.0);
        self.last_time_ms = t_ms;

        self.uniforms.time = (t_ms * 0.001) as f32;

        let alpha = if self.settings.time_normalized {
            1.0 - (-(dt as f32) / self.tau).exp()
        } else {
            self.settings.smoothing
        };
        self.uniforms.hover += (self.target_hover - self.uniforms.hover) * alpha;

        self.current_rot += dt * self.settings.rotation_speed as f64;
        self.uniforms.rotation = self.current_rot as f32;

        &self.uniforms
    }
}
