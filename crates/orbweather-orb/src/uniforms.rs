//! Shader uniform definitions

/// Pixel size of the render surface plus its aspect ratio (`iResolution`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Resolution {
    pub width: f32,
    pub height: f32,
    pub aspect: f32,
}

impl Resolution {
    pub fn new(width: f32, height: f32) -> Self {
        let aspect = if height > 0.0 { width / height } else { 0.0 };
        Self {
            width,
            height,
            aspect,
        }
    }
}

/// Values fed to the orb program on every draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformSet {
    /// Seconds (`iTime`)
    pub time: f32,
    pub resolution: Resolution,
    /// Hue rotation in degrees
    pub hue: f32,
    /// Smoothed hover amount in [0, 1]
    pub hover: f32,
    /// Radians, never decreasing while the loop runs
    pub rotation: f32,
    pub hover_intensity: f32,
}

impl UniformSet {
    pub fn new(hue: f32, hover_intensity: f32) -> Self {
        Self {
            time: 0.0,
            resolution: Resolution::default(),
            hue,
            hover: 0.0,
            rotation: 0.0,
            hover_intensity,
        }
    }
}

/// GPU-side uniform block. Layout matches a std140 block of
/// `{ float iTime; float hue; float hover; float rot; vec3 iResolution; float hoverIntensity; }`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuUniforms {
    pub time: f32,            // offset 0
    pub hue: f32,             // offset 4
    pub hover: f32,           // offset 8
    pub rotation: f32,        // offset 12
    pub resolution: [f32; 3], // offset 16, vec3 aligned to 16
    pub hover_intensity: f32, // offset 28, packs into the vec3 tail
}

impl From<&UniformSet> for GpuUniforms {
    fn from(u: &UniformSet) -> Self {
        Self {
            time: u.time,
            hue: u.hue,
            hover: u.hover,
            rotation: u.rotation,
            resolution: [u.resolution.width, u.resolution.height, u.resolution.aspect],
            hover_intensity: u.hover_intensity,
        }
    }
}
