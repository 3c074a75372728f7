use crate::uniforms::Resolution;

/// Render surface: CSS size of the container and the matching pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    css_width: f32,
    css_height: f32,
    pixel_width: u32,
    pixel_height: u32,
}

impl Surface {
    pub fn new(css_width: f32, css_height: f32, device_pixel_ratio: f32) -> Self {
        let mut surface = Self {
            css_width: 0.0,
            css_height: 0.0,
            pixel_width: 0,
            pixel_height: 0,
        };
        surface.resize(css_width, css_height, device_pixel_ratio);
        surface
    }

    /// Match the pixel buffer to the container size and pixel ratio, and
    /// return the new `iResolution`.
    pub fn resize(&mut self, css_width: f32, css_height: f32, device_pixel_ratio: f32) -> Resolution {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };

        self.css_width = css_width.max(0.0);
        self.css_height = css_height.max(0.0);
        self.pixel_width = (self.css_width * dpr).round() as u32;
        self.pixel_height = (self.css_height * dpr).round() as u32;

        tracing::debug!(
            width = self.pixel_width,
            height = self.pixel_height,
            dpr,
            "Surface resized"
        );
        self.resolution()
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.pixel_width as f32, self.pixel_height as f32)
    }

    pub fn css_size(&self) -> (f32, f32) {
        (self.css_width, self.css_height)
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.pixel_width, self.pixel_height)
    }
}
