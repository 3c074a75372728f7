//! Animated orb background: shader program, uniform state and frame loop.

pub mod animation;
pub mod ascii;
pub mod driver;
pub mod error;
pub mod hover;
pub mod shader;
pub mod surface;
pub mod uniforms;

pub use animation::{AnimationState, OrbSettings};
pub use ascii::AsciiSink;
pub use driver::{DriverReport, FrameDriver, FrameSink, OrbEvent};
pub use error::SinkError;
pub use hover::{hover_target, DEFAULT_FALLOFF};
pub use shader::{OrbShader, FRAGMENT_SRC, UNIFORM_NAMES, VERTEX_SRC};
pub use surface::Surface;
pub use uniforms::{GpuUniforms, Resolution, UniformSet};
