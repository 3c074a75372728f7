//! Cooperative frame loop for the orb.
//!
//! The driver owns all animation state. Pointer and resize events arrive over
//! a channel and are applied between frames, so nothing is shared or locked.
//! The loop ends only when its cancellation token fires (or an optional frame
//! budget is spent).

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::animation::{AnimationState, OrbSettings};
use crate::error::SinkError;
use crate::surface::Surface;
use crate::uniforms::UniformSet;

/// Input from the host window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbEvent {
    /// Pointer position in viewport coordinates
    PointerMoved { x: f32, y: f32 },
    /// New viewport size in CSS pixels
    Resized {
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
    },
}

/// Receives one draw per frame.
pub trait FrameSink {
    fn draw(&mut self, uniforms: &UniformSet) -> Result<(), SinkError>;

    /// Pixel buffer changed size.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverReport {
    pub frames: u64,
    pub draws: u64,
    pub surface_lost: bool,
    pub final_uniforms: UniformSet,
}

pub struct FrameDriver<S: FrameSink> {
    state: AnimationState,
    surface: Surface,
    viewport: (f32, f32),
    sink: S,
    events: mpsc::Receiver<OrbEvent>,
    frame_limit: Option<u64>,
}

impl<S: FrameSink> FrameDriver<S> {
    /// Create a driver and the sender the host uses to feed it events.
    ///
    /// `surface` is sized once here, as the host would on startup.
    pub fn new(settings: OrbSettings, surface: Surface, mut sink: S) -> (Self, mpsc::Sender<OrbEvent>) {
        let (tx, events) = mpsc::channel(64);

        let mut state = AnimationState::new(settings);
        state.set_resolution(surface.resolution());
        let (w, h) = surface.pixel_size();
        sink.resize(w, h);

        let driver = Self {
            state,
            viewport: surface.css_size(),
            surface,
            sink,
            events,
            frame_limit: None,
        };
        (driver, tx)
    }

    /// Stop on its own after `frames` frames.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    fn handle_event(&mut self, event: OrbEvent) {
        match event {
            OrbEvent::PointerMoved { x, y } => {
                let (w, h) = self.viewport;
                self.state.pointer_moved(x, y, w, h);
            }
            OrbEvent::Resized {
                width,
                height,
                device_pixel_ratio,
            } => {
                self.viewport = (width, height);
                let resolution = self.surface.resize(width, height, device_pixel_ratio);
                self.state.set_resolution(resolution);
                let (w, h) = self.surface.pixel_size();
                self.sink.resize(w, h);
            }
        }
    }

    /// Run until `cancel` fires. Consumes the driver and hands back the sink.
    pub async fn run(mut self, cancel: CancellationToken) -> (DriverReport, S) {
        let fps = self.state.settings().fps.max(1);
        let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let start = Instant::now();
        let mut frames = 0u64;
        let mut draws = 0u64;
        let mut surface_lost = false;
        let mut events_open = true;

        tracing::info!(fps, "Orb frame loop started");

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                event = self.events.recv(), if events_open => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        tracing::debug!("Orb event channel closed");
                        events_open = false;
                    }
                },

                tick = ticker.tick() => {
                    let t_ms = tick.duration_since(start).as_secs_f64() * 1000.0;
                    let uniforms = self.state.advance(t_ms);
                    frames += 1;

                    if !surface_lost {
                        match self.sink.draw(uniforms) {
                            Ok(()) => draws += 1,
                            Err(e) if e.is_fatal() => {
                                tracing::warn!("Orb surface lost after {} frames: {}", frames, e);
                                surface_lost = true;
                            }
                            Err(e) => tracing::debug!("Orb draw failed: {}", e),
                        }
                    }

                    if self.frame_limit.is_some_and(|limit| frames >= limit) {
                        break;
                    }
                }
            }
        }

        tracing::info!(frames, draws, "Orb frame loop stopped");

        let report = DriverReport {
            frames,
            draws,
            surface_lost,
            final_uniforms: *self.state.uniforms(),
        };
        (report, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<UniformSet>,
        sizes: Vec<(u32, u32)>,
        fail_after: Option<usize>,
    }

    impl FrameSink for RecordingSink {
        fn draw(&mut self, uniforms: &UniformSet) -> Result<(), SinkError> {
            if self.fail_after.is_some_and(|n| self.frames.len() >= n) {
                return Err(SinkError::SurfaceLost);
            }
            self.frames.push(*uniforms);
            Ok(())
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.sizes.push((width, height));
        }
    }

    fn surface() -> Surface {
        Surface::new(800.0, 600.0, 1.0)
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_limit_draws_once_per_frame() {
        let (driver, _tx) = FrameDriver::new(OrbSettings::default(), surface(), RecordingSink::default());
        let (report, sink) = driver
            .with_frame_limit(120)
            .run(CancellationToken::new())
            .await;

        assert_eq!(report.frames, 120);
        assert_eq!(report.draws, 120);
        assert_eq!(sink.frames.len(), 120);
        assert_eq!(sink.sizes, vec![(800, 600)]);

        let rotations: Vec<f32> = sink.frames.iter().map(|u| u.rotation).collect();
        assert!(rotations.windows(2).all(|w| w[1] >= w[0]));
        // ~2 seconds at 60 fps, 0.1 rad/s
        assert!((report.final_uniforms.rotation - 0.2).abs() < 0.01);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_loop() {
        let (driver, _tx) = FrameDriver::new(OrbSettings::default(), surface(), RecordingSink::default());
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(driver.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(500)).await;
        cancel.cancel();

        let (report, _) = handle.await.unwrap();
        assert!(report.frames >= 25 && report.frames <= 35, "frames {}", report.frames);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pointer_events_raise_hover() {
        let (driver, tx) = FrameDriver::new(OrbSettings::default(), surface(), RecordingSink::default());
        tx.send(OrbEvent::PointerMoved { x: 400.0, y: 300.0 }).await.unwrap();

        let (report, _) = driver
            .with_frame_limit(300)
            .run(CancellationToken::new())
            .await;
        assert!(report.final_uniforms.hover > 0.99);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resize_updates_resolution() {
        let (driver, tx) = FrameDriver::new(OrbSettings::default(), surface(), RecordingSink::default());
        tx.send(OrbEvent::Resized {
            width: 500.0,
            height: 250.0,
            device_pixel_ratio: 2.0,
        })
        .await
        .unwrap();
        drop(tx);

        let (report, sink) = driver
            .with_frame_limit(5)
            .run(CancellationToken::new())
            .await;

        assert_eq!(report.final_uniforms.resolution.width, 1000.0);
        assert_eq!(report.final_uniforms.resolution.aspect, 2.0);
        assert_eq!(sink.sizes.last(), Some(&(1000, 500)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lost_surface_stops_drawing_but_keeps_ticking() {
        let sink = RecordingSink {
            fail_after: Some(3),
            ..Default::default()
        };
        let (driver, _tx) = FrameDriver::new(OrbSettings::default(), surface(), sink);
        let (report, sink) = driver
            .with_frame_limit(10)
            .run(CancellationToken::new())
            .await;

        assert!(report.surface_lost);
        assert_eq!(report.frames, 10);
        assert_eq!(report.draws, 3);
        assert_eq!(sink.frames.len(), 3);
    }
}
