//! Terminal preview sink: samples the CPU shader onto a character grid.

use std::io::{ErrorKind, Write};

use crate::driver::FrameSink;
use crate::error::SinkError;
use crate::shader::OrbShader;
use crate::uniforms::{Resolution, UniformSet};

/// Characters from transparent to opaque.
const RAMP: &[u8] = b" .:-=+*#%@";

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

pub struct AsciiSink<W: Write> {
    cols: usize,
    rows: usize,
    every: u64,
    frame: u64,
    out: W,
}

impl<W: Write> AsciiSink<W> {
    pub fn new(cols: usize, rows: usize, out: W) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            every: 1,
            frame: 0,
            out,
        }
    }

    /// Only print every `n`th frame.
    pub fn every(mut self, n: u64) -> Self {
        self.every = n.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render one frame as text, one line per row, top row first.
    pub fn render_frame(&self, uniforms: &UniformSet) -> String {
        // the grid is a virtual surface of cols x (rows * CELL_ASPECT) pixels
        let width = self.cols as f32;
        let height = self.rows as f32 * CELL_ASPECT;
        let grid = UniformSet {
            resolution: Resolution::new(width, height),
            ..*uniforms
        };

        let mut text = String::with_capacity((self.cols + 1) * self.rows);
        for row in 0..self.rows {
            // fragment origin is bottom-left
            let y = height - (row as f32 + 0.5) * CELL_ASPECT;
            for col in 0..self.cols {
                let x = col as f32 + 0.5;
                let alpha = OrbShader::shade([x, y], &grid)[3].clamp(0.0, 1.0);
                let idx = ((alpha * (RAMP.len() - 1) as f32).round() as usize).min(RAMP.len() - 1);
                text.push(RAMP[idx] as char);
            }
            text.push('\n');
        }
        text
    }
}

impl<W: Write> FrameSink for AsciiSink<W> {
    fn draw(&mut self, uniforms: &UniformSet) -> Result<(), SinkError> {
        let frame = self.frame;
        self.frame += 1;
        if frame % self.every != 0 {
            return Ok(());
        }

        let text = self.render_frame(uniforms);
        let written = self
            .out
            .write_all(b"\x1b[H")
            .and_then(|()| self.out.write_all(text.as_bytes()))
            .and_then(|()| self.out.flush());

        match written {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::BrokenPipe => Err(SinkError::SurfaceLost),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_frame_has_requested_grid() {
        let sink = AsciiSink::new(40, 20, Vec::new());
        let text = sink.render_frame(&UniformSet::new(0.0, 0.4));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|l| l.len() == 40));
    }

    #[test]
    fn test_orb_ring_is_drawn_with_clear_centre() {
        let sink = AsciiSink::new(40, 20, Vec::new());
        let text = sink.render_frame(&UniformSet::new(0.0, 0.4));
        let lines: Vec<&str> = text.lines().collect();

        let centre = lines[10].as_bytes()[20];
        assert_eq!(centre, b' ');
        assert!(text.chars().any(|c| c != ' ' && c != '\n'));
        // corners sit outside the orb
        assert_eq!(lines[0].as_bytes()[0], b' ');
    }

    #[test]
    fn test_draw_skips_frames() {
        let mut sink = AsciiSink::new(8, 4, Vec::new()).every(3);
        let u = UniformSet::new(0.0, 0.4);
        for _ in 0..6 {
            sink.draw(&u).unwrap();
        }
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.matches("\x1b[H").count(), 2);
    }

    #[test]
    fn test_broken_pipe_loses_surface() {
        let mut sink = AsciiSink::new(8, 4, ClosedPipe);
        let err = sink.draw(&UniformSet::new(0.0, 0.4)).unwrap_err();
        assert!(err.is_fatal());
    }
}
