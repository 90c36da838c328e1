//! Debug-draw collaborator used for visualizing joints.
//!
//! The core only emits line segments. Rendering them is the host's job; a
//! world without a drawer simply skips the calls.

use std::sync::Arc;

use glam::Vec2;
use parking_lot::Mutex;

/// RGBA color in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineColor(pub [f32; 4]);

impl LineColor {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
}

impl Default for LineColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Sink for debug line segments.
pub trait DebugDraw: Send + Sync {
    fn set_line_color(&mut self, color: LineColor);
    fn draw_line(&mut self, start: Vec2, end: Vec2);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec2,
    pub end: Vec2,
    pub color: LineColor,
}

/// Lines shared between a [`LineRecorder`] and whoever renders them.
pub type SharedLines = Arc<Mutex<Vec<DebugLine>>>;

/// Collects lines into a buffer the host drains once per frame.
#[derive(Debug, Default, Clone)]
pub struct LineRecorder {
    color: LineColor,
    lines: SharedLines,
}

impl LineRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the buffer, still readable after the recorder moves into a world.
    pub fn lines(&self) -> SharedLines {
        Arc::clone(&self.lines)
    }

    pub fn drain(&self) -> Vec<DebugLine> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl DebugDraw for LineRecorder {
    fn set_line_color(&mut self, color: LineColor) {
        self.color = color;
    }

    fn draw_line(&mut self, start: Vec2, end: Vec2) {
        self.lines.lock().push(DebugLine {
            start,
            end,
            color: self.color,
        });
    }
}
