//! Borderless full-desktop window backed by minifb.
//!
//! The window covers the virtual desktop, stays on top, and hides the
//! cursor. It is both the rendering surface (a software [`FrameBuffer`]
//! pushed with `update_with_buffer`) and the input source (polled state
//! diffed by [`InputTracker`]).

use crate::Color;
use crate::error::{Error, Result};
use crate::input::{EventSource, InputEvent, InputSnapshot, InputTracker};
use crate::is_interrupted;
use crate::surface::{FrameBuffer, Surface};
use crate::tint::TintedImage;
use crate::topology::Region;
use minifb::{KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub struct ScreenWindow {
    window: Window,
    frame: FrameBuffer,
    tracker: InputTracker,
    interrupted: Arc<AtomicBool>,
}

impl ScreenWindow {
    /// Open a window exactly covering `bounds` (virtual-desktop coordinates).
    pub fn open(title: &str, bounds: Region, interrupted: Arc<AtomicBool>) -> Result<Self> {
        let (width, height) = (bounds.width as usize, bounds.height as usize);
        let options = WindowOptions {
            borderless: true,
            title: false,
            resize: false,
            topmost: true,
            ..WindowOptions::default()
        };

        let mut window =
            Window::new(title, width, height, options).map_err(|e| Error::Window(e.to_string()))?;
        window.set_position(bounds.x as isize, bounds.y as isize);
        window.set_cursor_visibility(false);

        tracing::info!("Window opened at {}", bounds);

        Ok(Self {
            window,
            frame: FrameBuffer::new(width, height),
            tracker: InputTracker::new(),
            interrupted,
        })
    }

    /// Current window state. Buttons are read as held state: a click that
    /// presses and releases between two polls is never seen, because
    /// minifb exposes no per-event button queue.
    fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            open: self.window.is_open(),
            interrupted: is_interrupted(&self.interrupted),
            keys_pressed: self.window.get_keys_pressed(KeyRepeat::No).len(),
            buttons: [
                self.window.get_mouse_down(MouseButton::Left),
                self.window.get_mouse_down(MouseButton::Middle),
                self.window.get_mouse_down(MouseButton::Right),
            ],
            scroll: self.window.get_scroll_wheel(),
            mouse: self.window.get_mouse_pos(MouseMode::Pass),
        }
    }
}

impl Surface for ScreenWindow {
    fn size(&self) -> (usize, usize) {
        self.frame.size()
    }

    fn clear(&mut self, color: Color) {
        self.frame.clear(color);
    }

    fn composite(&mut self, image: &TintedImage, x: i32, y: i32) {
        self.frame.composite(image, x, y);
    }

    fn present(&mut self) -> Result<()> {
        self.window
            .update_with_buffer(&self.frame.pixels, self.frame.width, self.frame.height)
            .map_err(|e| Error::Window(e.to_string()))?;
        self.frame.present()
    }
}

impl EventSource for ScreenWindow {
    fn poll(&mut self) -> Vec<InputEvent> {
        let snap = self.snapshot();
        self.tracker.diff(snap)
    }
}
