//! Input events and the pump that produces them.
//!
//! Window toolkits like minifb are polled, not evented: each frame you can
//! ask which keys went down, where the cursor is, whether the wheel moved.
//! [`InputTracker`] diffs consecutive [`InputSnapshot`]s into the discrete
//! [`InputEvent`]s the session's quit logic consumes.

/// Input the loop reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed, Ctrl+C, or any other explicit request to stop.
    Quit,
    KeyDown,
    ButtonDown,
    Scroll,
    /// Cursor moved to this position.
    PointerMove(i32, i32),
}

/// Pull-based stream of input events.
pub trait EventSource {
    /// Everything that happened since the last poll.
    fn poll(&mut self) -> Vec<InputEvent>;
}

/// Replays a fixed script: one batch of events per poll, then nothing.
#[derive(Clone, Debug, Default)]
pub struct ScriptedEvents {
    batches: Vec<Vec<InputEvent>>,
    next: usize,
}

impl ScriptedEvents {
    pub fn new(batches: Vec<Vec<InputEvent>>) -> Self {
        Self { batches, next: 0 }
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self) -> Vec<InputEvent> {
        let batch = self.batches.get(self.next).cloned().unwrap_or_default();
        self.next += 1;
        batch
    }
}

/// Raw polled state for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// False once the window has been closed.
    pub open: bool,
    /// Ctrl+C was pressed.
    pub interrupted: bool,
    /// Keys that went down since the previous frame.
    pub keys_pressed: usize,
    /// Left, middle, right button held at poll time.
    pub buttons: [bool; 3],
    /// Wheel delta this frame, if any.
    pub scroll: Option<(f32, f32)>,
    /// Cursor position in window coordinates, if known.
    pub mouse: Option<(f32, f32)>,
}

/// Turns successive snapshots into events.
#[derive(Clone, Debug, Default)]
pub struct InputTracker {
    buttons: [bool; 3],
    mouse: Option<(i32, i32)>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diff(&mut self, snap: InputSnapshot) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if !snap.open || snap.interrupted {
            events.push(InputEvent::Quit);
        }

        events.extend(std::iter::repeat_n(InputEvent::KeyDown, snap.keys_pressed));

        for (held, was_held) in snap.buttons.iter().zip(self.buttons.iter()) {
            if *held && !*was_held {
                events.push(InputEvent::ButtonDown);
            }
        }
        self.buttons = snap.buttons;

        if let Some((dx, dy)) = snap.scroll {
            if dx != 0.0 || dy != 0.0 {
                events.push(InputEvent::Scroll);
            }
        }

        // The first known position is only recorded; motion is a change.
        if let Some((x, y)) = snap.mouse {
            let pos = (x.round() as i32, y.round() as i32);
            if let Some(prev) = self.mouse {
                if prev != pos {
                    events.push(InputEvent::PointerMove(pos.0, pos.1));
                }
            }
            self.mouse = Some(pos);
        }

        events
    }
}
