//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! drag detection, double-click timing, modifier keys). Key bindings live
//! in [`KeybindingOptions`](crate::options::KeybindingOptions) and resolve
//! to [`KeyAction`](super::KeyAction)s, which map to commands directly.

use glam::Vec2;
use web_time::Instant;

use super::event::{InputEvent, MouseButton};
use super::mouse::ClickTracker;
use crate::engine::command::Command;

/// Squared cursor travel (in pixels) after which a press counts as a drag.
const DRAG_THRESHOLD_SQ: f32 = 9.0;

/// Converts raw window events into [`Command`]s.
///
/// Left-drag orbits, shift+left-drag or right/middle-drag pans, the wheel
/// zooms, and a left double click toggles fullscreen.
pub struct InputProcessor {
    cursor: Option<Vec2>,
    /// Button that started the current press, if any.
    held: Option<MouseButton>,
    /// Cursor travel since the press.
    travel: Vec2,
    shift_pressed: bool,
    clicks: ClickTracker,
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl InputProcessor {
    /// Processor with no button held.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor: None,
            held: None,
            travel: Vec2::ZERO,
            shift_pressed: false,
            clicks: ClickTracker::new(),
        }
    }

    /// Last known cursor position in physical pixels.
    #[must_use]
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Whether the shift modifier is held.
    #[must_use]
    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    /// Whether the current press has moved far enough to be a drag.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.held.is_some() && self.travel.length_squared() > DRAG_THRESHOLD_SQ
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<Command> {
        self.handle_event_at(event, Instant::now())
    }

    /// [`handle_event`](Self::handle_event) with an explicit timestamp for
    /// click timing.
    pub fn handle_event_at(
        &mut self,
        event: InputEvent,
        now: Instant,
    ) -> Option<Command> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed, now)
            }
            InputEvent::Scroll { delta } => Some(Command::Zoom { delta }),
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
            InputEvent::CursorLeft => {
                self.cursor = None;
                None
            }
            InputEvent::FocusLost => {
                self.held = None;
                self.travel = Vec2::ZERO;
                self.shift_pressed = false;
                None
            }
        }
    }

    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<Command> {
        let position = Vec2::new(x, y);
        let delta = self.cursor.replace(position).map(|prev| position - prev)?;
        let button = self.held?;
        self.travel += delta;

        let pan = match button {
            MouseButton::Left => self.shift_pressed,
            MouseButton::Right | MouseButton::Middle => true,
        };
        if pan {
            Some(Command::PanCamera { delta })
        } else {
            Some(Command::RotateCamera { delta })
        }
    }

    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        now: Instant,
    ) -> Option<Command> {
        if pressed {
            if self.held.is_none() {
                self.held = Some(button);
                self.travel = Vec2::ZERO;
            }
            return None;
        }

        if self.held != Some(button) {
            return None;
        }
        let dragged = self.is_dragging();
        self.held = None;
        self.travel = Vec2::ZERO;

        if button != MouseButton::Left {
            return None;
        }
        if dragged {
            self.clicks.reset();
            return None;
        }
        self.clicks
            .click_at(now)
            .then_some(Command::ToggleFullscreen)
    }
}
