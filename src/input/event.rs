/// A pointer or modifier event, already translated out of the host's
/// event type.
///
/// Coordinates are physical pixels relative to the viewport's top-left
/// corner. Both the winit window and the browser canvas produce these and
/// hand them to an [`InputProcessor`](super::InputProcessor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The cursor moved inside the viewport.
    CursorMoved {
        /// Physical x.
        x: f32,
        /// Physical y.
        y: f32,
    },
    /// The cursor left the viewport. The next move starts a fresh delta.
    CursorLeft,
    /// A button went down or up.
    MouseButton {
        /// Button.
        button: MouseButton,
        /// Down if `true`.
        pressed: bool,
    },
    /// Wheel motion in line steps; positive moves the camera closer.
    Scroll {
        /// Line steps.
        delta: f32,
    },
    /// Shift went down or up.
    ModifiersChanged {
        /// Shift held.
        shift: bool,
    },
    /// The viewport lost keyboard focus; any held button is dropped.
    FocusLost,
}

/// Buttons the orbit controls distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Orbits, or pans with shift.
    Left,
    /// Pans.
    Right,
    /// Pans.
    Middle,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` code. Back, forward, and unknown
    /// buttons act as the primary button.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Right,
            _ => Self::Left,
        }
    }
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        use winit::event::MouseButton as Winit;
        match button {
            Winit::Right => Self::Right,
            Winit::Middle => Self::Middle,
            Winit::Left | Winit::Back | Winit::Forward | Winit::Other(_) => {
                Self::Left
            }
        }
    }
}
