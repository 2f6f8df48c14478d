//! Raw input events and gesture classification.
//!
//! Press, move and release arrive separately; the [`DragTracker`]
//! accumulates the mouse travel bounds so the release can be classified as
//! either a click (identify / mode action) or the end of a drag.

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift held.
    pub shift: bool,
    /// Control held.
    pub control: bool,
    /// Alt held.
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: false,
    };

    /// Shift only.
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        control: false,
        alt: false,
    };

    /// Control only.
    pub const CONTROL: Modifiers = Modifiers {
        shift: false,
        control: true,
        alt: false,
    };

    /// Alt only.
    pub const ALT: Modifiers = Modifiers {
        shift: false,
        control: false,
        alt: true,
    };

    /// Whether no modifier is held.
    pub fn is_none(self) -> bool {
        !self.shift && !self.control && !self.alt
    }
}

/// Mouse buttons the core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left button: all mode gestures.
    Left,
    /// Right button: context identification menu.
    Right,
}

/// Classified left-button mouse gestures routed to the mode machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseGesture {
    /// Press/release pair within the move tolerance.
    LeftClick,
    /// Plain press.
    LeftPress,
    /// Release after a drag.
    LeftRelease,
    /// Press with Shift held.
    LeftShiftPress,
    /// Press with Control held.
    LeftControlPress,
    /// Drag with no modifier.
    LeftMove,
    /// Drag with Shift held.
    LeftShiftMove,
    /// Drag with Control held.
    LeftControlMove,
    /// Drag with Alt held.
    LeftAltMove,
}

/// One mouse sample routed to a mode handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// The classified gesture.
    pub gesture: MouseGesture,
    /// Window x coordinate.
    pub x: i32,
    /// Window y coordinate (origin top-left).
    pub y: i32,
    /// Horizontal delta since the previous sample.
    pub dx: i32,
    /// Vertical delta since the previous sample (positive = up).
    pub dy: i32,
}

impl MouseEvent {
    /// The mouse-axis delta with the largest magnitude, the conventional
    /// scalar for single-axis rotation and zoom gestures.
    pub fn biggest_delta(&self) -> i32 {
        if self.dy.abs() > self.dx.abs() {
            self.dy
        } else {
            self.dx
        }
    }
}

/// Keys the core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Anterior view.
    A,
    /// Dorsal view.
    D,
    /// Lateral view.
    L,
    /// Medial view.
    M,
    /// Posterior view.
    P,
    /// Reset view.
    R,
    /// Ventral view.
    V,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Home.
    Home,
    /// Function key F1..F15 (1-based).
    Function(u8),
}

/// One key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key.
    pub key: Key,
    /// Modifier state.
    pub modifiers: Modifiers,
}

/// Accumulates mouse travel between press and release to discriminate a
/// click from a drag, and yields per-sample deltas for drag handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragTracker {
    last: (i32, i32),
    bounds: [i32; 4], // min x, min y, max x, max y
    active: bool,
}

impl DragTracker {
    /// Record a button press.
    pub fn press(&mut self, x: i32, y: i32) {
        self.last = (x, y);
        self.bounds = [x, y, x, y];
        self.active = true;
    }

    /// Record a move; returns `(dx, dy)` since the previous sample with the
    /// vertical axis flipped so positive dy means upward motion.
    pub fn movement(&mut self, x: i32, y: i32) -> (i32, i32) {
        let dx = x - self.last.0;
        let dy = self.last.1 - y;
        self.last = (x, y);
        self.extend_bounds(x, y);
        (dx, dy)
    }

    /// Record the release; returns true when the accumulated travel stayed
    /// within `tolerance` on both axes, i.e. the gesture was a click.
    pub fn release(&mut self, x: i32, y: i32, tolerance: i32) -> bool {
        self.extend_bounds(x, y);
        self.active = false;
        self.within_tolerance(tolerance)
    }

    /// Whether the accumulated travel is still within `tolerance`.
    pub fn within_tolerance(&self, tolerance: i32) -> bool {
        let dx = (self.bounds[2] - self.bounds[0]).abs();
        let dy = (self.bounds[3] - self.bounds[1]).abs();
        dx <= tolerance && dy <= tolerance
    }

    /// Whether a press is currently held.
    pub fn is_active(&self) -> bool {
        self.active
    }

    fn extend_bounds(&mut self, x: i32, y: i32) {
        self.bounds[0] = self.bounds[0].min(x);
        self.bounds[1] = self.bounds[1].min(y);
        self.bounds[2] = self.bounds[2].max(x);
        self.bounds[3] = self.bounds[3].max(y);
    }
}

/// Classify a press into a mode-machine gesture.
pub fn classify_press(modifiers: Modifiers) -> Option<MouseGesture> {
    if modifiers.is_none() {
        Some(MouseGesture::LeftPress)
    } else if modifiers == Modifiers::SHIFT {
        Some(MouseGesture::LeftShiftPress)
    } else if modifiers == Modifiers::CONTROL {
        Some(MouseGesture::LeftControlPress)
    } else {
        None
    }
}

/// Classify a drag sample into a mode-machine gesture.
pub fn classify_move(modifiers: Modifiers) -> Option<MouseGesture> {
    if modifiers.is_none() {
        Some(MouseGesture::LeftMove)
    } else if modifiers == Modifiers::SHIFT {
        Some(MouseGesture::LeftShiftMove)
    } else if modifiers == Modifiers::CONTROL {
        Some(MouseGesture::LeftControlMove)
    } else if modifiers == Modifiers::ALT {
        Some(MouseGesture::LeftAltMove)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_travel_is_a_click() {
        let mut t = DragTracker::default();
        t.press(100, 100);
        t.movement(101, 100);
        assert!(t.release(101, 100, 5));
    }

    #[test]
    fn large_travel_is_a_drag() {
        let mut t = DragTracker::default();
        t.press(100, 100);
        t.movement(120, 100);
        assert!(!t.release(120, 100, 5));
    }

    #[test]
    fn movement_deltas_flip_vertical_axis() {
        let mut t = DragTracker::default();
        t.press(10, 10);
        // Moving down on screen yields negative dy.
        let (dx, dy) = t.movement(12, 15);
        assert_eq!((dx, dy), (2, -5));
    }

    #[test]
    fn biggest_delta_prefers_vertical_on_tie_break() {
        let e = MouseEvent {
            gesture: MouseGesture::LeftMove,
            x: 0,
            y: 0,
            dx: 3,
            dy: -4,
        };
        assert_eq!(e.biggest_delta(), -4);
        let e2 = MouseEvent { dx: 4, dy: -4, ..e };
        assert_eq!(e2.biggest_delta(), 4);
    }
}
