//! Transformation-axes manipulation.
//!
//! While a matrix is selected its axes glyph can be dragged and nudged. All
//! rotation and translation happens in the viewer's screen frame: deltas are
//! transformed by the displayed surface's rotation before they reach the
//! matrix, so an arrow key always moves the glyph the way the screen shows.

use crate::controller::ViewController;
use crate::events::{Key, KeyEvent, MouseEvent, MouseGesture};
use crate::mode::MouseMode;
use crate::pick::PickRouter;
use crate::selection::{SelectedKind, SelectionMask};
use crate::transform::RotationMatrix;
use crate::window::WindowId;

/// Keyboard nudge magnitude, in degrees or model units.
const NUDGE: f64 = 5.0;

/// Reduced nudge magnitude while ALT is held.
const NUDGE_FINE: f64 = 1.0;

impl ViewController {
    pub(crate) fn axes_mouse(&mut self, window: WindowId, e: MouseEvent) {
        match e.gesture {
            MouseGesture::LeftClick => self.axes_click(window, e),
            MouseGesture::LeftMove => {
                self.nudge_selected_axes(window, AxesNudge::Rotate([
                    f64::from(e.dy),
                    -f64::from(e.dx),
                    0.0,
                ]));
            }
            MouseGesture::LeftShiftMove => {
                self.nudge_selected_axes(
                    window,
                    AxesNudge::Translate([f64::from(e.dx), f64::from(e.dy), 0.0]),
                );
            }
            MouseGesture::LeftControlMove => {
                self.nudge_selected_axes(window, AxesNudge::Translate([0.0, 0.0, -f64::from(e.dy)]));
            }
            _ => {}
        }
    }

    /// Clicking the selected glyph leaves the mode; clicking another glyph
    /// re-targets the selection.
    fn axes_click(&mut self, window: WindowId, e: MouseEvent) {
        let picked = self.pick_nearest(window, e.x, e.y, SelectionMask::TRANSFORMATION_MATRIX_AXES);
        let Some(item) = picked else {
            return;
        };
        let SelectedKind::TransformationAxes { matrix } = item.kind else {
            return;
        };
        let set_rc = self.windows[window.index()].brain_set.clone();
        let previous = set_rc.borrow().transform_file.selected_index();
        if previous == Some(matrix) {
            self.apply_mode_switch(MouseMode::View);
        } else {
            set_rc
                .borrow_mut()
                .transform_file
                .set_selected_index(Some(matrix));
            self.update_all(Some(window));
        }
    }

    pub(crate) fn axes_set_translate_mouse(&mut self, window: WindowId, e: MouseEvent) {
        if e.gesture != MouseGesture::LeftClick {
            return;
        }
        // Depth-buffer unprojection lands the glyph on whatever is under the
        // cursor.
        let Some(p) = PickRouter::unproject_sample(self.renderer.as_ref(), window, e.x, e.y, true)
        else {
            return;
        };
        let set_rc = self.windows[window.index()].brain_set.clone();
        let mut changed = None;
        {
            let mut set = set_rc.borrow_mut();
            let selected = set.transform_file.selected_index();
            if let Some(m) = set.transform_file.selected_mut() {
                let [tx, ty, tz] = m.translation();
                m.translate(p[0] - tx, p[1] - ty, p[2] - tz);
                changed = selected;
            }
        }
        if let Some(index) = changed {
            self.collaborators.transformation_editor.matrix_changed(index);
            self.update_all(Some(window));
        }
    }

    pub(crate) fn axes_key(&mut self, window: WindowId, key: KeyEvent) {
        // A key-up since the last press marks a discrete edit boundary for
        // the transformation editor's undo history.
        if self.mode_state.key_up_last_time {
            self.mode_state.key_up_last_time = false;
            self.collaborators
                .transformation_editor
                .axes_event_in_main_window();
        }

        let magnitude = if key.modifiers.alt { NUDGE_FINE } else { NUDGE };
        let nudge = if key.modifiers.shift {
            match key.key {
                Key::Left => AxesNudge::Translate([-magnitude, 0.0, 0.0]),
                Key::Right => AxesNudge::Translate([magnitude, 0.0, 0.0]),
                Key::Up => AxesNudge::Translate([0.0, magnitude, 0.0]),
                Key::Down => AxesNudge::Translate([0.0, -magnitude, 0.0]),
                _ => return,
            }
        } else if key.modifiers.control {
            // Control moves the glyph along the screen z axis.
            match key.key {
                Key::Up => AxesNudge::Translate([0.0, 0.0, -magnitude]),
                Key::Down => AxesNudge::Translate([0.0, 0.0, magnitude]),
                _ => return,
            }
        } else {
            match key.key {
                Key::Left => AxesNudge::Rotate([0.0, -magnitude, 0.0]),
                Key::Right => AxesNudge::Rotate([0.0, magnitude, 0.0]),
                Key::Up => AxesNudge::Rotate([-magnitude, 0.0, 0.0]),
                Key::Down => AxesNudge::Rotate([magnitude, 0.0, 0.0]),
                Key::PageUp => AxesNudge::Rotate([0.0, 0.0, magnitude]),
                Key::PageDown => AxesNudge::Rotate([0.0, 0.0, -magnitude]),
                Key::Home => AxesNudge::Reset,
                _ => return,
            }
        };
        self.nudge_selected_axes(window, nudge);
    }

    /// Apply one nudge to the selected matrix in the screen frame of the
    /// displayed surface, then tell the editor.
    fn nudge_selected_axes(&mut self, window: WindowId, nudge: AxesNudge) {
        let widx = window.index();
        let set_rc = self.windows[widx].brain_set.clone();
        let model_index = self.windows[widx].model_index;
        let mut changed = None;
        {
            let mut set = set_rc.borrow_mut();
            let view_rotation: Option<RotationMatrix> = set
                .model(model_index)
                .filter(|m| m.as_surface().is_some() || m.as_surface_and_volume().is_some())
                .map(|m| m.view(widx).rotation);
            let selected = set.transform_file.selected_index();
            let Some(m) = set.transform_file.selected_mut() else {
                return;
            };
            match nudge {
                AxesNudge::Rotate(angles) => {
                    m.nudge_rotation_in_view(angles, view_rotation.as_ref());
                }
                AxesNudge::Translate(d) => {
                    m.translate_relative_to(d, view_rotation.as_ref());
                }
                AxesNudge::Reset => m.identity(),
            }
            changed = selected;
        }
        if let Some(index) = changed {
            self.collaborators.transformation_editor.matrix_changed(index);
            self.update_all(Some(window));
        }
    }
}

enum AxesNudge {
    Rotate([f64; 3]),
    Translate([f64; 3]),
    Reset,
}
