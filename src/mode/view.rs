//! View mode: rotate, pan and zoom the displayed model.
//!
//! The one mode available in every window. A yoked auxiliary window routes
//! all of its mutations to the Main window's view state; if Main displays a
//! volume sliced obliquely, rotation lands on the volume's oblique rotation
//! matrix instead.

use glam::DMat4;

use crate::controller::ViewController;
use crate::events::{MouseEvent, MouseGesture};
use crate::model::BrainModel;
use crate::mode::MouseMode;
use crate::pick::PickRouter;
use crate::selection::{SelectedKind, SelectionMask};
use crate::view_state::{RotationAxisMode, ViewState, ViewingProjection, VolumeAxis};
use crate::window::WindowId;

/// Apply a view-mode rotation drag to a surface view state.
pub(crate) fn rotate_surface_view(view: &mut ViewState, mode: RotationAxisMode, e: &MouseEvent) {
    let biggest = f64::from(e.biggest_delta());
    match mode {
        RotationAxisMode::X => view.rotate_x(biggest),
        RotationAxisMode::Y => view.rotate_y(-biggest),
        RotationAxisMode::Z => view.rotate_z(-biggest),
        RotationAxisMode::XY => {
            view.rotate_x(f64::from(e.dy));
            view.rotate_y(-f64::from(e.dx));
        }
        RotationAxisMode::Off => {}
    }
}

/// Zoom a surface-style view: scale under orthographic projection, zoom
/// distance under perspective.
fn zoom_surface_view(view: &mut ViewState, biggest: f64) {
    match view.projection {
        ViewingProjection::Orthographic => view.zoom_by(biggest),
        ViewingProjection::Perspective => view.perspective_zoom -= biggest,
    }
}

enum ViewFamily {
    Contours,
    Surface { flat: bool },
    Volume,
}

impl ViewController {
    pub(crate) fn view_mouse(&mut self, window: WindowId, e: MouseEvent) {
        if e.gesture == MouseGesture::LeftClick {
            let picked =
                PickRouter::pick(self.renderer.as_mut(), window, e.x, e.y, SelectionMask::ALL);
            // Clicking an axes glyph selects its matrix and enters axes mode
            // instead of identifying.
            if window.is_main()
                && let Some(item) =
                    picked.nearest_matching(SelectionMask::TRANSFORMATION_MATRIX_AXES)
                && let SelectedKind::TransformationAxes { matrix } = item.kind
            {
                let set_rc = self.windows[window.index()].brain_set.clone();
                set_rc
                    .borrow_mut()
                    .transform_file
                    .set_selected_index(Some(matrix));
                self.apply_mode_switch(MouseMode::TransformationMatrixAxes);
                return;
            }
            self.identify_picked(window, &picked);
            return;
        }

        let target = self.view_target(window);
        let widx = target.index();
        let win = &self.windows[widx];
        let set_rc = win.brain_set.clone();
        let model_index = win.model_index;
        let axis_mode = self.rotation_axis_mode;

        let family = {
            let set = set_rc.borrow();
            match set.model(model_index) {
                Some(BrainModel::Contours(_)) => ViewFamily::Contours,
                Some(BrainModel::Surface(s)) => ViewFamily::Surface {
                    flat: s.surface_type.is_flat(),
                },
                Some(BrainModel::SurfaceAndVolume(s)) => ViewFamily::Surface {
                    flat: s.surface_type.is_flat(),
                },
                Some(BrainModel::Volume(_)) => ViewFamily::Volume,
                None => return,
            }
        };

        let biggest = f64::from(e.biggest_delta());
        let dx = f64::from(e.dx);
        let dy = f64::from(e.dy);
        let mut redraw_all = false;

        {
            let mut set = set_rc.borrow_mut();
            match family {
                ViewFamily::Contours => {
                    let Some(model) = set.model_mut(model_index) else {
                        return;
                    };
                    let view = model.view_mut(widx);
                    match e.gesture {
                        MouseGesture::LeftMove => view.rotate_z(-biggest),
                        MouseGesture::LeftShiftMove => view.translate_by(dx * 0.1, dy * 0.1, 0.0),
                        MouseGesture::LeftControlMove => view.zoom_contours_by(biggest),
                        _ => return,
                    }
                }
                ViewFamily::Surface { flat } => {
                    let Some(model) = set.model_mut(model_index) else {
                        return;
                    };
                    let view = model.view_mut(widx);
                    match e.gesture {
                        MouseGesture::LeftMove => {
                            if !flat {
                                rotate_surface_view(view, axis_mode, &e);
                            }
                        }
                        MouseGesture::LeftShiftMove => view.translate_by(dx, dy, 0.0),
                        MouseGesture::LeftControlMove => zoom_surface_view(view, biggest),
                        _ => return,
                    }
                }
                ViewFamily::Volume => match e.gesture {
                    MouseGesture::LeftShiftMove => {
                        let Some(model) = set.model_mut(model_index) else {
                            return;
                        };
                        model.view_mut(widx).translate_by(dx, dy, 0.0);
                    }
                    MouseGesture::LeftControlMove => {
                        let Some(model) = set.model_mut(model_index) else {
                            return;
                        };
                        zoom_surface_view(model.view_mut(widx), biggest);
                    }
                    MouseGesture::LeftMove => {
                        let axis = set
                            .model(model_index)
                            .map(|m| m.view(widx).selected_axis)
                            .unwrap_or(VolumeAxis::Unknown);
                        if axis.is_oblique() {
                            // The oblique matrix is shared by every window, so
                            // everyone redraws.
                            if let Some(v) =
                                set.model_mut(model_index).and_then(|m| m.as_volume_mut())
                            {
                                v.oblique_rotation *= DMat4::from_rotation_x(dy.to_radians());
                                v.oblique_rotation *= DMat4::from_rotation_y((-dx).to_radians());
                                redraw_all = true;
                            }
                        } else if axis == VolumeAxis::All {
                            let fiducial = set.active_fiducial;
                            if let Some(model) = fiducial.and_then(|i| set.model_mut(i)) {
                                let view = model.view_mut(widx);
                                view.rotate_x(dy);
                                view.rotate_y(-dx);
                            }
                        } else if self.volume_rotation_enabled {
                            if let Some(model) = set.model_mut(model_index) {
                                model.view_mut(widx).display_rotation += -biggest;
                            }
                        }
                    }
                    _ => return,
                },
            }
        }

        if redraw_all {
            self.update_all(None);
        } else {
            self.update_all(Some(window));
        }
    }
}
