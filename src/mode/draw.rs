//! Drawing modes: borders, cuts and contours.
//!
//! Mouse motion appends samples to the window's linear buffer; SHIFT-press
//! finalizes the drawn object into the appropriate file; CONTROL-press while
//! drawing a border splices a range of an existing border into the buffer.

use log::{debug, warn};

use crate::collab::DrawDimension;
use crate::controller::ViewController;
use crate::error::ViewerError;
use crate::events::{MouseEvent, MouseGesture};
use crate::model::{Border, BrainModel, Contour};
use crate::mode::{MouseMode, rotate_surface_view};
use crate::pick::PickRouter;
use crate::selection::{SelectedKind, SelectionMask};
use crate::window::WindowId;

impl ViewController {
    pub(crate) fn border_draw_mouse(&mut self, window: WindowId, e: MouseEvent) {
        match e.gesture {
            MouseGesture::LeftMove => self.append_drawn_sample(window, e),
            MouseGesture::LeftShiftPress => self.finalize_drawing(window),
            MouseGesture::LeftControlPress => {
                if self.mode != MouseMode::CutDraw && self.mode != MouseMode::ContourDraw {
                    self.splice_press(window, e);
                }
            }
            MouseGesture::LeftAltMove => {
                let params = self.collaborators.drawing.drawing_parameters();
                if params.dimension == DrawDimension::ThreeD {
                    self.rotate_under_drawing(window, e);
                }
            }
            _ => {}
        }
    }

    fn append_drawn_sample(&mut self, window: WindowId, e: MouseEvent) {
        let params = self.collaborators.drawing.drawing_parameters();
        let point = match params.dimension {
            DrawDimension::ThreeD => self.renderer.surface_point_under_cursor(window, e.x, e.y),
            DrawDimension::TwoD => {
                PickRouter::unproject_sample(self.renderer.as_ref(), window, e.x, e.y, false)
            }
        };
        let Some(p) = point else {
            // Interpolation or unprojection failed; the sample is dropped.
            return;
        };
        self.windows[window.index()].linear_buffer.append(p);
        self.update_all(Some(window));
    }

    fn finalize_drawing(&mut self, window: WindowId) {
        let widx = window.index();
        if self.windows[widx].linear_buffer.len() < 2 {
            self.windows[widx].linear_buffer.clear();
            return;
        }
        let params = self.collaborators.drawing.drawing_parameters();
        let mut buffer = std::mem::take(&mut self.windows[widx].linear_buffer);
        buffer.resample_to_density(params.density, 2);
        if params.closed {
            buffer.close();
        }

        let set_rc = self.windows[widx].brain_set.clone();
        let model_index = self.windows[widx].model_index;
        let mode = self.mode;
        let mut warning = None;
        {
            let mut set = set_rc.borrow_mut();
            let volume_plane = set.model(model_index).and_then(|m| {
                let v = m.as_volume()?;
                let axis = m.view(widx).selected_axis;
                let index = axis.orthogonal_index()?;
                Some((axis, v.slice_coordinate(index, m.view(widx).selected_slices[index])))
            });
            let model_missing = set.model(model_index).is_none();
            let is_volume = set
                .model(model_index)
                .is_some_and(|m| m.as_volume().is_some());
            match mode {
                MouseMode::BorderDraw
                | MouseMode::BorderDrawNew
                | MouseMode::BorderUpdate
                | MouseMode::BorderUpdateNew => {
                    if model_missing {
                        warning = Some(ViewerError::NoModelDisplayed);
                    } else if is_volume {
                        match volume_plane {
                            Some((axis, coordinate)) => {
                                buffer.collapse_to_slice(axis, coordinate);
                                set.volume_borders.add_border(Border::new(
                                    &params.name,
                                    buffer.points().to_vec(),
                                    params.color_index,
                                ));
                            }
                            None => warning = Some(ViewerError::MissingVolume),
                        }
                    } else {
                        set.border_set.add_border(Border::new(
                            &params.name,
                            buffer.points().to_vec(),
                            params.color_index,
                        ));
                    }
                }
                MouseMode::CutDraw => {
                    set.cuts.add_border(Border::new(
                        &params.name,
                        buffer.points().to_vec(),
                        params.color_index,
                    ));
                }
                MouseMode::ContourDraw => {
                    if let Some(m) = set.model_mut(model_index).and_then(|m| m.as_contours_mut()) {
                        m.contours.add_contour(Contour {
                            section: params.section,
                            points: buffer.points().to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }
        if let Some(err) = warning {
            warn!("discarding drawn border: {err}");
            self.collaborators.warnings.warn(&err.to_string());
        }

        self.mode_state.augment_phase = 0;
        self.mode_state.augment_first = None;
        self.mode_state.cross_cursor = false;
        self.update_all(Some(window));
    }

    fn splice_press(&mut self, window: WindowId, e: MouseEvent) {
        let widx = window.index();
        let set_rc = self.windows[widx].brain_set.clone();
        let model_index = self.windows[widx].model_index;
        let is_volume = {
            let set = set_rc.borrow();
            set.model(model_index)
                .is_some_and(|m| m.as_volume().is_some())
        };
        let mask = if is_volume {
            SelectionMask::VOLUME_BORDER
        } else {
            SelectionMask::BORDER
        };

        let picked = PickRouter::pick(self.renderer.as_mut(), window, e.x, e.y, mask);
        let Some(item) = picked.nearest_matching(mask) else {
            return;
        };
        let (border, link) = match item.kind {
            SelectedKind::BorderPoint { border, link, .. } => (border, link),
            SelectedKind::VolumeBorderPoint { border, link } => (border, link),
            _ => return,
        };

        if self.mode_state.augment_phase == 0 {
            self.mode_state.augment_first = Some((border, link));
            self.mode_state.augment_phase = 1;
            self.mode_state.cross_cursor = true;
            debug!("splice endpoint A: border {border} link {link}");
            return;
        }

        let Some((first_border, first_link)) = self.mode_state.augment_first.take() else {
            self.mode_state.augment_phase = 0;
            return;
        };
        self.mode_state.augment_phase = 0;
        self.mode_state.cross_cursor = false;

        if first_border != border {
            // Both picks are discarded; the drawn buffer is untouched.
            let err = ViewerError::MisalignedSplice {
                first: first_border,
                second: border,
            };
            warn!("{err}");
            self.collaborators.warnings.warn(&err.to_string());
            return;
        }

        let points = {
            let set = set_rc.borrow();
            let source = if is_volume {
                set.volume_borders.get(border)
            } else {
                set.border_set.get(border)
            };
            match source {
                Some(b) => b.points.clone(),
                None => return,
            }
        };
        self.windows[widx]
            .linear_buffer
            .splice_from_border(&points, first_link, link);
        self.update_all(Some(window));
    }

    /// ALT-drag while 3D drawing spins the surface without leaving the mode.
    fn rotate_under_drawing(&mut self, window: WindowId, e: MouseEvent) {
        let widx = window.index();
        let set_rc = self.windows[widx].brain_set.clone();
        let model_index = self.windows[widx].model_index;
        let axis_mode = self.rotation_axis_mode;
        {
            let mut set = set_rc.borrow_mut();
            let Some(model) = set.model_mut(model_index) else {
                return;
            };
            if matches!(
                model,
                BrainModel::Surface(_) | BrainModel::SurfaceAndVolume(_)
            ) {
                rotate_surface_view(model.view_mut(widx), axis_mode, &e);
            }
        }
        self.update_all(Some(window));
    }
}
