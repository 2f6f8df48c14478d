//! Click-driven editing modes.
//!
//! One action per click (delete, reverse, rename, add) plus the press/drag/
//! release modes that move an existing point. Every handler picks first and
//! quietly does nothing when the pick comes back empty.

use crate::controller::ViewController;
use crate::events::{MouseEvent, MouseGesture};
use crate::model::Cell;
use crate::mode::MouseMode;
use crate::pick::PickRouter;
use crate::renderer::SubRegionBox;
use crate::selection::{SelectedKind, SelectionMask};
use crate::window::WindowId;

impl ViewController {
    pub(crate) fn border_edit_mouse(&mut self, window: WindowId, e: MouseEvent) {
        match (self.mode, e.gesture) {
            (MouseMode::BorderDelete, MouseGesture::LeftClick) => {
                let mask = SelectionMask::BORDER | SelectionMask::VOLUME_BORDER;
                let Some(item) = self.pick_nearest(window, e.x, e.y, mask) else {
                    return;
                };
                let set_rc = self.windows[window.index()].brain_set.clone();
                match item.kind {
                    SelectedKind::BorderPoint { border, .. } => {
                        set_rc.borrow_mut().border_set.delete_border(border);
                    }
                    SelectedKind::VolumeBorderPoint { border, .. } => {
                        set_rc.borrow_mut().volume_borders.delete_border(border);
                    }
                    _ => return,
                }
                self.update_all(Some(window));
            }
            (MouseMode::BorderDeletePoint, MouseGesture::LeftClick) => {
                let mask = SelectionMask::BORDER | SelectionMask::VOLUME_BORDER;
                let Some(item) = self.pick_nearest(window, e.x, e.y, mask) else {
                    return;
                };
                let set_rc = self.windows[window.index()].brain_set.clone();
                match item.kind {
                    SelectedKind::BorderPoint { border, link, .. } => {
                        set_rc.borrow_mut().border_set.delete_border_point(border, link);
                    }
                    SelectedKind::VolumeBorderPoint { border, link } => {
                        set_rc
                            .borrow_mut()
                            .volume_borders
                            .delete_border_point(border, link);
                    }
                    _ => return,
                }
                self.update_all(Some(window));
            }
            (MouseMode::BorderReverse, MouseGesture::LeftClick) => {
                let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::BORDER) else {
                    return;
                };
                if let SelectedKind::BorderPoint { border, .. } = item.kind {
                    let set_rc = self.windows[window.index()].brain_set.clone();
                    if let Some(b) = set_rc.borrow_mut().border_set.get_mut(border) {
                        b.reverse();
                    }
                    self.update_all(Some(window));
                }
            }
            (MouseMode::BorderRename, MouseGesture::LeftClick) => {
                let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::BORDER) else {
                    return;
                };
                if let SelectedKind::BorderPoint { border, .. } = item.kind {
                    let set_rc = self.windows[window.index()].brain_set.clone();
                    let current = match set_rc.borrow().border_set.get(border) {
                        Some(b) => b.name.clone(),
                        None => return,
                    };
                    let Some(name) = self
                        .collaborators
                        .string_input
                        .request_string("Border Name", &current)
                    else {
                        return;
                    };
                    if let Some(b) = set_rc.borrow_mut().border_set.get_mut(border) {
                        b.name = name;
                    }
                    self.update_all(Some(window));
                }
            }
            (MouseMode::BorderMovePoint, MouseGesture::LeftPress) => {
                let mask = SelectionMask::BORDER | SelectionMask::VOLUME_BORDER;
                let Some(item) = self.pick_nearest(window, e.x, e.y, mask) else {
                    return;
                };
                self.mode_state.border_point_being_moved = match item.kind {
                    SelectedKind::BorderPoint {
                        display,
                        border,
                        link,
                    } => Some((display, border, link)),
                    SelectedKind::VolumeBorderPoint { border, link } => Some((0, border, link)),
                    _ => None,
                };
            }
            (MouseMode::BorderMovePoint, MouseGesture::LeftMove) => {
                let Some((_, border, link)) = self.mode_state.border_point_being_moved else {
                    return;
                };
                let Some(p) =
                    PickRouter::unproject_sample(self.renderer.as_ref(), window, e.x, e.y, false)
                else {
                    return;
                };
                let set_rc = self.windows[window.index()].brain_set.clone();
                {
                    let mut set = set_rc.borrow_mut();
                    if let Some(b) = set.border_set.get_mut(border)
                        && let Some(point) = b.points.get_mut(link)
                    {
                        *point = p;
                    }
                }
                self.update_all(Some(window));
            }
            (MouseMode::BorderMovePoint, MouseGesture::LeftRelease | MouseGesture::LeftClick) => {
                self.mode_state.border_point_being_moved = None;
            }
            _ => {}
        }
    }

    pub(crate) fn border_interpolate_mouse(&mut self, window: WindowId, e: MouseEvent) {
        if e.gesture != MouseGesture::LeftClick {
            return;
        }
        let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::BORDER) else {
            return;
        };
        if let SelectedKind::BorderPoint { border, link, .. } = item.kind {
            self.mode_state.interpolate_picks.push((border, link));
            self.update_all(Some(window));
        }
    }

    pub(crate) fn annotation_edit_mouse(&mut self, window: WindowId, e: MouseEvent) {
        if e.gesture != MouseGesture::LeftClick {
            return;
        }
        match self.mode {
            MouseMode::CutDelete => {
                let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::CUT) else {
                    return;
                };
                if let SelectedKind::Cut { cut, .. } = item.kind {
                    let set_rc = self.windows[window.index()].brain_set.clone();
                    set_rc.borrow_mut().cuts.delete_border(cut);
                    self.update_all(Some(window));
                }
            }
            MouseMode::FociDelete => {
                let mask = SelectionMask::FOCUS_PROJECTION | SelectionMask::VOLUME_FOCI;
                let Some(item) = self.pick_nearest(window, e.x, e.y, mask) else {
                    return;
                };
                let set_rc = self.windows[window.index()].brain_set.clone();
                match item.kind {
                    SelectedKind::FocusProjection { focus } => {
                        set_rc.borrow_mut().foci.delete_focus(focus);
                    }
                    SelectedKind::VolumeFocus { focus } => {
                        set_rc.borrow_mut().volume_foci.delete_focus(focus);
                    }
                    _ => return,
                }
                self.update_all(Some(window));
            }
            MouseMode::CellAdd => {
                let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::NODE) else {
                    return;
                };
                if let SelectedKind::Node { node } = item.kind {
                    let params = self.collaborators.drawing.drawing_parameters();
                    let widx = window.index();
                    let set_rc = self.windows[widx].brain_set.clone();
                    let model_index = self.windows[widx].model_index;
                    {
                        let mut set = set_rc.borrow_mut();
                        let Some(xyz) = set
                            .model(model_index)
                            .and_then(|m| m.as_surface())
                            .and_then(|s| s.coords.get(node).copied())
                        else {
                            return;
                        };
                        set.cells.add_cell(Cell {
                            name: params.name,
                            xyz,
                            node: Some(node),
                            section: 0,
                            study: None,
                        });
                    }
                    self.update_all(Some(window));
                }
            }
            MouseMode::CellDelete => {
                let mask = SelectionMask::CELL_PROJECTION | SelectionMask::VOLUME_CELL;
                let Some(item) = self.pick_nearest(window, e.x, e.y, mask) else {
                    return;
                };
                let set_rc = self.windows[window.index()].brain_set.clone();
                match item.kind {
                    SelectedKind::Cell { cell } => {
                        set_rc.borrow_mut().cells.delete_cell(cell);
                    }
                    SelectedKind::VolumeCell { cell } => {
                        set_rc.borrow_mut().volume_cells.delete_cell(cell);
                    }
                    _ => return,
                }
                self.update_all(Some(window));
            }
            _ => {}
        }
    }

    pub(crate) fn contour_edit_mouse(&mut self, window: WindowId, e: MouseEvent) {
        match (self.mode, e.gesture) {
            (MouseMode::ContourPointDelete, MouseGesture::LeftClick) => {
                if let Some(SelectedKind::ContourPoint { contour, point }) =
                    self.pick_contour(window, e)
                {
                    self.with_contours(window, |file| file.delete_point(contour, point));
                    self.update_all(Some(window));
                }
            }
            (MouseMode::ContourDelete, MouseGesture::LeftClick) => {
                if let Some(SelectedKind::ContourPoint { contour, .. }) =
                    self.pick_contour(window, e)
                {
                    self.with_contours(window, |file| file.delete_contour(contour));
                    self.update_all(Some(window));
                }
            }
            (MouseMode::ContourReverse, MouseGesture::LeftClick) => {
                if let Some(SelectedKind::ContourPoint { contour, .. }) =
                    self.pick_contour(window, e)
                {
                    self.with_contours(window, |file| file.reverse_contour(contour));
                    self.update_all(Some(window));
                }
            }
            (MouseMode::ContourMerge, MouseGesture::LeftClick) => {
                if let Some(SelectedKind::ContourPoint { contour, .. }) =
                    self.pick_contour(window, e)
                {
                    match self.mode_state.merge_first_contour.take() {
                        None => self.mode_state.merge_first_contour = Some(contour),
                        Some(first) => {
                            self.with_contours(window, |file| file.merge_contours(first, contour));
                            self.update_all(Some(window));
                        }
                    }
                }
            }
            (MouseMode::ContourPointMove, MouseGesture::LeftPress) => {
                if let Some(SelectedKind::ContourPoint { contour, point }) =
                    self.pick_contour(window, e)
                {
                    self.mode_state.contour_point_being_moved = Some((contour, point));
                }
            }
            (MouseMode::ContourPointMove, MouseGesture::LeftMove) => {
                let Some((contour, point)) = self.mode_state.contour_point_being_moved else {
                    return;
                };
                let Some(p) =
                    PickRouter::unproject_sample(self.renderer.as_ref(), window, e.x, e.y, false)
                else {
                    return;
                };
                self.with_contours(window, |file| file.move_point(contour, point, p));
                self.update_all(Some(window));
            }
            (
                MouseMode::ContourPointMove,
                MouseGesture::LeftRelease | MouseGesture::LeftClick,
            ) => {
                self.mode_state.contour_point_being_moved = None;
            }
            (MouseMode::ContourCellAdd, MouseGesture::LeftClick) => {
                let Some(p) =
                    PickRouter::unproject_sample(self.renderer.as_ref(), window, e.x, e.y, false)
                else {
                    return;
                };
                let params = self.collaborators.drawing.drawing_parameters();
                let set_rc = self.windows[window.index()].brain_set.clone();
                set_rc.borrow_mut().contour_cells.add_cell(Cell {
                    name: params.name,
                    xyz: p,
                    node: None,
                    section: params.section,
                    study: None,
                });
                self.update_all(Some(window));
            }
            (MouseMode::ContourCellDelete, MouseGesture::LeftClick) => {
                let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::CONTOUR_CELL)
                else {
                    return;
                };
                if let SelectedKind::ContourCell { cell } = item.kind {
                    let set_rc = self.windows[window.index()].brain_set.clone();
                    set_rc.borrow_mut().contour_cells.delete_cell(cell);
                    self.update_all(Some(window));
                }
            }
            (MouseMode::ContourCellMove, MouseGesture::LeftPress) => {
                let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::CONTOUR_CELL)
                else {
                    return;
                };
                if let SelectedKind::ContourCell { cell } = item.kind {
                    self.mode_state.contour_cell_being_moved = Some(cell);
                }
            }
            (MouseMode::ContourCellMove, MouseGesture::LeftMove) => {
                let Some(cell) = self.mode_state.contour_cell_being_moved else {
                    return;
                };
                let Some(p) =
                    PickRouter::unproject_sample(self.renderer.as_ref(), window, e.x, e.y, false)
                else {
                    return;
                };
                let set_rc = self.windows[window.index()].brain_set.clone();
                set_rc.borrow_mut().contour_cells.move_cell(cell, p);
                self.update_all(Some(window));
            }
            (
                MouseMode::ContourCellMove,
                MouseGesture::LeftRelease | MouseGesture::LeftClick,
            ) => {
                self.mode_state.contour_cell_being_moved = None;
            }
            (MouseMode::ContourSetScale, MouseGesture::LeftClick) => {
                let Some(p) =
                    PickRouter::unproject_sample(self.renderer.as_ref(), window, e.x, e.y, false)
                else {
                    return;
                };
                if self.mode_state.scale_points[0].is_none() {
                    self.mode_state.scale_points[0] = Some(p);
                } else {
                    self.mode_state.scale_points[1] = Some(p);
                }
                self.update_all(Some(window));
            }
            (MouseMode::ContourAlign, MouseGesture::LeftMove) => {
                let degrees = -f64::from(e.biggest_delta());
                let section = self.align_section;
                self.with_contours(window, |file| {
                    rotate_section_about_centroid(file, section, degrees);
                });
                self.update_all(Some(window));
            }
            (MouseMode::ContourAlign, MouseGesture::LeftShiftMove) => {
                let (dx, dy) = (f64::from(e.dx), f64::from(e.dy));
                let section = self.align_section;
                self.with_contours(window, |file| {
                    for c in file.contours.iter_mut().filter(|c| c.section == section) {
                        for p in &mut c.points {
                            p[0] += dx;
                            p[1] += dy;
                        }
                    }
                });
                self.update_all(Some(window));
            }
            (MouseMode::ContourAlignRegion, MouseGesture::LeftPress) => {
                let fb_y = self.framebuffer_y(window, e.y);
                self.mode_state.align_region_box = Some(SubRegionBox {
                    min_x: e.x,
                    min_y: fb_y,
                    max_x: e.x,
                    max_y: fb_y,
                });
            }
            (MouseMode::ContourAlignRegion, MouseGesture::LeftMove) => {
                let fb_y = self.framebuffer_y(window, e.y);
                if let Some(b) = &mut self.mode_state.align_region_box {
                    b.max_x = e.x;
                    b.max_y = fb_y;
                }
            }
            _ => {}
        }
    }

    pub(crate) fn surface_edit_mouse(&mut self, window: WindowId, e: MouseEvent) {
        match (self.mode, e.gesture) {
            (MouseMode::EditAddNode, MouseGesture::LeftClick) => {
                let Some(p) =
                    PickRouter::unproject_sample(self.renderer.as_ref(), window, e.x, e.y, false)
                else {
                    return;
                };
                let widx = window.index();
                let set_rc = self.windows[widx].brain_set.clone();
                let model_index = self.windows[widx].model_index;
                {
                    let mut set = set_rc.borrow_mut();
                    if let Some(s) = set.model_mut(model_index).and_then(|m| m.as_surface_mut()) {
                        s.add_node(p);
                    }
                }
                self.update_all(Some(window));
            }
            (MouseMode::EditAddTile, MouseGesture::LeftClick) => {
                let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::NODE) else {
                    return;
                };
                if let SelectedKind::Node { node } = item.kind {
                    let n = self.mode_state.tile_node_count;
                    self.mode_state.tile_nodes[n] = node;
                    self.mode_state.tile_node_count = n + 1;
                    if self.mode_state.tile_node_count == 3 {
                        let nodes = self.mode_state.tile_nodes;
                        self.mode_state.tile_node_count = 0;
                        let widx = window.index();
                        let set_rc = self.windows[widx].brain_set.clone();
                        let model_index = self.windows[widx].model_index;
                        {
                            let mut set = set_rc.borrow_mut();
                            if let Some(s) =
                                set.model_mut(model_index).and_then(|m| m.as_surface_mut())
                            {
                                s.add_tile(nodes);
                            }
                        }
                        self.update_all(Some(window));
                    }
                }
            }
            (MouseMode::EditDeleteTileByLink, MouseGesture::LeftClick) => {
                let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::LINK) else {
                    return;
                };
                if let SelectedKind::Link { node_a, node_b } = item.kind {
                    let widx = window.index();
                    let set_rc = self.windows[widx].brain_set.clone();
                    let model_index = self.windows[widx].model_index;
                    {
                        let mut set = set_rc.borrow_mut();
                        if let Some(s) =
                            set.model_mut(model_index).and_then(|m| m.as_surface_mut())
                        {
                            s.delete_tiles_with_link(node_a, node_b);
                        }
                    }
                    self.update_all(Some(window));
                }
            }
            (MouseMode::EditDisconnectNode, MouseGesture::LeftClick) => {
                let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::NODE) else {
                    return;
                };
                if let SelectedKind::Node { node } = item.kind {
                    let widx = window.index();
                    let set_rc = self.windows[widx].brain_set.clone();
                    let model_index = self.windows[widx].model_index;
                    {
                        let mut set = set_rc.borrow_mut();
                        if let Some(s) =
                            set.model_mut(model_index).and_then(|m| m.as_surface_mut())
                        {
                            s.disconnect_node(node);
                        }
                    }
                    self.update_all(Some(window));
                }
            }
            (MouseMode::EditMoveNode, MouseGesture::LeftPress) => {
                let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::NODE) else {
                    return;
                };
                if let SelectedKind::Node { node } = item.kind {
                    self.mode_state.node_being_moved = Some(node);
                }
            }
            (MouseMode::EditMoveNode, MouseGesture::LeftMove) => {
                let Some(node) = self.mode_state.node_being_moved else {
                    return;
                };
                let Some(p) =
                    PickRouter::unproject_sample(self.renderer.as_ref(), window, e.x, e.y, true)
                else {
                    return;
                };
                let widx = window.index();
                let set_rc = self.windows[widx].brain_set.clone();
                let model_index = self.windows[widx].model_index;
                {
                    let mut set = set_rc.borrow_mut();
                    if let Some(s) = set.model_mut(model_index).and_then(|m| m.as_surface_mut()) {
                        s.move_node(node, p);
                    }
                }
                self.update_all(Some(window));
            }
            (MouseMode::EditMoveNode, MouseGesture::LeftRelease | MouseGesture::LeftClick) => {
                self.mode_state.node_being_moved = None;
            }
            _ => {}
        }
    }

    fn pick_contour(&mut self, window: WindowId, e: MouseEvent) -> Option<SelectedKind> {
        self.pick_nearest(window, e.x, e.y, SelectionMask::CONTOUR)
            .map(|item| item.kind)
    }

    /// Run `f` on the contour file of the displayed contour model, if any.
    fn with_contours(
        &mut self,
        window: WindowId,
        f: impl FnOnce(&mut crate::model::ContourFile),
    ) {
        let widx = window.index();
        let set_rc = self.windows[widx].brain_set.clone();
        let model_index = self.windows[widx].model_index;
        let mut set = set_rc.borrow_mut();
        if let Some(m) = set.model_mut(model_index).and_then(|m| m.as_contours_mut()) {
            f(&mut m.contours);
        }
    }
}

/// Rotate every point of the section's contours about the section centroid.
fn rotate_section_about_centroid(
    file: &mut crate::model::ContourFile,
    section: i32,
    degrees: f64,
) {
    let mut centroid = [0.0_f64; 2];
    let mut count = 0usize;
    for c in file.contours.iter().filter(|c| c.section == section) {
        for p in &c.points {
            centroid[0] += p[0];
            centroid[1] += p[1];
            count += 1;
        }
    }
    if count == 0 {
        return;
    }
    centroid[0] /= count as f64;
    centroid[1] /= count as f64;
    let (sin, cos) = degrees.to_radians().sin_cos();
    for c in file.contours.iter_mut().filter(|c| c.section == section) {
        for p in &mut c.points {
            let x = p[0] - centroid[0];
            let y = p[1] - centroid[1];
            p[0] = centroid[0] + x * cos - y * sin;
            p[1] = centroid[1] + x * sin + y * cos;
        }
    }
}
