//! The top-level viewer controller.
//!
//! Owns the viewing windows, the renderer and the collaborator bundle;
//! classifies raw mouse and keyboard input into gestures and hands them to
//! the mode machine. This is the only type an embedding application needs
//! to talk to.

use crate::collab::Collaborators;
use crate::config::ViewerConfig;
use crate::events::{classify_move, classify_press, DragTracker, Key, KeyEvent, Modifiers,
    MouseButton, MouseEvent, MouseGesture};
use crate::ident::{IdFilter, IdentificationAssembler};
use crate::model::BrainModel;
use crate::mode::{ModeMachineState, MouseMode};
use crate::pick::PickRouter;
use crate::renderer::{PixelBuffer, Renderer};
use crate::selection::{SelectedItem, SelectedKind, SelectionMask, SelectionSet};
use crate::view_state::{RotationAxisMode, StandardView};
use crate::window::{NUM_VIEWING_WINDOWS, SharedBrainSet, Window, WindowId};

/// The viewer core facade.
pub struct ViewController {
    pub(crate) windows: Vec<Window>,
    pub(crate) renderer: Box<dyn Renderer>,
    pub(crate) collaborators: Collaborators,
    pub(crate) config: ViewerConfig,
    pub(crate) assembler: IdentificationAssembler,
    pub(crate) mode: MouseMode,
    pub(crate) mode_state: ModeMachineState,
    pub(crate) rotation_axis_mode: RotationAxisMode,
    pub(crate) drag: DragTracker,
    /// Toolbar preference: plain drags rotate orthogonally sliced volumes
    /// in-plane.
    pub(crate) volume_rotation_enabled: bool,
    /// Section manipulated by the contour alignment modes.
    pub(crate) align_section: i32,
}

impl ViewController {
    /// A controller with every window showing `brain_set`.
    pub fn new(
        brain_set: SharedBrainSet,
        renderer: Box<dyn Renderer>,
        collaborators: Collaborators,
        config: ViewerConfig,
    ) -> Self {
        let windows = (0..NUM_VIEWING_WINDOWS)
            .map(|_| Window::new(brain_set.clone()))
            .collect();
        let assembler = IdentificationAssembler {
            significant_digits: config.significant_digits,
            ..IdentificationAssembler::default()
        };
        Self {
            windows,
            renderer,
            collaborators,
            config,
            assembler,
            mode: MouseMode::View,
            mode_state: ModeMachineState::default(),
            rotation_axis_mode: RotationAxisMode::default(),
            drag: DragTracker::default(),
            volume_rotation_enabled: false,
            align_section: 0,
        }
    }

    // --- window access -----------------------------------------------------

    /// The window `id`.
    pub fn window(&self, id: WindowId) -> &Window {
        &self.windows[id.index()]
    }

    /// The window `id`, mutably.
    pub fn window_mut(&mut self, id: WindowId) -> &mut Window {
        &mut self.windows[id.index()]
    }

    /// Transient mode-machine state (splice phase, tile builder, boxes).
    pub fn mode_state(&self) -> &ModeMachineState {
        &self.mode_state
    }

    /// Mutable configuration.
    pub fn config_mut(&mut self) -> &mut ViewerConfig {
        &mut self.config
    }

    /// Identification filter flags.
    pub fn identification_filter_mut(&mut self) -> &mut IdFilter {
        &mut self.assembler.filter
    }

    /// Flip every identification section flag on or off.
    pub fn toggle_all_identification(&mut self) {
        self.assembler.filter.toggle_all();
    }

    // --- mode and view configuration ---------------------------------------

    /// The active mouse mode.
    pub fn mouse_mode(&self) -> MouseMode {
        self.mode
    }

    /// Switch the mouse mode (Main window only; auxiliary windows always
    /// behave as if in view mode).
    pub fn set_mouse_mode(&mut self, mode: MouseMode) {
        self.apply_mode_switch(mode);
    }

    /// The rotation-axis constraint for view-mode drags.
    pub fn rotation_axis_mode(&self) -> RotationAxisMode {
        self.rotation_axis_mode
    }

    /// Set the rotation-axis constraint.
    pub fn set_rotation_axis_mode(&mut self, mode: RotationAxisMode) {
        self.rotation_axis_mode = mode;
    }

    /// Enable in-plane rotation of orthogonally sliced volumes by drag.
    pub fn set_volume_rotation_enabled(&mut self, enabled: bool) {
        self.volume_rotation_enabled = enabled;
    }

    /// Select the section manipulated by the contour alignment modes.
    pub fn set_align_section(&mut self, section: i32) {
        self.align_section = section;
    }

    /// Whether `window` is yoked to Main.
    pub fn yoke(&self, window: WindowId) -> bool {
        self.windows[window.index()].yoked
    }

    /// Yoke or un-yoke `window`.
    pub fn set_yoke(&mut self, window: WindowId, yoked: bool) {
        self.windows[window.index()].yoked = yoked;
        self.update_all(Some(window));
    }

    /// The displayed model index of `window`.
    pub fn displayed_model_index(&self, window: WindowId) -> usize {
        self.windows[window.index()].model_index
    }

    /// Display model `index` in `window`.
    pub fn set_displayed_model_index(&mut self, window: WindowId, index: usize) {
        self.windows[window.index()].model_index = index;
        self.update_all(Some(window));
    }

    /// Display model `index` in every window.
    pub fn set_all_displayed_model_indices(&mut self, index: usize) {
        for w in &mut self.windows {
            w.model_index = index;
        }
        self.update_all(None);
    }

    // --- image capture ------------------------------------------------------

    /// Grab the full framebuffer of `window`.
    pub fn capture_image(&mut self, window: WindowId) -> PixelBuffer {
        self.renderer.capture(window)
    }

    /// Grab the framebuffer of `window` cropped to the current sub-region
    /// box; `None` when no valid box exists.
    pub fn capture_image_subregion(&mut self, window: WindowId) -> Option<PixelBuffer> {
        let b = self.mode_state.subregion_box?;
        if !b.is_valid() {
            return None;
        }
        let n = b.normalized();
        let frame = self.renderer.capture(window);
        Some(frame.crop(
            n.min_x.max(0) as u32,
            n.min_y.max(0) as u32,
            (n.max_x - n.min_x) as u32,
            (n.max_y - n.min_y) as u32,
        ))
    }

    // --- event entry points -------------------------------------------------

    /// A mouse button went down in `window` at window coordinates `(x, y)`.
    pub fn on_mouse_press(
        &mut self,
        window: WindowId,
        x: i32,
        y: i32,
        button: MouseButton,
        modifiers: Modifiers,
    ) {
        match button {
            MouseButton::Right => self.right_press(window, x, y),
            MouseButton::Left => {
                self.drag.press(x, y);
                if let Some(gesture) = classify_press(modifiers) {
                    self.dispatch_mouse(
                        window,
                        MouseEvent {
                            gesture,
                            x,
                            y,
                            dx: 0,
                            dy: 0,
                        },
                    );
                }
            }
        }
    }

    /// The mouse moved with the left button held.
    pub fn on_mouse_move(&mut self, window: WindowId, x: i32, y: i32, modifiers: Modifiers) {
        if !self.drag.is_active() {
            return;
        }
        let (mut dx, mut dy) = self.drag.movement(x, y);
        let Some(gesture) = classify_move(modifiers) else {
            return;
        };
        // The pointer-speed preference scales view-mode drags only.
        if self.mode == MouseMode::View || !window.is_main() {
            dx = (f64::from(dx) * self.config.pointer_speed).round() as i32;
            dy = (f64::from(dy) * self.config.pointer_speed).round() as i32;
        }
        self.dispatch_mouse(window, MouseEvent { gesture, x, y, dx, dy });
    }

    /// The left button came up. Within the move tolerance this is a click,
    /// otherwise the end of a drag.
    pub fn on_mouse_release(&mut self, window: WindowId, x: i32, y: i32, _modifiers: Modifiers) {
        if !self.drag.is_active() {
            return;
        }
        let is_click = self.drag.release(x, y, self.config.mouse_move_tolerance);
        let gesture = if is_click {
            MouseGesture::LeftClick
        } else {
            MouseGesture::LeftRelease
        };
        self.dispatch_mouse(
            window,
            MouseEvent {
                gesture,
                x,
                y,
                dx: 0,
                dy: 0,
            },
        );
    }

    /// A key went down in `window`.
    pub fn on_key_press(&mut self, window: WindowId, key: KeyEvent) {
        if window.is_main() && self.mode.is_axes() {
            self.axes_key(window, key);
        } else {
            self.view_key(window, key);
        }
    }

    /// A key came up; the next axes keypress commits an edit boundary.
    pub fn on_key_release(&mut self, _window: WindowId, _key: KeyEvent) {
        self.mode_state.key_up_last_time = true;
    }

    /// Remote-driven identification: highlight `node` and append its report.
    pub fn identify(&mut self, window: WindowId, node: usize) {
        self.assembler.significant_digits = self.config.significant_digits;
        let widx = window.index();
        let set_rc = self.windows[widx].brain_set.clone();
        let model_index = self.windows[widx].model_index;
        {
            let set = set_rc.borrow();
            let item = SelectedItem::new(SelectedKind::Node { node }, 0.0);
            let text = self.assembler.assemble(&set, model_index, &item);
            if !text.is_empty() {
                self.collaborators.identification.append_identification(&text);
            }
        }
        self.collaborators.remote_highlight.send_node_highlight(node);
        self.update_all(Some(window));
    }

    // --- internals ----------------------------------------------------------

    /// The window whose view state a view-mode mutation lands on: Main when
    /// the origin is yoked, the origin itself otherwise.
    pub(crate) fn view_target(&self, origin: WindowId) -> WindowId {
        if !origin.is_main() && self.windows[origin.index()].yoked {
            WindowId::MAIN
        } else {
            origin
        }
    }

    /// Window y coordinate converted to framebuffer (y up) convention.
    pub(crate) fn framebuffer_y(&self, window: WindowId, y: i32) -> i32 {
        self.windows[window.index()].viewport.1 as i32 - y
    }

    /// Pick and keep only the closest item among `mask`.
    pub(crate) fn pick_nearest(
        &mut self,
        window: WindowId,
        x: i32,
        y: i32,
        mask: SelectionMask,
    ) -> Option<SelectedItem> {
        PickRouter::pick(self.renderer.as_mut(), window, x, y, mask)
            .nearest_matching(mask)
            .copied()
    }

    /// Identify everything in a completed pick: append report text for each
    /// hit and highlight the nearest node remotely.
    pub(crate) fn identify_picked(&mut self, window: WindowId, picked: &SelectionSet) {
        if picked.is_empty() {
            return;
        }
        self.assembler.significant_digits = self.config.significant_digits;
        let widx = window.index();
        let set_rc = self.windows[widx].brain_set.clone();
        let model_index = self.windows[widx].model_index;
        {
            let set = set_rc.borrow();
            for item in picked.items() {
                let text = self.assembler.assemble(&set, model_index, item);
                if !text.is_empty() {
                    self.collaborators.identification.append_identification(&text);
                }
            }
        }
        if let Some(item) = picked.nearest_matching(SelectionMask::NODE)
            && let SelectedKind::Node { node } = item.kind
        {
            self.collaborators.remote_highlight.send_node_highlight(node);
        }
    }

    /// Right-press in view mode on a surface: an ALL-category pick feeding
    /// the context menu, run with the mode temporarily cleared.
    fn right_press(&mut self, window: WindowId, x: i32, y: i32) {
        if self.mode != MouseMode::View {
            return;
        }
        let widx = window.index();
        let is_surface = {
            let set = self.windows[widx].brain_set.borrow();
            set.model(self.windows[widx].model_index)
                .is_some_and(|m| m.as_surface().is_some())
        };
        if !is_surface {
            return;
        }
        let saved = self.mode;
        self.mode = MouseMode::None;
        let picked = PickRouter::pick(self.renderer.as_mut(), window, x, y, SelectionMask::ALL);
        self.mode = saved;
        if !picked.is_empty() {
            self.collaborators.popup_menu.show_selection_menu(picked.items());
        }
    }

    /// Keyboard handling outside the axes modes.
    fn view_key(&mut self, window: WindowId, key: KeyEvent) {
        // CTRL+F1..F15 selects the displayed model.
        if key.modifiers.control
            && let Key::Function(n) = key.key
        {
            if (1..=15).contains(&n) {
                self.set_displayed_model_index(window, usize::from(n - 1));
            }
            return;
        }

        // Standard anatomical views from the letter keys.
        if key.modifiers.is_none()
            && let Some(view) = standard_view_for(key.key)
        {
            let target = self.view_target(window);
            let widx = target.index();
            let set_rc = self.windows[widx].brain_set.clone();
            let model_index = self.windows[widx].model_index;
            {
                let mut set = set_rc.borrow_mut();
                let Some(model) = set.model_mut(model_index) else {
                    return;
                };
                if matches!(
                    model,
                    BrainModel::Surface(_) | BrainModel::SurfaceAndVolume(_)
                ) {
                    model.set_to_standard_view(widx, view);
                }
            }
            self.update_all(Some(window));
            return;
        }

        let magnitude = if key.modifiers.alt { 1.0 } else { 5.0 };
        let target = self.view_target(window);
        let widx = target.index();
        let set_rc = self.windows[widx].brain_set.clone();
        let model_index = self.windows[widx].model_index;
        {
            let mut set = set_rc.borrow_mut();
            let Some(model) = set.model_mut(model_index) else {
                return;
            };

            if key.key == Key::Home {
                model.set_to_standard_view(widx, StandardView::Reset);
            } else if let BrainModel::Volume(v) = model
                && matches!(key.key, Key::PageUp | Key::PageDown)
            {
                // Paging advances the selected slice, clamped to the volume.
                let view = &mut v.views[widx];
                let Some(i) = view.selected_axis.orthogonal_index() else {
                    return;
                };
                let delta = if key.key == Key::PageUp { 1 } else { -1 };
                view.selected_slices[i] =
                    (view.selected_slices[i] + delta).clamp(0, v.dims[i] - 1);
            } else if key.modifiers.shift {
                let view = model.view_mut(widx);
                match key.key {
                    Key::Left => view.translate_by(-magnitude, 0.0, 0.0),
                    Key::Right => view.translate_by(magnitude, 0.0, 0.0),
                    Key::Up => view.translate_by(0.0, magnitude, 0.0),
                    Key::Down => view.translate_by(0.0, -magnitude, 0.0),
                    _ => return,
                }
            } else if key.modifiers.control {
                let view = model.view_mut(widx);
                match key.key {
                    Key::Up => view.zoom_by(magnitude),
                    Key::Down => view.zoom_by(-magnitude),
                    _ => return,
                }
            } else {
                let view = model.view_mut(widx);
                match key.key {
                    Key::Left => view.rotate_y(magnitude),
                    Key::Right => view.rotate_y(-magnitude),
                    Key::Up => view.rotate_x(-magnitude),
                    Key::Down => view.rotate_x(magnitude),
                    Key::PageUp => view.rotate_z(magnitude),
                    Key::PageDown => view.rotate_z(-magnitude),
                    _ => return,
                }
            }
        }
        self.update_all(Some(window));
    }
}

fn standard_view_for(key: Key) -> Option<StandardView> {
    match key {
        Key::A => Some(StandardView::Anterior),
        Key::D => Some(StandardView::Dorsal),
        Key::L => Some(StandardView::Lateral),
        Key::M => Some(StandardView::Medial),
        Key::P => Some(StandardView::Posterior),
        Key::R => Some(StandardView::Reset),
        Key::V => Some(StandardView::Ventral),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use glam::DMat4;

    use super::*;
    use crate::collab::{DrawingParameterProvider, DrawingParameters, IdentificationSink,
        WarningOperator};
    use crate::error::Result;
    use crate::model::{Border, BrainSet, SurfaceModel, SurfaceType, VolumeModel};
    use crate::renderer::SubRegionBox;
    use crate::transform::TransformMatrix;

    type PickQueue = Rc<RefCell<VecDeque<Vec<SelectedItem>>>>;

    /// Scripted renderer: picks come from a queue, unprojection echoes the
    /// window coordinates.
    struct TestRenderer {
        picks: PickQueue,
    }

    impl Renderer for TestRenderer {
        fn render(&mut self, _set: &BrainSet, _model: usize, _w: WindowId, _vp: (u32, u32)) {}

        fn pick(&mut self, _w: WindowId, _x: i32, _y: i32, mask: SelectionMask) -> Vec<SelectedItem> {
            self.picks
                .borrow_mut()
                .pop_front()
                .unwrap_or_default()
                .into_iter()
                .filter(|i| mask.contains(i.kind.mask()))
                .collect()
        }

        fn unproject(&self, _w: WindowId, x: i32, y: i32, _depth: bool) -> Result<[f64; 3]> {
            Ok([f64::from(x), f64::from(y), 0.0])
        }

        fn surface_point_under_cursor(&self, _w: WindowId, _x: i32, _y: i32) -> Option<[f64; 3]> {
            None
        }

        fn set_voxel_editing(&mut self, _enabled: bool) {}

        fn set_subregion_overlay(&mut self, _rect: Option<SubRegionBox>) {}

        fn capture(&mut self, _w: WindowId) -> PixelBuffer {
            PixelBuffer {
                width: 8,
                height: 8,
                rgba: vec![0; 8 * 8 * 4],
            }
        }

        fn clear_display_cache(&mut self, _model: usize) {}
    }

    struct FixedParams(DrawingParameters);

    impl DrawingParameterProvider for FixedParams {
        fn drawing_parameters(&self) -> DrawingParameters {
            self.0.clone()
        }
    }

    struct WarningLog(Rc<RefCell<Vec<String>>>);

    impl WarningOperator for WarningLog {
        fn warn(&mut self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    struct IdLog(Rc<RefCell<Vec<String>>>);

    impl IdentificationSink for IdLog {
        fn append_identification(&mut self, text: &str) {
            self.0.borrow_mut().push(text.to_string());
        }
    }

    fn surface_set() -> SharedBrainSet {
        let mut set = BrainSet::default();
        let mut surface = SurfaceModel::new(SurfaceType::Fiducial);
        surface.add_node([0.0, 0.0, 0.0]);
        set.add_model(crate::model::BrainModel::Surface(surface));
        Rc::new(RefCell::new(set))
    }

    fn controller_with(set: SharedBrainSet, collaborators: Collaborators) -> (ViewController, PickQueue) {
        let picks: PickQueue = Rc::new(RefCell::new(VecDeque::new()));
        let renderer = TestRenderer {
            picks: picks.clone(),
        };
        let c = ViewController::new(set, Box::new(renderer), collaborators, ViewerConfig::default());
        (c, picks)
    }

    #[test]
    fn yoked_shift_drag_translates_main_and_aux() {
        let set = surface_set();
        let (mut c, _picks) = controller_with(set.clone(), Collaborators::default());
        let aux = WindowId(1);
        c.window_mut(aux).yoked = true;

        c.on_mouse_press(aux, 100, 100, MouseButton::Left, Modifiers::SHIFT);
        c.on_mouse_move(aux, 110, 95, Modifiers::SHIFT);
        c.on_mouse_release(aux, 110, 95, Modifiers::SHIFT);

        let set = set.borrow();
        let main_view = set.models[0].view(0);
        assert_eq!(main_view.translation, [10.0, 5.0, 0.0]);
        // The render fan-out copied Main's state onto the yoked window.
        let aux_view = set.models[0].view(1);
        assert_eq!(aux_view.translation, [10.0, 5.0, 0.0]);
    }

    #[test]
    fn axes_key_rotates_in_screen_frame() {
        let set = surface_set();
        {
            let mut s = set.borrow_mut();
            s.models[0].view_mut(0).rotate_y(90.0);
            let idx = s.transform_file.add(TransformMatrix::named("axes"));
            s.transform_file.set_selected_index(Some(idx));
        }
        let (mut c, _picks) = controller_with(set.clone(), Collaborators::default());
        c.set_mouse_mode(MouseMode::TransformationMatrixAxes);

        c.on_key_press(
            WindowId::MAIN,
            KeyEvent {
                key: Key::Up,
                modifiers: Modifiers::ALT,
            },
        );

        // Under a 90-degree Y view the screen-X nudge lands on world Z.
        let set = set.borrow();
        let [x, y, z] = set.transform_file.get(0).unwrap().rotation_angles();
        assert!(x.abs() < 1e-6, "x = {x}");
        assert!(y.abs() < 1e-6, "y = {y}");
        assert!((z - 1.0).abs() < 1e-6, "z = {z}");
    }

    #[test]
    fn closed_border_draw_finalizes_resampled_loop() {
        let set = surface_set();
        let collaborators = Collaborators {
            drawing: Box::new(FixedParams(DrawingParameters {
                density: 5.0,
                closed: true,
                ..DrawingParameters::default()
            })),
            ..Collaborators::default()
        };
        let (mut c, _picks) = controller_with(set.clone(), collaborators);
        c.set_mouse_mode(MouseMode::BorderDrawNew);

        c.on_mouse_press(WindowId::MAIN, 0, 0, MouseButton::Left, Modifiers::NONE);
        for (x, y) in [(0, 0), (10, 0), (10, 10), (0, 10)] {
            c.on_mouse_move(WindowId::MAIN, x, y, Modifiers::NONE);
        }
        c.on_mouse_press(WindowId::MAIN, 0, 10, MouseButton::Left, Modifiers::SHIFT);

        let set = set.borrow();
        assert_eq!(set.border_set.len(), 1);
        let border = set.border_set.get(0).unwrap();
        assert_eq!(border.name, crate::model::UNNAMED_BORDER);
        assert!(border.points.len() >= 5, "points = {}", border.points.len());
        assert_eq!(border.points.first(), border.points.last());
        assert!(c.window(WindowId::MAIN).linear_buffer.is_empty());
    }

    #[test]
    fn splice_walks_border_and_rejects_misaligned_endpoints() {
        let set = surface_set();
        {
            let mut s = set.borrow_mut();
            let points: Vec<[f64; 3]> = (0..10).map(|i| [f64::from(i), 0.0, 0.0]).collect();
            s.border_set.add_border(Border::new("b0", points, 0));
            s.border_set
                .add_border(Border::new("b1", vec![[0.0; 3], [1.0, 0.0, 0.0]], 0));
        }
        let warnings = Rc::new(RefCell::new(Vec::new()));
        let collaborators = Collaborators {
            warnings: Box::new(WarningLog(warnings.clone())),
            ..Collaborators::default()
        };
        let (mut c, picks) = controller_with(set.clone(), collaborators);
        c.set_mouse_mode(MouseMode::BorderDrawNew);

        let border_pick = |border: usize, link: usize| {
            vec![SelectedItem::new(
                SelectedKind::BorderPoint {
                    display: 0,
                    border,
                    link,
                },
                0.1,
            )]
        };
        picks.borrow_mut().push_back(border_pick(0, 2));
        picks.borrow_mut().push_back(border_pick(0, 7));

        let control_click = |c: &mut ViewController| {
            c.on_mouse_press(WindowId::MAIN, 50, 50, MouseButton::Left, Modifiers::CONTROL);
            c.on_mouse_release(WindowId::MAIN, 50, 50, Modifiers::CONTROL);
        };
        control_click(&mut c);
        assert_eq!(c.mode_state().augment_phase, 1);
        control_click(&mut c);

        let xs: Vec<f64> = c
            .window(WindowId::MAIN)
            .linear_buffer
            .points()
            .iter()
            .map(|p| p[0])
            .collect();
        assert_eq!(xs, vec![2.0, 1.0, 0.0, 9.0, 8.0, 7.0]);

        // Endpoints on different borders warn and leave the buffer alone.
        picks.borrow_mut().push_back(border_pick(1, 0));
        picks.borrow_mut().push_back(border_pick(0, 3));
        control_click(&mut c);
        control_click(&mut c);

        assert_eq!(warnings.borrow().len(), 1);
        assert!(warnings.borrow()[0].contains("different borders"));
        assert_eq!(c.mode_state().augment_phase, 0);
        assert_eq!(c.window(WindowId::MAIN).linear_buffer.len(), 6);
    }

    #[test]
    fn click_identifies_and_drag_does_not() {
        let set = surface_set();
        let ids = Rc::new(RefCell::new(Vec::new()));
        let collaborators = Collaborators {
            identification: Box::new(IdLog(ids.clone())),
            ..Collaborators::default()
        };
        let (mut c, picks) = controller_with(set, collaborators);

        picks
            .borrow_mut()
            .push_back(vec![SelectedItem::new(SelectedKind::Node { node: 0 }, 0.5)]);
        c.on_mouse_press(WindowId::MAIN, 100, 100, MouseButton::Left, Modifiers::NONE);
        c.on_mouse_move(WindowId::MAIN, 101, 100, Modifiers::NONE);
        c.on_mouse_release(WindowId::MAIN, 101, 100, Modifiers::NONE);
        assert_eq!(ids.borrow().len(), 1);
        assert!(ids.borrow()[0].contains("Node 0"));

        c.on_mouse_press(WindowId::MAIN, 100, 100, MouseButton::Left, Modifiers::NONE);
        c.on_mouse_move(WindowId::MAIN, 120, 100, Modifiers::NONE);
        c.on_mouse_release(WindowId::MAIN, 120, 100, Modifiers::NONE);
        assert_eq!(ids.borrow().len(), 1);
    }

    #[test]
    fn page_keys_advance_volume_slice_with_clamp() {
        let set = Rc::new(RefCell::new(BrainSet::default()));
        {
            let mut s = set.borrow_mut();
            let mut volume = VolumeModel::new([100, 100, 100]);
            for view in &mut volume.views {
                view.selected_slices = [50, 50, 50];
            }
            s.add_model(crate::model::BrainModel::Volume(volume));
        }
        let (mut c, _picks) = controller_with(set.clone(), Collaborators::default());

        let page_up = KeyEvent {
            key: Key::PageUp,
            modifiers: Modifiers::NONE,
        };
        for _ in 0..5 {
            c.on_key_press(WindowId::MAIN, page_up);
        }
        assert_eq!(set.borrow().models[0].view(0).selected_slices, [50, 50, 55]);

        for _ in 0..50 {
            c.on_key_press(WindowId::MAIN, page_up);
        }
        assert_eq!(set.borrow().models[0].view(0).selected_slices, [50, 50, 99]);
    }

    #[test]
    fn tile_builder_emits_triangle_on_third_pick() {
        let set = surface_set();
        {
            let mut s = set.borrow_mut();
            let surface = s.models[0].as_surface_mut().unwrap();
            surface.add_node([1.0, 0.0, 0.0]);
            surface.add_node([0.0, 1.0, 0.0]);
        }
        let (mut c, picks) = controller_with(set.clone(), Collaborators::default());
        c.set_mouse_mode(MouseMode::EditAddTile);

        for node in [0usize, 1, 2] {
            picks
                .borrow_mut()
                .push_back(vec![SelectedItem::new(SelectedKind::Node { node }, 0.1)]);
            c.on_mouse_press(WindowId::MAIN, 10, 10, MouseButton::Left, Modifiers::NONE);
            c.on_mouse_release(WindowId::MAIN, 10, 10, Modifiers::NONE);
        }

        let tiles = set.borrow().models[0].as_surface().unwrap().tiles.clone();
        assert_eq!(tiles, vec![[0, 1, 2]]);
        assert_eq!(c.mode_state().tile_node_count, 0);
    }

    #[test]
    fn aux_windows_stay_in_view_mode() {
        let set = surface_set();
        let (mut c, _picks) = controller_with(set.clone(), Collaborators::default());
        c.set_mouse_mode(MouseMode::BorderDrawNew);
        let aux = WindowId(2);

        // A drag in an auxiliary window rotates instead of drawing.
        c.on_mouse_press(aux, 0, 0, MouseButton::Left, Modifiers::NONE);
        c.on_mouse_move(aux, 10, 0, Modifiers::NONE);
        c.on_mouse_release(aux, 10, 0, Modifiers::NONE);

        assert!(c.window(aux).linear_buffer.is_empty());
        let set = set.borrow();
        assert_ne!(set.models[0].view(2).rotation, DMat4::IDENTITY);
    }

    #[test]
    fn mode_switch_clears_drawing_state() {
        let set = surface_set();
        let (mut c, _picks) = controller_with(set, Collaborators::default());
        c.set_mouse_mode(MouseMode::BorderDrawNew);

        c.on_mouse_press(WindowId::MAIN, 0, 0, MouseButton::Left, Modifiers::NONE);
        c.on_mouse_move(WindowId::MAIN, 5, 5, Modifiers::NONE);
        c.on_mouse_move(WindowId::MAIN, 10, 10, Modifiers::NONE);
        assert!(!c.window(WindowId::MAIN).linear_buffer.is_empty());

        c.set_mouse_mode(MouseMode::View);
        assert!(c.window(WindowId::MAIN).linear_buffer.is_empty());
        assert_eq!(c.mode_state().augment_phase, 0);
    }

    #[test]
    fn clicking_axes_glyph_in_view_mode_enters_axes_mode() {
        let set = surface_set();
        {
            let mut s = set.borrow_mut();
            s.transform_file.add(TransformMatrix::named("glyph"));
        }
        let (mut c, picks) = controller_with(set.clone(), Collaborators::default());

        picks.borrow_mut().push_back(vec![SelectedItem::new(
            SelectedKind::TransformationAxes { matrix: 0 },
            0.2,
        )]);
        c.on_mouse_press(WindowId::MAIN, 30, 30, MouseButton::Left, Modifiers::NONE);
        c.on_mouse_release(WindowId::MAIN, 30, 30, Modifiers::NONE);

        assert_eq!(c.mouse_mode(), MouseMode::TransformationMatrixAxes);
        assert_eq!(set.borrow().transform_file.selected_index(), Some(0));
    }

    #[test]
    fn configured_significant_digits_shape_report_floats() {
        let set = surface_set();
        set.borrow_mut().models[0]
            .as_surface_mut()
            .unwrap()
            .move_node(0, [1234.5678, 0.0, 0.0]);
        let ids = Rc::new(RefCell::new(Vec::new()));
        let collaborators = Collaborators {
            identification: Box::new(IdLog(ids.clone())),
            ..Collaborators::default()
        };
        let (mut c, picks) = controller_with(set, collaborators);
        c.config_mut().significant_digits = 3;

        picks
            .borrow_mut()
            .push_back(vec![SelectedItem::new(SelectedKind::Node { node: 0 }, 0.5)]);
        c.on_mouse_press(WindowId::MAIN, 10, 10, MouseButton::Left, Modifiers::NONE);
        c.on_mouse_release(WindowId::MAIN, 10, 10, Modifiers::NONE);

        let text = ids.borrow()[0].clone();
        assert!(text.contains("1.23e3"), "text = {text}");
        assert!(!text.contains("1234.57"), "text = {text}");
    }

    #[test]
    fn finalizing_border_without_model_warns() {
        let set = surface_set();
        let warnings = Rc::new(RefCell::new(Vec::new()));
        let collaborators = Collaborators {
            warnings: Box::new(WarningLog(warnings.clone())),
            ..Collaborators::default()
        };
        let (mut c, _picks) = controller_with(set.clone(), collaborators);
        c.set_mouse_mode(MouseMode::BorderDrawNew);
        c.window_mut(WindowId::MAIN).model_index = 5;

        c.on_mouse_press(WindowId::MAIN, 0, 0, MouseButton::Left, Modifiers::NONE);
        c.on_mouse_move(WindowId::MAIN, 0, 0, Modifiers::NONE);
        c.on_mouse_move(WindowId::MAIN, 10, 0, Modifiers::NONE);
        c.on_mouse_press(WindowId::MAIN, 10, 0, MouseButton::Left, Modifiers::SHIFT);

        assert_eq!(warnings.borrow().len(), 1);
        assert!(warnings.borrow()[0].contains("no suitable model"));
        assert!(set.borrow().border_set.len() == 0);
    }

    #[test]
    fn axes_keys_follow_screen_frame_bindings() {
        let set = surface_set();
        {
            let mut s = set.borrow_mut();
            let idx = s.transform_file.add(TransformMatrix::named("axes"));
            s.transform_file.set_selected_index(Some(idx));
        }
        let (mut c, _picks) = controller_with(set.clone(), Collaborators::default());
        c.set_mouse_mode(MouseMode::TransformationMatrixAxes);

        // Control+Up pushes the glyph away along z.
        c.on_key_press(
            WindowId::MAIN,
            KeyEvent {
                key: Key::Up,
                modifiers: Modifiers::CONTROL,
            },
        );
        assert_eq!(
            set.borrow().transform_file.get(0).unwrap().translation(),
            [0.0, 0.0, -5.0]
        );

        // Plain Left rotates negatively about y.
        c.on_key_press(
            WindowId::MAIN,
            KeyEvent {
                key: Key::Left,
                modifiers: Modifiers::NONE,
            },
        );
        let [_, y, _] = set.borrow().transform_file.get(0).unwrap().rotation_angles();
        assert!((y + 5.0).abs() < 1e-6, "y = {y}");
    }

    #[test]
    fn subregion_capture_crops_to_box() {
        let set = surface_set();
        let (mut c, _picks) = controller_with(set, Collaborators::default());
        c.set_mouse_mode(MouseMode::ImageSubregion);
        c.window_mut(WindowId::MAIN).viewport = (8, 8);

        // Window y flips to framebuffer y.
        c.on_mouse_press(WindowId::MAIN, 1, 7, MouseButton::Left, Modifiers::NONE);
        c.on_mouse_move(WindowId::MAIN, 6, 2, Modifiers::NONE);

        let cropped = c.capture_image_subregion(WindowId::MAIN).unwrap();
        assert_eq!((cropped.width, cropped.height), (5, 5));
    }
}
