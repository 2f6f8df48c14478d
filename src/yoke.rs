//! Redraw fan-out and yoked-window synchronization.
//!
//! A mutation in one window triggers `update_all(origin)`: the origin
//! renders first so its fresh view state is what the fan-out observes, then
//! Main and every yoked auxiliary follow. Yoked windows have their view
//! state overwritten from Main immediately before they render.

use crate::controller::ViewController;
use crate::model::BrainModel;
use crate::window::WindowId;

impl ViewController {
    /// Re-render windows affected by a change originating in `origin`;
    /// `None` redraws everything.
    pub fn update_all(&mut self, origin: Option<WindowId>) {
        match origin {
            None => {
                for w in WindowId::all() {
                    self.render_window(w);
                }
            }
            Some(o) => {
                self.render_window(o);
                let origin_yoked = !o.is_main() && self.windows[o.index()].yoked;
                if o.is_main() || origin_yoked {
                    if !o.is_main() {
                        self.render_window(WindowId::MAIN);
                    }
                    for w in WindowId::all().skip(1) {
                        if w != o && self.windows[w.index()].yoked {
                            self.render_window(w);
                        }
                    }
                }
            }
        }
        self.trim_display_caches();
    }

    fn render_window(&mut self, w: WindowId) {
        if !w.is_main() && self.windows[w.index()].yoked {
            self.copy_yoked_state(w);
        }
        let win = &self.windows[w.index()];
        let set_rc = win.brain_set.clone();
        let model_index = win.model_index;
        let viewport = win.viewport;
        {
            let set = set_rc.borrow();
            if set.model(model_index).is_none() {
                return;
            }
            self.renderer.render(&set, model_index, w, viewport);
        }
        if w.is_main() && self.collaborators.recording.is_recording() {
            let frame = self.renderer.capture(w);
            self.collaborators.recording.enqueue_frame(frame);
        }
    }

    /// Overwrite a yoked auxiliary's view state from Main: translation and
    /// scaling always, the rotation matrix when Main shows a surface, or the
    /// oblique rotation matrix when Main shows an obliquely sliced volume.
    fn copy_yoked_state(&mut self, aux: WindowId) {
        let main_rc = self.windows[WindowId::MAIN.index()].brain_set.clone();
        let main_index = self.windows[WindowId::MAIN.index()].model_index;
        let snapshot = {
            let set = main_rc.borrow();
            let Some(model) = set.model(main_index) else {
                return;
            };
            let view = model.view(WindowId::MAIN.index());
            let rotation = match model {
                BrainModel::Surface(_) | BrainModel::SurfaceAndVolume(_) => Some(view.rotation),
                BrainModel::Volume(v) if view.selected_axis.is_oblique() => {
                    Some(v.oblique_rotation)
                }
                _ => None,
            };
            (view.translation, view.scaling, rotation)
        };

        let (translation, scaling, rotation) = snapshot;
        let aux_rc = self.windows[aux.index()].brain_set.clone();
        let model_index = self.windows[aux.index()].model_index;
        let mut set = aux_rc.borrow_mut();
        let Some(model) = set.model_mut(model_index) else {
            return;
        };
        let view = model.view_mut(aux.index());
        view.translation = translation;
        view.scaling = scaling;
        if let Some(r) = rotation {
            view.rotation = r;
        }
    }

    /// Drop renderer caches for models no window currently displays.
    fn trim_display_caches(&mut self) {
        let model_count = self.windows[WindowId::MAIN.index()]
            .brain_set
            .borrow()
            .model_count();
        for i in 0..model_count {
            if !self.windows.iter().any(|w| w.model_index == i) {
                self.renderer.clear_display_cache(i);
            }
        }
    }
}
