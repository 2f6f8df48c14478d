//! Image sub-region capture mode.
//!
//! Press anchors one corner of the capture rectangle in framebuffer
//! coordinates, dragging moves the opposite corner, and the renderer draws a
//! dashed overlay while the rectangle is valid. The controller's sub-region
//! capture crops the grabbed frame to this box.

use crate::controller::ViewController;
use crate::events::{MouseEvent, MouseGesture};
use crate::renderer::SubRegionBox;
use crate::window::WindowId;

impl ViewController {
    pub(crate) fn subregion_mouse(&mut self, window: WindowId, e: MouseEvent) {
        let fb_y = self.framebuffer_y(window, e.y);
        match e.gesture {
            MouseGesture::LeftPress => {
                self.mode_state.subregion_box = Some(SubRegionBox {
                    min_x: e.x,
                    min_y: fb_y,
                    max_x: e.x,
                    max_y: fb_y,
                });
            }
            MouseGesture::LeftMove => {
                let Some(b) = &mut self.mode_state.subregion_box else {
                    return;
                };
                b.max_x = e.x;
                b.max_y = fb_y;
            }
            _ => return,
        }
        let overlay = self
            .mode_state
            .subregion_box
            .filter(|b| b.is_valid())
            .map(|b| b.normalized());
        self.renderer.set_subregion_overlay(overlay);
        self.update_all(Some(window));
    }
}
