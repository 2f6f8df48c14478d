//! Pick routing.
//!
//! Thin layer between the mode machine and the renderer's selection
//! facility: runs a pick with a category mask, wraps the results in a
//! [`SelectionSet`], and converts screen positions to model coordinates with
//! failed samples dropped rather than propagated.

use log::debug;

use crate::renderer::Renderer;
use crate::selection::{SelectionMask, SelectionSet};
use crate::window::WindowId;

/// Stateless helpers around [`Renderer`] picking.
pub struct PickRouter;

impl PickRouter {
    /// Pick every entity of the classes in `mask` under `(x, y)`.
    pub fn pick(
        renderer: &mut dyn Renderer,
        window: WindowId,
        x: i32,
        y: i32,
        mask: SelectionMask,
    ) -> SelectionSet {
        SelectionSet::new(renderer.pick(window, x, y, mask))
    }

    /// Unproject a screen position to model coordinates. A failed
    /// unprojection yields `None`; the caller skips the sample.
    pub fn unproject_sample(
        renderer: &dyn Renderer,
        window: WindowId,
        x: i32,
        y: i32,
        use_depth_buffer: bool,
    ) -> Option<[f64; 3]> {
        match renderer.unproject(window, x, y, use_depth_buffer) {
            Ok(p) => Some(p),
            Err(e) => {
                debug!("dropping unprojection sample: {e}");
                None
            }
        }
    }
}
