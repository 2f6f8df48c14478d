//! Paint and segmentation voxel editing.
//!
//! Clicks and drags pick a voxel from whichever overlay role holds the
//! edited volume and hand it to the external voxel editor. The renderer is
//! told editing is in progress around each pick so zero-valued voxels stay
//! pickable.

use crate::controller::ViewController;
use crate::events::{MouseEvent, MouseGesture};
use crate::pick::PickRouter;
use crate::selection::{SelectedKind, SelectionMask};
use crate::window::WindowId;

impl ViewController {
    pub(crate) fn voxel_edit_mouse(&mut self, window: WindowId, e: MouseEvent) {
        if !matches!(
            e.gesture,
            MouseGesture::LeftClick | MouseGesture::LeftMove | MouseGesture::LeftPress
        ) {
            return;
        }
        let mask = SelectionMask::VOXEL_UNDERLAY
            | SelectionMask::VOXEL_OVERLAY_SECONDARY
            | SelectionMask::VOXEL_OVERLAY_PRIMARY;

        self.renderer.set_voxel_editing(true);
        let picked = PickRouter::pick(self.renderer.as_mut(), window, e.x, e.y, mask);
        self.renderer.set_voxel_editing(false);

        let Some(item) = picked.nearest_matching(mask) else {
            return;
        };
        let hit = match item.kind {
            SelectedKind::VoxelUnderlay(h)
            | SelectedKind::VoxelOverlaySecondary(h)
            | SelectedKind::VoxelOverlayPrimary(h) => h,
            _ => return,
        };
        let [i, j, k] = hit.ijk;
        self.collaborators.voxel_editor.process_voxel(i, j, k, hit.axis);
        self.update_all(Some(window));
    }
}
