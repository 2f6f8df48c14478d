//! Region-of-interest and alignment picking modes.
//!
//! Each click seeds a query field of the external ROI panel, or a tip of
//! the standard-orientation alignment panel. The core only picks and
//! forwards; the panels own the actual queries.

use crate::controller::ViewController;
use crate::events::{MouseEvent, MouseGesture};
use crate::mode::MouseMode;
use crate::selection::{SelectedKind, SelectionMask};
use crate::window::WindowId;

impl ViewController {
    pub(crate) fn roi_mouse(&mut self, window: WindowId, e: MouseEvent) {
        if e.gesture != MouseGesture::LeftClick {
            return;
        }
        if self.mode == MouseMode::SurfaceRoiBorderSelect {
            let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::BORDER) else {
                return;
            };
            if let SelectedKind::BorderPoint { border, .. } = item.kind {
                let set_rc = self.windows[window.index()].brain_set.clone();
                let name = match set_rc.borrow().border_set.get(border) {
                    Some(b) => b.name.clone(),
                    None => return,
                };
                self.collaborators.roi.set_border_name_for_query(&name);
            }
            return;
        }

        let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::NODE) else {
            return;
        };
        let SelectedKind::Node { node } = item.kind else {
            return;
        };
        let roi = &mut self.collaborators.roi;
        match self.mode {
            MouseMode::SurfaceRoiPaintIndexSelect => roi.set_paint_node_for_query(node),
            MouseMode::SurfaceRoiMetricNodeSelect => roi.set_metric_node_for_query(node),
            MouseMode::SurfaceRoiShapeNodeSelect => roi.set_shape_node_for_query(node),
            MouseMode::SurfaceRoiGeodesicNodeSelect => roi.set_geodesic_node_for_query(node),
            MouseMode::SurfaceRoiSulcalBorderNodeStart => roi.set_sulcal_border_start_node(node),
            MouseMode::SurfaceRoiSulcalBorderNodeEnd => roi.set_sulcal_border_end_node(node),
            _ => roi.set_node_for_query(node),
        }
    }

    pub(crate) fn align_mouse(&mut self, window: WindowId, e: MouseEvent) {
        // Plain click picks the ventral tip, SHIFT-press the medial tip.
        let medial = match e.gesture {
            MouseGesture::LeftClick => false,
            MouseGesture::LeftShiftPress => true,
            _ => return,
        };
        let full_hem = self.mode == MouseMode::AlignStandardOrientationFullHemFlatten;
        let Some(item) = self.pick_nearest(window, e.x, e.y, SelectionMask::NODE) else {
            return;
        };
        if let SelectedKind::Node { node } = item.kind {
            if medial {
                self.collaborators.alignment.set_medial_tip(node, full_hem);
            } else {
                self.collaborators.alignment.set_ventral_tip(node, full_hem);
            }
        }
    }
}
