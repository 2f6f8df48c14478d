//! The mouse-mode state machine.
//!
//! One mode is active at a time, set on the Main window only; auxiliary
//! windows are locked to [`MouseMode::View`]. Each gesture is dispatched to
//! the handler family of the current mode. The handlers live in the
//! submodules, grouped by family, as methods on the controller.

mod axes;
mod draw;
mod edit;
mod roi;
mod subregion;
mod view;
mod voxel;

use log::debug;

use crate::controller::ViewController;
use crate::events::MouseEvent;
use crate::renderer::SubRegionBox;
use crate::window::WindowId;

pub(crate) use view::rotate_surface_view;

/// The mouse modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseMode {
    /// All input ignored.
    None,
    /// Rotate/pan/zoom the displayed model.
    #[default]
    View,
    /// Draw points onto an existing border.
    BorderDraw,
    /// Draw a new border.
    BorderDrawNew,
    /// Delete a border per click.
    BorderDelete,
    /// Delete a border point per click.
    BorderDeletePoint,
    /// Pick borders for interpolation.
    BorderInterpolate,
    /// Pick borders for interpolation of a new border.
    BorderInterpolateNew,
    /// Drag a border point.
    BorderMovePoint,
    /// Reverse a border per click.
    BorderReverse,
    /// Redraw a segment of an existing border.
    BorderUpdate,
    /// Redraw a segment into a new border.
    BorderUpdateNew,
    /// Rename a border per click.
    BorderRename,
    /// Draw a cut.
    CutDraw,
    /// Delete a cut per click.
    CutDelete,
    /// Delete a focus per click.
    FociDelete,
    /// Attach a cell to the picked node.
    CellAdd,
    /// Delete a cell per click.
    CellDelete,
    /// Seed the ROI query with a border.
    SurfaceRoiBorderSelect,
    /// Seed the ROI query with a node's paint.
    SurfaceRoiPaintIndexSelect,
    /// Seed the ROI metric query with a node.
    SurfaceRoiMetricNodeSelect,
    /// Seed the ROI shape query with a node.
    SurfaceRoiShapeNodeSelect,
    /// Seed the ROI geodesic query with a node.
    SurfaceRoiGeodesicNodeSelect,
    /// Pick the start node of a sulcal border.
    SurfaceRoiSulcalBorderNodeStart,
    /// Pick the end node of a sulcal border.
    SurfaceRoiSulcalBorderNodeEnd,
    /// Pick alignment tips for standard orientation.
    AlignStandardOrientation,
    /// Alignment variant used when flattening a full hemisphere.
    AlignStandardOrientationFullHemFlatten,
    /// Pick the two endpoints of the contour scale bar.
    ContourSetScale,
    /// Draw a contour.
    ContourDraw,
    /// Drag contours of the alignment section.
    ContourAlign,
    /// Select the region moved during contour alignment.
    ContourAlignRegion,
    /// Drag a contour point.
    ContourPointMove,
    /// Delete a contour point per click.
    ContourPointDelete,
    /// Delete a contour per click.
    ContourDelete,
    /// Reverse a contour per click.
    ContourReverse,
    /// Merge two picked contours.
    ContourMerge,
    /// Add a contour cell at the click.
    ContourCellAdd,
    /// Delete a contour cell per click.
    ContourCellDelete,
    /// Drag a contour cell.
    ContourCellMove,
    /// Apply the segmentation editor to picked voxels.
    VolumeSegmentationEdit,
    /// Append a surface node at the click.
    EditAddNode,
    /// Collect three picked nodes into a triangle.
    EditAddTile,
    /// Delete tiles using the picked link.
    EditDeleteTileByLink,
    /// Delete tiles incident to the picked node.
    EditDisconnectNode,
    /// Drag a surface node.
    EditMoveNode,
    /// Manipulate the selected transformation axes.
    TransformationMatrixAxes,
    /// Set the selected matrix translation from a click.
    TransformationMatrixSetTranslate,
    /// Apply the paint editor to picked voxels.
    VolumePaintEdit,
    /// Drag out an image capture sub-region.
    ImageSubregion,
}

impl MouseMode {
    /// Whether this mode manipulates the transformation axes.
    pub fn is_axes(self) -> bool {
        matches!(
            self,
            MouseMode::TransformationMatrixAxes | MouseMode::TransformationMatrixSetTranslate
        )
    }

    /// Whether this mode draws into the linear buffer.
    pub fn is_drawing(self) -> bool {
        matches!(
            self,
            MouseMode::BorderDraw
                | MouseMode::BorderDrawNew
                | MouseMode::BorderUpdate
                | MouseMode::BorderUpdateNew
                | MouseMode::CutDraw
                | MouseMode::ContourDraw
        )
    }
}

/// Transient state of the mode machine, reset on every mode switch.
#[derive(Debug, Clone, Default)]
pub struct ModeMachineState {
    /// 0 while waiting for the first splice endpoint, 1 for the second.
    pub augment_phase: u8,
    /// First splice endpoint as (border, link).
    pub augment_first: Option<(usize, usize)>,
    /// Border point being dragged, as (display, border, link).
    pub border_point_being_moved: Option<(usize, usize, usize)>,
    /// Contour point being dragged, as (contour, point).
    pub contour_point_being_moved: Option<(usize, usize)>,
    /// Contour cell being dragged.
    pub contour_cell_being_moved: Option<usize>,
    /// Surface node being dragged.
    pub node_being_moved: Option<usize>,
    /// Nodes collected so far by the tile builder.
    pub tile_nodes: [usize; 3],
    /// How many tile nodes are collected (0..3).
    pub tile_node_count: usize,
    /// First contour picked by the merge mode.
    pub merge_first_contour: Option<usize>,
    /// Border points picked for interpolation, as (border, link).
    pub interpolate_picks: Vec<(usize, usize)>,
    /// Region selected for contour alignment, framebuffer coordinates.
    pub align_region_box: Option<SubRegionBox>,
    /// Endpoints of the contour scale bar picked so far.
    pub scale_points: [Option<[f64; 3]>; 2],
    /// Current image capture sub-region, framebuffer coordinates.
    pub subregion_box: Option<SubRegionBox>,
    /// Set on key release; the next axes keypress commits an edit boundary
    /// to the transformation editor.
    pub key_up_last_time: bool,
    /// Whether the cross cursor override is active (splice in progress).
    pub cross_cursor: bool,
}

impl ModeMachineState {
    /// Clear everything.
    pub fn reset(&mut self) {
        *self = ModeMachineState::default();
    }
}

impl ViewController {
    /// Route a classified gesture to the active mode's handler family.
    /// Auxiliary windows always take the view handler.
    pub(crate) fn dispatch_mouse(&mut self, window: WindowId, event: MouseEvent) {
        if !window.is_main() {
            self.view_mouse(window, event);
            return;
        }
        use MouseMode as M;
        match self.mode {
            M::None => {}
            M::View => self.view_mouse(window, event),
            M::BorderDraw | M::BorderDrawNew | M::BorderUpdate | M::BorderUpdateNew => {
                self.border_draw_mouse(window, event);
            }
            M::BorderInterpolate | M::BorderInterpolateNew => {
                self.border_interpolate_mouse(window, event);
            }
            M::BorderDelete
            | M::BorderDeletePoint
            | M::BorderReverse
            | M::BorderRename
            | M::BorderMovePoint => self.border_edit_mouse(window, event),
            M::CutDraw | M::ContourDraw => self.border_draw_mouse(window, event),
            M::CutDelete | M::FociDelete | M::CellAdd | M::CellDelete => {
                self.annotation_edit_mouse(window, event);
            }
            M::ContourSetScale
            | M::ContourAlign
            | M::ContourAlignRegion
            | M::ContourPointMove
            | M::ContourPointDelete
            | M::ContourDelete
            | M::ContourReverse
            | M::ContourMerge
            | M::ContourCellAdd
            | M::ContourCellDelete
            | M::ContourCellMove => self.contour_edit_mouse(window, event),
            M::SurfaceRoiBorderSelect
            | M::SurfaceRoiPaintIndexSelect
            | M::SurfaceRoiMetricNodeSelect
            | M::SurfaceRoiShapeNodeSelect
            | M::SurfaceRoiGeodesicNodeSelect
            | M::SurfaceRoiSulcalBorderNodeStart
            | M::SurfaceRoiSulcalBorderNodeEnd => self.roi_mouse(window, event),
            M::AlignStandardOrientation | M::AlignStandardOrientationFullHemFlatten => {
                self.align_mouse(window, event);
            }
            M::VolumePaintEdit | M::VolumeSegmentationEdit => {
                self.voxel_edit_mouse(window, event);
            }
            M::EditAddNode
            | M::EditAddTile
            | M::EditDeleteTileByLink
            | M::EditDisconnectNode
            | M::EditMoveNode => self.surface_edit_mouse(window, event),
            M::TransformationMatrixAxes => self.axes_mouse(window, event),
            M::TransformationMatrixSetTranslate => self.axes_set_translate_mouse(window, event),
            M::ImageSubregion => self.subregion_mouse(window, event),
        }
    }

    /// Switch the mouse mode, resetting the transient machine state.
    pub(crate) fn apply_mode_switch(&mut self, new_mode: MouseMode) {
        let old_mode = self.mode;
        if old_mode == new_mode {
            return;
        }
        debug!("mouse mode {old_mode:?} -> {new_mode:?}");

        for w in &mut self.windows {
            w.linear_buffer.clear();
        }
        self.mode_state.reset();

        // Leaving the axes modes deselects the axes glyph.
        if old_mode.is_axes() && !new_mode.is_axes() {
            let set = self.windows[WindowId::MAIN.index()].brain_set.clone();
            set.borrow_mut().transform_file.set_selected_index(None);
        }
        // The sub-region box never survives a mode boundary.
        if old_mode == MouseMode::ImageSubregion || new_mode == MouseMode::ImageSubregion {
            self.renderer.set_subregion_overlay(None);
        }

        self.mode = new_mode;
        self.update_all(None);
    }
}
