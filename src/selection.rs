//! Typed pick results.
//!
//! A pick converts a screen-space click into a set of [`SelectedItem`]s, one
//! per entity class the renderer found under the cursor. The
//! [`SelectionMask`] restricts which classes are considered; the per-item
//! depth breaks ties across classes when a mode needs a single target.

use bitflags::bitflags;

use crate::view_state::VolumeAxis;

bitflags! {
    /// Bit-set of entity classes considered during a pick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SelectionMask: u32 {
        /// Surface nodes.
        const NODE = 1 << 0;
        /// Surface border points.
        const BORDER = 1 << 1;
        /// Volume border points.
        const VOLUME_BORDER = 1 << 2;
        /// Cell projections.
        const CELL_PROJECTION = 1 << 3;
        /// Volume cells.
        const VOLUME_CELL = 1 << 4;
        /// Cut points.
        const CUT = 1 << 5;
        /// Focus projections.
        const FOCUS_PROJECTION = 1 << 6;
        /// Volume foci.
        const VOLUME_FOCI = 1 << 7;
        /// Metric palette entries.
        const PALETTE_METRIC = 1 << 8;
        /// Shape palette entries.
        const PALETTE_SHAPE = 1 << 9;
        /// Contour points.
        const CONTOUR = 1 << 10;
        /// Contour cells.
        const CONTOUR_CELL = 1 << 11;
        /// Voxels of the underlay volume.
        const VOXEL_UNDERLAY = 1 << 12;
        /// Voxels of the secondary overlay volume.
        const VOXEL_OVERLAY_SECONDARY = 1 << 13;
        /// Voxels of the primary overlay volume.
        const VOXEL_OVERLAY_PRIMARY = 1 << 14;
        /// Functional-volume cloud voxels.
        const VOXEL_FUNCTIONAL_CLOUD = 1 << 15;
        /// Surface links (edges).
        const LINK = 1 << 16;
        /// Transformation-axes glyphs.
        const TRANSFORMATION_MATRIX_AXES = 1 << 17;
        /// Tiles of imported VTK models.
        const VTK_MODEL = 1 << 18;
        /// Transform-file cells.
        const TRANSFORMATION_CELL = 1 << 19;
        /// Transform-file foci.
        const TRANSFORMATION_FOCI = 1 << 20;
        /// Surface tiles (triangles).
        const TILE = 1 << 21;
        /// Every class.
        const ALL = u32::MAX;
    }
}

/// A picked voxel: grid indices, the slicing axis it was picked on, and the
/// offset of the slice within an ALL-axis view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelHit {
    /// Voxel indices.
    pub ijk: [i32; 3],
    /// Axis of the slice the voxel was picked on.
    pub axis: VolumeAxis,
    /// Slice offsets for multi-slice views.
    pub offset: [i32; 3],
}

/// What was picked, with enough indices to identify the entity uniquely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectedKind {
    /// A surface node.
    Node {
        /// Node number.
        node: usize,
    },
    /// A surface triangle.
    SurfaceTile {
        /// Tile number.
        tile: usize,
    },
    /// A point of a surface border.
    BorderPoint {
        /// Index of the display representation the border belongs to.
        display: usize,
        /// Border index within the set.
        border: usize,
        /// Link (point) index within the border.
        link: usize,
    },
    /// A point of a volume border.
    VolumeBorderPoint {
        /// Border index within the volume border file.
        border: usize,
        /// Link (point) index within the border.
        link: usize,
    },
    /// A cell projection.
    Cell {
        /// Cell index.
        cell: usize,
    },
    /// A volume cell.
    VolumeCell {
        /// Cell index.
        cell: usize,
    },
    /// A point of a cut.
    Cut {
        /// Cut index.
        cut: usize,
        /// Link (point) index within the cut.
        link: usize,
    },
    /// A focus projection.
    FocusProjection {
        /// Focus index.
        focus: usize,
    },
    /// A volume focus.
    VolumeFocus {
        /// Focus index.
        focus: usize,
    },
    /// An entry of the metric palette.
    PaletteMetric {
        /// Palette entry index.
        entry: usize,
    },
    /// An entry of the shape palette.
    PaletteShape {
        /// Palette entry index.
        entry: usize,
    },
    /// A point of a contour.
    ContourPoint {
        /// Contour index within the file.
        contour: usize,
        /// Point index within the contour.
        point: usize,
    },
    /// A contour cell.
    ContourCell {
        /// Cell index.
        cell: usize,
    },
    /// A voxel of the underlay volume.
    VoxelUnderlay(VoxelHit),
    /// A voxel of the secondary overlay volume.
    VoxelOverlaySecondary(VoxelHit),
    /// A voxel of the primary overlay volume.
    VoxelOverlayPrimary(VoxelHit),
    /// A voxel of the functional cloud.
    VoxelFunctionalCloud(VoxelHit),
    /// A surface edge between two nodes.
    Link {
        /// First node of the edge.
        node_a: usize,
        /// Second node of the edge.
        node_b: usize,
    },
    /// A transformation-axes glyph.
    TransformationAxes {
        /// Index of the matrix in the transformation-matrix file.
        matrix: usize,
    },
    /// A tile of an imported VTK model.
    VtkModel {
        /// Model index.
        model: usize,
        /// Tile index within the model.
        tile: usize,
    },
    /// A cell displayed through a transformation matrix.
    TransformCell {
        /// Cell index.
        cell: usize,
    },
    /// A focus displayed through a transformation matrix.
    TransformFocus {
        /// Focus index.
        focus: usize,
    },
}

impl SelectedKind {
    /// The mask bit this item belongs to.
    pub fn mask(&self) -> SelectionMask {
        match self {
            SelectedKind::Node { .. } => SelectionMask::NODE,
            SelectedKind::SurfaceTile { .. } => SelectionMask::TILE,
            SelectedKind::BorderPoint { .. } => SelectionMask::BORDER,
            SelectedKind::VolumeBorderPoint { .. } => SelectionMask::VOLUME_BORDER,
            SelectedKind::Cell { .. } => SelectionMask::CELL_PROJECTION,
            SelectedKind::VolumeCell { .. } => SelectionMask::VOLUME_CELL,
            SelectedKind::Cut { .. } => SelectionMask::CUT,
            SelectedKind::FocusProjection { .. } => SelectionMask::FOCUS_PROJECTION,
            SelectedKind::VolumeFocus { .. } => SelectionMask::VOLUME_FOCI,
            SelectedKind::PaletteMetric { .. } => SelectionMask::PALETTE_METRIC,
            SelectedKind::PaletteShape { .. } => SelectionMask::PALETTE_SHAPE,
            SelectedKind::ContourPoint { .. } => SelectionMask::CONTOUR,
            SelectedKind::ContourCell { .. } => SelectionMask::CONTOUR_CELL,
            SelectedKind::VoxelUnderlay(_) => SelectionMask::VOXEL_UNDERLAY,
            SelectedKind::VoxelOverlaySecondary(_) => SelectionMask::VOXEL_OVERLAY_SECONDARY,
            SelectedKind::VoxelOverlayPrimary(_) => SelectionMask::VOXEL_OVERLAY_PRIMARY,
            SelectedKind::VoxelFunctionalCloud(_) => SelectionMask::VOXEL_FUNCTIONAL_CLOUD,
            SelectedKind::Link { .. } => SelectionMask::LINK,
            SelectedKind::TransformationAxes { .. } => SelectionMask::TRANSFORMATION_MATRIX_AXES,
            SelectedKind::VtkModel { .. } => SelectionMask::VTK_MODEL,
            SelectedKind::TransformCell { .. } => SelectionMask::TRANSFORMATION_CELL,
            SelectedKind::TransformFocus { .. } => SelectionMask::TRANSFORMATION_FOCI,
        }
    }
}

/// One picked entity with its eye-space depth (smaller = closer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedItem {
    /// What was picked.
    pub kind: SelectedKind,
    /// Eye-space depth used for cross-category tie-breaking.
    pub depth: f64,
}

impl SelectedItem {
    /// Construct an item.
    pub fn new(kind: SelectedKind, depth: f64) -> Self {
        Self { kind, depth }
    }
}

/// The set of items found by one pick, copied out of the renderer.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    items: Vec<SelectedItem>,
}

impl SelectionSet {
    /// Build from raw items.
    pub fn new(items: Vec<SelectedItem>) -> Self {
        Self { items }
    }

    /// Whether nothing was picked.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items.
    pub fn items(&self) -> &[SelectedItem] {
        &self.items
    }

    /// The closest item across every category.
    pub fn nearest(&self) -> Option<&SelectedItem> {
        self.items
            .iter()
            .min_by(|a, b| a.depth.total_cmp(&b.depth))
    }

    /// The closest item among the given categories.
    pub fn nearest_matching(&self, mask: SelectionMask) -> Option<&SelectedItem> {
        self.items
            .iter()
            .filter(|i| mask.contains(i.kind.mask()))
            .min_by(|a, b| a.depth.total_cmp(&b.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_breaks_ties_across_categories() {
        let set = SelectionSet::new(vec![
            SelectedItem::new(SelectedKind::Node { node: 7 }, 0.5),
            SelectedItem::new(
                SelectedKind::BorderPoint {
                    display: 0,
                    border: 1,
                    link: 2,
                },
                0.25,
            ),
            SelectedItem::new(SelectedKind::Cell { cell: 3 }, 0.75),
        ]);
        let nearest = set.nearest().unwrap();
        assert!(matches!(nearest.kind, SelectedKind::BorderPoint { .. }));
    }

    #[test]
    fn nearest_matching_filters_by_mask() {
        let set = SelectionSet::new(vec![
            SelectedItem::new(SelectedKind::Node { node: 7 }, 0.5),
            SelectedItem::new(SelectedKind::Cell { cell: 3 }, 0.1),
        ]);
        let nearest = set.nearest_matching(SelectionMask::NODE).unwrap();
        assert!(matches!(nearest.kind, SelectedKind::Node { node: 7 }));
        assert!(set.nearest_matching(SelectionMask::CUT).is_none());
    }
}
