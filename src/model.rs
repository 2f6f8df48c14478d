//! In-memory brain models and the brain set.
//!
//! The viewer core does not read files; a [`BrainSet`] arrives already
//! loaded. A [`BrainModel`] is a tagged sum of the four displayable kinds,
//! replacing the `dynamic_cast` hierarchy of older viewers with typed
//! accessors that return `None` on a variant mismatch.

use glam::DMat4;

use crate::view_state::{StandardView, ViewState};
use crate::window::NUM_VIEWING_WINDOWS;

/// One view state per viewing window.
pub type ViewTable = [ViewState; NUM_VIEWING_WINDOWS];

fn new_view_table() -> ViewTable {
    std::array::from_fn(|_| ViewState::default())
}

/// Surface classification; flat surfaces disable view rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceType {
    /// Raw digitized surface.
    Raw,
    /// Anatomically correct surface.
    #[default]
    Fiducial,
    /// Inflated surface.
    Inflated,
    /// Very inflated surface.
    VeryInflated,
    /// Spherical surface.
    Spherical,
    /// Ellipsoid surface.
    Ellipsoid,
    /// Surface with the medial wall compressed.
    CompressedMedialWall,
    /// Flattened full hemisphere.
    Flat,
    /// Flattened lobe.
    FlatLobar,
    /// Convex hull.
    Hull,
    /// Unclassified.
    Unknown,
}

impl SurfaceType {
    /// Flat surfaces are viewed in-plane and never rotated.
    pub fn is_flat(self) -> bool {
        matches!(self, SurfaceType::Flat | SurfaceType::FlatLobar)
    }
}

/// A surface mesh with editable nodes and tiles.
#[derive(Debug, Clone)]
pub struct SurfaceModel {
    /// Surface classification.
    pub surface_type: SurfaceType,
    /// Node coordinates.
    pub coords: Vec<[f64; 3]>,
    /// Triangles, as node index triples.
    pub tiles: Vec<[usize; 3]>,
    /// Per-window view transforms.
    pub views: ViewTable,
}

impl SurfaceModel {
    /// An empty surface of the given type.
    pub fn new(surface_type: SurfaceType) -> Self {
        Self {
            surface_type,
            coords: Vec::new(),
            tiles: Vec::new(),
            views: new_view_table(),
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.coords.len()
    }

    /// Append a node, returning its number.
    pub fn add_node(&mut self, xyz: [f64; 3]) -> usize {
        self.coords.push(xyz);
        self.coords.len() - 1
    }

    /// Move an existing node.
    pub fn move_node(&mut self, node: usize, xyz: [f64; 3]) {
        if let Some(c) = self.coords.get_mut(node) {
            *c = xyz;
        }
    }

    /// Append a triangle.
    pub fn add_tile(&mut self, nodes: [usize; 3]) -> usize {
        self.tiles.push(nodes);
        self.tiles.len() - 1
    }

    /// Delete every tile incident to `node`, disconnecting it.
    pub fn disconnect_node(&mut self, node: usize) {
        self.tiles.retain(|t| !t.contains(&node));
    }

    /// Delete every tile using the edge `node_a`-`node_b`.
    pub fn delete_tiles_with_link(&mut self, node_a: usize, node_b: usize) {
        self.tiles
            .retain(|t| !(t.contains(&node_a) && t.contains(&node_b)));
    }
}

/// A volume with axis-aligned and oblique slicing.
#[derive(Debug, Clone)]
pub struct VolumeModel {
    /// Voxel dimensions.
    pub dims: [i32; 3],
    /// World coordinate of voxel (0,0,0).
    pub origin: [f64; 3],
    /// Voxel spacing per axis.
    pub spacing: [f64; 3],
    /// Free rotation applied in the oblique slicing modes. Shared across
    /// windows, unlike the per-window view states.
    pub oblique_rotation: DMat4,
    /// Per-window view transforms.
    pub views: ViewTable,
}

impl VolumeModel {
    /// A volume with the given dimensions, unit spacing, zero origin.
    pub fn new(dims: [i32; 3]) -> Self {
        Self {
            dims,
            origin: [0.0; 3],
            spacing: [1.0; 3],
            oblique_rotation: DMat4::IDENTITY,
            views: new_view_table(),
        }
    }

    /// World coordinate of slice `index` along `axis` (0..2).
    pub fn slice_coordinate(&self, axis: usize, index: i32) -> f64 {
        self.origin[axis] + self.spacing[axis] * f64::from(index)
    }
}

/// One contour: the points of a single section outline.
#[derive(Debug, Clone, Default)]
pub struct Contour {
    /// Section number the contour belongs to.
    pub section: i32,
    /// Ordered points.
    pub points: Vec<[f64; 3]>,
}

/// The contour stack of a contour model.
#[derive(Debug, Clone, Default)]
pub struct ContourFile {
    /// Contours in the stack.
    pub contours: Vec<Contour>,
}

impl ContourFile {
    /// Append a contour, returning its index.
    pub fn add_contour(&mut self, contour: Contour) -> usize {
        self.contours.push(contour);
        self.contours.len() - 1
    }

    /// Delete a contour.
    pub fn delete_contour(&mut self, index: usize) {
        if index < self.contours.len() {
            self.contours.remove(index);
        }
    }

    /// Reverse the point order of a contour.
    pub fn reverse_contour(&mut self, index: usize) {
        if let Some(c) = self.contours.get_mut(index) {
            c.points.reverse();
        }
    }

    /// Merge contour `b` into contour `a`, removing `b`.
    pub fn merge_contours(&mut self, a: usize, b: usize) {
        if a == b || a >= self.contours.len() || b >= self.contours.len() {
            return;
        }
        let moved = self.contours[b].points.clone();
        self.contours[a].points.extend(moved);
        self.contours.remove(b);
    }

    /// Delete a single point of a contour.
    pub fn delete_point(&mut self, contour: usize, point: usize) {
        if let Some(c) = self.contours.get_mut(contour)
            && point < c.points.len()
        {
            c.points.remove(point);
        }
    }

    /// Move a single point of a contour.
    pub fn move_point(&mut self, contour: usize, point: usize, xyz: [f64; 3]) {
        if let Some(c) = self.contours.get_mut(contour)
            && let Some(p) = c.points.get_mut(point)
        {
            *p = xyz;
        }
    }
}

/// A stack of section contours.
#[derive(Debug, Clone)]
pub struct ContourModel {
    /// The contour stack.
    pub contours: ContourFile,
    /// Per-window view transforms.
    pub views: ViewTable,
}

impl ContourModel {
    /// An empty contour model.
    pub fn new() -> Self {
        Self {
            contours: ContourFile::default(),
            views: new_view_table(),
        }
    }
}

impl Default for ContourModel {
    fn default() -> Self {
        Self::new()
    }
}

/// A surface rendered together with volume slices; behaves like a surface
/// for viewing purposes.
#[derive(Debug, Clone)]
pub struct SurfaceAndVolumeModel {
    /// Surface classification.
    pub surface_type: SurfaceType,
    /// Per-window view transforms.
    pub views: ViewTable,
}

impl SurfaceAndVolumeModel {
    /// A surface-and-volume model of the given surface type.
    pub fn new(surface_type: SurfaceType) -> Self {
        Self {
            surface_type,
            views: new_view_table(),
        }
    }
}

/// A single visualizable object.
#[derive(Debug, Clone)]
pub enum BrainModel {
    /// Contour stack.
    Contours(ContourModel),
    /// Surface mesh.
    Surface(SurfaceModel),
    /// Volume.
    Volume(VolumeModel),
    /// Combined surface and volume.
    SurfaceAndVolume(SurfaceAndVolumeModel),
}

impl BrainModel {
    /// View state of this model in `window`.
    pub fn view(&self, window: usize) -> &ViewState {
        match self {
            BrainModel::Contours(m) => &m.views[window],
            BrainModel::Surface(m) => &m.views[window],
            BrainModel::Volume(m) => &m.views[window],
            BrainModel::SurfaceAndVolume(m) => &m.views[window],
        }
    }

    /// Mutable view state of this model in `window`.
    pub fn view_mut(&mut self, window: usize) -> &mut ViewState {
        match self {
            BrainModel::Contours(m) => &mut m.views[window],
            BrainModel::Surface(m) => &mut m.views[window],
            BrainModel::Volume(m) => &mut m.views[window],
            BrainModel::SurfaceAndVolume(m) => &mut m.views[window],
        }
    }

    /// Apply a standard anatomical view in `window`.
    pub fn set_to_standard_view(&mut self, window: usize, view: StandardView) {
        self.view_mut(window).set_to_standard_view(view);
    }

    /// The surface, if this is a surface model.
    pub fn as_surface(&self) -> Option<&SurfaceModel> {
        match self {
            BrainModel::Surface(m) => Some(m),
            _ => None,
        }
    }

    /// The surface, mutably.
    pub fn as_surface_mut(&mut self) -> Option<&mut SurfaceModel> {
        match self {
            BrainModel::Surface(m) => Some(m),
            _ => None,
        }
    }

    /// The volume, if this is a volume model.
    pub fn as_volume(&self) -> Option<&VolumeModel> {
        match self {
            BrainModel::Volume(m) => Some(m),
            _ => None,
        }
    }

    /// The volume, mutably.
    pub fn as_volume_mut(&mut self) -> Option<&mut VolumeModel> {
        match self {
            BrainModel::Volume(m) => Some(m),
            _ => None,
        }
    }

    /// The contour model, if this is one.
    pub fn as_contours(&self) -> Option<&ContourModel> {
        match self {
            BrainModel::Contours(m) => Some(m),
            _ => None,
        }
    }

    /// The contour model, mutably.
    pub fn as_contours_mut(&mut self) -> Option<&mut ContourModel> {
        match self {
            BrainModel::Contours(m) => Some(m),
            _ => None,
        }
    }

    /// The surface-and-volume model, if this is one.
    pub fn as_surface_and_volume(&self) -> Option<&SurfaceAndVolumeModel> {
        match self {
            BrainModel::SurfaceAndVolume(m) => Some(m),
            _ => None,
        }
    }

    /// The surface-and-volume model, mutably.
    pub fn as_surface_and_volume_mut(&mut self) -> Option<&mut SurfaceAndVolumeModel> {
        match self {
            BrainModel::SurfaceAndVolume(m) => Some(m),
            _ => None,
        }
    }
}

/// Name given to drawn borders when the drawing dialog supplies none.
pub const UNNAMED_BORDER: &str = "No-Name";

/// A named, ordered point sequence lying on a surface or slice.
#[derive(Debug, Clone, Default)]
pub struct Border {
    /// Border name.
    pub name: String,
    /// Ordered points.
    pub points: Vec<[f64; 3]>,
    /// Index into the border color file.
    pub color_index: usize,
}

impl Border {
    /// A border from points, with the default name substituted when empty.
    pub fn new(name: &str, points: Vec<[f64; 3]>, color_index: usize) -> Self {
        let name = if name.is_empty() {
            UNNAMED_BORDER.to_string()
        } else {
            name.to_string()
        };
        Self {
            name,
            points,
            color_index,
        }
    }

    /// Reverse the point order.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }
}

/// An ordered collection of borders (surface borders, volume borders or
/// cuts all use this shape).
#[derive(Debug, Clone, Default)]
pub struct BorderSet {
    /// Borders in the set.
    pub borders: Vec<Border>,
}

impl BorderSet {
    /// Number of borders.
    pub fn len(&self) -> usize {
        self.borders.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.borders.is_empty()
    }

    /// Append a border, returning its index.
    pub fn add_border(&mut self, border: Border) -> usize {
        self.borders.push(border);
        self.borders.len() - 1
    }

    /// Border at `index`.
    pub fn get(&self, index: usize) -> Option<&Border> {
        self.borders.get(index)
    }

    /// Mutable border at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Border> {
        self.borders.get_mut(index)
    }

    /// Delete a border.
    pub fn delete_border(&mut self, index: usize) {
        if index < self.borders.len() {
            self.borders.remove(index);
        }
    }

    /// Delete a single point of a border.
    pub fn delete_border_point(&mut self, border: usize, link: usize) {
        if let Some(b) = self.borders.get_mut(border)
            && link < b.points.len()
        {
            b.points.remove(link);
        }
    }
}

/// A point annotation (cell or contour cell).
#[derive(Debug, Clone, Default)]
pub struct Cell {
    /// Cell name.
    pub name: String,
    /// Position.
    pub xyz: [f64; 3],
    /// Node the cell is attached to, when attached.
    pub node: Option<usize>,
    /// Section number (contour cells).
    pub section: i32,
    /// Linked study, when any.
    pub study: Option<usize>,
}

/// A collection of cells.
#[derive(Debug, Clone, Default)]
pub struct CellFile {
    /// Cells in the file.
    pub cells: Vec<Cell>,
}

impl CellFile {
    /// Append a cell, returning its index.
    pub fn add_cell(&mut self, cell: Cell) -> usize {
        self.cells.push(cell);
        self.cells.len() - 1
    }

    /// Delete a cell.
    pub fn delete_cell(&mut self, index: usize) {
        if index < self.cells.len() {
            self.cells.remove(index);
        }
    }

    /// Move a cell.
    pub fn move_cell(&mut self, index: usize, xyz: [f64; 3]) {
        if let Some(c) = self.cells.get_mut(index) {
            c.xyz = xyz;
        }
    }
}

/// A focus annotation with the metadata the identification report shows.
#[derive(Debug, Clone, Default)]
pub struct Focus {
    /// Focus name.
    pub name: String,
    /// Stereotaxic position.
    pub xyz: [f64; 3],
    /// Original (pre-projection) stereotaxic position.
    pub original_xyz: [f64; 3],
    /// Anatomical area.
    pub area: String,
    /// Geographic description.
    pub geography: String,
    /// Extent of the focus.
    pub size: f64,
    /// Reported statistic.
    pub statistic: String,
    /// Free-form comment.
    pub comment: String,
    /// Class name.
    pub class_name: String,
    /// Linked study, when any.
    pub study: Option<usize>,
}

/// A collection of foci.
#[derive(Debug, Clone, Default)]
pub struct FocusFile {
    /// Foci in the file.
    pub foci: Vec<Focus>,
}

impl FocusFile {
    /// Delete a focus.
    pub fn delete_focus(&mut self, index: usize) {
        if index < self.foci.len() {
            self.foci.remove(index);
        }
    }
}

/// Per-node attribute tables consumed by the identification report. Empty
/// tables simply produce no report section.
#[derive(Debug, Clone, Default)]
pub struct NodeAttributes {
    /// Latitude/longitude per node.
    pub lat_lon: Vec<[f64; 2]>,
    /// Paint name per node.
    pub paint: Vec<String>,
    /// Probabilistic atlas label per node.
    pub prob_atlas: Vec<String>,
    /// RGB paint per node.
    pub rgb: Vec<[f64; 3]>,
    /// Metric value per node.
    pub metric: Vec<f64>,
    /// Surface shape value per node.
    pub shape: Vec<f64>,
    /// Section number per node.
    pub section: Vec<i32>,
    /// Areal estimation label per node.
    pub areal_est: Vec<String>,
    /// Topography label per node.
    pub topography: Vec<String>,
}

/// A table within a study.
#[derive(Debug, Clone, Default)]
pub struct StudyTable {
    /// Table number.
    pub number: String,
    /// Table header.
    pub header: String,
    /// Table footer.
    pub footer: String,
    /// Size units.
    pub size_units: String,
    /// Voxel size.
    pub voxel_size: String,
    /// Statistic used.
    pub statistic: String,
    /// Statistic description.
    pub statistic_description: String,
    /// Sub-headers.
    pub sub_headers: Vec<String>,
}

/// A panel within a study figure.
#[derive(Debug, Clone, Default)]
pub struct StudyFigurePanel {
    /// Panel identifier.
    pub identifier: String,
    /// Panel description.
    pub description: String,
    /// Task description.
    pub task_description: String,
    /// Task baseline.
    pub task_baseline: String,
    /// Test attributes.
    pub test_attributes: String,
}

/// A figure within a study.
#[derive(Debug, Clone, Default)]
pub struct StudyFigure {
    /// Figure number.
    pub number: String,
    /// Figure legend.
    pub legend: String,
    /// Panels of the figure.
    pub panels: Vec<StudyFigurePanel>,
}

/// A page reference within a study.
#[derive(Debug, Clone, Default)]
pub struct StudyPageReference {
    /// Page number.
    pub page_number: String,
    /// Header text.
    pub header: String,
    /// Comment.
    pub comment: String,
    /// Size units.
    pub size_units: String,
    /// Voxel size.
    pub voxel_size: String,
    /// Statistic used.
    pub statistic: String,
    /// Statistic description.
    pub statistic_description: String,
}

/// Meta-analysis attached to a study.
#[derive(Debug, Clone, Default)]
pub struct StudyMetaAnalysis {
    /// Name of the meta-analysis.
    pub name: String,
    /// Title.
    pub title: String,
    /// Authors.
    pub authors: String,
    /// Citation.
    pub citation: String,
    /// DOI or URL.
    pub doi_url: String,
}

/// Study metadata consumed by the identification report.
#[derive(Debug, Clone, Default)]
pub struct StudyInfo {
    /// Study name.
    pub name: String,
    /// Title.
    pub title: String,
    /// Authors.
    pub authors: String,
    /// Citation.
    pub citation: String,
    /// Free-form comment.
    pub comment: String,
    /// Digital object identifier.
    pub doi: String,
    /// URL.
    pub url: String,
    /// Keywords.
    pub keywords: Vec<String>,
    /// Medical subject headings.
    pub medical_subject_headings: Vec<String>,
    /// Data format.
    pub data_format: String,
    /// Data type.
    pub data_type: String,
    /// PubMed identifier.
    pub pubmed_id: String,
    /// Project identifier.
    pub project_id: String,
    /// Partitioning-scheme abbreviation.
    pub part_scheme_abbrev: String,
    /// Partitioning-scheme full name.
    pub part_scheme_full: String,
    /// Stereotaxic space.
    pub stereotaxic_space: String,
    /// Stereotaxic space details.
    pub stereotaxic_space_details: String,
    /// Meta-analysis, when the study is one.
    pub meta_analysis: Option<StudyMetaAnalysis>,
    /// Tables.
    pub tables: Vec<StudyTable>,
    /// Figures.
    pub figures: Vec<StudyFigure>,
    /// Page references.
    pub page_references: Vec<StudyPageReference>,
    /// Page number within the publication.
    pub page_number: String,
}

/// Everything loaded for one subject: models plus shared annotation data.
#[derive(Debug, Clone, Default)]
pub struct BrainSet {
    /// Displayable models.
    pub models: Vec<BrainModel>,
    /// Surface borders.
    pub border_set: BorderSet,
    /// Volume borders.
    pub volume_borders: BorderSet,
    /// Cuts used for flattening.
    pub cuts: BorderSet,
    /// Surface cells.
    pub cells: CellFile,
    /// Volume cells.
    pub volume_cells: CellFile,
    /// Contour cells.
    pub contour_cells: CellFile,
    /// Surface foci.
    pub foci: FocusFile,
    /// Volume foci.
    pub volume_foci: FocusFile,
    /// Transformation matrices and the selected axes.
    pub transform_file: crate::transform::TransformMatrixFile,
    /// Per-node attribute tables for identification.
    pub node_attributes: NodeAttributes,
    /// Studies referenced by cells and foci.
    pub studies: Vec<StudyInfo>,
    /// Vocabulary terms that become hyperlinks in identification text.
    pub vocabulary: Vec<String>,
    /// Index of the active fiducial surface, used when a volume in ALL-axis
    /// view routes rotation to the fiducial surface.
    pub active_fiducial: Option<usize>,
}

impl BrainSet {
    /// Number of models.
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Add a model, returning its index.
    pub fn add_model(&mut self, model: BrainModel) -> usize {
        self.models.push(model);
        self.models.len() - 1
    }

    /// Model at `index`.
    pub fn model(&self, index: usize) -> Option<&BrainModel> {
        self.models.get(index)
    }

    /// Mutable model at `index`.
    pub fn model_mut(&mut self, index: usize) -> Option<&mut BrainModel> {
        self.models.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors_reject_other_variants() {
        let model = BrainModel::Surface(SurfaceModel::new(SurfaceType::Fiducial));
        assert!(model.as_surface().is_some());
        assert!(model.as_volume().is_none());
        assert!(model.as_contours().is_none());
        assert!(model.as_surface_and_volume().is_none());
    }

    #[test]
    fn disconnect_node_removes_incident_tiles() {
        let mut s = SurfaceModel::new(SurfaceType::Fiducial);
        for i in 0..5 {
            s.add_node([i as f64, 0.0, 0.0]);
        }
        s.add_tile([0, 1, 2]);
        s.add_tile([1, 2, 3]);
        s.add_tile([2, 3, 4]);
        s.disconnect_node(1);
        assert_eq!(s.tiles, vec![[2, 3, 4]]);
    }

    #[test]
    fn delete_tiles_with_link_targets_edges_only() {
        let mut s = SurfaceModel::new(SurfaceType::Fiducial);
        for i in 0..4 {
            s.add_node([i as f64, 0.0, 0.0]);
        }
        s.add_tile([0, 1, 2]);
        s.add_tile([0, 2, 3]);
        s.delete_tiles_with_link(0, 1);
        assert_eq!(s.tiles, vec![[0, 2, 3]]);
    }

    #[test]
    fn empty_border_name_defaults() {
        let b = Border::new("", vec![[0.0; 3]], 0);
        assert_eq!(b.name, UNNAMED_BORDER);
    }

    #[test]
    fn merge_contours_appends_and_removes() {
        let mut f = ContourFile::default();
        f.add_contour(Contour {
            section: 1,
            points: vec![[0.0; 3], [1.0, 0.0, 0.0]],
        });
        f.add_contour(Contour {
            section: 1,
            points: vec![[2.0, 0.0, 0.0]],
        });
        f.merge_contours(0, 1);
        assert_eq!(f.contours.len(), 1);
        assert_eq!(f.contours[0].points.len(), 3);
    }

    #[test]
    fn volume_slice_coordinate_uses_origin_and_spacing() {
        let mut v = VolumeModel::new([100, 100, 100]);
        v.origin = [-50.0, 0.0, 10.0];
        v.spacing = [2.0, 1.0, 0.5];
        assert_eq!(v.slice_coordinate(0, 10), -30.0);
        assert_eq!(v.slice_coordinate(2, 4), 12.0);
    }
}
