//! External collaborators.
//!
//! Dialogs, panels and remote processes are never owned by the viewer core.
//! Each one the core needs to talk to is represented here by a trait; the
//! surrounding application passes implementations into the controller. Every
//! trait is implemented by `()` as a no-op, so tests and headless embeddings
//! only wire up what they care about.

use crate::renderer::PixelBuffer;
use crate::selection::SelectedItem;
use crate::view_state::VolumeAxis;

/// Whether drawn points are taken from the flat unprojection or interpolated
/// on the surface under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawDimension {
    /// Unproject at z = 0.
    #[default]
    TwoD,
    /// Interpolate within the surface triangle under the cursor.
    ThreeD,
}

/// Paint column and name a finalized border assigns to enclosed nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintAssignment {
    /// Paint column to write.
    pub column: usize,
    /// Index of the paint name to assign.
    pub name_index: usize,
}

/// Current values of the drawing dialog, sampled at finalization time.
#[derive(Debug, Clone)]
pub struct DrawingParameters {
    /// Target resampling spacing.
    pub density: f64,
    /// 2D or surface-hugging 3D drawing.
    pub dimension: DrawDimension,
    /// Whether the drawn object closes back on its first point.
    pub closed: bool,
    /// Name for the created border, cut or cell; empty picks the default.
    pub name: String,
    /// Color file index for the created object.
    pub color_index: usize,
    /// Section number for created contours and contour cells.
    pub section: i32,
    /// Paint assignment performed when a closed border is finalized.
    pub paint_assignment: Option<PaintAssignment>,
    /// Number of slices a finalized volume border spans.
    pub slice_thickness: i32,
}

impl Default for DrawingParameters {
    fn default() -> Self {
        Self {
            density: 2.0,
            dimension: DrawDimension::TwoD,
            closed: false,
            name: String::new(),
            color_index: 0,
            section: 0,
            paint_assignment: None,
            slice_thickness: 1,
        }
    }
}

/// Supplies the drawing dialog's current parameter values.
pub trait DrawingParameterProvider {
    /// Current parameters.
    fn drawing_parameters(&self) -> DrawingParameters {
        DrawingParameters::default()
    }
}

/// The transformation-matrix editor panel.
pub trait TransformationEditor {
    /// A matrix was mutated by the axes mouse mode; refresh the display.
    fn matrix_changed(&mut self, _matrix_index: usize) {}

    /// The axes key handler crossed a key-up boundary; the editor may record
    /// a discrete edit for undo purposes.
    fn axes_event_in_main_window(&mut self) {}
}

/// Modal text prompt (border rename and similar).
pub trait StringInputOperator {
    /// Ask the user for a string; `None` means cancelled.
    fn request_string(&mut self, _prompt: &str, _default: &str) -> Option<String> {
        None
    }
}

/// Modal warning/error message.
pub trait WarningOperator {
    /// Show a warning to the user.
    fn warn(&mut self, _message: &str) {}
}

/// Sends node highlights to external viewer processes.
pub trait RemoteHighlightSink {
    /// Highlight `node` in remote viewers.
    fn send_node_highlight(&mut self, _node: usize) {}
}

/// Shows the right-click context menu built from a pick.
pub trait PopupMenuOperator {
    /// Present the menu for the picked items.
    fn show_selection_menu(&mut self, _items: &[SelectedItem]) {}
}

/// The region-of-interest panel's query seeds.
pub trait RoiSink {
    /// Seed the query with a node.
    fn set_node_for_query(&mut self, _node: usize) {}

    /// Seed the query with a border name.
    fn set_border_name_for_query(&mut self, _name: &str) {}

    /// Seed the query with the paint of a node.
    fn set_paint_node_for_query(&mut self, _node: usize) {}

    /// Seed the metric threshold query with a node.
    fn set_metric_node_for_query(&mut self, _node: usize) {}

    /// Seed the shape threshold query with a node.
    fn set_shape_node_for_query(&mut self, _node: usize) {}

    /// Seed the geodesic distance query with a node.
    fn set_geodesic_node_for_query(&mut self, _node: usize) {}

    /// Start node of a sulcal border.
    fn set_sulcal_border_start_node(&mut self, _node: usize) {}

    /// End node of a sulcal border.
    fn set_sulcal_border_end_node(&mut self, _node: usize) {}
}

/// The standard-orientation alignment panel.
pub trait AlignmentSink {
    /// The picked node is the ventral tip. `full_hem_flatten` distinguishes
    /// the full-hemisphere flattening variant of the mode.
    fn set_ventral_tip(&mut self, _node: usize, _full_hem_flatten: bool) {}

    /// The picked node is the dorsal-medial tip.
    fn set_medial_tip(&mut self, _node: usize, _full_hem_flatten: bool) {}
}

/// The paint/segmentation volume editor.
pub trait VoxelEditor {
    /// Apply the editor's current operation to the picked voxel.
    fn process_voxel(&mut self, _i: i32, _j: i32, _k: i32, _axis: VolumeAxis) {}
}

/// Movie-recording consumer of Main-window frames.
pub trait RecordingSink {
    /// Whether frames should be captured right now.
    fn is_recording(&self) -> bool {
        false
    }

    /// Consume one captured frame.
    fn enqueue_frame(&mut self, _frame: PixelBuffer) {}
}

/// Receives identification report text.
pub trait IdentificationSink {
    /// Append a block of identification text to the report window.
    fn append_identification(&mut self, _text: &str) {}
}

impl DrawingParameterProvider for () {}
impl TransformationEditor for () {}
impl StringInputOperator for () {}
impl WarningOperator for () {}
impl RemoteHighlightSink for () {}
impl PopupMenuOperator for () {}
impl RoiSink for () {}
impl AlignmentSink for () {}
impl VoxelEditor for () {}
impl RecordingSink for () {}
impl IdentificationSink for () {}

/// The full collaborator bundle handed to the controller. Defaults are all
/// no-ops.
pub struct Collaborators {
    /// Drawing dialog parameters.
    pub drawing: Box<dyn DrawingParameterProvider>,
    /// Transformation-matrix editor.
    pub transformation_editor: Box<dyn TransformationEditor>,
    /// Modal text prompt.
    pub string_input: Box<dyn StringInputOperator>,
    /// Modal warnings.
    pub warnings: Box<dyn WarningOperator>,
    /// Remote node highlights.
    pub remote_highlight: Box<dyn RemoteHighlightSink>,
    /// Right-click context menu.
    pub popup_menu: Box<dyn PopupMenuOperator>,
    /// Region-of-interest panel.
    pub roi: Box<dyn RoiSink>,
    /// Standard-orientation alignment panel.
    pub alignment: Box<dyn AlignmentSink>,
    /// Voxel editor.
    pub voxel_editor: Box<dyn VoxelEditor>,
    /// Movie recorder.
    pub recording: Box<dyn RecordingSink>,
    /// Identification report window.
    pub identification: Box<dyn IdentificationSink>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            drawing: Box::new(()),
            transformation_editor: Box::new(()),
            string_input: Box::new(()),
            warnings: Box::new(()),
            remote_highlight: Box::new(()),
            popup_menu: Box::new(()),
            roi: Box::new(()),
            alignment: Box::new(()),
            voxel_editor: Box::new(()),
            recording: Box::new(()),
            identification: Box::new(()),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Collaborators { .. }")
    }
}
