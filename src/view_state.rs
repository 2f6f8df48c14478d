//! Per-window viewing transforms.
//!
//! Every brain model carries one [`ViewState`] per viewing window: the
//! rotation matrix, translation, scale and perspective zoom that place the
//! model in that window, plus the volume-only slice selection. Yoked windows
//! have their state overwritten from the Main window before every render.

use glam::{DMat3, DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// Minimum scale component for surfaces and volumes. Negative scale would
/// mirror the model; zero would collapse it.
pub const MIN_SCALE: f64 = 0.01;

/// Minimum in-plane scale component for contour stacks.
pub const MIN_CONTOUR_SCALE: f64 = 0.0001;

/// Slicing axis of a displayed volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VolumeAxis {
    /// Parasagittal slices.
    X,
    /// Coronal slices.
    Y,
    /// Horizontal slices.
    #[default]
    Z,
    /// All three orthogonal slices at once.
    All,
    /// Free-rotation slice plane.
    Oblique,
    /// Oblique slice offset along X.
    ObliqueX,
    /// Oblique slice offset along Y.
    ObliqueY,
    /// Oblique slice offset along Z.
    ObliqueZ,
    /// All oblique slices.
    ObliqueAll,
    /// No axis selected.
    Unknown,
}

impl VolumeAxis {
    /// Whether this is one of the oblique slicing modes.
    pub fn is_oblique(self) -> bool {
        matches!(
            self,
            VolumeAxis::Oblique
                | VolumeAxis::ObliqueX
                | VolumeAxis::ObliqueY
                | VolumeAxis::ObliqueZ
                | VolumeAxis::ObliqueAll
        )
    }

    /// Index 0..2 for the single orthogonal axes, `None` otherwise.
    pub fn orthogonal_index(self) -> Option<usize> {
        match self {
            VolumeAxis::X => Some(0),
            VolumeAxis::Y => Some(1),
            VolumeAxis::Z => Some(2),
            _ => None,
        }
    }
}

/// Which axes a view-mode mouse drag rotates about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationAxisMode {
    /// Rotate about X only.
    X,
    /// Rotate about Y only.
    Y,
    /// Rotate about Z only.
    Z,
    /// Free rotation about X and Y (the usual trackball-style view).
    #[default]
    XY,
    /// Rotation disabled (flat surfaces).
    Off,
}

/// Viewing projection for surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewingProjection {
    /// Orthographic projection; CONTROL-drag scales.
    #[default]
    Orthographic,
    /// Perspective projection; CONTROL-drag changes the zoom distance.
    Perspective,
}

/// The standard anatomical views selectable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardView {
    /// Front.
    Anterior,
    /// Top.
    Dorsal,
    /// Side, lateral aspect.
    Lateral,
    /// Side, medial aspect.
    Medial,
    /// Back.
    Posterior,
    /// Default view with transforms reset.
    Reset,
    /// Bottom.
    Ventral,
}

/// Viewing transform of one model in one window.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Rotation-only view matrix.
    pub rotation: DMat4,
    /// Screen-space translation.
    pub translation: [f64; 3],
    /// Per-axis scale.
    pub scaling: [f64; 3],
    /// Zoom distance used under perspective projection.
    pub perspective_zoom: f64,
    /// Selected slicing axis (volumes only).
    pub selected_axis: VolumeAxis,
    /// Selected orthogonal slice indices (volumes only).
    pub selected_slices: [i32; 3],
    /// Oblique slice offsets (volumes only).
    pub oblique_offsets: [i32; 3],
    /// In-plane rotation of the displayed slices in degrees (volumes only).
    pub display_rotation: f64,
    /// Viewing projection.
    pub projection: ViewingProjection,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            rotation: DMat4::IDENTITY,
            translation: [0.0; 3],
            scaling: [1.0; 3],
            perspective_zoom: 100.0,
            selected_axis: VolumeAxis::default(),
            selected_slices: [0; 3],
            oblique_offsets: [0; 3],
            display_rotation: 0.0,
            projection: ViewingProjection::default(),
        }
    }
}

impl ViewState {
    /// Right-multiply the rotation by a rotation about X (degrees).
    pub fn rotate_x(&mut self, degrees: f64) {
        self.rotation *= DMat4::from_rotation_x(degrees.to_radians());
    }

    /// Right-multiply the rotation by a rotation about Y (degrees).
    pub fn rotate_y(&mut self, degrees: f64) {
        self.rotation *= DMat4::from_rotation_y(degrees.to_radians());
    }

    /// Right-multiply the rotation by a rotation about Z (degrees).
    pub fn rotate_z(&mut self, degrees: f64) {
        self.rotation *= DMat4::from_rotation_z(degrees.to_radians());
    }

    /// Add a translation delta.
    pub fn translate_by(&mut self, dx: f64, dy: f64, dz: f64) {
        self.translation[0] += dx;
        self.translation[1] += dy;
        self.translation[2] += dz;
    }

    /// Multiplicative zoom on all three scale components, clamped to
    /// [`MIN_SCALE`]: `scale += delta * scale * 0.01`.
    pub fn zoom_by(&mut self, delta: f64) {
        for s in &mut self.scaling {
            *s += delta * *s * 0.01;
            *s = s.max(MIN_SCALE);
        }
    }

    /// Contour variant of [`zoom_by`](Self::zoom_by): X and Y only, Z pinned
    /// to 1, clamped to [`MIN_CONTOUR_SCALE`].
    pub fn zoom_contours_by(&mut self, delta: f64) {
        for s in &mut self.scaling[0..2] {
            *s += delta * *s * 0.01;
            *s = s.max(MIN_CONTOUR_SCALE);
        }
        self.scaling[2] = 1.0;
    }

    /// Set to one of the standard anatomical views.
    pub fn set_to_standard_view(&mut self, view: StandardView) {
        if view == StandardView::Reset {
            *self = ViewState {
                selected_axis: self.selected_axis,
                selected_slices: self.selected_slices,
                oblique_offsets: self.oblique_offsets,
                projection: self.projection,
                ..ViewState::default()
            };
            return;
        }
        // Dorsal is the identity orientation; the others are fixed rotations
        // away from it.
        let r = match view {
            StandardView::Dorsal => DMat4::IDENTITY,
            StandardView::Ventral => DMat4::from_rotation_y(180.0_f64.to_radians()),
            StandardView::Anterior => DMat4::from_rotation_x(-90.0_f64.to_radians()),
            StandardView::Posterior => {
                DMat4::from_rotation_x(-90.0_f64.to_radians())
                    * DMat4::from_rotation_y(180.0_f64.to_radians())
            }
            StandardView::Lateral => {
                DMat4::from_rotation_x(-90.0_f64.to_radians())
                    * DMat4::from_rotation_y(90.0_f64.to_radians())
            }
            StandardView::Medial => {
                DMat4::from_rotation_x(-90.0_f64.to_radians())
                    * DMat4::from_rotation_y(-90.0_f64.to_radians())
            }
            StandardView::Reset => unreachable!(),
        };
        self.rotation = r;
    }
}

/// Serializable scene record of one window's view of one model.
///
/// Rotation is stored as a 3x3 row-major float array, matching the scene
/// format of the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneViewState {
    /// Translation, 3 floats.
    pub translation: [f32; 3],
    /// Scaling, 3 floats.
    pub scaling: [f32; 3],
    /// Rotation, 9 floats row-major.
    pub rotation: [f32; 9],
    /// Perspective zoom.
    pub perspective_zoom: f32,
    /// Selected slicing axis.
    pub selected_axis: VolumeAxis,
    /// Orthogonal slice indices.
    pub ortho_slices: [i32; 3],
    /// Displayed model index in the window this record belongs to.
    pub model_index: usize,
    /// Whether the window is yoked to Main.
    pub yoked: bool,
}

impl SceneViewState {
    /// Capture a scene record from a view state.
    pub fn capture(state: &ViewState, model_index: usize, yoked: bool) -> Self {
        let r = DMat3::from_mat4(state.rotation);
        // glam is column-major; the scene format wants row-major.
        let rotation = [
            r.x_axis.x as f32,
            r.y_axis.x as f32,
            r.z_axis.x as f32,
            r.x_axis.y as f32,
            r.y_axis.y as f32,
            r.z_axis.y as f32,
            r.x_axis.z as f32,
            r.y_axis.z as f32,
            r.z_axis.z as f32,
        ];
        Self {
            translation: state.translation.map(|v| v as f32),
            scaling: state.scaling.map(|v| v as f32),
            rotation,
            perspective_zoom: state.perspective_zoom as f32,
            selected_axis: state.selected_axis,
            ortho_slices: state.selected_slices,
            model_index,
            yoked,
        }
    }

    /// Restore this record into a view state.
    pub fn restore(&self, state: &mut ViewState) {
        let m = &self.rotation;
        state.rotation = DMat4::from_mat3(DMat3::from_cols(
            DVec3::new(m[0] as f64, m[3] as f64, m[6] as f64),
            DVec3::new(m[1] as f64, m[4] as f64, m[7] as f64),
            DVec3::new(m[2] as f64, m[5] as f64, m[8] as f64),
        ));
        state.translation = self.translation.map(f64::from);
        state.scaling = self.scaling.map(f64::from);
        state.perspective_zoom = f64::from(self.perspective_zoom);
        state.selected_axis = self.selected_axis;
        state.selected_slices = self.ortho_slices;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_clamps_at_minimum_scale() {
        let mut vs = ViewState::default();
        vs.zoom_by(-100000.0);
        for s in vs.scaling {
            assert!(s >= MIN_SCALE);
        }
    }

    #[test]
    fn contour_zoom_keeps_z_fixed() {
        let mut vs = ViewState::default();
        vs.zoom_contours_by(-100000.0);
        assert!(vs.scaling[0] >= MIN_CONTOUR_SCALE);
        assert!(vs.scaling[1] >= MIN_CONTOUR_SCALE);
        assert_eq!(vs.scaling[2], 1.0);
    }

    #[test]
    fn zoom_is_multiplicative() {
        let mut vs = ViewState::default();
        vs.scaling = [2.0, 2.0, 2.0];
        vs.zoom_by(5.0);
        for s in vs.scaling {
            assert!((s - 2.1).abs() < 1e-12);
        }
    }

    #[test]
    fn reset_preserves_slice_selection() {
        let mut vs = ViewState::default();
        vs.selected_axis = VolumeAxis::X;
        vs.selected_slices = [10, 20, 30];
        vs.rotate_x(45.0);
        vs.translate_by(5.0, 5.0, 0.0);
        vs.set_to_standard_view(StandardView::Reset);
        assert_eq!(vs.rotation, DMat4::IDENTITY);
        assert_eq!(vs.translation, [0.0; 3]);
        assert_eq!(vs.selected_axis, VolumeAxis::X);
        assert_eq!(vs.selected_slices, [10, 20, 30]);
    }

    #[test]
    fn scene_round_trip_is_identity() {
        let mut vs = ViewState::default();
        vs.rotate_x(30.0);
        vs.rotate_y(-60.0);
        vs.translation = [1.5, -2.25, 0.5];
        vs.scaling = [2.0, 0.5, 1.25];
        vs.perspective_zoom = 85.0;
        vs.selected_axis = VolumeAxis::Y;
        vs.selected_slices = [3, 4, 5];

        let scene = SceneViewState::capture(&vs, 2, true);
        let json = serde_json::to_string(&scene).unwrap();
        let scene2: SceneViewState = serde_json::from_str(&json).unwrap();
        assert_eq!(scene, scene2);

        let mut restored = ViewState::default();
        scene2.restore(&mut restored);
        assert_eq!(restored.translation, vs.translation);
        assert_eq!(restored.scaling, vs.scaling);
        assert_eq!(restored.selected_axis, VolumeAxis::Y);
        assert_eq!(restored.selected_slices, [3, 4, 5]);
        // Rotation survives to f32 precision.
        let a = restored.rotation.to_cols_array();
        let b = vs.rotation.to_cols_array();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}
