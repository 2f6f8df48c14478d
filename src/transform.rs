//! 4x4 transformation matrices and the transformation-matrix file.
//!
//! Matrices use the post-multiply convention: a point is a column vector on
//! the right, `p' = M * p`. Rotations are right-multiplied (they act in the
//! object's local frame); translations and scales are pre-multiplied (they
//! act in the world frame, i.e. they are appended after everything the matrix
//! already does).
//!
//! The frame-relative operations are the load-bearing piece of this module:
//! when the user nudges a selected transformation axes with the arrow keys,
//! the rotation must happen about the *screen* axes as currently displayed,
//! not the matrix's own axes. See [`TransformMatrix::rotate_relative_to`] and
//! [`TransformMatrix::nudge_rotation_in_view`].

use glam::{DMat3, DMat4, DVec3};

use crate::error::{Result, ViewerError};

/// Determinant magnitude below which a matrix is treated as singular.
const SINGULAR_EPSILON: f64 = 1e-10;

/// Default length of the rendered axes glyph.
pub const DEFAULT_AXES_LENGTH: f64 = 50.0;

/// A rotation-only view matrix, shared with the per-window view state.
pub type RotationMatrix = DMat4;

/// A named 4x4 transformation matrix with its editing metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformMatrix {
    matrix: DMat4,
    /// User-visible name of the matrix.
    pub name: String,
    /// Free-form comment.
    pub comment: String,
    /// Anterior-commissure coordinates of the target volume.
    pub target_ac: [i32; 3],
    /// Dimensions of the target volume.
    pub target_volume_dims: [i32; 3],
    /// File name of the target volume.
    pub target_volume_file: String,
    /// File name of the target fiducial coordinates.
    pub target_fiducial_file: String,
    /// Whether the axes glyph for this matrix is drawn.
    pub axes_visible: bool,
    /// Length of the axes glyph.
    pub axes_length: f64,
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self {
            matrix: DMat4::IDENTITY,
            name: String::new(),
            comment: String::new(),
            target_ac: [0; 3],
            target_volume_dims: [0; 3],
            target_volume_file: String::new(),
            target_fiducial_file: String::new(),
            axes_visible: true,
            axes_length: DEFAULT_AXES_LENGTH,
        }
    }
}

impl TransformMatrix {
    /// Create an identity matrix with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Reset to the identity matrix.
    pub fn identity(&mut self) {
        self.matrix = DMat4::IDENTITY;
    }

    /// The raw matrix.
    pub fn matrix(&self) -> DMat4 {
        self.matrix
    }

    /// Replace the raw matrix.
    pub fn set_matrix(&mut self, m: DMat4) {
        self.matrix = m;
    }

    /// Right-multiply by a rotation of `degrees` about the X axis.
    pub fn rotate_x(&mut self, degrees: f64) {
        self.matrix *= DMat4::from_rotation_x(degrees.to_radians());
    }

    /// Right-multiply by a rotation of `degrees` about the Y axis.
    pub fn rotate_y(&mut self, degrees: f64) {
        self.matrix *= DMat4::from_rotation_y(degrees.to_radians());
    }

    /// Right-multiply by a rotation of `degrees` about the Z axis.
    pub fn rotate_z(&mut self, degrees: f64) {
        self.matrix *= DMat4::from_rotation_z(degrees.to_radians());
    }

    /// Right-multiply by a rotation of `degrees` about an arbitrary axis.
    pub fn rotate_about_axis(&mut self, degrees: f64, axis: [f64; 3]) {
        let axis = DVec3::from_array(axis);
        if axis.length_squared() > 0.0 {
            self.matrix *= DMat4::from_axis_angle(axis.normalize(), degrees.to_radians());
        }
    }

    /// Frame-relative rotation.
    ///
    /// When `relative_to` is present the angle triple is first transformed by
    /// it as a vector, so the rotation happens about the viewer's screen axes
    /// rather than this matrix's own axes. The (possibly transformed) angles
    /// are then applied as Z, X, Y rotations in that order.
    pub fn rotate_relative_to(&mut self, angles: [f64; 3], relative_to: Option<&RotationMatrix>) {
        let r = transform_angles(angles, relative_to);
        self.rotate_z(r[2]);
        self.rotate_x(r[0]);
        self.rotate_y(r[1]);
    }

    /// Append a translation (world frame).
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.matrix = DMat4::from_translation(DVec3::new(dx, dy, dz)) * self.matrix;
    }

    /// Append a translation, with the delta optionally transformed by a view
    /// rotation first so the motion follows the screen axes.
    pub fn translate_relative_to(&mut self, d: [f64; 3], relative_to: Option<&RotationMatrix>) {
        let t = transform_angles(d, relative_to);
        self.translate(t[0], t[1], t[2]);
    }

    /// Append a scale (world frame).
    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        self.matrix = DMat4::from_scale(DVec3::new(sx, sy, sz)) * self.matrix;
    }

    /// Right-multiply by `other`.
    pub fn multiply(&mut self, other: &TransformMatrix) {
        self.matrix *= other.matrix;
    }

    /// Left-multiply by `other`.
    pub fn pre_multiply(&mut self, other: &TransformMatrix) {
        self.matrix = other.matrix * self.matrix;
    }

    /// Invert in place. Fails with [`ViewerError::SingularMatrix`] when the
    /// determinant is near zero; the matrix is left unchanged in that case.
    pub fn inverse(&mut self) -> Result<()> {
        let det = self.matrix.determinant();
        if det.abs() < SINGULAR_EPSILON {
            return Err(ViewerError::SingularMatrix {
                determinant: det.abs(),
            });
        }
        self.matrix = self.matrix.inverse();
        Ok(())
    }

    /// Transpose in place.
    pub fn transpose(&mut self) {
        self.matrix = self.matrix.transpose();
    }

    /// The translation component.
    pub fn translation(&self) -> [f64; 3] {
        self.matrix.w_axis.truncate().to_array()
    }

    /// Euler angles in degrees, decomposed in the same Z, X, Y order the
    /// rotation operations apply them. Scale is stripped before decomposing.
    pub fn rotation_angles(&self) -> [f64; 3] {
        rotation_angles_of(&self.matrix)
    }

    /// Scaling extracted from the basis column norms.
    ///
    /// Incorrect when the matrix carries shear; fine for the rotate/translate/
    /// scale compositions the viewer produces.
    pub fn scaling(&self) -> [f64; 3] {
        [
            self.matrix.x_axis.truncate().length(),
            self.matrix.y_axis.truncate().length(),
            self.matrix.z_axis.truncate().length(),
        ]
    }

    /// Transform a point.
    pub fn multiply_point(&self, p: [f64; 3]) -> [f64; 3] {
        self.matrix.transform_point3(DVec3::from_array(p)).to_array()
    }

    /// Transform a point by the inverse of this matrix.
    pub fn inverse_multiply_point(&self, p: [f64; 3]) -> Result<[f64; 3]> {
        let mut inv = self.clone();
        inv.inverse()?;
        Ok(inv.multiply_point(p))
    }

    /// Apply a frame-relative rotation nudge preserving this matrix's
    /// translation.
    ///
    /// The sequence is: transform the angles by the view rotation, build a
    /// fresh rotation matrix R (Z, X, Y order), strip the translation T from
    /// this matrix, pre-multiply by R, and restore T. This keeps the axes
    /// glyph spinning in place about the screen axes.
    pub fn nudge_rotation_in_view(
        &mut self,
        angles: [f64; 3],
        view_rotation: Option<&RotationMatrix>,
    ) {
        let r = transform_angles(angles, view_rotation);
        let mut rot = TransformMatrix::default();
        rot.rotate_z(r[2]);
        rot.rotate_x(r[0]);
        rot.rotate_y(r[1]);

        let [tx, ty, tz] = self.translation();
        self.translate(-tx, -ty, -tz);
        self.pre_multiply(&rot);
        self.translate(tx, ty, tz);
    }
}

/// Transform a delta triple by a rotation-only view matrix (no translation).
fn transform_angles(v: [f64; 3], relative_to: Option<&RotationMatrix>) -> [f64; 3] {
    match relative_to {
        Some(m) => m.transform_vector3(DVec3::from_array(v)).to_array(),
        None => v,
    }
}

/// Euler Z, X, Y decomposition of the rotation part of `m` (degrees).
fn rotation_angles_of(m: &DMat4) -> [f64; 3] {
    // Normalize basis columns to strip scale.
    let mut r = DMat3::from_mat4(*m);
    r.x_axis = r.x_axis.normalize_or_zero();
    r.y_axis = r.y_axis.normalize_or_zero();
    r.z_axis = r.z_axis.normalize_or_zero();

    // R = Rz * Rx * Ry with column vectors:
    //   row2 = [-cx*sy, sx, cx*cy]
    //   row0/row1 carry z once x is known.
    let sx = r.y_axis.z.clamp(-1.0, 1.0);
    let x = sx.asin();
    let cx = x.cos();
    let (y, z) = if cx.abs() > 1e-8 {
        (
            (-r.x_axis.z).atan2(r.z_axis.z),
            (-r.y_axis.x).atan2(r.y_axis.y),
        )
    } else {
        // Gimbal lock: fold everything into y.
        (r.z_axis.x.atan2(r.x_axis.x), 0.0)
    };
    [x.to_degrees(), y.to_degrees(), z.to_degrees()]
}

/// Ordered list of transformation matrices with an optional selected axes.
///
/// The selected index drives the transformation-axes mouse mode: keyboard and
/// mouse nudges are applied to the selected matrix.
#[derive(Debug, Clone, Default)]
pub struct TransformMatrixFile {
    matrices: Vec<TransformMatrix>,
    selected: Option<usize>,
}

impl TransformMatrixFile {
    /// Number of matrices in the file.
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// Whether the file holds no matrices.
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Append a matrix and return its index.
    pub fn add(&mut self, m: TransformMatrix) -> usize {
        self.matrices.push(m);
        self.matrices.len() - 1
    }

    /// Matrix at `index`.
    pub fn get(&self, index: usize) -> Option<&TransformMatrix> {
        self.matrices.get(index)
    }

    /// Mutable matrix at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut TransformMatrix> {
        self.matrices.get_mut(index)
    }

    /// Index of the selected axes, if any.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.filter(|&i| i < self.matrices.len())
    }

    /// Select the axes at `index`, or clear the selection with `None`.
    pub fn set_selected_index(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.matrices.len());
    }

    /// The selected matrix, mutably.
    pub fn selected_mut(&mut self) -> Option<&mut TransformMatrix> {
        let index = self.selected_index()?;
        self.matrices.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn matrices_approx_eq(a: &TransformMatrix, b: &TransformMatrix) -> bool {
        a.matrix()
            .to_cols_array()
            .iter()
            .zip(b.matrix().to_cols_array().iter())
            .all(|(x, y)| approx_eq(*x, *y))
    }

    #[test]
    fn translate_and_back_is_identity() {
        let mut m = TransformMatrix::default();
        m.rotate_x(30.0);
        m.rotate_y(-12.0);
        m.translate(4.0, -2.0, 9.0);
        let before = m.clone();
        m.translate(7.0, 3.0, -1.0);
        m.translate(-7.0, -3.0, 1.0);
        assert!(matrices_approx_eq(&m, &before));
    }

    #[test]
    fn double_inverse_is_identity() {
        let mut m = TransformMatrix::default();
        m.rotate_z(45.0);
        m.translate(10.0, 0.0, -5.0);
        m.scale(2.0, 2.0, 2.0);
        let before = m.clone();
        m.inverse().unwrap();
        m.inverse().unwrap();
        assert!(matrices_approx_eq(&m, &before));
    }

    #[test]
    fn singular_matrix_reports_error() {
        let mut m = TransformMatrix::default();
        m.scale(0.0, 1.0, 1.0);
        assert!(matches!(
            m.inverse(),
            Err(ViewerError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn rotation_angles_round_trip() {
        let mut m = TransformMatrix::default();
        // Apply in the decomposition order: Z, then X, then Y.
        m.rotate_z(25.0);
        m.rotate_x(10.0);
        m.rotate_y(-40.0);
        let [x, y, z] = m.rotation_angles();
        assert!((x - 10.0).abs() < 1e-8, "x = {x}");
        assert!((y + 40.0).abs() < 1e-8, "y = {y}");
        assert!((z - 25.0).abs() < 1e-8, "z = {z}");
    }

    #[test]
    fn scaling_from_column_norms() {
        let mut m = TransformMatrix::default();
        m.scale(2.0, 3.0, 0.5);
        m.rotate_y(90.0);
        let [sx, sy, sz] = m.scaling();
        // Rotation permutes which world axis each column points along but
        // preserves the column norms.
        assert!(approx_eq(sx, 2.0) || approx_eq(sx, 0.5));
        assert!(approx_eq(sy, 3.0));
        assert!(approx_eq(sz, 0.5) || approx_eq(sz, 2.0));
    }

    #[test]
    fn frame_relative_nudge_under_y90_view() {
        // With the view rotated 90 degrees about Y, a screen-space X rotation
        // lands on the world Z axis.
        let mut m = TransformMatrix::default();
        let view = DMat4::from_rotation_y(90.0_f64.to_radians());
        m.nudge_rotation_in_view([-1.0, 0.0, 0.0], Some(&view));
        let [x, y, z] = m.rotation_angles();
        assert!(x.abs() < 1e-6, "x = {x}");
        assert!(y.abs() < 1e-6, "y = {y}");
        assert!((z - 1.0).abs() < 1e-6, "z = {z}");
    }

    #[test]
    fn nudge_preserves_translation() {
        let mut m = TransformMatrix::default();
        m.translate(12.0, -7.0, 3.0);
        m.nudge_rotation_in_view([5.0, -3.0, 2.0], None);
        let [tx, ty, tz] = m.translation();
        assert!(approx_eq(tx, 12.0));
        assert!(approx_eq(ty, -7.0));
        assert!(approx_eq(tz, 3.0));
    }

    #[test]
    fn point_round_trip_through_inverse() {
        let mut m = TransformMatrix::default();
        m.rotate_x(33.0);
        m.translate(1.0, 2.0, 3.0);
        let p = [5.0, -4.0, 2.5];
        let q = m.multiply_point(p);
        let back = m.inverse_multiply_point(q).unwrap();
        for i in 0..3 {
            assert!((back[i] - p[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn file_selection_clamps_to_contents() {
        let mut file = TransformMatrixFile::default();
        assert!(file.is_empty());
        let idx = file.add(TransformMatrix::named("registration"));
        file.set_selected_index(Some(idx));
        assert_eq!(file.selected_index(), Some(idx));
        file.set_selected_index(Some(99));
        assert_eq!(file.selected_index(), None);
    }
}
