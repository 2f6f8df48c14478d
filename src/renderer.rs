//! The abstract rendering back-end.
//!
//! The core never draws pixels itself; it asks a [`Renderer`] to render a
//! model into a window, to pick entities under a screen position, and to
//! unproject screen coordinates into model space. Picking uses the
//! renderer's own selection facility, so the core stays independent of the
//! graphics API.

use crate::error::Result;
use crate::model::BrainSet;
use crate::selection::{SelectedItem, SelectionMask};
use crate::window::WindowId;

/// A captured frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA bytes, row-major, bottom row first (framebuffer convention).
    pub rgba: Vec<u8>,
}

impl PixelBuffer {
    /// Crop to a sub-rectangle given in framebuffer coordinates.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> PixelBuffer {
        let width = width.min(self.width.saturating_sub(x));
        let height = height.min(self.height.saturating_sub(y));
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for row in y..y + height {
            let start = ((row * self.width + x) * 4) as usize;
            let end = start + (width * 4) as usize;
            rgba.extend_from_slice(&self.rgba[start..end]);
        }
        PixelBuffer {
            width,
            height,
            rgba,
        }
    }
}

/// The dashed selection rectangle of the image sub-region mode, in
/// framebuffer coordinates (y up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubRegionBox {
    /// Left edge.
    pub min_x: i32,
    /// Bottom edge.
    pub min_y: i32,
    /// Right edge.
    pub max_x: i32,
    /// Top edge.
    pub max_y: i32,
}

impl SubRegionBox {
    /// Normalized copy with min <= max on both axes.
    pub fn normalized(&self) -> SubRegionBox {
        SubRegionBox {
            min_x: self.min_x.min(self.max_x),
            min_y: self.min_y.min(self.max_y),
            max_x: self.min_x.max(self.max_x),
            max_y: self.min_y.max(self.max_y),
        }
    }

    /// Valid when, after shrinking one pixel on each side, both extents are
    /// still positive.
    pub fn is_valid(&self) -> bool {
        let n = self.normalized();
        (n.max_x - n.min_x - 2) > 0 && (n.max_y - n.min_y - 2) > 0
    }
}

/// Rendering and selection back-end consumed by the viewer core.
pub trait Renderer {
    /// Render the model at `model_index` of `set` into `window`.
    fn render(&mut self, set: &BrainSet, model_index: usize, window: WindowId, viewport: (u32, u32));

    /// Pick every entity of the classes in `mask` under window position
    /// `(x, y)`. Items are copied out; the renderer keeps no selection state
    /// the core depends on.
    fn pick(&mut self, window: WindowId, x: i32, y: i32, mask: SelectionMask) -> Vec<SelectedItem>;

    /// Unproject a window position to model coordinates. With
    /// `use_depth_buffer` the window z is sampled from the depth buffer,
    /// otherwise z=0 is used.
    fn unproject(
        &self,
        window: WindowId,
        x: i32,
        y: i32,
        use_depth_buffer: bool,
    ) -> Result<[f64; 3]>;

    /// Interpolate the 3D position within the nearest surface triangle under
    /// the cursor; `None` when no triangle is under the cursor.
    fn surface_point_under_cursor(&self, window: WindowId, x: i32, y: i32) -> Option<[f64; 3]>;

    /// Tell the renderer voxel editing is in progress, so zero-valued voxels
    /// stay pickable.
    fn set_voxel_editing(&mut self, enabled: bool);

    /// Show or hide the dashed sub-region rectangle overlay.
    fn set_subregion_overlay(&mut self, rect: Option<SubRegionBox>);

    /// Grab the framebuffer of `window`.
    fn capture(&mut self, window: WindowId) -> PixelBuffer;

    /// Drop any cached display data for the model at `model_index`.
    fn clear_display_cache(&mut self, model_index: usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subregion_box_requires_positive_inner_extent() {
        let b = SubRegionBox {
            min_x: 10,
            min_y: 10,
            max_x: 12,
            max_y: 40,
        };
        assert!(!b.is_valid()); // width collapses after the 1-pixel shrink
        let b2 = SubRegionBox {
            max_x: 20,
            ..b
        };
        assert!(b2.is_valid());
    }

    #[test]
    fn subregion_box_normalizes_corner_order() {
        let b = SubRegionBox {
            min_x: 50,
            min_y: 60,
            max_x: 10,
            max_y: 20,
        };
        let n = b.normalized();
        assert_eq!((n.min_x, n.min_y, n.max_x, n.max_y), (10, 20, 50, 60));
    }

    #[test]
    fn crop_extracts_rows_in_framebuffer_order() {
        // 4x2 image, pixel value = x + y * 4.
        let mut rgba = Vec::new();
        for y in 0..2u8 {
            for x in 0..4u8 {
                rgba.extend_from_slice(&[x + y * 4, 0, 0, 255]);
            }
        }
        let buf = PixelBuffer {
            width: 4,
            height: 2,
            rgba,
        };
        let cropped = buf.crop(1, 1, 2, 1);
        assert_eq!(cropped.width, 2);
        assert_eq!(cropped.height, 1);
        assert_eq!(cropped.rgba[0], 5);
        assert_eq!(cropped.rgba[4], 6);
    }
}
