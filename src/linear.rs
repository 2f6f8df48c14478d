//! The linear object being drawn.
//!
//! While a drawing mode is active, every mouse-move sample appends one point
//! to this buffer. On finalization the buffer is resampled to the requested
//! density and handed to a consumer (border set, cut file, contour file).
//! Control-clicks can splice a range of an existing border into the buffer.

use crate::view_state::VolumeAxis;

/// Ordered sequence of 3D points under construction.
#[derive(Debug, Clone, Default)]
pub struct LinearObjectBuffer {
    points: Vec<[f64; 3]>,
}

impl LinearObjectBuffer {
    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the buffer holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point.
    pub fn append(&mut self, xyz: [f64; 3]) {
        self.points.push(xyz);
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Point at `index`.
    pub fn get(&self, index: usize) -> Option<[f64; 3]> {
        self.points.get(index).copied()
    }

    /// All points.
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Total polyline length.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| distance(w[0], w[1]))
            .sum()
    }

    /// Append the first point once more, closing the drawn loop.
    pub fn close(&mut self) {
        if let Some(&first) = self.points.first() {
            self.points.push(first);
        }
    }

    /// Resample to a target point spacing, preserving both endpoints.
    ///
    /// The new point count is `floor(length / density) + 1`, raised to
    /// `minimum_points` when smaller; the effective density is then recomputed
    /// as `length / (count - 1)` so the first and last points survive exactly.
    /// Returns the new point count. Buffers with fewer than two points are
    /// left unchanged.
    pub fn resample_to_density(&mut self, density: f64, minimum_points: usize) -> usize {
        if self.points.len() < 2 || density <= 0.0 {
            return self.points.len();
        }
        let total = self.length();
        let mut count = (total / density) as usize + 1;
        if minimum_points > 1 && count < minimum_points {
            count = minimum_points;
        }
        let spacing = total / (count - 1) as f64;

        // Cumulative arc length per input point.
        let mut arc = Vec::with_capacity(self.points.len());
        let mut acc = 0.0;
        arc.push(0.0);
        for w in self.points.windows(2) {
            acc += distance(w[0], w[1]);
            arc.push(acc);
        }

        let mut out = Vec::with_capacity(count);
        out.push(self.points[0]);
        let mut seg = 0;
        for i in 1..count - 1 {
            let target = spacing * i as f64;
            while seg + 1 < arc.len() - 1 && arc[seg + 1] < target {
                seg += 1;
            }
            let span = arc[seg + 1] - arc[seg];
            let t = if span > 0.0 {
                (target - arc[seg]) / span
            } else {
                0.0
            };
            out.push(lerp(self.points[seg], self.points[seg + 1], t));
        }
        out.push(self.points[self.points.len() - 1]);
        self.points = out;
        count
    }

    /// Splice a range of an existing border's points into the buffer.
    ///
    /// The walk is ordered so the spliced run flows into the drawing
    /// direction: when `start < end` it goes `start -> 0` and then wraps
    /// `last -> end`; otherwise it goes `start -> end` directly, descending.
    pub fn splice_from_border(&mut self, border_points: &[[f64; 3]], start: usize, end: usize) {
        let total = border_points.len();
        if start >= total || end >= total {
            return;
        }
        if start < end {
            for i in (0..=start).rev() {
                self.points.push(border_points[i]);
            }
            for i in (end..total).rev() {
                self.points.push(border_points[i]);
            }
        } else {
            for i in (end..=start).rev() {
                self.points.push(border_points[i]);
            }
        }
    }

    /// Collapse every point onto the current orthogonal slice plane of a
    /// volume. The in-plane pair of each drawn point is remapped to the
    /// global axes appropriate for `axis`, and the perpendicular coordinate
    /// becomes `slice_coordinate`.
    pub fn collapse_to_slice(&mut self, axis: VolumeAxis, slice_coordinate: f64) {
        for p in &mut self.points {
            let [x, y, _] = *p;
            *p = match axis {
                VolumeAxis::X => [slice_coordinate, x, y],
                VolumeAxis::Y => [x, slice_coordinate, y],
                VolumeAxis::Z => [x, y, slice_coordinate],
                _ => *p,
            };
        }
    }
}

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

fn lerp(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_preserves_endpoints_and_spacing() {
        let mut buf = LinearObjectBuffer::default();
        buf.append([0.0, 0.0, 0.0]);
        buf.append([10.0, 0.0, 0.0]);
        buf.append([10.0, 10.0, 0.0]);
        buf.append([0.0, 10.0, 0.0]);
        let density = 3.0;
        buf.resample_to_density(density, 2);

        let pts = buf.points();
        assert_eq!(pts[0], [0.0, 0.0, 0.0]);
        assert_eq!(*pts.last().unwrap(), [0.0, 10.0, 0.0]);
        for w in pts.windows(2) {
            let d = distance(w[0], w[1]);
            assert!(d >= density / 2.0 && d <= density * 2.0, "spacing {d}");
        }
    }

    #[test]
    fn resample_respects_minimum_points() {
        let mut buf = LinearObjectBuffer::default();
        buf.append([0.0, 0.0, 0.0]);
        buf.append([1.0, 0.0, 0.0]);
        let count = buf.resample_to_density(100.0, 2);
        assert_eq!(count, 2);
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn splice_wraps_when_start_precedes_end() {
        // Border with 10 points; picking links 2 and 7 walks 2->0 then 9->7.
        let border: Vec<[f64; 3]> = (0..10).map(|i| [i as f64, 0.0, 0.0]).collect();
        let mut buf = LinearObjectBuffer::default();
        buf.splice_from_border(&border, 2, 7);
        let xs: Vec<f64> = buf.points().iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![2.0, 1.0, 0.0, 9.0, 8.0, 7.0]);
    }

    #[test]
    fn splice_walks_directly_when_start_follows_end() {
        let border: Vec<[f64; 3]> = (0..10).map(|i| [i as f64, 0.0, 0.0]).collect();
        let mut buf = LinearObjectBuffer::default();
        buf.splice_from_border(&border, 7, 2);
        let xs: Vec<f64> = buf.points().iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0]);
    }

    #[test]
    fn close_duplicates_first_point() {
        let mut buf = LinearObjectBuffer::default();
        buf.append([1.0, 2.0, 3.0]);
        buf.append([4.0, 5.0, 6.0]);
        buf.close();
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.get(0), buf.get(2));
    }

    #[test]
    fn collapse_remaps_in_plane_coordinates() {
        let mut buf = LinearObjectBuffer::default();
        buf.append([3.0, 4.0, 0.0]);
        let mut x = buf.clone();
        x.collapse_to_slice(VolumeAxis::X, 7.0);
        assert_eq!(x.get(0).unwrap(), [7.0, 3.0, 4.0]);
        let mut y = buf.clone();
        y.collapse_to_slice(VolumeAxis::Y, 7.0);
        assert_eq!(y.get(0).unwrap(), [3.0, 7.0, 4.0]);
        let mut z = buf.clone();
        z.collapse_to_slice(VolumeAxis::Z, 7.0);
        assert_eq!(z.get(0).unwrap(), [3.0, 4.0, 7.0]);
    }
}
