//! Caller-owned per-pixel buffers.
//!
//! A [`DepthImage`] holds the nearest distance seen at each pixel, `0.0`
//! meaning nothing has been written yet. [`OwnerMap`] and [`TriangleMap`] run
//! parallel to it and record which shape and which mesh triangle produced
//! the stored depth.

/// Dense row-major grid indexed by `(x, y)` = (column, row).
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMap<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> PixelMap<T> {
    /// Grid filled with `T::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![T::default(); width * height],
        }
    }

    /// A 0×0 grid.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    /// Reset every cell to `T::default()`.
    pub fn clear(&mut self) {
        self.cells.fill(T::default());
    }

    /// Make the grid `width`×`height`.
    ///
    /// Returns `true` when the size changed, in which case every cell is reset
    /// to `T::default()`. A grid that already has the right size keeps its
    /// contents.
    pub fn fit(&mut self, width: usize, height: usize) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width * height, T::default());
        true
    }
}

impl<T> PixelMap<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn same_size<U>(&self, other: &PixelMap<U>) -> bool {
        self.width == other.width && self.height == other.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Overwrite a cell; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = value;
        }
    }

    /// Row-major view of all cells.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Iterate `(x, y, value)` over all cells.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, value)| (i % width, i / width, value))
    }
}

/// Value of a depth cell that has never been written.
pub const UNWRITTEN: f32 = 0.0;

/// Per-pixel nearest depth.
pub type DepthImage = PixelMap<f32>;

impl PixelMap<f32> {
    /// Stored depth, or `None` for an unwritten or out-of-range pixel.
    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        self.get(x, y).copied().filter(|d| *d != UNWRITTEN)
    }

    /// Nearest-wins write: store `depth` if the pixel is unwritten or holds
    /// a strictly greater value. Returns whether the pixel changed.
    #[inline]
    pub fn write_nearest(&mut self, x: usize, y: usize, depth: f32) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        let current = self.cells[i];
        if current == UNWRITTEN || current > depth {
            self.cells[i] = depth;
            true
        } else {
            false
        }
    }

    /// Number of pixels holding a depth.
    pub fn written_count(&self) -> usize {
        self.cells.iter().filter(|d| **d != UNWRITTEN).count()
    }
}

/// Opaque tag a caller attaches to the pixels a shape claims.
///
/// The map never owns what the tag refers to; typically it indexes a table of
/// shapes kept by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u32);

/// Which shape owns each pixel.
pub type OwnerMap = PixelMap<Option<OwnerId>>;

/// Which mesh triangle produced each pixel.
pub type TriangleMap = PixelMap<Option<u32>>;

/// Depth image plus its attribution maps.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub depth: DepthImage,
    pub owners: OwnerMap,
    pub triangles: TriangleMap,
}

impl FrameBuffer {
    /// Unwritten depth image; the attribution maps stay 0×0 until
    /// [`FrameBuffer::fit_maps`] sizes them.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            depth: DepthImage::new(width, height),
            owners: OwnerMap::empty(),
            triangles: TriangleMap::empty(),
        }
    }

    pub fn width(&self) -> usize {
        self.depth.width()
    }

    pub fn height(&self) -> usize {
        self.depth.height()
    }

    /// Size the attribution maps like the depth image. Maps that already
    /// match keep their contents.
    pub fn fit_maps(&mut self) {
        let (width, height) = (self.depth.width(), self.depth.height());
        self.owners.fit(width, height);
        self.triangles.fit(width, height);
    }

    /// Reset depth and attribution for a new scene.
    pub fn clear(&mut self) {
        self.depth.clear();
        self.clear_attribution();
    }

    /// Reset only the owner and triangle maps.
    pub fn clear_attribution(&mut self) {
        self.owners.clear();
        self.triangles.clear();
    }

    /// Record a nearer depth and tag the pixel. Returns whether it was written.
    #[inline]
    pub(crate) fn plot(
        &mut self,
        x: usize,
        y: usize,
        depth: f32,
        owner: Option<OwnerId>,
        triangle: u32,
    ) -> bool {
        if !self.depth.write_nearest(x, y, depth) {
            return false;
        }
        if owner.is_some() {
            self.owners.set(x, y, owner);
        }
        self.triangles.set(x, y, Some(triangle));
        true
    }
}

/// Pixel rectangle touched by one rasterize call, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizeResult {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl RasterizeResult {
    /// Inverted rectangle for an image: `min` at the image extent, `max` at 0.
    pub fn inverted(width: usize, height: usize) -> Self {
        Self {
            min_x: width as i32,
            min_y: height as i32,
            max_x: 0,
            max_y: 0,
        }
    }

    /// True when nothing was touched.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Grow to cover `[min_x, max_x] × [min_y, max_y]`, clamped to the image.
    pub(crate) fn expand(
        &mut self,
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
        width: usize,
        height: usize,
    ) {
        self.min_x = self.min_x.min(min_x).max(0);
        self.min_y = self.min_y.min(min_y).max(0);
        self.max_x = self.max_x.max(max_x).min(width as i32 - 1);
        self.max_y = self.max_y.max(max_y).min(height as i32 - 1);
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        let (x, y) = (x as i32, y as i32);
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_nearest() {
        let mut image = DepthImage::new(2, 2);
        assert!(image.write_nearest(1, 0, 3.0));
        assert!(!image.write_nearest(1, 0, 4.0));
        assert!(!image.write_nearest(1, 0, 3.0));
        assert!(image.write_nearest(1, 0, 2.5));
        assert_eq!(image.depth(1, 0), Some(2.5));
        assert_eq!(image.depth(0, 0), None);
        assert!(!image.write_nearest(5, 5, 1.0));
        assert_eq!(image.written_count(), 1);
    }

    #[test]
    fn test_fit_keeps_matching_map() {
        let mut map = TriangleMap::new(3, 2);
        map.set(2, 1, Some(7));
        assert!(!map.fit(3, 2));
        assert_eq!(map.get(2, 1), Some(&Some(7)));

        assert!(map.fit(4, 4));
        assert_eq!(map.width(), 4);
        assert!(map.as_slice().iter().all(|t| t.is_none()));
    }

    #[test]
    fn test_frame_buffer_fit_maps() {
        let mut frame = FrameBuffer::new(5, 3);
        assert_eq!(frame.owners.width(), 0);
        frame.fit_maps();
        assert!(frame.owners.same_size(&frame.depth));
        assert!(frame.triangles.same_size(&frame.depth));
    }

    #[test]
    fn test_plot_tags_only_on_write() {
        let mut frame = FrameBuffer::new(2, 2);
        frame.fit_maps();

        assert!(frame.plot(0, 0, 2.0, Some(OwnerId(1)), 4));
        assert!(!frame.plot(0, 0, 3.0, Some(OwnerId(2)), 5));
        assert_eq!(frame.owners.get(0, 0), Some(&Some(OwnerId(1))));
        assert_eq!(frame.triangles.get(0, 0), Some(&Some(4)));

        // No owner given: the previous owner stays
        assert!(frame.plot(0, 0, 1.0, None, 6));
        assert_eq!(frame.owners.get(0, 0), Some(&Some(OwnerId(1))));
        assert_eq!(frame.triangles.get(0, 0), Some(&Some(6)));
    }

    #[test]
    fn test_clear() {
        let mut frame = FrameBuffer::new(2, 2);
        frame.fit_maps();
        frame.plot(1, 1, 2.0, Some(OwnerId(3)), 0);
        frame.clear();
        assert_eq!(frame.depth.written_count(), 0);
        assert_eq!(frame.owners.get(1, 1), Some(&None));
        assert_eq!(frame.triangles.get(1, 1), Some(&None));
    }

    #[test]
    fn test_rasterize_result() {
        let mut res = RasterizeResult::inverted(4, 4);
        assert!(res.is_empty());

        res.expand(-3, 1, 2, 9, 4, 4);
        assert_eq!(
            res,
            RasterizeResult {
                min_x: 0,
                min_y: 1,
                max_x: 2,
                max_y: 3
            }
        );
        assert!(!res.is_empty());
        assert!(res.contains(0, 3));
        assert!(!res.contains(3, 0));
    }

    #[test]
    fn test_iter_coordinates() {
        let mut map = DepthImage::new(3, 2);
        map.set(2, 1, 5.0);
        let found: Vec<_> = map.iter().filter(|(_, _, d)| **d > 0.0).collect();
        assert_eq!(found, vec![(2, 1, &5.0)]);
    }
}
