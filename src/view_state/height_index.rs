//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Row heights are stored in whole layout units (points or cells, rounded up) so the index can
//! answer "how tall is the list" and "which row is at offset y" without re-summing every row.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: O(log n) amortized
//! - `total`: O(log n)
//! - `height`, `len`: O(1)

/// Cumulative row heights backed by a Fenwick tree.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage (1-indexed internally, 0-indexed API)
    tree: Vec<isize>,
    /// Plain heights, used for O(1) lookups and for rebuilding the tree on growth
    heights: Vec<usize>,
}

impl HeightIndex {
    /// Creates an empty index with room for `capacity` rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use reviewlist::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Builds an index over the given heights.
    ///
    /// # Examples
    ///
    /// ```
    /// # use reviewlist::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([3, 4, 5]);
    /// assert_eq!(index.total(), 12);
    /// assert_eq!(index.offset_of(2), 7);
    /// ```
    pub fn from_heights(heights: impl IntoIterator<Item = usize>) -> Self {
        let heights: Vec<usize> = heights.into_iter().collect();
        let mut index = Self::new(heights.len());
        for height in heights {
            index.push(height);
        }
        index
    }

    /// Rounds a fractional layout height up to whole units.
    pub fn units(height: f64) -> usize {
        if height.is_finite() && height > 0.0 {
            height.ceil() as usize
        } else {
            0
        }
    }

    /// Sets the height at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn set(&mut self, index: usize, height: usize) {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let delta = height as isize - self.heights[index] as isize;
        self.heights[index] = height;
        if delta != 0 {
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Height of a single row.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height(&self, index: usize) -> usize {
        self.heights[index]
    }

    /// Returns the cumulative height up to and including the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use reviewlist::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([3, 4, 5]);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let sum = fenwick::array::prefix_sum(&self.tree, index);
        sum.max(0) as usize
    }

    /// Offset of the top edge of the row at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn offset_of(&self, index: usize) -> usize {
        self.prefix_sum(index) - self.heights[index]
    }

    /// Binary search for the first index where `prefix_sum(index) > value`, i.e. the row
    /// containing vertical offset `value`.
    ///
    /// Returns `None` if `value >= total()` or the index is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use reviewlist::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights([10, 20, 15]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(100), None);
    /// ```
    pub fn lower_bound(&self, value: usize) -> Option<usize> {
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Total height of all rows.
    pub fn total(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.prefix_sum(self.len() - 1)
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// True if the index has no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Appends a row with the given height.
    pub fn push(&mut self, height: usize) {
        if self.heights.len() >= self.tree.len() {
            self.grow();
        }

        let idx = self.heights.len();
        self.heights.push(height);
        fenwick::array::update(&mut self.tree, idx, height as isize);
    }

    /// Rebuilds the tree with doubled capacity.
    ///
    /// Fenwick nodes above the old length cover ranges that include existing rows, so they
    /// cannot simply be appended as zeros.
    fn grow(&mut self) {
        let capacity = self.tree.len().max(1) * 2;
        self.tree = vec![0; capacity];
        for (idx, &height) in self.heights.iter().enumerate() {
            fenwick::array::update(&mut self.tree, idx, height as isize);
        }
    }
}
