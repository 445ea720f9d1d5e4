//! Grid geometry for the hex view.
//!
//! Maps between local cell ids (row-major, `id = row * columns + column`) and
//! absolute file offsets. Everything here is pure arithmetic.

/// Number of byte columns in a row.
pub const COLUMNS: usize = 16;

/// Rows and columns of the visible cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Visible rows.
    pub rows: usize,
    /// Bytes per row, always [`COLUMNS`] for geometries built by
    /// [`Geometry::new`].
    pub columns: usize,
}

impl Geometry {
    /// Creates a geometry with the standard 16 columns. `rows` is raised to 1.
    pub fn new(rows: usize) -> Self {
        Self {
            rows: rows.max(1),
            columns: COLUMNS,
        }
    }

    /// Number of cells in the window.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_hexview::geometry::Geometry;
    ///
    /// let g = Geometry::new(2);
    /// assert_eq!(g.page_size(), 32);
    /// assert_eq!(g.max_id(), 31);
    /// assert_eq!(g.max_window_start(40), 8);
    /// ```
    pub fn page_size(&self) -> usize {
        self.rows * self.columns
    }

    /// Largest valid cell id.
    pub fn max_id(&self) -> usize {
        self.page_size() - 1
    }

    /// Cell id of `row`/`column`, counted row-major from the top left.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_hexview::geometry::Geometry;
    ///
    /// let g = Geometry::new(4);
    /// let id = g.cell_id(2, 5);
    /// assert_eq!(id, 37);
    /// assert_eq!((g.row_of(id), g.column_of(id)), (2, 5));
    /// ```
    pub fn cell_id(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    /// Row of cell `id`.
    pub fn row_of(&self, id: usize) -> usize {
        id / self.columns
    }

    /// Column of cell `id`.
    pub fn column_of(&self, id: usize) -> usize {
        id % self.columns
    }

    /// Whether cell `id` sits in the top row.
    pub fn in_first_row(&self, id: usize) -> bool {
        id < self.columns
    }

    /// Whether cell `id` sits in the bottom row.
    pub fn in_last_row(&self, id: usize) -> bool {
        id >= self.page_size() - self.columns
    }

    /// Absolute offset of the cell at `row`/`column`.
    pub fn cell_offset(&self, window_start: u64, row: usize, column: usize) -> u64 {
        window_start + self.cell_id(row, column) as u64
    }

    /// [`max_window_start`] for this page size.
    pub fn max_window_start(&self, file_size: u64) -> u64 {
        max_window_start(file_size, self.page_size())
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(16)
    }
}

/// Last window start that still fills a whole page, or 0 for short files.
pub fn max_window_start(file_size: u64, page_size: usize) -> u64 {
    file_size.saturating_sub(page_size as u64)
}

/// Whether cell `id` of the window starting at `window_start` holds file data.
pub fn is_cell_in_range(window_start: u64, id: usize, file_size: u64) -> bool {
    window_start + (id as u64) < file_size
}

/// Highest cell id holding data, or `None` when the window is past the end.
pub fn last_cell_in_range(window_start: u64, page_size: usize, file_size: u64) -> Option<usize> {
    let available = file_size.checked_sub(window_start)?;
    if available == 0 {
        return None;
    }
    Some((available.min(page_size as u64) - 1) as usize)
}
