//! Board module - the committed play field of one session.
//!
//! A 10x18 grid of cells stored as a flat array, row-major. Each cell is
//! empty or holds a locked piece. The board is owned exclusively by one
//! session worker and is only mutated when a piece locks; every other view
//! of the field goes through the derived [`Canvas`].
//!
//! Coordinates: (x, y) with x in 0..10 left to right, y in 0..18 top to
//! bottom.

use arrayvec::ArrayVec;

use crate::types::{Cell, PieceKind, FIELD_HEIGHT, FIELD_SIZE, FIELD_WIDTH};

use super::pieces::PieceShape;

/// The committed field of locked cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; FIELD_SIZE],
}

impl Board {
    /// Create a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [None; FIELD_SIZE],
        }
    }

    /// Calculate flat index from (x, y); `None` when out of bounds.
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= FIELD_WIDTH as i8 || y < 0 || y >= FIELD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (FIELD_WIDTH as usize) + (x as usize))
    }

    /// Get cell at (x, y); `None` when out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at (x, y); returns false when out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty.
    pub fn is_vacant(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// A row is full iff no cell in it is empty.
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= FIELD_HEIGHT as usize {
            return false;
        }
        let start = y * FIELD_WIDTH as usize;
        let end = start + FIELD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Clear all full rows, collapsing everything above them down.
    ///
    /// Returns the cleared row indices in bottom-to-top order (descending).
    /// A single lock can complete at most 4 rows.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, 4> {
        let mut cleared_rows = ArrayVec::new();
        let width = FIELD_WIDTH as usize;
        let mut write_y = FIELD_HEIGHT as usize;

        // Two-pointer compaction, scanning bottom to top.
        for read_y in (0..FIELD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Blank the vacated rows at the top.
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared_rows
    }

    /// Lock a piece shape into the board at the given anchor.
    ///
    /// The caller has already validated the placement; cells outside the
    /// board are ignored rather than wrapped.
    pub fn lock(&mut self, shape: &PieceShape, x: i8, y: i8, kind: PieceKind) {
        for &(dx, dy) in shape {
            self.set(x + dx, y + dy, Some(kind));
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Raw cells, row-major.
    pub fn cells(&self) -> &[Cell; FIELD_SIZE] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Derived render view: the board with the falling piece overlaid.
///
/// Holds wire-ready glyph bytes (space = empty). Never persisted and never
/// written back to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    cells: [u8; FIELD_SIZE],
}

impl Canvas {
    /// Snapshot the committed board into glyph bytes.
    pub fn of_board(board: &Board) -> Self {
        let mut cells = [b' '; FIELD_SIZE];
        for (slot, cell) in cells.iter_mut().zip(board.cells().iter()) {
            if let Some(kind) = cell {
                *slot = kind.glyph();
            }
        }
        Self { cells }
    }

    /// Overlay a piece shape; cells outside the field are skipped.
    pub fn overlay(&mut self, shape: &PieceShape, x: i8, y: i8, kind: PieceKind) {
        for &(dx, dy) in shape {
            if let Some(idx) = Board::index(x + dx, y + dy) {
                self.cells[idx] = kind.glyph();
            }
        }
    }

    pub fn cells(&self) -> &[u8; FIELD_SIZE] {
        &self.cells
    }

    /// One display row of glyph bytes.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * FIELD_WIDTH as usize;
        &self.cells[start..start + FIELD_WIDTH as usize]
    }
}

impl From<[u8; FIELD_SIZE]> for Canvas {
    fn from(cells: [u8; FIELD_SIZE]) -> Self {
        Self { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: i8, kind: PieceKind) {
        for x in 0..FIELD_WIDTH as i8 {
            board.set(x, y, Some(kind));
        }
    }

    #[test]
    fn test_index_bounds() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 17), Some(FIELD_SIZE - 1));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 18), None);
    }

    #[test]
    fn test_row_full_detection() {
        let mut board = Board::new();
        assert!(!board.is_row_full(17));

        fill_row(&mut board, 17, PieceKind::T);
        assert!(board.is_row_full(17));

        board.set(4, 17, None);
        assert!(!board.is_row_full(17));
    }

    #[test]
    fn test_clear_single_row_shifts_above() {
        let mut board = Board::new();
        fill_row(&mut board, 17, PieceKind::O);
        board.set(3, 16, Some(PieceKind::I));

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[17]);

        // The lone cell above dropped into the cleared row.
        assert_eq!(board.get(3, 17), Some(Some(PieceKind::I)));
        assert_eq!(board.get(3, 16), Some(None));
    }

    #[test]
    fn test_clear_nonadjacent_rows() {
        let mut board = Board::new();
        fill_row(&mut board, 17, PieceKind::Z);
        fill_row(&mut board, 15, PieceKind::S);
        board.set(0, 16, Some(PieceKind::L));

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[17, 15]);

        // The partial row between them survives, now at the bottom.
        assert_eq!(board.get(0, 17), Some(Some(PieceKind::L)));
        for y in 0..17 {
            assert!(!board.is_row_full(y as usize));
            assert_eq!(board.get(0, y), Some(None));
        }
    }

    #[test]
    fn test_canvas_overlay_does_not_touch_board() {
        let mut board = Board::new();
        board.set(0, 17, Some(PieceKind::J));
        let before = board.clone();

        let mut canvas = Canvas::of_board(&board);
        canvas.overlay(&[(0, 0), (1, 0), (0, 1), (1, 1)], 4, 0, PieceKind::O);

        assert_eq!(board, before);
        assert_eq!(canvas.row(17)[0], b'J');
        assert_eq!(canvas.row(0)[4], b'O');
        assert_eq!(canvas.row(0)[6], b' ');
    }
}
