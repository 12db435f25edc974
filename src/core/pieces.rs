//! Tetromino shapes with precomputed per-rotation cell offsets.
//!
//! Each shape is anchored at the top-left of its tight bounding box; the
//! four orientations are the discrete rotations of the canonical shape
//! matrix, tabulated so the hot path never re-derives them.

use crate::types::PieceKind;

/// Offset of a single cell relative to the piece anchor (column, row).
pub type CellOffset = (i8, i8);

/// Occupied cells of a piece in one orientation.
pub type PieceShape = [CellOffset; 4];

/// Rotation states; `Cw` steps North -> East -> South -> West.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub fn rotate_cw(self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    pub fn rotate_ccw(self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }
}

/// Get the occupied-cell offsets for a piece kind and rotation.
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::Z => get_z_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::I => get_i_shape(rotation),
    }
}

/// Width of the bounding box in the given rotation (for spawn placement).
pub fn shape_width(kind: PieceKind, rotation: Rotation) -> u8 {
    let shape = get_shape(kind, rotation);
    shape.iter().map(|&(dx, _)| dx).max().unwrap_or(0) as u8 + 1
}

/// Z piece: `## ` / ` ##`
fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North | Rotation::South => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East | Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

/// L piece: `###` / `#  `
fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (2, 0), (0, 1)],
        Rotation::East => [(0, 0), (1, 0), (1, 1), (1, 2)],
        Rotation::South => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::West => [(0, 0), (0, 1), (0, 2), (1, 2)],
    }
}

/// T piece: `###` / ` # `
fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (2, 0), (1, 1)],
        Rotation::East => [(1, 0), (0, 1), (1, 1), (1, 2)],
        Rotation::South => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (0, 2)],
    }
}

/// O piece: rotation invariant.
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(0, 0), (1, 0), (0, 1), (1, 1)]
}

/// J piece: `#  ` / `###`
fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(0, 0), (1, 0), (0, 1), (0, 2)],
        Rotation::South => [(0, 0), (1, 0), (2, 0), (2, 1)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

/// S piece: ` ##` / `## `
fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North | Rotation::South => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East | Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// I piece: vertical 1x4 column in its canonical orientation.
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North | Rotation::South => [(0, 0), (0, 1), (0, 2), (0, 3)],
        Rotation::East | Rotation::West => [(0, 0), (1, 0), (2, 0), (3, 0)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_has_four_cells_in_bounds() {
        for kind in PieceKind::ALL {
            for rotation in [
                Rotation::North,
                Rotation::East,
                Rotation::South,
                Rotation::West,
            ] {
                let shape = get_shape(kind, rotation);
                assert_eq!(shape.len(), 4);
                for &(dx, dy) in &shape {
                    assert!((0..4).contains(&dx), "{kind:?} {rotation:?} dx={dx}");
                    assert!((0..4).contains(&dy), "{kind:?} {rotation:?} dy={dy}");
                }
            }
        }
    }

    #[test]
    fn test_rotate_cw_four_times_is_identity() {
        for kind in PieceKind::ALL {
            let mut rotation = Rotation::North;
            let original = get_shape(kind, rotation);
            for _ in 0..4 {
                rotation = rotation.rotate_cw();
            }
            assert_eq!(rotation, Rotation::North);
            assert_eq!(get_shape(kind, rotation), original);
        }
    }

    #[test]
    fn test_cw_then_ccw_is_identity() {
        for kind in PieceKind::ALL {
            let rotation = Rotation::East.rotate_cw().rotate_ccw();
            assert_eq!(rotation, Rotation::East);
            let _ = kind;
        }
    }

    #[test]
    fn test_shape_widths() {
        assert_eq!(shape_width(PieceKind::I, Rotation::North), 1);
        assert_eq!(shape_width(PieceKind::I, Rotation::East), 4);
        assert_eq!(shape_width(PieceKind::O, Rotation::South), 2);
        assert_eq!(shape_width(PieceKind::T, Rotation::North), 3);
        assert_eq!(shape_width(PieceKind::T, Rotation::West), 2);
    }
}
