//! Grid geometry: positions, row-major indices and 4-neighbourhoods.

use serde::{Deserialize, Serialize};

/// Cell position on the island, 0-based from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two positions.
    pub fn distance(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridShape {
    rows: usize,
    cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn is_border(&self, pos: Position) -> bool {
        pos.row == 0 || pos.col == 0 || pos.row + 1 == self.rows || pos.col + 1 == self.cols
    }

    pub fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.row * self.cols + pos.col)
    }

    pub fn position(&self, index: usize) -> Option<Position> {
        (index < self.cell_count()).then(|| Position {
            row: index / self.cols,
            col: index % self.cols,
        })
    }

    /// Neighbours in north, south, west, east order, clipped to the grid.
    pub fn neighbours(&self, pos: Position) -> Vec<Position> {
        let mut neighbours = Vec::with_capacity(4);

        if pos.row > 0 {
            neighbours.push(Position::new(pos.row - 1, pos.col));
        }
        if pos.row + 1 < self.rows {
            neighbours.push(Position::new(pos.row + 1, pos.col));
        }
        if pos.col > 0 {
            neighbours.push(Position::new(pos.row, pos.col - 1));
        }
        if pos.col + 1 < self.cols {
            neighbours.push(Position::new(pos.row, pos.col + 1));
        }

        neighbours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_position_conversion() {
        let grid = GridShape::new(5, 10);
        let pos = Position::new(2, 3);
        let index = grid.index(pos).unwrap();
        assert_eq!(index, 23);
        assert_eq!(grid.position(index), Some(pos));
        assert_eq!(grid.index(Position::new(5, 0)), None);
        assert_eq!(grid.position(50), None);
    }

    #[test]
    fn neighbours_are_clipped() {
        let grid = GridShape::new(5, 10);
        assert_eq!(grid.neighbours(Position::new(0, 0)).len(), 2);
        assert_eq!(
            grid.neighbours(Position::new(2, 5)),
            vec![
                Position::new(1, 5),
                Position::new(3, 5),
                Position::new(2, 4),
                Position::new(2, 6),
            ]
        );
    }

    #[test]
    fn border_detection() {
        let grid = GridShape::new(3, 4);
        assert!(grid.is_border(Position::new(0, 2)));
        assert!(grid.is_border(Position::new(1, 3)));
        assert!(grid.is_border(Position::new(2, 1)));
        assert!(!grid.is_border(Position::new(1, 1)));
        assert_eq!(Position::new(0, 0).distance(Position::new(2, 1)), 3);
    }
}
