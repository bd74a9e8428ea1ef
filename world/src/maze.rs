//! Randomized depth-first maze carving over a dense wall grid.

use maze_arcade_core::{CellCoord, CellWalls, Direction, WallGridView};

use crate::rng::SplitMix64;

/// Dense row-major grid of per-cell wall flags.
///
/// The grid is rebuilt wholesale at stage start and never mutated afterwards;
/// wall flags only change during carving, and carving keeps the facing flags
/// of adjacent cells consistent.
#[derive(Clone, Debug)]
pub(crate) struct MazeGrid {
    columns: u32,
    rows: u32,
    cells: Vec<CellWalls>,
}

impl MazeGrid {
    /// Grid with no cells, used before the first stage is generated.
    pub(crate) fn empty() -> Self {
        Self {
            columns: 0,
            rows: 0,
            cells: Vec::new(),
        }
    }

    /// Carves a perfect maze with a randomized depth-first walk.
    ///
    /// The walk starts at `(0, 0)`, always advances into a uniformly chosen
    /// unvisited neighbor, and backtracks through an explicit stack, so every
    /// cell is reached exactly once and exactly `columns * rows - 1` wall
    /// pairs are removed.
    pub(crate) fn carve(columns: u32, rows: u32, rng: &mut SplitMix64) -> Self {
        let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut grid = Self {
            columns,
            rows,
            cells: vec![CellWalls::solid(); cell_count],
        };

        if cell_count == 0 {
            return grid;
        }

        let mut visited = vec![false; cell_count];
        let mut stack: Vec<CellCoord> = Vec::new();
        let mut current = CellCoord::new(0, 0);

        loop {
            if let Some(index) = grid.index(current) {
                visited[index] = true;
            }

            let mut candidates: Vec<(Direction, CellCoord)> = Vec::with_capacity(4);
            for direction in Direction::CARDINAL {
                if let Some(neighbor) = current.neighbor(direction, columns, rows) {
                    let unvisited = grid
                        .index(neighbor)
                        .map_or(false, |index| !visited[index]);
                    if unvisited {
                        candidates.push((direction, neighbor));
                    }
                }
            }

            if candidates.is_empty() {
                match stack.pop() {
                    Some(previous) => current = previous,
                    None => break,
                }
                continue;
            }

            let (direction, next) = candidates[rng.next_index(candidates.len())];
            stack.push(current);
            grid.remove_wall_between(current, direction, next);
            current = next;
        }

        grid
    }

    /// Clears the shared wall on both sides of the edge between two cells.
    fn remove_wall_between(&mut self, from: CellCoord, direction: Direction, to: CellCoord) {
        if let Some(index) = self.index(from) {
            self.cells[index].clear(direction);
        }
        if let Some(index) = self.index(to) {
            self.cells[index].clear(direction.opposite());
        }
    }

    pub(crate) fn walls(&self, cell: CellCoord) -> Option<CellWalls> {
        self.index(cell).map(|index| self.cells[index])
    }

    pub(crate) fn view(&self) -> WallGridView<'_> {
        WallGridView::new(&self.cells, self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MazeGrid;
    use crate::rng::SplitMix64;
    use maze_arcade_core::{CellCoord, Direction};

    fn carved(columns: u32, rows: u32, seed: u64) -> MazeGrid {
        let mut rng = SplitMix64::new(seed);
        MazeGrid::carve(columns, rows, &mut rng)
    }

    #[test]
    fn every_cell_is_reachable_from_the_origin() {
        let grid = carved(12, 9, 0x5eed);
        let view = grid.view();
        let mut seen = vec![false; 12 * 9];
        let mut frontier = vec![CellCoord::new(0, 0)];
        seen[0] = true;
        let mut count = 1;

        while let Some(cell) = frontier.pop() {
            for direction in view.open_directions(cell) {
                let neighbor = cell
                    .neighbor(direction, 12, 9)
                    .expect("open directions stay in bounds");
                let index = (neighbor.row() * 12 + neighbor.column()) as usize;
                if !seen[index] {
                    seen[index] = true;
                    count += 1;
                    frontier.push(neighbor);
                }
            }
        }

        assert_eq!(count, 12 * 9, "maze must be fully connected");
    }

    #[test]
    fn carved_wall_pairs_form_a_spanning_tree() {
        let columns = 10;
        let rows = 7;
        let grid = carved(columns, rows, 0xfeed);
        let view = grid.view();

        // Count each removed edge once, from its west/north side.
        let mut open_edges = 0;
        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                if view.is_open(cell, Direction::East) && column + 1 < columns {
                    open_edges += 1;
                }
                if view.is_open(cell, Direction::South) && row + 1 < rows {
                    open_edges += 1;
                }
            }
        }

        assert_eq!(open_edges, columns * rows - 1);
    }

    #[test]
    fn facing_wall_flags_stay_symmetric() {
        let columns = 8;
        let rows = 8;
        let grid = carved(columns, rows, 0xabcd);
        let view = grid.view();

        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                for direction in Direction::CARDINAL {
                    let Some(neighbor) = cell.neighbor(direction, columns, rows) else {
                        continue;
                    };
                    assert_eq!(
                        view.is_open(cell, direction),
                        view.is_open(neighbor, direction.opposite()),
                        "asymmetric wall between {cell:?} and {neighbor:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn perimeter_walls_are_never_carved() {
        let columns = 6;
        let rows = 5;
        let grid = carved(columns, rows, 0x1234);
        let view = grid.view();

        for column in 0..columns {
            assert!(!view.is_open(CellCoord::new(column, 0), Direction::North));
            assert!(!view.is_open(CellCoord::new(column, rows - 1), Direction::South));
        }
        for row in 0..rows {
            assert!(!view.is_open(CellCoord::new(0, row), Direction::West));
            assert!(!view.is_open(CellCoord::new(columns - 1, row), Direction::East));
        }
    }

    #[test]
    fn identical_seeds_carve_identical_mazes() {
        let first = carved(9, 9, 77);
        let second = carved(9, 9, 77);
        for row in 0..9 {
            for column in 0..9 {
                let cell = CellCoord::new(column, row);
                assert_eq!(first.walls(cell), second.walls(cell));
            }
        }
    }

    #[test]
    fn empty_grid_carves_nothing() {
        let grid = carved(0, 0, 1);
        assert!(grid.walls(CellCoord::new(0, 0)).is_none());
    }
}
