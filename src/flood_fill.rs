// Reachable-area counting used for trap detection

use crate::grid::{neighbors, Grid, NeighborMode, Position, Tile};

/// Counts open tiles reachable from `start`, stopping once `budget` tiles
/// have been counted.
///
/// Visited tiles are overwritten with `Tile::Visited`, so callers pass a
/// scratch copy of the grid. `start` itself is counted only if it is open.
pub fn flood_fill(start: Position, grid: &mut Grid, budget: usize) -> usize {
    let mut count = 0;
    if budget == 0 || !grid.get(start).map_or(false, |t| t.is_open()) {
        return count;
    }

    grid.set(start, Tile::Visited);
    count += 1;
    let mut stack = vec![start];

    while let Some(pos) = stack.pop() {
        for next in neighbors(pos, grid, NeighborMode::Safe) {
            if count >= budget {
                return count;
            }
            grid.set(next, Tile::Visited);
            count += 1;
            stack.push(next);
        }
    }

    count
}

/// Search budget for a snake: twice its length plus the food on the board
pub fn reach_budget(body_len: usize, food_count: usize) -> usize {
    2 * body_len + food_count
}
