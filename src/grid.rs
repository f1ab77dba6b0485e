// Board grid used by the search engine
//
// Positions are 1-based with y growing downward, so (1, 1) is the top-left
// corner. The wire protocol's coordinates are translated in the payload module.

use crate::types::Direction;

/// Engine coordinate, 1-based, bounded by the grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn manhattan(&self, other: &Position) -> i64 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as i64
    }

    /// Direction of a single orthogonal step from `self` to `dst`.
    /// Returns `None` for anything that is not a unit step.
    pub fn direction_to(&self, dst: &Position) -> Option<Direction> {
        match (dst.x - self.x, dst.y - self.y) {
            (1, 0) => Some(Direction::Right),
            (-1, 0) => Some(Direction::Left),
            (0, 1) => Some(Direction::Down),
            (0, -1) => Some(Direction::Up),
            _ => None,
        }
    }

    /// Candidate steps in north, south, east, west order
    fn adjacent(&self) -> [Position; 4] {
        [
            Position::new(self.x, self.y - 1),
            Position::new(self.x, self.y + 1),
            Position::new(self.x + 1, self.y),
            Position::new(self.x - 1, self.y),
        ]
    }
}

/// Cell content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Food,
    SnakeHead,
    SnakeBody,
    /// `vacating` is true when the tail moves away next turn. A tail stacked on
    /// the segment before it (just ate, or game start) stays put.
    SnakeTail { vacating: bool },
    /// Marker left behind by flood fill on its scratch copy
    Visited,
}

impl Tile {
    /// Tiles a head may move onto without dying
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            Tile::Empty | Tile::Food | Tile::SnakeTail { vacating: true }
        )
    }

    pub fn is_snake(&self) -> bool {
        matches!(
            self,
            Tile::SnakeHead | Tile::SnakeBody | Tile::SnakeTail { .. }
        )
    }
}

/// Which candidate tiles `neighbors` accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborMode {
    /// Empty, food and vacating tails
    Safe,
    /// Safe tiles plus enemy heads, for the head-on-neck rule
    SafeOrHeads,
    /// Any in-bounds tile; last-resort fallback when nothing is safe
    InBounds,
}

impl NeighborMode {
    pub fn for_rules(head_on_neck: bool) -> Self {
        if head_on_neck {
            NeighborMode::SafeOrHeads
        } else {
            NeighborMode::Safe
        }
    }

    fn accepts(&self, tile: Tile) -> bool {
        match self {
            NeighborMode::Safe => tile.is_open(),
            NeighborMode::SafeOrHeads => tile.is_open() || tile == Tile::SnakeHead,
            NeighborMode::InBounds => true,
        }
    }
}

/// Fixed-size tile grid, sized once per turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates an all-empty grid
    pub fn new(width: i32, height: i32) -> Result<Self, String> {
        if width <= 0 || height <= 0 {
            return Err(format!("Invalid grid dimensions {}x{}", width, height));
        }
        let tile_count = width
            .checked_mul(height)
            .ok_or_else(|| format!("Grid dimensions {}x{} are too large", width, height))?;
        Ok(Grid {
            width,
            height,
            tiles: vec![Tile::Empty; tile_count as usize],
        })
    }

    /// Builds the tile grid for one turn.
    ///
    /// Food is placed first. For each snake, heads always overwrite, body
    /// segments never overwrite a head, and the tail never overwrites a head or
    /// body segment.
    pub fn build(
        width: i32,
        height: i32,
        food: &[Position],
        snakes: &[&[Position]],
    ) -> Result<Self, String> {
        let mut grid = Grid::new(width, height)?;

        for pos in food {
            grid.place(*pos, Tile::Food)?;
        }

        for body in snakes {
            let (head, rest) = body
                .split_first()
                .ok_or_else(|| "Cannot place a snake with an empty body".to_string())?;
            grid.place(*head, Tile::SnakeHead)?;

            if let Some((tail, middle)) = rest.split_last() {
                for segment in middle {
                    if grid.get(*segment) != Some(Tile::SnakeHead) {
                        grid.place(*segment, Tile::SnakeBody)?;
                    }
                }

                let before_tail = middle.last().unwrap_or(head);
                let tile = Tile::SnakeTail {
                    vacating: tail != before_tail,
                };
                match grid.get(*tail) {
                    Some(Tile::SnakeHead) | Some(Tile::SnakeBody) => {}
                    _ => grid.place(*tail, tile)?,
                }
            }
        }

        Ok(grid)
    }

    fn place(&mut self, pos: Position, tile: Tile) -> Result<(), String> {
        if !self.in_bounds(pos) {
            return Err(format!("Position ({}, {}) is off the board", pos.x, pos.y));
        }
        self.set(pos, tile);
        Ok(())
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 1 && pos.x <= self.width && pos.y >= 1 && pos.y <= self.height
    }

    /// True for tiles on the outermost row or column
    pub fn on_edge(&self, pos: Position) -> bool {
        pos.x == 1 || pos.y == 1 || pos.x == self.width || pos.y == self.height
    }

    fn index(&self, pos: Position) -> usize {
        ((pos.y - 1) * self.width + (pos.x - 1)) as usize
    }

    pub fn get(&self, pos: Position) -> Option<Tile> {
        if self.in_bounds(pos) {
            Some(self.tiles[self.index(pos)])
        } else {
            None
        }
    }

    /// Overwrites a tile. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, tile: Tile) {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            self.tiles[idx] = tile;
        }
    }

    /// Food positions in row-major order (top row first, left to right)
    pub fn food(&self) -> Vec<Position> {
        let mut food = Vec::new();
        for y in 1..=self.height {
            for x in 1..=self.width {
                let pos = Position::new(x, y);
                if self.get(pos) == Some(Tile::Food) {
                    food.push(pos);
                }
            }
        }
        food
    }
}

/// Orthogonal in-bounds neighbours of `pos` accepted by `mode`, in north,
/// south, east, west order
pub fn neighbors(pos: Position, grid: &Grid, mode: NeighborMode) -> Vec<Position> {
    let mut result = Vec::with_capacity(4);
    for candidate in pos.adjacent().iter() {
        if let Some(tile) = grid.get(*candidate) {
            if mode.accepts(tile) {
                result.push(*candidate);
            }
        }
    }
    result
}
