use glam::{IVec2, Vec2};

use super::level::WorldError;

/// Tile value of an empty cell.
pub const EMPTY: u32 = 0;

/// Why a probe reported the point as occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// A solid tile with this id.
    Tile(u32),
    /// The point lies outside the layer. Levels are closed, so the void is solid.
    OutOfBounds,
}

/// Result of a blocked probe. `None` from a probe means "free".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub layer: u32,
    pub cell: IVec2,
    pub kind: CollisionKind,
}

/// Anything that can answer "is this point occupied?".
pub trait CollisionWorld {
    /// Probe point `(x, y, z)` in `layer`. `None` means unoccupied.
    fn probe(&self, layer: u32, x: f32, y: f32, z: f32) -> Option<Collision>;
}

/// Adapts a plain closure into a [`CollisionWorld`].
///
/// ```
/// use gridcrawl::world::{CollisionWorld, ProbeFn};
/// let open = ProbeFn::new(|_layer, _x, _y, _z| None);
/// assert!(open.probe(0, 3.0, 4.0, 0.0).is_none());
/// ```
pub struct ProbeFn<F>(pub F);

impl<F> ProbeFn<F>
where
    F: Fn(u32, f32, f32, f32) -> Option<Collision>,
{
    pub fn new(probe: F) -> Self {
        Self(probe)
    }
}

impl<F> CollisionWorld for ProbeFn<F>
where
    F: Fn(u32, f32, f32, f32) -> Option<Collision>,
{
    fn probe(&self, layer: u32, x: f32, y: f32, z: f32) -> Option<Collision> {
        (self.0)(layer, x, y, z)
    }
}

/// One layer of tiles, stored row-major: index = y * width + x.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Solid tiles block probes with `0 <= z < wall_height`.
    pub wall_height: f32,
    tiles: Vec<u32>,
}

impl GridLayer {
    /// Create an empty layer.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            wall_height: 1.0,
            tiles: vec![EMPTY; width as usize * height as usize],
        }
    }

    /// Build a layer from text rows; row `i` is `y = i`.
    ///
    /// `.` and space are empty, `#` is tile 1, and `0-9`/`a-z` map to
    /// their base-36 value (so `0` is also empty).
    pub fn from_rows<S: AsRef<str>>(name: impl Into<String>, rows: &[S]) -> Result<Self, WorldError> {
        let name = name.into();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let mut tiles = Vec::with_capacity(width * rows.len());

        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(WorldError::RaggedRow {
                    layer: name,
                    row: row_idx,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in row.chars().enumerate() {
                let tile = match ch {
                    '.' | ' ' => EMPTY,
                    '#' => 1,
                    c => match c.to_digit(36) {
                        Some(v) => v,
                        None => {
                            return Err(WorldError::BadTile {
                                layer: name,
                                row: row_idx,
                                col,
                                ch: c,
                            })
                        }
                    },
                };
                tiles.push(tile);
            }
        }

        Ok(Self {
            name,
            width: width as u32,
            height: rows.len() as u32,
            wall_height: 1.0,
            tiles,
        })
    }

    pub fn with_wall_height(mut self, wall_height: f32) -> Self {
        self.wall_height = wall_height;
        self
    }

    /// Tile at cell (x, y), or None outside the layer.
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(self.tiles[self.index(x as u32, y as u32)])
    }

    /// Set the tile at cell (x, y). Out-of-range writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, tile: u32) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.tiles[idx] = tile;
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|t| t != EMPTY)
    }

    /// Count of non-empty tiles.
    pub fn solid_count(&self) -> usize {
        self.tiles.iter().filter(|&&t| t != EMPTY).count()
    }
}

/// Layered tile grid implementing [`CollisionWorld`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridWorld {
    /// Size of one cell in world units.
    pub tile_size: f32,
    /// World position of cell (0, 0)'s minimum corner.
    pub origin: Vec2,
    layers: Vec<GridLayer>,
}

impl GridWorld {
    pub fn new(tile_size: f32) -> Self {
        Self {
            tile_size,
            origin: Vec2::ZERO,
            layers: Vec::new(),
        }
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_layer(mut self, layer: GridLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Append a layer; returns its index.
    pub fn push_layer(&mut self, layer: GridLayer) -> u32 {
        self.layers.push(layer);
        (self.layers.len() - 1) as u32
    }

    pub fn layer(&self, index: u32) -> Option<&GridLayer> {
        self.layers.get(index as usize)
    }

    pub fn layer_mut(&mut self, index: u32) -> Option<&mut GridLayer> {
        self.layers.get_mut(index as usize)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Cell containing a world position (floored, may be out of range).
    pub fn world_to_cell(&self, pos: Vec2) -> IVec2 {
        ((pos - self.origin) / self.tile_size).floor().as_ivec2()
    }

    /// World position of a cell's center.
    pub fn cell_center(&self, cell: IVec2) -> Vec2 {
        self.origin + (cell.as_vec2() + Vec2::splat(0.5)) * self.tile_size
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl CollisionWorld for GridWorld {
    fn probe(&self, layer: u32, x: f32, y: f32, z: f32) -> Option<Collision> {
        // A layer that doesn't exist has nothing in it.
        let grid = self.layer(layer)?;
        let cell = self.world_to_cell(Vec2::new(x, y));
        let kind = match grid.get(cell.x, cell.y) {
            None => CollisionKind::OutOfBounds,
            Some(EMPTY) => return None,
            Some(tile) if z >= 0.0 && z < grid.wall_height => CollisionKind::Tile(tile),
            Some(_) => return None,
        };
        Some(Collision { layer, cell, kind })
    }
}
