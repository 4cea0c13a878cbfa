//! Reference [`CollisionQuery`] backend over a dense tile map.
//!
//! Levels are authored as ASCII, one character per tile:
//!
//! | char        | tile                      | layer      |
//! |-------------|---------------------------|------------|
//! | `#`         | solid block               | `OBSTACLE` |
//! | `=`         | one-way platform slab     | `PLATFORM` |
//! | `/`         | ramp rising to the right  | `OBSTACLE` |
//! | `\`         | ramp falling to the right | `OBSTACLE` |
//! | `.` / space | empty                     |            |
//!
//! The first text line is the top row of the level; tile row `0` is the last line.

use core::str::FromStr;

use crate::shapes::ConvexShape;
use crate::{CollisionQuery, LayerMask, NavError, RayHit, Vec2};

/// Thickness of a platform slab relative to the tile size.
const PLATFORM_THICKNESS: f32 = 0.125;

/// Query bounds are widened by this much so surfaces lying exactly on a bound are visited.
const QUERY_PAD: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
    Platform,
    SlopeUp,
    SlopeDown,
}

impl Tile {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' | ' ' => Some(Self::Empty),
            '#' => Some(Self::Solid),
            '=' => Some(Self::Platform),
            '/' => Some(Self::SlopeUp),
            '\\' => Some(Self::SlopeDown),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Solid => '#',
            Self::Platform => '=',
            Self::SlopeUp => '/',
            Self::SlopeDown => '\\',
        }
    }

    pub fn layer(self) -> LayerMask {
        match self {
            Self::Empty => LayerMask::NONE,
            Self::Platform => LayerMask::PLATFORM,
            Self::Solid | Self::SlopeUp | Self::SlopeDown => LayerMask::OBSTACLE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileMap {
    width: u32,
    height: u32,
    tile_size: f32,
    origin: Vec2,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// An empty map with its bottom-left corner at the world origin.
    pub fn new(width: u32, height: u32, tile_size: f32) -> Self {
        assert!(tile_size > 0.0, "tile_size must be > 0");
        Self {
            width,
            height,
            tile_size,
            origin: Vec2::ZERO,
            tiles: vec![Tile::Empty; width as usize * height as usize],
        }
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_tile_size(mut self, tile_size: f32) -> Self {
        assert!(tile_size > 0.0, "tile_size must be > 0");
        self.tile_size = tile_size;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// World-space size of the whole map.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }

    /// Tiles outside the map read as empty.
    pub fn get(&self, x: i32, y: i32) -> Tile {
        self.idx(x, y).map(|i| self.tiles[i]).unwrap_or_default()
    }

    /// Writes outside the map are ignored.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.idx(x, y) {
            self.tiles[i] = tile;
        }
    }

    /// Fill the inclusive rectangle `(x0, y0)..=(x1, y1)`.
    pub fn fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, tile: Tile) {
        for y in y0.min(y1)..=y0.max(y1) {
            for x in x0.min(x1)..=x0.max(x1) {
                self.set(x, y, tile);
            }
        }
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn shape_of(&self, x: i32, y: i32, tile: Tile) -> Option<ConvexShape> {
        let s = self.tile_size;
        let x0 = self.origin.x + x as f32 * s;
        let y0 = self.origin.y + y as f32 * s;
        let (x1, y1) = (x0 + s, y0 + s);
        match tile {
            Tile::Empty => None,
            Tile::Solid => Some(ConvexShape::rect(Vec2::new(x0, y0), Vec2::new(x1, y1))),
            Tile::Platform => Some(ConvexShape::rect(
                Vec2::new(x0, y1 - PLATFORM_THICKNESS * s),
                Vec2::new(x1, y1),
            )),
            Tile::SlopeUp => Some(ConvexShape::triangle(
                Vec2::new(x0, y0),
                Vec2::new(x1, y0),
                Vec2::new(x1, y1),
            )),
            Tile::SlopeDown => Some(ConvexShape::triangle(
                Vec2::new(x0, y0),
                Vec2::new(x1, y0),
                Vec2::new(x0, y1),
            )),
        }
    }

    /// Shapes on `mask` whose tiles intersect the world-space bounds `[min, max]`.
    fn shapes_in(
        &self,
        min: Vec2,
        max: Vec2,
        mask: LayerMask,
    ) -> impl Iterator<Item = ConvexShape> + '_ {
        let s = self.tile_size;
        let to_tile = |v: f32, o: f32| ((v - o) / s).floor() as i64;
        let tx0 = to_tile(min.x - QUERY_PAD, self.origin.x).max(0);
        let ty0 = to_tile(min.y - QUERY_PAD, self.origin.y).max(0);
        let tx1 = to_tile(max.x + QUERY_PAD, self.origin.x).min(self.width as i64 - 1);
        let ty1 = to_tile(max.y + QUERY_PAD, self.origin.y).min(self.height as i64 - 1);

        (ty0..=ty1)
            .flat_map(move |y| (tx0..=tx1).map(move |x| (x as i32, y as i32)))
            .filter_map(move |(x, y)| {
                let tile = self.get(x, y);
                if !tile.layer().intersects(mask) {
                    return None;
                }
                self.shape_of(x, y, tile)
            })
    }
}

impl FromStr for TileMap {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<(usize, &str)> = s
            .lines()
            .enumerate()
            .skip_while(|(_, l)| l.trim().is_empty())
            .collect();
        let last = lines
            .iter()
            .rposition(|(_, l)| !l.trim().is_empty())
            .map_or(0, |i| i + 1);
        let lines = &lines[..last];

        let width = lines
            .iter()
            .map(|(_, l)| l.chars().count())
            .max()
            .unwrap_or(0);
        let height = lines.len();
        let mut map = TileMap::new(width as u32, height as u32, 1.0);

        for (row, (line_no, line)) in lines.iter().enumerate() {
            let y = (height - 1 - row) as i32;
            for (column, c) in line.chars().enumerate() {
                let tile = Tile::from_char(c).ok_or(NavError::InvalidLevel {
                    line: line_no + 1,
                    column: column + 1,
                    found: c,
                })?;
                map.set(column as i32, y, tile);
            }
        }
        Ok(map)
    }
}

impl core::fmt::Display for TileMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for y in (0..self.height as i32).rev() {
            for x in 0..self.width as i32 {
                write!(f, "{}", self.get(x, y).as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl CollisionQuery for TileMap {
    fn circle_overlap(&self, center: Vec2, radius: f32, mask: LayerMask) -> bool {
        let r = Vec2::new(radius, radius);
        self.shapes_in(center - r, center + r, mask)
            .any(|shape| shape.overlaps_circle(center, radius))
    }

    fn ray_cast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let end = origin + direction * max_distance;
        let min = Vec2::new(origin.x.min(end.x), origin.y.min(end.y));
        let max = Vec2::new(origin.x.max(end.x), origin.y.max(end.y));
        self.shapes_in(min, max, mask)
            .filter_map(|shape| shape.ray_entry(origin, direction, max_distance))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn box_sweep(
        &self,
        center: Vec2,
        half_extents: Vec2,
        direction: Vec2,
        distance: f32,
        mask: LayerMask,
    ) -> bool {
        let end = center + direction * distance.max(0.0);
        let min = Vec2::new(center.x.min(end.x), center.y.min(end.y)) - half_extents;
        let max = Vec2::new(center.x.max(end.x), center.y.max(end.y)) + half_extents;
        self.shapes_in(min, max, mask)
            .any(|shape| shape.overlaps_swept_box(center, half_extents, direction, distance))
    }
}
