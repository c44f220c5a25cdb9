mod cell;
pub use cell::{Cell, CellKind, DEFAULT_ROCK_HARDNESS, WALL_HARDNESS};

pub mod mapgen;
pub use mapgen::MapGen;

mod terrain;
pub use terrain::{Room, Terrain};

/// Width of a standard dungeon level in cells.
pub const MAP_WIDTH: i32 = 80;
/// Height of a standard dungeon level in cells.
pub const MAP_HEIGHT: i32 = 21;

/// Hardness of cells that can never be dug through.
pub const HARDNESS_MAX: u8 = 255;
