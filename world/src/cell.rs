use strum::{Display, EnumIter};

use crate::HARDNESS_MAX;

/// Hardness given to plain rock glyphs in text maps.
pub const DEFAULT_ROCK_HARDNESS: u8 = 127;

/// Hardness of room walls and corners.
pub const WALL_HARDNESS: u8 = 200;

/// What a single map cell is made of.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Display, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum CellKind {
    #[default]
    Rock,
    Floor,
    Corridor,
    Wall,
    Corner,
    Upstairs,
    Downstairs,
    /// Marks the player's starting point in text maps.
    Player,
}

use CellKind::*;

impl CellKind {
    /// Hardness a freshly made cell of this kind has.
    pub fn default_hardness(self) -> u8 {
        match self {
            Rock => DEFAULT_ROCK_HARDNESS,
            Wall | Corner => WALL_HARDNESS,
            Floor | Corridor | Upstairs | Downstairs | Player => 0,
        }
    }

    /// Open space inside a room, as opposed to corridors and solid matter.
    ///
    /// The player marker is neither, see `Terrain::ground`.
    pub fn is_room_floor(self) -> bool {
        matches!(self, Floor | Upstairs | Downstairs)
    }
}

impl TryFrom<char> for CellKind {
    type Error = anyhow::Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Ok(match c {
            ' ' | 'X' | '0'..='9' => Rock,
            '.' => Floor,
            '#' => Corridor,
            '-' | '|' => Wall,
            '+' => Corner,
            '<' => Upstairs,
            '>' => Downstairs,
            '@' => Player,
            _ => anyhow::bail!("unknown map glyph {c:?}"),
        })
    }
}

impl From<CellKind> for char {
    fn from(kind: CellKind) -> Self {
        match kind {
            Rock => ' ',
            Floor => '.',
            Corridor => '#',
            Wall => '-',
            Corner => '+',
            Upstairs => '<',
            Downstairs => '>',
            Player => '@',
        }
    }
}

/// Contents of a single map cell.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug)]
pub struct Cell {
    pub kind: CellKind,
    /// Rock density, 0 is open space and `HARDNESS_MAX` can't be dug.
    pub hardness: u8,
}

impl Cell {
    pub fn new(kind: CellKind) -> Self {
        Cell {
            kind,
            hardness: kind.default_hardness(),
        }
    }

    pub fn rock(hardness: u8) -> Self {
        Cell {
            kind: Rock,
            hardness,
        }
    }

    /// Parse a text map glyph.
    ///
    /// Digits are rock of increasing hardness, `X` is undiggable rock.
    pub fn from_glyph(c: char) -> anyhow::Result<Self> {
        let kind = CellKind::try_from(c)?;
        Ok(match c {
            'X' => Cell::rock(HARDNESS_MAX),
            '0'..='9' => Cell::rock((c as u8 - b'0') * 28 + 1),
            _ => Cell::new(kind),
        })
    }

    /// Can be walked through or dug through.
    pub fn is_diggable(&self) -> bool {
        self.hardness < HARDNESS_MAX
    }
}
