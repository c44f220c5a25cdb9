use std::fmt;

use anyhow::{bail, Context};
use glam::{ivec2, IVec2};
use rand::{seq::IteratorRandom, Rng};
use util::{dijkstra_map, HashSet, StrExt, VecExt};

use crate::{Cell, CellKind, HARDNESS_MAX};

/// Axis-aligned rectangular room.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Room {
    pub min: IVec2,
    pub size: IVec2,
}

impl Room {
    pub fn new(min: IVec2, size: IVec2) -> Self {
        Room { min, size }
    }

    /// Exclusive lower right corner.
    pub fn max(&self) -> IVec2 {
        self.min + self.size
    }

    pub fn contains(&self, p: IVec2) -> bool {
        p.cmpge(self.min).all() && p.cmplt(self.max()).all()
    }

    pub fn center(&self) -> IVec2 {
        self.min + self.size / 2
    }

    /// Rooms overlap or come closer than `margin` cells to each other.
    pub fn intersects(&self, other: &Room, margin: i32) -> bool {
        let m = IVec2::splat(margin);
        (self.min - m).cmplt(other.max()).all()
            && other.min.cmplt(self.max() + m).all()
    }

    pub fn points(&self) -> impl Iterator<Item = IVec2> {
        let Room { min, size } = *self;
        (0..size.y)
            .flat_map(move |y| (0..size.x).map(move |x| min + ivec2(x, y)))
    }
}

/// Rectangular grid of dungeon cells.
///
/// Positions outside the grid behave like undiggable rock.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Terrain {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    rooms: Vec<Room>,
}

impl Terrain {
    /// Solid rock level with an undiggable border.
    pub fn new(width: i32, height: i32) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| ivec2(x, y)))
            .map(|p| {
                if p.x == 0 || p.y == 0 || p.x == width - 1 || p.y == height - 1
                {
                    Cell::rock(HARDNESS_MAX)
                } else {
                    Cell::new(CellKind::Rock)
                }
            })
            .collect();

        Terrain {
            width,
            height,
            cells,
            rooms: Vec::new(),
        }
    }

    /// Build terrain from a text map.
    ///
    /// Rows shorter than the longest row are padded with rock. Rooms are the
    /// bounding boxes of connected floor areas.
    pub fn from_ascii(text: &str) -> anyhow::Result<Self> {
        let mut parsed = Vec::new();
        let mut dim = IVec2::ZERO;
        for (p, c) in text.char_grid() {
            let cell = Cell::from_glyph(c).with_context(|| {
                format!("Terrain::from_ascii: bad cell at {p}")
            })?;
            parsed.push((p, cell));
            dim = dim.max(p + IVec2::ONE);
        }
        if parsed.is_empty() {
            bail!("Terrain::from_ascii: empty map");
        }

        let mut ret = Terrain {
            width: dim.x,
            height: dim.y,
            cells: vec![Cell::new(CellKind::Rock); (dim.x * dim.y) as usize],
            rooms: Vec::new(),
        };
        for (p, cell) in parsed {
            ret.set(p, cell);
        }
        ret.rooms = ret.infer_rooms();
        log::debug!(
            "Terrain::from_ascii: {}x{} with {} rooms",
            ret.width,
            ret.height,
            ret.rooms.len()
        );
        Ok(ret)
    }

    fn infer_rooms(&self) -> Vec<Room> {
        let is_floor = move |p: &IVec2| {
            self.ground(*p).is_some_and(CellKind::is_room_floor)
        };

        let mut seen = HashSet::default();
        let mut rooms = Vec::new();
        for p in self.points() {
            if seen.contains(&p) || !is_floor(&p) {
                continue;
            }
            let (mut min, mut max) = (p, p);
            let area =
                dijkstra_map(move |&q: &IVec2| q.ns_8().filter(is_floor), [p]);
            for (q, _) in area {
                seen.insert(q);
                min = min.min(q);
                max = max.max(q);
            }
            rooms.push(Room::new(min, max - min + IVec2::ONE));
        }
        rooms
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// Index of the position in row-major order, for grid-shaped side tables.
    pub fn idx(&self, p: IVec2) -> Option<usize> {
        self.contains(p).then(|| (p.y * self.width + p.x) as usize)
    }

    /// Inverse of `idx`.
    pub fn pos(&self, idx: usize) -> IVec2 {
        let idx = idx as i32;
        ivec2(idx % self.width, idx / self.width)
    }

    pub fn cell(&self, p: IVec2) -> Option<Cell> {
        self.idx(p).map(|i| self.cells[i])
    }

    pub fn cell_mut(&mut self, p: IVec2) -> Option<&mut Cell> {
        self.idx(p).map(|i| &mut self.cells[i])
    }

    pub fn set(&mut self, p: IVec2, cell: Cell) {
        if let Some(c) = self.cell_mut(p) {
            *c = cell;
        } else {
            log::warn!("Terrain::set: {p} is outside the map");
        }
    }

    /// Kind of the cell, with a player marker resolved to what's under it.
    ///
    /// A marker next to room floor stands in the room, anywhere else it
    /// stands in a corridor.
    pub fn ground(&self, p: IVec2) -> Option<CellKind> {
        let kind = self.cell(p)?.kind;
        if kind != CellKind::Player {
            return Some(kind);
        }
        let in_room = p
            .ns_8()
            .any(|q| self.cell(q).is_some_and(|c| c.kind.is_room_floor()));
        Some(if in_room {
            CellKind::Floor
        } else {
            CellKind::Corridor
        })
    }

    pub fn hardness(&self, p: IVec2) -> u8 {
        self.cell(p).map_or(HARDNESS_MAX, |c| c.hardness)
    }

    /// Can be entered without digging.
    pub fn is_walkable(&self, p: IVec2) -> bool {
        self.hardness(p) == 0
    }

    /// Can be entered by a tunneler, possibly after digging.
    pub fn is_diggable(&self, p: IVec2) -> bool {
        self.hardness(p) < HARDNESS_MAX
    }

    /// Dig at a cell, removing `amount` of hardness.
    ///
    /// Returns whether the cell is open after digging. Rock that gets dug
    /// through turns into corridor.
    pub fn excavate(&mut self, p: IVec2, amount: u8) -> bool {
        let Some(cell) = self.cell_mut(p) else {
            return false;
        };
        match cell.hardness {
            0 => true,
            HARDNESS_MAX => false,
            h if h > amount => {
                cell.hardness = h - amount;
                false
            }
            _ => {
                *cell = Cell::new(CellKind::Corridor);
                true
            }
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Carve out a floor area and register it as a room.
    pub fn add_room(&mut self, room: Room) {
        for p in room.points() {
            self.set(p, Cell::new(CellKind::Floor));
        }
        self.rooms.push(room);
    }

    /// Both points are within the bounds of the same room.
    ///
    /// Only looks at room rectangles, not at what's actually in them.
    pub fn same_room(&self, a: IVec2, b: IVec2) -> bool {
        self.rooms.iter().any(|r| r.contains(a) && r.contains(b))
    }

    /// Corridor cells 8-connected to a corridor cell at `p`.
    ///
    /// Empty if `p` isn't on a corridor.
    pub fn corridor_component(&self, p: IVec2) -> HashSet<IVec2> {
        let is_corridor =
            move |p: &IVec2| self.ground(*p) == Some(CellKind::Corridor);
        if !is_corridor(&p) {
            return Default::default();
        }

        dijkstra_map(move |&q: &IVec2| q.ns_8().filter(is_corridor), [p])
            .map(|(q, _)| q)
            .collect()
    }

    pub fn points(&self) -> impl Iterator<Item = IVec2> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| ivec2(x, y)))
    }

    /// First cell of the given kind in reading order.
    pub fn find(&self, kind: CellKind) -> Option<IVec2> {
        self.points()
            .find(|&p| self.cell(p).is_some_and(|c| c.kind == kind))
    }

    pub fn random_floor(&self, rng: &mut (impl Rng + ?Sized)) -> Option<IVec2> {
        self.points()
            .filter(|&p| {
                self.cell(p).is_some_and(|c| c.kind == CellKind::Floor)
            })
            .choose(rng)
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.cell(ivec2(x, y)).map_or(' ', |c| c.kind.into());
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
