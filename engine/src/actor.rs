use std::fmt;

use bitflags::bitflags;
use glam::IVec2;
use world::Terrain;

/// Stable identifier of an actor in a runtime.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct ActorId(pub(crate) u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Monster capabilities.
    #[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Debug)]
    pub struct Caps: u8 {
        /// Follows the distance map instead of heading straight at the
        /// target.
        const INTELLIGENT = 1;
        /// Always knows where the player is.
        const TELEPATHIC = 2;
        /// Can dig through rock.
        const TUNNELING = 4;
        /// Moves randomly half of the time.
        const ERRATIC = 8;
    }
}

impl Caps {
    /// Hex digit of the capability bits, used to display monsters.
    pub fn glyph(self) -> char {
        char::from_digit(self.bits() as u32, 16).unwrap_or('?')
    }
}

#[derive(Copy, Clone, Default, Eq, PartialEq, Debug)]
pub struct Monster {
    pub caps: Caps,
    /// Last place where the monster knew the player to be.
    pub memory: Option<IVec2>,
}

impl Monster {
    pub fn new(caps: Caps) -> Self {
        Monster { caps, memory: None }
    }

    pub fn tunnels(&self) -> bool {
        self.caps.contains(Caps::TUNNELING)
    }

    /// Whether the monster can move into the cell, possibly by digging.
    pub fn can_enter(&self, terrain: &Terrain, p: IVec2) -> bool {
        if self.tunnels() {
            terrain.is_diggable(p)
        } else {
            terrain.is_walkable(p)
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ActorKind {
    Player,
    Monster(Monster),
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Actor {
    pub pos: IVec2,
    /// Actions per `TURN_TIME` ticks.
    pub speed: u32,
    pub kind: ActorKind,
}

impl Actor {
    pub fn is_player(&self) -> bool {
        matches!(self.kind, ActorKind::Player)
    }

    pub fn monster(&self) -> Option<&Monster> {
        match &self.kind {
            ActorKind::Monster(m) => Some(m),
            ActorKind::Player => None,
        }
    }

    pub fn monster_mut(&mut self) -> Option<&mut Monster> {
        match &mut self.kind {
            ActorKind::Monster(m) => Some(m),
            ActorKind::Player => None,
        }
    }

    pub fn glyph(&self) -> char {
        match &self.kind {
            ActorKind::Player => '@',
            ActorKind::Monster(m) => m.caps.glyph(),
        }
    }
}

#[cfg(test)]
mod test {
    use glam::ivec2;

    use super::*;

    #[test]
    fn glyphs() {
        assert_eq!(Caps::empty().glyph(), '0');
        assert_eq!((Caps::INTELLIGENT | Caps::TUNNELING).glyph(), '5');
        assert_eq!(Caps::all().glyph(), 'f');
    }

    #[test]
    fn entering() {
        let t = Terrain::from_ascii(".5X").unwrap();
        let walker = Monster::new(Caps::INTELLIGENT);
        let digger = Monster::new(Caps::TUNNELING);

        assert!(walker.can_enter(&t, ivec2(0, 0)));
        assert!(!walker.can_enter(&t, ivec2(1, 0)));
        assert!(digger.can_enter(&t, ivec2(1, 0)));
        assert!(!digger.can_enter(&t, ivec2(2, 0)));
        assert!(!digger.can_enter(&t, ivec2(3, 0)));
    }
}
