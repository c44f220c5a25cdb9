pub use crate::{
    Actor, ActorId, Caps, Controller, DistanceMaps, Instant, Monster, Result,
    Runtime, ScenarioStatus, UNREACHABLE,
};
pub use glam::{ivec2, IVec2};
pub use util::{HashMap, HashSet, VecExt, DIR_8};
pub use world::{Cell, CellKind, Terrain};
