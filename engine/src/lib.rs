//! Turn scheduling and monster movement.

/// Hardness a tunneling monster removes from rock in one action.
pub const EXCAVATION: u8 = 85;

/// Ticks between the actions of a speed 1 actor.
pub const TURN_TIME: i64 = 1000;

/// Speed of the player.
pub const PLAYER_SPEED: u32 = 10;

/// How many random directions an erratic monster tries before giving up.
pub const ERRATIC_ATTEMPTS: usize = 8;

mod actor;
pub use actor::{Actor, ActorId, ActorKind, Caps, Monster};

mod ai;
pub use ai::{Decision, Perception};

mod distance;
pub use distance::{DistanceMaps, UNREACHABLE};

mod error;
pub use error::ScheduleError;

pub mod prelude;

mod runtime;
pub use runtime::{Controller, Runtime};

mod time;
pub use time::{action_interval, Instant};

pub type Result<T> = anyhow::Result<T>;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ScenarioStatus {
    Ongoing,
    Won,
    Lost,
    /// Player stopped the game.
    Quit,
}
