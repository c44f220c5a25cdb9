use glam::IVec2;

use crate::ActorId;

/// Scheduler bookkeeping failures.
///
/// These mean the runtime state is inconsistent and the simulation can't
/// continue.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("schedule ran empty at tick {tick}")]
    EmptySchedule { tick: i64 },
    #[error("no actor at {pos} for the turn scheduled at tick {tick}")]
    StaleEntry { tick: i64, pos: IVec2 },
    #[error("actor {actor} has no pending turn")]
    MissingHandle { actor: ActorId },
}
