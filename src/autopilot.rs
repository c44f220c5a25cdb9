use engine::prelude::*;
use rand::seq::SliceRandom;
use util::{GameRng, srng};

/// Computer player that wanders around and attacks anything next to it.
pub struct Autopilot {
    rng: GameRng,
    turns: usize,
    /// Quit after this many turns, 0 for no limit.
    limit: usize,
}

impl Autopilot {
    pub fn new(seed: u64, limit: usize) -> Self {
        Autopilot {
            rng: srng(&seed),
            turns: 0,
            limit,
        }
    }

    pub fn turns(&self) -> usize {
        self.turns
    }
}

impl Controller for Autopilot {
    fn player_turn(&mut self, r: &mut Runtime) -> Result<ScenarioStatus> {
        if self.limit > 0 && self.turns >= self.limit {
            return Ok(ScenarioStatus::Quit);
        }
        self.turns += 1;

        let pos = r.player_pos();
        let player = r.player();
        let enemy = DIR_8
            .into_iter()
            .find(|&d| r.actor_at(pos + d).is_some_and(|id| id != player));
        if let Some(dir) = enemy {
            r.move_player(dir)?;
            return Ok(ScenarioStatus::Ongoing);
        }

        let open: Vec<IVec2> = DIR_8
            .into_iter()
            .filter(|&d| r.terrain().is_walkable(pos + d))
            .collect();
        if let Some(&dir) = open.choose(&mut self.rng) {
            r.move_player(dir)?;
        }
        Ok(ScenarioStatus::Ongoing)
    }

    fn encounter(
        &mut self,
        r: &mut Runtime,
        monster: ActorId,
    ) -> Result<ScenarioStatus> {
        log::info!(
            "Autopilot: caught by {monster} at {} after {} turns",
            r.player_pos(),
            self.turns
        );
        Ok(ScenarioStatus::Lost)
    }
}
