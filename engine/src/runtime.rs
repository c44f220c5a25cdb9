use anyhow::bail;
use glam::IVec2;
use rand::{seq::SliceRandom, SeedableRng};
use util::{FibHeap, GameRng, Handle, HashMap, HashSet, VecExt};
use world::{Cell, CellKind, Terrain};

use crate::{
    ai::{Decision, Perception},
    Actor, ActorId, ActorKind, Caps, DistanceMaps, Instant, Monster, Result,
    ScenarioStatus, ScheduleError, EXCAVATION, PLAYER_SPEED,
};

/// The player side of the game, consulted by the scheduler.
pub trait Controller {
    /// Act for the player once.
    ///
    /// Any player movement must already be applied to the runtime when this
    /// returns.
    fn player_turn(&mut self, r: &mut Runtime) -> Result<ScenarioStatus>;

    /// A monster tried to move into the player's cell.
    fn encounter(
        &mut self,
        _r: &mut Runtime,
        _monster: ActorId,
    ) -> Result<ScenarioStatus> {
        Ok(ScenarioStatus::Lost)
    }
}

/// Pending action in the schedule.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
struct Turn {
    actor: ActorId,
    /// Where the actor is expected to be when the turn comes up.
    pos: IVec2,
}

/// Main data container for the simulation.
pub struct Runtime {
    now: Instant,
    terrain: Terrain,
    maps: DistanceMaps,
    /// Terrain or player position changed since the maps were generated.
    maps_dirty: bool,
    /// Corridor component the player stands on, refreshed with the maps.
    player_corridor: HashSet<IVec2>,
    actors: HashMap<ActorId, Actor>,
    next_id: u32,
    player: ActorId,
    occupancy: Vec<Option<ActorId>>,
    queue: FibHeap<Instant, Turn>,
    handles: HashMap<ActorId, Handle>,
    rng: GameRng,
}

impl Runtime {
    /// Start a simulation with the player at `player_pos`.
    ///
    /// A player marker cell in the terrain is turned into the floor or
    /// corridor it stands on.
    pub fn new(
        mut terrain: Terrain,
        player_pos: IVec2,
        seed: u64,
    ) -> Result<Self> {
        if let Some(p) = terrain.find(CellKind::Player) {
            let kind = terrain.ground(p).unwrap_or(CellKind::Floor);
            terrain.set(p, Cell::new(kind));
        }
        if !terrain.is_walkable(player_pos) {
            bail!("Runtime::new: player can't stand at {player_pos}");
        }

        let mut ret = Runtime {
            now: Instant::default(),
            maps: DistanceMaps::default(),
            maps_dirty: true,
            player_corridor: Default::default(),
            actors: Default::default(),
            next_id: 0,
            player: ActorId(0),
            occupancy: vec![None; terrain.len()],
            queue: FibHeap::new(),
            handles: Default::default(),
            rng: GameRng::seed_from_u64(seed),
            terrain,
        };

        ret.player = ret.add_actor(
            Actor {
                pos: player_pos,
                speed: PLAYER_SPEED,
                kind: ActorKind::Player,
            },
            ret.now,
        )?;
        ret.update_maps()?;

        Ok(ret)
    }

    /// Add a monster that gets its first turn after one action interval.
    pub fn spawn_monster(
        &mut self,
        pos: IVec2,
        speed: u32,
        caps: Caps,
    ) -> Result<ActorId> {
        if speed == 0 {
            bail!("Runtime::spawn_monster: zero speed");
        }
        if !self.terrain.is_walkable(pos) {
            bail!("Runtime::spawn_monster: {pos} is not open");
        }
        if let Some(other) = self.actor_at(pos) {
            bail!("Runtime::spawn_monster: {pos} is occupied by {other}");
        }

        let id = self.add_actor(
            Actor {
                pos,
                speed,
                kind: ActorKind::Monster(Monster::new(caps)),
            },
            self.now.after(speed),
        )?;
        log::debug!("Runtime::spawn_monster: {id} {caps:?} at {pos}");
        Ok(id)
    }

    fn add_actor(&mut self, actor: Actor, at: Instant) -> Result<ActorId> {
        let id = ActorId(self.next_id);
        let h = self.queue.insert(
            at,
            Turn {
                actor: id,
                pos: actor.pos,
            },
        )?;
        self.next_id += 1;
        self.handles.insert(id, h);
        if let Some(i) = self.terrain.idx(actor.pos) {
            self.occupancy[i] = Some(id);
        }
        self.actors.insert(id, actor);
        Ok(id)
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Distance maps from the player's position.
    ///
    /// May be out of date if the player has moved or terrain has changed
    /// since the last `update_maps` call.
    pub fn maps(&self) -> &DistanceMaps {
        &self.maps
    }

    /// Regenerate distance maps if they are out of date.
    pub fn update_maps(&mut self) -> Result<&DistanceMaps> {
        if self.maps_dirty {
            let pos = self.player_pos();
            self.maps.generate(&self.terrain, pos)?;
            self.player_corridor = self.terrain.corridor_component(pos);
            self.maps_dirty = false;
        }
        Ok(&self.maps)
    }

    pub fn player(&self) -> ActorId {
        self.player
    }

    pub fn player_pos(&self) -> IVec2 {
        self.actors
            .get(&self.player)
            .expect("Runtime: player is missing")
            .pos
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actor_at(&self, pos: IVec2) -> Option<ActorId> {
        self.terrain.idx(pos).and_then(|i| self.occupancy[i])
    }

    /// Living monsters in id order.
    pub fn monsters(&self) -> impl Iterator<Item = (ActorId, &Actor)> + '_ {
        let mut ret: Vec<(ActorId, &Actor)> = self
            .actors
            .iter()
            .filter(|(_, a)| !a.is_player())
            .map(|(&id, a)| (id, a))
            .collect();
        ret.sort_by_key(|(id, _)| *id);
        ret.into_iter()
    }

    /// Next pending turn without running it.
    pub fn next_turn(&self) -> Option<(Instant, ActorId)> {
        self.queue.peek_min().map(|(&t, turn)| (t, turn.actor))
    }

    /// Move an actor's pending turn to a different time.
    pub fn schedule(&mut self, actor: ActorId, at: Instant) -> Result<()> {
        let h = *self
            .handles
            .get(&actor)
            .ok_or(ScheduleError::MissingHandle { actor })?;
        if !self.queue.decrease_key(h, at)? {
            let (_, turn) = self.queue.remove(h)?;
            let h = self.queue.insert(at, turn)?;
            self.handles.insert(actor, h);
        }
        Ok(())
    }

    /// Step the player in a direction.
    ///
    /// Stepping into a monster kills it and takes its place. Returns whether
    /// the player moved.
    pub fn move_player(&mut self, dir: IVec2) -> Result<bool> {
        let to = self.player_pos() + dir;
        if !self.terrain.is_walkable(to) {
            return Ok(false);
        }
        if let Some(other) = self.actor_at(to) {
            if other == self.player {
                return Ok(false);
            }
            self.kill(other)?;
        }
        self.relocate(self.player, to);
        self.maps_dirty = true;
        Ok(true)
    }

    /// Remove a monster from the game.
    pub fn kill(&mut self, actor: ActorId) -> Result<()> {
        if actor == self.player {
            bail!("Runtime::kill: can't remove the player");
        }
        let Some(pos) = self.actors.get(&actor).map(|a| a.pos) else {
            log::warn!("Runtime::kill: {actor} does not exist");
            return Ok(());
        };
        // A failed queue removal must leave the actor untouched.
        if let Some(&h) = self.handles.get(&actor) {
            self.queue.remove(h)?;
            self.handles.remove(&actor);
        }
        self.actors.remove(&actor);
        if let Some(i) = self.terrain.idx(pos) {
            if self.occupancy[i] == Some(actor) {
                self.occupancy[i] = None;
            }
        }
        log::info!("Runtime::kill: {actor} dies at {pos}");
        Ok(())
    }

    /// Run the scheduler until the game ends.
    pub fn run(
        &mut self,
        ctl: &mut impl Controller,
    ) -> Result<ScenarioStatus> {
        loop {
            let status = self.step(ctl)?;
            if status != ScenarioStatus::Ongoing {
                log::info!("Runtime::run: {status:?} at {}", self.now);
                return Ok(status);
            }
        }
    }

    /// Run the next scheduled turn.
    pub fn step(
        &mut self,
        ctl: &mut impl Controller,
    ) -> Result<ScenarioStatus> {
        let Some((now, turn)) = self.queue.pop_min()? else {
            return Err(ScheduleError::EmptySchedule {
                tick: self.now.tick(),
            }
            .into());
        };
        self.now = now;
        self.handles.remove(&turn.actor);

        let Some(actor) = self
            .actors
            .get(&turn.actor)
            .filter(|a| a.pos == turn.pos)
            .copied()
        else {
            return Err(ScheduleError::StaleEntry {
                tick: now.tick(),
                pos: turn.pos,
            }
            .into());
        };

        let status = if actor.is_player() {
            ctl.player_turn(self)?
        } else {
            self.monster_turn(turn.actor, ctl)?
        };

        if let Some(a) = self.actors.get(&turn.actor) {
            let h = self.queue.insert(
                now.after(a.speed),
                Turn {
                    actor: turn.actor,
                    pos: a.pos,
                },
            )?;
            self.handles.insert(turn.actor, h);
        }

        if status == ScenarioStatus::Ongoing
            && self.actors.values().all(Actor::is_player)
        {
            return Ok(ScenarioStatus::Won);
        }
        Ok(status)
    }

    fn monster_turn(
        &mut self,
        id: ActorId,
        ctl: &mut impl Controller,
    ) -> Result<ScenarioStatus> {
        self.update_maps()?;
        let Some((pos, monster)) = self
            .actors
            .get(&id)
            .and_then(|a| Some((a.pos, *a.monster()?)))
        else {
            return Ok(ScenarioStatus::Ongoing);
        };

        let player = self.player_pos();
        let view = Perception {
            terrain: &self.terrain,
            maps: &self.maps,
            player,
            player_corridor: &self.player_corridor,
        };
        let Decision { target, memory } =
            monster.decide(pos, &view, &mut self.rng);

        if let Some(m) = self.actors.get_mut(&id).and_then(|a| a.monster_mut())
        {
            m.memory = memory;
        }

        if target == pos {
            return Ok(ScenarioStatus::Ongoing);
        }

        if target == player {
            log::debug!("Runtime::monster_turn: {id} attacks at {target}");
            return ctl.encounter(self, id);
        }

        if let Some(other) = self.actor_at(target) {
            self.displace(id, other, pos, target);
            return Ok(ScenarioStatus::Ongoing);
        }

        if !self.terrain.is_walkable(target) {
            if !monster.tunnels() || !self.terrain.is_diggable(target) {
                log::debug!(
                    "Runtime::monster_turn: {id} can't enter {target}, staying"
                );
                return Ok(ScenarioStatus::Ongoing);
            }
            let open = self.terrain.excavate(target, EXCAVATION);
            self.maps_dirty = true;
            if !open {
                return Ok(ScenarioStatus::Ongoing);
            }
        }

        self.relocate(id, target);
        Ok(ScenarioStatus::Ongoing)
    }

    /// Monster `mover` at `from` moves into the cell of `occupant` at `to`.
    ///
    /// The occupant is pushed to a random free neighboring cell, or swapped
    /// with the mover if there's nowhere to go.
    fn displace(
        &mut self,
        mover: ActorId,
        occupant: ActorId,
        from: IVec2,
        to: IVec2,
    ) {
        let player = self.player_pos();
        let free: Vec<IVec2> = to
            .ns_8()
            .filter(|&p| {
                p != player
                    && self.terrain.is_walkable(p)
                    && self.actor_at(p).is_none()
            })
            .collect();

        if let Some(&dest) = free.choose(&mut self.rng) {
            log::debug!(
                "Runtime::displace: {mover} pushes {occupant} to {dest}"
            );
            self.relocate(occupant, dest);
        } else {
            log::debug!("Runtime::displace: {mover} swaps with {occupant}");
            self.relocate(occupant, from);
        }
        self.relocate(mover, to);
    }

    /// Change an actor's position and keep the occupancy grid and a pending
    /// turn in sync.
    fn relocate(&mut self, id: ActorId, to: IVec2) {
        let Some(actor) = self.actors.get_mut(&id) else {
            return;
        };
        let from = std::mem::replace(&mut actor.pos, to);

        if let Some(i) = self.terrain.idx(from) {
            if self.occupancy[i] == Some(id) {
                self.occupancy[i] = None;
            }
        }
        if let Some(i) = self.terrain.idx(to) {
            self.occupancy[i] = Some(id);
        }
        if let Some(&h) = self.handles.get(&id) {
            if let Some(turn) = self.queue.get_mut(h) {
                turn.pos = to;
            }
        }
    }
}

impl AsRef<Runtime> for Runtime {
    fn as_ref(&self) -> &Runtime {
        self
    }
}

#[cfg(test)]
mod test {
    use glam::ivec2;

    use super::*;

    /// Player who waits a fixed number of turns and then quits.
    #[derive(Default)]
    struct Idle {
        turns: usize,
        limit: usize,
    }

    impl Idle {
        fn new(limit: usize) -> Self {
            Idle { turns: 0, limit }
        }
    }

    impl Controller for Idle {
        fn player_turn(&mut self, _: &mut Runtime) -> Result<ScenarioStatus> {
            self.turns += 1;
            if self.limit > 0 && self.turns >= self.limit {
                Ok(ScenarioStatus::Quit)
            } else {
                Ok(ScenarioStatus::Ongoing)
            }
        }
    }

    const FAR_FUTURE: Instant = Instant::new(1_000_000);

    fn runtime(map: &str) -> Runtime {
        let t = Terrain::from_ascii(map).unwrap();
        let player = t.find(CellKind::Player).unwrap();
        Runtime::new(t, player, 1).unwrap()
    }

    const ROOM: &str = "
        XXXXXXXX
        X......X
        X.....@X
        X......X
        XXXXXXXX";

    #[test]
    fn tick_order() {
        let mut r = runtime(ROOM);
        let a = r.spawn_monster(ivec2(1, 1), 10, Caps::empty()).unwrap();
        let b = r.spawn_monster(ivec2(1, 3), 10, Caps::empty()).unwrap();
        r.schedule(r.player(), FAR_FUTURE).unwrap();
        r.schedule(a, Instant::new(105)).unwrap();
        r.schedule(b, Instant::new(100)).unwrap();

        let mut ctl = Idle::default();
        assert_eq!(r.next_turn(), Some((Instant::new(100), b)));
        assert_eq!(r.step(&mut ctl).unwrap(), ScenarioStatus::Ongoing);
        assert_eq!(r.now(), Instant::new(100));
        assert_eq!(r.next_turn(), Some((Instant::new(105), a)));
        r.step(&mut ctl).unwrap();
        assert_eq!(r.now(), Instant::new(105));
        assert_eq!(r.next_turn(), Some((Instant::new(200), b)));
    }

    #[test]
    fn speed_intervals() {
        let mut r = runtime(ROOM);
        let fast = r.spawn_monster(ivec2(1, 1), 20, Caps::empty()).unwrap();
        let slow = r.spawn_monster(ivec2(1, 3), 5, Caps::empty()).unwrap();
        r.schedule(r.player(), FAR_FUTURE).unwrap();

        let mut ctl = Idle::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            let (t, id) = r.next_turn().unwrap();
            seen.push((t.tick(), id));
            r.step(&mut ctl).unwrap();
        }
        assert_eq!(seen[..3], [(50, fast), (100, fast), (150, fast)]);
        // Ties at 200 go in either order.
        let mut tail = seen[3..].to_vec();
        tail.sort();
        assert_eq!(tail, vec![(200, fast), (200, slow)]);
    }

    #[test]
    fn player_acts_first() {
        let mut r = runtime(ROOM);
        r.spawn_monster(ivec2(1, 1), 10, Caps::empty()).unwrap();
        assert_eq!(r.next_turn(), Some((Instant::new(0), r.player())));

        let mut ctl = Idle::new(3);
        assert_eq!(r.run(&mut ctl).unwrap(), ScenarioStatus::Quit);
        assert_eq!(ctl.turns, 3);
        assert_eq!(r.now(), Instant::new(200));
    }

    #[test]
    fn excavation() {
        let mut r = runtime(
            "
            XXXXXX
            X.9.@X
            XXXXXX",
        );
        let m = r
            .spawn_monster(
                ivec2(1, 1),
                10,
                Caps::INTELLIGENT | Caps::TELEPATHIC | Caps::TUNNELING,
            )
            .unwrap();
        r.schedule(r.player(), FAR_FUTURE).unwrap();
        let mut ctl = Idle::default();
        let rock = ivec2(2, 1);

        r.step(&mut ctl).unwrap();
        assert_eq!(r.terrain().hardness(rock), 253 - 85);
        assert_eq!(r.actor(m).unwrap().pos, ivec2(1, 1));

        r.step(&mut ctl).unwrap();
        assert_eq!(r.terrain().hardness(rock), 253 - 170);
        assert_eq!(r.actor(m).unwrap().pos, ivec2(1, 1));

        r.step(&mut ctl).unwrap();
        assert_eq!(
            r.terrain().cell(rock),
            Some(Cell::new(CellKind::Corridor))
        );
        assert_eq!(r.actor(m).unwrap().pos, rock);
        assert_eq!(r.actor_at(rock), Some(m));
        assert_eq!(r.actor_at(ivec2(1, 1)), None);

        // Maps see the new corridor.
        assert_eq!(r.update_maps().unwrap().walking(rock), 2);
    }

    #[test]
    fn walker_does_not_dig() {
        let mut r = runtime(
            "
            XXXXXX
            X.9.@X
            XXXXXX",
        );
        let m = r
            .spawn_monster(
                ivec2(1, 1),
                10,
                Caps::INTELLIGENT | Caps::TELEPATHIC,
            )
            .unwrap();
        r.schedule(r.player(), FAR_FUTURE).unwrap();
        let mut ctl = Idle::default();
        for _ in 0..3 {
            r.step(&mut ctl).unwrap();
        }
        assert_eq!(r.terrain().hardness(ivec2(2, 1)), 253);
        assert_eq!(r.actor(m).unwrap().pos, ivec2(1, 1));
    }

    #[test]
    fn displacement() {
        let mut r = runtime(ROOM);
        let player = r.player_pos();
        let pusher =
            r.spawn_monster(ivec2(3, 2), 20, Caps::TELEPATHIC).unwrap();
        let blocker = r.spawn_monster(ivec2(4, 2), 10, Caps::empty()).unwrap();
        r.schedule(r.player(), FAR_FUTURE).unwrap();

        let mut ctl = Idle::default();
        r.step(&mut ctl).unwrap();
        assert_eq!(r.actor(pusher).unwrap().pos, ivec2(4, 2));
        let pushed = r.actor(blocker).unwrap().pos;
        assert!((pushed - ivec2(4, 2)).is_adjacent());
        assert_ne!(pushed, player);
        assert_eq!(r.actor_at(pushed), Some(blocker));

        // The pending turn moved along without being rescheduled.
        let h = r.handles[&blocker];
        assert_eq!(r.queue.get(h).unwrap().pos, pushed);
        assert_eq!(r.queue.key(h), Some(&Instant::new(100)));
        assert_eq!(r.queue.len(), 3);
    }

    #[test]
    fn swap_in_corridor() {
        let mut r = runtime(
            "
            XXXXXX
            X###@X
            XXXXXX",
        );
        let pusher = r
            .spawn_monster(
                ivec2(2, 1),
                20,
                Caps::INTELLIGENT | Caps::TELEPATHIC,
            )
            .unwrap();
        let blocker = r.spawn_monster(ivec2(3, 1), 10, Caps::empty()).unwrap();
        r.schedule(r.player(), FAR_FUTURE).unwrap();

        let mut ctl = Idle::default();
        r.step(&mut ctl).unwrap();
        assert_eq!(r.actor(pusher).unwrap().pos, ivec2(3, 1));
        assert_eq!(r.actor(blocker).unwrap().pos, ivec2(2, 1));
        assert_eq!(r.actor_at(ivec2(2, 1)), Some(blocker));
        assert_eq!(r.actor_at(ivec2(3, 1)), Some(pusher));

        let h = r.handles[&blocker];
        assert_eq!(r.queue.get(h).unwrap().pos, ivec2(2, 1));

        // Blocker's turn finds it where it was put.
        r.step(&mut ctl).unwrap();
        r.step(&mut ctl).unwrap();
    }

    #[test]
    fn encounter_ends_game() {
        let mut r = runtime(ROOM);
        r.spawn_monster(ivec2(5, 2), 10, Caps::TELEPATHIC).unwrap();
        r.schedule(r.player(), FAR_FUTURE).unwrap();

        let mut ctl = Idle::default();
        assert_eq!(r.run(&mut ctl).unwrap(), ScenarioStatus::Lost);
        assert!(r.actor_at(ivec2(5, 2)).is_some());
    }

    #[test]
    fn killing_everything_wins() {
        struct Hunter;
        impl Controller for Hunter {
            fn player_turn(
                &mut self,
                r: &mut Runtime,
            ) -> Result<ScenarioStatus> {
                let dir = ivec2(-1, 0);
                r.move_player(dir)?;
                Ok(ScenarioStatus::Ongoing)
            }
        }

        let mut r = runtime(ROOM);
        r.spawn_monster(ivec2(4, 2), 1, Caps::empty()).unwrap();
        assert_eq!(r.run(&mut Hunter).unwrap(), ScenarioStatus::Won);
        assert_eq!(r.player_pos(), ivec2(4, 2));
        assert_eq!(r.monsters().count(), 0);
        assert!(r.queue.len() == 1);
    }

    #[test]
    fn corridor_start_is_not_a_room() {
        let mut r = runtime(
            "
            XXXXXXXXX
            X###@###X
            XXXXXXXXX",
        );
        let player = r.player_pos();
        assert_eq!(
            r.terrain().cell(player),
            Some(Cell::new(CellKind::Corridor))
        );
        assert!(r.terrain().rooms().is_empty());

        // A plain monster down the corridor notices the player.
        let m = r.spawn_monster(ivec2(5, 1), 10, Caps::empty()).unwrap();
        r.schedule(r.player(), FAR_FUTURE).unwrap();
        assert_eq!(r.step(&mut Idle::default()).unwrap(), ScenarioStatus::Lost);
        assert_eq!(r.actor(m).unwrap().pos, ivec2(5, 1));
    }

    #[test]
    fn maps_follow_player() {
        struct Stepper(IVec2);
        impl Controller for Stepper {
            fn player_turn(
                &mut self,
                r: &mut Runtime,
            ) -> Result<ScenarioStatus> {
                r.move_player(self.0)?;
                Ok(ScenarioStatus::Ongoing)
            }
        }

        let mut r = runtime(ROOM);
        let start = r.player_pos();
        let m = r.spawn_monster(ivec2(1, 1), 10, Caps::empty()).unwrap();
        r.schedule(r.player(), Instant::new(250)).unwrap();
        let mut ctl = Stepper(ivec2(-1, 0));

        // Monster turns without digging or player movement reuse the maps.
        r.step(&mut ctl).unwrap();
        let before = r.maps().clone();
        r.step(&mut ctl).unwrap();
        assert!(!r.maps_dirty);
        assert_eq!(r.maps(), &before);
        assert_eq!(r.actor(m).unwrap().pos, ivec2(3, 1));

        // Player moves, maps go stale until the next monster needs them.
        r.step(&mut ctl).unwrap();
        let moved = r.player_pos();
        assert_eq!(moved, start + ivec2(-1, 0));
        assert!(r.maps_dirty);
        assert_eq!(r.maps().source(), Some(start));

        r.step(&mut ctl).unwrap();
        assert_eq!(r.now(), Instant::new(300));
        assert!(!r.maps_dirty);
        assert_eq!(r.maps().source(), Some(moved));
        assert_eq!(r.maps().walking(moved), 0);
        assert_eq!(r.maps().walking(start), 1);
        assert_eq!(r.maps().walking(ivec2(1, 1)), 4);
    }

    #[test]
    fn kill_drops_pending_turn() {
        let mut r = runtime(ROOM);
        let a = r.spawn_monster(ivec2(1, 1), 10, Caps::empty()).unwrap();
        let b = r.spawn_monster(ivec2(1, 3), 10, Caps::empty()).unwrap();
        assert_eq!(r.queue.len(), 3);

        r.kill(a).unwrap();
        assert_eq!(r.queue.len(), 2);
        assert!(!r.handles.contains_key(&a));
        assert!(r.actor(a).is_none());
        assert_eq!(r.actor_at(ivec2(1, 1)), None);
        assert_eq!(r.actor_at(ivec2(1, 3)), Some(b));

        // Killing again is a no-op.
        r.kill(a).unwrap();
        assert_eq!(r.queue.len(), 2);
    }

    #[test]
    fn stale_entry_is_fatal() {
        let mut r = runtime(ROOM);
        let m = r.spawn_monster(ivec2(1, 1), 10, Caps::empty()).unwrap();
        r.schedule(r.player(), FAR_FUTURE).unwrap();

        // Move the monster behind the scheduler's back.
        r.actors.get_mut(&m).unwrap().pos = ivec2(2, 1);

        let err = r.step(&mut Idle::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScheduleError>(),
            Some(ScheduleError::StaleEntry { tick: 100, .. })
        ));
    }

    #[test]
    fn empty_schedule_is_fatal() {
        let mut r = runtime(ROOM);
        r.queue.clear();
        r.handles.clear();
        let err = r.step(&mut Idle::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScheduleError>(),
            Some(ScheduleError::EmptySchedule { .. })
        ));
        assert!(r.schedule(r.player(), FAR_FUTURE).is_err());
    }

    #[test]
    fn bad_spawns() {
        let mut r = runtime(ROOM);
        assert!(r.spawn_monster(ivec2(0, 0), 10, Caps::empty()).is_err());
        assert!(r.spawn_monster(r.player_pos(), 10, Caps::empty()).is_err());
        assert!(r.spawn_monster(ivec2(1, 1), 0, Caps::empty()).is_err());
        assert!(r.kill(r.player()).is_err());
        assert!(Runtime::new(Terrain::new(3, 3), ivec2(1, 1), 0).is_err());
    }
}
