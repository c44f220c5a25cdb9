use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use engine::prelude::*;
use rand::{Rng, seq::SliceRandom};
use util::srng;

mod autopilot;
mod settings;
mod view;

use autopilot::Autopilot;
use settings::Settings;

#[derive(Parser, Debug)]
#[command(about = "Run a dungeon level with monsters hunting the player")]
struct Args {
    #[arg(long, help = "Settings file in IDM format")]
    config: Option<PathBuf>,

    #[arg(long, help = "Random seed, 0 for a random one")]
    seed: Option<u64>,

    #[arg(long, help = "Number of monsters")]
    nummon: Option<usize>,

    #[arg(long, help = "Text map to play instead of a generated level")]
    map: Option<PathBuf>,

    #[arg(long, help = "Stop after this many player turns, 0 for no limit")]
    turns: Option<usize>,

    #[arg(long, help = "Print the distance maps when the game ends")]
    dump: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More logging")]
    verbose: u8,
}

impl Args {
    /// Settings from the config file with command line overrides.
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut ret = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(seed) = self.seed {
            ret.seed = seed;
        }
        if let Some(n) = self.nummon {
            ret.monsters = n;
        }
        if let Some(path) = &self.map {
            ret.map = path.to_string_lossy().into_owned();
        }
        if let Some(n) = self.turns {
            ret.turn_limit = n;
        }
        ret.validate()?;
        Ok(ret)
    }
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level),
    )
    .init();

    if let Err(e) = run(&args) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let settings = args.settings()?;

    let seed = match settings.seed {
        0 => rand::thread_rng().r#gen(),
        n => n,
    };
    log::info!("seed: {seed}");
    let mut rng = srng(&seed);

    let (terrain, player) = if settings.map.is_empty() {
        let terrain = world::mapgen::generate(&mut rng);
        let player = terrain
            .random_floor(&mut rng)
            .context("generated level has no floor")?;
        (terrain, player)
    } else {
        let text = fs::read_to_string(&settings.map)
            .with_context(|| format!("can't read map {}", settings.map))?;
        let terrain = Terrain::from_ascii(&text)?;
        let player = match terrain.find(CellKind::Player) {
            Some(p) => p,
            None => terrain
                .random_floor(&mut rng)
                .context("map has no place for the player")?,
        };
        (terrain, player)
    };

    let mut r = Runtime::new(terrain, player, seed)?;
    populate(&mut r, &settings, &mut rng)?;

    let mut pilot = Autopilot::new(seed, settings.turn_limit);
    let status = r.run(&mut pilot)?;

    print!("{}", view::render(&r));
    if args.dump {
        r.update_maps()?;
        println!("\nWalking distances:");
        print!("{}", view::distance_overlay(&r, false));
        println!("\nTunneling distances:");
        print!("{}", view::distance_overlay(&r, true));
    }
    println!(
        "{status:?} after {} player turns at {}, {} monsters left",
        pilot.turns(),
        r.now(),
        r.monsters().count()
    );
    Ok(())
}

/// Place monsters with random abilities on free floor away from the
/// player.
fn populate(
    r: &mut Runtime,
    settings: &Settings,
    rng: &mut impl Rng,
) -> Result<()> {
    let player = r.player_pos();
    let mut spots: Vec<IVec2> = r
        .terrain()
        .points()
        .filter(|&p| {
            r.terrain().is_walkable(p)
                && r.actor_at(p).is_none()
                && !r.terrain().same_room(p, player)
        })
        .collect();
    spots.shuffle(rng);

    if spots.len() < settings.monsters {
        log::warn!(
            "populate: room for only {} of {} monsters",
            spots.len(),
            settings.monsters
        );
    }

    for pos in spots.into_iter().take(settings.monsters) {
        let speed = rng.gen_range(settings.min_speed..=settings.max_speed);
        let caps = Caps::from_bits_truncate(rng.r#gen());
        r.spawn_monster(pos, speed, caps)?;
    }
    Ok(())
}
