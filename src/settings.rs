use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Run configuration, loadable from an IDM file.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Seed for level generation and the simulation, 0 picks a random one.
    pub seed: u64,
    /// How many monsters to place on the level.
    pub monsters: usize,
    pub min_speed: u32,
    pub max_speed: u32,
    /// Player gives up after this many turns, 0 for no limit.
    pub turn_limit: usize,
    /// Text map file to use instead of a generated level.
    pub map: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            seed: 0,
            monsters: 10,
            min_speed: 5,
            max_speed: 20,
            turn_limit: 1000,
            map: String::new(),
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display()))?;
        let ret: Settings = idm::from_str(&text)
            .with_context(|| format!("bad settings in {}", path.display()))?;
        ret.validate()?;
        Ok(ret)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_speed == 0 || self.min_speed > self.max_speed {
            anyhow::bail!(
                "bad monster speed range {}..={}",
                self.min_speed,
                self.max_speed
            );
        }
        Ok(())
    }
}
