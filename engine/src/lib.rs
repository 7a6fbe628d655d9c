use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

pub mod checks;
pub mod codec;
pub mod combat;
pub mod config;
pub mod content;
pub mod duel;
pub mod error;
pub mod factory;
pub mod inventory;
pub mod items;
pub mod model;
pub mod npc;
pub mod stats;
pub mod view;
pub mod world;

pub use config::WorldConfig;
pub use content::Rulebook;
pub use error::{GameError, GameResult};
pub use model::{
    Board, BoardId, Character, CharacterId, CharacterIdentity, Culture, EffortLevel, Item,
    ItemCategory, ItemId, ItemKind, Race, SessionId, Specialization,
};
pub use stats::{compute_actuals, Actuals, Attribute, CraftKind, Crafts, StatKind, Stats};
pub use world::World;

/// Source of every random decision in the engine.
///
/// Seeded dice make a whole world reproducible, including the ids it mints.
/// Scripted dice replay a fixed sequence (cycling) so tests can force
/// specific outcomes.
pub struct Dice {
    rng: ChaCha8Rng,
    script: Option<Script>,
}

struct Script {
    values: Vec<i32>,
    next: usize,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), script: None }
    }

    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_entropy(), script: None }
    }

    /// Rolls come from `values` in order, wrapping around; each value is
    /// clamped into the requested range. Ids are still drawn from a fixed seed.
    pub fn from_scripted(values: Vec<i32>) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(0),
            script: Some(Script { values, next: 0 }),
        }
    }

    /// Uniform integer in `1..=n`. A non-positive `n` is treated as 1.
    pub fn roll_range(&mut self, n: i32) -> i32 {
        let n = n.max(1);
        if let Some(script) = self.script.as_mut() {
            if !script.values.is_empty() {
                let value = script.values[script.next % script.values.len()];
                script.next += 1;
                return value.clamp(1, n);
            }
        }
        self.rng.gen_range(1..=n)
    }

    pub fn d20(&mut self) -> i32 {
        self.roll_range(20)
    }

    /// Adds a d20 to `acc`, rolling again while the running total lands on a
    /// positive multiple of 20.
    pub fn d20_exploding(&mut self, acc: i32) -> i32 {
        let mut total = acc;
        loop {
            let roll = self.d20();
            total += roll;
            tracing::trace!(roll, total, "exploding d20");
            if total <= 0 || total % 20 != 0 {
                return total;
            }
        }
    }

    /// Uniform pick from a slice; `None` only when the slice is empty.
    pub fn pick<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
        if options.is_empty() {
            return None;
        }
        let idx = self.roll_range(options.len() as i32) - 1;
        options.get(idx as usize)
    }

    /// Roll in the closed band `low..=high` (bounds may come in either order).
    pub fn roll_between(&mut self, low: i32, high: i32) -> i32 {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        if low == high {
            return low;
        }
        low - 1 + self.roll_range(high - low + 1)
    }

    pub fn uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}
