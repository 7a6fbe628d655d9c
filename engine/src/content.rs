use anyhow::{ensure, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::{GameError, GameResult};
use crate::model::{Culture, ItemCategory, Race, Specialization};
use crate::stats::{Crafts, Stats};

const BUILTIN_RULEBOOK: &str = include_str!("../content/rulebook.yaml");

/// One row of a bonus table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bonuses {
    pub stats: Stats,
    pub crafts: Crafts,
}

/// Race/culture/spec tables plus the name pools used by the generators.
#[derive(Debug, Clone, Deserialize)]
pub struct Rulebook {
    pub races: IndexMap<String, Bonuses>,
    pub cultures: IndexMap<String, Bonuses>,
    pub specializations: IndexMap<String, Bonuses>,
    pub item_names: IndexMap<String, Vec<String>>,
    pub npc_names: Vec<String>,
}

impl Rulebook {
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_RULEBOOK).context("failed to parse built-in rulebook")
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let book: Rulebook = serde_yaml::from_str(text).context("invalid rulebook YAML")?;
        book.check()?;
        Ok(book)
    }

    /// Every enumerated choice must have a row and every name pool must be
    /// non-empty, so lookups after loading cannot miss.
    fn check(&self) -> Result<()> {
        for race in Race::iter() {
            ensure!(self.races.contains_key(race.as_ref()), "rulebook missing race '{}'", race);
        }
        for culture in Culture::iter() {
            ensure!(
                self.cultures.contains_key(culture.as_ref()),
                "rulebook missing culture '{}'",
                culture
            );
        }
        for spec in Specialization::iter() {
            ensure!(
                self.specializations.contains_key(spec.as_ref()),
                "rulebook missing specialization '{}'",
                spec
            );
        }
        for category in ItemCategory::iter() {
            let names = self.item_names.get(category.as_ref());
            ensure!(
                names.is_some_and(|n| !n.is_empty()),
                "rulebook has no item names for '{}'",
                category
            );
        }
        ensure!(!self.npc_names.is_empty(), "rulebook has no npc names");
        Ok(())
    }

    pub fn race(&self, race: Race) -> GameResult<&Bonuses> {
        lookup(&self.races, "race", race.as_ref())
    }

    pub fn culture(&self, culture: Culture) -> GameResult<&Bonuses> {
        lookup(&self.cultures, "culture", culture.as_ref())
    }

    pub fn specialization(&self, spec: Specialization) -> GameResult<&Bonuses> {
        lookup(&self.specializations, "specialization", spec.as_ref())
    }

    pub fn item_names(&self, category: ItemCategory) -> &[String] {
        self.item_names.get(category.as_ref()).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn lookup<'a>(
    table: &'a IndexMap<String, Bonuses>,
    what: &str,
    key: &str,
) -> GameResult<&'a Bonuses> {
    table
        .get(key)
        .ok_or_else(|| GameError::validation(format!("no {} table entry for '{}'", what, key)))
}
