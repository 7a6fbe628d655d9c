use anyhow::{Context, Result};

use crate::model::Character;

/// Opaque character blob handed to clients for safekeeping. Transports
/// supply their own (e.g. encrypting) implementation.
pub trait CharacterCodec: Send + Sync {
    fn encode(&self, character: &Character) -> Result<String>;
    fn decode(&self, blob: &str) -> Result<Character>;
}

/// Plain JSON; no secrecy, useful for tools and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCharacterCodec;

impl CharacterCodec for JsonCharacterCodec {
    fn encode(&self, character: &Character) -> Result<String> {
        serde_json::to_string(character).context("failed to encode character")
    }

    fn decode(&self, blob: &str) -> Result<Character> {
        serde_json::from_str(blob).context("failed to decode character blob")
    }
}
