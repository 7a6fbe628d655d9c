//! Action resolution on a board.

pub mod actions;

pub use actions::{run_action, validate_attack, ActionRequest, AttackOutcome};
