use serde::{Deserialize, Serialize};

use crate::model::Side;
use crate::stats::Actuals;
use crate::Dice;

#[derive(Debug, Clone, Copy)]
pub struct CheckInput {
    pub dc: i32,
    pub modifier: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckResult {
    pub roll: i32,
    pub total: i32,
    pub dc: i32,
    pub passed: bool,
}

/// Roll a d20, add modifier, compare vs DC.
pub fn check(dice: &mut Dice, input: CheckInput) -> CheckResult {
    let roll = dice.d20();
    let total = roll + input.modifier;
    CheckResult { roll, total, dc: input.dc, passed: total >= input.dc }
}

/// Exploding d20 + modifier for each side; returns attacker total minus
/// defender total.
pub fn contested_check(
    dice: &mut Dice,
    att_mod: i32,
    def_mod: i32,
    mut log: impl FnMut(String),
    att_label: &str,
    def_label: &str,
) -> i32 {
    let at = dice.d20_exploding(0) + att_mod;
    let dt = dice.d20_exploding(0) + def_mod;
    log(format!(
        "[CONTEST] {} {} (mod {:+}) vs {} {} (mod {:+})",
        att_label, at, att_mod, def_label, dt, def_mod
    ));
    at - dt
}

/// Result of the pre-fight tactical contest, from the requester's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticalOutcome {
    MajorAdvantage,
    ModerateAdvantage,
    Stalemate,
    ModerateDisadvantage,
    MajorDisadvantage,
    NoResult,
}

/// Reduction applied to the loser's fights pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handicap {
    pub pct: i32,
    pub action_loss: i32,
}

const MAJOR: Handicap = Handicap { pct: 50, action_loss: 1 };
const MODERATE: Handicap = Handicap { pct: 75, action_loss: 0 };

impl TacticalOutcome {
    /// Compare both sides' effort checks. A lone pass is decisive; two
    /// passes are settled by the higher total.
    pub fn resolve(ours: CheckResult, theirs: CheckResult) -> Self {
        match (ours.passed, theirs.passed) {
            (false, false) => TacticalOutcome::NoResult,
            (true, false) => TacticalOutcome::MajorAdvantage,
            (false, true) => TacticalOutcome::MajorDisadvantage,
            (true, true) => match ours.total.cmp(&theirs.total) {
                std::cmp::Ordering::Greater => TacticalOutcome::ModerateAdvantage,
                std::cmp::Ordering::Equal => TacticalOutcome::Stalemate,
                std::cmp::Ordering::Less => TacticalOutcome::ModerateDisadvantage,
            },
        }
    }

    /// Which side takes which handicap, if any.
    pub fn handicap(self) -> Option<(Side, Handicap)> {
        match self {
            TacticalOutcome::MajorAdvantage => Some((Side::Bad, MAJOR)),
            TacticalOutcome::ModerateAdvantage => Some((Side::Bad, MODERATE)),
            TacticalOutcome::ModerateDisadvantage => Some((Side::Good, MODERATE)),
            TacticalOutcome::MajorDisadvantage => Some((Side::Good, MAJOR)),
            TacticalOutcome::Stalemate | TacticalOutcome::NoResult => None,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            TacticalOutcome::MajorAdvantage => "You catch your foe badly out of position.",
            TacticalOutcome::ModerateAdvantage => "You gain the better ground.",
            TacticalOutcome::Stalemate => "Neither side gives an inch.",
            TacticalOutcome::ModerateDisadvantage => "Your foe gains the better ground.",
            TacticalOutcome::MajorDisadvantage => "Your foe catches you badly out of position.",
            TacticalOutcome::NoResult => "Neither side manages to size the other up.",
        }
    }
}

/// Cut defense, endurance and accretion to `pct` percent and drop actions.
pub fn apply_handicap(fights: &mut Actuals, handicap: Handicap) {
    let stats = &mut fights.stats;
    stats.defense = stats.defense * handicap.pct / 100;
    stats.endurance = stats.endurance * handicap.pct / 100;
    stats.accretion = stats.accretion * handicap.pct / 100;
    stats.actions -= handicap.action_loss;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Stats;

    fn result(total: i32, passed: bool) -> CheckResult {
        CheckResult { roll: total, total, dc: 12, passed }
    }

    #[test]
    fn outcomes_cover_every_pairing() {
        use TacticalOutcome::*;
        assert_eq!(TacticalOutcome::resolve(result(5, false), result(6, false)), NoResult);
        assert_eq!(TacticalOutcome::resolve(result(14, true), result(6, false)), MajorAdvantage);
        assert_eq!(TacticalOutcome::resolve(result(5, false), result(16, true)), MajorDisadvantage);
        assert_eq!(TacticalOutcome::resolve(result(18, true), result(13, true)), ModerateAdvantage);
        assert_eq!(TacticalOutcome::resolve(result(13, true), result(13, true)), Stalemate);
        assert_eq!(
            TacticalOutcome::resolve(result(12, true), result(19, true)),
            ModerateDisadvantage
        );
    }

    #[test]
    fn major_handicap_halves_and_costs_an_action() {
        let mut fights = Actuals {
            stats: Stats {
                defense: 21,
                endurance: 40,
                accretion: 9,
                actions: 3,
                combat: 7,
                ..Default::default()
            },
            ..Default::default()
        };
        apply_handicap(&mut fights, MAJOR);
        assert_eq!(fights.stats.defense, 10);
        assert_eq!(fights.stats.endurance, 20);
        assert_eq!(fights.stats.accretion, 4);
        assert_eq!(fights.stats.actions, 2);
        assert_eq!(fights.stats.combat, 7);
    }

    #[test]
    fn contest_margin_is_attacker_minus_defender() {
        let mut dice = Dice::from_scripted(vec![15, 5]);
        let mut lines = Vec::new();
        let margin = contested_check(&mut dice, 2, 1, |l| lines.push(l), "A", "B");
        assert_eq!(margin, (15 + 2) - (5 + 1));
        assert_eq!(lines.len(), 1);
    }
}
