use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checks::contested_check;
use crate::error::{ensure, GameError, GameResult};
use crate::model::{Board, BoardId, Character, CharacterId, Side, Specialization};

/// Cost, in accretion, of each drain against a spent sorcerer's shield.
pub const ACCRETION_DRAIN: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub board_id: BoardId,
    pub source_id: CharacterId,
    pub target_id: CharacterId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    AlreadyDead,
    Miss { margin: i32 },
    Hit { damage: i32, absorbed: i32, endurance_left: i32 },
    Killed { damage: i32, absorbed: i32 },
}

/// Validate an attack without touching anything.
pub fn validate_attack(board: &Board, source: &Character, target: &Character) -> GameResult<()> {
    let source_side = board
        .side_of(source.id())
        .ok_or_else(|| GameError::validation(format!("{} is not on this board", source.name())))?;
    let target_side = board
        .side_of(target.id())
        .ok_or_else(|| GameError::validation(format!("{} is not on this board", target.name())))?;
    ensure(source_side != target_side, || {
        format!("{} cannot attack an ally", source.name())
    })?;
    ensure(source.details.alive, || format!("{} is dead", source.name()))?;
    ensure(source.fights.is_some(), || format!("{} is not in combat", source.name()))?;
    ensure(target.fights.is_some(), || format!("{} is not in combat", target.name()))?;
    if let Some(duel) = &board.duel {
        ensure(duel.current() == Some(source.id()), || {
            format!("it is not {}'s turn", source.name())
        })?;
    }
    Ok(())
}

/// Resolve one attack from `source` against `target` on `board`.
///
/// The outcome replaces the board's current message. A dead target
/// short-circuits before any action is spent.
pub fn run_action(
    dice: &mut crate::Dice,
    board: &mut Board,
    source: &mut Character,
    target: &mut Character,
) -> GameResult<AttackOutcome> {
    validate_attack(board, source, target)?;

    let source_name = source.name().to_string();
    let target_name = target.name().to_string();
    let target_spec = target.details.spec;
    let craft = source.details.spec.craft();

    let (Some(src), Some(tgt)) = (source.fights.as_mut(), target.fights.as_mut()) else {
        return Err(GameError::validation("combatant is not in combat"));
    };

    if tgt.stats.endurance <= 0 {
        board.announce(format!("{} is already dead.", target_name));
        return Ok(AttackOutcome::AlreadyDead);
    }

    src.stats.actions -= 1;

    let mut lines = Vec::new();
    let mut log = |line: String| lines.push(line);
    let mut shielded = false;
    let margin = match target_spec {
        Specialization::Melee | Specialization::Tracking => contested_check(
            dice,
            src.stats.combat,
            tgt.stats.combat,
            &mut log,
            &format!("{} (combat)", source_name),
            &format!("{} (combat)", target_name),
        ),
        Specialization::Sorcery => {
            let depleted = tgt.stats.accretion <= 0;
            if depleted {
                tgt.stats.accretion -= ACCRETION_DRAIN;
            }
            let mut margin = contested_check(
                dice,
                src.stats.arcane,
                tgt.stats.abstract_,
                &mut log,
                &format!("{} (arcane)", source_name),
                &format!("{} (abstract)", target_name),
            );
            if depleted {
                margin -= tgt.stats.accretion;
                tgt.stats.accretion -= ACCRETION_DRAIN;
                log(format!(
                    "[ACCRETION][{}] shield spent, drained to {}",
                    target_name, tgt.stats.accretion
                ));
            }
            shielded = !depleted;
            margin
        }
    };

    let (outcome, message) = if margin <= 0 {
        log(format!("[ATTACK][{}] misses {} (margin {})", source_name, target_name, margin));
        (
            AttackOutcome::Miss { margin },
            format!("{} attacks {} and misses.", source_name, target_name),
        )
    } else {
        let damage = margin * src.effectiveness_of(craft) / 100;
        let absorbed = if shielded { damage.min(tgt.stats.accretion.max(0)) } else { 0 };
        tgt.stats.accretion -= absorbed;
        let before = tgt.stats.endurance;
        tgt.stats.endurance -= damage - absorbed;
        log(format!(
            "[DMG][{}] endurance {} → {} (−{}, {} absorbed)",
            target_name,
            before,
            tgt.stats.endurance,
            damage - absorbed,
            absorbed
        ));
        let dealt = if absorbed > 0 {
            format!("{} damage ({} absorbed)", damage, absorbed)
        } else {
            format!("{} damage", damage)
        };
        if tgt.stats.endurance <= 0 {
            log(format!("[STATE][{}] is dead", target_name));
            (
                AttackOutcome::Killed { damage, absorbed },
                format!(
                    "{} strikes {} for {}. {} is dead.",
                    source_name, target_name, dealt, target_name
                ),
            )
        } else {
            (
                AttackOutcome::Hit { damage, absorbed, endurance_left: tgt.stats.endurance },
                format!("{} hits {} for {}.", source_name, target_name, dealt),
            )
        }
    };
    debug!(
        board = %board.id,
        source = %source_name,
        target = %target_name,
        ?outcome,
        "action resolved"
    );

    board.log.extend(lines);
    board.announce(message);
    if matches!(outcome, AttackOutcome::Killed { .. }) {
        target.details.alive = false;
        remove_fallen(board, target.id());
    }
    advance_turn(board, source, target);
    Ok(outcome)
}

/// Drop a fallen combatant from the turn order and settle the winner once a
/// side has nobody left standing.
fn remove_fallen(board: &mut Board, fallen: CharacterId) {
    let Some(fallen_side) = board.side_of(fallen) else { return };
    let Some(duel) = board.duel.as_mut() else { return };
    duel.turn_queue.retain(|id| *id != fallen);
    let allies = match fallen_side {
        Side::Good => &board.good_guys,
        Side::Bad => &board.bad_guys,
    };
    let standing = duel.turn_queue.iter().any(|id| allies.contains(id));
    if !standing {
        board.winner = Some(match fallen_side {
            Side::Good => Side::Bad,
            Side::Bad => Side::Good,
        });
    }
}

/// Pass the turn once the source has no actions left, refilling the next
/// combatant from its actuals.
fn advance_turn(board: &mut Board, source: &mut Character, target: &mut Character) {
    let spent = source.fights.is_none_or(|f| f.stats.actions <= 0);
    let Some(duel) = board.duel.as_mut() else { return };
    if !spent || duel.turn_queue.is_empty() {
        return;
    }
    duel.turn_queue.rotate_left(1);
    duel.turns_this_round += 1;
    if duel.turns_this_round >= duel.turn_queue.len() {
        duel.turns_this_round = 0;
        board.round += 1;
    }
    let Some(next) = duel.current() else { return };
    let penalty = duel.penalty_for(next);
    for who in [source, target] {
        if who.id() == next {
            let actions = who.actuals().stats.actions - penalty;
            if let Some(fights) = who.fights.as_mut() {
                fights.stats.actions = actions;
            }
        }
    }
}
