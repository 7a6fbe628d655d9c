use tracing::info;

use crate::checks::{apply_handicap, check, CheckInput, CheckResult, TacticalOutcome};
use crate::content::Rulebook;
use crate::error::{ensure, GameResult};
use crate::inventory::ensure_free;
use crate::model::{Board, BoardId, Character, EffortLevel, Side};
use crate::npc::spawn_npc;
use crate::Dice;

/// Renown earned for outlasting an opponent.
pub const VICTORY_RENOWN: i32 = 1;

/// Everything a new duel produces; the caller stores it.
#[derive(Debug, Clone)]
pub struct DuelSetup {
    pub board: Board,
    pub opponent: Character,
    pub outcome: TacticalOutcome,
}

/// Lock `hero`, spawn a scaled opponent and open a duel board, then run the
/// pre-fight tactical contest.
pub fn start_duel(
    dice: &mut Dice,
    book: &Rulebook,
    hero: &mut Character,
    effort: EffortLevel,
) -> GameResult<DuelSetup> {
    ensure_free(hero)?;

    let actuals = hero.actuals();
    let mut opponent = spawn_npc(dice, book, &actuals, effort);
    let mut board = Board::new_duel(BoardId(dice.uuid()), hero.id(), opponent.id(), effort);

    hero.details.locked = true;
    hero.details.board = Some(board.board_ref());
    hero.fights = Some(actuals);
    opponent.details.board = Some(board.board_ref());

    let outcome = tactical_contest(dice, &mut board, hero, &mut opponent);
    info!(
        board = %board.id,
        hero = %hero.name(),
        opponent = %opponent.name(),
        %effort,
        ?outcome,
        "duel started"
    );
    Ok(DuelSetup { board, opponent, outcome })
}

fn tactics_of(character: &Character) -> i32 {
    character.fights.map_or(0, |f| f.stats.tactics)
}

/// The member of a side with the worst tactics speaks for it.
pub fn lowest_tactics<'a>(side: &[&'a Character]) -> Option<&'a Character> {
    side.iter().copied().min_by_key(|c| tactics_of(c))
}

fn effort_check(dice: &mut Dice, who: &Character, dc: i32, log: &mut Vec<String>) -> CheckResult {
    let res = check(dice, CheckInput { dc, modifier: tactics_of(who) });
    log.push(format!(
        "[TACTICS][{}] roll={} total={} vs DC {} → {}",
        who.name(),
        res.roll,
        res.total,
        res.dc,
        if res.passed { "PASS" } else { "FAIL" }
    ));
    res
}

/// One opposed effort check per side; the loser's fights pool is handicapped
/// for the rest of the duel.
pub fn tactical_contest(
    dice: &mut Dice,
    board: &mut Board,
    hero: &mut Character,
    foe: &mut Character,
) -> TacticalOutcome {
    let effort = board.duel.as_ref().map_or(EffortLevel::Standard, |d| d.effort);
    let dc = effort.dc();

    let mut lines = Vec::new();
    let ours = lowest_tactics(&[&*hero]).map(|c| effort_check(dice, c, dc, &mut lines));
    let theirs = lowest_tactics(&[&*foe]).map(|c| effort_check(dice, c, dc, &mut lines));
    let outcome = match (ours, theirs) {
        (Some(ours), Some(theirs)) => TacticalOutcome::resolve(ours, theirs),
        _ => TacticalOutcome::NoResult,
    };

    if let Some((side, handicap)) = outcome.handicap() {
        let loser = match side {
            Side::Good => hero,
            Side::Bad => foe,
        };
        if let Some(fights) = loser.fights.as_mut() {
            apply_handicap(fights, handicap);
        }
        if handicap.action_loss > 0 {
            if let Some(duel) = board.duel.as_mut() {
                duel.action_penalty = Some((loser.id(), handicap.action_loss));
            }
        }
    }

    board.log.extend(lines);
    board.announce(outcome.describe());
    outcome
}

/// Release the hero from a finished duel. Returns true when the hero won.
pub fn end_duel(board: &Board, hero: &mut Character) -> GameResult<bool> {
    ensure(board.is_over(), || "the fight is not over".to_string())?;
    let won = board.winner == board.side_of(hero.id()) && hero.details.alive;
    hero.details.locked = false;
    hero.details.board = None;
    hero.fights = None;
    if won {
        hero.details.renown += VICTORY_RENOWN;
    }
    info!(board = %board.id, hero = %hero.name(), won, "duel ended");
    Ok(won)
}
