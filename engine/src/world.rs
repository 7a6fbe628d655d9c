//! The shared world store and the operations exposed to transports.
//!
//! Entities live behind one mutex each, inside sharded maps. Map guards are
//! never held while waiting on an entity mutex, and entity mutexes are always
//! taken in the order board → characters (ascending id) → dice.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::{DashMap, DashSet};
use tracing::{debug, info};

use crate::codec::CharacterCodec;
use crate::combat::{self, ActionRequest};
use crate::config::WorldConfig;
use crate::content::Rulebook;
use crate::duel;
use crate::error::{ensure, GameError, GameResult};
use crate::factory::{build_character, CreateCharacterRequest};
use crate::inventory::{self, ensure_owner, EquipItemRequest, LevelUpRequest};
use crate::model::{
    parse_choice, Board, BoardId, Character, CharacterId, CharacterIdentity, EffortLevel, ItemId,
    SessionId,
};
use crate::stats::Attribute;
use crate::view::CharacterView;
use crate::Dice;

type Shared<T> = Arc<Mutex<T>>;

/// Every mutation validates before writing, so a poisoned guard still
/// holds consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn lock_pair<'a>(
    a: &'a Mutex<Character>,
    a_id: CharacterId,
    b: &'a Mutex<Character>,
    b_id: CharacterId,
) -> (MutexGuard<'a, Character>, MutexGuard<'a, Character>) {
    if a_id < b_id {
        let first = lock(a);
        (first, lock(b))
    } else {
        let second = lock(b);
        (lock(a), second)
    }
}

fn traced<T>(op: &'static str, result: GameResult<T>) -> GameResult<T> {
    if let Err(err) = &result {
        debug!(op, error = %err, "request rejected");
    }
    result
}

pub struct World {
    config: WorldConfig,
    rulebook: Rulebook,
    dice: Mutex<Dice>,
    characters: DashMap<CharacterId, Shared<Character>>,
    npcs: DashMap<CharacterId, Shared<Character>>,
    boards: DashMap<BoardId, Shared<Board>>,
    sold: DashSet<ItemId>,
}

impl World {
    /// World with the built-in rulebook.
    pub fn new(config: WorldConfig) -> anyhow::Result<Self> {
        let rulebook = Rulebook::builtin()?;
        Ok(Self::with_rulebook(config, rulebook))
    }

    pub fn with_rulebook(config: WorldConfig, rulebook: Rulebook) -> Self {
        let dice = config.seed.map_or_else(Dice::from_entropy, Dice::from_seed);
        Self {
            config,
            rulebook,
            dice: Mutex::new(dice),
            characters: DashMap::new(),
            npcs: DashMap::new(),
            boards: DashMap::new(),
            sold: DashSet::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn rulebook(&self) -> &Rulebook {
        &self.rulebook
    }

    /// Run `f` with exclusive use of the world's dice.
    pub fn with_dice<R>(&self, f: impl FnOnce(&mut Dice) -> R) -> R {
        let mut dice = lock(&self.dice);
        f(&mut dice)
    }

    fn player(&self, id: CharacterId) -> GameResult<Shared<Character>> {
        self.characters
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| GameError::not_found(format!("character {}", id)))
    }

    fn combatant(&self, id: CharacterId) -> Option<Shared<Character>> {
        self.characters
            .get(&id)
            .or_else(|| self.npcs.get(&id))
            .map(|entry| Arc::clone(entry.value()))
    }

    fn board_handle(&self, id: BoardId) -> Option<Shared<Board>> {
        self.boards.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Lock a player character after checking the caller owns it.
    fn with_owned<R>(
        &self,
        identity: CharacterIdentity,
        f: impl FnOnce(&mut Character) -> GameResult<R>,
    ) -> GameResult<R> {
        let handle = self.player(identity.id)?;
        let mut character = lock(&handle);
        ensure_owner(&character, identity.session_id)?;
        f(&mut character)
    }

    pub fn create_character(&self, request: &CreateCharacterRequest) -> GameResult<Character> {
        let result = self.with_dice(|dice| {
            build_character(dice, &self.rulebook, &self.config, request)
        });
        let character = traced("create_character", result)?;
        self.characters
            .insert(character.id(), Arc::new(Mutex::new(character.clone())));
        Ok(character)
    }

    pub fn character_view(
        &self,
        id: CharacterId,
        session_id: SessionId,
    ) -> GameResult<CharacterView> {
        let result = self.with_owned(CharacterIdentity { id, session_id }, |c| {
            Ok(CharacterView::from(&*c))
        });
        traced("character_view", result)
    }

    pub fn equip_item(&self, request: &EquipItemRequest) -> GameResult<CharacterView> {
        let result = self.with_owned(request.identity, |c| {
            inventory::equip(c, request.item_id)?;
            Ok(CharacterView::from(&*c))
        });
        traced("equip_item", result)
    }

    pub fn unequip_item(&self, request: &EquipItemRequest) -> GameResult<CharacterView> {
        let result = self.with_owned(request.identity, |c| {
            inventory::unequip(c, request.item_id)?;
            Ok(CharacterView::from(&*c))
        });
        traced("unequip_item", result)
    }

    pub fn sell_item(&self, request: &EquipItemRequest) -> GameResult<CharacterView> {
        let result = self.with_owned(request.identity, |c| {
            ensure(!self.sold.contains(&request.item_id), || {
                format!("item {} was already sold", request.item_id)
            })?;
            let item = inventory::sell(c, request.item_id)?;
            self.sold.insert(item.id);
            info!(character = %c.id(), item = %item.name, value = item.value, "item sold");
            Ok(CharacterView::from(&*c))
        });
        traced("sell_item", result)
    }

    pub fn level_up(&self, request: &LevelUpRequest) -> GameResult<CharacterView> {
        let result = request.attribute.parse::<Attribute>().and_then(|attribute| {
            self.with_owned(request.identity, |c| {
                inventory::level_up(c, attribute, request.points)?;
                debug!(
                    character = %c.id(),
                    %attribute,
                    points = request.points,
                    value = attribute.get(&c.stats, &c.crafts),
                    "levelled up"
                );
                Ok(CharacterView::from(&*c))
            })
        });
        traced("level_up", result)
    }

    /// Open a duel against a freshly generated opponent.
    pub fn start_duel(&self, identity: CharacterIdentity, effort: &str) -> GameResult<Board> {
        traced("start_duel", self.try_start_duel(identity, effort))
    }

    fn try_start_duel(&self, identity: CharacterIdentity, effort: &str) -> GameResult<Board> {
        let effort: EffortLevel = parse_choice("effort level", effort)?;
        let setup = self.with_owned(identity, |hero| {
            self.with_dice(|dice| duel::start_duel(dice, &self.rulebook, hero, effort))
        })?;
        let board = setup.board.clone();
        self.npcs
            .insert(setup.opponent.id(), Arc::new(Mutex::new(setup.opponent)));
        self.boards.insert(board.id, Arc::new(Mutex::new(setup.board)));
        Ok(board)
    }

    /// Resolve one attack. Read the outcome from the board's message.
    pub fn run_action(&self, request: &ActionRequest) -> GameResult<()> {
        traced("run_action", self.try_run_action(request))
    }

    fn try_run_action(&self, request: &ActionRequest) -> GameResult<()> {
        ensure(request.source_id != request.target_id, || {
            "a combatant cannot target itself".to_string()
        })?;
        let board_handle = self
            .board_handle(request.board_id)
            .ok_or_else(|| GameError::validation(format!("no board {}", request.board_id)))?;
        let source_handle = self
            .combatant(request.source_id)
            .ok_or_else(|| GameError::validation(format!("no combatant {}", request.source_id)))?;
        let target_handle = self
            .combatant(request.target_id)
            .ok_or_else(|| GameError::validation(format!("no combatant {}", request.target_id)))?;

        let mut board = lock(&board_handle);
        let (mut source, mut target) =
            lock_pair(&source_handle, request.source_id, &target_handle, request.target_id);
        let mut dice = lock(&self.dice);
        combat::run_action(&mut dice, &mut board, &mut source, &mut target)?;
        Ok(())
    }

    /// Reap a finished duel: release the hero and forget the board and its NPCs.
    pub fn end_duel(&self, identity: CharacterIdentity) -> GameResult<CharacterView> {
        traced("end_duel", self.try_end_duel(identity))
    }

    fn try_end_duel(&self, identity: CharacterIdentity) -> GameResult<CharacterView> {
        let handle = self.player(identity.id)?;
        let board_id = {
            let hero = lock(&handle);
            ensure_owner(&hero, identity.session_id)?;
            hero.details
                .board
                .map(|b| b.id)
                .ok_or_else(|| GameError::validation(format!("{} is not on a board", hero.name())))?
        };
        let board_handle = self
            .board_handle(board_id)
            .ok_or_else(|| GameError::not_found(format!("board {}", board_id)))?;

        let board = lock(&board_handle);
        let mut hero = lock(&handle);
        ensure(hero.details.board.map(|b| b.id) == Some(board_id), || {
            format!("{} already left board {}", hero.name(), board_id)
        })?;
        duel::end_duel(&board, &mut hero)?;
        let view = CharacterView::from(&*hero);
        let others: Vec<CharacterId> = board.participants().filter(|id| *id != hero.id()).collect();
        drop(hero);
        drop(board);

        self.boards.remove(&board_id);
        for id in others {
            self.npcs.remove(&id);
        }
        Ok(view)
    }

    pub fn board(&self, id: BoardId) -> GameResult<Board> {
        self.board_handle(id)
            .map(|handle| lock(&handle).clone())
            .ok_or_else(|| GameError::not_found(format!("board {}", id)))
    }

    /// Public view of any character or NPC. Session ids stay with their owners.
    pub fn character(&self, id: CharacterId) -> GameResult<CharacterView> {
        self.combatant(id)
            .map(|handle| CharacterView::from(&*lock(&handle)))
            .ok_or_else(|| GameError::not_found(format!("character {}", id)))
    }

    /// Encode an owned character for client-side safekeeping.
    pub fn export_character(
        &self,
        identity: CharacterIdentity,
        codec: &dyn CharacterCodec,
    ) -> anyhow::Result<String> {
        let character = self.with_owned(identity, |c| Ok(c.clone()))?;
        codec.encode(&character)
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn npc_count(&self) -> usize {
        self.npcs.len()
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }
}
