use std::{fs, path::Path, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use encoding_rs::Encoding;
use engine::codec::JsonCharacterCodec;
use engine::combat::ActionRequest;
use engine::factory::CreateCharacterRequest;
use engine::items::generate_item;
use engine::model::Side;
use engine::{Board, ItemCategory, World, WorldConfig};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum Category {
    Weapon,
    Shield,
    Armour,
    Trinket,
}

impl From<Category> for ItemCategory {
    fn from(c: Category) -> Self {
        match c {
            Category::Weapon => ItemCategory::Weapon,
            Category::Shield => ItemCategory::Shield,
            Category::Armour => ItemCategory::Armour,
            Category::Trinket => ItemCategory::Trinket,
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Roll dice from the world's generator
    Roll {
        /// Sides per die
        #[arg(long, default_value_t = 20)]
        sides: i32,
        /// Use the exploding d20 (ignores --sides)
        #[arg(long, default_value_t = false)]
        exploding: bool,
        /// Number of rolls
        #[arg(long, default_value_t = 5)]
        rolls: u32,
    },
    /// Generate random items and print them as JSON
    Item {
        /// Force a category instead of rolling one
        #[arg(long, value_enum)]
        category: Option<Category>,
        /// Number of items
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Create a character and print its view plus the client blob
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "portraits/default.png")]
        portrait: String,
        #[arg(long)]
        race: String,
        #[arg(long)]
        culture: String,
        #[arg(long)]
        spec: String,
        /// Pretty-print JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Create a character and fight a generated opponent to the end
    Duel {
        #[arg(long, default_value = "Wanderer")]
        name: String,
        #[arg(long, default_value = "human")]
        race: String,
        #[arg(long, default_value = "urban")]
        culture: String,
        #[arg(long, default_value = "melee")]
        spec: String,
        /// casual | standard | hard | deadly
        #[arg(long, default_value = "standard")]
        effort: String,
        /// Safety cap on rounds
        #[arg(long, default_value_t = 30)]
        max_rounds: u32,
    },
}

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Skirmish rules engine harness")]
struct Cli {
    /// World config (YAML, or JSON by extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// RNG seed; overrides the config file
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    cmd: Cmd,
}

fn read_text_auto(path: &Path) -> anyhow::Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<WorldConfig> {
    let mut config = match &cli.config {
        Some(path) => WorldConfig::from_text(&read_text_auto(path)?, path)?,
        None => WorldConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    tracing::debug!(seed = ?config.seed, path = ?cli.config, "world config loaded");
    Ok(config)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let world = World::new(load_config(&cli)?)?;

    match cli.cmd {
        Cmd::Roll { sides, exploding, rolls } => {
            world.with_dice(|dice| {
                for _ in 0..rolls {
                    let roll = if exploding {
                        dice.d20_exploding(0)
                    } else {
                        dice.roll_range(sides)
                    };
                    println!("{}", roll);
                }
            });
        }
        Cmd::Item { category, count } => {
            let items: Vec<_> = world.with_dice(|dice| {
                (0..count)
                    .map(|_| generate_item(dice, world.rulebook(), category.map(Into::into)))
                    .collect()
            });
            println!("{}", to_json(&items, true)?);
        }
        Cmd::Create { name, portrait, race, culture, spec, pretty } => {
            let request =
                CreateCharacterRequest { name, portrait_url: portrait, race, culture, spec };
            let character = world.create_character(&request)?;
            let identity = character.identity_pair();
            let view = world.character_view(identity.id, identity.session_id)?;
            println!("{}", to_json(&view, pretty)?);
            println!("blob: {}", world.export_character(identity, &JsonCharacterCodec)?);
        }
        Cmd::Duel { name, race, culture, spec, effort, max_rounds } => {
            let request = CreateCharacterRequest {
                name,
                portrait_url: "portraits/default.png".to_string(),
                race,
                culture,
                spec,
            };
            let hero = world.create_character(&request)?;
            let identity = hero.identity_pair();
            let board = world.start_duel(identity, &effort)?;
            let board = fight(&world, board, max_rounds)?;

            for line in &board.log {
                println!("{}", line);
            }
            let winner = match board.winner {
                Some(Side::Good) => "hero",
                Some(Side::Bad) => "opponent",
                None => "none",
            };
            println!("[END] winner={} rounds={}", winner, board.round);
            if board.is_over() {
                let view = world.end_duel(identity)?;
                println!("[END] {} renown={} alive={}", view.name, view.renown, view.alive);
            }
        }
    }
    Ok(())
}

/// Let whoever holds the turn attack the other side until someone falls.
fn fight(world: &World, mut board: Board, max_rounds: u32) -> anyhow::Result<Board> {
    let max_actions = max_rounds.saturating_mul(20);
    let mut taken = 0;
    while !board.is_over() && board.round <= max_rounds && taken < max_actions {
        let Some(source_id) = board.duel.as_ref().and_then(|d| d.current()) else { break };
        let target_id = if board.good_guys.contains(&source_id) {
            board.bad_guys.first().copied()
        } else {
            board.good_guys.first().copied()
        };
        let Some(target_id) = target_id else { break };
        world.run_action(&ActionRequest { board_id: board.id, source_id, target_id })?;
        board = world.board(board.id)?;
        taken += 1;
    }
    Ok(board)
}
