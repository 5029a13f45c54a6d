mod config;
mod generator;
mod reports;
mod store;
mod turn;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{Write, stdout};
use std::path::PathBuf;

use config::Config;
use generator::{ChatCompletionClient, TextGenerator};
use questchat_game::{ProgressionEngine, SystemClock};
use reports::ReportFormat;
use store::{load_state, save_state};
use turn::run_chat_turn;

#[derive(Debug, Parser)]
#[command(name = "questchat", version)]
#[command(about = "Chat with an assistant and level up: XP, streaks, quests and badges")]
struct Args {
    /// Game-state document to read and update (defaults to the config's state.path)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Config file (defaults to ./questchat.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for quest draws, for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output report format
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a message: earn XP, then get the assistant's reply
    Chat {
        message: String,
        /// Skip reply generation and only record progression
        #[arg(long)]
        offline: bool,
    },
    /// Show level, title, stats, statistics and badges
    Stats,
    /// Show earned and locked badges
    Badges,
    /// Show today's quests (or this week's)
    Quests {
        #[arg(long)]
        weekly: bool,
    },
    /// Score the personality quiz from ten answers between 1 and 5
    Quiz {
        #[arg(value_delimiter = ',', required = true)]
        answers: Vec<u8>,
    },
    /// Replace the document with a fresh one
    Reset,
    /// Write a default config file
    InitConfig { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Command::InitConfig { path } = &args.command {
        Config::create_default(path).await?;
        println!("📝 Wrote default config to {}", path.display().to_string().green());
        return Ok(());
    }

    let config = Config::discover(args.config.as_deref()).await?;
    let state_path = args
        .state
        .clone()
        .unwrap_or_else(|| config.state.path.clone());
    let mut engine = match args.seed {
        Some(seed) => ProgressionEngine::with_seed(SystemClock, seed),
        None => ProgressionEngine::system(),
    };
    let mut state = load_state(&state_path, &engine).await?;

    let mut out = stdout();
    if args.report == ReportFormat::Console {
        reports::announce_banner(&mut out)?;
    }

    let dirty = match args.command {
        Command::Chat { message, offline } => {
            let client = (!offline).then(|| ChatCompletionClient::new(config.generator.clone()));
            let generator = client.as_ref().map(|c| c as &dyn TextGenerator);
            let turn = run_chat_turn(
                &mut engine,
                &mut state,
                &message,
                generator,
                config.generator.timeout(),
            )
            .await;
            reports::chat_report(&mut out, args.report, &turn)?;
            turn.award.awarded()
        }
        Command::Stats => {
            reports::stats_report(&mut out, args.report, &engine.stats_overview(&state))?;
            false
        }
        Command::Badges => {
            reports::badges_report(&mut out, args.report, &engine.badge_board(&state))?;
            false
        }
        Command::Quests { weekly } => {
            let before = state.clone();
            let (label, board) = if weekly {
                ("Weekly", engine.weekly_quests(&mut state))
            } else {
                ("Daily", engine.daily_quests(&mut state))
            };
            reports::quests_report(&mut out, args.report, label, &board)?;
            state != before
        }
        Command::Quiz { answers } => {
            let (outcome, merged) = engine
                .take_quiz(&mut state, &answers)
                .context("Could not score the quiz")?;
            reports::quiz_report(&mut out, args.report, &outcome, merged)?;
            merged
        }
        Command::Reset => {
            state = engine.fresh_state();
            reports::reset_report(&mut out, args.report, &state_path)?;
            true
        }
        Command::InitConfig { .. } => false,
    };

    if dirty {
        save_state(&state_path, &state, config.state.pretty).await?;
        log::debug!("saved game state to {}", state_path.display());
    }
    out.flush()?;
    Ok(())
}
