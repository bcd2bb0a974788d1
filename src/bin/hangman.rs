//! Console front end.
//!
//! Run with: cargo run --bin hangman -- --difficulty easy

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hangman::checkpoint::Checkpoint;
use hangman::config::GameConfig;
use hangman::difficulty::Difficulty;
use hangman::game::{Game, GameError, Outcome};
use hangman::session::{Event, Ignored, Phase, SessionError, Snapshot};
use hangman::store::{CounterStore, FileStore, MemoryStore};
use hangman::theme::{Scheme, Theme};
use hangman::words::WordBank;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

type Input = io::Lines<io::StdinLock<'static>>;

/// Hangman - guess the word before the gallows is complete
#[derive(Parser, Debug)]
#[command(name = "hangman")]
#[command(about = "Word-guessing game for the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Word list (JSON); overrides the config
    #[arg(short, long)]
    words: Option<PathBuf>,

    /// Score file; overrides the config. Scores are kept in memory without one
    #[arg(short, long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play with a random word from the list (default)
    Random {
        #[arg(short, long, default_value = "normal")]
        difficulty: Difficulty,
    },

    /// Let a friend type the secret word
    Friend {
        #[arg(short, long, default_value = "normal")]
        difficulty: Difficulty,
    },

    /// Resume a saved game
    Resume {
        /// Checkpoint file written with the `save` command
        path: PathBuf,
    },

    /// Show score, streak and games played
    Stats,

    /// Set the color scheme and accent
    Theme {
        #[arg(long)]
        scheme: Scheme,

        #[arg(long, default_value = hangman::theme::DEFAULT_ACCENT)]
        accent: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if cli.words.is_some() {
        config.words_path = cli.words.clone();
    }
    if cli.store.is_some() {
        config.store_path = cli.store.clone();
    }

    let store: Box<dyn CounterStore> = match &config.store_path {
        Some(path) => Box::new(FileStore::open(path)),
        None => Box::new(MemoryStore::new()),
    };
    let words = WordBank::load_or_default(config.words_path.as_deref());
    let mut game = Game::new(config, words, store);
    let mut input = io::stdin().lines();

    let command = cli.command.unwrap_or(Command::Random {
        difficulty: Difficulty::default(),
    });
    match command {
        Command::Stats => {
            print_totals(&game);
            Ok(())
        }
        Command::Theme { scheme, accent } => {
            let theme = Theme::new(scheme, &accent)?;
            theme.save(game.scores_mut().store_mut())?;
            println!("Theme saved: {} {}", theme.scheme.as_str(), theme.accent);
            Ok(())
        }
        Command::Random { difficulty } => {
            game.start_random(difficulty, &mut rand::thread_rng())?;
            play(&mut game, &mut input)
        }
        Command::Friend { difficulty } => {
            if !prompt_friend_word(&mut game, &mut input, difficulty)? {
                return Ok(());
            }
            play(&mut game, &mut input)
        }
        Command::Resume { path } => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            game.resume(Checkpoint::from_json(&json)?)?;
            play(&mut game, &mut input)
        }
    }
}

fn play(game: &mut Game<Box<dyn CounterStore>>, input: &mut Input) -> Result<()> {
    let theme = Theme::load(game.scores().store());
    println!("[{} theme, accent {}]", theme.scheme.as_str(), theme.accent);

    loop {
        let Some(snapshot) = game.snapshot() else {
            return Ok(());
        };
        render(&snapshot);
        prompt("letter, ? for a hint, save <file>, quit > ")?;

        let Some(line) = input.next().transpose()? else {
            return Ok(());
        };
        let command = line.trim();

        let outcome = match command {
            "quit" | "exit" => return Ok(()),
            "?" => match game.request_hint() {
                Err(GameError::Session(err @ SessionError::InsufficientFunds { .. })) => {
                    println!("{err}");
                    continue;
                }
                other => other?,
            },
            _ if command.starts_with("save ") => {
                let path = command.trim_start_matches("save ").trim();
                std::fs::write(path, game.checkpoint()?.to_json()?)
                    .with_context(|| format!("writing {path}"))?;
                println!("Saved to {path}");
                continue;
            }
            _ => game.guess(command)?,
        };

        report(&outcome);
        if outcome.is_finished() {
            if let Some(snapshot) = game.snapshot() {
                render(&snapshot);
            }
            print_totals(game);
            if !ask_again(game, input)? {
                return Ok(());
            }
        }
    }
}

fn report(outcome: &Outcome) {
    let Some(step) = &outcome.step else {
        return;
    };
    match &step.event {
        Event::Ignored(Ignored::NotALetter) => println!("Type a single letter A-Z."),
        Event::Ignored(Ignored::AlreadyUsed) => println!("You already tried that letter."),
        Event::Ignored(Ignored::HintsDisabled) => println!("No hints in friend mode."),
        Event::Ignored(Ignored::HintsExhausted) => println!("No hints left."),
        Event::Ignored(Ignored::GameOver) => {}
        Event::Revealed { letter, positions } => {
            println!("Yes! {letter} appears {} time(s).", positions.len())
        }
        Event::Missed { letter, .. } => println!("No {letter}."),
        Event::HintRevealed { text, cost, .. } => {
            if *cost > 0 {
                println!("Hint (-{cost} points): {text}");
            } else {
                println!("Hint: {text}");
            }
        }
    }

    if let Some(settlement) = &outcome.settlement {
        match settlement.outcome {
            Phase::Won => println!(
                "You won! {} star(s), +{} points.",
                settlement.stars, settlement.points
            ),
            _ => println!("You lost."),
        }
    }
}

fn render(snapshot: &Snapshot) {
    println!();
    println!("  {}", snapshot.masked);
    println!(
        "  Mistakes: {}/{}",
        snapshot.mistakes, snapshot.mistake_limit
    );
    if !snapshot.used_letters.is_empty() {
        let used: Vec<String> = snapshot.used_letters.iter().map(char::to_string).collect();
        println!("  Used: {}", used.join(" "));
    }
    for hint in &snapshot.revealed_hints {
        println!("  Hint: {hint}");
    }
    if let Some(secret) = &snapshot.secret {
        println!("  The word was: {secret}");
    }
}

fn print_totals<S: CounterStore>(game: &Game<S>) {
    let totals = game.totals();
    println!(
        "Score: {}  Streak: {} (best {})  Played: {}",
        totals.score, totals.streak, totals.best_streak, totals.played
    );
}

fn ask_again(game: &mut Game<Box<dyn CounterStore>>, input: &mut Input) -> Result<bool> {
    prompt("Play again? [y/N] ")?;
    let answer = input.next().transpose()?.unwrap_or_default();
    if !answer.trim().eq_ignore_ascii_case("y") {
        return Ok(false);
    }

    match game.play_again(&mut rand::thread_rng())? {
        Some(_) => Ok(true),
        None => {
            let difficulty = game.difficulty();
            prompt_friend_word(game, input, difficulty)
        }
    }
}

/// Ask for a secret until a valid one is given. Returns `false` on EOF.
fn prompt_friend_word(
    game: &mut Game<Box<dyn CounterStore>>,
    input: &mut Input,
    difficulty: Difficulty,
) -> Result<bool> {
    loop {
        prompt("Secret word (hide the screen!): ")?;
        let Some(raw) = input.next().transpose()? else {
            return Ok(false);
        };
        match game.start_friend(raw.trim(), difficulty) {
            Ok(_) => {
                // Push the secret off screen.
                print!("{}", "\n".repeat(40));
                return Ok(true);
            }
            Err(GameError::Session(err @ SessionError::InvalidWord { .. })) => {
                println!("{err}");
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn prompt(text: &str) -> Result<()> {
    print!("{text}");
    io::stdout().flush()?;
    Ok(())
}
