#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

use std::io::{self, BufRead, Write};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use guessle::{
    framework::{logging, Config},
    stats::{GameRestore, GameStats, MigrationRecord, StreakPolicy},
    store::{JsonFileStore, PersistenceGateway, SnapshotSlot},
    wordle::{AsEmoji, Game, GameOptions, Outcome, Palette, PersistReport},
    Input,
};
use tracing::info;

mod cli;
use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    logging::init_tracing(config.logs.filter());

    let mut store = JsonFileStore::open(config.store.dir())?;
    let mut stats = store.load_stats()?.unwrap_or_default();

    match cli.command.unwrap_or_default() {
        Command::Play { date } => play(&config, &mut store, &mut stats, date)?,
        Command::Stats => print_stats(&stats),
        Command::Export => {
            let record = MigrationRecord {
                statistics: stats.to_foreign(config.puzzle.guesses_limit()),
                game_state: store.load_game(SnapshotSlot::Latest)?,
            };

            println!("{}", record.encode()?);
        }
        Command::Import { code, streak } => {
            import(&config, &mut store, &mut stats, &code, streak.into())?;
            print_stats(&stats);
        }
        Command::Config => println!("{config:#?}"),
    }

    Ok(())
}

fn play(
    config: &Config,
    store: &mut JsonFileStore,
    stats: &mut GameStats,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let calendar = config.puzzle.calendar()?;
    let today = Local::now().date_naive();
    let date = date.unwrap_or(today);

    let puzzle = calendar.puzzle_for(date, today)?;
    let options = GameOptions {
        limit: config.puzzle.guesses_limit(),
        is_latest: calendar.is_latest(date, today),
    };

    info!(number = puzzle.number, %date, "starting game");
    let mut game = Game::load(puzzle, options, store)?;

    println!(
        "Guessle {} ({date}): {} letters, {} guesses.",
        game.state().puzzle().number,
        game.state().puzzle().answer().len(),
        options.limit
    );
    if !options.is_latest {
        println!("This is an old puzzle, so it won't count towards your stats.");
    }
    println!("Commands: :hard, :contrast, :quit. Questions end with `?`.");

    if game.state().attempts() > 0 {
        println!("{}", game.emoji_grid());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !game.outcome().is_terminal() {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match line.trim() {
            ":quit" => break,
            ":hard" => match game.set_hard_mode(!game.hard_mode()) {
                Ok(persist) => {
                    report(&persist);
                    println!(
                        "Hard mode {}.",
                        if game.hard_mode() { "on" } else { "off" }
                    );
                }
                Err(err) => println!("{err}"),
            },
            ":contrast" => {
                let high_contrast = game.palette() == Palette::Standard;
                report(&game.set_high_contrast(high_contrast));
            }
            _ => match Input::parse(&line) {
                None => (),
                Some(Input::Question(question)) => {
                    println!("No oracle is set up to answer \"{question}\".");
                }
                Some(Input::Guess(guess)) => match game.submit_guess(guess, stats) {
                    Ok(submission) => {
                        report(&submission.persist);
                        println!(
                            "{}  {}",
                            submission.guess.emoji(game.palette()),
                            submission.guess.word().to_uppercase()
                        );
                    }
                    Err(err) => println!("{err}"),
                },
            },
        }
    }

    match game.outcome() {
        Outcome::Won => println!("\nSolved!\n\n{}\n", game.share_text()),
        Outcome::Lost => println!(
            "\nThe word was {}.\n\n{}\n",
            game.state().puzzle().answer().to_string().to_uppercase(),
            game.share_text()
        ),
        Outcome::NotStarted | Outcome::InProgress => return Ok(()),
    }

    print_stats(stats);
    Ok(())
}

fn import(
    config: &Config,
    store: &mut JsonFileStore,
    stats: &mut GameStats,
    code: &str,
    policy: StreakPolicy,
) -> anyhow::Result<()> {
    let record = MigrationRecord::decode(code).context("couldn't read migration code")?;
    let today = Local::now().date_naive();
    let puzzle = config.puzzle.calendar()?.latest(today)?;

    stats.import_foreign(&record.statistics, policy);
    store.save_stats(stats)?;

    match record.restore_game(store, &puzzle, config.puzzle.guesses_limit())? {
        GameRestore::KeptLocal => {
            println!("Kept the game already started here; the imported one was skipped.")
        }
        GameRestore::Restored | GameRestore::Absent => (),
    }

    println!("Imported. Importing the same code again would count those games twice.");
    Ok(())
}

fn print_stats(stats: &GameStats) {
    println!(
        "Played {} | Win % {} | Current streak {} | Max streak {}",
        stats.games_played(),
        stats.success_rate(),
        stats.current_streak(),
        stats.max_streak()
    );

    let most = stats.distribution().values().copied().max().unwrap_or_default();
    for (attempts, wins) in stats.distribution() {
        let width = if most == 0 { 0 } else { (wins * 20).div_ceil(most) };
        println!("{attempts} {} {wins}", "#".repeat(width as usize));
    }
    println!("X {}", stats.losses());
}

fn report(persist: &PersistReport) {
    for err in persist.failures() {
        eprintln!("couldn't save: {err}");
    }
}
