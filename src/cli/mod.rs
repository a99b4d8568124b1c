use std::path::PathBuf;

use chrono::NaiveDate;
use guessle::stats::StreakPolicy;

#[derive(clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Config file to read instead of `guessle.toml`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(clap::Subcommand)]
pub enum Command {
    /// Play today's puzzle, or an earlier one with `--date`.
    Play {
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show statistics.
    Stats,

    /// Print a code that moves statistics to another install.
    Export,

    /// Merge statistics from a code printed by `export`.
    Import {
        code: String,

        /// Which current streak to keep.
        #[arg(long, value_enum, default_value_t)]
        streak: Streak,
    },

    /// Print the loaded config.
    Config,
}

impl Default for Command {
    fn default() -> Self {
        Self::Play { date: None }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Default)]
pub enum Streak {
    #[default]
    Larger,
    Local,
    Imported,
}

impl From<Streak> for StreakPolicy {
    fn from(value: Streak) -> Self {
        match value {
            Streak::Larger => Self::PreferLarger,
            Streak::Local => Self::Local,
            Streak::Imported => Self::Foreign,
        }
    }
}
