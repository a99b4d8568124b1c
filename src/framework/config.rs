use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    oracle::{self, Oracle, OracleGateway},
    wordle::{GuessesLimit, SolutionCalendar, WordsList, WordsListError},
};

/// Looked for in the working directory when no config file is given.
pub const DEFAULT_FILE: &str = "guessle";
pub const ENV_PREFIX: &str = "GUESSLE";

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub puzzle: PuzzleConfig,
    pub oracle: OracleConfig,
    pub store: StoreConfig,
    pub logs: LogsConfig,
}

impl Config {
    /// Reads `path` (or `guessle.toml` if it exists), then `GUESSLE__SECTION__KEY`
    /// environment variables on top.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let file = match path {
            Some(path) => ::config::File::from(path)
                .format(::config::FileFormat::Toml)
                .required(true),
            None => ::config::File::from(Path::new(DEFAULT_FILE))
                .format(::config::FileFormat::Toml)
                .required(false),
        };

        let config: Self = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(Error::Read)?
            .try_deserialize()
            .map_err(Error::Parse)?;

        debug!(?config, "loaded config");
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file read error: {0}")]
    Read(::config::ConfigError),

    #[error("parsing error: {0}")]
    Parse(::config::ConfigError),
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PuzzleConfig {
    first_date: NaiveDate,
    max_attempts: usize,
    words_file: Option<PathBuf>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            first_date: NaiveDate::from_ymd_opt(2022, 1, 1).expect("hard-coded date should be valid"),
            max_attempts: crate::wordle::DEFAULT_MAX_ATTEMPTS,
            words_file: None,
        }
    }
}

impl PuzzleConfig {
    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }

    pub fn guesses_limit(&self) -> GuessesLimit {
        GuessesLimit::try_new(self.max_attempts).unwrap_or_else(|| {
            warn!("max_attempts can't be 0, using the default");
            GuessesLimit::default()
        })
    }

    pub fn words(&self) -> Result<WordsList, WordsListError> {
        match self.words_file {
            Some(ref path) => WordsList::load(path),
            None => Ok(WordsList::builtin()),
        }
    }

    pub fn calendar(&self) -> Result<SolutionCalendar, WordsListError> {
        Ok(SolutionCalendar::new(self.first_date, self.words()?))
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OracleConfig {
    timeout_ms: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            timeout_ms: oracle::DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// An oracle asking `gateway` with the configured timeout.
    ///
    /// The `guessle` binary has no gateway of its own, so this is only reached by
    /// programs embedding the library.
    pub fn oracle<G: OracleGateway>(&self, gateway: G) -> Oracle<G> {
        Oracle::new(gateway, self.timeout())
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StoreConfig {
    dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".guessle"),
        }
    }
}

impl StoreConfig {
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LogsConfig {
    filter: String,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            filter: "guessle=info".to_owned(),
        }
    }
}

impl LogsConfig {
    pub fn filter(&self) -> &str {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use std::{convert::Infallible, fs, path::Path, str::FromStr, time::Duration};

    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::{Config, Error, OracleConfig};
    use crate::{
        oracle::{OracleError, OracleGateway, OracleRequest},
        wordle::{GuessesLimit, Word},
    };

    fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("guessle-{}-{name}.toml", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_without_a_file() {
        let config = Config::default();

        assert_eq!(
            config.puzzle.first_date(),
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
        );
        assert_eq!(config.puzzle.guesses_limit(), GuessesLimit::default());
        assert_eq!(config.store.dir(), Path::new(".guessle"));
        assert_eq!(config.logs.filter(), "guessle=info");
    }

    #[test]
    fn reads_toml() {
        let path = write_config(
            "reads-toml",
            r#"
                [puzzle]
                first_date = "2023-03-01"
                max_attempts = 8

                [store]
                dir = "/tmp/guessle-data"
            "#,
        );

        let config = Config::load(Some(path.as_path())).unwrap();

        assert_eq!(
            config.puzzle.first_date(),
            NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()
        );
        assert_eq!(config.puzzle.guesses_limit(), GuessesLimit::new(8));
        assert_eq!(config.store.dir(), Path::new("/tmp/guessle-data"));
        assert_eq!(config.logs.filter(), "guessle=info");

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn zero_attempts_falls_back() {
        let path = write_config("zero-attempts", "[puzzle]\nmax_attempts = 0\n");

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.puzzle.guesses_limit(), GuessesLimit::default());

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn environment_overrides_file() {
        let path = write_config("env", "[oracle]\ntimeout_ms = 500\n");
        std::env::set_var("GUESSLE__ORACLE__TIMEOUT_MS", "250");

        let config = Config::load(Some(path.as_path())).unwrap();
        std::env::remove_var("GUESSLE__ORACLE__TIMEOUT_MS");

        assert_eq!(config.oracle.timeout().as_millis(), 250);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/guessle.toml")));

        assert!(matches!(result, Err(Error::Read(_))));
    }

    #[test]
    fn bad_values_are_parse_errors() {
        let path = write_config("bad-date", "[puzzle]\nfirst_date = \"yesterday\"\n");

        assert!(matches!(Config::load(Some(path.as_path())), Err(Error::Parse(_))));

        fs::remove_file(path).unwrap();
    }

    /// Never answers.
    struct Silent;

    impl OracleGateway for Silent {
        type Error = Infallible;

        async fn ask(&self, _: &OracleRequest) -> Result<String, Infallible> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn oracle_uses_configured_timeout() {
        let oracle = OracleConfig { timeout_ms: 30 }.oracle(Silent);
        let request = OracleRequest::new(&Word::from_str("apple").unwrap(), "is it red?").unwrap();

        match oracle.ask(request).await {
            Err(OracleError::TimedOut(timeout)) => {
                assert_eq!(timeout, Duration::from_millis(30))
            }
            other => panic!("expected a timeout, got {other:?}"),
        }
    }
}
