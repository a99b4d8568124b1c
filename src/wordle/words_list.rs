use super::core::{ParseWordError, Word};
use std::{fs, path::Path, str::FromStr};
use thiserror::Error;
use tracing::{debug, instrument};

const BUILTIN_ANSWERS: &str = include_str!("../../words/answers.txt");

/// The answers daily puzzles are drawn from.
#[derive(Debug, Clone)]
pub struct WordsList {
    answers: Vec<Word>,
}

#[derive(Debug, Error)]
pub enum WordsListError {
    #[error("couldn't read words file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line} is not a valid word: {source}")]
    InvalidWord {
        line: usize,
        #[source]
        source: ParseWordError,
    },

    #[error("words list has no answers")]
    Empty,
}

impl WordsList {
    /// The answers compiled into the crate.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_ANSWERS).expect("built-in answers should be valid")
    }

    /// One word per line; blank lines and lines starting with `#` are skipped.
    pub fn parse(text: &str) -> Result<Self, WordsListError> {
        let answers = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
            .map(|(line, word)| {
                Word::from_str(word).map_err(|source| WordsListError::InvalidWord { line, source })
            })
            .collect::<Result<Vec<Word>, _>>()?;

        if answers.is_empty() {
            return Err(WordsListError::Empty);
        }

        Ok(Self { answers })
    }

    #[instrument]
    pub fn load(path: &Path) -> Result<Self, WordsListError> {
        let list = Self::parse(&fs::read_to_string(path)?)?;
        debug!(answers = list.len(), "loaded words list");

        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// The answer at `index`, wrapping around the end of the list.
    pub fn get(&self, index: usize) -> &Word {
        &self.answers[index % self.answers.len()]
    }

    pub fn contains(&self, word: &str) -> bool {
        self.answers.iter().any(|answer| answer.matches(word))
    }
}
