use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use super::{core::Word, WordsList};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPuzzle {
    pub number: u32,
    pub date: NaiveDate,
    answer: Word,
}

impl DailyPuzzle {
    pub fn new(number: u32, date: NaiveDate, answer: Word) -> Self {
        Self {
            number,
            date,
            answer,
        }
    }

    pub fn answer(&self) -> &Word {
        &self.answer
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DailyError {
    #[error("there was no puzzle on {date}, the first one was on {first}")]
    BeforeFirstPuzzle { date: NaiveDate, first: NaiveDate },

    #[error("the puzzle for {date} isn't out yet (today is {today})")]
    FuturePuzzle { date: NaiveDate, today: NaiveDate },
}

/// Maps calendar dates to puzzles: one answer per day, in words list order, starting
/// from the first puzzle's date.
#[derive(Debug, Clone)]
pub struct SolutionCalendar {
    first_date: NaiveDate,
    words: WordsList,
}

impl SolutionCalendar {
    pub fn new(first_date: NaiveDate, words: WordsList) -> Self {
        Self { first_date, words }
    }

    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }

    /// Number of the puzzle published on `date`, counted in days from the first one.
    pub fn number_for(&self, date: NaiveDate) -> Result<u32, DailyError> {
        let days = (date - self.first_date).num_days();

        u32::try_from(days).map_err(|_| DailyError::BeforeFirstPuzzle {
            date,
            first: self.first_date,
        })
    }

    /// The solution for `date`. The same date always gives the same word.
    pub fn solution_for(&self, date: NaiveDate) -> Result<&Word, DailyError> {
        let number = self.number_for(date)?;
        Ok(self.words.get(number as usize))
    }

    /// The puzzle for `date`, which may be any day from the first puzzle up to `today`.
    #[instrument(skip(self))]
    pub fn puzzle_for(&self, date: NaiveDate, today: NaiveDate) -> Result<DailyPuzzle, DailyError> {
        if date > today {
            return Err(DailyError::FuturePuzzle { date, today });
        }

        let number = self.number_for(date)?;
        let answer = self.words.get(number as usize).clone();

        debug!(number, "found puzzle");

        Ok(DailyPuzzle::new(number, date, answer))
    }

    pub fn latest(&self, today: NaiveDate) -> Result<DailyPuzzle, DailyError> {
        self.puzzle_for(today, today)
    }

    /// Only the latest puzzle counts towards statistics.
    pub fn is_latest(&self, date: NaiveDate, today: NaiveDate) -> bool {
        date == today
    }
}
