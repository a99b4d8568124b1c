use std::{collections::HashMap, ops::Index, slice::Iter, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use super::{
    fold_case,
    guess::{Guess, LetterState},
};

/// A solution word.
///
/// Letters are case-folded on parse, and the length is whatever the parsed word's
/// character count is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word {
    letters: Vec<char>,
    letter_counts: HashMap<char, usize>,
}

impl Word {
    pub fn iter(&self) -> Iter<'_, char> {
        self.letters.iter()
    }

    /// Number of letters, counted in chars.
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn count_of(&self, letter: char) -> usize {
        self.letter_counts
            .get(&fold_case(letter))
            .copied()
            .unwrap_or_default()
    }

    /// Case-insensitive comparison against a raw string.
    pub fn matches(&self, raw: &str) -> bool {
        raw.chars().map(fold_case).eq(self.iter().copied())
    }

    /// Scores `word` against this solution.
    ///
    /// Exact matches are marked first and use up their letter, then every other letter is
    /// marked present while unused copies of it remain in the solution.
    pub fn evaluate(&self, word: &str) -> Result<Guess, LengthMismatch> {
        let mut guess = Guess::new(word);

        if guess.len() != self.len() {
            return Err(LengthMismatch {
                guess: guess.len(),
                solution: self.len(),
            });
        }

        trace!(answer = %self, counts = ?self.letter_counts);

        let mut letter_counts = self.letter_counts.clone();

        for (index, (letter, state)) in guess.iter_mut().enumerate() {
            if self[index] == *letter {
                *state = LetterState::Correct;

                if let Some(count) = letter_counts.get_mut(letter) {
                    *count = count.saturating_sub(1);
                }
            }
        }

        for (letter, state) in guess.iter_mut() {
            if *state == LetterState::Correct {
                continue;
            }

            if let Some(count) = letter_counts.get_mut(letter).filter(|count| **count > 0) {
                trace!("{}: present", letter);

                *state = LetterState::Present;
                *count -= 1;
            }
        }

        debug!(word, result = %guess);

        Ok(guess)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWordError {
    #[error("word must have at least one letter")]
    Empty,

    #[error("word `{0}` contains whitespace")]
    Whitespace(String),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("guess has {guess} letters but the solution has {solution}")]
pub struct LengthMismatch {
    pub guess: usize,
    pub solution: usize,
}

impl FromStr for Word {
    type Err = ParseWordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseWordError::Empty);
        }

        if s.chars().any(char::is_whitespace) {
            return Err(ParseWordError::Whitespace(s.to_owned()));
        }

        let letters = s.chars().map(fold_case).collect::<Vec<char>>();

        let mut letter_counts: HashMap<char, usize> = HashMap::new();
        for letter in letters.iter() {
            *letter_counts.entry(*letter).or_default() += 1;
        }

        Ok(Self {
            letters,
            letter_counts,
        })
    }
}

impl TryFrom<String> for Word {
    type Error = ParseWordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<Word> for String {
    fn from(value: Word) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letters.iter().collect::<String>())
    }
}

impl Index<usize> for Word {
    type Output = char;

    fn index(&self, index: usize) -> &Self::Output {
        self.letters.index(index)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{LengthMismatch, ParseWordError, Word};
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_folds_case() {
        let word = Word::from_str("ApPlE").unwrap();

        assert_eq!(word.to_string(), "apple");
        assert_eq!(word.count_of('P'), 2);
        assert!(word.matches("APPLE"));
        assert!(!word.matches("apples"));
    }

    #[test]
    fn parse_rejects_empty_and_spaced() {
        assert_eq!(Word::from_str(""), Err(ParseWordError::Empty));
        assert_eq!(
            Word::from_str("ice cream"),
            Err(ParseWordError::Whitespace("ice cream".to_owned()))
        );
    }

    #[test]
    fn length_is_counted_in_chars() {
        let word = Word::from_str("ñandú").unwrap();

        assert_eq!(word.len(), 5);
        assert!(word.evaluate("ñandu").is_ok());
        assert_eq!(
            word.evaluate("nandus"),
            Err(LengthMismatch {
                guess: 6,
                solution: 5
            })
        );
    }

    #[test]
    fn any_length_is_a_valid_solution() {
        let word = Word::from_str("cat").unwrap();
        assert_eq!(word.evaluate("act").unwrap(), "ooO");

        let word = Word::from_str("planets").unwrap();
        assert_eq!(word.evaluate("planets").unwrap(), "OOOOOOO");
    }

    #[test]
    fn serde_as_string() {
        let word = Word::from_str("crane").unwrap();
        let json = serde_json::to_string(&word).unwrap();

        assert_eq!(json, "\"crane\"");
        assert_eq!(serde_json::from_str::<Word>(&json).unwrap(), word);
        assert!(serde_json::from_str::<Word>("\"\"").is_err());
    }
}
