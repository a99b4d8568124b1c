use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    collections::BTreeMap,
    fmt::Display,
    ops::{Deref, Index},
};

use super::{fold_case, AsEmoji, Palette};
use crate::wordle::GuessesLimit;

/// A guess paired with the state of each of its letters.
///
/// Only produced by [`Word::evaluate`](super::Word::evaluate), so the states always
/// agree with the solution the guess was scored against.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Guess {
    letters: Vec<(char, LetterState)>,
}

impl Guess {
    pub(super) fn new(word: &str) -> Self {
        let letters = word
            .chars()
            .map(|ch: char| (fold_case(ch), LetterState::Absent))
            .collect::<Vec<(char, LetterState)>>();

        Self { letters }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn is_correct(&self) -> bool {
        self.letters
            .iter()
            .all(|(_, state)| *state == LetterState::Correct)
    }

    pub fn is_correct_at(&self, index: usize) -> bool {
        self[index].1 == LetterState::Correct
    }

    pub fn iter(&self) -> impl Iterator<Item = &(char, LetterState)> + '_ {
        self.letters.iter()
    }

    pub(super) fn iter_mut(&mut self) -> impl Iterator<Item = &mut (char, LetterState)> + '_ {
        self.letters.iter_mut()
    }

    pub fn states(&self) -> impl Iterator<Item = LetterState> + '_ {
        self.letters.iter().map(|(_, state)| *state)
    }

    /// The guessed word, case-folded.
    pub fn word(&self) -> String {
        self.letters.iter().map(|(letter, _)| *letter).collect()
    }

    /// How many times `letter` was marked correct or present.
    pub fn count_marked(&self, letter: char) -> usize {
        let letter = fold_case(letter);

        self.letters
            .iter()
            .filter(|(ch, state)| *ch == letter && *state != LetterState::Absent)
            .count()
    }

    pub fn as_slice(&self) -> &[(char, LetterState)] {
        self.as_ref()
    }
}

impl AsEmoji for Guess {
    fn emoji(&self, palette: Palette) -> Cow<str> {
        self.states()
            .collect::<Vec<LetterState>>()
            .emoji(palette)
            .into_owned()
            .into()
    }
}

impl Index<usize> for Guess {
    type Output = (char, LetterState);

    fn index(&self, index: usize) -> &Self::Output {
        self.letters.index(index)
    }
}

impl Display for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let txt = self
            .letters
            .iter()
            .map(|letter| letter.1.to_string())
            .collect::<String>();

        f.write_str(&txt)
    }
}

impl PartialEq<&str> for Guess {
    fn eq(&self, other: &&str) -> bool {
        &self.to_string() == other
    }
}

impl AsRef<[(char, LetterState)]> for Guess {
    fn as_ref(&self) -> &[(char, LetterState)] {
        &self.letters
    }
}

/// Ordered so that a more informative state compares greater.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
pub enum LetterState {
    #[default]
    Absent,
    Present,
    Correct,
}

impl Display for LetterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Correct => "O",
            Self::Present => "o",
            Self::Absent => ".",
        })
    }
}

/// The guesses of one game, in submission order, capped at a limit.
#[derive(Clone, Debug)]
pub struct Guesses {
    vec: Vec<Guess>,
    limit: GuessesLimit,
}

impl Guesses {
    pub fn new(limit: GuessesLimit) -> Self {
        Self {
            vec: Vec::with_capacity(limit.get()),
            limit,
        }
    }

    pub fn limit(&self) -> GuessesLimit {
        self.limit
    }

    pub fn limit_reached(&self) -> bool {
        self.limit == self.vec.len()
    }

    /// Appends `guess` unless the limit has been reached; returns whether it was added.
    pub(crate) fn push(&mut self, guess: Guess) -> bool {
        if self.limit_reached() {
            return false;
        }

        self.vec.push(guess);
        true
    }
}

impl AsRef<[Guess]> for Guesses {
    fn as_ref(&self) -> &[Guess] {
        &self.vec
    }
}

pub trait GuessSlice: AsRef<[Guess]> {
    fn iter(&self) -> std::slice::Iter<Guess> {
        self.as_slice().iter()
    }

    fn as_slice(&self) -> &[Guess] {
        self.as_ref()
    }

    fn count(&self) -> usize {
        self.as_slice().len()
    }

    fn latest(&self) -> Option<&Guess> {
        self.as_slice().last()
    }

    fn latest_is_solved(&self) -> bool {
        self.latest().is_some_and(Guess::is_correct)
    }

    fn words(&self) -> Vec<String> {
        self.iter().map(Guess::word).collect()
    }

    /// The most informative state seen for each guessed letter.
    fn letter_states(&self) -> LetterStates {
        self.iter()
            .flat_map(|guess| guess.as_slice())
            .copied()
            .collect()
    }
}

impl GuessSlice for Guesses {}

impl AsEmoji for Guesses {
    fn emoji(&self, palette: Palette) -> Cow<str> {
        self.iter()
            .map(|guess| guess.emoji(palette))
            .collect::<Vec<_>>()
            .join("\n")
            .into()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterStates(BTreeMap<char, LetterState>);

impl FromIterator<(char, LetterState)> for LetterStates {
    fn from_iter<T: IntoIterator<Item = (char, LetterState)>>(iter: T) -> Self {
        let mut map = BTreeMap::new();

        for (letter, state) in iter {
            map.entry(letter)
                .and_modify(|best: &mut LetterState| *best = (*best).max(state))
                .or_insert(state);
        }

        Self(map)
    }
}

impl Deref for LetterStates {
    type Target = BTreeMap<char, LetterState>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
