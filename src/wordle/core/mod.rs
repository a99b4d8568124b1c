use std::borrow::Cow;

mod word;
pub use word::{LengthMismatch, ParseWordError, Word};

pub mod guess;
pub use guess::{Guess, GuessSlice, Guesses, LetterState, LetterStates};

/// Compares `guess` against `solution`, marking every letter as correct, present or absent.
///
/// Equivalent to [`Word::evaluate`].
pub fn evaluate(guess: &str, solution: &Word) -> Result<Guess, LengthMismatch> {
    solution.evaluate(guess)
}

/// Lowercases a single character without ever changing how many characters there are.
///
/// Characters whose lowercase form expands to several code points are kept as they are.
pub(crate) fn fold_case(ch: char) -> char {
    let mut lower = ch.to_lowercase();

    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => ch,
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    #[default]
    Standard,
    HighContrast,
}

pub trait AsEmoji {
    fn emoji(&self, palette: Palette) -> Cow<str>;

    fn as_emoji(&self) -> Cow<str> {
        self.emoji(Palette::Standard)
    }
}

impl AsEmoji for LetterState {
    fn emoji(&self, palette: Palette) -> Cow<str> {
        match (self, palette) {
            (Self::Correct, Palette::Standard) => "🟩",     // green square
            (Self::Present, Palette::Standard) => "🟨",     // yellow square
            (Self::Correct, Palette::HighContrast) => "🟧", // orange square
            (Self::Present, Palette::HighContrast) => "🟦", // blue square
            (Self::Absent, _) => "⬛",                      // black square
        }
        .into()
    }
}

impl AsEmoji for [LetterState] {
    fn emoji(&self, palette: Palette) -> Cow<str> {
        self.iter()
            .map(|state| state.emoji(palette))
            .collect::<Vec<_>>()
            .join("")
            .into()
    }
}
