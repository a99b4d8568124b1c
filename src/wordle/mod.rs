pub mod core;
pub use self::core::{
    evaluate, AsEmoji, Guess, GuessSlice, Guesses, LengthMismatch, LetterState, LetterStates,
    Palette, ParseWordError, Word,
};

mod hard_mode;
pub use hard_mode::{validate as validate_hard_mode, HardModeViolation};

mod game;
pub use game::{
    Game, GameError, GameOptions, GameState, GuessesLimit, Outcome, PersistReport, StaleSnapshot,
    Submission, DEFAULT_MAX_ATTEMPTS,
};

mod daily;
pub use daily::{DailyError, DailyPuzzle, SolutionCalendar};

mod words_list;
pub use words_list::{WordsList, WordsListError};
