use thiserror::Error as ThisError;

use crate::{
    framework::config,
    oracle::OracleError,
    stats::MigrationError,
    store::StoreError,
    wordle::{DailyError, GameError, WordsListError},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Daily(#[from] DailyError),

    #[error(transparent)]
    Words(#[from] WordsListError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error(transparent)]
    Config(#[from] config::Error),
}

impl Error {
    /// Whether the player can fix this by typing something else.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::Game(err) => !matches!(err, GameError::LengthMismatch(_)),
            Self::Oracle(OracleError::EmptyQuestion | OracleError::InFlight) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use crate::{
        oracle::OracleError,
        store::StoreError,
        wordle::{GameError, LengthMismatch},
    };

    #[test]
    fn user_errors() {
        assert!(Error::from(GameError::HardModeLocked).is_user_error());
        assert!(Error::from(GameError::WrongLength {
            expected: 5,
            found: 4
        })
        .is_user_error());
        assert!(Error::from(OracleError::InFlight).is_user_error());

        assert!(!Error::from(GameError::LengthMismatch(LengthMismatch {
            guess: 4,
            solution: 5
        }))
        .is_user_error());
        assert!(!Error::from(StoreError::Other("disk full".to_owned())).is_user_error());
    }
}
