use thiserror::Error;
use tracing::{debug, instrument};

use super::core::{fold_case, Guess, LetterState};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardModeViolation {
    #[error("letter {position} must be {}", .letter.to_uppercase())]
    MissingCorrectLetter { letter: char, position: usize },

    #[error("guess must contain {}", .letter.to_uppercase())]
    MissingPresentLetter { letter: char },
}

impl HardModeViolation {
    pub fn letter(&self) -> char {
        match self {
            Self::MissingCorrectLetter { letter, .. } | Self::MissingPresentLetter { letter } => {
                *letter
            }
        }
    }

    /// 1-based position the letter is required at, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::MissingCorrectLetter { position, .. } => Some(*position),
            Self::MissingPresentLetter { .. } => None,
        }
    }
}

/// Checks that `candidate` reuses every hint revealed by the `prior` guesses.
///
/// Letters marked correct must stay at their position and letters marked present must
/// appear somewhere. Prior guesses are checked in order, each one's correct letters
/// before its present letters, and the first unmet hint is returned.
#[instrument(level = "debug", skip(prior), fields(prior = prior.len()))]
pub fn validate(candidate: &str, prior: &[Guess]) -> Result<(), HardModeViolation> {
    let candidate = candidate.chars().map(fold_case).collect::<Vec<char>>();

    for guess in prior {
        for (index, (letter, state)) in guess.iter().enumerate() {
            if *state == LetterState::Correct && candidate.get(index) != Some(letter) {
                debug!(%letter, position = index + 1, "correct letter moved");

                return Err(HardModeViolation::MissingCorrectLetter {
                    letter: *letter,
                    position: index + 1,
                });
            }
        }

        if let Some((letter, _)) = guess
            .iter()
            .find(|(letter, state)| *state == LetterState::Present && !candidate.contains(letter))
        {
            debug!(%letter, "present letter dropped");

            return Err(HardModeViolation::MissingPresentLetter { letter: *letter });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::{validate, HardModeViolation};
    use crate::wordle::{Guess, Word};

    fn history(solution: &str, guesses: &[&str]) -> Vec<Guess> {
        let solution = Word::from_str(solution).unwrap();

        guesses
            .iter()
            .map(|guess| solution.evaluate(guess).unwrap())
            .collect()
    }

    #[test]
    fn no_history_accepts_anything() {
        assert_eq!(validate("zzzzz", &[]), Ok(()));
    }

    #[test]
    fn correct_letter_must_stay() {
        // A is correct at position 2
        let prior = history("cacao", &["hasty"]);

        assert_eq!(
            validate("tiger", &prior),
            Err(HardModeViolation::MissingCorrectLetter {
                letter: 'a',
                position: 2
            })
        );
        assert_eq!(validate("maybe", &prior), Ok(()));
    }

    #[test]
    fn present_letter_may_move() {
        // R and E present, nothing correct
        let prior = history("crane", &["ester"]);

        assert_eq!(validate("rebus", &prior), Ok(()));
        assert_eq!(
            validate("rusty", &prior),
            Err(HardModeViolation::MissingPresentLetter { letter: 'e' })
        );
    }

    #[test]
    fn constraints_accumulate_across_guesses() {
        // first guess reveals R present, second reveals C correct
        let prior = history("crane", &["burly", "cough"]);

        assert_eq!(validate("crime", &prior), Ok(()));
        assert_eq!(
            validate("carol", &prior),
            Ok(()),
            "present letters may be satisfied anywhere"
        );
        assert_eq!(
            validate("coast", &prior),
            Err(HardModeViolation::MissingPresentLetter { letter: 'r' })
        );
        assert_eq!(
            validate("track", &prior),
            Err(HardModeViolation::MissingCorrectLetter {
                letter: 'c',
                position: 1
            })
        );
    }

    #[test]
    fn first_unmet_constraint_wins() {
        let prior = history("crane", &["crust"]);

        // both C and R are missing; C comes first
        assert_eq!(
            validate("moldy", &prior),
            Err(HardModeViolation::MissingCorrectLetter {
                letter: 'c',
                position: 1
            })
        );
    }

    #[test]
    fn comparison_ignores_case() {
        let prior = history("crane", &["CRUST"]);

        assert_eq!(validate("CRIME", &prior), Ok(()));
    }

    #[test]
    fn violation_accessors() {
        let violation = HardModeViolation::MissingCorrectLetter {
            letter: 'a',
            position: 2,
        };

        assert_eq!(violation.letter(), 'a');
        assert_eq!(violation.position(), Some(2));
        assert_eq!(violation.to_string(), "letter 2 must be A");
        assert_eq!(
            HardModeViolation::MissingPresentLetter { letter: 'e' }.to_string(),
            "guess must contain E"
        );
    }
}
