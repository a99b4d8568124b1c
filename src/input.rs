/// A line typed by the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<'a> {
    Guess(&'a str),
    /// Anything with a question mark goes to the oracle.
    Question(&'a str),
}

impl<'a> Input<'a> {
    pub fn parse(raw: &'a str) -> Option<Self> {
        let raw = raw.trim();

        if raw.is_empty() {
            None
        } else if raw.contains('?') {
            Some(Self::Question(raw))
        } else {
            Some(Self::Guess(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Input;
    use pretty_assertions::assert_eq;

    #[test]
    fn questions_have_question_marks() {
        assert_eq!(Input::parse(" crane\n"), Some(Input::Guess("crane")));
        assert_eq!(
            Input::parse("is it a fruit?"),
            Some(Input::Question("is it a fruit?"))
        );
        assert_eq!(Input::parse("? "), Some(Input::Question("?")));
        assert_eq!(Input::parse("   "), None);
    }
}
