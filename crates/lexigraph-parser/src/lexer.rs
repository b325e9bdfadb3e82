//! Word lexer for raw text.
//!
//! The lexer splits text into alternating runs of word characters and
//! separators. A word is a run of alphanumeric characters, optionally joined
//! by inner apostrophes (`it's`, `rock'n'roll`). Everything else separates
//! words. The public entry point is [`tokenize`].

use winnow::{
    Parser as _,
    combinator::{alt, repeat},
    error::{ContextError, ErrMode},
    stream::Offset,
    token::{one_of, take_while},
};

use crate::error::LexError;

type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// A word as it appeared in the source, with its byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawWord<'a> {
    pub text: &'a str,
    pub offset: usize,
}

const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];

fn alphanumeric_run<'a>(input: &mut &'a str) -> IResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric()).parse_next(input)
}

/// Apostrophe-joined continuations of a word: the `'s` in `it's`.
fn apostrophe_suffixes(input: &mut &str) -> IResult<()> {
    repeat(0.., (one_of(APOSTROPHES), alphanumeric_run)).parse_next(input)
}

fn word<'a>(input: &mut &'a str) -> IResult<&'a str> {
    (alphanumeric_run, apostrophe_suffixes)
        .take()
        .parse_next(input)
}

fn separator<'a>(input: &mut &'a str) -> IResult<&'a str> {
    take_while(1.., |c: char| !c.is_alphanumeric()).parse_next(input)
}

/// Either a word or `None` for a separator run.
fn piece<'a>(input: &mut &'a str) -> IResult<Option<&'a str>> {
    alt((word.map(Some), separator.value(None))).parse_next(input)
}

fn pieces<'a>(input: &mut &'a str) -> IResult<Vec<Option<&'a str>>> {
    repeat(0.., piece).parse_next(input)
}

/// Splits `text` into words in source order.
///
/// # Errors
///
/// Returns [`LexError::Binary`] for text dominated by control characters and
/// [`LexError::Incomplete`] if the lexer cannot consume the whole input.
pub(crate) fn tokenize(text: &str) -> Result<Vec<RawWord<'_>>, LexError> {
    let control_chars = text
        .chars()
        .filter(|c| c.is_control() && !c.is_whitespace())
        .count();
    if control_chars > 0 && control_chars * 10 >= text.chars().count() {
        return Err(LexError::Binary(control_chars));
    }

    let mut input = text;
    let parsed = pieces(&mut input);

    match parsed {
        Ok(pieces) if input.is_empty() => Ok(pieces
            .into_iter()
            .flatten()
            .map(|word| RawWord {
                text: word,
                offset: word.offset_from(&text),
            })
            .collect()),
        _ => Err(LexError::Incomplete(input.offset_from(&text))),
    }
}

/// Folds typographic apostrophes into ASCII and lowercases a word.
pub(crate) fn normalize_word(word: &str) -> String {
    word.replace('\u{2019}', "'").to_lowercase()
}
