use std::{error::Error, fmt::Display};

use colored::Colorize;
use nom::{
    branch::alt,
    character::complete::{char, satisfy},
    combinator::{all_consuming, map, value},
    multi::many0,
    IResult,
};

use crate::utils::ConversionFlags;

/// A single character of a regular expression, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Symbol(char),
    Union,
    Concat,
    Star,
    Open,
    Close,
}

impl Token {
    pub fn as_char(&self) -> char {
        match self {
            Token::Symbol(c) => *c,
            Token::Union => '+',
            Token::Concat => '.',
            Token::Star => '*',
            Token::Open => '(',
            Token::Close => ')',
        }
    }

    /// Binding strength of an operator, `None` for operands and grouping marks.
    pub fn precedence(&self) -> Option<u8> {
        match self {
            Token::Union => Some(0),
            Token::Concat => Some(1),
            Token::Star => Some(2),
            _ => None,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum InputError {
    EmptyInput,
    InvalidCharacter(char, usize),
    UnbalancedParens { open: usize, close: usize },
}

impl Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = "<!--ERROR OCCURRED--!>".red().bold();
        match *self {
            Self::EmptyInput => write!(
                f,
                "{}\nInput is empty. Please enter a valid regular expression.",
                tag
            ),
            Self::InvalidCharacter(c, position) => write!(
                f,
                "{}\nInvalid character {:?} at position {}. Only alphanumeric characters, \
                '+', '.', '*', '(' and ')' are allowed.",
                tag, c, position
            ),
            Self::UnbalancedParens { open, close } => write!(
                f,
                "{}\nThe open and close brackets aren't paired properly ({} '(' vs {} ')').",
                tag, open, close
            ),
        }
    }
}

impl Error for InputError {}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '*' | '(' | ')')
}

/// Rejects input the core is not meant to see.
///
/// Without `STRICT_PARENS` only the number of `(` and `)` is compared, so
/// something like `")a("` passes and is left for the postfix conversion to
/// reject.
pub fn validate(input: &str, flags: ConversionFlags) -> Result<(), InputError> {
    if input.is_empty() {
        return Err(InputError::EmptyInput);
    }
    if let Some((position, c)) = input.chars().enumerate().find(|(_, c)| !is_allowed(*c)) {
        return Err(InputError::InvalidCharacter(c, position));
    }
    let open = input.chars().filter(|c| *c == '(').count();
    let close = input.chars().filter(|c| *c == ')').count();
    if open != close {
        return Err(InputError::UnbalancedParens { open, close });
    }
    if flags.contains(ConversionFlags::STRICT_PARENS) {
        let mut depth: usize = 0;
        for c in input.chars() {
            match c {
                '(' => depth += 1,
                ')' if depth == 0 => return Err(InputError::UnbalancedParens { open, close }),
                ')' => depth -= 1,
                _ => {}
            }
        }
    }
    Ok(())
}

fn parse_symbol(input: &str) -> IResult<&str, Token> {
    map(satisfy(|c| c.is_ascii_alphanumeric()), Token::Symbol)(input)
}

fn parse_operator(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::Union, char('+')),
        value(Token::Concat, char('.')),
        value(Token::Star, char('*')),
        value(Token::Open, char('(')),
        value(Token::Close, char(')')),
    ))(input)
}

fn parse_token(input: &str) -> IResult<&str, Token> {
    alt((parse_symbol, parse_operator))(input)
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, InputError> {
    if input.is_empty() {
        return Err(InputError::EmptyInput);
    }
    let parsed: IResult<&str, Vec<Token>> = all_consuming(many0(parse_token))(input);
    parsed.map(|(_, tokens)| tokens).map_err(|err| {
        let remainder = match err {
            nom::Err::Error(err) | nom::Err::Failure(err) => err.input,
            nom::Err::Incomplete(_) => input,
        };
        match remainder.chars().next() {
            Some(c) => InputError::InvalidCharacter(
                c,
                input.chars().count() - remainder.chars().count(),
            ),
            None => InputError::EmptyInput,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("a+(b1)*"),
            Ok(vec![
                Token::Symbol('a'),
                Token::Union,
                Token::Open,
                Token::Symbol('b'),
                Token::Symbol('1'),
                Token::Close,
                Token::Star,
            ])
        );
    }

    #[test]
    fn test_tokenize_rejects_unknown_character() {
        assert_eq!(tokenize("ab|c"), Err(InputError::InvalidCharacter('|', 2)));
        assert_eq!(tokenize("|ab"), Err(InputError::InvalidCharacter('|', 0)));
        assert_eq!(tokenize("ab(c) "), Err(InputError::InvalidCharacter(' ', 5)));
        assert_eq!(tokenize(""), Err(InputError::EmptyInput));
    }

    #[test]
    fn test_validate_empty() {
        assert_eq!(
            validate("", ConversionFlags::default()),
            Err(InputError::EmptyInput)
        );
    }

    #[test]
    fn test_validate_invalid_character() {
        assert_eq!(
            validate("a b", ConversionFlags::default()),
            Err(InputError::InvalidCharacter(' ', 1))
        );
        assert_eq!(
            validate("aé", ConversionFlags::NO_FLAG),
            Err(InputError::InvalidCharacter('é', 1))
        );
    }

    #[test]
    fn test_validate_paren_counts() {
        assert_eq!(
            validate("(a", ConversionFlags::NO_FLAG),
            Err(InputError::UnbalancedParens { open: 1, close: 0 })
        );
        assert_eq!(validate("(a+b)*c", ConversionFlags::default()), Ok(()));
    }

    #[test]
    fn test_validate_structure_only_when_strict() {
        assert_eq!(validate(")a(", ConversionFlags::NO_FLAG), Ok(()));
        assert_eq!(
            validate(")a(", ConversionFlags::STRICT_PARENS),
            Err(InputError::UnbalancedParens { open: 1, close: 1 })
        );
    }

    #[test]
    fn test_precedence_order() {
        assert!(Token::Union.precedence() < Token::Concat.precedence());
        assert!(Token::Concat.precedence() < Token::Star.precedence());
        assert_eq!(Token::Open.precedence(), None);
    }
}
