use itertools::Itertools;

use crate::{lexer::Token, parser::ParserError};

fn ends_operand(token: &Token) -> bool {
    matches!(token, Token::Symbol(_) | Token::Close | Token::Star)
}

fn starts_operand(token: &Token) -> bool {
    matches!(token, Token::Symbol(_) | Token::Open)
}

/// Makes concatenation explicit: `a(b)*c` becomes `a.(b)*.c`.
pub fn insert_concatenation(tokens: &[Token]) -> Vec<Token> {
    let mut explicit = Vec::with_capacity(tokens.len() * 2);
    for (index, token) in tokens.iter().enumerate() {
        if index > 0 && ends_operand(&tokens[index - 1]) && starts_operand(token) {
            explicit.push(Token::Concat);
        }
        explicit.push(*token);
    }
    explicit
}

/// Shunting-yard conversion of an infix token sequence.
///
/// `*` goes straight to the output since it is postfix already. Parentheses
/// never reach the output; a `)` with no `(` on the stack, or a `(` left over
/// at the end, is reported instead of being skipped.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>, ParserError> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();

    for (position, token) in insert_concatenation(tokens).into_iter().enumerate() {
        match token {
            Token::Symbol(_) | Token::Star => output.push(token),
            Token::Open => stack.push(token),
            Token::Close => loop {
                match stack.pop() {
                    Some(Token::Open) => break,
                    Some(operator) => output.push(operator),
                    None => return Err(ParserError::UnmatchedCloseParen(position)),
                }
            },
            Token::Union | Token::Concat => {
                while let Some(top) = stack.last() {
                    if *top == Token::Open || top.precedence() < token.precedence() {
                        break;
                    }
                    output.push(*top);
                    stack.pop();
                }
                stack.push(token);
            }
        }
    }

    while let Some(operator) = stack.pop() {
        if operator == Token::Open {
            return Err(ParserError::UnmatchedOpenParen);
        }
        output.push(operator);
    }
    Ok(output)
}

pub fn postfix_string(tokens: &[Token]) -> String {
    tokens.iter().join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn postfix(pattern: &str) -> Result<String, ParserError> {
        let tokens = tokenize(pattern).unwrap();
        to_postfix(&tokens).map(|postfix| postfix_string(&postfix))
    }

    #[test]
    fn test_insert_concatenation() {
        let tokens = tokenize("a(b)*c1").unwrap();
        assert_eq!(postfix_string(&insert_concatenation(&tokens)), "a.(b)*.c.1");
        let tokens = tokenize("a+b").unwrap();
        assert_eq!(postfix_string(&insert_concatenation(&tokens)), "a+b");
    }

    #[test]
    fn test_simple_expressions() {
        assert_eq!(postfix("a"), Ok("a".to_string()));
        assert_eq!(postfix("a+b"), Ok("ab+".to_string()));
        assert_eq!(postfix("ab"), Ok("ab.".to_string()));
        assert_eq!(postfix("a*"), Ok("a*".to_string()));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(postfix("a+bc"), Ok("abc.+".to_string()));
        assert_eq!(postfix("ab+c"), Ok("ab.c+".to_string()));
        assert_eq!(postfix("ab*"), Ok("ab*.".to_string()));
        assert_eq!(postfix("a+b*"), Ok("ab*+".to_string()));
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(postfix("a+b+c"), Ok("ab+c+".to_string()));
        assert_eq!(postfix("a.b.c"), Ok("ab.c.".to_string()));
    }

    #[test]
    fn test_grouping() {
        assert_eq!(postfix("(a+b)*c"), Ok("ab+*c.".to_string()));
        assert_eq!(postfix("(a+b)(c+d)"), Ok("ab+cd+.".to_string()));
        assert_eq!(postfix("((a))"), Ok("a".to_string()));
    }

    #[test]
    fn test_mismatched_parentheses() {
        assert_eq!(postfix(")a("), Err(ParserError::UnmatchedCloseParen(0)));
        assert_eq!(postfix("a)(b"), Err(ParserError::UnmatchedCloseParen(1)));
        assert_eq!(postfix("(a"), Err(ParserError::UnmatchedOpenParen));
    }
}
