use colored::Colorize;
use std::{error::Error, fmt::Display, mem};

use self::visitor::Visitor;
use crate::lexer::Token;

/// Expression tree. Every walk over it, teardown included, uses an explicit
/// stack: `abc...` chains are as deep as the pattern is long.
#[derive(Debug, PartialEq, Eq)]
pub enum Node {
    Symbol(char),
    Concat(Box<Node>, Box<Node>),
    Union(Box<Node>, Box<Node>),
    Kleene(Box<Node>),
}

enum Step<'a> {
    Enter(&'a Node),
    Exit(&'a Node),
}

pub(crate) trait Data {
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Result;
}

impl Data for Node {
    /// Post-order walk; children are always visited before their parent.
    fn accept<V: Visitor>(&self, visitor: &mut V) -> V::Result {
        let mut work = vec![Step::Enter(self)];
        let mut results: Vec<V::Result> = Vec::new();
        while let Some(step) = work.pop() {
            match step {
                Step::Enter(node) => match node {
                    Self::Symbol(symbol) => results.push(visitor.visit_symbol(*symbol)),
                    Self::Concat(left, right) | Self::Union(left, right) => {
                        work.push(Step::Exit(node));
                        work.push(Step::Enter(right));
                        work.push(Step::Enter(left));
                    }
                    Self::Kleene(inner) => {
                        work.push(Step::Exit(node));
                        work.push(Step::Enter(inner));
                    }
                },
                Step::Exit(node) => {
                    let result = match node {
                        Self::Kleene(_) => match results.pop() {
                            Some(inner) => visitor.visit_kleene(inner),
                            None => unreachable!("kleene visited before its operand"),
                        },
                        _ => match (results.pop(), results.pop()) {
                            (Some(right), Some(left)) => match node {
                                Self::Union(_, _) => visitor.visit_union(left, right),
                                _ => visitor.visit_concat(left, right),
                            },
                            _ => unreachable!("operator visited before its operands"),
                        },
                    };
                    results.push(result);
                }
            }
        }
        match results.pop() {
            Some(result) => result,
            None => unreachable!("the root always yields a result"),
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut detached = Vec::new();
        self.detach_children(&mut detached);
        while let Some(mut node) = detached.pop() {
            node.detach_children(&mut detached);
        }
    }
}

impl Node {
    /// Builds the expression tree from a postfix token sequence.
    pub fn from_postfix(postfix: &[Token]) -> Result<Node, ParserError> {
        let mut stack: Vec<Node> = Vec::new();
        for token in postfix {
            let node = match *token {
                Token::Symbol(symbol) => Node::Symbol(symbol),
                Token::Union | Token::Concat => {
                    let right = stack.pop();
                    let left = stack.pop();
                    match (left, right) {
                        (Some(left), Some(right)) => {
                            if *token == Token::Union {
                                Node::Union(Box::new(left), Box::new(right))
                            } else {
                                Node::Concat(Box::new(left), Box::new(right))
                            }
                        }
                        _ => return Err(ParserError::MissingOperand(token.as_char())),
                    }
                }
                Token::Star => match stack.pop() {
                    Some(inner) => Node::Kleene(Box::new(inner)),
                    None => return Err(ParserError::MissingOperand('*')),
                },
                Token::Open | Token::Close => {
                    return Err(ParserError::UnexpectedToken(token.as_char()))
                }
            };
            stack.push(node);
        }

        match stack.len() {
            0 => Err(ParserError::EmptyExpression),
            1 => stack.pop().ok_or(ParserError::EmptyExpression),
            n => Err(ParserError::DanglingOperands(n)),
        }
    }

    /// Infix reading of the tree, without grouping marks.
    pub fn tokens_inorder(&self) -> Vec<Token> {
        self.inorder(false)
    }

    fn inorder(&self, grouped: bool) -> Vec<Token> {
        enum Item<'a> {
            Tree(&'a Node),
            Emit(Token),
        }

        let mut tokens = Vec::new();
        let mut work = vec![Item::Tree(self)];
        while let Some(item) = work.pop() {
            match item {
                Item::Emit(token) => tokens.push(token),
                Item::Tree(node) => match node {
                    Node::Symbol(symbol) => tokens.push(Token::Symbol(*symbol)),
                    Node::Kleene(inner) => {
                        work.push(Item::Emit(Token::Star));
                        work.push(Item::Tree(inner));
                    }
                    Node::Concat(left, right) | Node::Union(left, right) => {
                        let operator = match node {
                            Node::Union(_, _) => Token::Union,
                            _ => Token::Concat,
                        };
                        if grouped {
                            work.push(Item::Emit(Token::Close));
                        }
                        work.push(Item::Tree(right));
                        work.push(Item::Emit(operator));
                        work.push(Item::Tree(left));
                        if grouped {
                            work.push(Item::Emit(Token::Open));
                        }
                    }
                },
            }
        }
        tokens
    }

    /// Moves the children out, leaving leaves behind, so dropping `self`
    /// afterwards doesn't recurse.
    fn detach_children(&mut self, detached: &mut Vec<Node>) {
        match self {
            Node::Symbol(_) => {}
            Node::Concat(left, right) | Node::Union(left, right) => {
                detached.push(mem::replace(left.as_mut(), Node::Symbol('\0')));
                detached.push(mem::replace(right.as_mut(), Node::Symbol('\0')));
            }
            Node::Kleene(inner) => {
                detached.push(mem::replace(inner.as_mut(), Node::Symbol('\0')));
            }
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for token in self.inorder(true) {
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}

/// Reasons an expression that passed validation still can't be read.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParserError {
    /// Index into the expression with explicit concatenation inserted.
    UnmatchedCloseParen(usize),
    UnmatchedOpenParen,
    MissingOperand(char),
    DanglingOperands(usize),
    UnexpectedToken(char),
    EmptyExpression,
}

impl Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = "malformed expression:".red().bold();
        match *self {
            Self::UnmatchedCloseParen(position) => {
                write!(f, "{} ')' at {} closes nothing", tag, position)
            }
            Self::UnmatchedOpenParen => write!(f, "{} '(' is never closed", tag),
            Self::MissingOperand(operator) => {
                write!(f, "{} not enough operands for '{}'", tag, operator)
            }
            Self::DanglingOperands(count) => write!(
                f,
                "{} {} sub-expressions are not joined by an operator",
                tag, count
            ),
            Self::UnexpectedToken(token) => write!(f, "{} unexpected '{}'", tag, token),
            Self::EmptyExpression => write!(f, "{} nothing to match", tag),
        }
    }
}

impl Error for ParserError {}

pub mod visitor {
    /// Receives each node after its children, together with their results.
    pub trait Visitor {
        type Result;
        fn visit_symbol(&mut self, symbol: char) -> Self::Result;
        fn visit_concat(&mut self, left: Self::Result, right: Self::Result) -> Self::Result;
        fn visit_union(&mut self, left: Self::Result, right: Self::Result) -> Self::Result;
        fn visit_kleene(&mut self, inner: Self::Result) -> Self::Result;
    }
}
