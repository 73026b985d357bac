use std::{collections::BTreeSet, error::Error, fmt::Display, ops::Range};

use crate::{
    lexer::{tokenize, validate, InputError, Token},
    parser::{visitor::Visitor, Data, Node, ParserError},
    postfix::{postfix_string, to_postfix},
    utils::ConversionFlags,
};

/// Handle into the state arena of a [`RegexNFA`].
pub type State = usize;

#[derive(Hash, Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Label {
    Epsilon,
    Symbol(char),
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Epsilon => write!(f, "ε"),
            Label::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// All edges leaving a state under one label, in insertion order.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Transition {
    pub label: Label,
    pub targets: Vec<State>,
}

impl Transition {
    pub fn new(label: Label, end: State) -> Self {
        Self {
            label,
            targets: vec![end],
        }
    }
}

#[derive(Debug)]
pub struct RegexNFA {
    pattern: String,
    flags: ConversionFlags,
    postfix: Vec<Token>,
    pub start: State,
    pub accept: State,
    alphabet: BTreeSet<char>,
    transitions: Vec<Vec<Transition>>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ReError {
    InvalidInput(InputError),
    MalformedExpression(ParserError),
}

impl Display for ReError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "{}", err),
            Self::MalformedExpression(err) => write!(f, "{}", err),
        }
    }
}

impl Error for ReError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::MalformedExpression(err) => Some(err),
        }
    }
}

impl From<InputError> for ReError {
    fn from(err: InputError) -> Self {
        ReError::InvalidInput(err)
    }
}

impl From<ParserError> for ReError {
    fn from(err: ParserError) -> Self {
        ReError::MalformedExpression(err)
    }
}

/// Entry and exit state of the automaton for one sub-expression.
pub type Fragment = (State, State);

impl RegexNFA {
    pub fn new(pattern: &str) -> RegexNFA {
        RegexNFA {
            pattern: String::from(pattern),
            flags: ConversionFlags::default(),
            postfix: Vec::new(),
            start: Default::default(),
            accept: Default::default(),
            alphabet: BTreeSet::new(),
            transitions: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: ConversionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn get_flags(&self) -> ConversionFlags {
        self.flags
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn postfix(&self) -> String {
        postfix_string(&self.postfix)
    }

    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn states(&self) -> Range<State> {
        0..self.transitions.len()
    }

    pub fn transitions(&self, state: State) -> &[Transition] {
        self.transitions
            .get(state)
            .map(|transitions| transitions.as_slice())
            .unwrap_or(&[])
    }

    pub fn out_degree(&self, state: State) -> usize {
        self.transitions(state)
            .iter()
            .map(|transition| transition.targets.len())
            .sum()
    }

    pub fn edge_count(&self) -> usize {
        self.states().map(|state| self.out_degree(state)).sum()
    }

    /// Validates the pattern and runs it through postfix conversion, tree
    /// construction and Thompson's construction.
    ///
    /// Any previously built automaton is discarded first, so compiling the
    /// same pattern twice gives the same state numbering.
    pub fn compile(&mut self) -> Result<(), ReError> {
        validate(&self.pattern, self.flags)?;
        let tokens = tokenize(&self.pattern)?;
        let postfix = to_postfix(&tokens)?;
        let root = Node::from_postfix(&postfix)?;

        if self.flags.intersects(ConversionFlags::DEBUG) {
            eprintln!("postfix: {}", postfix_string(&postfix));
            eprintln!("tree: {}", root);
        }

        self.transitions.clear();
        self.alphabet.clear();
        let (start, accept) = self.build(&root);
        self.start = start;
        self.accept = accept;
        self.postfix = postfix;
        Ok(())
    }

    /// Builds the fragment for `node` inside this automaton's arena.
    pub fn build(&mut self, node: &Node) -> Fragment {
        let fragment = node.accept(self);
        debug_assert_eq!(self.out_degree(fragment.1), 0);
        fragment
    }

    pub fn gen_state(&mut self) -> State {
        self.transitions.push(Vec::new());
        self.transitions.len() - 1
    }

    pub fn fragment(&mut self) -> Fragment {
        (self.gen_state(), self.gen_state())
    }

    pub fn add_transition(&mut self, start: State, end: State, label: Label) {
        if let Label::Symbol(symbol) = label {
            self.alphabet.insert(symbol);
        }

        let transitions = &mut self.transitions[start];
        match transitions.iter_mut().find(|t| t.label == label) {
            Some(transition) => {
                if !transition.targets.contains(&end) {
                    transition.targets.push(end);
                }
            }
            None => transitions.push(Transition::new(label, end)),
        }
    }

    pub fn epsilon(&mut self, start: State, end: State) {
        self.add_transition(start, end, Label::Epsilon)
    }
}

impl Visitor for RegexNFA {
    type Result = Fragment;

    fn visit_symbol(&mut self, symbol: char) -> Self::Result {
        let (start, end) = self.fragment();
        self.add_transition(start, end, Label::Symbol(symbol));
        (start, end)
    }

    fn visit_concat(&mut self, left: Fragment, right: Fragment) -> Self::Result {
        debug_assert_eq!(self.out_degree(left.1), 0);
        self.epsilon(left.1, right.0);
        (left.0, right.1)
    }

    fn visit_union(&mut self, upper: Fragment, lower: Fragment) -> Self::Result {
        debug_assert_eq!(self.out_degree(upper.1) + self.out_degree(lower.1), 0);
        let fragment = self.fragment();
        self.epsilon(fragment.0, upper.0);
        self.epsilon(fragment.0, lower.0);
        self.epsilon(upper.1, fragment.1);
        self.epsilon(lower.1, fragment.1);
        fragment
    }

    fn visit_kleene(&mut self, sub: Fragment) -> Self::Result {
        debug_assert_eq!(self.out_degree(sub.1), 0);
        let fragment = self.fragment();
        self.epsilon(fragment.0, sub.0);
        self.epsilon(fragment.0, fragment.1);
        self.epsilon(sub.1, sub.0);
        self.epsilon(sub.1, fragment.1);
        fragment
    }
}
