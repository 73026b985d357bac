pub mod dot;
pub mod export;
pub mod fsm;
pub mod lexer;
pub mod parser;
pub mod postfix;
pub mod utils;
