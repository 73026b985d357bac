use std::{
    env,
    io::{self, BufRead, Write},
    path::Path,
};

use colored::Colorize;
use reg_enfa::{
    dot::render,
    export::{transition_table, Description},
    fsm::RegexNFA,
    utils::ConversionFlags,
};

const GRAPH_FILE: &str = "E-NFA_transition_graph.png";

fn flags_from_args() -> ConversionFlags {
    let mut flags = ConversionFlags::default();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--debug" => flags |= ConversionFlags::DEBUG,
            "--lenient-parens" => flags.remove(ConversionFlags::STRICT_PARENS),
            other => eprintln!("{} {}", "ignoring unknown argument".yellow(), other),
        }
    }
    flags
}

fn prompt(input: &mut impl BufRead) -> io::Result<Option<String>> {
    print!("\nPlease Enter The Correct Regex: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string()))
}

fn main() -> io::Result<()> {
    let flags = flags_from_args();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let nfa = loop {
        let pattern = match prompt(&mut input)? {
            Some(pattern) => pattern,
            None => return Ok(()),
        };
        println!("Processing...");
        let mut nfa = RegexNFA::new(&pattern).with_flags(flags);
        match nfa.compile() {
            Ok(()) => break nfa,
            Err(err) => eprintln!("{}", err),
        }
    };

    let description = match Description::of(&nfa) {
        Some(description) => description,
        None => return Ok(()),
    };

    println!("\nPostfix: {}", nfa.postfix().bold());
    println!("\n\t     Transition Table");
    println!("============================================");
    print!("{}", transition_table(&description));

    println!("Visualizing Transition...");
    match render(&description, Path::new(GRAPH_FILE)) {
        Ok(()) => println!("Transition graph is saved as {}", GRAPH_FILE.green()),
        Err(err) => eprintln!("{} {}", "could not render the graph:".yellow(), err),
    }
    Ok(())
}
