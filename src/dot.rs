use std::{
    env::temp_dir,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    process::{self, Command},
};

use crate::{export::Description, fsm::Label};

/// GraphViz source for the automaton, laid out left to right.
pub fn to_dot(description: &Description) -> String {
    let mut out = String::new();
    out += "  __start [shape=point style=invis]\n";
    for id in &description.states {
        let shape = if *id == description.accept {
            "doublecircle"
        } else {
            "circle"
        };
        out += &format!("  {}[shape={}]\n", Description::state_name(*id), shape);
    }
    out += &format!(
        "  __start -> {}\n",
        Description::state_name(description.start)
    );
    for edge in description.edges() {
        let style = match edge.label {
            Label::Epsilon => " style=dashed",
            Label::Symbol(_) => "",
        };
        out += &format!(
            "  {} -> {}[label=\"{}\"{}]\n",
            Description::state_name(edge.from),
            Description::state_name(edge.to),
            edge.label,
            style
        );
    }
    format!(
        "digraph G {{\n  rankdir=\"LR\"\n  node [fontname = \"verdana\"];\n  edge [fontname = \"verdana\"];\n{}}}\n",
        out
    )
}

/// Scratch file for the DOT source, unique to this process.
fn dot_source_path() -> PathBuf {
    let mut path = temp_dir();
    path.push(format!("enfa-{}.dot", process::id()));
    path
}

/// Hands the graph to the GraphViz `dot` executable and writes a PNG to `output`.
///
/// The intermediate DOT file is removed whether or not `dot` succeeds.
pub fn render(description: &Description, output: &Path) -> Result<(), io::Error> {
    let dot_path = dot_source_path();

    let mut file = File::create(&dot_path)?;
    let written = file.write_all(to_dot(description).as_bytes());
    drop(file);
    let status = written.and_then(|_| {
        Command::new("dot")
            .arg("-Tpng")
            .arg(&dot_path)
            .arg("-o")
            .arg(output)
            .status()
    });
    let _ = fs::remove_file(&dot_path);

    let status = status?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("dot exited with {}", status),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsm::RegexNFA;

    fn dot(pattern: &str) -> String {
        let mut nfa = RegexNFA::new(pattern);
        nfa.compile().unwrap();
        to_dot(&Description::of(&nfa).unwrap())
    }

    #[test]
    fn test_single_symbol_graph() {
        let graph = dot("a");
        assert!(graph.starts_with("digraph G {"));
        assert!(graph.contains("  q0[shape=circle]\n"));
        assert!(graph.contains("  q1[shape=doublecircle]\n"));
        assert!(graph.contains("  __start -> q0\n"));
        assert!(graph.contains("  q0 -> q1[label=\"a\"]\n"));
        assert!(graph.trim_end().ends_with('}'));
    }

    #[test]
    fn test_epsilon_edges_are_dashed() {
        let graph = dot("a*");
        assert!(graph.contains("  q0 -> q1[label=\"ε\" style=dashed]\n"));
        assert!(graph.contains("  q3 -> q2[label=\"ε\" style=dashed]\n"));
        assert_eq!(graph.matches(" -> ").count(), 6);
    }

    #[test]
    fn test_render_leaves_no_scratch_file() {
        let mut nfa = RegexNFA::new("ab");
        nfa.compile().unwrap();
        let description = Description::of(&nfa).unwrap();
        let mut output = temp_dir();
        output.push(format!("enfa-{}.png", process::id()));

        // succeeds or fails depending on whether GraphViz is installed
        let _ = render(&description, &output);
        assert!(!dot_source_path().exists());
        let _ = fs::remove_file(&output);
    }
}
