use std::collections::VecDeque;

use itertools::Itertools;

use crate::fsm::{Label, RegexNFA, State};

/// Outgoing edges of one enumerated state under one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRecord {
    pub state: usize,
    pub label: Label,
    pub destinations: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub label: Label,
    pub to: usize,
}

/// Renumbered view of an automaton, independent of the arena it came from.
///
/// States are numbered breadth-first from the start state (which is `0`),
/// following each state's transitions in the order they were added.
/// `records` is sorted by `state`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub states: Vec<usize>,
    pub records: Vec<TransitionRecord>,
    pub start: usize,
    pub accept: usize,
}

impl Description {
    /// `None` if the accept state can't be reached, which only happens for an
    /// automaton that was never compiled.
    pub fn of(nfa: &RegexNFA) -> Option<Description> {
        if nfa.state_count() == 0 {
            return None;
        }
        let mut ids: Vec<Option<usize>> = vec![None; nfa.state_count()];
        let mut order: Vec<State> = vec![nfa.start];
        let mut queue: VecDeque<State> = VecDeque::from([nfa.start]);
        let mut records = Vec::new();
        ids[nfa.start] = Some(0);

        while let Some(state) = queue.pop_front() {
            let id = ids[state]?;
            for transition in nfa.transitions(state) {
                let mut destinations = Vec::with_capacity(transition.targets.len());
                for target in &transition.targets {
                    let target_id = match ids[*target] {
                        Some(target_id) => target_id,
                        None => {
                            let target_id = order.len();
                            ids[*target] = Some(target_id);
                            order.push(*target);
                            queue.push_back(*target);
                            target_id
                        }
                    };
                    destinations.push(target_id);
                }
                records.push(TransitionRecord {
                    state: id,
                    label: transition.label,
                    destinations,
                });
            }
        }

        Some(Description {
            states: (0..order.len()).collect(),
            records,
            start: 0,
            accept: ids[nfa.accept]?,
        })
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.records
            .iter()
            .flat_map(|record| {
                record.destinations.iter().map(move |to| Edge {
                    from: record.state,
                    label: record.label,
                    to: *to,
                })
            })
            .collect()
    }

    pub fn state_name(id: usize) -> String {
        format!("q{}", id)
    }
}

pub fn transition_table(description: &Description) -> String {
    let mut out = String::from("|State|\t\t|Symbol|\t|Next State|\n");
    out += "-------\t\t--------\t------------\n";
    for record in &description.records {
        out += &format!(
            "{}\t\t{}\t\t{}\n",
            Description::state_name(record.state),
            record.label,
            record
                .destinations
                .iter()
                .map(|id| Description::state_name(*id))
                .join(" ")
        );
    }
    out
}
