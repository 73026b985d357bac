use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reg_enfa::export::Description;
use reg_enfa::fsm::RegexNFA;

fn do_the_work(pattern: &str, expected_states: usize) {
    let mut nfa = RegexNFA::new(pattern);
    nfa.compile().unwrap();
    let description = Description::of(&nfa).unwrap();
    assert_eq!(expected_states, description.states.len())
}

fn criterion_benchmark_thompson(c: &mut Criterion) {
    let pattern = "(a+b)*abb(0+1+2)*".repeat(64);
    let mut nfa = RegexNFA::new(&pattern);
    nfa.compile().unwrap();
    let expected = nfa.state_count();

    c.bench_function("compile and enumerate long pattern", |b| {
        b.iter(|| do_the_work(black_box(&pattern), black_box(expected)))
    });
}

criterion_group!(benches, criterion_benchmark_thompson);
criterion_main!(benches);
