#![allow(missing_docs)]

use std::sync::Once;

use sombra_sparql::{
    ArithOp, CompareOp, ExecOptions, Expression, Iri, MemoryStore, Operator, OrderKey, QueryError,
    Result, Solution, SolutionSequence, Term, Triple, TriplePattern, Var,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sombra_sparql=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .try_init();
    });
}

fn ex(local: &str) -> Term {
    Term::iri(format!("http://example/{local}"))
}

fn duplicate_store() -> MemoryStore {
    [
        Triple::new(ex("x"), ex("p"), 2i64),
        Triple::new(ex("x"), ex("p"), 1i64),
        Triple::new(ex("x"), ex("p"), 2i64),
    ]
    .into_iter()
    .collect()
}

fn s_p_o() -> Operator {
    let pattern = TriplePattern::new(Var::new("s"), ex("p"), Var::new("o"));
    Operator::bgp(vec![pattern])
}

fn objects(solutions: &SolutionSequence) -> Vec<Option<Term>> {
    solutions
        .iter()
        .map(|solution| solution.get(&Var::new("o")).cloned())
        .collect()
}

fn ints(values: &[i64]) -> Vec<Option<Term>> {
    values.iter().map(|v| Some(Term::from(*v))).collect()
}

#[test]
fn order_then_reduced_drops_adjacent_duplicates() -> Result<()> {
    init_tracing();
    let store = duplicate_store();
    let options = ExecOptions::default();

    let leaf = s_p_o().execute(&store, &options)?;
    assert_eq!(leaf.len(), 3, "bgp keeps duplicate triples");

    let ordered = Operator::order(vec![OrderKey::asc(Expression::var("o"))], s_p_o());
    let sorted = ordered.execute(&store, &options)?;
    assert_eq!(objects(&sorted), ints(&[1, 2, 2]));

    let reduced = Operator::reduced(ordered);
    assert_eq!(objects(&reduced.execute(&store, &options)?), ints(&[1, 2]));
    Ok(())
}

#[test]
fn reduced_without_order_keeps_non_adjacent_repeats() -> Result<()> {
    init_tracing();
    let store = duplicate_store();
    let options = ExecOptions::default();

    let reduced = Operator::reduced(s_p_o()).execute(&store, &options)?;
    assert_eq!(objects(&reduced), ints(&[2, 1, 2]));

    let distinct = Operator::distinct(s_p_o()).execute(&store, &options)?;
    assert_eq!(objects(&distinct), ints(&[2, 1]));
    Ok(())
}

#[test]
fn reexecution_is_deterministic() -> Result<()> {
    init_tracing();
    let store: MemoryStore = (0..20i64)
        .map(|n| Triple::new(ex(&format!("s{}", n % 4)), ex("p"), n % 5))
        .collect();
    let keys = vec![
        OrderKey::desc(Expression::var("o")),
        OrderKey::new(Expression::var("s")),
    ];
    let tree = Operator::reduced(Operator::order(keys, s_p_o()));
    let options = ExecOptions::default();
    let first = tree.execute(&store, &options)?;
    let second = tree.execute(&store, &options)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn filter_errors_exclude_only_the_failing_solution() -> Result<()> {
    init_tracing();
    let store: MemoryStore = [
        Triple::new(ex("a"), ex("p"), 1i64),
        Triple::new(ex("b"), ex("p"), "text"),
        Triple::new(ex("c"), ex("p"), 5i64),
        Triple::new(ex("d"), ex("p"), ex("iri")),
    ]
    .into_iter()
    .collect();
    // (?o + 1) > 2 is a type error on the string and the IRI.
    let condition = Expression::compare(
        CompareOp::Gt,
        Expression::arith(ArithOp::Add, Expression::var("o"), Expression::term(1i64)),
        Expression::term(2i64),
    );
    let tree = Operator::filter(condition, s_p_o());
    let result = tree.execute(&store, &ExecOptions::default())?;
    assert_eq!(objects(&result), ints(&[5]));
    Ok(())
}

#[test]
fn strict_filter_surfaces_unbound_variables() {
    init_tracing();
    let store = duplicate_store();
    let missing = Expression::var("missing");
    let condition = Expression::compare(CompareOp::Gt, missing, Expression::term(0i64));
    let tree = Operator::filter(condition, s_p_o());

    let lenient = tree.execute(&store, &ExecOptions::default());
    assert_eq!(lenient.map(|s| s.len()), Ok(0));

    let strict = ExecOptions {
        strict_filter_errors: true,
        ..ExecOptions::default()
    };
    let err = tree.execute(&store, &strict).expect_err("unbound variable surfaces");
    assert!(matches!(err, QueryError::Eval(_)));
    assert_eq!(err.code(), "Unbound");
}

#[test]
fn order_sorts_mixed_terms_by_kind() -> Result<()> {
    init_tracing();
    let store: MemoryStore = [
        Triple::new(ex("a"), ex("p"), 3i64),
        Triple::new(ex("b"), ex("p"), ex("z")),
        Triple::new(ex("c"), ex("p"), Term::blank("b0")),
        Triple::new(ex("d"), ex("p"), 1.5f64),
    ]
    .into_iter()
    .collect();
    let tree = Operator::order(vec![OrderKey::new(Expression::var("o"))], s_p_o());
    let result = tree.execute(&store, &ExecOptions::default())?;
    assert_eq!(
        objects(&result),
        vec![
            Some(Term::blank("b0")),
            Some(ex("z")),
            Some(Term::from(1.5f64)),
            Some(Term::from(3i64)),
        ]
    );
    Ok(())
}

#[test]
fn join_and_project_over_named_graph() -> Result<()> {
    init_tracing();
    let mut store = MemoryStore::new();
    store.insert(Triple::new(ex("alice"), ex("knows"), ex("bob")));
    store.insert(Triple::new(ex("carol"), ex("knows"), ex("bob")));
    let graph = Iri::new("http://example/ages");
    store.insert_named(graph.clone(), Triple::new(ex("alice"), ex("age"), 31i64));
    store.insert_named(graph.clone(), Triple::new(ex("bob"), ex("age"), 40i64));

    let knows = TriplePattern::new(Var::new("who"), ex("knows"), Var::new("friend"));
    let age = TriplePattern::new(Var::new("who"), ex("age"), Var::new("age"));
    let ages = Operator::graph(graph, vec![age]);
    let joined = Operator::join(Operator::bgp(vec![knows]), ages);
    let tree = Operator::project(vec![Var::new("who"), Var::new("age")], joined);
    tree.validate()?;
    let result = tree.execute(&store, &ExecOptions::default())?;

    let expected = Solution::new()
        .with(Var::new("who"), ex("alice"))
        .and_then(|s| s.with(Var::new("age"), 31i64))
        .expect("bindings");
    assert_eq!(result.into_vec(), vec![expected]);
    Ok(())
}

#[test]
fn execute_each_sees_every_solution() -> Result<()> {
    init_tracing();
    let store = duplicate_store();
    let mut count = 0;
    let options = ExecOptions::default();
    let result = Operator::distinct(s_p_o()).execute_each(&store, &options, |_| count += 1)?;
    assert_eq!(count, result.len());
    assert_eq!(count, 2);
    Ok(())
}

#[test]
fn depth_limit_from_options() {
    init_tracing();
    let store = duplicate_store();
    let ordered = Operator::order(vec![OrderKey::new(Expression::var("o"))], s_p_o());
    let tree = Operator::reduced(ordered);
    let options = ExecOptions {
        max_depth: Some(1),
        ..ExecOptions::default()
    };
    let err = tree.execute(&store, &options).expect_err("too deep");
    assert_eq!(err, QueryError::DepthExceeded { depth: 2, max: 1 });
}

#[test]
fn renders_sparql_for_a_full_query() {
    let one = Expression::term(1i64);
    let above_one = Expression::compare(CompareOp::Gt, Expression::var("o"), one);
    let conditions = Expression::list(vec![above_one, Expression::bound("s")]);
    let tree = Operator::reduced(Operator::project(
        vec![Var::new("o")],
        Operator::order(
            vec![OrderKey::desc(Expression::var("o"))],
            Operator::filter(conditions, s_p_o()),
        ),
    ));
    assert_eq!(
        tree.to_sparql(),
        "SELECT REDUCED ?o WHERE { ?s <http://example/p> ?o . FILTER (?o > 1) FILTER BOUND(?s) } ORDER BY DESC(?o)"
    );
    assert_eq!(
        tree.to_string(),
        "(reduced (project (?o) (order ((desc ?o)) (filter (exprlist (> ?o 1) (bound ?s)) (bgp (triple ?s <http://example/p> ?o))))))"
    );
}
