#![allow(missing_docs)]

use std::fs;

use sombra_sparql::config::MAX_DEPTH_ENV;
use sombra_sparql::{
    ConfigError, EvalConfig, ExecOptions, MemoryStore, Operator, Term, Triple, TriplePattern, Var,
};
use tempfile::tempdir;

// Environment overrides are process-wide, so every case that touches
// MAX_DEPTH_ENV runs inside this one test.
#[test]
fn file_and_environment_shape_exec_options() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("sparql.toml");
    let contents = "[evaluation]\nmax_depth = 8\nstrict_filter_errors = true\n";
    fs::write(&path, contents)?;

    std::env::remove_var(MAX_DEPTH_ENV);
    let config = EvalConfig::load(&path)?;
    assert_eq!(
        config.exec_options(),
        ExecOptions {
            depth: 0,
            max_depth: Some(8),
            strict_filter_errors: true,
        }
    );

    std::env::set_var(MAX_DEPTH_ENV, "1");
    let config = EvalConfig::load(&path)?;
    assert_eq!(config.max_depth, Some(1));

    let p = Term::iri("http://example/p");
    let store: MemoryStore = [Triple::new(Term::iri("http://example/s"), p.clone(), 1i64)]
        .into_iter()
        .collect();
    let pattern = TriplePattern::new(Var::new("s"), p, Var::new("o"));
    let tree = Operator::distinct(Operator::reduced(Operator::bgp(vec![pattern])));
    assert!(tree.execute(&store, &config.exec_options()).is_err());

    std::env::set_var(MAX_DEPTH_ENV, "deep");
    let err = EvalConfig::load(&path).expect_err("invalid override");
    assert!(matches!(err, ConfigError::InvalidEnv { .. }));

    std::env::remove_var(MAX_DEPTH_ENV);
    let missing = EvalConfig::load(&dir.path().join("absent.toml"))?;
    assert_eq!(missing, EvalConfig::default());
    Ok(())
}

#[test]
fn malformed_file_is_a_parse_error() {
    let err = EvalConfig::from_toml_str("[evaluation\nmax_depth = 3").expect_err("malformed");
    assert!(matches!(err, ConfigError::Parse { .. }));
    let message = err.to_string();
    assert!(message.contains("failed to parse evaluation config"));
}
