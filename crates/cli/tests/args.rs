#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use clap::Parser;
use sdkgen_cli::{Cli, Commands, run};

const SCHEMA: &str = "type Query { hello(name: String!): String }\n";

fn argv(parts: &[&str]) -> Vec<String> {
    std::iter::once("sdkgen")
        .chain(parts.iter().copied())
        .map(str::to_string)
        .collect()
}

fn write_config(dir: &Path) -> String {
    let path = dir.join("sdkgen.toml");
    fs::write(&path, "package = \"greeter\"\nformatter = \"none\"\n").unwrap();
    path.display().to_string()
}

#[test]
fn test_graphql_requires_schema_and_output() {
    assert!(Cli::try_parse_from(argv(&["graphql", "--output", "out"])).is_err());
    assert!(Cli::try_parse_from(argv(&["graphql", "--schema", "a.graphql"])).is_err());
}

#[test]
fn test_graphql_accepts_multiple_schemas() {
    let cli = Cli::try_parse_from(argv(&[
        "graphql", "--schema", "a.graphql", "b.graphql", "--output", "out", "-v",
    ]))
    .unwrap();
    match cli.command {
        Some(Commands::Graphql(args)) => {
            assert_eq!(args.schema.len(), 2);
            assert!(args.common.verbose);
            assert_eq!(args.common.output, Path::new("out"));
        }
        other => unreachable!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_openapi_takes_a_single_schema() {
    let cli = Cli::try_parse_from(argv(&[
        "openapi", "-s", "api.yaml", "-o", "out", "--package", "pets",
    ]))
    .unwrap();
    match cli.command {
        Some(Commands::Openapi(args)) => {
            assert_eq!(args.schema, Path::new("api.yaml"));
            assert_eq!(args.common.package.as_deref(), Some("pets"));
        }
        other => unreachable!("unexpected command: {other:?}"),
    }
    assert!(
        Cli::try_parse_from(argv(&["openapi", "-s", "a.yaml", "b.yaml", "-o", "out"])).is_err()
    );
}

#[test]
fn test_run_writes_graphql_client() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("schema.graphql");
    fs::write(&schema, SCHEMA).unwrap();
    let out = dir.path().join("out");
    let config = write_config(dir.path());

    let code = run(argv(&[
        "graphql",
        "--schema",
        &schema.display().to_string(),
        "--output",
        &out.display().to_string(),
        "--config",
        &config,
    ]));
    assert_eq!(code, 0);

    let source = fs::read_to_string(out.join("client.go")).unwrap();
    assert!(source.contains("package greeter"));
    assert!(source.contains("func (c *Client) Hello(ctx context.Context, name string)"));
}

#[test]
fn test_run_reports_missing_schema() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let code = run(argv(&[
        "openapi",
        "--schema",
        &dir.path().join("missing.yaml").display().to_string(),
        "--output",
        &dir.path().display().to_string(),
        "--config",
        &config,
    ]));
    assert_eq!(code, 1);
}

#[test]
fn test_unknown_flag_is_a_usage_error() {
    assert_eq!(run(argv(&["graphql", "--bogus"])), 2);
}
