//! Tests for list, show, replay, remove, reset, export-har, import-har.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_list() {
    match parse(&["preq", "list"]) {
        CliCommand::List => {}
        _ => panic!("expected List"),
    }
}

#[test]
fn cli_parse_show() {
    match parse(&["preq", "show", "1700000000000-abc"]) {
        CliCommand::Show { id } => assert_eq!(id, "1700000000000-abc"),
        _ => panic!("expected Show"),
    }
}

#[test]
fn cli_parse_replay_one() {
    match parse(&["preq", "replay", "1-a"]) {
        CliCommand::Replay { id, all } => {
            assert_eq!(id.as_deref(), Some("1-a"));
            assert!(!all);
        }
        _ => panic!("expected Replay"),
    }
}

#[test]
fn cli_parse_replay_all() {
    match parse(&["preq", "replay", "--all"]) {
        CliCommand::Replay { id, all } => {
            assert!(id.is_none());
            assert!(all);
        }
        _ => panic!("expected Replay --all"),
    }
}

#[test]
fn cli_parse_replay_needs_target() {
    assert!(Cli::try_parse_from(["preq", "replay"]).is_err());
    assert!(Cli::try_parse_from(["preq", "replay", "1-a", "--all"]).is_err());
}

#[test]
fn cli_parse_remove() {
    match parse(&["preq", "remove", "1-a"]) {
        CliCommand::Remove { id } => assert_eq!(id, "1-a"),
        _ => panic!("expected Remove"),
    }
}

#[test]
fn cli_parse_reset() {
    match parse(&["preq", "reset"]) {
        CliCommand::Reset => {}
        _ => panic!("expected Reset"),
    }
}

#[test]
fn cli_parse_export_har() {
    match parse(&["preq", "export-har", "-o", "queue.har"]) {
        CliCommand::ExportHar { output } => {
            assert_eq!(output.as_deref(), Some(Path::new("queue.har")));
        }
        _ => panic!("expected ExportHar"),
    }
    match parse(&["preq", "export-har"]) {
        CliCommand::ExportHar { output } => assert!(output.is_none()),
        _ => panic!("expected ExportHar"),
    }
}

#[test]
fn cli_parse_import_har() {
    match parse(&["preq", "import-har", "/path/to/capture.har"]) {
        CliCommand::ImportHar { path } => assert_eq!(path, "/path/to/capture.har"),
        _ => panic!("expected ImportHar"),
    }
}

#[test]
fn cli_parse_global_store() {
    let cli = Cli::try_parse_from(["preq", "list", "--store", "/tmp/q.db"]).unwrap();
    assert_eq!(cli.store.as_deref(), Some(Path::new("/tmp/q.db")));
}
