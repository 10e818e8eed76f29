//! Tests for the send subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_send_minimal() {
    match parse(&["preq", "send", "GET", "https://example.com/posts"]) {
        CliCommand::Send(args) => {
            assert_eq!(args.method, "GET");
            assert_eq!(args.url, "https://example.com/posts");
            assert!(args.headers.is_empty());
            assert!(args.json.is_none());
            assert!(args.data.is_none());
        }
        _ => panic!("expected Send"),
    }
}

#[test]
fn cli_parse_send_headers_and_json() {
    match parse(&[
        "preq",
        "send",
        "post",
        "/posts",
        "-H",
        "X-Test=true",
        "--header",
        "Authorization=Bearer a=b",
        "--json",
        r#"{"title":"foo"}"#,
    ]) {
        CliCommand::Send(args) => {
            assert_eq!(
                args.headers,
                vec![
                    ("X-Test".to_string(), "true".to_string()),
                    ("Authorization".to_string(), "Bearer a=b".to_string()),
                ]
            );
            assert_eq!(args.json.as_deref(), Some(r#"{"title":"foo"}"#));
        }
        _ => panic!("expected Send"),
    }
}

#[test]
fn cli_parse_send_form_and_files() {
    match parse(&[
        "preq",
        "send",
        "POST",
        "/upload",
        "--form",
        "someValue=lalala",
        "--file",
        "myFile=/tmp/rickroll.gif",
    ]) {
        CliCommand::Send(args) => {
            assert_eq!(args.form, vec![("someValue".to_string(), "lalala".to_string())]);
            assert_eq!(args.file, vec![("myFile".to_string(), "/tmp/rickroll.gif".to_string())]);
        }
        _ => panic!("expected Send"),
    }
}

#[test]
fn cli_parse_send_rejects_conflicting_bodies() {
    assert!(Cli::try_parse_from(["preq", "send", "POST", "/x", "--json", "{}", "-d", "a"]).is_err());
    assert!(Cli::try_parse_from(["preq", "send", "POST", "/x", "-d", "a", "--form", "k=v"]).is_err());
}

#[test]
fn cli_parse_send_rejects_malformed_pairs() {
    assert!(Cli::try_parse_from(["preq", "send", "GET", "/x", "-H", "no-equals"]).is_err());
    assert!(Cli::try_parse_from(["preq", "send", "GET", "/x", "-H", "=value"]).is_err());
}
