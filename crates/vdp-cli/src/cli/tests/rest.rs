//! Tests for resolve and completions subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;

#[test]
fn cli_parse_resolve_default_quality() {
    match parse(&["vdp", "resolve", "youtube", "dQw4w9WgXcQ"]) {
        CliCommand::Resolve {
            platform,
            id,
            quality,
        } => {
            assert_eq!(platform, "youtube");
            assert_eq!(id, "dQw4w9WgXcQ");
            assert_eq!(quality, "720p");
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_resolve_quality() {
    match parse(&["vdp", "resolve", "vimeo", "76979871", "--quality", "HD"]) {
        CliCommand::Resolve { quality, .. } => assert_eq!(quality, "HD"),
        _ => panic!("expected Resolve with --quality"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["vdp", "completions", "bash"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Bash),
        _ => panic!("expected Completions"),
    }
    assert!(Cli::try_parse_from(["vdp", "completions", "cmd.exe"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}
