//! Tests for scan and download subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_scan() {
    match parse(&["vdp", "scan", "https://example.com/watch"]) {
        CliCommand::Scan { url, file, json } => {
            assert_eq!(url, "https://example.com/watch");
            assert!(file.is_none());
            assert!(!json);
        }
        _ => panic!("expected Scan"),
    }
}

#[test]
fn cli_parse_scan_saved_file_as_json() {
    match parse(&[
        "vdp",
        "scan",
        "https://example.com/watch",
        "--file",
        "/tmp/page.html",
        "--json",
    ]) {
        CliCommand::Scan { file, json, .. } => {
            assert_eq!(file.as_deref(), Some(Path::new("/tmp/page.html")));
            assert!(json);
        }
        _ => panic!("expected Scan with --file --json"),
    }
}

#[test]
fn cli_parse_download_defaults() {
    match parse(&["vdp", "download", "https://example.com/watch"]) {
        CliCommand::Download {
            url,
            file,
            video,
            quality,
            dir,
            yes,
        } => {
            assert_eq!(url, "https://example.com/watch");
            assert!(file.is_none());
            assert!(video.is_none());
            assert!(quality.is_none());
            assert!(dir.is_none());
            assert!(!yes);
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_download_choices() {
    match parse(&[
        "vdp",
        "download",
        "https://example.com/watch",
        "--video",
        "2",
        "--quality",
        "3",
        "--dir",
        "/tmp/videos",
        "-y",
    ]) {
        CliCommand::Download {
            video,
            quality,
            dir,
            yes,
            ..
        } => {
            assert_eq!(video, Some(2));
            assert_eq!(quality, Some(3));
            assert_eq!(dir.as_deref(), Some(Path::new("/tmp/videos")));
            assert!(yes);
        }
        _ => panic!("expected Download with choices"),
    }
}

#[test]
fn cli_rejects_non_numeric_video() {
    assert!(Cli::try_parse_from(["vdp", "download", "https://example.com", "--video", "two"]).is_err());
}

#[test]
fn cli_requires_url() {
    assert!(Cli::try_parse_from(["vdp", "scan"]).is_err());
}
