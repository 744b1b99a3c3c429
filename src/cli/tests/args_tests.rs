use clap::Parser;

use super::args::{CliArgs, Command};

fn check_args(argv: &[&str]) -> super::args::CheckArgs {
    let args = CliArgs::try_parse_from(argv).expect("args should parse");
    match args.command {
        Command::Check(check) => check,
    }
}

#[test]
fn parses_defaults() {
    let args = check_args(&["dgc", "check", "manifests"]);

    assert_eq!(args.paths, vec![std::path::PathBuf::from("manifests")]);
    assert!(args.components.is_empty());
    assert!(!args.graph);
    assert!(!args.json);
    assert_eq!(args.pretty, None);
    assert!(!args.no_color);
    assert_eq!(args.jobs, None);
}

#[test]
fn parses_common_flags() {
    let args = check_args(&[
        "dgc",
        "check",
        "a.dgc.json",
        "more/",
        "-c",
        "AppComponent",
        "--component",
        "UserComponent",
        "--graph",
        "--no-color",
        "-j",
        "4",
    ]);

    assert_eq!(args.paths.len(), 2);
    assert_eq!(args.components, vec!["AppComponent", "UserComponent"]);
    assert!(args.graph);
    assert!(args.no_color);
    assert_eq!(args.jobs, Some(4));
}

#[test]
fn pretty_accepts_optional_value() {
    assert_eq!(check_args(&["dgc", "check", "x", "--pretty"]).pretty, Some(true));
    assert_eq!(
        check_args(&["dgc", "check", "x", "--pretty", "false"]).pretty,
        Some(false)
    );
}

#[test]
fn color_follows_terminal_unless_overridden() {
    let args = check_args(&["dgc", "check", "x"]);
    assert!(args.use_color(true));
    assert!(!args.use_color(false));

    let args = check_args(&["dgc", "check", "x", "--pretty"]);
    assert!(args.use_color(false));

    let args = check_args(&["dgc", "check", "x", "--pretty", "--no-color"]);
    assert!(!args.use_color(true));
}

#[test]
fn rejects_missing_paths_and_conflicting_outputs() {
    assert!(CliArgs::try_parse_from(["dgc", "check"]).is_err());
    assert!(CliArgs::try_parse_from(["dgc", "check", "x", "--graph", "--json"]).is_err());
    assert!(CliArgs::try_parse_from(["dgc"]).is_err());
}
