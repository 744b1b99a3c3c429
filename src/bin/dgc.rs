#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{IsTerminal, Write};

use dgc::cli::args::{CheckArgs, CliArgs, Command};
use dgc::cli::driver::{self, CheckReport};
use dgc::cli::reporter::Reporter;
use dgc::common::Diagnostic;
use dgc::graph::GraphSummary;
use dgc::model::DeclarationModel;

const EXIT_SUCCESS: i32 = 0;
/// Some component has error diagnostics; code generation would be skipped.
const EXIT_DIAGNOSTICS: i32 = 1;
/// The input could not be read or lowered.
const EXIT_INVALID_INPUT: i32 = 2;

/// `--json` output: one entry per component.
#[derive(Serialize)]
struct JsonComponent<'a> {
    graph: GraphSummary,
    diagnostics: &'a [Diagnostic],
}

fn main() {
    // Initialize tracing if DGC_LOG or RUST_LOG is set (zero cost otherwise).
    dgc::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let result = match args.command {
        Command::Check(check) => run(&check),
    };
    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(EXIT_INVALID_INPUT);
        }
    }
}

fn run(args: &CheckArgs) -> Result<i32> {
    let (model, report) = driver::run_check(&args.paths, &args.components, args.jobs)?;

    if args.json {
        print_json(&model, &report)?;
    } else {
        let color = args.use_color(std::io::stderr().is_terminal());
        let mut reporter = Reporter::new(color);
        if args.graph {
            print_graphs(&reporter, &model, &report)?;
        }
        let diagnostics: Vec<Diagnostic> = report.diagnostics().cloned().collect();
        if !diagnostics.is_empty() {
            let output = reporter.render(&diagnostics);
            eprintln!("{output}");
            eprintln!();
            eprintln!(
                "{}",
                reporter.format_summary(report.error_count(), report.warning_count())
            );
        }
    }

    Ok(if report.has_errors() {
        EXIT_DIAGNOSTICS
    } else {
        EXIT_SUCCESS
    })
}

fn print_graphs(reporter: &Reporter, model: &DeclarationModel, report: &CheckReport) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for component in &report.components {
        let summary = GraphSummary::new(&component.output, model);
        write!(stdout, "{}", reporter.render_graph(&summary)).context("failed to write graph")?;
    }
    Ok(())
}

fn print_json(model: &DeclarationModel, report: &CheckReport) -> Result<()> {
    let components: Vec<JsonComponent<'_>> = report
        .components
        .iter()
        .map(|component| JsonComponent {
            graph: GraphSummary::new(&component.output, model),
            diagnostics: &component.diagnostics,
        })
        .collect();
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &components).context("failed to write JSON")?;
    writeln!(stdout).context("failed to write JSON")?;
    Ok(())
}
