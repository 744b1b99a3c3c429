use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};
use walkdir::WalkDir;

use crate::cli::manifest::{LoadedManifest, MANIFEST_SUFFIX, load_manifest, lower_manifests};
use dgc_common::{Diagnostic, DiagnosticCategory};
use dgc_graph::{BuildOutput, build_component};
use dgc_model::{ComponentDecl, DeclarationModel};

/// Resolution outcome of one component.
#[derive(Debug)]
pub struct ComponentReport {
    pub name: String,
    pub output: BuildOutput,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Default)]
pub struct CheckReport {
    pub components: Vec<ComponentReport>,
}

impl CheckReport {
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.components.iter().flat_map(|c| c.diagnostics.iter())
    }

    pub fn error_count(&self) -> usize {
        self.count(DiagnosticCategory::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(DiagnosticCategory::Warning)
    }

    fn count(&self, category: DiagnosticCategory) -> usize {
        self.diagnostics()
            .filter(|d| d.category == category)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Expand `paths` into manifest files. Directories are walked recursively
/// for `*.dgc.json`; files are taken as given. The result is sorted so runs
/// are deterministic.
pub fn discover_manifests(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut manifests = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && is_manifest_path(entry.path()) {
                    manifests.push(entry.into_path());
                }
            }
        } else if path.is_file() {
            manifests.push(path.clone());
        } else {
            bail!("no such file or directory: {}", path.display());
        }
    }
    manifests.sort();
    manifests.dedup();
    if manifests.is_empty() {
        bail!("no {} manifests found", MANIFEST_SUFFIX);
    }
    Ok(manifests)
}

/// Read and lower every manifest into one declaration model.
pub fn load_model(paths: &[PathBuf]) -> Result<DeclarationModel> {
    let loaded = paths
        .iter()
        .map(|path| load_manifest(path))
        .collect::<Result<Vec<LoadedManifest>>>()?;
    debug!(manifests = loaded.len(), "manifests loaded");
    lower_manifests(&loaded)
}

/// Build the graph of every selected component.
///
/// `filter` names components to keep; an empty filter keeps all of them.
/// Components are independent, so they are built in parallel against the
/// shared model. `jobs` bounds the worker count.
pub fn check_model(
    model: &DeclarationModel,
    filter: &[String],
    jobs: Option<usize>,
) -> Result<CheckReport> {
    let selected = select_components(model, filter)?;
    let build = || {
        selected
            .par_iter()
            .map(|component| check_component(model, component))
            .collect::<Vec<_>>()
    };
    let components = match jobs {
        Some(jobs) => rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .context("failed to start worker pool")?
            .install(build),
        None => build(),
    };
    Ok(CheckReport { components })
}

fn select_components<'m>(
    model: &'m DeclarationModel,
    filter: &[String],
) -> Result<Vec<&'m ComponentDecl>> {
    let all = model.components();
    if filter.is_empty() {
        return Ok(all.iter().collect());
    }
    filter
        .iter()
        .map(|name| {
            all.iter()
                .find(|c| model.type_name(c.ty) == *name)
                .with_context(|| format!("unknown component: {name}"))
        })
        .collect()
}

fn check_component(model: &DeclarationModel, component: &ComponentDecl) -> ComponentReport {
    let name = model.type_name(component.ty);
    let span = info_span!("component", name = %name);
    let _enter = span.enter();
    let output = build_component(model, component);
    let diagnostics = output.diagnostics(model);
    ComponentReport {
        name,
        output,
        diagnostics,
    }
}

/// Discover, load and check in one go.
pub fn run_check(
    paths: &[PathBuf],
    filter: &[String],
    jobs: Option<usize>,
) -> Result<(DeclarationModel, CheckReport)> {
    let manifests = discover_manifests(paths)?;
    let model = load_model(&manifests)?;
    let report = check_model(&model, filter, jobs)?;
    Ok((model, report))
}

/// Whether `path` names a manifest by its file name.
pub fn is_manifest_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(MANIFEST_SUFFIX))
}
