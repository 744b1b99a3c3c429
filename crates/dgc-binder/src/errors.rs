//! Resolution errors as data.
//!
//! Nothing in the resolvers or the graph builder aborts on a user error: each
//! failure is recorded as a [`ResolutionError`] anchored at the declaration
//! that required the value, and traversal continues with the next node.

use dgc_common::diagnostics::{
    Diagnostic, DiagnosticCategory, diagnostic_codes as codes, format_message,
    get_diagnostic_category, get_message_template,
};
use dgc_model::{DeclId, DeclarationModel, ScopeSet, TypeId};

use crate::binding::Binding;
use crate::key::Key;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionErrorKind {
    NoBindingFound {
        key: Key,
    },
    AmbiguousBindings {
        key: Key,
        candidates: Vec<Binding>,
    },
    ScopeMismatch {
        key: Key,
        component_scopes: ScopeSet,
        binding_scopes: ScopeSet,
    },
    MultipleInjectableConstructors {
        ty: TypeId,
        constructors: Vec<DeclId>,
    },
    ResolutionTooDeep {
        key: Key,
        limit: u32,
    },
    InvalidBindsFunction {
        function: DeclId,
        params: usize,
    },
    MissingModuleMarker {
        module: TypeId,
    },
    UnitProvision {
        function: DeclId,
    },
}

impl ResolutionErrorKind {
    pub const fn code(&self) -> u32 {
        match self {
            Self::NoBindingFound { .. } => codes::NO_BINDING_FOUND,
            Self::AmbiguousBindings { .. } => codes::AMBIGUOUS_BINDINGS,
            Self::ScopeMismatch { .. } => codes::SCOPE_MISMATCH,
            Self::MultipleInjectableConstructors { .. } => codes::MULTIPLE_INJECTABLE_CONSTRUCTORS,
            Self::ResolutionTooDeep { .. } => codes::RESOLUTION_TOO_DEEP,
            Self::InvalidBindsFunction { .. } => codes::INVALID_BINDS_FUNCTION,
            Self::MissingModuleMarker { .. } => codes::MISSING_MODULE_MARKER,
            Self::UnitProvision { .. } => codes::UNIT_PROVISION,
        }
    }

    pub fn category(&self) -> DiagnosticCategory {
        get_diagnostic_category(self.code()).unwrap_or(DiagnosticCategory::Error)
    }

    /// The key this error is about, if it is about a key.
    pub fn key(&self) -> Option<&Key> {
        match self {
            Self::NoBindingFound { key }
            | Self::AmbiguousBindings { key, .. }
            | Self::ScopeMismatch { key, .. }
            | Self::ResolutionTooDeep { key, .. } => Some(key),
            Self::MultipleInjectableConstructors { .. }
            | Self::InvalidBindsFunction { .. }
            | Self::MissingModuleMarker { .. }
            | Self::UnitProvision { .. } => None,
        }
    }

    fn message_args(&self, model: &DeclarationModel) -> Vec<String> {
        match self {
            Self::NoBindingFound { key } => vec![key.display(model)],
            Self::AmbiguousBindings { key, candidates } => {
                let names: Vec<String> = candidates.iter().map(|b| b.describe(model)).collect();
                vec![key.display(model), names.join(", ")]
            }
            Self::ScopeMismatch {
                key,
                component_scopes,
                binding_scopes,
            } => vec![
                key.display(model),
                binding_scopes.display(model.interner()),
                component_scopes.display(model.interner()),
            ],
            Self::MultipleInjectableConstructors { ty, .. } => vec![model.type_name(*ty)],
            Self::ResolutionTooDeep { key, limit } => vec![key.display(model), limit.to_string()],
            Self::InvalidBindsFunction { function, params } => {
                vec![model.qualified_decl_name(*function), params.to_string()]
            }
            Self::MissingModuleMarker { module } => vec![model.type_name(*module)],
            Self::UnitProvision { function } => vec![model.qualified_decl_name(*function)],
        }
    }
}

/// A resolution error attached to the declaration that caused it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionError {
    pub kind: ResolutionErrorKind,
    pub declaration: DeclId,
}

impl ResolutionError {
    #[inline]
    pub fn new(kind: ResolutionErrorKind, declaration: DeclId) -> Self {
        Self { kind, declaration }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind.category() == DiagnosticCategory::Error
    }

    /// Render into a diagnostic positioned at the anchoring declaration.
    ///
    /// Ambiguity and constructor conflicts carry related information pointing
    /// at every candidate declaration.
    pub fn to_diagnostic(&self, model: &DeclarationModel) -> Diagnostic {
        let code = self.kind.code();
        let args = self.kind.message_args(model);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        let template = get_message_template(code).unwrap_or("{0}");
        let span = model.decl(self.declaration).span;
        let mut diag = Diagnostic::new(
            model.file_name(span).to_string(),
            span.start,
            span.length,
            format_message(template, &arg_refs),
            code,
        );

        let related: Vec<DeclId> = match &self.kind {
            ResolutionErrorKind::AmbiguousBindings { candidates, .. } => {
                candidates.iter().map(|b| b.origin).collect()
            }
            ResolutionErrorKind::MultipleInjectableConstructors { constructors, .. } => {
                constructors.clone()
            }
            _ => Vec::new(),
        };
        let candidate_template = get_message_template(codes::CANDIDATE_BINDING).unwrap_or("{0}");
        for decl in related {
            let span = model.decl(decl).span;
            let name = model.qualified_decl_name(decl);
            diag = diag.with_related(
                model.file_name(span).to_string(),
                span.start,
                span.length,
                format_message(candidate_template, &[&name]),
            );
        }
        diag
    }
}
