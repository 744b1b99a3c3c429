//! `*.dgc.json` manifests: declarations extracted by a host front end,
//! stored as JSON and lowered into a [`DeclarationModel`].
//!
//! ```json
//! {
//!   "source": "src/App.kt",
//!   "classes": [
//!     { "name": "NetworkModule", "kind": "object", "module": true,
//!       "functions": [
//!         { "name": "provideClient", "returns": "HttpClient", "provides": true,
//!           "params": [{ "name": "url", "type": "String", "qualifiers": ["BaseUrl"] }] }
//!       ] }
//!   ],
//!   "components": [{ "name": "AppComponent", "modules": ["NetworkModule"] }]
//! }
//! ```
//!
//! Type names may carry arguments (`Provider<HttpClient>`). All manifests of
//! one run are lowered into a single model, so a manifest may refer to
//! classes declared in another.

use anyhow::{Context, Result, bail};
use dgc_common::{Atom, Span};
use dgc_model::{ClassKind, CreatorKind, DeclId, DeclarationModel, Markers, ModelBuilder, TypeId};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// File name suffix of manifests picked up from directories.
pub const MANIFEST_SUFFIX: &str = ".dgc.json";

/// Custom deserializer for flags that accepts both bool and string values,
/// so `"provides": "true"` reads the same as `"provides": true`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => {
            let normalized = s.trim().to_lowercase();
            match normalized.as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(Error::custom(format!(
                    "invalid boolean value: '{}'. Expected true, false, 'true', or 'false'",
                    s
                ))),
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    /// Source file the declarations were extracted from. Diagnostics point
    /// there; without it they point at the manifest itself.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
}

/// `[start, length]` byte range inside the source file.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct SpanEntry(pub u32, pub u32);

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClassKindEntry {
    #[default]
    Class,
    Object,
    Abstract,
    Interface,
}

impl From<ClassKindEntry> for ClassKind {
    fn from(kind: ClassKindEntry) -> Self {
        match kind {
            ClassKindEntry::Class => ClassKind::Class,
            ClassKindEntry::Object => ClassKind::Object,
            ClassKindEntry::Abstract => ClassKind::Abstract,
            ClassKindEntry::Interface => ClassKind::Interface,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClassEntry {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKindEntry,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub module: Option<bool>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub companion: Option<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub constructors: Vec<ConstructorEntry>,
    #[serde(default)]
    pub functions: Vec<FunctionEntry>,
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,
    #[serde(default)]
    pub span: Option<SpanEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConstructorEntry {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub inject: Option<bool>,
    #[serde(default)]
    pub params: Vec<ParamEntry>,
    #[serde(default)]
    pub span: Option<SpanEntry>,
}

fn unit_type() -> String {
    "Unit".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FunctionEntry {
    pub name: String,
    #[serde(default = "unit_type")]
    pub returns: String,
    #[serde(default)]
    pub params: Vec<ParamEntry>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub provides: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub binds: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub inject: Option<bool>,
    #[serde(default, rename = "static", deserialize_with = "deserialize_bool_or_string")]
    pub is_static: Option<bool>,
    #[serde(default)]
    pub qualifiers: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub span: Option<SpanEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropertyEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub provides: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub inject: Option<bool>,
    #[serde(default)]
    pub qualifiers: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub span: Option<SpanEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParamEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub qualifiers: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub binds_instance: Option<bool>,
    #[serde(default)]
    pub span: Option<SpanEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CreatorKindEntry {
    Factory,
    Builder,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatorEntry {
    pub kind: CreatorKindEntry,
    #[serde(default)]
    pub params: Vec<ParamEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComponentEntry {
    pub name: String,
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub creator: Option<CreatorEntry>,
    #[serde(default)]
    pub span: Option<SpanEntry>,
}

/// A parsed manifest and the path it was read from.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub manifest: Manifest,
}

impl LoadedManifest {
    /// The file diagnostics for this manifest's declarations point into.
    pub fn source_file(&self) -> String {
        match &self.manifest.source {
            Some(source) => source.clone(),
            None => self.path.display().to_string(),
        }
    }
}

pub fn parse_manifest(source: &str) -> Result<Manifest> {
    let manifest = serde_json::from_str(source)?;
    Ok(manifest)
}

pub fn load_manifest(path: &Path) -> Result<LoadedManifest> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest: {}", path.display()))?;
    let manifest = parse_manifest(&source)
        .with_context(|| format!("failed to parse manifest: {}", path.display()))?;
    Ok(LoadedManifest {
        path: path.to_path_buf(),
        manifest,
    })
}

// =============================================================================
// Type expressions
// =============================================================================

/// Parse `Name` or `Name<Arg, ...>` and intern it.
pub fn parse_type(builder: &mut ModelBuilder, text: &str) -> Result<TypeId> {
    let mut parser = TypeParser { src: text, pos: 0 };
    let ty = parser.parse(builder)?;
    parser.skip_whitespace();
    if parser.pos != text.len() {
        bail!("unexpected '{}' in type '{}'", &text[parser.pos..], text);
    }
    Ok(ty)
}

struct TypeParser<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> TypeParser<'s> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn parse(&mut self, builder: &mut ModelBuilder) -> Result<TypeId> {
        self.skip_whitespace();
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '<' | '>' | ',') || c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
        let name = &src[start..self.pos];
        if name.is_empty() {
            bail!("expected a type name in '{}'", src);
        }

        self.skip_whitespace();
        if self.peek() != Some('<') {
            return Ok(builder.ty(name));
        }
        self.pos += 1;

        let mut args = Vec::new();
        loop {
            args.push(self.parse(builder)?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                _ => bail!("unterminated type arguments in '{}'", src),
            }
        }
        Ok(builder.generic(name, &args))
    }
}

// =============================================================================
// Lowering
// =============================================================================

/// Lower every manifest into one declaration model.
///
/// Classes of all manifests are declared first; companions, includes and
/// components are linked afterwards so declaration order across files does
/// not matter.
pub fn lower_manifests(manifests: &[LoadedManifest]) -> Result<DeclarationModel> {
    let mut builder = ModelBuilder::new();
    for loaded in manifests {
        let mut lowering = Lowering::new(&mut builder, loaded);
        for class in &loaded.manifest.classes {
            lowering
                .lower_class(class)
                .with_context(|| format!("in class '{}' of {}", class.name, loaded.path.display()))?;
        }
    }
    for loaded in manifests {
        let mut lowering = Lowering::new(&mut builder, loaded);
        for class in &loaded.manifest.classes {
            lowering
                .link_class(class)
                .with_context(|| format!("in class '{}' of {}", class.name, loaded.path.display()))?;
        }
        for component in &loaded.manifest.components {
            lowering.lower_component(component).with_context(|| {
                format!("in component '{}' of {}", component.name, loaded.path.display())
            })?;
        }
    }
    Ok(builder.finish())
}

struct Lowering<'b> {
    builder: &'b mut ModelBuilder,
    file: Atom,
}

fn flag(value: Option<bool>) -> bool {
    value.unwrap_or(false)
}

impl<'b> Lowering<'b> {
    fn new(builder: &'b mut ModelBuilder, loaded: &LoadedManifest) -> Self {
        let file = builder.atom(&loaded.source_file());
        Self { builder, file }
    }

    fn span(&mut self, decl: DeclId, span: Option<SpanEntry>) {
        let SpanEntry(start, length) = span.unwrap_or(SpanEntry(0, 0));
        self.builder.set_span(decl, Span::new(self.file, start, length));
    }

    fn tags(&mut self, decl: DeclId, qualifiers: &[String], scopes: &[String]) {
        for name in qualifiers {
            let tag = self.builder.qualifier(name);
            self.builder.qualify(decl, tag);
        }
        for name in scopes {
            let tag = self.builder.scope(name);
            self.builder.scope_decl(decl, tag);
        }
    }

    fn param_types<'e>(&mut self, params: &'e [ParamEntry]) -> Result<Vec<(&'e str, TypeId)>> {
        params
            .iter()
            .map(|p| {
                let ty = parse_type(self.builder, &p.ty)
                    .with_context(|| format!("in parameter '{}'", p.name))?;
                Ok((p.name.as_str(), ty))
            })
            .collect()
    }

    fn param_attributes(&mut self, owner: DeclId, params: &[ParamEntry]) {
        for (index, param) in params.iter().enumerate() {
            let decl = self.builder.param(owner, index);
            self.tags(decl, &param.qualifiers, &[]);
            if flag(param.binds_instance) {
                self.builder.mark(decl, Markers::BINDS_INSTANCE);
            }
            self.span(decl, param.span);
        }
    }

    fn lower_class(&mut self, class: &ClassEntry) -> Result<()> {
        let ty = parse_type(self.builder, &class.name)?;
        let decl = self.builder.add_class(ty, class.kind.into());
        if flag(class.module) {
            self.builder.mark(decl, Markers::MODULE);
        }
        self.tags(decl, &[], &class.scopes);
        self.span(decl, class.span);

        for ctor in &class.constructors {
            let params = self.param_types(&ctor.params)?;
            let id = self.builder.add_constructor(ty, &params);
            if flag(ctor.inject) {
                self.builder.mark(id, Markers::INJECT);
            }
            self.param_attributes(id, &ctor.params);
            self.span(id, ctor.span);
        }

        for function in &class.functions {
            let params = self.param_types(&function.params)?;
            let returns = parse_type(self.builder, &function.returns)
                .with_context(|| format!("in return type of '{}'", function.name))?;
            let id = self.builder.add_function(ty, &function.name, &params, returns);
            let mut markers = Markers::empty();
            markers.set(Markers::PROVIDES, flag(function.provides));
            markers.set(Markers::BINDS, flag(function.binds));
            markers.set(Markers::INJECT, flag(function.inject));
            markers.set(Markers::STATIC, flag(function.is_static));
            self.builder.mark(id, markers);
            self.tags(id, &function.qualifiers, &function.scopes);
            self.param_attributes(id, &function.params);
            self.span(id, function.span);
        }

        for property in &class.properties {
            let prop_ty = parse_type(self.builder, &property.ty)
                .with_context(|| format!("in property '{}'", property.name))?;
            let id = self.builder.add_property(ty, &property.name, prop_ty);
            let mut markers = Markers::empty();
            markers.set(Markers::PROVIDES, flag(property.provides));
            markers.set(Markers::INJECT, flag(property.inject));
            self.builder.mark(id, markers);
            self.tags(id, &property.qualifiers, &property.scopes);
            self.span(id, property.span);
        }
        Ok(())
    }

    fn link_class(&mut self, class: &ClassEntry) -> Result<()> {
        let ty = parse_type(self.builder, &class.name)?;
        if let Some(companion) = &class.companion {
            let companion = parse_type(self.builder, companion)?;
            self.builder.set_companion(ty, companion);
        }
        for include in &class.includes {
            let child = parse_type(self.builder, include)?;
            self.builder.include(ty, child);
        }
        Ok(())
    }

    fn lower_component(&mut self, component: &ComponentEntry) -> Result<()> {
        let ty = parse_type(self.builder, &component.name)?;
        let modules = self.type_list(&component.modules)?;
        let dependencies = self.type_list(&component.dependencies)?;
        let decl = self.builder.add_component(ty, &modules, &dependencies);
        self.tags(decl, &[], &component.scopes);
        if component.span.is_some() {
            self.span(decl, component.span);
        } else if self.builder.decl_span(decl).is_synthetic() {
            self.span(decl, None);
        }

        if let Some(creator) = &component.creator {
            let params = self.param_types(&creator.params)?;
            let kind = match creator.kind {
                CreatorKindEntry::Factory => CreatorKind::Factory,
                CreatorKindEntry::Builder => CreatorKind::Builder,
            };
            let id = self.builder.set_creator(ty, kind, &params);
            self.param_attributes(id, &creator.params);
            self.span(id, None);
        }
        Ok(())
    }

    fn type_list(&mut self, names: &[String]) -> Result<Vec<TypeId>> {
        names
            .iter()
            .map(|name| parse_type(self.builder, name))
            .collect()
    }
}
