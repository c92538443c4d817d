//! Error handling design (§7).
//!
//! Grounded on `tir/error.rs`: one struct per error kind, each deriving
//! `thiserror::Error` for the display message and `miette::Diagnostic` for
//! rich source-located rendering, boxed into a top-level enum. The
//! teacher's bespoke `#[derive(TimuError)]` (from the now-dropped
//! `libtimu-macros`/`libtimu-macros-core` crates) is replaced by the
//! standard `miette::Diagnostic` derive — see DESIGN.md for the rationale.

use miette::Diagnostic;
use thiserror::Error;

use crate::location::SourceSpan;

fn named_source(span: &SourceSpan) -> miette::NamedSource<String> {
    miette::NamedSource::new(span.file.path.to_string(), span.file.text.to_string())
}

fn label(span: &SourceSpan) -> miette::SourceSpan {
    (span.range.start, span.range.len()).into()
}

#[derive(Debug, Error, Diagnostic)]
#[error("unresolved symbol `{name}`")]
#[diagnostic(code(crabgen::unresolved_symbol))]
pub struct UnresolvedSymbol {
    pub name: String,
    #[source_code]
    pub source_code: miette::NamedSource<String>,
    #[label("not found in scope")]
    pub at: miette::SourceSpan,
}

impl UnresolvedSymbol {
    pub fn new(name: impl Into<String>, span: &SourceSpan) -> Self {
        Self { name: name.into(), source_code: named_source(span), at: label(span) }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("`{name}` is ambiguous across {count} using-directives")]
#[diagnostic(code(crabgen::ambiguous_using))]
pub struct AmbiguousUsing {
    pub name: String,
    pub count: usize,
    #[source_code]
    pub source_code: miette::NamedSource<String>,
    #[label("ambiguous here")]
    pub at: miette::SourceSpan,
}

impl AmbiguousUsing {
    pub fn new(name: impl Into<String>, count: usize, span: &SourceSpan) -> Self {
        Self { name: name.into(), count, source_code: named_source(span), at: label(span) }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("`override {name}` has no matching virtual/abstract ancestor method")]
#[diagnostic(code(crabgen::no_overridable_method), help("introduce `virtual` or `abstract {name}` on a base class, or remove `override`"))]
pub struct NoOverridableMethod {
    pub name: String,
    #[source_code]
    pub source_code: miette::NamedSource<String>,
    #[label("declared override here")]
    pub at: miette::SourceSpan,
}

impl NoOverridableMethod {
    pub fn new(name: impl Into<String>, span: &SourceSpan) -> Self {
        Self { name: name.into(), source_code: named_source(span), at: label(span) }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("`init` must be a non-static, parameterless instance method")]
#[diagnostic(code(crabgen::instance_init_shape))]
pub struct InstanceInitShape {
    #[source_code]
    pub source_code: miette::NamedSource<String>,
    #[label("invalid `init` here")]
    pub at: miette::SourceSpan,
}

impl InstanceInitShape {
    pub fn new(span: &SourceSpan) -> Self {
        Self { source_code: named_source(span), at: label(span) }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("`class_init` must be a static, parameterless method")]
#[diagnostic(code(crabgen::class_init_shape))]
pub struct ClassInitShape {
    #[source_code]
    pub source_code: miette::NamedSource<String>,
    #[label("invalid `class_init` here")]
    pub at: miette::SourceSpan,
}

impl ClassInitShape {
    pub fn new(span: &SourceSpan) -> Self {
        Self { source_code: named_source(span), at: label(span) }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("methods returning a modified pointer must return `void`")]
#[diagnostic(code(crabgen::returns_modified_pointer_shape))]
pub struct ReturnsModifiedPointerShape {
    #[source_code]
    pub source_code: miette::NamedSource<String>,
    #[label("non-void return here")]
    pub at: miette::SourceSpan,
}

impl ReturnsModifiedPointerShape {
    pub fn new(span: &SourceSpan) -> Self {
        Self { source_code: named_source(span), at: label(span) }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("element access on a non-array expression")]
#[diagnostic(code(crabgen::non_array_indexed))]
pub struct NonArrayIndexed {
    #[source_code]
    pub source_code: miette::NamedSource<String>,
    #[label("indexed here")]
    pub at: miette::SourceSpan,
}

impl NonArrayIndexed {
    pub fn new(span: &SourceSpan) -> Self {
        Self { source_code: named_source(span), at: label(span) }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("`is` used against a non-class type")]
#[diagnostic(code(crabgen::is_on_non_class))]
pub struct IsOnNonClass {
    #[source_code]
    pub source_code: miette::NamedSource<String>,
    #[label("here")]
    pub at: miette::SourceSpan,
}

impl IsOnNonClass {
    pub fn new(span: &SourceSpan) -> Self {
        Self { source_code: named_source(span), at: label(span) }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("`.` used on a value whose type does not support members")]
#[diagnostic(code(crabgen::bad_member_access))]
pub struct BadMemberAccess {
    #[source_code]
    pub source_code: miette::NamedSource<String>,
    #[label("member access here")]
    pub at: miette::SourceSpan,
}

impl BadMemberAccess {
    pub fn new(span: &SourceSpan) -> Self {
        Self { source_code: named_source(span), at: label(span) }
    }
}

#[derive(Debug, Error, Diagnostic)]
#[error("internal error: unhandled type-symbol kind `{kind}`")]
#[diagnostic(code(crabgen::internal_unhandled_kind), help("this is a defensive check; please file a bug"))]
pub struct InternalUnhandledKind {
    pub kind: String,
    #[source_code]
    pub source_code: miette::NamedSource<String>,
    #[label("while emitting here")]
    pub at: miette::SourceSpan,
}

impl InternalUnhandledKind {
    pub fn new(kind: impl Into<String>, span: &SourceSpan) -> Self {
        Self { kind: kind.into(), source_code: named_source(span), at: label(span) }
    }
}

/// A member lookup miss that isn't surfaced directly as `UnresolvedSymbol`
/// (§4.1.1 "Miss at the root ⇒ MemberNotFound unless the caller requested
/// silent failure").
#[derive(Debug, Error, Diagnostic)]
#[error("member `{name}` not found")]
#[diagnostic(code(crabgen::member_not_found))]
pub struct MemberNotFound {
    pub name: String,
    #[source_code]
    pub source_code: miette::NamedSource<String>,
    #[label("accessed here")]
    pub at: miette::SourceSpan,
}

impl MemberNotFound {
    pub fn new(name: impl Into<String>, span: &SourceSpan) -> Self {
        Self { name: name.into(), source_code: named_source(span), at: label(span) }
    }
}

/// The ten named error kinds from §7, plus `MemberNotFound` (§4.1.1),
/// boxed behind `#[error(transparent)]` / `#[diagnostic(transparent)]` the
/// way `TirError` boxes each of its variants.
#[derive(Debug, Error, Diagnostic)]
pub enum CodegenError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    UnresolvedSymbol(#[from] Box<UnresolvedSymbol>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    AmbiguousUsing(#[from] Box<AmbiguousUsing>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    NoOverridableMethod(#[from] Box<NoOverridableMethod>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    InstanceInitShape(#[from] Box<InstanceInitShape>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    ClassInitShape(#[from] Box<ClassInitShape>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    ReturnsModifiedPointerShape(#[from] Box<ReturnsModifiedPointerShape>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    NonArrayIndexed(#[from] Box<NonArrayIndexed>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    IsOnNonClass(#[from] Box<IsOnNonClass>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    BadMemberAccess(#[from] Box<BadMemberAccess>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    InternalUnhandledKind(#[from] Box<InternalUnhandledKind>),
    #[error(transparent)]
    #[diagnostic(transparent)]
    MemberNotFound(#[from] Box<MemberNotFound>),
}

impl CodegenError {
    pub fn unresolved_symbol(name: impl Into<String>, span: &SourceSpan) -> CodegenError {
        CodegenError::UnresolvedSymbol(Box::new(UnresolvedSymbol::new(name, span)))
    }

    pub fn ambiguous_using(name: impl Into<String>, count: usize, span: &SourceSpan) -> CodegenError {
        CodegenError::AmbiguousUsing(Box::new(AmbiguousUsing::new(name, count, span)))
    }

    pub fn no_overridable_method(name: impl Into<String>, span: &SourceSpan) -> CodegenError {
        CodegenError::NoOverridableMethod(Box::new(NoOverridableMethod::new(name, span)))
    }

    pub fn non_array_indexed(span: &SourceSpan) -> CodegenError {
        CodegenError::NonArrayIndexed(Box::new(NonArrayIndexed::new(span)))
    }

    pub fn is_on_non_class(span: &SourceSpan) -> CodegenError {
        CodegenError::IsOnNonClass(Box::new(IsOnNonClass::new(span)))
    }

    pub fn bad_member_access(span: &SourceSpan) -> CodegenError {
        CodegenError::BadMemberAccess(Box::new(BadMemberAccess::new(span)))
    }

    pub fn member_not_found(name: impl Into<String>, span: &SourceSpan) -> CodegenError {
        CodegenError::MemberNotFound(Box::new(MemberNotFound::new(name, span)))
    }

    pub fn internal_unhandled_kind(kind: impl Into<String>, span: &SourceSpan) -> CodegenError {
        CodegenError::InternalUnhandledKind(Box::new(InternalUnhandledKind::new(kind, span)))
    }

    pub fn instance_init_shape(span: &SourceSpan) -> CodegenError {
        CodegenError::InstanceInitShape(Box::new(InstanceInitShape::new(span)))
    }

    pub fn class_init_shape(span: &SourceSpan) -> CodegenError {
        CodegenError::ClassInitShape(Box::new(ClassInitShape::new(span)))
    }

    pub fn returns_modified_pointer_shape(span: &SourceSpan) -> CodegenError {
        CodegenError::ReturnsModifiedPointerShape(Box::new(ReturnsModifiedPointerShape::new(span)))
    }
}

/// The pieces a [`ReportGenerator`] needs out of an error, without going
/// through the generic `miette::Diagnostic` trait object (whose
/// `source_code`/`labels` accessors are built for miette's own renderer,
/// not for re-hosting onto `codespan-reporting`).
struct Rendered<'a> {
    message: String,
    help: Option<String>,
    file_name: &'a str,
    file_text: &'a str,
    label_range: std::ops::Range<usize>,
    label_message: &'a str,
}

macro_rules! render_arm {
    ($inner:expr, $label_message:literal) => {{
        let inner = $inner;
        Rendered {
            message: inner.to_string(),
            help: Diagnostic::help(inner.as_ref()).map(|h| h.to_string()),
            file_name: inner.source_code.name(),
            file_text: inner.source_code.inner(),
            label_range: { let at = inner.at; at.offset()..at.offset() + at.len() },
            label_message: $label_message,
        }
    }};
}

impl CodegenError {
    fn render(&self) -> Rendered<'_> {
        match self {
            CodegenError::UnresolvedSymbol(inner) => render_arm!(inner, "not found in scope"),
            CodegenError::AmbiguousUsing(inner) => render_arm!(inner, "ambiguous here"),
            CodegenError::NoOverridableMethod(inner) => render_arm!(inner, "declared override here"),
            CodegenError::InstanceInitShape(inner) => render_arm!(inner, "invalid `init` here"),
            CodegenError::ClassInitShape(inner) => render_arm!(inner, "invalid `class_init` here"),
            CodegenError::ReturnsModifiedPointerShape(inner) => render_arm!(inner, "non-void return here"),
            CodegenError::NonArrayIndexed(inner) => render_arm!(inner, "indexed here"),
            CodegenError::IsOnNonClass(inner) => render_arm!(inner, "here"),
            CodegenError::BadMemberAccess(inner) => render_arm!(inner, "member access here"),
            CodegenError::InternalUnhandledKind(inner) => render_arm!(inner, "while emitting here"),
            CodegenError::MemberNotFound(inner) => render_arm!(inner, "accessed here"),
        }
    }
}

/// Renders a [`CodegenError`] to the terminal.
///
/// Grounded on `error.rs::ReportGenerator`/`CodeSpanReportGenerator`: the
/// structured diagnostic data (message, help, source, label) is turned
/// into a `codespan_reporting::diagnostic::Diagnostic` and emitted through
/// a `StandardStream`, exactly the teacher's rendering path.
pub trait ReportGenerator {
    fn generate(error: &CodegenError);
}

pub struct CodeSpanReportGenerator;

impl ReportGenerator for CodeSpanReportGenerator {
    fn generate(error: &CodegenError) {
        use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label};
        use codespan_reporting::files::SimpleFiles;
        use codespan_reporting::term::{self, termcolor::{ColorChoice, StandardStream}};

        let rendered = error.render();

        let mut files = SimpleFiles::new();
        let file_id = files.add(rendered.file_name.to_string(), rendered.file_text.to_string());

        let mut diagnostic = CsDiagnostic::error()
            .with_message(rendered.message)
            .with_labels(vec![Label::primary(file_id, rendered.label_range).with_message(rendered.label_message.to_string())]);

        if let Some(help) = rendered.help {
            diagnostic = diagnostic.with_notes(vec![help]);
        }

        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = term::Config::default();
        let _ = term::emit(&mut writer.lock(), &config, &files, &diagnostic);
    }
}
