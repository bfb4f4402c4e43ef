//! Lowers `defer { use ... }` blocks into a lazy import plan.
//!
//! The parser already rejects anything other than plain `use` statements
//! inside a `defer` block (`ErrorCode::E1017`) and anything outside module
//! top level (`ErrorCode::E1018`), so by the time a `Module` reaches
//! [`instrument`] every `DeferBlock` is already well-formed. This crate's
//! only job is the one-to-one lowering from parsed `UseDef`s to plan
//! entries — it never resolves an import itself.

use ori_ir::{ImportPath, Module, Name, Span};

/// Version of the `defer` lowering rules implemented by [`instrument`].
///
/// Bump whenever the `UseDef` → `DeferredImportPlanEntry` mapping changes
/// (a new binding form, a changed span convention, etc.) so that anything
/// keying a cache off this crate's behavior — currently just `oric`'s
/// `DEFER_SUBSYSTEM_VERSION` constant — has a value to invalidate against.
pub const INSTRUMENTER_VERSION: u32 = 1;

/// One deferred binding to install, without resolving its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeferredImportPlanEntry {
    /// `use A.B.C as X` / `use './rel' as X` — the whole module is bound
    /// under `binding`.
    Alias {
        binding: Name,
        target: ImportPath,
        file_path: String,
        /// Span of the originating `use` statement, for diagnostics.
        span: Span,
    },
    /// One name out of `use M { N, N2 as A2 }`, lowered independently per
    /// item so each binding resolves on its own first access.
    Item {
        binding: Name,
        item_name: Name,
        target: ImportPath,
        file_path: String,
        /// Set by the `::` prefix (`use M { ::private_fn }`).
        is_private: bool,
        /// Span of the originating `use` statement, for diagnostics.
        span: Span,
    },
}

impl DeferredImportPlanEntry {
    /// The local name this entry will bind, after any `as` alias.
    pub fn binding(&self) -> Name {
        match self {
            DeferredImportPlanEntry::Alias { binding, .. }
            | DeferredImportPlanEntry::Item { binding, .. } => *binding,
        }
    }

    /// The import path this entry's target will be resolved from.
    pub fn target(&self) -> &ImportPath {
        match self {
            DeferredImportPlanEntry::Alias { target, .. }
            | DeferredImportPlanEntry::Item { target, .. } => target,
        }
    }

    /// Span of the originating `use` statement, for diagnostics.
    pub fn span(&self) -> Span {
        match self {
            DeferredImportPlanEntry::Alias { span, .. }
            | DeferredImportPlanEntry::Item { span, .. } => *span,
        }
    }
}

/// The full set of deferred bindings a module's `defer` blocks produce.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeferredImportPlan {
    pub entries: Vec<DeferredImportPlanEntry>,
}

/// An error lowering a `defer` block's contents.
///
/// Reserved for future validation (e.g. duplicate bindings across blocks);
/// the grammar currently guarantees every `UseDef` reaching this crate is
/// already well-formed, so no case produces one yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstrumentError {
    pub message: String,
    pub span: Span,
}

/// Lower every `defer { use ... }` block in `module` into a
/// [`DeferredImportPlan`].
///
/// `file_path` is the absolute path of the file `module` was parsed from,
/// recorded on each entry so resolution (run later, at first lookup) can
/// reuse the same relative-import search rules an eager `use` would.
pub fn instrument(module: &Module, file_path: &str) -> (DeferredImportPlan, Vec<InstrumentError>) {
    let mut entries = Vec::new();

    for block in &module.defer_blocks {
        for use_def in &block.uses {
            if let Some(alias) = use_def.module_alias {
                entries.push(DeferredImportPlanEntry::Alias {
                    binding: alias,
                    target: use_def.path.clone(),
                    file_path: file_path.to_string(),
                    span: use_def.span,
                });
                continue;
            }
            for item in &use_def.items {
                let binding = item.alias.unwrap_or(item.name);
                entries.push(DeferredImportPlanEntry::Item {
                    binding,
                    item_name: item.name,
                    target: use_def.path.clone(),
                    file_path: file_path.to_string(),
                    is_private: item.is_private,
                    span: use_def.span,
                });
            }
        }
    }

    (DeferredImportPlan { entries }, Vec::new())
}
