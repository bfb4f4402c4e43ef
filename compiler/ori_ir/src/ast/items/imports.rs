//! Import Types
//!
//! Use/import statements and related types.
//!
//! # Salsa Compatibility
//! All types have Clone, Eq, `PartialEq`, Hash, Debug for Salsa requirements.

use super::super::Visibility;
use crate::{Name, Span};

/// A use/import statement.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct UseDef {
    /// Import path - either relative ('./math', '../utils') or module (std.math)
    pub path: ImportPath,
    /// Items being imported (empty when using module alias)
    pub items: Vec<UseItem>,
    /// Module alias for qualified access: `use std.net.http as http`
    ///
    /// When set, the entire module is imported under this alias name,
    /// enabling qualified access like `http.get()`. Items list must be empty.
    pub module_alias: Option<Name>,
    /// Visibility of this import.
    ///
    /// When public, imported items are re-exported from this module.
    pub visibility: Visibility,
    /// Source span
    pub span: Span,
}

/// Import path type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ImportPath {
    /// Relative path: './math', '../utils/helpers'
    Relative(Name),
    /// Module path: std.math, std.collections
    Module(Vec<Name>),
}

/// A single imported item.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct UseItem {
    /// Name of the item being imported
    pub name: Name,
    /// Optional alias: `name as alias`
    pub alias: Option<Name>,
    /// Whether this is a private import (`::name`)
    pub is_private: bool,
}

/// An `extension` import statement: `extension std.iter.extensions { Iterator.count }`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExtensionImport {
    /// Import path of the module defining the extension methods.
    pub path: ImportPath,
    /// Individual `Type.method` items being pulled into scope.
    pub items: Vec<ExtensionImportItem>,
    /// Visibility of this import.
    pub visibility: Visibility,
    /// Source span.
    pub span: Span,
}

/// A single `Type.method` entry inside an `extension` import block.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExtensionImportItem {
    /// The type the extension method is defined on.
    pub type_name: Name,
    /// The extension method name.
    pub method_name: Name,
    /// Source span.
    pub span: Span,
}

/// A `defer { ... }` block: a sequence of `use` statements whose binding is
/// deferred until the bound name is first looked up.
///
/// Only plain `use` statements are allowed in the block body; `extension`
/// and `extern` declarations are rejected by the parser (see
/// `ErrorCode::E1017`).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct DeferBlock {
    /// The `use` statements to defer.
    pub uses: Vec<UseDef>,
    /// Source span of the whole block.
    pub span: Span,
}

/// Structured classification of an import-resolution failure.
///
/// Shared between the import resolver and the type checker so both report
/// the same kind for the same underlying failure instead of each inventing
/// their own `Other` bucket.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum ImportErrorKind {
    /// The target module could not be located on the search path.
    ModuleNotFound,
    /// A named item does not exist in the resolved module.
    ItemNotFound,
    /// The requested item exists but is private (`::name`) to its module.
    PrivateAccess,
    /// Two modules import each other, directly or transitively.
    CircularImport,
    /// `use` with an empty module path (e.g. a bare `.`).
    EmptyModulePath,
    /// `use path as alias { item }` combined a module alias with item imports.
    ModuleAliasWithItems,
}
