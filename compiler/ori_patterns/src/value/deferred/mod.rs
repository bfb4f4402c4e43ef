//! Deferred-import placeholder value.
//!
//! `Value::Deferred` stands in for the binding produced by a `use`
//! statement inside a `defer { ... }` block until the bound name is first
//! looked up. Resolution is the environment/field-access layer's job (see
//! `ori_eval::environment::Environment::get`); this module only owns the
//! placeholder's data and its one-shot bookkeeping.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use ori_ir::ast::ImportPath;
use ori_ir::{Name, StringLookup};

use super::{Heap, Value};

/// An unresolved import awaiting its first lookup.
///
/// Constructed only via `Value::deferred`, mirroring the factory-method
/// discipline every other `Heap`-backed `Value` variant follows.
///
/// A `Value::Deferred` is `Heap`-shared (`Arc`-backed), so the very same
/// proxy can back more than one binding slot at once — `Environment::capture`
/// clones a deferred binding's `Value` (not just its name) into a closure's
/// capture map, and the module-scope binding keeps its own copy. Resolution
/// therefore cannot be one-shot per *slot*: it is keyed on the proxy itself.
/// `resolve_with` caches the resolved `Value` on the proxy so whichever slot
/// resolves first runs the real resolver, and every other slot sharing the
/// same proxy gets the cached value back instead of re-running it.
pub struct DeferredProxy {
    /// The import path requested.
    pub target: ImportPath,
    /// The local name this proxy is bound under, after any `as` alias.
    pub binding_name: Name,
    /// The single item this proxy stands in for out of a `use M { N }`
    /// item list. `None` for a whole-module alias import (`use M as A`).
    pub item_name: Option<Name>,
    /// Nested deferred values for dotted access performed on this proxy
    /// before it resolves, e.g. `http.get` where `http` is itself deferred.
    pub children: Heap<RefCell<FxHashMap<Name, Value>>>,
    /// Absolute path of the file that requested this import, needed to
    /// re-run import resolution with the same search rules used at parse
    /// time.
    pub file_path: String,
    /// Cache of the resolved value, shared by every clone of this proxy.
    /// `None` until the first successful resolution.
    resolved: RefCell<Option<Value>>,
}

impl DeferredProxy {
    /// Create a proxy standing in for a whole-module alias import
    /// (`use M as A`).
    pub fn for_module(target: ImportPath, binding_name: Name, file_path: String) -> Self {
        Self::new(target, binding_name, None, file_path)
    }

    /// Create a proxy standing in for one name out of a `use M { N }` item
    /// list.
    pub fn for_item(target: ImportPath, binding_name: Name, item_name: Name, file_path: String) -> Self {
        Self::new(target, binding_name, Some(item_name), file_path)
    }

    fn new(target: ImportPath, binding_name: Name, item_name: Option<Name>, file_path: String) -> Self {
        Self {
            target,
            binding_name,
            item_name,
            children: Heap::new(RefCell::new(FxHashMap::default())),
            file_path,
            resolved: RefCell::new(None),
        }
    }

    /// Whether some caller — through any binding slot sharing this proxy —
    /// has already resolved it.
    pub fn is_resolved(&self) -> bool {
        self.resolved.borrow().is_some()
    }

    /// Resolve this proxy exactly once, no matter how many binding slots or
    /// closure captures share it.
    ///
    /// `resolve` runs only the first time this is called on a given proxy;
    /// every later call — even one reached through a different binding slot
    /// — returns the cached `Value` without invoking `resolve` again. A
    /// failed `resolve` leaves the proxy unresolved so the next call retries.
    pub fn resolve_with(
        &self,
        resolve: impl FnOnce() -> Result<Value, String>,
    ) -> Result<Value, String> {
        if let Some(value) = self.resolved.borrow().as_ref() {
            return Ok(value.clone());
        }
        let value = resolve()?;
        *self.resolved.borrow_mut() = Some(value.clone());
        Ok(value)
    }

    /// A short diagnostic description, used by `Value`'s `Debug`/`Display`
    /// forms: `deferred import of 'std.math.sqrt'` or `deferred module
    /// 'std.net.http' as 'http'`.
    pub fn describe(&self, interner: &impl StringLookup) -> String {
        let path = format_import_path(&self.target, interner);
        match self.item_name {
            Some(item) => format!("deferred import of '{path}.{}'", interner.lookup(item)),
            None => format!(
                "deferred module '{path}' as '{}'",
                interner.lookup(self.binding_name)
            ),
        }
    }
}

fn format_import_path(path: &ImportPath, interner: &impl StringLookup) -> String {
    match path {
        ImportPath::Relative(name) => interner.lookup(*name).to_string(),
        ImportPath::Module(segments) => segments
            .iter()
            .map(|s| interner.lookup(*s))
            .collect::<Vec<_>>()
            .join("."),
    }
}
