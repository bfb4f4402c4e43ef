//! Registration and resolution for `defer { use ... }` bindings.
//!
//! [`register_deferred_imports`] binds each entry of a [`DeferredImportPlan`]
//! as a `Value::Deferred` placeholder and installs the resolver that
//! replaces them on first access. Resolution reuses the exact same
//! `resolve_import` / `parsed` / function-building path as the eager `use`
//! loop in [`super::super::evaluator::module_loading`] — the only
//! difference is *when* it runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ori_defer::{DeferredImportPlan, DeferredImportPlanEntry};
use ori_eval::{DeferResolver, Environment, Mutability};
use ori_patterns::{DeferredProxy, Value};

use crate::db::{CompilerDb, Db};
use crate::imports::{is_parent_module_import, is_test_module};
use crate::ir::SharedArena;
use crate::query::parsed;

use super::import::build_module_functions;

/// Bind every entry in `plan` into `env`, and, if `ResolverHook::DeferAware`
/// is installed on `db`, install the callback that resolves unresolved
/// entries on first lookup.
///
/// Without the hook installed, a `defer` block is semantically inert: every
/// entry resolves immediately, exactly like an equivalent top-level `use`
/// (see `eval::module::mod` docs and SPEC_FULL.md §4.6). A resolution
/// failure in that path is returned immediately, same as an eager `use`
/// would report it at module-load time.
///
/// No-op (including resolver installation) when `plan` is empty, so modules
/// with no `defer` blocks never pay for a resolver clone of `CompilerDb`.
pub(crate) fn register_deferred_imports(
    plan: &DeferredImportPlan,
    env: &mut Environment,
    db: &dyn Db,
    file_path: &Path,
) -> Result<(), String> {
    if plan.entries.is_empty() {
        return Ok(());
    }

    let defer_aware = db
        .hooks()
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .is_defer_aware();

    if !defer_aware {
        let Some(compiler_db) = db.as_compiler_db() else {
            return Ok(());
        };
        for entry in &plan.entries {
            let proxy = entry_proxy(entry);
            let value = resolve_deferred_proxy(compiler_db, file_path, &proxy)?;
            env.define(entry.binding(), value, Mutability::Immutable);
        }
        return Ok(());
    }

    for entry in &plan.entries {
        let proxy = entry_proxy(entry);
        env.define(entry.binding(), Value::deferred(proxy), Mutability::Immutable);
    }

    if let Some(resolver) = build_defer_resolver(db, file_path) {
        env.set_defer_resolver(resolver);
    }
    Ok(())
}

fn entry_proxy(entry: &DeferredImportPlanEntry) -> DeferredProxy {
    match entry {
        DeferredImportPlanEntry::Alias {
            target, file_path, ..
        } => DeferredProxy::for_module(target.clone(), entry.binding(), file_path.clone()),
        DeferredImportPlanEntry::Item {
            target,
            item_name,
            file_path,
            ..
        } => DeferredProxy::for_item(target.clone(), entry.binding(), *item_name, file_path.clone()),
    }
}

/// Build the `'static` resolver closure installed on `Environment`.
///
/// `ori_eval::DeferResolver` has an implicit `'static` bound, but `db` here
/// is a borrowed `&'a dyn Db` tied to the current query. The closure instead
/// captures an owned clone of `CompilerDb` (cheap: its fields are all `Arc`
/// or Salsa-internal handles) obtained through `Db::as_compiler_db`. Returns
/// `None` when the concrete database isn't `CompilerDb`, since a resolver
/// has nothing to clone in that case.
pub(crate) fn build_defer_resolver(db: &dyn Db, file_path: &Path) -> Option<DeferResolver> {
    let db = db.as_compiler_db()?.clone();
    let current_file = file_path.to_path_buf();
    Some(Arc::new(move |proxy: &DeferredProxy| {
        resolve_deferred_proxy(&db, &current_file, proxy)
    }))
}

/// Resolve a single `DeferredProxy` to its target value.
///
/// Mirrors `register_imports`/`register_module_alias` in
/// [`super::import`], except it builds one `Value` directly instead of
/// writing into an `Environment` — the caller (`Environment::get` /
/// `resolve_deferred`) owns the binding being replaced.
fn resolve_deferred_proxy(
    db: &CompilerDb,
    current_file: &Path,
    proxy: &DeferredProxy,
) -> Result<Value, String> {
    let stdlib_override = std::env::var("ORI_STDLIB").ok();
    let proxy_file = PathBuf::from(&proxy.file_path);
    let resolved = crate::imports::resolve_import(
        db,
        &proxy.target,
        &proxy_file,
        stdlib_override.as_deref(),
    )
    .map_err(|e| e.message)?;

    let imported_result = parsed(db, resolved.file);
    let imported_arena = SharedArena::new(imported_result.arena.clone());
    let functions = build_module_functions(&imported_result, &imported_arena, None);

    match proxy.item_name {
        Some(item_name) => {
            let func = imported_result
                .module
                .functions
                .iter()
                .find(|f| f.name == item_name)
                .ok_or_else(|| {
                    format!(
                        "'{}' not found in '{}'",
                        db.interner().lookup(item_name),
                        resolved.path.display()
                    )
                })?;

            let allow_private_access = is_test_module(current_file)
                && is_parent_module_import(current_file, &resolved.path);
            if !func.visibility.is_public() && !allow_private_access {
                return Err(format!(
                    "'{}' is private in '{}'. Use '::{}' to import private items.",
                    db.interner().lookup(item_name),
                    resolved.path.display(),
                    db.interner().lookup(item_name),
                ));
            }

            functions
                .get(&item_name)
                .cloned()
                .ok_or_else(|| format!("'{}' has no value", db.interner().lookup(item_name)))
        }
        None => {
            let namespace: BTreeMap<_, _> = imported_result
                .module
                .functions
                .iter()
                .filter(|f| f.visibility.is_public())
                .filter_map(|f| functions.get(&f.name).map(|v| (f.name, v.clone())))
                .collect();
            Ok(Value::module_namespace(namespace.into_iter().collect()))
        }
    }
}
