//! Composite runtime values: functions, structs, and ranges.
//!
//! These types back the `Value::Function`, `Value::MemoizedFunction`,
//! `Value::Struct`, and `Value::Range` variants. Unlike the scalar and
//! `Heap<T>` variants, they carry enough internal structure (captures,
//! canonical IR hooks, caches) to warrant their own types rather than a bare
//! `Heap<T>` payload.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;

use ori_ir::canon::{CanId, SharedCanonResult};
use ori_ir::{ExprId, Name, SharedArena};

use super::Value;

/// Maximum number of entries kept in a `MemoizedFunctionValue`'s result cache.
///
/// Oldest entries are evicted first once the cache is full, bounding memory
/// use for recursive functions memoized over an unbounded input domain.
pub const MAX_MEMO_CACHE_SIZE: usize = 256;

/// A closure value: parameters, captured environment, and a body.
///
/// Two evaluation paths exist side by side during the migration to canonical
/// IR: the legacy `body: ExprId` (evaluated via `Interpreter::eval`), and an
/// optional canonical body (`has_canon()`, evaluated via `Interpreter::eval_can`).
/// `set_canon` attaches the canonical path once `ori_canon::lower_module` has
/// run; until then `has_canon()` is `false` and callers fall back to `body`.
#[derive(Clone)]
pub struct FunctionValue {
    /// Parameter names, in declaration order.
    pub params: Vec<Name>,
    /// Legacy expression body, used when no canonical body is attached.
    pub body: ExprId,
    captures: Arc<FxHashMap<Name, Value>>,
    arena: SharedArena,
    capabilities: Vec<Name>,
    can_body: Option<CanId>,
    canon: Option<SharedCanonResult>,
    can_defaults: Vec<Option<CanId>>,
}

impl FunctionValue {
    /// Create a function value owning its captures.
    pub fn new(params: Vec<Name>, body: ExprId, captures: FxHashMap<Name, Value>, arena: SharedArena) -> Self {
        Self::with_shared_captures(params, Arc::new(captures), arena, Vec::new()).with_body(body)
    }

    /// Create a function value sharing an already-`Arc`'d capture map.
    ///
    /// Used when registering many module-level functions against the same
    /// captured environment, avoiding an `FxHashMap` clone per function.
    pub fn with_shared_captures(
        params: Vec<Name>,
        captures: Arc<FxHashMap<Name, Value>>,
        arena: SharedArena,
        capabilities: Vec<Name>,
    ) -> Self {
        Self {
            params,
            body: ExprId::INVALID,
            captures,
            arena,
            capabilities,
            can_body: None,
            canon: None,
            can_defaults: Vec::new(),
        }
    }

    fn with_body(mut self, body: ExprId) -> Self {
        self.body = body;
        self
    }

    /// Whether this function has any captured variables.
    pub fn has_captures(&self) -> bool {
        !self.captures.is_empty()
    }

    /// Look up a captured variable by name.
    pub fn get_capture(&self, name: Name) -> Option<&Value> {
        self.captures.get(&name)
    }

    /// Iterate over captured `(name, value)` pairs.
    pub fn captures(&self) -> impl Iterator<Item = (&Name, &Value)> {
        self.captures.iter()
    }

    /// Capability names this function requires from the calling scope.
    pub fn capabilities(&self) -> impl Iterator<Item = &Name> {
        self.capabilities.iter()
    }

    /// The shared arena this function's legacy body was parsed into.
    pub fn arena(&self) -> SharedArena {
        self.arena.clone()
    }

    /// Attach a canonical body, enabling `eval_can`-based dispatch.
    pub fn set_canon(&mut self, body: CanId, canon: SharedCanonResult) {
        self.can_body = Some(body);
        self.canon = Some(canon);
    }

    /// Whether a canonical body has been attached via `set_canon`.
    pub fn has_canon(&self) -> bool {
        self.can_body.is_some()
    }

    /// The canonical body, if attached.
    pub fn can_body(&self) -> Option<CanId> {
        self.can_body
    }

    /// The canonical IR this function's body was lowered into, if attached.
    pub fn canon_result(&self) -> Option<&SharedCanonResult> {
        self.canon.as_ref()
    }

    /// Attach canonicalized default-parameter expressions.
    ///
    /// `defaults[i]` corresponds to `params[i]`; `None` means the parameter
    /// is required.
    pub fn set_can_defaults(&mut self, defaults: Vec<Option<CanId>>) {
        self.can_defaults = defaults;
    }

    /// Canonicalized default-parameter expressions, parallel to `params`.
    pub fn can_defaults(&self) -> &[Option<CanId>] {
        &self.can_defaults
    }

    /// Number of parameters that must be supplied (no default available).
    pub fn required_param_count(&self) -> usize {
        if self.can_defaults.is_empty() {
            self.params.len()
        } else {
            self.can_defaults.iter().filter(|d| d.is_none()).count()
        }
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("params", &self.params.len())
            .field("has_canon", &self.has_canon())
            .finish()
    }
}

/// An in-progress or completed memoization cache, guarded by a mutex.
///
/// Evicts the oldest entry (by insertion order) once `MAX_MEMO_CACHE_SIZE`
/// is reached. Updating an existing key's value does not count as an
/// insertion and never triggers eviction.
struct MemoCache {
    order: VecDeque<Vec<Value>>,
    entries: FxHashMap<Vec<Value>, Value>,
}

impl MemoCache {
    fn new() -> Self {
        Self {
            order: VecDeque::new(),
            entries: FxHashMap::default(),
        }
    }
}

/// A function value with memoized results, used by `recurse(memo: true)`.
#[derive(Clone)]
pub struct MemoizedFunctionValue {
    /// The underlying function.
    pub func: FunctionValue,
    cache: Arc<Mutex<MemoCache>>,
}

impl MemoizedFunctionValue {
    /// Wrap a function value with a fresh, empty memoization cache.
    pub fn new(func: FunctionValue) -> Self {
        Self {
            func,
            cache: Arc::new(Mutex::new(MemoCache::new())),
        }
    }

    /// Look up a cached result for the given argument list.
    pub fn get_cached(&self, args: &[Value]) -> Option<Value> {
        let cache = self.cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        cache.entries.get(args).cloned()
    }

    /// Cache a result for the given argument list, evicting the oldest
    /// entry if the cache is at capacity.
    pub fn cache_result(&self, args: &[Value], result: Value) {
        let mut cache = self.cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        if cache.entries.contains_key(args) {
            cache.entries.insert(args.to_vec(), result);
            return;
        }

        if cache.entries.len() >= MAX_MEMO_CACHE_SIZE {
            if let Some(oldest) = cache.order.pop_front() {
                cache.entries.remove(&oldest);
            }
        }

        let key = args.to_vec();
        cache.order.push_back(key.clone());
        cache.entries.insert(key, result);
    }

    /// Number of entries currently cached.
    pub fn cache_size(&self) -> usize {
        let cache = self.cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        cache.entries.len()
    }
}

impl fmt::Debug for MemoizedFunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizedFunctionValue")
            .field("func", &self.func)
            .field("cached", &self.cache_size())
            .finish()
    }
}

/// Precomputed field-name-to-index lookup for a struct type.
///
/// Built once per struct instance and shared via `Arc`, so field access by
/// name is a single hash lookup followed by a `Vec` index rather than a
/// per-access string/name hash over the whole field set.
#[derive(Clone, Debug, Default)]
pub struct StructLayout {
    indices: FxHashMap<Name, usize>,
}

impl StructLayout {
    /// Build a layout from a struct type's field names, in declaration order.
    pub fn new(field_names: &[Name]) -> Self {
        let indices = field_names
            .iter()
            .enumerate()
            .map(|(i, name)| (*name, i))
            .collect();
        Self { indices }
    }

    /// The declared position of a field, if it exists on this struct.
    pub fn get_index(&self, name: Name) -> Option<usize> {
        self.indices.get(&name).copied()
    }
}

/// A struct instance: a type name, its fields in layout order, and the
/// layout used to resolve a field name to its position.
///
/// `fields` is addressed positionally (`sv.fields.get(idx)`) by code that
/// has already resolved a field name to an index ahead of time, such as
/// compiled decision trees; `get_field` is the name-based entry point for
/// everything else.
#[derive(Clone, Debug)]
pub struct StructValue {
    pub type_name: Name,
    pub fields: Arc<Vec<Value>>,
    pub layout: Arc<StructLayout>,
}

impl StructValue {
    /// Construct a struct instance from its type name and field values.
    ///
    /// Field order is determined by sorting field names, giving a
    /// deterministic layout independent of the map's iteration order.
    pub fn new(type_name: Name, field_values: FxHashMap<Name, Value>) -> Self {
        let mut field_names: Vec<Name> = field_values.keys().copied().collect();
        field_names.sort();
        let layout = Arc::new(StructLayout::new(&field_names));
        let mut fields = vec![Value::Void; field_names.len()];
        for (name, value) in field_values {
            if let Some(idx) = layout.get_index(name) {
                fields[idx] = value;
            }
        }
        Self {
            type_name,
            fields: Arc::new(fields),
            layout,
        }
    }

    /// Look up a field by name.
    pub fn get_field(&self, name: Name) -> Option<&Value> {
        let index = self.layout.get_index(name)?;
        self.fields.get(index)
    }
}

/// A bounded range value: `start..end` or `start..=end`, with an optional
/// step (default 1, negative for descending ranges).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeValue {
    pub start: i64,
    pub end: i64,
    pub step: i64,
    pub inclusive: bool,
}

impl RangeValue {
    /// `start..end`, exclusive of `end`, stepping by 1.
    pub fn exclusive(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            step: 1,
            inclusive: false,
        }
    }

    /// `start..=end`, inclusive of `end`, stepping by 1.
    pub fn inclusive(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            step: 1,
            inclusive: true,
        }
    }

    /// `start..end`, exclusive of `end`, stepping by `step`.
    pub fn exclusive_with_step(start: i64, end: i64, step: i64) -> Self {
        Self {
            start,
            end,
            step,
            inclusive: false,
        }
    }

    /// `start..=end`, inclusive of `end`, stepping by `step`.
    pub fn inclusive_with_step(start: i64, end: i64, step: i64) -> Self {
        Self {
            start,
            end,
            step,
            inclusive: true,
        }
    }

    /// Number of values the range produces.
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "range bound arithmetic on user-provided i64 values"
    )]
    pub fn len(&self) -> usize {
        if self.step == 0 {
            return 0;
        }

        let adjusted_end = if self.inclusive {
            if self.step > 0 {
                self.end + 1
            } else {
                self.end - 1
            }
        } else {
            self.end
        };

        let diff = if self.step > 0 {
            (adjusted_end - self.start).max(0)
        } else {
            (self.start - adjusted_end).max(0)
        };

        let step_abs = self.step.unsigned_abs();
        #[expect(clippy::cast_sign_loss, reason = "diff already clamped to non-negative above")]
        let diff_abs = diff as u64;
        diff_abs.div_ceil(step_abs) as usize
    }

    /// Whether the range produces no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `value` would be produced by iterating this range.
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "range bound arithmetic on user-provided i64 values"
    )]
    pub fn contains(&self, value: i64) -> bool {
        let in_bounds = match self.step.cmp(&0) {
            std::cmp::Ordering::Greater => {
                if self.inclusive {
                    value >= self.start && value <= self.end
                } else {
                    value >= self.start && value < self.end
                }
            }
            std::cmp::Ordering::Less => {
                if self.inclusive {
                    value <= self.start && value >= self.end
                } else {
                    value <= self.start && value > self.end
                }
            }
            std::cmp::Ordering::Equal => return false,
        };

        in_bounds && (value - self.start) % self.step == 0
    }

    /// Iterate over the range's values.
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "range bound arithmetic on user-provided i64 values"
    )]
    pub fn iter(&self) -> impl Iterator<Item = i64> {
        let start = self.start;
        let end = self.end;
        let step = self.step;
        let inclusive = self.inclusive;

        let initial = match step.cmp(&0) {
            std::cmp::Ordering::Greater => {
                if (inclusive && start <= end) || (!inclusive && start < end) {
                    Some(start)
                } else {
                    None
                }
            }
            std::cmp::Ordering::Less => {
                if (inclusive && start >= end) || (!inclusive && start > end) {
                    Some(start)
                } else {
                    None
                }
            }
            std::cmp::Ordering::Equal => None,
        };

        std::iter::successors(initial, move |&current| {
            let next = current + step;
            match step.cmp(&0) {
                std::cmp::Ordering::Greater if (inclusive && next <= end) || (!inclusive && next < end) => Some(next),
                std::cmp::Ordering::Less if (inclusive && next >= end) || (!inclusive && next > end) => Some(next),
                _ => None,
            }
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::cast_possible_wrap,
    reason = "tests use small literal values (0-10) that fit in i64 without wrapping"
)]
