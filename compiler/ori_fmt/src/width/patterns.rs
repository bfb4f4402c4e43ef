//! Width calculation for binding patterns.
//!
//! Provides width calculation for destructuring patterns used in let bindings:
//! - Simple names (`foo`)
//! - Wildcards (`_`)
//! - Tuple patterns (`(a, b)`)
//! - Struct patterns (`{ x, y }`)
//! - List patterns with optional rest (`[a, b, ..rest]`)

use super::helpers::COMMA_SEPARATOR_WIDTH;
use ori_ir::{BindingPattern, StringLookup};

/// Calculate width of a binding pattern.
///
/// Recursively calculates width for nested patterns. Includes all
/// delimiters, separators, and shorthand syntax.
pub(super) fn binding_pattern_width<I: StringLookup>(
    pattern: &BindingPattern,
    interner: &I,
) -> usize {
    match pattern {
        BindingPattern::Name(name) => interner.lookup(*name).len(),

        BindingPattern::Wildcard => 1, // "_"

        BindingPattern::Tuple(elements) => {
            if elements.is_empty() {
                return 2; // "()"
            }
            // "(" + elements + ")"
            let mut total = 1;
            for (i, elem) in elements.iter().enumerate() {
                total += binding_pattern_width(elem, interner);
                if i < elements.len() - 1 {
                    total += COMMA_SEPARATOR_WIDTH;
                }
            }
            total + 1
        }

        BindingPattern::Struct { fields } => {
            if fields.is_empty() {
                return 2; // "{}"
            }
            // "{ " + fields + " }"
            let mut total = 2;
            for (i, (name, nested)) in fields.iter().enumerate() {
                let name_w = interner.lookup(*name).len();
                if let Some(pat) = nested {
                    // "name: pattern"
                    total += name_w + 2 + binding_pattern_width(pat, interner);
                } else {
                    // Shorthand: just "name"
                    total += name_w;
                }
                if i < fields.len() - 1 {
                    total += COMMA_SEPARATOR_WIDTH;
                }
            }
            total + 2 // " }"
        }

        BindingPattern::List { elements, rest } => {
            // "[" + elements + "]"
            let mut total = 1;
            for (i, elem) in elements.iter().enumerate() {
                total += binding_pattern_width(elem, interner);
                if i < elements.len() - 1 {
                    total += COMMA_SEPARATOR_WIDTH;
                }
            }
            if let Some(rest_name) = rest {
                if !elements.is_empty() {
                    total += COMMA_SEPARATOR_WIDTH;
                }
                // "..rest"
                total += 2 + interner.lookup(*rest_name).len();
            }
            total + 1 // "]"
        }
    }
}
