//! Test modules relocated from implementation files.
//!
//! Per coding guidelines, inline test modules exceeding 200 lines are
//! moved to separate files in this directory for better maintainability.

mod methods_tests;
mod unary_operators_tests;
