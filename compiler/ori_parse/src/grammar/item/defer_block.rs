//! `defer` block parsing.
//!
//! Grammar:
//! ```ebnf
//! defer_block = "defer" "{" { use_stmt } "}" .
//! ```
//!
//! A `defer` block holds a sequence of plain `use` statements whose binding
//! is postponed until the imported name is first looked up. Only `use`
//! statements are permitted in the body; anything else is a content
//! violation (`ErrorCode::E1017`).

use crate::{committed, ParseError, ParseOutcome, Parser};
use ori_ir::{DeferBlock, TokenKind};

impl Parser<'_> {
    /// Parse a `defer { ... }` block.
    ///
    /// Returns `EmptyErr` if no `defer` keyword is present.
    pub(crate) fn parse_defer_block(&mut self) -> ParseOutcome<DeferBlock> {
        if !self.cursor.check(&TokenKind::Defer) {
            return ParseOutcome::empty_err_expected(
                &TokenKind::Defer,
                self.cursor.current_span().start as usize,
            );
        }

        self.in_error_context(crate::ErrorContext::DeferBlock, Self::parse_defer_block_body)
    }

    fn parse_defer_block_body(&mut self) -> ParseOutcome<DeferBlock> {
        let start_span = self.cursor.current_span();

        committed!(self.cursor.expect(&TokenKind::Defer));
        committed!(self.cursor.expect(&TokenKind::LBrace));

        let mut uses = Vec::new();
        loop {
            self.cursor.skip_newlines();

            if self.cursor.check(&TokenKind::RBrace) || self.cursor.is_at_end() {
                break;
            }

            if !self.cursor.check(&TokenKind::Use) {
                let span = self.cursor.current_span();
                return ParseOutcome::consumed_err(
                    ParseError::new(
                        ori_diagnostic::ErrorCode::E1017,
                        "a defer block may only contain `use` statements",
                        span,
                    )
                    .with_help("move non-import code outside the `defer` block".to_string()),
                    span,
                );
            }

            match self.parse_use_inner(ori_ir::Visibility::Private) {
                Ok(use_def) => uses.push(use_def),
                Err(error) => {
                    let span = error.span;
                    return ParseOutcome::consumed_err(error, span);
                }
            }

            self.eat_optional_semicolon();
        }

        committed!(self.cursor.expect(&TokenKind::RBrace));
        let end_span = self.cursor.previous_span();

        ParseOutcome::consumed_ok(DeferBlock {
            uses,
            span: start_span.merge(end_span),
        })
    }
}
