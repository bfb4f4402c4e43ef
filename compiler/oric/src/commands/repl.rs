//! The `repl` command: a persistent, line-oriented interactive front-end.
//!
//! Built the same way [`super::run::run_file`] is — one `CompilerDb`, the
//! same `TerminalEmitter`/`DiagnosticQueue` reporting path — except the
//! `SourceFile` and its accumulated text outlive a single evaluation.  Each
//! accepted line is appended to that one `SourceFile` via `set_text`, so
//! `defer { ... }` blocks entered interactively go through the exact same
//! `register_deferred_imports` path a file-based module does (see
//! `eval::module::defer`); there is no separate "REPL mode" in the deferred-
//! import machinery.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use ori_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use ori_lexer_core::RawTag;
use oric::query::evaluated;
use oric::{CompilerDb, Db, EvalOutput, SourceFile};

use super::report_frontend_errors;

const PROMPT: &str = "ori> ";
const CONTINUATION_PROMPT: &str = "...> ";
const REPL_PATH: &str = "<repl>";

/// Run the interactive console: read lines from stdin, instrument and
/// evaluate each completed statement against a persistent session, print
/// the result, and loop until EOF or `:quit`.
///
/// An uncaught parse, type, or runtime error is reported the same way
/// `run_file` reports one, but the loop continues afterward instead of
/// exiting the process — a typo in one line doesn't end the session, and a
/// rejected line is rolled back so it never joins the session's committed
/// source.
pub fn run_repl() {
    let mut db = CompilerDb::new();
    oric::imports::install_defer_hook(&db);
    let file = SourceFile::new(&db, PathBuf::from(REPL_PATH), String::new());

    let mut committed = String::new();
    let mut pending = String::new();

    println!("Ori REPL — type `:quit` or press Ctrl-D to exit.");

    let stdin = io::stdin();
    loop {
        print_prompt(if pending.is_empty() {
            PROMPT
        } else {
            CONTINUATION_PROMPT
        });

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF (Ctrl-D)
            Ok(_) => {}
            Err(e) => {
                eprintln!("error: reading stdin: {e}");
                break;
            }
        }

        let trimmed = line.trim_end_matches(['\n', '\r']);
        if pending.is_empty() && (trimmed == ":quit" || trimmed == ":exit") {
            break;
        }
        if pending.is_empty() && trimmed.is_empty() {
            continue;
        }

        pending.push_str(trimmed);
        pending.push('\n');

        if is_incomplete(&pending) {
            continue;
        }

        let candidate = format!("{committed}{pending}");
        pending.clear();
        file.set_text(&mut db).to(candidate.clone());

        let is_tty = io::stderr().is_terminal();
        let accepted = {
            let mut emitter =
                TerminalEmitter::with_color_mode(io::stderr(), ColorMode::Auto, is_tty)
                    .with_source(&candidate)
                    .with_file_path(REPL_PATH);
            match report_frontend_errors(&db, file, &mut emitter) {
                Some(frontend) if !frontend.has_errors() => true,
                Some(_) => {
                    emitter.flush();
                    false
                }
                None => {
                    emitter.flush();
                    false
                }
            }
        };

        if !accepted {
            // Roll back: this line never joined the committed session text,
            // so the next prompt re-evaluates the old buffer, not a half-
            // broken one.
            file.set_text(&mut db).to(committed.clone());
            continue;
        }

        committed = candidate;
        let eval_result = evaluated(&db, file);
        report_eval_result(&eval_result, &db, &committed, is_tty);
    }
}

fn print_prompt(prompt: &str) {
    print!("{prompt}");
    let _ = io::stdout().flush();
}

/// Report an evaluation outcome without exiting the process — unlike
/// `run_file`'s `report_eval_result`, which `std::process::exit`s on
/// failure, the REPL loop must survive a bad line.
fn report_eval_result(
    eval_result: &oric::eval::ModuleEvalResult,
    db: &CompilerDb,
    source: &str,
    is_tty: bool,
) {
    if eval_result.is_failure() {
        let mut emitter = TerminalEmitter::with_color_mode(io::stderr(), ColorMode::Auto, is_tty)
            .with_source(source)
            .with_file_path(REPL_PATH);
        if let Some(ref snapshot) = eval_result.eval_error {
            let diag = oric::problem::eval::snapshot_to_diagnostic(snapshot, source, REPL_PATH);
            emitter.emit(&diag);
            emitter.flush();
        } else {
            let msg = eval_result.error.as_deref().unwrap_or("unknown runtime error");
            eprintln!("error: {msg}");
        }
        return;
    }

    if let Some(ref result) = eval_result.result {
        match result {
            EvalOutput::Void => {}
            _ => println!("{}", result.display(db.interner())),
        }
    }
}

/// Whether `buffer` ends mid-statement and needs a continuation line.
///
/// Reuses `ori_lexer_core`'s raw tokenizer — the same delimiter-aware
/// scanning the real lexer's cooking layer sits on top of — to track
/// paren/bracket/brace nesting and to notice an unterminated string,
/// char, or template literal at the end of the buffer. Pure prefix
/// scanning: re-tokenizing the whole pending statement on every line is
/// cheap (REPL input is never large) and avoids hand-rolling a second,
/// inevitably-divergent bracket counter.
fn is_incomplete(buffer: &str) -> bool {
    let tokens = ori_lexer_core::tokenize(buffer);
    let mut depth: i32 = 0;
    let mut last_tag = None;

    for tok in &tokens {
        match tok.tag {
            RawTag::LeftParen | RawTag::LeftBracket | RawTag::LeftBrace => depth += 1,
            RawTag::RightParen | RawTag::RightBracket | RawTag::RightBrace => depth -= 1,
            _ => {}
        }
        last_tag = Some(tok.tag);
    }

    if depth > 0 {
        return true;
    }

    matches!(
        last_tag,
        Some(RawTag::UnterminatedString | RawTag::UnterminatedChar | RawTag::UnterminatedTemplate)
    )
}
