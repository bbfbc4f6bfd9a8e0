#![allow(missing_docs)]

use codespan_reporting::diagnostic::Diagnostic;
use conftree::{Table, Value};
use std::fmt::Write as _;

/// Parses a document that must be valid and asserts its JSON snapshot.
#[macro_export]
macro_rules! valid {
    ($toml:expr, @$snap:literal) => {{
        let arena = conftree::Arena::new();
        let table = conftree::parse($toml, &arena)
            .unwrap_or_else(|e| panic!("failed to parse document: {e}"));
        insta::assert_json_snapshot!(table, @$snap);
    }};
}

/// Parses a document that must fail and asserts the one-line error message.
#[macro_export]
macro_rules! invalid {
    ($toml:expr, @$snap:literal) => {{
        let arena = conftree::Arena::new();
        let error = match conftree::parse($toml, &arena) {
            Ok(table) => panic!("expected an error, parsed {table:?}"),
            Err(error) => error,
        };
        insta::assert_snapshot!(error.to_string(), @$snap);
    }};
}

pub type File<'s> = codespan_reporting::files::SimpleFile<&'static str, &'s str>;

pub fn emit_diags(
    f: &File<'_>,
    error: impl IntoIterator<Item = Diagnostic<()>>,
) -> String {
    let mut output = codespan_reporting::term::termcolor::NoColor::new(Vec::new());

    for diag in error {
        codespan_reporting::term::emit_to_write_style(
            &mut output,
            &codespan_reporting::term::Config::default(),
            f,
            &diag,
        )
        .expect("writing to a Vec cannot fail");
    }

    String::from_utf8(output.into_inner()).expect("diagnostics are UTF-8")
}

/// Renders the error a document fails with as a codespan diagnostic.
pub fn render_error(name: &'static str, toml: &str) -> String {
    let arena = conftree::Arena::new();
    let error = match conftree::parse(toml, &arena) {
        Ok(table) => panic!("expected an error, parsed {table:?}"),
        Err(error) => error,
    };
    let file = File::new(name, toml);
    emit_diags(&file, Some(error.to_diagnostic(())))
}

/// Lists every key of a document as `path type @ source-text`, one per line.
pub fn key_spans(table: &Table<'_>, source: &str) -> String {
    let mut out = String::new();
    collect_keys("", table, source, &mut out);
    out.truncate(out.trim_end().len());
    out
}

fn collect_keys(prefix: &str, table: &Table<'_>, source: &str, out: &mut String) {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.name.to_owned()
        } else {
            format!("{prefix}.{}", key.name)
        };
        let (line, column) = conftree::locate(source, key.span.start as usize);
        let _ = writeln!(
            out,
            "{path} {} @ {line}:{column} {:?}",
            value.type_str(),
            key.span.slice(source)
        );
        if let Value::Table(sub) = value {
            collect_keys(&path, sub, source, out);
        }
    }
}
