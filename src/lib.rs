//! A small parser for a TOML-like configuration format that reports precise
//! `line:column` errors.
//!
//! A document is a sequence of `key = value` assignments and `[section]`
//! headers. Values are strings, integers (decimal, `0x`, `0o`, `0b`), floats,
//! booleans, arrays and inline tables. Keys may be dotted (`a.b.c = 1`), which
//! creates the intermediate tables.
//!
//! Strings and key names are copied into a caller-supplied [`Arena`]; the
//! returned [`Table`] owns its nested tables and arrays and borrows string
//! data from the arena.
//!
//! # Examples
//!
//! ```
//! use conftree::{Arena, Error, Value};
//!
//! let content = r#"
//! name = "demo"
//! ports = [8080, 8081]
//!
//! [server]
//! limits = { conns = 0x400, timeout = 2.5 }
//! tls.enabled = true
//! "#;
//!
//! let arena = Arena::new();
//! let table = conftree::parse(content, &arena)?;
//!
//! assert_eq!(table.get("name").and_then(Value::as_str), Some("demo"));
//! let ports = table.get("ports").and_then(Value::as_array).unwrap();
//! assert_eq!(ports.len(), 2);
//!
//! let server = table.get("server").and_then(Value::as_table).unwrap();
//! let limits = server.get("limits").and_then(Value::as_table).unwrap();
//! assert_eq!(limits.get("conns").and_then(Value::as_integer), Some(1024));
//! let tls = server.get("tls").and_then(Value::as_table).unwrap();
//! assert_eq!(tls.get("enabled").and_then(Value::as_bool), Some(true));
//!
//! let err = conftree::parse("k = 1\nk = 2", &arena).unwrap_err();
//! assert_eq!(err.to_string(), "2:1: cannot redefine key 'k'");
//! # Ok::<(), Error>(())
//! ```
//!
//! # Features
//!
//! - `serde`: `serde::Serialize` for [`Value`], [`Table`], [`Array`] and [`Span`].
//! - `reporting`: [`Error::to_diagnostic`] for `codespan-reporting`.
//! - `tracing`: trace events from the parser.

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($tt:tt)*) => {
        ::tracing::trace!($($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

mod arena;
mod array;
mod cursor;
mod error;
mod parser;
mod report;
mod span;
mod table;
mod tokenizer;
mod value;

pub use arena::{Allocator, Arena, Heap};
pub use array::Array;
pub use error::{Error, ErrorKind};
pub use parser::{MAX_NESTING, parse, parse_bytes};
pub use report::{locate, write_diagnostic};
pub use span::Span;
pub use table::Table;
pub use value::{Key, Value};
