//! An interactive arithmetic expression evaluator.
//!
//! Statements are read from a character stream and evaluated on the fly by a
//! recursive-descent grammar: `let` declarations, `;`-terminated expressions
//! built from `+ - * / %`, parentheses, unary sign, and named variables.
//! There is no syntax tree; each grammar production computes its numeric
//! value while parsing.
//!
//! # Examples
//!
//! See [`crate::session::Session`].
//!
//! # Limitations
//!
//! - Input is ASCII only; any other byte is reported as a bad token.
//! - Variables are declare-once: the grammar has no reassignment statement.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod eval;
pub mod session;
pub mod stream;
pub mod table;
pub mod token;
