//! # regal-query
//!
//! Recommendation query language for RegalDB.
//!
//! - [`ast::Term`]       — Final / Intersection / Union parse tree
//! - [`parser::parse`]   — recursive-descent parser, case-insensitive keywords
//! - [`executor::Plan`]  — compiled evaluation plan over a catalog graph
//! - [`executor::recommend`] — parse-tree-to-product-set driver

pub mod ast;
pub mod error;
pub mod executor;
pub mod parser;

pub use ast::{Final, Strategy, Term};
pub use error::ParseError;
pub use executor::{recommend, Plan, StrategyWithId};
pub use parser::parse;
