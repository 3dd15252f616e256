#![no_std]
#![forbid(unsafe_code)]

//! Compilation of conditional rewrite rules to match trees and evaluation strategies.
//!
//! # Usage
//!
//! A rewriting session starts from a [`Spec`],
//! consisting of a [`Symbols`] table, a [`Signature`] that records
//! the full arity and the rewrite rules of every symbol, and
//! a [`Terms`] store that creates every term at most once.
//! A [`Compiler`] then turns the rules of a symbol applied to a number of arguments into
//! a match tree that finds the first applicable rule, and
//! a strategy that decides which arguments to normalise before matching.
//! Finally, a [`Rewriter`] uses compiled strategies to evaluate terms.
//!
//! ~~~
//! # use kompile::{Compiler, Nfs, Rewriter, Spec};
//! let src = r"
//!     b : type.
//!     true : b.
//!     false : b.
//!     nat : type.
//!     zero : nat.
//!     succ : nat -> nat.
//!     le : nat -> nat -> b.
//!     max : nat -> nat -> nat.
//!
//!     [y] le zero y --> true.
//!     [x] le (succ x) zero --> false.
//!     [x, y] le (succ x) (succ y) --> le x y.
//!
//!     [x, y] max x y --> y when le x y.
//!     [x, y] max x y --> x.
//!
//!     #EVAL max (succ (succ zero)) (succ zero).
//! ";
//! let mut spec = Spec::parse(src)?;
//! let max = spec.syms.get("max").unwrap();
//!
//! let mut compiler = Compiler::new(&spec.sig, true);
//! let tree = compiler.tree(max, 2, &mut spec.terms);
//! assert_eq!(tree.to_string(), "S($0)\nN\nS($1)\nC((le $0 $1)) -> $1\nR($0)\n");
//!
//! let mut rw = Rewriter::new(compiler, spec.truth(), &mut spec.terms);
//! let nf = rw.normalize(&spec.evals[0], &mut spec.terms);
//! assert_eq!(nf.to_string(), "(succ (succ zero))");
//! # Ok::<_, kompile::Error>(())
//! ~~~
//!
//! # Organisation
//!
//! The compilation of rules proceeds in several stages:
//! * The [`linear`] module turns the left-hand side of every rule into
//!   a sequence of primitive matching instructions.
//! * The [`analyze`] module determines for every argument position
//!   whether its normal form is eventually needed anyway.
//! * The [`build`] module merges the sequences of several rules into a match [`Tree`].
//! * The [`strategy`] module decides in which order to normalise arguments
//!   and which rules to try after every normalisation.

extern crate alloc;
#[macro_use]
extern crate log;

pub mod analyze;
pub mod arexpr;
pub mod build;
mod compile;
pub mod error;
mod exec;
pub mod linear;
mod nfs;
pub mod rule;
pub mod scope;
pub mod signature;
mod spec;
pub mod strategy;
mod symbol;
pub mod symbols;
mod term;
pub mod tree;

pub use analyze::Verdicts;
pub use arexpr::ArExpr;
pub use compile::{Compiled, Compiler};
pub use error::Error;
pub use exec::{Match, Rewriter};
pub use linear::{Leaf, Prim, Sequence};
pub use nfs::{Nfs, MAX_ARITY};
pub use rule::Rule;
pub use signature::Signature;
pub use spec::Spec;
pub use strategy::{Batch, Step, Strategy};
pub use symbol::Symbol;
pub use symbols::Symbols;
pub use term::{Arity, Miller, Term, TermC, Terms};
pub use tree::{Node, Slot, Template, Tree, Trees};
