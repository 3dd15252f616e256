//! Parser for conditional term rewriting specifications.
//!
//! A specification is a sequence of commands, each terminated by a dot:
//!
//! * `succ : Nat -> Nat.` declares a symbol together with its sort,
//! * `[x, y] plus (succ x) y --> succ (plus x y).` adds rewrite rules,
//!   optionally guarded by a condition (`... --> x when le y x.`),
//! * `#EVAL plus zero zero.` asks for the normal form of a term.
//!
//! Example usage:
//!
//! ~~~
//! use rewrite_parse::{CmdIter, Command, Error};
//!
//! let cmds = "Nat_id : Nat -> Nat. [x] Nat_id x --> x.";
//! let cmds = CmdIter::new(&cmds);
//! let cmds: Result<Vec<_>, _> = cmds.collect();
//! assert_eq!(cmds?.len(), 2);
//! # Ok::<_, Error>(())
//! ~~~
#![no_std]

extern crate alloc;

pub mod cmd;
mod cmditer;
pub mod lex;
pub mod sort;
pub mod term;

pub use cmd::{Command, Rule};
pub use cmditer::{CmdIter, Error};
pub use lex::Token;
pub use sort::Sort;
pub use term::Term;
