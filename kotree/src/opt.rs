use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Intermediate result of compilation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// linear sequences of matching primitives, one per rule
    Sequences,
    /// match trees of all rules of a symbol
    Trees,
    /// normalisation strategies
    Strategies,
    /// arguments that are always normalised before rewriting
    Nfs,
}

#[derive(Clone, Debug, Parser)]
/// Compile rewrite rules to match trees and evaluate terms
pub struct Opt {
    /// Print intermediate results of compilation (cumulative)
    #[arg(long, value_name = "WHAT", value_enum)]
    pub emit: Vec<Emit>,

    /// Do not evaluate terms
    #[arg(long)]
    pub no_eval: bool,

    /// Do not analyse which arguments are always normalised
    ///
    /// When this flag is enabled,
    /// arguments are only normalised when a rule pattern inspects them.
    #[arg(long)]
    pub no_nfs: bool,

    /// Process files concurrently
    ///
    /// If this option is given with a number n, then
    /// maximally n files are concurrently processed.
    /// If this option is given without an extra argument, then
    /// the number of concurrently processed files is
    /// determined automatically from the number of CPUs.
    #[arg(long, short = 'j')]
    pub jobs: Option<Option<usize>>,

    /// Files to process
    ///
    /// Every file is processed independently,
    /// and terms are evaluated with all rules of their file.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

impl Opt {
    pub fn emits(&self, emit: Emit) -> bool {
        self.emit.contains(&emit)
    }
}
