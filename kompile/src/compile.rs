//! Compilation of the rules of a signature, with caching.

use crate::build::build_tree;
use crate::strategy::{prepare, Prepared};
use crate::tree::{Tree, Trees};
use crate::{Arity, Nfs, Signature, Strategy, Symbol, Terms, Verdicts};
use alloc::{rc::Rc, vec::Vec};
use fnv::FnvHashMap;

/// Match tree and strategy for a symbol applied to a number of arguments.
#[derive(Debug)]
pub struct Compiled<'s> {
    /// tree that finds the first applicable rule among all rules
    pub tree: Tree<'s>,
    pub strategy: Strategy<'s>,
}

/// Compilation context for a signature.
///
/// All compiled artefacts are created on demand and kept for the lifetime of the compiler,
/// so asking twice for the same artefact yields the same object.
///
/// ~~~
/// # use kompile::{Compiler, Nfs, Spec};
/// let src = r"
///     nat : type.
///     zero : nat.
///     succ : nat -> nat.
///     pred : nat -> nat.
///     [] pred zero --> zero.
///     [x] pred (succ x) --> x.
/// ";
/// let mut spec = Spec::parse(src)?;
/// let pred = spec.syms.get("pred").unwrap();
/// let mut compiler = Compiler::new(&spec.sig, true);
/// let c1 = compiler.compile(pred, 1, Nfs::empty(), &mut spec.terms);
/// let c2 = compiler.compile(pred, 1, Nfs::empty(), &mut spec.terms);
/// assert!(std::rc::Rc::ptr_eq(&c1, &c2));
/// assert_eq!(c1.strategy.forced(), Nfs::empty().with(0));
/// # Ok::<_, kompile::Error>(())
/// ~~~
pub struct Compiler<'s, 'g> {
    sig: &'g Signature<'s>,
    verdicts: Verdicts<'s>,
    trees: Trees<'s>,
    prepared: FnvHashMap<(Symbol<'s>, Arity), Rc<Vec<Prepared<'s>>>>,
    compiled: FnvHashMap<(Symbol<'s>, Arity, Nfs), Rc<Compiled<'s>>>,
}

impl<'s, 'g> Compiler<'s, 'g> {
    /// Create a compiler for a signature.
    ///
    /// If `nfs` is set, the signature is analysed to find
    /// arguments that can be normalised before any rule is tried.
    pub fn new(sig: &'g Signature<'s>, nfs: bool) -> Self {
        let verdicts = if nfs {
            Verdicts::analyze(sig)
        } else {
            Verdicts::default()
        };
        Self {
            sig,
            verdicts,
            trees: Trees::new(),
            prepared: Default::default(),
            compiled: Default::default(),
        }
    }

    pub fn verdicts(&self) -> &Verdicts<'s> {
        &self.verdicts
    }

    /// Return the number of distinct match tree nodes created so far.
    pub fn nodes(&self) -> usize {
        self.trees.len()
    }

    /// Return the rules of a symbol prepared for the given arity.
    pub fn prepare(
        &mut self,
        sym: Symbol<'s>,
        arity: Arity,
        terms: &mut Terms<'s>,
    ) -> Rc<Vec<Prepared<'s>>> {
        if let Some(prepared) = self.prepared.get(&(sym, arity)) {
            return prepared.clone();
        }
        let full = self.sig.arity(&sym).unwrap_or(0);
        let rules = self.sig.rules(&sym);
        let prepared = Rc::new(prepare(sym, rules, arity, full, &self.verdicts, terms));
        self.prepared.insert((sym, arity), prepared.clone());
        prepared
    }

    /// Return the match tree for all rules of a symbol applied to `arity` arguments.
    pub fn tree(&mut self, sym: Symbol<'s>, arity: Arity, terms: &mut Terms<'s>) -> Tree<'s> {
        self.compile(sym, arity, Nfs::empty(), terms).tree.clone()
    }

    /// Return the match tree and strategy for a symbol applied to `arity` arguments,
    /// of which the arguments in `nfs` are known to be in normal form.
    pub fn compile(
        &mut self,
        sym: Symbol<'s>,
        arity: Arity,
        nfs: Nfs,
        terms: &mut Terms<'s>,
    ) -> Rc<Compiled<'s>> {
        let nfs = nfs.intersect(Nfs::full(arity));
        if let Some(compiled) = self.compiled.get(&(sym, arity, nfs)) {
            return compiled.clone();
        }
        let prepared = self.prepare(sym, arity, terms);
        let seqs: Vec<_> = prepared.iter().map(|r| (r.index, &r.seq)).collect();
        let tree = build_tree(&seqs, arity, &mut self.trees);
        let strategy = Strategy::generate(&prepared, arity, nfs, &mut self.trees);
        debug!("Compiled {}/{} with normal forms {}", sym, arity, nfs);
        let compiled = Rc::new(Compiled { tree, strategy });
        self.compiled.insert((sym, arity, nfs), compiled.clone());
        compiled
    }
}
