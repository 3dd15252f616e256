//! Evaluation strategies that interleave argument forcing and matching.

use crate::build::build_tree;
use crate::linear::Sequence;
use crate::tree::{Tree, Trees};
use crate::{Arity, Nfs, Rule, Symbol, Verdicts};
use alloc::{string::ToString, vec::Vec};
use core::fmt::{self, Display};

/// Rule prepared for a given arity.
#[derive(Clone, Debug)]
pub struct Prepared<'s> {
    /// position of the original rule among the rules of its symbol
    pub index: usize,
    /// rule lifted to the arity
    pub rule: Rule<'s>,
    pub seq: Sequence<'s>,
    /// arguments that have to be in normal form before the rule can be tried
    pub needs: Nfs,
}

impl<'s> Prepared<'s> {
    pub fn new(index: usize, rule: Rule<'s>, seq: Sequence<'s>, verdicts: &Verdicts<'s>) -> Self {
        let needs = needs(&rule, verdicts);
        Self { index, rule, seq, needs }
    }
}

/// Return the arguments that a rule needs in normal form.
///
/// These are the arguments whose pattern is not a variable,
/// whose variable is used in a way that demands a normal form (see [`Rule::dep_vars`]),
/// or that must always be forced according to the verdicts.
pub fn needs<'s>(rule: &Rule<'s>, verdicts: &Verdicts<'s>) -> Nfs {
    let (sym, arity) = match rule.symbol() {
        Some(sym) => (sym, rule.arity()),
        None => return Nfs::empty(),
    };
    let dep = rule.dep_vars();
    let args = rule.lhs.args().iter().enumerate();
    let needed = args.filter(|(i, pat)| match pat.get_var() {
        None => true,
        Some(v) => dep.contains(&v) || verdicts.must_force(sym, arity, *i),
    });
    needed.fold(Nfs::empty(), |acc, (i, _)| acc.with(i))
}

/// Rules whose match tree is tried at once.
#[derive(Clone, Debug)]
pub struct Batch<'s> {
    /// positions of the rules among the rules of their symbol
    pub rules: Vec<usize>,
    pub tree: Tree<'s>,
}

#[derive(Clone, Debug)]
pub enum Step<'s> {
    /// normalise the argument at the given position
    Force(usize),
    /// try to find a rule in the batch
    Apply(Batch<'s>),
}

/// Sequence of steps that rewrites an application of a symbol.
#[derive(Clone, Debug, Default)]
pub struct Strategy<'s>(pub Vec<Step<'s>>);

impl<'s> Strategy<'s> {
    /// Generate a strategy for rules prepared for the given arity,
    /// where the arguments in `initial` are known to be in normal form.
    ///
    /// Rules are tried as soon as all their needed arguments are forced and
    /// all rules before them have been tried.
    /// As long as some rules remain,
    /// we force the argument that is needed by most of them.
    pub fn generate(
        rules: &[Prepared<'s>],
        arity: Arity,
        initial: Nfs,
        trees: &mut Trees<'s>,
    ) -> Self {
        let mut forced = initial;
        let mut steps = Vec::new();
        let mut rest = rules;
        loop {
            let ready = rest.iter().take_while(|r| r.needs.is_subset(forced)).count();
            let (batch, pending) = rest.split_at(ready);
            if !batch.is_empty() {
                let seqs: Vec<_> = batch.iter().map(|r| (r.index, &r.seq)).collect();
                let tree = build_tree(&seqs, arity, trees);
                let rules = batch.iter().map(|r| r.index).collect();
                steps.push(Step::Apply(Batch { rules, tree }))
            }
            if pending.is_empty() {
                return Self(steps);
            }
            rest = pending;

            let count = |i: &usize| pending.iter().filter(|r| r.needs.get(*i)).count();
            let unforced = (0..arity).filter(|i| !forced.get(*i));
            let best = unforced.map(|i| (i, count(&i))).rev().max_by_key(|(_, n)| *n);
            match best {
                Some((i, n)) if n > 0 => {
                    forced.set(i);
                    steps.push(Step::Force(i))
                }
                _ => panic!("pending rules do not need any unforced argument"),
            }
        }
    }

    pub fn steps(&self) -> &[Step<'s>] {
        &self.0
    }

    /// Return the arguments that the strategy forces.
    pub fn forced(&self) -> Nfs {
        let forced = self.0.iter().filter_map(|step| match step {
            Step::Force(i) => Some(*i),
            Step::Apply(_) => None,
        });
        forced.fold(Nfs::empty(), Nfs::with)
    }
}

impl<'s> Display for Strategy<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for step in &self.0 {
            match step {
                Step::Force(i) => writeln!(f, "Force {}", i)?,
                Step::Apply(batch) => {
                    let rules = batch.rules.iter().map(|r| r.to_string());
                    writeln!(f, "Apply [{}]", rules.collect::<Vec<_>>().join(", "))?;
                    for line in batch.tree.to_string().lines() {
                        writeln!(f, "  {}", line)?
                    }
                }
            }
        }
        Ok(())
    }
}

/// Return a symbol's rules prepared for the given arity, together with their positions.
///
/// Rules that take more arguments are skipped, and
/// rules that take fewer arguments are lifted if possible.
pub fn prepare<'s>(
    sym: Symbol<'s>,
    rules: &[Rule<'s>],
    arity: Arity,
    full: Arity,
    verdicts: &Verdicts<'s>,
    terms: &mut crate::Terms<'s>,
) -> Vec<Prepared<'s>> {
    let mut prepared = Vec::new();
    for (index, rule) in rules.iter().enumerate() {
        if rule.arity() > arity {
            trace!("Skip rule for {}/{}: {}", sym, arity, rule);
            continue;
        }
        let rule = if rule.arity() < arity {
            match rule.lift(arity, full, terms) {
                Ok(lifted) => lifted,
                Err(e) => {
                    warn!("Drop rule for {}/{}: {} ({:?})", sym, arity, rule, e);
                    continue;
                }
            }
        } else {
            rule.clone()
        };
        match crate::linear::linearize(&rule) {
            Ok(seq) => prepared.push(Prepared::new(index, rule, seq, verdicts)),
            Err(e) => warn!("Drop rule for {}/{}: {} ({:?})", sym, arity, rule, e),
        }
    }
    prepared
}
