//! Execution of match trees and strategies on concrete terms.

use crate::nfs::MAX_ARITY;
use crate::strategy::Step;
use crate::tree::{Node, Template, Tree};
use crate::{Compiler, Nfs, Strategy, Symbol, Term, Terms};
use alloc::vec::Vec;
use fnv::FnvHashMap;

/// Template found by a match tree, together with the terms bound by the tree.
#[derive(Clone, Debug)]
pub struct Match<'t, 's> {
    pub template: &'t Template<'s>,
    pub binds: Vec<Term<'s>>,
}

impl<'t, 's> Match<'t, 's> {
    /// Replace the variables of the template by the terms bound to them.
    pub fn instantiate(&self, terms: &mut Terms<'s>) -> Term<'s> {
        let tpl = self.template;
        terms.subst(&tpl.term, &|v| tpl.slot(v).map(|s| self.binds[s].clone()))
    }
}

/// Positions of the arguments being walked over.
///
/// Every entry is a list of terms and the index of the current term in the list.
/// The last entry contains the focus.
type Positions<'a, 's> = Vec<(&'a [Term<'s>], usize)>;

fn focus<'a, 's>(pos: &Positions<'a, 's>) -> &'a Term<'s> {
    let (list, i) = pos[pos.len() - 1];
    &list[i]
}

/// Move the focus to the next position in pre-order,
/// leaving argument lists that have been completely visited.
fn advance<'a, 's>(pos: &mut Positions<'a, 's>) {
    while let Some((list, i)) = pos.pop() {
        if i + 1 < list.len() || pos.is_empty() {
            pos.push((list, i + 1));
            return;
        }
    }
}

impl<'s> Tree<'s> {
    /// Find the first rule that matches the arguments.
    ///
    /// The result of a conditional rule is returned only if
    /// `holds` returns true for its instantiated condition.
    pub fn find<'t, F>(&'t self, args: &[Term<'s>], mut holds: F) -> Option<Match<'t, 's>>
    where
        F: FnMut(&Match<'t, 's>) -> bool,
    {
        let mut pos: Positions = Vec::from([(args, 0)]);
        let mut binds: Vec<Term<'s>> = Vec::new();
        let mut tree = self;
        loop {
            tree = match &**tree {
                Node::S(slot, next) => {
                    assert_eq!(*slot, binds.len());
                    binds.push(focus(&pos).clone());
                    next
                }
                Node::M(slot, t, f) => {
                    if binds[*slot] == *focus(&pos) {
                        t
                    } else {
                        f
                    }
                }
                Node::F(sym, arity, t, f) => {
                    let fc = focus(&pos);
                    if fc.symbol() == Some(*sym) && fc.args().len() == *arity {
                        t
                    } else {
                        f
                    }
                }
                Node::N(tree) => {
                    advance(&mut pos);
                    tree
                }
                Node::D(tree) => {
                    pos.push((focus(&pos).args(), 0));
                    tree
                }
                Node::C(cond, result, tree) => {
                    let cond = Match { template: cond, binds: binds.clone() };
                    if holds(&cond) {
                        return Some(Match { template: result, binds });
                    }
                    tree
                }
                Node::R(result) => return Some(Match { template: result, binds }),
                Node::X => return None,
            }
        }
    }
}

/// Evaluation of terms with the compiled rules of a signature.
///
/// The normal form of every term normalised by the rewriter,
/// including subterms and conditions, is kept until the rewriter is dropped.
/// To release this memory, for example between unrelated evaluations,
/// create a new rewriter from [`Rewriter::into_compiler`].
///
/// ~~~
/// # use kompile::{Compiler, Rewriter, Spec};
/// let src = r"
///     nat : type.
///     zero : nat.
///     succ : nat -> nat.
///     plus : nat -> nat -> nat.
///     [y] plus zero y --> y.
///     [x, y] plus (succ x) y --> succ (plus x y).
///     #EVAL plus (succ zero) (succ zero).
/// ";
/// let mut spec = Spec::parse(src)?;
/// let compiler = Compiler::new(&spec.sig, true);
/// let mut rw = Rewriter::new(compiler, spec.truth(), &mut spec.terms);
/// let nf = rw.normalize(&spec.evals[0], &mut spec.terms);
/// assert_eq!(nf.to_string(), "(succ (succ zero))");
/// # Ok::<_, kompile::Error>(())
/// ~~~
pub struct Rewriter<'s, 'g> {
    pub compiler: Compiler<'s, 'g>,
    /// term that conditions have to evaluate to
    truth: Option<Term<'s>>,
    /// normal forms computed so far
    nfs: FnvHashMap<Term<'s>, Term<'s>>,
}

impl<'s, 'g> Rewriter<'s, 'g> {
    pub fn new(compiler: Compiler<'s, 'g>, truth: Option<Symbol<'s>>, terms: &mut Terms<'s>) -> Self {
        let truth = truth.map(|t| terms.symb(t));
        let nfs = Default::default();
        Self { compiler, truth, nfs }
    }

    /// Return the compiler, dropping all cached normal forms.
    pub fn into_compiler(self) -> Compiler<'s, 'g> {
        self.compiler
    }

    /// Return the number of cached normal forms.
    pub fn cached(&self) -> usize {
        self.nfs.len()
    }

    /// Rewrite a term once at the top.
    ///
    /// Arguments are normalised if the strategy asks for it,
    /// but the result of the rewrite step is not normalised.
    /// Return `None` if no rule applies.
    pub fn step(&mut self, tm: &Term<'s>, terms: &mut Terms<'s>) -> Option<Term<'s>> {
        self.step_with(tm, Nfs::empty(), terms)
    }

    /// Rewrite a term once at the top,
    /// knowing that the arguments in `nfs` are in normal form.
    pub fn step_with(&mut self, tm: &Term<'s>, nfs: Nfs, terms: &mut Terms<'s>) -> Option<Term<'s>> {
        let sym = tm.symbol()?;
        let mut args = tm.args().to_vec();
        if args.len() > MAX_ARITY {
            return None;
        }
        let compiled = self.compiler.compile(sym, args.len(), nfs, terms);
        let mut forced = nfs;
        self.run(&compiled.strategy, &mut args, &mut forced, terms)
    }

    /// Execute a strategy, normalising forced arguments in place.
    fn run(
        &mut self,
        strategy: &Strategy<'s>,
        args: &mut [Term<'s>],
        forced: &mut Nfs,
        terms: &mut Terms<'s>,
    ) -> Option<Term<'s>> {
        for step in strategy.steps() {
            match step {
                Step::Force(i) => {
                    args[*i] = self.normalize(&args[*i], terms);
                    forced.set(*i)
                }
                Step::Apply(batch) => {
                    let found = batch.tree.find(args, |cond| self.holds(cond, terms));
                    if let Some(m) = found {
                        return Some(m.instantiate(terms));
                    }
                }
            }
        }
        None
    }

    fn holds(&mut self, cond: &Match<'_, 's>, terms: &mut Terms<'s>) -> bool {
        let cond = cond.instantiate(terms);
        let nf = self.normalize(&cond, terms);
        trace!("Condition {} evaluates to {}", cond, nf);
        Some(nf) == self.truth
    }

    /// Return the normal form of a term.
    ///
    /// Arguments that every rule needs in normal form are normalised first.
    /// If no rule applies, the remaining arguments are normalised.
    pub fn normalize(&mut self, tm: &Term<'s>, terms: &mut Terms<'s>) -> Term<'s> {
        if let Some(nf) = self.nfs.get(tm) {
            return nf.clone();
        }
        let nf = self.normalize_uncached(tm, terms);
        self.nfs.insert(tm.clone(), nf.clone());
        nf
    }

    fn normalize_uncached(&mut self, tm: &Term<'s>, terms: &mut Terms<'s>) -> Term<'s> {
        let sym = match tm.symbol() {
            Some(sym) => sym,
            None => return tm.clone(),
        };
        let mut args = tm.args().to_vec();
        let arity = args.len();

        let mut forced = Nfs::empty();
        if arity <= MAX_ARITY {
            let base = self.compiler.verdicts().base(sym, arity);
            for i in base.iter() {
                args[i] = self.normalize(&args[i], terms);
            }
            forced = base;

            let compiled = self.compiler.compile(sym, arity, base, terms);
            if let Some(rhs) = self.run(&compiled.strategy, &mut args, &mut forced, terms) {
                trace!("Rewrite {} to {}", tm, rhs);
                return self.normalize(&rhs, terms);
            }
        }

        for (i, arg) in args.iter_mut().enumerate() {
            if !forced.get(i) {
                *arg = self.normalize(arg, terms)
            }
        }
        terms.apply(tm.head().clone(), args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Spec;

    #[test]
    fn cache() {
        let src = r"
            nat : type.
            zero : nat.
            succ : nat -> nat.
            double : nat -> nat.
            [] double zero --> zero.
            [x] double (succ x) --> succ (succ (double x)).
            #EVAL double (succ (succ zero)).
        ";
        let mut spec = Spec::parse(src).unwrap();
        let tm = spec.evals[0].clone();
        let compiler = Compiler::new(&spec.sig, true);
        let mut rw = Rewriter::new(compiler, spec.truth(), &mut spec.terms);

        let nf = rw.normalize(&tm, &mut spec.terms);
        let (cached, terms) = (rw.cached(), spec.terms.len());
        assert!(cached > 1);

        // the second normalisation is answered from the cache
        assert!(rw.normalize(&tm, &mut spec.terms) == nf);
        assert_eq!((rw.cached(), spec.terms.len()), (cached, terms));

        let compiler = rw.into_compiler();
        let rw = Rewriter::new(compiler, spec.truth(), &mut spec.terms);
        assert_eq!(rw.cached(), 0);
    }
}
