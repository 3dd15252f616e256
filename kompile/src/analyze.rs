//! Analysis of which arguments must always be normalised before rewriting.
//!
//! For every symbol `f`, arity `a` and argument position `i`,
//! we compute whether rewriting `f` applied to `a` arguments
//! eventually requires the `i`-th argument in normal form.
//! If so, the argument can be normalised right away,
//! before any rule is tried.

use crate::arexpr::{ArExpr, ArgRef};
use crate::{Arity, Miller, Nfs, Rule, Signature, Symbol, Term, TermC};
use alloc::vec::Vec;
use fnv::FnvHashMap;

/// Must-force verdicts for argument positions.
///
/// Positions that were never analysed may be skipped.
#[derive(Clone, Debug, Default)]
pub struct Verdicts<'s>(FnvHashMap<ArgRef<'s>, bool>);

impl<'s> Verdicts<'s> {
    /// Compute the least verdicts consistent with the rules of the signature.
    ///
    /// All positions start as "may skip".
    /// Every round evaluates the expressions of the positions not yet known
    /// to be must-force, until no further position becomes must-force.
    pub fn analyze(sig: &Signature<'s>) -> Self {
        let exprs = exprs(sig);
        let mut verdicts: Self = Self(exprs.iter().map(|(r, _)| (*r, false)).collect());

        let mut rounds = 0;
        loop {
            rounds += 1;
            let mut changed = false;
            for (r, e) in exprs.iter() {
                if !verdicts.0[r] && e.eval(&|r| verdicts.get(r)) {
                    verdicts.0.insert(*r, true);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        debug!("NFS analysis of {} positions: {} rounds", exprs.len(), rounds);
        verdicts
    }

    fn get(&self, r: &ArgRef<'s>) -> bool {
        self.0.get(r).copied().unwrap_or(false)
    }

    /// Return true if argument `i` of `sym` applied to `arity` arguments must be forced.
    pub fn must_force(&self, sym: Symbol<'s>, arity: Arity, i: usize) -> bool {
        self.get(&(sym, arity, i))
    }

    /// Return the positions that must be forced for `sym` applied to `arity` arguments.
    pub fn base(&self, sym: Symbol<'s>, arity: Arity) -> Nfs {
        let forced = (0..arity).filter(|i| self.must_force(sym, arity, *i));
        forced.fold(Nfs::empty(), Nfs::with)
    }
}

/// Return the expression of every argument position of every symbol in the signature.
pub fn exprs<'s>(sig: &Signature<'s>) -> Vec<(ArgRef<'s>, ArExpr<'s>)> {
    let mut exprs = Vec::new();
    for sym in sig.symbols() {
        let full = sig.arity(&sym).unwrap_or(0);
        for arity in 1..=full {
            for i in 0..arity {
                exprs.push(((sym, arity, i), expr(sig, sym, arity, i)))
            }
        }
    }
    exprs
}

/// Return the expression that determines whether
/// argument `i` of `sym` applied to `arity` arguments must be forced.
///
/// This is the conjunction of the expressions for the single rules,
/// meaning that a symbol without rules forces all its arguments.
pub fn expr<'s>(sig: &Signature<'s>, sym: Symbol<'s>, arity: Arity, i: usize) -> ArExpr<'s> {
    let rules = sig.rules(&sym).iter();
    rules.fold(ArExpr::True, |acc, rule| acc.and(rule_expr(sig, rule, arity, i)))
}

fn rule_expr<'s>(sig: &Signature<'s>, rule: &Rule<'s>, arity: Arity, i: usize) -> ArExpr<'s> {
    let r = rule.arity();
    if r > arity {
        // the rule never applies at this arity
        return ArExpr::True;
    }
    if i >= r {
        // the argument is passed on to the head of the right-hand side
        return match rule.rhs.symbol() {
            Some(h) => {
                let k = rule.rhs.args().len();
                var(sig, h, k + arity - r, k + i - r)
            }
            None => ArExpr::False,
        };
    }
    let x = match rule.lhs.args()[i].get_var() {
        None => return ArExpr::True,
        Some(x) => x,
    };
    if rule.dep_vars().contains(&x) {
        return ArExpr::True;
    }
    usage(sig, &rule.rhs, x)
}

/// Reference to an argument position, or false if the position does not exist.
fn var<'s>(sig: &Signature<'s>, h: Symbol<'s>, arity: Arity, i: usize) -> ArExpr<'s> {
    match sig.arity(&h) {
        Some(full) if arity <= full => ArExpr::var((h, arity, i)),
        _ => ArExpr::False,
    }
}

/// Condition under which the evaluation of `tm` normalises the variable `x`.
fn usage<'s>(sig: &Signature<'s>, tm: &Term<'s>, x: Miller) -> ArExpr<'s> {
    match &**tm {
        TermC::Var(y) => (*y == x).into(),
        TermC::Symb(_) => ArExpr::False,
        TermC::Appl(head, args) => match &**head {
            TermC::Var(y) => (*y == x).into(),
            TermC::Symb(h) => {
                let k = args.len();
                let uses = args.iter().enumerate().map(|(j, b)| (j, usage(sig, b, x)));
                uses.fold(ArExpr::False, |acc, (j, u)| {
                    // skip the position lookup when the argument does not use `x`
                    match u {
                        ArExpr::False => acc,
                        u => acc.or(var(sig, *h, k, j).and(u)),
                    }
                })
            }
            TermC::Appl(..) => unreachable!("application in head position"),
        },
    }
}

impl<'s> From<bool> for ArExpr<'s> {
    fn from(b: bool) -> Self {
        if b {
            Self::True
        } else {
            Self::False
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Spec;

    #[test]
    fn plus() {
        let src = r"
            nat : type.
            zero : nat.
            succ : nat -> nat.
            plus : nat -> nat -> nat.
            [y] plus zero y --> y.
            [x, y] plus (succ x) y --> succ (plus x y).
        ";
        let spec = Spec::parse(src).unwrap();
        let verdicts = Verdicts::analyze(&spec.sig);
        let (plus, succ) = (spec.syms.get("plus").unwrap(), spec.syms.get("succ").unwrap());

        // the first argument is matched against constructors
        assert!(verdicts.must_force(plus, 2, 0));
        // the second argument is only needed by the recursive call
        assert!(!verdicts.must_force(plus, 2, 1));
        // constructors force all their arguments
        assert!(verdicts.must_force(succ, 1, 0));
        assert_eq!(verdicts.base(plus, 2), Nfs::empty().with(0));
        // no rule applies to a single argument
        assert!(verdicts.must_force(plus, 1, 0));
    }

    #[test]
    fn lazy() {
        let src = r"
            b : type.
            t : b.
            ite : b -> b -> b -> b.
            [x, y] ite t x y --> x.
        ";
        let spec = Spec::parse(src).unwrap();
        let verdicts = Verdicts::analyze(&spec.sig);
        let ite = spec.syms.get("ite").unwrap();
        // the condition is a pattern, the branches are returned unevaluated
        assert!(verdicts.must_force(ite, 3, 0));
        assert!(verdicts.must_force(ite, 3, 1));
        assert!(!verdicts.must_force(ite, 3, 2));
    }

    #[test]
    fn cycle() {
        let src = r"
            a : type.
            f : a -> a.
            g : a -> a.
            [x] f x --> g x.
            [x] g x --> f x.
        ";
        let spec = Spec::parse(src).unwrap();
        let verdicts = Verdicts::analyze(&spec.sig);
        let (f, g) = (spec.syms.get("f").unwrap(), spec.syms.get("g").unwrap());
        assert!(!verdicts.must_force(f, 1, 0));
        assert!(!verdicts.must_force(g, 1, 0));
        assert_eq!(
            expr(&spec.sig, f, 1, 0),
            ArExpr::var((g, 1, 0)),
            "argument is passed to g"
        );
    }
}
