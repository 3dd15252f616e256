//! Linearisation of rule left-hand sides into matching primitives.

use crate::rule::Error;
use crate::{Arity, Miller, Rule, Symbol, Term, TermC};
use alloc::{string::String, vec::Vec};
use core::fmt::{self, Display};

/// Matching primitive.
///
/// Primitives act on a *focus* that walks over the arguments of
/// the left-hand side in pre-order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Prim<'s> {
    /// bind the focus to a variable (first occurrence)
    S(Miller),
    /// compare the focus with a previously bound variable
    M(Miller),
    /// test whether the focus is a symbol applied to the given number of arguments
    F(Symbol<'s>, Arity),
    /// move the focus to the next position, leaving exhausted argument lists
    N,
    /// move the focus to the first argument of the focus
    D,
}

/// Result of a linear sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Leaf<'s> {
    /// unconditional result with its free variables
    Re(Term<'s>, Vec<Miller>),
    /// conditional result with the free variables of condition and result
    CRe(Term<'s>, Term<'s>, Vec<Miller>, Vec<Miller>),
}

/// Linear sequence of primitives that matches the left-hand side of a rule.
#[derive(Clone, Debug)]
pub struct Sequence<'s> {
    /// names of the rule variables
    pub ctx: Vec<String>,
    pub prims: Vec<Prim<'s>>,
    pub leaf: Leaf<'s>,
}

/// Linearise a rule.
///
/// The head of the left-hand side is not part of the sequence,
/// because it is known from the symbol that a rule is compiled for.
/// Every application pattern `g t1 .. tn` becomes `F(g, n)`,
/// followed by `D` and the linearised `t1 .. tn` if `n > 0`.
/// A variable becomes `S` on its first occurrence and `M` afterwards.
/// Consecutive patterns are separated by `N`.
pub fn linearize<'s>(rule: &Rule<'s>) -> Result<Sequence<'s>, Error> {
    if rule.symbol().is_none() {
        return Err(Error::NoTopSymbol);
    }
    let mut lin = Linearizer::default();
    for (i, arg) in rule.lhs.args().iter().enumerate() {
        if i > 0 {
            lin.prims.push(Prim::N)
        }
        lin.pattern(arg)?
    }
    let leaf = match &rule.cond {
        None => Leaf::Re(rule.rhs.clone(), rule.rhs.vars()),
        Some(cond) => Leaf::CRe(cond.clone(), rule.rhs.clone(), cond.vars(), rule.rhs.vars()),
    };
    let ctx = rule.ctx.clone();
    let prims = lin.prims;
    Ok(Sequence { ctx, prims, leaf })
}

#[derive(Default)]
struct Linearizer<'s> {
    prims: Vec<Prim<'s>>,
    seen: Vec<Miller>,
}

impl<'s> Linearizer<'s> {
    fn pattern(&mut self, pat: &Term<'s>) -> Result<(), Error> {
        match &**pat {
            TermC::Var(v) if self.seen.contains(v) => self.prims.push(Prim::M(*v)),
            TermC::Var(v) => {
                self.seen.push(*v);
                self.prims.push(Prim::S(*v))
            }
            TermC::Symb(s) => self.prims.push(Prim::F(*s, 0)),
            TermC::Appl(head, args) => {
                let s = head.symbol().ok_or(Error::VarHead)?;
                self.prims.push(Prim::F(s, args.len()));
                self.prims.push(Prim::D);
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.prims.push(Prim::N)
                    }
                    self.pattern(arg)?
                }
            }
        }
        Ok(())
    }
}

impl<'s> Display for Sequence<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = |v: &Miller| self.ctx.get(*v).map_or("_", |x| x.as_str());
        write!(f, "[")?;
        for (i, prim) in self.prims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match prim {
                Prim::S(v) => write!(f, "S({})", name(v))?,
                Prim::M(v) => write!(f, "M({})", name(v))?,
                Prim::F(s, _) => write!(f, "F({})", s)?,
                Prim::N => write!(f, "N")?,
                Prim::D => write!(f, "D")?,
            }
        }
        write!(f, "] -> ")?;
        match &self.leaf {
            Leaf::Re(rhs, _) => write!(f, "Re({})", rhs.display(&self.ctx)),
            Leaf::CRe(cond, rhs, _, _) => {
                let (cond, rhs) = (cond.display(&self.ctx), rhs.display(&self.ctx));
                write!(f, "CRe({}, {})", cond, rhs)
            }
        }
    }
}
