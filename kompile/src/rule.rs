//! Conditional rewrite rules.

use crate::{Arity, Miller, Symbol, Term, TermC, Terms};
use alloc::{format, string::String, vec::Vec};
use core::fmt::{self, Display};

/// Conditional rewrite rule `lhs --> rhs when cond`.
///
/// Variables are referred to by their position in `ctx`.
#[derive(Clone, Debug)]
pub struct Rule<'s> {
    /// context (names of bound variables)
    pub ctx: Vec<String>,
    /// left-hand side (pattern to match with)
    pub lhs: Term<'s>,
    /// right-hand side (term to replace with)
    pub rhs: Term<'s>,
    /// condition, where `None` stands for `true`
    pub cond: Option<Term<'s>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// the left-hand side is not headed by a function symbol
    NoTopSymbol,
    /// a pattern inside the left-hand side is headed by a variable
    VarHead,
    /// a variable of the right-hand side or condition is not bound by the left-hand side
    UnboundVariable(String),
    /// the rule cannot be lifted beyond the full arity of its symbol
    Lift { arity: Arity, full: Arity },
}

impl<'s> Rule<'s> {
    /// Return the symbol at the head of the left-hand side.
    pub fn symbol(&self) -> Option<Symbol<'s>> {
        self.lhs.symbol()
    }

    /// Number of arguments the left-hand side head is applied to.
    pub fn arity(&self) -> Arity {
        self.lhs.args().len()
    }

    /// Return the name of a variable.
    pub fn var_name(&self, v: Miller) -> &str {
        self.ctx.get(v).map(|s| s.as_str()).unwrap_or("_")
    }

    /// Verify that the rule can be compiled, returning its head symbol.
    ///
    /// Patterns must be headed by symbols, and
    /// all variables of the right-hand side and condition
    /// must be bound by the left-hand side.
    pub fn check(&self) -> Result<Symbol<'s>, Error> {
        let symbol = self.symbol().ok_or(Error::NoTopSymbol)?;
        self.lhs.args().iter().try_for_each(check_pattern)?;

        let bound = self.lhs.vars();
        let used = self.rhs.vars().into_iter().chain(self.cond.iter().flat_map(|c| c.vars()));
        for v in used {
            if !bound.contains(&v) {
                return Err(Error::UnboundVariable(self.var_name(v).into()));
            }
        }
        Ok(symbol)
    }

    /// Variables at argument positions whose later use demands a normal form.
    ///
    /// These are variables that occur more than once in the left-hand side,
    /// occur in the condition, or occur more than once in the right-hand side.
    pub fn dep_vars(&self) -> Vec<Miller> {
        let args = self.lhs.args().iter();
        let top = args.filter_map(|arg| arg.get_var());
        let in_cond = |v| self.cond.iter().any(|c| c.occurrences(v) > 0);
        let is_dep = |v| self.lhs.occurrences(v) > 1 || in_cond(v) || self.rhs.occurrences(v) > 1;
        let mut dep = Vec::new();
        for v in top {
            if !dep.contains(&v) && is_dep(v) {
                dep.push(v)
            }
        }
        dep
    }

    /// Extend the rule to take more arguments by eta-expansion.
    ///
    /// Fresh variables are appended to both sides,
    /// as long as the new arity does not exceed the full arity of the symbol.
    pub fn lift(&self, arity: Arity, full: Arity, terms: &mut Terms<'s>) -> Result<Self, Error> {
        assert!(self.arity() <= arity);
        if arity > full {
            return Err(Error::Lift { arity, full });
        }
        let mut ctx = self.ctx.clone();
        let fresh: Vec<_> = (self.arity()..arity)
            .map(|i| {
                ctx.push(format!("_{}", i));
                terms.var(ctx.len() - 1)
            })
            .collect();
        let lhs = terms.apply(self.lhs.clone(), fresh.clone());
        let rhs = terms.apply(self.rhs.clone(), fresh);
        let cond = self.cond.clone();
        Ok(Self { ctx, lhs, rhs, cond })
    }

    /// Match the left-hand side arguments against concrete arguments.
    ///
    /// This tries the patterns one by one and serves as reference for compiled match trees.
    /// Repeated variables must be bound to identical terms.
    pub fn match_args(&self, args: &[Term<'s>]) -> Option<Vec<Option<Term<'s>>>> {
        let pats = self.lhs.args();
        if pats.len() != args.len() {
            return None;
        }
        let mut subst = Vec::new();
        subst.resize(self.ctx.len(), None);
        for (pat, arg) in pats.iter().zip(args) {
            match_pattern(pat, arg, &mut subst)?
        }
        Some(subst)
    }
}

fn check_pattern(pat: &Term) -> Result<(), Error> {
    match &**pat {
        TermC::Symb(_) | TermC::Var(_) => Ok(()),
        TermC::Appl(head, args) => match &**head {
            TermC::Symb(_) => args.iter().try_for_each(check_pattern),
            _ => Err(Error::VarHead),
        },
    }
}

fn match_pattern<'s>(pat: &Term<'s>, tm: &Term<'s>, subst: &mut [Option<Term<'s>>]) -> Option<()> {
    match (&**pat, &**tm) {
        (TermC::Var(v), _) => match &subst[*v] {
            Some(bound) => (bound == tm).then(|| ()),
            None => {
                subst[*v] = Some(tm.clone());
                Some(())
            }
        },
        (TermC::Symb(s1), TermC::Symb(s2)) => (s1 == s2).then(|| ()),
        (TermC::Appl(h1, ps), TermC::Appl(h2, ts)) if ps.len() == ts.len() => {
            match_pattern(h1, h2, subst)?;
            ps.iter().zip(ts).try_for_each(|(p, t)| match_pattern(p, t, subst))
        }
        _ => None,
    }
}

impl<'s> Display for Rule<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        let mut ctx = self.ctx.iter().peekable();
        while let Some(x) = ctx.next() {
            write!(f, "{}", x)?;
            ctx.peek().iter().try_for_each(|_| write!(f, ", "))?;
        }
        let (lhs, rhs) = (self.lhs.display(&self.ctx), self.rhs.display(&self.ctx));
        write!(f, "] {} --> {}", lhs, rhs)?;
        match &self.cond {
            Some(cond) => write!(f, " when {}", cond.display(&self.ctx)),
            None => Ok(()),
        }
    }
}
