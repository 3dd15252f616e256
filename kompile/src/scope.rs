//! Conversion of parse structures to shared terms and rules.

use crate::{Rule, Symbols, Term, Terms};
use alloc::{string::String, vec::Vec};
use rewrite_parse::{Rule as PRule, Term as PTerm};

/// Name of the symbol that conditions have to rewrite to.
pub const TRUE: &str = "true";

#[derive(Debug)]
pub enum Error {
    UndeclaredSymbol(String),
}

/// Convert a parse term, resolving identifiers bound in `ctx` to variables.
pub fn term<'s>(
    tm: &PTerm<&str>,
    ctx: &[&str],
    syms: &Symbols<'s>,
    terms: &mut Terms<'s>,
) -> Result<Term<'s>, Error> {
    let head = match ctx.iter().position(|x| *x == tm.0) {
        Some(v) => terms.var(v),
        None => {
            let sym = syms.get(tm.0);
            terms.symb(sym.ok_or_else(|| Error::UndeclaredSymbol(tm.0.into()))?)
        }
    };
    let args = tm.1.iter().map(|a| term(a, ctx, syms, terms));
    let args = args.collect::<Result<Vec<_>, _>>()?;
    Ok(terms.apply(head, args))
}

/// Convert a parse rule.
///
/// A condition that consists only of the symbol `true` is dropped.
pub fn rule<'s>(
    rule: &PRule<&str>,
    syms: &Symbols<'s>,
    terms: &mut Terms<'s>,
) -> Result<Rule<'s>, Error> {
    let lhs = term(&rule.lhs, &rule.ctx, syms, terms)?;
    let rhs = term(&rule.rhs, &rule.ctx, syms, terms)?;
    let cond = match &rule.cond {
        Some(c) if c.0 == TRUE && c.1.is_empty() && !rule.ctx.contains(&TRUE) => None,
        Some(c) => Some(term(c, &rule.ctx, syms, terms)?),
        None => None,
    };
    let ctx = rule.ctx.iter().map(|x| String::from(*x)).collect();
    Ok(Rule { ctx, lhs, rhs, cond })
}
