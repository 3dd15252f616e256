//! Maps from symbols to their full arities and rewrite rules.

use crate::nfs::MAX_ARITY;
use crate::{rule, Arity, Rule, Symbol};
use alloc::{rc::Rc, vec::Vec};

/// Immutable HashMap for fast cloning of signatures.
type FnvHashMap<K, V> = im::hashmap::HashMap<K, V, fnv::FnvBuildHasher>;

#[derive(Debug)]
pub enum Error {
    Reintroduction,
    Undeclared,
    ArityTooLarge(Arity),
    Rule(rule::Error),
}

impl From<rule::Error> for Error {
    fn from(err: rule::Error) -> Self {
        Self::Rule(err)
    }
}

/// Map from symbols to their full arities and rewrite rules.
///
/// The rules of every symbol are kept in the order in which they were added,
/// which determines their priority.
#[derive(Clone, Default)]
pub struct Signature<'s> {
    arities: FnvHashMap<Symbol<'s>, Arity>,
    rules: FnvHashMap<Symbol<'s>, Rc<Vec<Rule<'s>>>>,
    order: im::Vector<Symbol<'s>>,
}

impl<'s> Signature<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Introduce a new symbol that takes at most the given number of arguments.
    pub fn insert(&mut self, sym: Symbol<'s>, arity: Arity) -> Result<(), Error> {
        if arity > MAX_ARITY {
            return Err(Error::ArityTooLarge(arity));
        }
        if self.arities.insert(sym, arity).is_some() {
            return Err(Error::Reintroduction);
        }
        self.rules.insert(sym, Default::default());
        self.order.push_back(sym);
        Ok(())
    }

    /// Return the full arity of a symbol.
    pub fn arity(&self, sym: &Symbol<'s>) -> Option<Arity> {
        self.arities.get(sym).copied()
    }

    /// Return the rewrite rules whose left-hand side head is the given symbol.
    pub fn rules(&self, sym: &Symbol<'s>) -> &[Rule<'s>] {
        self.rules.get(sym).map(|rules| &rules[..]).unwrap_or(&[])
    }

    /// Add a rewrite rule to an existing symbol.
    ///
    /// The rule is rejected if it cannot be compiled (see [`Rule::check`]).
    pub fn add_rule(&mut self, rule: Rule<'s>) -> Result<(), Error> {
        let sym = rule.check()?;
        let rules = self.rules.get_mut(&sym).ok_or(Error::Undeclared)?;
        Rc::make_mut(rules).push(rule);
        Ok(())
    }

    /// Return all symbols in the order of their introduction.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol<'s>> + '_ {
        self.order.iter().copied()
    }
}
