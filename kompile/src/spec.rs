//! Specifications read from rule files.

use crate::scope::{self, TRUE};
use crate::{Error, Signature, Symbol, Symbols, Term, Terms};
use alloc::{format, string::String, vec::Vec};
use rewrite_parse::{CmdIter, Command};

/// Symbols, rules and terms to evaluate, as given by a sequence of commands.
///
/// Rules that cannot be compiled do not abort the processing of commands,
/// but are recorded as diagnostics.
///
/// ~~~
/// # use kompile::Spec;
/// let src = r"
///     a : type.
///     c : a.
///     f : a -> a.
///     [x] f x --> c.
///     [x] x --> c.
///     #EVAL f c.
/// ";
/// let spec = Spec::parse(src)?;
/// let f = spec.syms.get("f").unwrap();
/// assert_eq!(spec.sig.rules(&f).len(), 1);
/// assert_eq!(spec.diagnostics.len(), 1);
/// assert_eq!(spec.evals.len(), 1);
/// # Ok::<_, kompile::Error>(())
/// ~~~
#[derive(Default)]
pub struct Spec<'s> {
    pub syms: Symbols<'s>,
    pub sig: Signature<'s>,
    pub terms: Terms<'s>,
    /// terms to be normalised
    pub evals: Vec<Term<'s>>,
    /// rejected rules together with the reason for their rejection
    pub diagnostics: Vec<(String, Error)>,
}

impl<'s> Spec<'s> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Execute all commands of a string.
    pub fn parse(src: &'s str) -> Result<Self, Error> {
        let mut spec = Self::new();
        for cmd in CmdIter::new(src) {
            spec.command(cmd?)?
        }
        Ok(spec)
    }

    /// Execute a command.
    pub fn command(&mut self, cmd: Command<&'s str>) -> Result<(), Error> {
        match cmd {
            Command::Decl(id, sort) => {
                let sym = self.syms.insert(id)?;
                debug!("Declare {} : {}", sym, sort);
                Ok(self.sig.insert(sym, sort.arity())?)
            }
            Command::Rules(rules) => {
                for rule in rules {
                    let rule = scope::rule(&rule, &self.syms, &mut self.terms)?;
                    let shown = format!("{}", rule);
                    match self.sig.add_rule(rule) {
                        Ok(()) => debug!("Add rule {}", shown),
                        Err(e) => {
                            warn!("Reject rule {}: {:?}", shown, e);
                            self.diagnostics.push((shown, e.into()))
                        }
                    }
                }
                Ok(())
            }
            Command::Eval(tm) => {
                let tm = scope::term(&tm, &[], &self.syms, &mut self.terms)?;
                self.evals.push(tm);
                Ok(())
            }
        }
    }

    /// Return the symbol that conditions have to evaluate to.
    pub fn truth(&self) -> Option<Symbol<'s>> {
        self.syms.get(TRUE)
    }
}
