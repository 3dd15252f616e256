//! Function symbols compared by address.

use core::fmt;
use core::hash::{Hash, Hasher};

/// Head of a rewrite rule or of a pattern inside it.
///
/// Match trees test the symbol at the focus against a given symbol,
/// so equality has to be cheap.
/// A symbol is therefore identified by the address of its name,
/// which is a slice of the rule file that declared the symbol.
/// Names at different addresses make different symbols:
///
/// ~~~
/// # use kompile::Symbol;
/// let src = String::from("succ succ");
/// let (s1, s2) = (Symbol::new(&src[..4]), Symbol::new(&src[5..]));
/// assert_eq!(s1.to_string(), s2.to_string());
/// assert_ne!(s1, s2);
/// assert_eq!(s1, Symbol::new(&src[..4]));
/// ~~~
///
/// A [`Symbols`] table hands out one symbol per declared name.
///
/// [`Symbols`]: crate::Symbols
#[derive(Copy, Clone, Debug)]
pub struct Symbol<'s>(&'s str);

impl<'s> Symbol<'s> {
    pub fn new(s: &'s str) -> Self {
        Self(s)
    }
}

impl<'s> Hash for Symbol<'s> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::ptr::hash(self.0, state)
    }
}

impl<'s> PartialEq for Symbol<'s> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}

impl<'s> Eq for Symbol<'s> {}

impl<'s> fmt::Display for Symbol<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}
