//! Maps from strings to symbols.

use crate::Symbol;
use fnv::FnvHashMap;

#[derive(Debug)]
pub enum Error {
    Reinsertion,
}

/// Map from strings to symbols.
#[derive(Default)]
pub struct Symbols<'s>(FnvHashMap<&'s str, Symbol<'s>>);

impl<'s> Symbols<'s> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, name: &str) -> Option<Symbol<'s>> {
        self.0.get(name).copied()
    }

    /// Create a new symbol for a name, failing if the name is already taken.
    ///
    /// ~~~
    /// # use kompile::Symbols;
    /// let mut syms = Symbols::new();
    /// let zero = syms.insert("zero")?;
    /// assert_eq!(syms.get("zero"), Some(zero));
    /// assert!(syms.insert("zero").is_err());
    /// # Ok::<_, kompile::Error>(())
    /// ~~~
    pub fn insert(&mut self, s: &'s str) -> Result<Symbol<'s>, Error> {
        if self.0.contains_key(s) {
            return Err(Error::Reinsertion);
        }
        let sym = Symbol::new(s);
        self.0.insert(s, sym);
        Ok(sym)
    }
}
