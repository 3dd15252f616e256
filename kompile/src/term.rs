//! Maximally shared first-order terms.

use crate::Symbol;
use alloc::{rc::Rc, string::String, vec::Vec};
use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};
use core::ops::Deref;
use fnv::FnvHashMap;

/// Variable of a rewrite rule, identified by its position in the rule context.
pub type Miller = usize;

/// Number of arguments of an application.
pub type Arity = usize;

/// Term node.
///
/// Applications are flat: the head of an application is never an application,
/// and the arguments of an application are never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TermC<'s> {
    Symb(Symbol<'s>),
    Var(Miller),
    Appl(Term<'s>, Vec<Term<'s>>),
}

/// Pointer to a term node that was created by a [`Terms`] store.
///
/// Because the store never creates two structurally equal nodes,
/// comparing and hashing terms is done on addresses.
#[derive(Clone, Debug)]
pub struct Term<'s>(Rc<TermC<'s>>);

impl<'s> PartialEq for Term<'s> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<'s> Eq for Term<'s> {}

impl<'s> Hash for Term<'s> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::ptr::hash(Rc::as_ptr(&self.0), state)
    }
}

impl<'s> Deref for Term<'s> {
    type Target = TermC<'s>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'s> Term<'s> {
    /// Return the head of an application, or the term itself.
    pub fn head(&self) -> &Self {
        match &**self {
            TermC::Appl(head, _) => head,
            _ => self,
        }
    }

    /// Return the arguments of an application, or nothing.
    pub fn args(&self) -> &[Self] {
        match &**self {
            TermC::Appl(_, args) => args,
            _ => &[],
        }
    }

    /// Return the symbol at the head of the term, if any.
    pub fn symbol(&self) -> Option<Symbol<'s>> {
        match &**self.head() {
            TermC::Symb(s) => Some(*s),
            _ => None,
        }
    }

    pub fn get_var(&self) -> Option<Miller> {
        match &**self {
            TermC::Var(v) => Some(*v),
            _ => None,
        }
    }

    /// Call a function on every variable occurrence, from left to right.
    pub fn visit_vars(&self, f: &mut impl FnMut(Miller)) {
        match &**self {
            TermC::Symb(_) => (),
            TermC::Var(v) => f(*v),
            TermC::Appl(head, args) => {
                head.visit_vars(f);
                args.iter().for_each(|a| a.visit_vars(f))
            }
        }
    }

    /// Return the variables of the term in order of their first occurrence.
    pub fn vars(&self) -> Vec<Miller> {
        let mut vars = Vec::new();
        self.visit_vars(&mut |v| {
            if !vars.contains(&v) {
                vars.push(v)
            }
        });
        vars
    }

    /// Return how often a variable occurs in the term.
    pub fn occurrences(&self, var: Miller) -> usize {
        let mut n = 0;
        self.visit_vars(&mut |v| n += usize::from(v == var));
        n
    }

    /// Display the term, printing variables with the given function.
    pub fn display_with<'a, F>(&'a self, var: F) -> impl Display + 'a
    where
        F: Fn(Miller, &mut fmt::Formatter) -> fmt::Result + 'a,
    {
        Fmt(self, var)
    }

    /// Display the term, taking variable names from a rule context.
    pub fn display<'a>(&'a self, ctx: &'a [String]) -> impl Display + 'a {
        self.display_with(move |v, f| match ctx.get(v) {
            Some(name) => name.fmt(f),
            None => write!(f, "μ{}", v),
        })
    }
}

struct Fmt<'a, 's, F>(&'a Term<'s>, F);

impl<'a, 's, F> Fmt<'a, 's, F>
where
    F: Fn(Miller, &mut fmt::Formatter) -> fmt::Result,
{
    fn term(&self, tm: &Term<'s>, f: &mut fmt::Formatter) -> fmt::Result {
        match &**tm {
            TermC::Symb(s) => s.fmt(f),
            TermC::Var(v) => (self.1)(*v, f),
            TermC::Appl(head, args) => {
                write!(f, "(")?;
                self.term(head, f)?;
                for a in args {
                    write!(f, " ")?;
                    self.term(a, f)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl<'a, 's, F> Display for Fmt<'a, 's, F>
where
    F: Fn(Miller, &mut fmt::Formatter) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.term(self.0, f)
    }
}

impl<'s> Display for Term<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.display_with(|v, f| write!(f, "μ{}", v)).fmt(f)
    }
}

/// Store that creates every term node at most once.
///
/// ~~~
/// # use kompile::{Symbol, Terms};
/// let mut terms = Terms::new();
/// let (succ, zero) = (Symbol::new("succ"), Symbol::new("zero"));
/// let z = terms.symb(zero);
/// let s = terms.symb(succ);
/// let one = terms.apply(s.clone(), vec![z.clone()]);
/// let one_ = terms.apply(s, vec![z]);
/// assert!(one == one_);
/// assert_eq!(one.to_string(), "(succ zero)");
/// ~~~
#[derive(Default)]
pub struct Terms<'s>(FnvHashMap<TermC<'s>, Term<'s>>);

impl<'s> Terms<'s> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Return the unique term for a node.
    pub fn intern(&mut self, tc: TermC<'s>) -> Term<'s> {
        if let Some(tm) = self.0.get(&tc) {
            return tm.clone();
        }
        let tm = Term(Rc::new(tc.clone()));
        self.0.insert(tc, tm.clone());
        tm
    }

    pub fn symb(&mut self, s: Symbol<'s>) -> Term<'s> {
        self.intern(TermC::Symb(s))
    }

    pub fn var(&mut self, v: Miller) -> Term<'s> {
        self.intern(TermC::Var(v))
    }

    /// Apply a term to arguments, flattening applications in head position.
    pub fn apply(&mut self, head: Term<'s>, mut args: Vec<Term<'s>>) -> Term<'s> {
        if args.is_empty() {
            return head;
        }
        match &*head {
            TermC::Appl(h, a) => {
                let mut all = a.clone();
                all.append(&mut args);
                self.intern(TermC::Appl(h.clone(), all))
            }
            _ => self.intern(TermC::Appl(head, args)),
        }
    }

    /// Replace variables by terms.
    ///
    /// Subterms that do not change are shared with the original term.
    pub fn subst<F>(&mut self, tm: &Term<'s>, f: &F) -> Term<'s>
    where
        F: Fn(Miller) -> Option<Term<'s>>,
    {
        match &**tm {
            TermC::Symb(_) => tm.clone(),
            TermC::Var(v) => f(*v).unwrap_or_else(|| tm.clone()),
            TermC::Appl(head, args) => {
                let head_ = self.subst(head, f);
                let args_: Vec<_> = args.iter().map(|a| self.subst(a, f)).collect();
                if head_ == *head && args_ == *args {
                    tm.clone()
                } else {
                    self.apply(head_, args_)
                }
            }
        }
    }

    /// Return the number of distinct terms created so far.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{string::ToString, vec};

    #[test]
    fn flatten() {
        let mut terms = Terms::new();
        let (f, a, b) = (Symbol::new("f"), Symbol::new("a"), Symbol::new("b"));
        let (a, b, fs) = (terms.symb(a), terms.symb(b), terms.symb(f));
        let fa = terms.apply(fs.clone(), vec![a.clone()]);
        let fab = terms.apply(fa, vec![b.clone()]);
        let fab_ = terms.apply(fs, vec![a, b]);
        assert!(fab == fab_);
        assert_eq!(fab.args().len(), 2);
        assert_eq!(fab.symbol(), Some(f));
        assert_eq!(fab.to_string(), "(f a b)");
    }

    #[test]
    fn subst() {
        let mut terms = Terms::new();
        let (f, c) = (Symbol::new("f"), Symbol::new("c"));
        let (x, y, f) = (terms.var(0), terms.var(1), terms.symb(f));
        let tm = terms.apply(f, vec![x.clone(), y, x]);
        assert_eq!(tm.vars(), vec![0, 1]);
        assert_eq!(tm.occurrences(0), 2);

        let c = terms.symb(c);
        let by_c = |v| (v == 0).then(|| c.clone());
        let tm_ = terms.subst(&tm, &by_c);
        assert_eq!(tm_.to_string(), "(f c μ1 c)");

        // substituting nothing yields the very same term
        let tm__ = terms.subst(&tm, &|_| None);
        assert!(tm__ == tm);

        let ctx = vec!["x".to_string(), "y".to_string()];
        assert_eq!(tm.display(&ctx).to_string(), "(f x y x)");
    }
}
