//! Boolean expressions over argument positions.

use crate::{Arity, Symbol};
use alloc::boxed::Box;
use core::fmt;

/// Argument position `i` of a symbol applied to `arity` arguments.
pub type ArgRef<'s> = (Symbol<'s>, Arity, usize);

/// Boolean expression whose variables stand for
/// "argument `i` of `symbol` at `arity` must always be forced".
///
/// Use the smart constructors [`ArExpr::and`] and [`ArExpr::or`],
/// which keep the expressions small by short-circuiting constants:
///
/// ~~~
/// # use kompile::{ArExpr, Symbol};
/// let f = Symbol::new("f");
/// let v = ArExpr::var((f, 1, 0));
/// assert_eq!(ArExpr::True.and(v.clone()), v);
/// assert_eq!(ArExpr::False.and(v.clone()), ArExpr::False);
/// assert_eq!(ArExpr::True.or(v.clone()), ArExpr::True);
/// assert!(v.eval(&|_| true));
/// ~~~
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArExpr<'s> {
    True,
    False,
    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
    Var(ArgRef<'s>),
}

impl<'s> ArExpr<'s> {
    pub fn var(r: ArgRef<'s>) -> Self {
        Self::Var(r)
    }

    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::False, _) | (_, Self::False) => Self::False,
            (Self::True, e) | (e, Self::True) => e,
            (l, r) => Self::And(Box::new(l), Box::new(r)),
        }
    }

    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, _) | (_, Self::True) => Self::True,
            (Self::False, e) | (e, Self::False) => e,
            (l, r) => Self::Or(Box::new(l), Box::new(r)),
        }
    }

    /// Evaluate the expression, given truth values for its variables.
    pub fn eval(&self, var: &impl Fn(&ArgRef<'s>) -> bool) -> bool {
        match self {
            Self::True => true,
            Self::False => false,
            Self::And(l, r) => l.eval(var) && r.eval(var),
            Self::Or(l, r) => l.eval(var) || r.eval(var),
            Self::Var(r) => var(r),
        }
    }
}

impl<'s> fmt::Display for ArExpr<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::True => write!(f, "⊤"),
            Self::False => write!(f, "⊥"),
            Self::And(l, r) => write!(f, "({} ∧ {})", l, r),
            Self::Or(l, r) => write!(f, "({} ∨ {})", l, r),
            Self::Var((s, arity, i)) => write!(f, "{}/{}#{}", s, arity, i),
        }
    }
}
