//! Simple sorts built from sort names and arrows.

use crate::Token;
use alloc::{boxed::Box, vec::Vec};
use core::fmt::{self, Display};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sort<S> {
    Atom(S),
    /// Function sort (`A -> B`)
    Arrow(Box<Self>, Box<Self>),
}

impl<S> Sort<S> {
    /// Number of arguments that a symbol of this sort can take.
    ///
    /// This counts the arrows on the right spine of the sort,
    /// so a curried result sort also contributes arguments:
    ///
    /// ~~~
    /// # use rewrite_parse::Sort;
    /// assert_eq!(Sort::parse_str("A")?.arity(), 0);
    /// assert_eq!(Sort::parse_str("A -> B -> C")?.arity(), 2);
    /// assert_eq!(Sort::parse_str("A -> (B -> C)")?.arity(), 2);
    /// assert_eq!(Sort::parse_str("(A -> B) -> C")?.arity(), 1);
    /// # Ok::<_, rewrite_parse::sort::Error>(())
    /// ~~~
    pub fn arity(&self) -> usize {
        match self {
            Self::Atom(_) => 0,
            Self::Arrow(_, cod) => 1 + cod.arity(),
        }
    }
}

impl<S: Display> Display for Sort<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Atom(s) => s.fmt(f),
            Self::Arrow(dom, cod) => match **dom {
                Self::Atom(_) => write!(f, "{} -> {}", dom, cod),
                Self::Arrow(..) => write!(f, "({}) -> {}", dom, cod),
            },
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Error {
    ExpectedIdentOrLPar,
    ExpectedArrow,
    UnclosedLPar,
    UnmatchedRPar,
    ExpectedInput,
}

/// Arrow sort `d1 -> ... -> dn -> cur` being read inside one pair of parentheses.
struct Arrows<S> {
    doms: Vec<Sort<S>>,
    cur: Option<Sort<S>>,
}

impl<S> Default for Arrows<S> {
    fn default() -> Self {
        Self {
            doms: Vec::new(),
            cur: None,
        }
    }
}

impl<S> Arrows<S> {
    fn set(&mut self, sort: Sort<S>) -> Result<(), Error> {
        match self.cur.replace(sort) {
            None => Ok(()),
            Some(_) => Err(Error::ExpectedArrow),
        }
    }

    fn close(self) -> Result<Sort<S>, Error> {
        let cod = self.cur.ok_or(Error::ExpectedIdentOrLPar)?;
        let arrow = |cod: Sort<S>, dom: Sort<S>| Sort::Arrow(Box::new(dom), Box::new(cod));
        Ok(self.doms.into_iter().rev().fold(cod, arrow))
    }
}

impl<S> Sort<S> {
    /// Parse a sort and return it together with the first token following it.
    pub fn parse<'s, I>(iter: &mut I) -> Result<(Self, Token<'s>), Error>
    where
        I: Iterator<Item = Token<'s>>,
        S: From<&'s str>,
    {
        let mut stack: Vec<Arrows<S>> = Vec::new();
        let mut arrows = Arrows::default();
        for token in iter {
            match token {
                Token::Ident(s) => arrows.set(Sort::Atom(S::from(s)))?,
                Token::Arrow => {
                    let dom = arrows.cur.take().ok_or(Error::ExpectedIdentOrLPar)?;
                    arrows.doms.push(dom)
                }
                Token::LPar if arrows.cur.is_some() => return Err(Error::ExpectedArrow),
                Token::LPar => stack.push(core::mem::take(&mut arrows)),
                Token::RPar => {
                    let sort = arrows.close()?;
                    arrows = stack.pop().ok_or(Error::UnmatchedRPar)?;
                    arrows.set(sort)?
                }
                _ if !stack.is_empty() => return Err(Error::UnclosedLPar),
                tok => return Ok((arrows.close()?, tok)),
            }
        }
        Err(Error::ExpectedInput)
    }
}

impl<'s> Sort<&'s str> {
    pub fn parse_str(s: &'s str) -> Result<Self, Error> {
        let mut iter = Token::lex(s).chain(core::iter::once(Token::Dot));
        let (sort, tok) = Self::parse(&mut iter)?;
        assert_eq!(tok, Token::Dot);
        Ok(sort)
    }
}

#[test]
fn positive() -> Result<(), Error> {
    use alloc::string::ToString;
    let sort = Sort::parse_str("(A -> B) -> List -> (C)")?;
    assert_eq!(sort.to_string(), "(A -> B) -> List -> C");
    assert_eq!(Sort::parse_str("((A))")?, Sort::Atom("A"));
    Ok(())
}

#[test]
fn negative() {
    use Error::*;
    assert_eq!(Sort::parse_str("A B").unwrap_err(), ExpectedArrow);
    assert_eq!(Sort::parse_str("A -> ").unwrap_err(), ExpectedIdentOrLPar);
    assert_eq!(Sort::parse_str("A (B)").unwrap_err(), ExpectedArrow);
    assert_eq!(Sort::parse_str("(A -> B").unwrap_err(), UnclosedLPar);
    assert_eq!(Sort::parse_str("A)").unwrap_err(), UnmatchedRPar);
}
