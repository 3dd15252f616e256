//! Applicative terms.

use crate::Token;
use alloc::vec::Vec;
use core::fmt::{self, Display};

/// Application of a head to a list of arguments.
///
/// Curried applications are flattened while parsing,
/// so `(f a) b` yields the same term as `f a b`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct App<Tm>(pub Tm, pub Vec<Self>);

/// A term is an identifier applied to terms.
pub type Term<S> = App<S>;

impl<Tm> App<Tm> {
    pub fn new(tm: Tm) -> Self {
        Self(tm, Vec::new())
    }

    /// Apply the term to another argument.
    fn push(mut self, arg: Self) -> Self {
        self.1.push(arg);
        self
    }

    /// Apply a function to all identifiers of the term.
    pub fn map<U>(self, f: &mut impl FnMut(Tm) -> U) -> App<U> {
        let head = f(self.0);
        App(head, self.1.into_iter().map(|a| a.map(f)).collect())
    }
}

impl<Tm: Display> Display for App<Tm> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.1.is_empty() {
            write!(f, "(")?;
        }
        self.0.fmt(f)?;
        self.1.iter().try_for_each(|a| write!(f, " {}", a))?;
        if !self.1.is_empty() {
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
pub enum Error {
    ExpectedIdentOrLPar,
    EmptyParens,
    UnclosedLPar,
    UnmatchedRPar,
    ExpectedInput,
}

type Result<T> = core::result::Result<T, Error>;

impl<S> Term<S> {
    /// Parse a term and return it together with the first token following it.
    ///
    /// Every left parenthesis pushes the application preceding it
    /// onto a stack, which is restored at the matching right parenthesis.
    pub fn parse<'s, I>(iter: &mut I) -> Result<(Self, Token<'s>)>
    where
        I: Iterator<Item = Token<'s>>,
        S: From<&'s str>,
    {
        let mut stack: Vec<Option<Self>> = Vec::new();
        let mut app: Option<Self> = None;
        for token in iter {
            match token {
                Token::Ident(s) => {
                    let arg = App::new(S::from(s));
                    app = Some(match app {
                        None => arg,
                        Some(app) => app.push(arg),
                    })
                }
                Token::LPar => stack.push(app.take()),
                Token::RPar => {
                    let tm = app.take().ok_or(Error::EmptyParens)?;
                    app = Some(match stack.pop().ok_or(Error::UnmatchedRPar)? {
                        None => tm,
                        // `(f x) y` is the same as `f x y`
                        Some(outer) => outer.push(tm),
                    })
                }
                _ if !stack.is_empty() => return Err(Error::UnclosedLPar),
                tok => return app.map(|tm| (tm, tok)).ok_or(Error::ExpectedIdentOrLPar),
            }
        }
        Err(Error::ExpectedInput)
    }
}

impl<'s> Term<&'s str> {
    pub fn parse_str(s: &'s str) -> Result<Self> {
        let mut iter = Token::lex(s).chain(core::iter::once(Token::Dot));
        let (tm, tok) = Self::parse(&mut iter)?;
        assert_eq!(iter.next(), None);
        assert_eq!(tok, Token::Dot);
        Ok(tm)
    }
}

#[test]
fn positive() -> Result<()> {
    use alloc::string::ToString;
    Term::parse_str("(a)")?;
    Term::parse_str("(a b)")?;
    Term::parse_str("a (b c) (d e)")?;
    Term::parse_str("((a (((b)))))")?;
    let tm = Term::parse_str("(f x) (g y) z")?;
    assert_eq!(tm.1.len(), 3);
    assert_eq!(tm.to_string(), "(f x (g y) z)");
    Ok(())
}

#[test]
fn negative() {
    use Error::*;
    assert_eq!(Term::parse_str("->").unwrap_err(), ExpectedIdentOrLPar);
    assert_eq!(Term::parse_str("(a ").unwrap_err(), UnclosedLPar);
    assert_eq!(Term::parse_str("(a b ").unwrap_err(), UnclosedLPar);
    assert_eq!(Term::parse_str("a ()").unwrap_err(), EmptyParens);
    assert_eq!(Term::parse_str("a b)").unwrap_err(), UnmatchedRPar);
}
