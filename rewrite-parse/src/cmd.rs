use crate::{Sort, Term, Token};
use alloc::vec::Vec;
use core::fmt::{self, Display};
use itertools::Itertools;

#[derive(Clone, Debug)]
pub enum Command<S> {
    /// Declare a new symbol of the given sort
    Decl(S, Sort<S>),
    /// Add rewrite rules
    Rules(Vec<Rule<S>>),
    /// Evaluate a term to normal form
    Eval(Term<S>),
}

/// Conditional rewrite rule.
#[derive(Clone, Debug)]
pub struct Rule<S> {
    /// context (bound variables)
    pub ctx: Vec<S>,
    /// left-hand side (pattern to match with)
    pub lhs: Term<S>,
    /// right-hand side (term to replace with)
    pub rhs: Term<S>,
    /// condition that has to rewrite to true for the rule to apply
    pub cond: Option<Term<S>>,
}

impl<S: Display> Display for Command<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::Decl(x, sort) => write!(f, "{} : {}.", x, sort),
            Self::Rules(rules) => {
                rules.iter().try_for_each(|rule| write!(f, "{} ", rule))?;
                write!(f, ".")
            }
            Self::Eval(tm) => write!(f, "#EVAL {}.", tm),
        }
    }
}

impl<S: Display> Display for Rule<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "[{}] {} --> {}", self.ctx.iter().format(", "), self.lhs, self.rhs)?;
        self.cond.iter().try_for_each(|c| write!(f, " when {}", c))
    }
}

#[derive(Debug)]
pub struct RuleCtx<S> {
    rules: Vec<Rule<S>>,
    vars: Vec<S>,
}

impl<S> Default for RuleCtx<S> {
    fn default() -> Self {
        Self {
            rules: Default::default(),
            vars: Default::default(),
        }
    }
}

impl<S> RuleCtx<S> {
    fn add(mut self, lhs: Term<S>, rhs: Term<S>, cond: Option<Term<S>>) -> Self {
        let ctx = core::mem::take(&mut self.vars);
        self.rules.push(Rule { ctx, lhs, rhs, cond });
        self
    }
}

#[derive(Debug, PartialEq)]
pub enum Error {
    ExpectedColon,
    ExpectedLongArrow,
    ExpectedCommaOrRBrk,
    ExpectedIdentOrRBrk,
    ExpectedDotOrLBrk,
    ExpectedDot,
    ExpectedCmd,
    UnexpectedToken,
}

type RState<S> = Result<State<S>, Error>;

#[derive(Debug)]
pub(crate) enum State<S> {
    /// nothing
    Init,

    /// `s` followed by `:` if true
    Decl(S, bool),

    /// `#EVAL`
    Eval,

    /// `[x1, ..,`
    /// followed by `x` if `Some(x)`
    RuleCtx(RuleCtx<S>, Option<S>),

    /// `[x1, .., xn]`
    RuleL(RuleCtx<S>),
    /// `[x1, .., xn] lhs -->`
    RuleR(RuleCtx<S>, Term<S>),
    /// `[x1, .., xn] lhs --> rhs when`
    RuleC(RuleCtx<S>, Term<S>, Term<S>),

    Command(Command<S>),
}

impl<S> State<S> {
    pub fn parse<'s>(self, token: Token<'s>) -> RState<S>
    where
        S: From<&'s str>,
    {
        match (self, token) {
            // starting commands
            (State::Init, Token::Ident(s)) => Ok(State::Decl(s.into(), false)),
            (State::Init, Token::Eval) => Ok(State::Eval),
            (State::Init, Token::LBrk) => Ok(State::RuleCtx(Default::default(), None)),
            (State::Init, _) => Err(Error::ExpectedCmd),

            // s + :
            (State::Decl(s, false), Token::Colon) => Ok(State::Decl(s, true)),
            (State::Decl(_, false), _) => Err(Error::ExpectedColon),

            // [x1, .., + ]
            (State::RuleCtx(c, None), Token::RBrk) => Ok(State::RuleL(c)),
            // [x1, .., + x
            (State::RuleCtx(c, None), Token::Ident(s)) => Ok(State::RuleCtx(c, Some(s.into()))),
            (State::RuleCtx(_, None), _) => Err(Error::ExpectedIdentOrRBrk),

            // [x1, .., x + ,
            (State::RuleCtx(mut c, Some(s)), Token::Comma) => {
                c.vars.push(s);
                Ok(State::RuleCtx(c, None))
            }
            // [x1, .., x + ]
            (State::RuleCtx(mut c, Some(s)), Token::RBrk) => {
                c.vars.push(s);
                Ok(State::RuleL(c))
            }
            (State::RuleCtx(_, Some(_)), _) => Err(Error::ExpectedCommaOrRBrk),

            _ => Err(Error::UnexpectedToken),
        }
    }

    pub fn expects_sort(&self) -> bool {
        matches!(self, State::Decl(_, true))
    }

    pub fn expects_term(&self) -> bool {
        matches!(
            self,
            State::Eval | State::RuleL(_) | State::RuleR(..) | State::RuleC(..)
        )
    }

    /// Continue after a sort, given the token that ended it.
    pub fn apply_sort(self, sort: Sort<S>, token: Token) -> RState<S> {
        match (self, token) {
            (State::Decl(x, true), Token::Dot) => Ok(State::Command(Command::Decl(x, sort))),
            (State::Decl(..), _) => Err(Error::ExpectedDot),
            _ => Err(Error::UnexpectedToken),
        }
    }

    /// Continue after a term, given the token that ended it.
    pub fn apply(self, tm: Term<S>, token: Token) -> RState<S> {
        match (self, token) {
            (State::Eval, Token::Dot) => Ok(State::Command(Command::Eval(tm))),
            (State::Eval, _) => Err(Error::ExpectedDot),

            (State::RuleL(ctx), Token::LongArrow) => Ok(State::RuleR(ctx, tm)),
            (State::RuleL(..), _) => Err(Error::ExpectedLongArrow),

            (State::RuleR(ctx, lhs), Token::When) => Ok(State::RuleC(ctx, lhs, tm)),
            (State::RuleR(ctx, lhs), Token::LBrk) => {
                Ok(State::RuleCtx(ctx.add(lhs, tm, None), None))
            }
            (State::RuleR(ctx, lhs), Token::Dot) => {
                Ok(State::Command(Command::Rules(ctx.add(lhs, tm, None).rules)))
            }
            (State::RuleC(ctx, lhs, rhs), Token::LBrk) => {
                Ok(State::RuleCtx(ctx.add(lhs, rhs, Some(tm)), None))
            }
            (State::RuleC(ctx, lhs, rhs), Token::Dot) => {
                let rules = ctx.add(lhs, rhs, Some(tm)).rules;
                Ok(State::Command(Command::Rules(rules)))
            }
            (State::RuleR(..) | State::RuleC(..), _) => Err(Error::ExpectedDotOrLBrk),

            _ => Err(Error::UnexpectedToken),
        }
    }
}

impl<'s> Command<&'s str> {
    pub fn parse_str(s: &'s str) -> Result<Self, crate::Error> {
        let err = Err(crate::Error::ExpectedInput);
        crate::CmdIter::new(s).next().unwrap_or(err)
    }
}

#[test]
fn positive() -> Result<(), crate::Error> {
    Command::parse_str("Nat : Type.")?;
    Command::parse_str("plus: Nat -> Nat -> Nat.")?;
    Command::parse_str("[x, y] plus (succ x) y --> succ (plus x y).")?;
    Command::parse_str("[] plus zero zero --> zero.")?;
    Command::parse_str("[x, y] max x y --> x when le y x [x, y] max x y --> y.")?;
    Command::parse_str("#EVAL plus (succ zero) zero.")?;
    Ok(())
}

#[test]
fn rules() -> Result<(), crate::Error> {
    use alloc::string::ToString;
    let cmd = Command::parse_str("[x, y] max x y --> x when le y x [y] max zero y --> y.")?;
    let rules = match cmd {
        Command::Rules(rules) => rules,
        _ => panic!("rules expected"),
    };
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].to_string(), "[x, y] (max x y) --> x when (le y x)");
    assert_eq!(rules[1].ctx, ["y"]);
    assert!(rules[1].cond.is_none());
    Ok(())
}

#[test]
fn negative() {
    use Error::*;
    let parse_err = |s: &str| match Command::parse_str(s) {
        Err(crate::Error::Command(e)) => e,
        _ => panic!("command error expected"),
    };
    assert_eq!(parse_err("."), ExpectedCmd);
    assert_eq!(parse_err("x ->"), ExpectedColon);
    assert_eq!(parse_err("x : A -> B #EVAL"), ExpectedDot);
    assert_eq!(parse_err("[->"), ExpectedIdentOrRBrk);
    assert_eq!(parse_err("[x ->"), ExpectedCommaOrRBrk);
    assert_eq!(parse_err("[x] l."), ExpectedLongArrow);
    assert_eq!(parse_err("[x] l --> r -->"), ExpectedDotOrLBrk);
    assert_eq!(parse_err("#EVAL f x -->"), ExpectedDot);
}
