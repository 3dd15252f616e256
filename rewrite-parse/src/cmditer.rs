use crate::{cmd, sort, term, Command, Sort, Term, Token};
use logos::Logos;

#[derive(Debug, PartialEq)]
pub enum Error {
    Command(cmd::Error),
    Term(term::Error),
    Sort(sort::Error),
    ExpectedInput,
}

impl From<cmd::Error> for Error {
    fn from(err: cmd::Error) -> Self {
        Self::Command(err)
    }
}

impl From<term::Error> for Error {
    fn from(err: term::Error) -> Self {
        Self::Term(err)
    }
}

impl From<sort::Error> for Error {
    fn from(err: sort::Error) -> Self {
        Self::Sort(err)
    }
}

/// Iterator over the commands of a string.
pub struct CmdIter<'s> {
    lexer: logos::Lexer<'s, Token<'s>>,
}

impl<'s> CmdIter<'s> {
    pub fn new(s: &'s str) -> Self {
        Self {
            lexer: Token::lexer(s),
        }
    }

    /// Feed tokens to the command state machine until a command is complete.
    fn command(&mut self, first: Token<'s>) -> Result<Command<&'s str>, Error> {
        let mut tokens = core::iter::once(first)
            .chain(&mut self.lexer)
            .filter(|token| *token != Token::Space);
        let mut state = cmd::State::Init;
        loop {
            state = if state.expects_sort() {
                let (sort, token) = Sort::parse(&mut tokens)?;
                state.apply_sort(sort, token)?
            } else if state.expects_term() {
                let (tm, token) = Term::parse(&mut tokens)?;
                state.apply(tm, token)?
            } else {
                state.parse(tokens.next().ok_or(Error::ExpectedInput)?)?
            };
            if let cmd::State::Command(cmd) = state {
                return Ok(cmd);
            }
        }
    }
}

impl<'s> Iterator for CmdIter<'s> {
    type Item = Result<Command<&'s str>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.lexer.find(|token| *token != Token::Space)?;
        Some(self.command(first))
    }
}

#[test]
fn commands() -> Result<(), Error> {
    use alloc::vec::Vec;
    let cmds = "(; naturals ;)
        zero : Nat.
        succ : Nat -> Nat.
        plus : Nat -> Nat -> Nat.
        [y] plus zero y --> y
        [x, y] plus (succ x) y --> succ (plus x y).
        #EVAL plus (succ zero) zero.";
    let cmds: Vec<_> = CmdIter::new(cmds).collect::<Result<_, _>>()?;
    assert_eq!(cmds.len(), 5);
    assert!(matches!(&cmds[3], Command::Rules(rules) if rules.len() == 2));
    assert!(matches!(&cmds[4], Command::Eval(_)));
    Ok(())
}

#[test]
fn incomplete() {
    let mut iter = CmdIter::new("zero : Nat. succ : Nat ->");
    assert!(iter.next().unwrap().is_ok());
    assert_eq!(iter.next().unwrap().unwrap_err(), Error::Sort(sort::Error::ExpectedInput));
}
