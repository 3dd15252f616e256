use core::fmt::{self, Display};
use logos::{Lexer, Logos};

#[derive(Logos, Debug, PartialEq)]
pub enum Token<'s> {
    #[token("#EVAL")]
    Eval,

    #[token("when")]
    When,

    #[token("[")]
    LBrk,

    #[token("]")]
    RBrk,

    #[token("(")]
    LPar,

    #[token(")")]
    RPar,

    #[token(":")]
    Colon,

    #[token("->")]
    Arrow,

    #[token("-->")]
    LongArrow,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[regex("[a-zA-Z0-9_!?][a-zA-Z0-9_!?']*")]
    Ident(&'s str),

    #[regex(r"[ \t\r\n\f]+")]
    #[token("(;", comment)]
    Space,

    #[error]
    Error,
}

impl<'s> Token<'s> {
    /// Lex a string, dropping whitespace and comments.
    ///
    /// ~~~
    /// # use rewrite_parse::Token;
    /// let tokens: Vec<_> = Token::lex("(; zero ;) succ zero.").collect();
    /// let expected = [Token::Ident("succ"), Token::Ident("zero"), Token::Dot];
    /// assert_eq!(tokens, expected);
    /// ~~~
    pub fn lex(s: &'s str) -> impl Iterator<Item = Self> {
        Self::lexer(s).filter(|token| *token != Token::Space)
    }
}

impl<'s> Display for Token<'s> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let s = match self {
            Self::Eval => "#EVAL",
            Self::When => "when",
            Self::LBrk => "[",
            Self::RBrk => "]",
            Self::LPar => "(",
            Self::RPar => ")",
            Self::Colon => ":",
            Self::Arrow => "->",
            Self::LongArrow => "-->",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Ident(s) => s,
            Self::Space => " ",
            Self::Error => return Err(Default::default()),
        };
        s.fmt(f)
    }
}

fn comment<'s>(lex: &mut Lexer<'s, Token<'s>>) -> Option<()> {
    // number of open comments
    let mut open = 1;
    let prefix: &[_] = &['(', ';'];
    while open > 0 {
        // go to first occurrence of either ';' or '('
        lex.bump(lex.remainder().find(prefix)?);
        if lex.remainder().starts_with("(;") {
            open += 1;
            lex.bump(2);
        } else if lex.remainder().starts_with(";)") {
            open -= 1;
            lex.bump(2);
        } else {
            lex.bump(1);
        }
    }
    Some(())
}

#[test]
fn keywords() {
    use alloc::vec::Vec;
    let tokens: Vec<_> = Token::lex("[x] f x --> x when x. #EVAL whence").collect();
    assert_eq!(tokens[5], Token::LongArrow);
    assert_eq!(tokens[7], Token::When);
    assert_eq!(tokens[10], Token::Eval);
    assert_eq!(tokens[11], Token::Ident("whence"));
}

#[test]
fn nested_comment() {
    use alloc::vec::Vec;
    let tokens: Vec<_> = Token::lex("a (; b (; c ;) d ;) e").collect();
    assert_eq!(tokens, [Token::Ident("a"), Token::Ident("e")]);
}
