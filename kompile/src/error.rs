//! Common error type.

use crate::rule::Error as RuleError;
use crate::scope::Error as ScopeError;
use crate::signature::Error as SignatureError;
use crate::symbols::Error as SymbolsError;
use rewrite_parse::Error as ParseError;

/// Common error type.
#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    Symbols(SymbolsError),
    Scope(ScopeError),
    Signature(SignatureError),
    Rule(RuleError),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<SymbolsError> for Error {
    fn from(err: SymbolsError) -> Self {
        Self::Symbols(err)
    }
}

impl From<ScopeError> for Error {
    fn from(err: ScopeError) -> Self {
        Self::Scope(err)
    }
}

impl From<SignatureError> for Error {
    fn from(err: SignatureError) -> Self {
        Self::Signature(err)
    }
}

impl From<RuleError> for Error {
    fn from(err: RuleError) -> Self {
        Self::Rule(err)
    }
}
