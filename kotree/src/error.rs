use core::fmt;
use std::io;

/// Central error type.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Ko(kompile::Error),
    Fmt(fmt::Error),
    Pool(rayon::ThreadPoolBuildError),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<kompile::Error> for Error {
    fn from(err: kompile::Error) -> Self {
        Self::Ko(err)
    }
}

impl From<fmt::Error> for Error {
    fn from(err: fmt::Error) -> Self {
        Self::Fmt(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Self::Pool(err)
    }
}
