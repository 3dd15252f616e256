//! Compile rewrite rules to match trees and evaluate terms.

mod error;
mod opt;
mod process;

pub use error::Error;
pub use opt::{Emit, Opt};
pub use process::process;
