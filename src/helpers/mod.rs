//! Helper functions shared by the generator, server and commands

mod date;
mod pagination;
mod url;

pub use date::*;
pub use pagination::*;
pub use url::*;
