mod account;
mod certificate;
mod common;
mod dns;
mod host;
mod search;

pub use account::*;
pub use certificate::*;
pub use common::*;
pub use dns::*;
pub use host::*;
pub use search::*;
