mod account;
mod money;
mod predicate;

pub use account::*;
pub use money::*;
pub use predicate::*;
