pub mod application;
pub mod audit;
pub mod cli;
pub mod domain;
pub mod io;
pub mod session;
pub mod storage;

pub use domain::*;
pub use storage::{AccountRepository, AccountStore};
