// Application layer - ledger operations composed from the domain and the store.

pub mod error;
mod service;
mod transfer;

pub use error::*;
pub use service::*;
pub use transfer::*;
