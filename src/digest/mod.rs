//! Newsletter digest archive: types, row adapters, search and the remote
//! store client.

pub mod adapter;
pub mod model;
pub mod search;
pub mod service;

pub use model::*;
pub use search::*;
pub use service::*;
