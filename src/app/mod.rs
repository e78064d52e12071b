//! Application state: theme, notifications, routing and the newsletter
//! badge.

pub mod badge;
pub mod routes;
pub mod state;

pub use routes::*;
pub use state::*;
