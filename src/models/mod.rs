//! Data models for the booking, trivia and coffee shop backends.
//!
//! Field names follow the JSON contract the frontends were written against.

mod artist;
mod category;
mod drink;
mod genres;
mod question;
mod show;
mod venue;

pub use artist::*;
pub use category::*;
pub use drink::*;
pub use genres::*;
pub use question::*;
pub use show::*;
pub use venue::*;
