//! Data models shared between the API layer and the repository.

mod category;
mod contact;
mod hero;
mod project;
mod session;

pub use category::*;
pub use contact::*;
pub use hero::*;
pub use project::*;
pub use session::*;
