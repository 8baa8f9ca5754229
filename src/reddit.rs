mod api;
mod types;

pub use api::*;
pub use types::*;
