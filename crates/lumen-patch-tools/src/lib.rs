pub mod dumps;
pub mod error;
pub mod fetch;
pub mod jsonc;
pub mod manifest;
pub mod substitute;
pub mod sync;

pub use error::{Error, Result};
