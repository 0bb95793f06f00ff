pub mod error;

pub use error::{InteropError, Result};
