mod context;
mod error;

#[cfg(test)]
mod tests;

pub use context::AppContext;
pub use error::{AppError, Result};
