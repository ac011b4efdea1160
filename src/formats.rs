mod api;
mod codec;
mod error;
mod gifti;
mod raw;

#[cfg(test)]
mod tests;

pub use api::{read_data_file, write_data_file};
pub use codec::{DiskFileProvider, FileProvider, MemoryFileProvider};
pub use error::{FormatError, Result};
pub use gifti::{parse_gifti, render_gifti};
