use std::path::Path;

use crate::commands::{CommandError, Result};
use crate::model::GiftiFile;

/// Resolves a column number or name, naming the file when it does not exist.
pub(crate) fn find_column(file: &GiftiFile, selector: &str, path: &Path) -> Result<usize> {
    file.find_column(selector).map_err(|_| {
        CommandError::operation(format!(
            "column '{selector}' not valid in file '{}'",
            path.display()
        ))
    })
}

pub(crate) fn to_f64(values: &[f32]) -> Vec<f64> {
    values.iter().map(|value| f64::from(*value)).collect()
}
