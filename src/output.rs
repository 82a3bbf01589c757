//! GitHub Actions step outputs for the generated matrix.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::matrix::Matrix;

/// `matrix=...` and `matrix-length=...` lines for `$GITHUB_OUTPUT`.
pub fn format_github_output(matrix: &Matrix) -> Result<String, serde_json::Error> {
    Ok(format!(
        "matrix={}\nmatrix-length={}\n",
        matrix.to_include_json()?,
        matrix.len()
    ))
}

/// Append the step outputs to `output_file`, or print them when there is none.
pub fn write_github_output(matrix: &Matrix, output_file: Option<&Path>) -> io::Result<()> {
    let content = format_github_output(matrix).map_err(io::Error::other)?;

    match output_file {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(content.as_bytes())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())
        }
    }
}
