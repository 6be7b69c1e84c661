use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Analysis;

/// Read dependency analysis output: a JSON array of `{ module, dependencies }`.
///
/// A path of `-` reads standard input.
pub fn load_analyses(path: &Path) -> Result<Vec<Analysis>> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("could not read analysis from stdin")?;
        return parse_analyses(&content).context("could not parse analysis from stdin");
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read analysis file {}", path.display()))?;
    parse_analyses(&content)
        .with_context(|| format!("could not parse analysis file {}", path.display()))
}

fn parse_analyses(content: &str) -> Result<Vec<Analysis>> {
    Ok(serde_json::from_str(content)?)
}
