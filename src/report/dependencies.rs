use std::collections::BTreeMap;
use std::io::Write;

use crate::error::ReportError;
use crate::models::{Analysis, Dependency};

/// Write every module's full dependency list, unresolved entries included,
/// as one line of JSON keyed by module name.
pub fn render<W: Write>(analyses: &[Analysis], out: &mut W) -> Result<(), ReportError> {
    let by_module: BTreeMap<&str, &Vec<Dependency>> = analyses
        .iter()
        .map(|a| (a.module.name.as_str(), &a.dependencies))
        .collect();

    let json = serde_json::to_string(&by_module).map_err(ReportError::Serialize)?;
    writeln!(out, "{}", json)?;
    Ok(())
}
