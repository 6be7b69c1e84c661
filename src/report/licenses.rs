use std::io::Write;

use crate::error::ReportError;
use crate::license::group_by_license;
use crate::models::RevisionRecord;

const RULE: &str = "========================================================================";

const PREAMBLE: &str = "# 3rd-Party Software License Notice

Generated by revision-report.

This software includes the following software and licenses:

";

/// Write the third-party license notice, one section per distinct license.
pub fn render<W: Write>(records: &[RevisionRecord], out: &mut W) -> Result<(), ReportError> {
    out.write_all(PREAMBLE.as_bytes())?;

    for (license, deps) in group_by_license(records) {
        write!(
            out,
            "\n{RULE}\n{}\n{RULE}\n\nThe following software have components provided under the terms of this license:\n\n",
            license.title
        )?;
        for dep in deps {
            writeln!(out, "- {} (from {})", dep.project.title, dep.project.url)?;
        }
    }

    writeln!(out)?;
    Ok(())
}
