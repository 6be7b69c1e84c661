use indexmap::IndexMap;

use crate::models::{LicenseRecord, RevisionRecord};

/// Group revisions by license, keyed on the full license record.
///
/// Groups keep the order in which each license was first seen, and revisions
/// keep input order within a group. A revision with several licenses shows up
/// in each of their groups; one without licenses shows up in none.
pub fn group_by_license(
    records: &[RevisionRecord],
) -> IndexMap<&LicenseRecord, Vec<&RevisionRecord>> {
    let mut groups: IndexMap<&LicenseRecord, Vec<&RevisionRecord>> = IndexMap::new();
    for record in records {
        for license in &record.licenses {
            groups.entry(license).or_default().push(record);
        }
    }
    groups
}
