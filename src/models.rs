use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A package at a specific revision, scoped by the fetcher that resolves it.
///
/// The canonical form is `fetcher+package$revision`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    pub fetcher: String,
    pub package: String,
    pub revision: String,
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}${}", self.fetcher, self.package, self.revision)
    }
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("invalid locator '{0}': expected fetcher+package$revision")]
pub struct LocatorParseError(String);

impl FromStr for Locator {
    type Err = LocatorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (fetcher, rest) = s
            .split_once('+')
            .filter(|(fetcher, _)| !fetcher.is_empty())
            .ok_or_else(|| LocatorParseError(s.to_string()))?;

        // Package names may contain '$'; the revision starts after the last one.
        let (package, revision) = rest.rsplit_once('$').unwrap_or((rest, ""));

        Ok(Locator {
            fetcher: fetcher.to_string(),
            package: package.to_string(),
            revision: revision.to_string(),
        })
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Locator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A package reference produced by dependency analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dependency {
    pub locator: Locator,
    /// Only resolved dependencies have an addressable revision to look up.
    #[serde(default)]
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// One module and the dependencies analysis resolved for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub module: Module,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// A lookup result from the revisions API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RevisionRecord {
    #[serde(rename = "Loc", alias = "loc", default)]
    pub loc: RevisionLocator,
    #[serde(rename = "Licenses", alias = "licenses", default, deserialize_with = "null_as_empty")]
    pub licenses: Vec<LicenseRecord>,
    #[serde(rename = "Project", alias = "project", default)]
    pub project: ProjectRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RevisionLocator {
    #[serde(rename = "Package", alias = "package", default)]
    pub package: String,
    #[serde(rename = "Revision", alias = "revision", default)]
    pub revision: String,
}

/// License attached to a revision. Equality and hashing cover every field,
/// so licenses whose text differs at all are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct LicenseRecord {
    #[serde(rename = "spdx_id", default)]
    pub id: String,
    #[serde(rename = "Title", alias = "title", default)]
    pub title: String,
    #[serde(rename = "FullText", alias = "fullText", alias = "fulltext", default)]
    pub full_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectRecord {
    #[serde(rename = "Title", alias = "title", default)]
    pub title: String,
    #[serde(rename = "URL", alias = "url", alias = "Url", default)]
    pub url: String,
    #[serde(rename = "Authors", alias = "authors", default, deserialize_with = "null_as_empty")]
    pub authors: Vec<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
