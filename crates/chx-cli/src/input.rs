//! JSON change lists.
//!
//! A change list is an array of changes, each naming its backend:
//!
//! ```json
//! [
//!   { "owner": "git", "before": { "path": "/a/x.txt", "revision": 5 },
//!     "after": { "path": "/a/x.txt" } },
//!   { "owner": "git", "status": "ADDED", "after": { "path": "/a/y.txt" } }
//! ]
//! ```

use std::path::Path;

use anyhow::{bail, Context};
use chx_index::{ChangeIndex, IndexConfig};
use chx_types::{Change, ContentRevision, FileStatus, RevisionNumber, VcsKey, VcsPath};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChangeInput {
    owner: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    before: Option<SideInput>,
    #[serde(default)]
    after: Option<SideInput>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SideInput {
    path: String,
    #[serde(default)]
    revision: RevisionNumber,
}

impl SideInput {
    fn into_content(self) -> ContentRevision {
        ContentRevision::new(VcsPath::new(self.path), self.revision)
    }
}

/// Parse a change list into `(owner, change)` pairs.
pub fn parse_changes(text: &str) -> anyhow::Result<Vec<(VcsKey, Change)>> {
    let inputs: Vec<ChangeInput> =
        serde_json::from_str(text).context("change list is not valid JSON")?;

    let mut changes = Vec::with_capacity(inputs.len());
    for (i, input) in inputs.into_iter().enumerate() {
        let owner = VcsKey::new(input.owner).with_context(|| format!("change #{i}"))?;
        let before = input.before.map(SideInput::into_content);
        let after = input.after.map(SideInput::into_content);
        let mut change = Change::try_new(before, after).with_context(|| format!("change #{i}"))?;
        if let Some(status) = input.status {
            let status: FileStatus = status.parse().with_context(|| format!("change #{i}"))?;
            change = change.with_status(status);
        }
        changes.push((owner, change));
    }
    Ok(changes)
}

/// Build one index generation from a change list.
pub fn build_index(text: &str, config: &IndexConfig) -> anyhow::Result<ChangeIndex> {
    let mut index = ChangeIndex::with_config(config);
    for (owner, change) in parse_changes(text)? {
        index.change_added(&change, &owner);
    }
    Ok(index)
}

/// Read and build an index generation from a change list file.
pub fn load_index(path: &Path, config: &IndexConfig) -> anyhow::Result<ChangeIndex> {
    if !path.is_file() {
        bail!("change list not found: {}", path.display());
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    build_index(&text, config).with_context(|| format!("in {}", path.display()))
}
