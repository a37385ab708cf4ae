use serde::{Deserialize, Serialize};

/// Type of an item in a GitHub contents listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// One item of `GET /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub sha: String,
}

impl ContentEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}
