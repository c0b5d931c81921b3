//! Ingest options and per-file context.

use std::collections::HashSet;

/// Which airport identifiers to ingest. An empty include set means
/// everything; excludes always win.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    include_idents: HashSet<String>,
    exclude_idents: HashSet<String>,
}

impl IngestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_ident(mut self, ident: &str) -> Self {
        self.include_idents.insert(ident.to_uppercase());
        self
    }

    pub fn exclude_ident(mut self, ident: &str) -> Self {
        self.exclude_idents.insert(ident.to_uppercase());
        self
    }

    pub fn is_included_ident(&self, ident: &str) -> bool {
        let ident = ident.to_uppercase();
        if self.exclude_idents.contains(&ident) {
            return false;
        }
        self.include_idents.is_empty() || self.include_idents.contains(&ident)
    }
}

/// Context of the file currently being read: id and name for the audit
/// trail, scenery flags for the rating.
#[derive(Debug, Clone, Default)]
pub struct FileContext {
    pub file_id: i64,
    pub file_name: String,
    pub local_path: String,
    pub is_addon: bool,
    pub is_3d: bool,
    pub line_num: u64,
}

impl FileContext {
    /// Prefix for warnings, pointing at the offending line.
    pub fn message_prefix(&self) -> String {
        format!("{}:{}", self.file_name, self.line_num)
    }
}
