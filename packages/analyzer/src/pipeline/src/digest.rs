// Content Digests
//
// SHA-256 of raw file text is the only unit of change detection.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use ts::Program;

pub fn content_digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Digest of every source file of one program snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDigests {
    digests: BTreeMap<String, String>,
}

impl FileDigests {
    pub fn from_program(program: &dyn Program) -> Self {
        let digests = program
            .get_source_files()
            .iter()
            .map(|f| (f.file_name().to_string(), content_digest(f.text())))
            .collect();
        Self { digests }
    }

    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.digests.get(file_name).map(String::as_str)
    }

    /// True while every recorded digest still matches this snapshot.
    pub fn matches(&self, recorded: &BTreeMap<String, String>) -> bool {
        recorded
            .iter()
            .all(|(file, digest)| self.get(file) == Some(digest.as_str()))
    }

    /// One digest over `files` (path-sorted), used to gate whole watch batches.
    pub fn aggregate<'f>(&self, files: impl IntoIterator<Item = &'f String>) -> String {
        let mut files: Vec<&String> = files.into_iter().collect();
        files.sort();
        files.dedup();
        let mut hasher = Sha256::new();
        for file in files {
            hasher.update(file.as_bytes());
            hasher.update([0u8]);
            hasher.update(self.get(file).unwrap_or("").as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}
