//! Commits: a KVLM payload with well-known `tree`/`parent`/`author`/
//! `committer` headers.

use crate::kvlm::Kvlm;
use bstr::BString;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Commit(pub Kvlm);

impl Commit {
    pub fn parse(payload: &[u8]) -> Result<Self, crate::kvlm::Error> {
        Kvlm::parse(payload).map(Commit)
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.0.serialize()
    }

    pub fn tree(&self) -> Option<&BString> {
        self.0.get("tree")
    }

    /// Zero, one, or (for merges) many parents.
    pub fn parents(&self) -> &[BString] {
        self.0.get_all("parent")
    }

    pub fn author(&self) -> Option<&BString> {
        self.0.get("author")
    }

    pub fn committer(&self) -> Option<&BString> {
        self.0.get("committer")
    }

    pub fn message(&self) -> &BString {
        &self.0.message
    }
}
