//! Annotated tags: a KVLM payload with `object`/`type`/`tag`/`tagger`
//! headers.

use crate::kvlm::Kvlm;
use bstr::BString;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Tag(pub Kvlm);

impl Tag {
    pub fn parse(payload: &[u8]) -> Result<Self, crate::kvlm::Error> {
        Kvlm::parse(payload).map(Tag)
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.0.serialize()
    }

    /// The object id this tag points at.
    pub fn object(&self) -> Option<&BString> {
        self.0.get("object")
    }

    /// The kind of object pointed at, as its raw ASCII tag (`"commit"`, ...).
    pub fn tag_type(&self) -> Option<&BString> {
        self.0.get("type")
    }

    pub fn tag_name(&self) -> Option<&BString> {
        self.0.get("tag")
    }

    pub fn tagger(&self) -> Option<&BString> {
        self.0.get("tagger")
    }

    pub fn message(&self) -> &BString {
        &self.0.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_typed_accessors() {
        let mut kvlm = Kvlm::default();
        kvlm.push("object", "deadbeef");
        kvlm.push("type", "commit");
        kvlm.push("tag", "v1.0");
        kvlm.push("tagger", "A <a@x> 0 +0000");
        kvlm.message = "release".into();
        let tag = Tag(kvlm);

        assert_eq!(tag.object().unwrap().as_slice(), b"deadbeef");
        assert_eq!(tag.tag_type().unwrap().as_slice(), b"commit");
        assert_eq!(tag.tag_name().unwrap().as_slice(), b"v1.0");
        assert_eq!(tag.message().as_slice(), b"release");
    }
}
