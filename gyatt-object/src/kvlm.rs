//! Key-Value-List-with-Message: the shared payload shape of commit and tag
//! objects.
//!
//! Modeled as an insertion-ordered list of `(key, values)` pairs plus an
//! explicit message field, rather than a map with a magical "no key"
//! sentinel. Parsing is an explicit-cursor loop, not recursion.

use bstr::{BString, ByteSlice};

/// The parsed shape of a commit or tag payload.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Kvlm {
    /// Headers in the order they first (or repeatedly) appeared. A key that
    /// repeats (e.g. `parent`) accumulates additional values in the same slot
    /// rather than creating a second entry.
    pub headers: Vec<(BString, Vec<BString>)>,
    /// The free-form message following the blank line.
    pub message: BString,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("unterminated header value starting at byte {start}")]
    UnterminatedValue { start: usize },
    #[error("payload has no blank line separating headers from the message")]
    MissingBlankLine,
}

impl Kvlm {
    /// Append a value for `key`, creating the header slot if this is the
    /// first occurrence.
    pub fn push(&mut self, key: impl Into<BString>, value: impl Into<BString>) {
        let key = key.into();
        let value = value.into();
        if let Some((_, values)) = self.headers.iter_mut().find(|(k, _)| *k == key) {
            values.push(value);
        } else {
            self.headers.push((key, vec![value]));
        }
    }

    /// The first value stored for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&BString> {
        self.headers
            .iter()
            .find(|(k, _)| k.as_slice() == key.as_bytes())
            .and_then(|(_, v)| v.first())
    }

    /// All values stored for `key`, in appearance order.
    pub fn get_all(&self, key: &str) -> &[BString] {
        self.headers
            .iter()
            .find(|(k, _)| k.as_slice() == key.as_bytes())
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// Parse a KVLM payload.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        let mut headers: Vec<(BString, Vec<BString>)> = Vec::new();
        let mut start = 0usize;

        loop {
            let next_newline = data[start..].find_byte(b'\n').map(|p| p + start);
            let next_space = data[start..].find_byte(b' ').map(|p| p + start);

            let at_message = match (next_space, next_newline) {
                (None, _) => true,
                (Some(_), None) => true,
                (Some(sp), Some(nl)) => sp > nl,
            };

            if at_message {
                let Some(blank_nl) = next_newline else {
                    return Err(Error::MissingBlankLine);
                };
                debug_assert_eq!(blank_nl, start);
                let mut message: BString = data[start + 1..].into();
                if message.last() == Some(&b'\n') {
                    message.pop();
                }
                return Ok(Kvlm { headers, message });
            }

            let sp = next_space.expect("checked above");
            let key: BString = data[start..sp].into();

            let mut end = start;
            loop {
                end = match data[end + 1..].find_byte(b'\n') {
                    Some(p) => end + 1 + p,
                    None => return Err(Error::UnterminatedValue { start }),
                };
                if data.get(end + 1) != Some(&b' ') {
                    break;
                }
            }

            let raw_value = &data[sp + 1..end];
            let value: BString = unfold(raw_value).into();

            match headers.iter_mut().find(|(k, _)| *k == key) {
                Some((_, values)) => values.push(value),
                None => headers.push((key, vec![value])),
            }

            start = end + 1;
        }
    }

    /// Serialize back to the exact wire shape: this is a true inverse of
    /// [`Kvlm::parse`] over round-trip.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (key, values) in &self.headers {
            for value in values {
                out.extend_from_slice(key);
                out.push(b' ');
                out.extend_from_slice(&fold(value));
                out.push(b'\n');
            }
        }
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out.push(b'\n');
        out
    }
}

/// Collapse `"\n "` continuation markers back into plain `"\n"` on read.
fn unfold(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    let mut i = 0;
    while i < value.len() {
        if value[i] == b'\n' && value.get(i + 1) == Some(&b' ') {
            out.push(b'\n');
            i += 2;
        } else {
            out.push(value[i]);
            i += 1;
        }
    }
    out
}

/// Expand every `"\n"` into `"\n "` on write, the inverse of [`unfold`].
fn fold(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for &b in value {
        out.push(b);
        if b == b'\n' {
            out.push(b' ');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_s3() -> (Kvlm, Vec<u8>) {
        let mut kvlm = Kvlm::default();
        kvlm.push("tree", "T");
        kvlm.push("parent", "P1");
        kvlm.push("parent", "P2");
        kvlm.push("author", "A <a@x> 0 +0000");
        kvlm.push("committer", "C <c@x> 0 +0000");
        kvlm.message = "m\n".into();
        let expected =
            b"tree T\nparent P1\nparent P2\nauthor A <a@x> 0 +0000\ncommitter C <c@x> 0 +0000\n\nm\n\n".to_vec();
        (kvlm, expected)
    }

    #[test]
    fn serializes_two_parents_in_order() {
        let (kvlm, expected) = commit_s3();
        assert_eq!(kvlm.serialize(), expected);
    }

    #[test]
    fn round_trips_through_parse() {
        let (kvlm, expected) = commit_s3();
        let parsed = Kvlm::parse(&expected).unwrap();
        assert_eq!(parsed, kvlm);
        assert_eq!(parsed.serialize(), expected);
    }

    #[test]
    fn preserves_multivalued_keys_in_order() {
        let parsed = Kvlm::parse(b"parent P1\nparent P2\nparent P3\n\nmsg\n").unwrap();
        assert_eq!(
            parsed.get_all("parent"),
            &[BString::from("P1"), BString::from("P2"), BString::from("P3")]
        );
    }

    #[test]
    fn unfolds_multiline_values() {
        let parsed = Kvlm::parse(b"gpgsig first\n second\n third\n\nmsg\n").unwrap();
        assert_eq!(parsed.get("gpgsig").unwrap().as_slice(), b"first\nsecond\nthird");
    }

    #[test]
    fn folds_multiline_values_on_serialize() {
        let mut kvlm = Kvlm::default();
        kvlm.push("gpgsig", "first\nsecond\nthird");
        kvlm.message = "msg".into();
        assert_eq!(kvlm.serialize(), b"gpgsig first\n second\n third\n\nmsg\n");
    }

    #[test]
    fn empty_message_round_trips() {
        let mut kvlm = Kvlm::default();
        kvlm.push("tree", "T");
        kvlm.message = "".into();
        let serialized = kvlm.serialize();
        assert_eq!(serialized, b"tree T\n\n\n");
        assert_eq!(Kvlm::parse(&serialized).unwrap(), kvlm);
    }

    #[test]
    fn rejects_missing_blank_line() {
        assert_eq!(
            Kvlm::parse(b"tree T no newline at all").unwrap_err(),
            Error::MissingBlankLine
        );
    }

    #[test]
    fn rejects_unterminated_continuation() {
        assert_eq!(
            Kvlm::parse(b"tree T\n contd").unwrap_err(),
            Error::UnterminatedValue { start: 0 }
        );
    }
}
