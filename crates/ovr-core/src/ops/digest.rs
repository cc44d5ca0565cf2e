//! Cryptographic digests rendered as lowercase hex

use super::text;
use crate::action::{ActionDef, ActionFn, ActionResult, Arguments};
use crate::format::Format;
use sha2::Digest;

type DigestFn = fn(&[u8], &Arguments<'_>) -> ActionResult;

const DIGESTS: [(&[&str], &str, DigestFn); 4] = [
    (&["md5"], "MD5 checksum of the data to hex string", md5),
    (&["sha1"], "SHA1 checksum of the data to hex string", sha1),
    (&["sha256"], "SHA256 checksum of the data to hex string", sha256),
    (&["sha512"], "SHA512 checksum of the data to hex string", sha512),
];

pub(super) fn actions() -> Vec<ActionDef> {
    DIGESTS
        .iter()
        .flat_map(|&(names, doc, f)| {
            [
                ActionDef::new(names, doc, Format::Text, ActionFn::Text(f)),
                ActionDef::new(names, doc, Format::Text, ActionFn::Binary(f)),
            ]
        })
        .collect()
}

fn hex_digest<D: Digest>(input: &[u8]) -> ActionResult {
    Ok(text(hex::encode(D::digest(input))))
}

fn md5(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    hex_digest::<md5::Md5>(input)
}

fn sha1(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    hex_digest::<sha1::Sha1>(input)
}

fn sha256(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    hex_digest::<sha2::Sha256>(input)
}

fn sha512(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    hex_digest::<sha2::Sha512>(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Value;
    use crate::ops::testing::{run, run_text};

    #[test]
    fn known_digests() {
        assert_eq!(
            run_text(actions(), "md5", "hello").unwrap(),
            "5d41402abc4b2a76b9719d911017c592"
        );
        assert_eq!(
            run_text(actions(), "sha1", "hello").unwrap(),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
        assert_eq!(
            run_text(actions(), "sha256", "hello").unwrap(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(run_text(actions(), "sha512", "hello").unwrap().len(), 128);
    }

    #[test]
    fn binary_input_digest() {
        let out = run(actions(), "md5", Value::Binary(b"hello".to_vec()), Vec::new()).unwrap();
        assert_eq!(out, Value::text("5d41402abc4b2a76b9719d911017c592"));
    }
}
