//! Stable content hashes for values.

use crate::frame::Value;
use sha2::{Digest, Sha256};

/// Digest algorithm for [`hash_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgo {
    #[default]
    Sha256,
    Md5,
}

fn feed(bytes: &mut Vec<u8>, value: &Value) {
    // Type-tagged canonical encoding so 1, "1" and [1, ...] stay distinct.
    match value {
        Value::Null => bytes.extend_from_slice(b"n;"),
        Value::Bool(b) => {
            bytes.extend_from_slice(if *b { b"b:1;" } else { b"b:0;" });
        }
        Value::Int(i) => {
            bytes.extend_from_slice(format!("i:{};", i).as_bytes());
        }
        Value::Float(f) => {
            bytes.extend_from_slice(format!("f:{:x};", f.to_bits()).as_bytes());
        }
        Value::Str(s) => {
            bytes.extend_from_slice(format!("s:{}:", s.len()).as_bytes());
            bytes.extend_from_slice(s.as_bytes());
            bytes.push(b';');
        }
        Value::List(items) => {
            bytes.extend_from_slice(b"l:(");
            for item in items {
                feed(bytes, item);
            }
            bytes.extend_from_slice(b");");
        }
    }
}

/// Hex digest of a value. A list hashes its members in order; a scalar
/// hashes like its one-element list; missing members are dropped first.
/// `length` truncates the digest to a prefix.
pub fn hash_string(value: &Value, algo: HashAlgo, length: Option<usize>) -> String {
    let members: Vec<&Value> = match value {
        Value::List(items) => items.iter().filter(|v| !v.is_na()).collect(),
        scalar if scalar.is_na() => Vec::new(),
        scalar => vec![scalar],
    };
    let mut bytes = Vec::new();
    for member in members {
        feed(&mut bytes, member);
    }
    let digest = match algo {
        HashAlgo::Sha256 => hex::encode(Sha256::digest(&bytes)),
        HashAlgo::Md5 => hex::encode(md5::compute(&bytes).0),
    };
    match length {
        Some(len) if len < digest.len() => digest[..len].to_string(),
        _ => digest,
    }
}
