use md5::{Digest, Md5};

/// Length of a content hash in bytes. The on-disk index format and the
/// fingerprinted path layout are both defined over this digest size.
pub const HASH_LEN: usize = 16;

pub type ContentHash = [u8; HASH_LEN];

/// MD5 of a byte slice, with a fresh digest context per call.
/// Changing the digest invalidates every deployed index and blob path.
pub fn content_hash(bytes: &[u8]) -> ContentHash {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Lower-case hex rendering of a content hash (32 characters).
pub fn hash_hex(hash: &ContentHash) -> String {
    hex::encode(hash)
}

/// Parses the 32-character hex form back into a content hash.
pub fn parse_hash_hex(text: &str) -> Option<ContentHash> {
    let bytes = hex::decode(text).ok()?;
    bytes.try_into().ok()
}
