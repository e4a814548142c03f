use sha2::{Digest, Sha256};

/// A 32-byte hash over the concatenation of several byte strings.
///
/// Taking the pieces separately lets the mixer hash tape and secret back to
/// back without building the joined string first. The result must equal the
/// hash of `chunks.concat()`.
pub trait Digest32 {
    fn digest32(&mut self, chunks: &[&[u8]]) -> [u8; 32];
}

/// SHA-256, the machine's production hash.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Digest;

impl Digest32 for Sha256Digest {
    fn digest32(&mut self, chunks: &[&[u8]]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for chunk in chunks {
            hasher.update(chunk);
        }
        hasher.finalize().into()
    }
}
