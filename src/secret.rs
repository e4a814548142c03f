use crate::config::{KEY_PAD, KEY_PHRASE};

/// Evolving keying material mixed into every hash, with its rotating write
/// cursor (EP).
///
/// The buffer has a fixed length. EP starts at 0 and is advanced before each
/// write, so the first absorbed byte lands at index 1.
#[derive(Clone, Debug)]
pub struct SecretBuffer {
    bytes: Vec<u8>,
    cursor: usize,
}

impl SecretBuffer {
    /// `KEY_PHRASE` followed by `pad_len` copies of `KEY_PAD`.
    pub fn new(pad_len: usize) -> Self {
        let mut bytes = Vec::with_capacity(KEY_PHRASE.len() + pad_len);
        bytes.extend_from_slice(KEY_PHRASE);
        bytes.resize(KEY_PHRASE.len() + pad_len, KEY_PAD);
        Self { bytes, cursor: 0 }
    }

    /// An arbitrary non-empty key. Mostly for tests.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        assert!(!bytes.is_empty(), "secret buffer must not be empty");
        Self { bytes, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Current EP. Always `< len()`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte under EP.
    pub fn current(&self) -> u8 {
        self.bytes[self.cursor]
    }

    /// Advance EP (wrapping) and store `byte` at the new position.
    pub fn advance_and_set(&mut self, byte: u8) {
        self.cursor += 1;
        if self.cursor == self.bytes.len() {
            self.cursor = 0;
        }
        self.bytes[self.cursor] = byte;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let secret = SecretBuffer::new(30_000);
        assert_eq!(secret.len(), KEY_PHRASE.len() + 30_000);
        assert_eq!(&secret.as_bytes()[..KEY_PHRASE.len()], KEY_PHRASE);
        assert!(secret.as_bytes()[KEY_PHRASE.len()..].iter().all(|&b| b == b'a'));
        assert_eq!(secret.cursor(), 0);
        assert_eq!(secret.current(), b'n');
    }

    #[test]
    fn test_first_write_lands_at_one() {
        let mut secret = SecretBuffer::new(4);
        secret.advance_and_set(0x42);
        assert_eq!(secret.cursor(), 1);
        assert_eq!(secret.as_bytes()[1], 0x42);
        assert_eq!(secret.as_bytes()[0], b'n');
    }

    #[test]
    fn test_cursor_wraps_to_zero() {
        let mut secret = SecretBuffer::from_bytes(vec![0; 3]);
        secret.advance_and_set(1);
        secret.advance_and_set(2);
        secret.advance_and_set(3);
        assert_eq!(secret.cursor(), 0);
        assert_eq!(secret.as_bytes(), &[3, 1, 2]);
        assert_eq!(secret.current(), 3);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn cursor_stays_in_bounds(len in 1usize..64, writes in prop::collection::vec(any::<u8>(), 0..300)) {
            let mut secret = SecretBuffer::from_bytes(vec![0; len]);
            for (n, byte) in writes.iter().enumerate() {
                secret.advance_and_set(*byte);
                prop_assert!(secret.cursor() < secret.len());
                prop_assert_eq!(secret.cursor(), (n + 1) % len);
                prop_assert_eq!(secret.current(), *byte);
            }
        }
    }
}
