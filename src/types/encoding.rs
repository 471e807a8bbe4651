//! Byte sinks for streaming encoded data.
//!
//! Cells are not serialized with a byte codec; their bits live in a
//! [`BitString`](crate::cell::BitString). What does get written as bytes is the
//! cell *representation* (descriptors, padded data, child depths and hashes),
//! which feeds the representation hash. The [`Encode`] trait streams that
//! representation straight into a hasher.

/// Sink for writing encoded bytes.
///
/// Implemented by [`HashBuilder`](crate::types::hash::HashBuilder) so a
/// representation is hashed without an intermediate buffer.
pub trait EncodeSink {
    /// Writes the given bytes to the sink.
    fn write(&mut self, bytes: &[u8]);
}

/// Types with a canonical byte representation.
pub trait Encode {
    /// Writes the byte representation to the given sink.
    fn encode<S: EncodeSink>(&self, out: &mut S);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::hash::Hash;

    struct Chunks<'a>(&'a [&'a [u8]]);

    impl Encode for Chunks<'_> {
        fn encode<S: EncodeSink>(&self, out: &mut S) {
            for chunk in self.0 {
                out.write(chunk);
            }
        }
    }

    #[test]
    fn chunks_stream_into_hasher() {
        let mut h = Hash::sha256();
        Chunks(&[b"a".as_slice(), b"".as_slice(), b"bc".as_slice()]).encode(&mut h);
        assert_eq!(
            h.finalize().to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
