//! Per-step tape mutation.
//!
//! Each invocation hashes the whole tape together with the secret buffer,
//! feeds one hash byte back into the secret, hashes again, and overwrites a
//! tape cell with the result. Because the tape feeds the hash that rewrites
//! the tape, and the secret keeps evolving on its own, identical machine
//! states practically never recur.

use crate::digest::Digest32;
use crate::secret::SecretBuffer;
use crate::tape::Tape;

/// Mutate `tape[target]` and advance the secret by one position.
///
/// With `s1 = tape ‖ secret`:
/// 1. `h1 = digest32(s1)[0]`, absorbed via `secret.advance_and_set(h1)`
/// 2. `h2 = digest32(s1 ‖ secret')[0]`, written to `tape[target]`
///
/// `target` past the end of the tape grows it first.
pub fn mix<D: Digest32 + ?Sized>(
    digest: &mut D,
    tape: &mut Tape,
    secret: &mut SecretBuffer,
    target: usize,
) {
    let h1 = digest.digest32(&[tape.as_bytes(), secret.as_bytes()])[0];

    let ep = secret.cursor() + 1;
    let ep = if ep == secret.len() { 0 } else { ep };
    let displaced = secret.as_bytes()[ep];
    secret.advance_and_set(h1);

    // s1 still has the displaced byte at EP; splice it back in rather than
    // keeping a copy of the old secret around.
    let updated = secret.as_bytes();
    let h2 = digest.digest32(&[
        tape.as_bytes(),
        &updated[..ep],
        std::slice::from_ref(&displaced),
        &updated[ep + 1..],
        updated,
    ])[0];

    tape.write(target, h2);
}
