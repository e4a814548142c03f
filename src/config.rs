/// Number of blank cells appended after the program image at load time.
pub const TAPE_INITIAL_LEN: usize = 300;

/// Hard cap on how far CP and DP may reach. The tape itself is logically
/// unbounded; this is where we stop pretending.
pub const TAPE_LIMIT: usize = 30_000;

/// Fixed prefix of the secret buffer.
pub const KEY_PHRASE: &[u8] = b"no tricks up my sleeve :^)";

/// Padding byte filling the secret buffer after `KEY_PHRASE`.
pub const KEY_PAD: u8 = b'a';

/// A program starting with these bytes runs with the mixer disabled.
pub const STRICT_MAGIC: &[u8; 8] = b"wimpmode";

/// Emitted once when a program opts into strict mode.
pub const STRICT_BANNER: &[u8] = b"EXPORT GRADE ENABLED!\n";

/// Byte stored by `i` when input is exhausted.
pub const EOF_SENTINEL: u8 = 0xFF;

/// Configuration for a single machine.
#[derive(Clone, Debug)]
pub struct MachineConfig {
    /// Blank cells appended after the program image.
    pub initial_tape_len: usize,
    /// Exclusive upper bound for CP and DP, and the largest jump magnitude.
    /// Also the length of the secret buffer's padding.
    pub tape_limit: usize,
    /// Optional cap on executed steps. `None` runs until `H` or a fault.
    pub step_limit: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            initial_tape_len: TAPE_INITIAL_LEN,
            tape_limit: TAPE_LIMIT,
            step_limit: None,
        }
    }
}
