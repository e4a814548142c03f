use std::fmt;

use crate::digest::Digest32;
use crate::machine::{Machine, Mode};
use crate::opcode::is_instruction;

/// Compute the high-order entropy (HOE) of a byte slice.
///
/// HOE = compressed_size / raw_size, where compression uses brotli at quality 2.
/// A freshly loaded tape is mostly blank and scores low; a tape that has been
/// churned by the mixer for a while drifts towards 1.0.
///
/// Values slightly above 1.0 are possible due to compression overhead on random data.
pub fn high_order_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut compressed = Vec::new();
    let params = brotli::enc::BrotliEncoderParams {
        quality: 2,
        ..Default::default()
    };
    brotli::BrotliCompress(&mut &data[..], &mut compressed, &params)
        .expect("brotli compression should not fail on in-memory input");

    compressed.len() as f64 / data.len() as f64
}

/// Fraction of bytes that decode to a real instruction.
pub fn instruction_density(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let count = data.iter().filter(|&&b| is_instruction(b)).count();
    count as f64 / data.len() as f64
}

/// Snapshot of a machine after (or during) a run.
#[derive(Clone, Debug)]
pub struct RunStats {
    pub mode: Mode,
    pub steps: u64,
    pub mixes: u64,
    pub tape_len: usize,
    pub secret_cursor: usize,
    pub tape_entropy: f64,
    pub instruction_density: f64,
}

impl RunStats {
    pub fn collect<D: Digest32>(machine: &Machine<D>) -> Self {
        let tape = machine.tape().as_bytes();
        Self {
            mode: machine.mode(),
            steps: machine.steps(),
            mixes: machine.mixes(),
            tape_len: tape.len(),
            secret_cursor: machine.secret().cursor(),
            tape_entropy: high_order_entropy(tape),
            instruction_density: instruction_density(tape),
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run statistics:")?;
        writeln!(f, "  Mode:                {:?}", self.mode)?;
        writeln!(f, "  Steps:               {}", self.steps)?;
        writeln!(f, "  Mixer invocations:   {}", self.mixes)?;
        writeln!(f, "  Tape length:         {}", self.tape_len)?;
        writeln!(f, "  Secret cursor:       {}", self.secret_cursor)?;
        writeln!(f, "  Tape entropy:        {:.6}", self.tape_entropy)?;
        write!(f, "  Instruction density: {:.6}", self.instruction_density)
    }
}
