//! The instruction dispatcher.
//!
//! One `Machine` owns the whole interpreter state: tape, secret buffer, the
//! program and data pointers, and the mode. `step` runs one iteration of the
//! loop:
//!
//! 1. chaotic mode only: mix, overwriting the cell under CP
//! 2. fault if CP or DP reached the tape limit
//! 3. clamp negative CP and DP to 0
//! 4. grow the tape so CP+2 and DP+2 are addressable
//! 5. decode tape[CP] and execute it
//!
//! Unknown bytes are fatal in strict mode. In chaotic mode they trigger one
//! extra mix of the same cell and CP stays put.

use tracing::{debug, trace};

use crate::config::{MachineConfig, STRICT_BANNER, STRICT_MAGIC};
use crate::console::Console;
use crate::digest::{Digest32, Sha256Digest};
use crate::error::{Fault, Result};
use crate::jump::parse_pair;
use crate::mixer::mix;
use crate::opcode::Opcode;
use crate::secret::SecretBuffer;
use crate::tape::Tape;

/// How the machine treats each step. Decided once at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Mixer disabled, unknown opcodes fatal. Selected by the `wimpmode` prefix.
    Strict,
    /// Default: every decoded byte is first overwritten by the mixer.
    Chaotic,
}

/// Outcome of a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
}

pub struct Machine<D = Sha256Digest> {
    tape: Tape,
    secret: SecretBuffer,
    digest: D,
    cp: i64,
    dp: i64,
    mode: Mode,
    config: MachineConfig,
    banner_pending: bool,
    steps: u64,
    mixes: u64,
}

impl Machine<Sha256Digest> {
    /// A machine hashing with SHA-256.
    pub fn new(program: &[u8], config: MachineConfig) -> Self {
        Self::with_digest(program, config, Sha256Digest)
    }
}

impl<D: Digest32> Machine<D> {
    pub fn with_digest(program: &[u8], config: MachineConfig, digest: D) -> Self {
        let secret = SecretBuffer::new(config.tape_limit);
        Self::with_secret(program, config, digest, secret)
    }

    /// Full control over the keying material.
    pub fn with_secret(
        program: &[u8],
        config: MachineConfig,
        digest: D,
        secret: SecretBuffer,
    ) -> Self {
        let tape = Tape::new(program, config.initial_tape_len);
        let strict = tape.as_bytes().starts_with(STRICT_MAGIC);
        let (mode, start) = if strict {
            (Mode::Strict, STRICT_MAGIC.len() as i64)
        } else {
            (Mode::Chaotic, 0)
        };
        debug!(?mode, program_len = program.len(), tape_len = tape.len(), "machine loaded");

        Self {
            tape,
            secret,
            digest,
            cp: start,
            dp: start,
            mode,
            config,
            banner_pending: strict,
            steps: 0,
            mixes: 0,
        }
    }

    pub fn cp(&self) -> i64 {
        self.cp
    }

    pub fn dp(&self) -> i64 {
        self.dp
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn secret(&self) -> &SecretBuffer {
        &self.secret
    }

    /// Steps started so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Mixer invocations so far.
    pub fn mixes(&self) -> u64 {
        self.mixes
    }

    /// Run until `H` or a fault.
    pub fn run<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<()> {
        while self.step(console)? == Status::Running {}
        Ok(())
    }

    /// Execute one step.
    pub fn step<C: Console + ?Sized>(&mut self, console: &mut C) -> Result<Status> {
        if self.banner_pending {
            self.banner_pending = false;
            for &b in STRICT_BANNER {
                console.emit_byte(b)?;
            }
        }
        if let Some(limit) = self.config.step_limit {
            if self.steps >= limit {
                return Err(Fault::StepLimitReached(self.steps));
            }
        }
        self.steps += 1;

        if self.mode == Mode::Chaotic {
            // A negative CP is about to be clamped to 0, so that's the cell
            // that gets decoded.
            self.mix(self.cp.max(0) as usize);
        }

        let limit = self.config.tape_limit as i64;
        if self.cp >= limit || self.dp >= limit {
            return Err(Fault::TapeLimitReached);
        }
        self.cp = self.cp.max(0);
        self.dp = self.dp.max(0);
        let cp = self.cp as usize;
        let dp = self.dp as usize;

        let grown = self.tape.ensure_capacity(cp.max(dp));
        if grown > 0 {
            trace!(grown, tape_len = self.tape.len(), "tape grown");
        }

        let byte = self.tape.read(cp);
        let op = Opcode::decode(byte);
        trace!(step = self.steps, cp, dp, ?op, "decode");

        match op {
            Opcode::Right => {
                self.dp += 1;
                self.cp += 1;
            }
            Opcode::Left => {
                self.dp -= 1;
                self.cp += 1;
            }
            Opcode::Print => {
                console.emit_byte(self.tape.read(dp))?;
                self.cp += 1;
            }
            Opcode::Input => {
                let input = console.read_byte()?;
                self.tape.write(dp, input);
                self.cp += 1;
            }
            Opcode::Halt => {
                console.emit_byte(b'\n')?;
                console.flush()?;
                debug!(steps = self.steps, mixes = self.mixes, "halted");
                return Ok(Status::Halted);
            }
            Opcode::Set => {
                let value = self.tape.read(cp + 1);
                self.tape.write(dp, value);
                self.cp += 2;
            }
            Opcode::Jump => {
                let pair = parse_pair(self.tape.as_bytes(), cp + 2, self.config.tape_limit)?;
                let offset = if self.tape.read(dp) == self.tape.read(cp + 1) {
                    pair.on_equal
                } else {
                    pair.on_differ
                };
                self.cp += offset;
            }
            Opcode::Unknown(b) => match self.mode {
                Mode::Strict => return Err(Fault::InvalidInstruction(b)),
                Mode::Chaotic => self.mix(cp),
            },
        }

        Ok(Status::Running)
    }

    fn mix(&mut self, target: usize) {
        mix(&mut self.digest, &mut self.tape, &mut self.secret, target);
        self.mixes += 1;
    }
}
