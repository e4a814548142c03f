use crate::config::{STRICT_MAGIC, TAPE_LIMIT};
use crate::console::escape_byte;
use crate::jump::parse_pair;

const RIGHT: u8 = b'>';
const LEFT: u8 = b'<';
const PRINT: u8 = b'p';
const INPUT: u8 = b'i';
const HALT: u8 = b'H';
const SET: u8 = b's';
const JUMP: u8 = b'J';

/// A decoded instruction byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// `>`: DP += 1
    Right,
    /// `<`: DP -= 1
    Left,
    /// `p`: emit tape[DP]
    Print,
    /// `i`: tape[DP] = next input byte
    Input,
    /// `H`: newline, then stop
    Halt,
    /// `s`: tape[DP] = tape[CP+1]
    Set,
    /// `J`: conditional relative jump
    Jump,
    Unknown(u8),
}

impl Opcode {
    #[inline(always)]
    pub fn decode(byte: u8) -> Self {
        match byte {
            RIGHT => Opcode::Right,
            LEFT => Opcode::Left,
            PRINT => Opcode::Print,
            INPUT => Opcode::Input,
            HALT => Opcode::Halt,
            SET => Opcode::Set,
            JUMP => Opcode::Jump,
            other => Opcode::Unknown(other),
        }
    }
}

/// Returns true if the byte decodes to a real instruction.
pub fn is_instruction(byte: u8) -> bool {
    !matches!(Opcode::decode(byte), Opcode::Unknown(_))
}

/// Static listing of a program image, for human inspection.
///
/// This is what the program would do under strict mode with no jumps taken.
/// In chaotic mode almost none of it survives the first few steps.
pub fn disassemble(program: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    let mut pc = 0;
    if program.starts_with(STRICT_MAGIC) {
        let _ = writeln!(out, "0000: wimpmode  (strict mode)");
        pc = STRICT_MAGIC.len();
    }
    while pc < program.len() {
        let at = pc;
        let operand = |i: usize| program.get(i).copied().unwrap_or(0);
        match Opcode::decode(program[pc]) {
            Opcode::Right => {
                let _ = writeln!(out, "{at:04X}: >         dp += 1");
                pc += 1;
            }
            Opcode::Left => {
                let _ = writeln!(out, "{at:04X}: <         dp -= 1");
                pc += 1;
            }
            Opcode::Print => {
                let _ = writeln!(out, "{at:04X}: p         print [dp]");
                pc += 1;
            }
            Opcode::Input => {
                let _ = writeln!(out, "{at:04X}: i         read [dp]");
                pc += 1;
            }
            Opcode::Halt => {
                let _ = writeln!(out, "{at:04X}: H         halt");
                pc += 1;
            }
            Opcode::Set => {
                let v = operand(pc + 1);
                let _ = writeln!(out, "{at:04X}: s {v:02X}      [dp] = {}", escape_byte(v));
                pc += 2;
            }
            Opcode::Jump => {
                let cmp = operand(pc + 1);
                let shown = escape_byte(cmp);
                match parse_pair(program, pc + 2, TAPE_LIMIT) {
                    Ok(pair) if pair.span.start == pc + 2 => {
                        let _ = writeln!(
                            out,
                            "{at:04X}: J {cmp:02X}      if [dp] == {shown} goto {:+} else {:+}",
                            pair.on_equal, pair.on_differ
                        );
                        pc = pair.span.end;
                    }
                    Ok(pair) => {
                        let _ = writeln!(
                            out,
                            "{at:04X}: J {cmp:02X}      if [dp] == {shown} goto {:+} else {:+}  (operands at {:04X})",
                            pair.on_equal, pair.on_differ, pair.span.start
                        );
                        pc += 2;
                    }
                    Err(e) => {
                        let _ = writeln!(out, "{at:04X}: J {cmp:02X}      ; {e}");
                        pc += 2;
                    }
                }
            }
            Opcode::Unknown(b) => {
                let _ = writeln!(out, "{at:04X}: db 0x{b:02x}");
                pc += 1;
            }
        }
    }
    out
}
