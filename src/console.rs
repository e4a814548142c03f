use std::io::{self, BufRead, Write};

use crate::config::EOF_SENTINEL;

/// The machine's view of the outside world: one byte out, one byte in.
pub trait Console {
    /// Emit a tape cell, rendered per `render_byte`.
    fn emit_byte(&mut self, byte: u8) -> io::Result<()>;

    /// Blocking read of one input byte. Exhausted input yields `EOF_SENTINEL`.
    fn read_byte(&mut self) -> io::Result<u8>;

    fn flush(&mut self) -> io::Result<()>;
}

/// Newlines and printable ASCII pass through; anything else becomes `0x`
/// followed by unpadded lowercase hex.
pub fn render_byte<W: Write>(byte: u8, out: &mut W) -> io::Result<()> {
    if byte == b'\n' || is_printable(byte) {
        out.write_all(&[byte])
    } else {
        write!(out, "0x{byte:x}")
    }
}

/// `render_byte` into a `String`, for diagnostics.
pub fn escape_byte(byte: u8) -> String {
    let mut out = Vec::with_capacity(4);
    // Writing into a Vec can't fail.
    let _ = render_byte(byte, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

#[inline(always)]
fn is_printable(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}

/// A console over any reader and writer.
pub struct Stream<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Stream<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl Stream<io::StdinLock<'static>, io::BufWriter<io::Stdout>> {
    /// Process stdin and a buffered stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::BufWriter::new(io::stdout()))
    }
}

impl<R: BufRead, W: Write> Console for Stream<R, W> {
    fn emit_byte(&mut self, byte: u8) -> io::Result<()> {
        render_byte(byte, &mut self.output)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        // Whatever was printed so far should be visible before we block.
        self.output.flush()?;
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => return Ok(EOF_SENTINEL),
                Ok(_) => return Ok(buf[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(bytes: &[u8]) -> String {
        let mut out = Vec::new();
        for &b in bytes {
            render_byte(b, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_printable_verbatim() {
        assert_eq!(rendered(b"Hi there~ "), "Hi there~ ");
    }

    #[test]
    fn test_newline_verbatim() {
        assert_eq!(rendered(b"a\nb"), "a\nb");
    }

    #[test]
    fn test_unprintable_as_unpadded_hex() {
        assert_eq!(rendered(&[0x00, 0x09, 0x7f, 0xab, 0xff]), "0x00x90x7f0xab0xff");
    }

    #[test]
    fn test_read_bytes_then_sentinel() {
        let mut console = Stream::new(&b"xy"[..], Vec::new());
        assert_eq!(console.read_byte().unwrap(), b'x');
        assert_eq!(console.read_byte().unwrap(), b'y');
        assert_eq!(console.read_byte().unwrap(), EOF_SENTINEL);
        assert_eq!(console.read_byte().unwrap(), EOF_SENTINEL);
    }

    #[test]
    fn test_emit_goes_to_output() {
        let mut console = Stream::new(&b""[..], Vec::new());
        console.emit_byte(b'o').unwrap();
        console.emit_byte(0x01).unwrap();
        console.flush().unwrap();
        assert_eq!(console.into_output(), b"o0x1");
    }
}
