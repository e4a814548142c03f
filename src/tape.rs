/// Blank value of freshly appended cells.
pub const BLANK: u8 = 0;

/// The machine's byte memory.
///
/// Cells are addressed by index, never by reference, so growth can't
/// invalidate anything a caller holds. The tape only ever grows; bounds
/// against the hard cap are the dispatcher's business.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u8>,
}

impl Tape {
    /// Program image at the front, followed by `blank_len` blank cells.
    pub fn new(program: &[u8], blank_len: usize) -> Self {
        let mut cells = Vec::with_capacity(program.len() + blank_len);
        cells.extend_from_slice(program);
        cells.resize(program.len() + blank_len, BLANK);
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Panics if `i` is past the end; callers go through `ensure_capacity`.
    #[inline(always)]
    pub fn read(&self, i: usize) -> u8 {
        self.cells[i]
    }

    /// Writes a cell, growing the tape first if `i` isn't covered yet.
    #[inline(always)]
    pub fn write(&mut self, i: usize, byte: u8) {
        self.ensure_capacity(i);
        self.cells[i] = byte;
    }

    /// Append blank cells until `len() > i + 2`, so `i + 1` and `i + 2` are
    /// readable. Returns how many cells were appended.
    pub fn ensure_capacity(&mut self, i: usize) -> usize {
        let before = self.cells.len();
        let wanted = i.saturating_add(3);
        if before < wanted {
            self.cells.resize(wanted, BLANK);
        }
        self.cells.len() - before
    }
}
