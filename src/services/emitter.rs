use crate::model::error::{DumpError, DumpResult};
use std::io::{self, Write};

/// Writes each object's decoded text, followed by a newline, to the output sink
pub struct Emitter<W: Write> {
    out: W,
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Emitter { out }
    }

    /// Write `text` and a trailing `\n` as one unit, then flush.
    pub fn emit(&mut self, text: &str) -> DumpResult<()> {
        let out = &mut self.out;
        let mut write = || -> io::Result<()> {
            out.write_all(text.as_bytes())?;
            out.write_all(b"\n")?;
            out.flush()
        };
        write().map_err(|e| DumpError::Output(e.to_string()))
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
