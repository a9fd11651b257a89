use std::fmt::Write;

/// Writes opening and closing parentheses while counting how many are still open.
///
/// The stack owns its destination and forwards all other text to it, so renderers can
/// interleave content and delimiters through a single handle.
pub struct ParenStack<W> {
    writer: W,
    depth: usize,
}

impl<W: Write> ParenStack<W> {
    pub fn new(writer: W) -> Self {
        ParenStack { writer, depth: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn push(&mut self) -> std::fmt::Result {
        self.writer.write_char('(')?;
        self.depth += 1;

        Ok(())
    }

    /// Closes the innermost open parenthesis. Does nothing if none is open.
    pub fn pop(&mut self) -> std::fmt::Result {
        if self.depth == 0 {
            return Ok(());
        }

        self.writer.write_char(')')?;
        self.depth -= 1;

        Ok(())
    }

    pub fn close_all(&mut self) -> std::fmt::Result {
        while !self.is_empty() {
            self.pop()?;
        }

        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Write for ParenStack<W> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.writer.write_str(s)
    }
}
