//! Forward-only splice buffer for WHERE-clause rewriting.

/// Cursor state for reconstructing a source slice with targeted
/// replacements. The cursor only moves forward; at any point the output
/// equals the source from the slice start up to the cursor, modulo the
/// replacements already applied.
pub(crate) struct RewriteCursor<'a> {
    source: &'a str,
    cursor: usize,
    end: usize,
    output: String,
}

impl<'a> RewriteCursor<'a> {
    pub(crate) fn new(source: &'a str, start: usize, end: usize) -> Self {
        Self {
            source,
            cursor: start,
            end,
            output: String::with_capacity(end.saturating_sub(start)),
        }
    }

    /// Copy verbatim source text up to `to` and advance.
    pub(crate) fn copy_to(&mut self, to: usize) {
        debug_assert!(to >= self.cursor, "rewrite cursor only moves forward");
        if to > self.cursor {
            self.output.push_str(&self.source[self.cursor..to]);
            self.cursor = to;
        }
    }

    /// Emit `replacement` in place of the source text up to `to`.
    pub(crate) fn replace_to(&mut self, to: usize, replacement: &str) {
        debug_assert!(to >= self.cursor, "rewrite cursor only moves forward");
        self.output.push_str(replacement);
        self.cursor = to;
    }

    /// Copy the remaining tail and yield the reconstructed text.
    pub(crate) fn finish(mut self) -> String {
        let end = self.end;
        self.copy_to(end);
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_untouched_text_verbatim() {
        let cursor = RewriteCursor::new("a = 1 AND b = 2", 0, 15);
        assert_eq!(cursor.finish(), "a = 1 AND b = 2");
    }

    #[test]
    fn replaces_a_middle_span() {
        let source = "x.a = 1";
        let mut cursor = RewriteCursor::new(source, 0, source.len());
        cursor.replace_to(3, "y.b");
        assert_eq!(cursor.finish(), "y.b = 1");
    }
}
