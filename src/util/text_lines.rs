use std::io;

/// Line-at-a-time builder for generated text (Dockerfiles).
///
/// Each pushed fragment is one instruction line. A fragment carrying `\n`, `\r` or `\0`
/// (usually a version string read from a project file) is remembered and makes `build_lf`
/// fail, so a value can never smuggle in an extra instruction. Empty lines are fine.
#[derive(Debug, Default)]
pub struct TextLines {
    lines: Vec<String>,
    first_bad: Option<usize>,
}

fn is_atomic(line: &str) -> bool {
    !line.contains(['\n', '\r', '\0'])
}

impl TextLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) -> &mut Self {
        let line = line.into();
        if self.first_bad.is_none() && !is_atomic(&line) {
            self.first_bad = Some(self.lines.len());
        }
        self.lines.push(line);
        self
    }

    pub fn extend<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for l in lines {
            self.push(l);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join with `\n`, terminating a non-empty result with `\n`.
    pub fn build_lf(&self) -> io::Result<String> {
        if let Some(i) = self.first_bad {
            let preview: String = self.lines[i].escape_debug().take(60).collect();
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("generated line {} is not a single line: {preview}", i + 1),
            ));
        }
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for l in &self.lines {
            out.push_str(l);
            out.push('\n');
        }
        Ok(out)
    }
}
