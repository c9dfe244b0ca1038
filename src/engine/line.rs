use derive_new::new;

/// A single line of a file together with the normalized key used for
/// equality testing.
///
/// The key is produced upstream (see the `preprocessing` module) and is
/// opaque to the engine. The original text is kept for display only.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Line {
    pub text: String,
    pub key: String,
}

/// An ordered sequence of lines; a line's 0-based index is its identity
/// for diff purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSequence {
    lines: Vec<Line>,
}

impl FileSequence {
    pub fn new(lines: Vec<Line>) -> Self {
        FileSequence { lines }
    }

    /// Build a sequence whose keys are the raw line texts, untouched.
    pub fn verbatim<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = texts
            .into_iter()
            .map(|text| {
                let text = text.into();
                let key = text.clone();
                Line::new(text, key)
            })
            .collect();
        FileSequence { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn keys(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
