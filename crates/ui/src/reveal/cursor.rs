/// Position inside a fully known text, advanced in whole characters so every
/// revealed prefix is valid UTF-8.
#[derive(Debug, Clone)]
pub struct RevealCursor {
    text: String,
    /// Byte offset of every char boundary after the first, ending at `text.len()`
    boundaries: Vec<usize>,
    revealed: usize,
}

impl RevealCursor {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let boundaries = text
            .char_indices()
            .skip(1)
            .map(|(offset, _)| offset)
            .chain((!text.is_empty()).then_some(text.len()))
            .collect();
        Self { text, boundaries, revealed: 0 }
    }

    /// Reveal up to `chars` more characters and return the visible prefix
    pub fn advance(&mut self, chars: usize) -> &str {
        self.revealed = (self.revealed + chars).min(self.boundaries.len());
        self.revealed_text()
    }

    pub fn revealed_text(&self) -> &str {
        match self.revealed {
            0 => "",
            n => &self.text[..self.boundaries[n - 1]],
        }
    }

    /// Characters not yet revealed
    pub fn remaining(&self) -> usize {
        self.boundaries.len() - self.revealed
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn into_full_text(self) -> String {
        self.text
    }
}
