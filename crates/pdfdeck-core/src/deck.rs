use crate::slide::Slide;

/// Bounded cursor over an immutable slide sequence.
///
/// The slides are fixed at construction; a new generation builds a new
/// `Deck`. Moving past either end is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    slides: Vec<Slide>,
    cursor: usize,
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self { slides, cursor: 0 }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Index of the current slide, or `None` when there are no slides.
    pub fn position(&self) -> Option<usize> {
        (!self.slides.is_empty()).then_some(self.cursor)
    }

    pub fn current(&self) -> Option<&Slide> {
        self.slides.get(self.cursor)
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        self.cursor + 1 >= self.slides.len()
    }

    pub fn next(&mut self) {
        if self.cursor + 1 < self.slides.len() {
            self.cursor += 1;
        }
    }

    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.cursor = 0;
    }

    pub fn last(&mut self) {
        self.cursor = self.slides.len().saturating_sub(1);
    }

    /// Drop every slide and rewind; used when a new document or generation
    /// supersedes the deck.
    pub fn reset(&mut self) {
        self.slides.clear();
        self.cursor = 0;
    }

    /// "Slide k / n" style label; `None` when empty.
    pub fn progress_label(&self) -> Option<String> {
        self.position()
            .map(|idx| format!("Slide {} / {}", idx + 1, self.slides.len()))
    }
}
