/// Position within a product's pictures. Navigation wraps around both ends;
/// with no pictures every move is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageCarousel {
    index: usize,
    len: usize,
}

impl ImageCarousel {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.index
    }

    pub fn prev(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.index
    }

    /// Jump to a thumbnail; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.len {
            self.index = index;
            true
        } else {
            false
        }
    }

    /// The picture at the current position
    pub fn current<'a>(&self, pictures: &'a [String]) -> Option<&'a str> {
        pictures.get(self.index).map(String::as_str)
    }

    /// "2 / 5"; `None` when there is nothing to page through
    pub fn position_label(&self) -> Option<String> {
        (self.len > 1).then(|| format!("{} / {}", self.index + 1, self.len))
    }
}
