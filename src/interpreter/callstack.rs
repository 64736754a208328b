use crate::parser::Coords;

/// One in-progress call, recorded for diagnostics only.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub coords: Coords,
    /// `fun`, `macro`, `native`, or the type of the value that was called.
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CallStack(Vec<Frame>);

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        log::trace!("{:>depth$}-> {}() at {}", "", frame.name, frame.coords, depth = self.0.len());
        self.0.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.0.pop()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.0.last()
    }

    /// Coordinates of the innermost call, or the native origin at top level.
    pub fn current_coords(&self) -> Coords {
        self.top().map(|f| f.coords.clone()).unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Frames innermost first.
    pub fn snapshot(&self) -> Vec<Frame> {
        self.0.iter().rev().cloned().collect()
    }
}
