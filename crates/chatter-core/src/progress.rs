//! Status text shown while a reply is being fetched.

/// Animation frames cycled while no percentage is known.
const FRAMES: [&str; 4] = ["", ".", "..", "..."];

/// Indeterminate dot animation, or a percentage once one is known.
#[derive(Debug, Clone)]
pub struct ProgressIndicator {
    source: String,
    frame: usize,
    percent: Option<u8>,
}

impl ProgressIndicator {
    /// `source` names what is being fetched from (the assistant label).
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            frame: 0,
            percent: None,
        }
    }

    pub fn set_percent(&mut self, percent: u8) {
        self.percent = Some(percent);
    }

    pub fn percent(&self) -> Option<u8> {
        self.percent
    }

    /// Current status text.
    pub fn label(&self) -> String {
        match self.percent {
            Some(pct) => format!("Fetching from {}... {}%", self.source, pct),
            None => format!("Fetching from {}{}", self.source, FRAMES[self.frame]),
        }
    }

    /// Return the current text and move to the next animation frame.
    pub fn advance(&mut self) -> String {
        let label = self.label();
        self.frame = (self.frame + 1) % FRAMES.len();
        label
    }
}
