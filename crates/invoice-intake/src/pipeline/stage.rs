use std::fmt;

/// Per-file pipeline states, in the only order they may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Detected,
    Stabilizing,
    Extracting,
    Classified,
    Relocating,
    /// Terminal for every accepted file.
    Logged,
}

impl Stage {
    pub const ORDER: [Stage; 6] = [
        Stage::Detected,
        Stage::Stabilizing,
        Stage::Extracting,
        Stage::Classified,
        Stage::Relocating,
        Stage::Logged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Detected => "detected",
            Stage::Stabilizing => "stabilizing",
            Stage::Extracting => "extracting",
            Stage::Classified => "classified",
            Stage::Relocating => "relocating",
            Stage::Logged => "logged",
        }
    }

    pub fn next(&self) -> Option<Stage> {
        let index = Self::ORDER.iter().position(|s| s == self)?;
        Self::ORDER.get(index + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Logged)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
