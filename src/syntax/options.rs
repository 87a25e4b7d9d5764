//! Serialization options

/// Line terminator used between structural lines
///
/// Text inside `<pre>` blocks and code snippets is written unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Options for writing a mind map as MMD text
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Free text line before the header attributes (`None` = no head line)
    pub header: Option<String>,
    /// Number of `-` in the header delimiter line
    pub delimiter_width: usize,
    pub line_ending: LineEnding,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            header: Some("Mind Map generated by mmd-base".to_string()),
            delimiter_width: 3,
            line_ending: LineEnding::Lf,
        }
    }
}

impl SerializeOptions {
    /// The delimiter line without its terminator
    pub fn delimiter(&self) -> String {
        "-".repeat(self.delimiter_width.max(1))
    }
}
