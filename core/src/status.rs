/// Prefix put in front of every status line
pub const STATUS_PREFIX: &str = "Status: ";
/// Value shown before the first status request completes
pub const STATUS_UNKNOWN: &str = "Unknown";
/// Value shown when a status request fails
pub const STATUS_ERROR: &str = "error";

/// The status text shown in the panel
///
/// Every completed status request overwrites the text, so the line always
/// reflects whichever request finished last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            text: format!("{STATUS_PREFIX}{STATUS_UNKNOWN}"),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a status reported by the server, verbatim
    pub fn report(&mut self, status: &str) {
        self.text = format!("{STATUS_PREFIX}{status}");
    }

    /// Show the fixed error indicator
    pub fn error(&mut self) {
        self.text = format!("{STATUS_PREFIX}{STATUS_ERROR}");
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.text.strip_prefix(STATUS_PREFIX) == Some(STATUS_ERROR)
    }
}
