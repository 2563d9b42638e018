//! Column header of the switchshow port table.

/// Token that marks the column header line.
const HEADER_MARKER: &str = "Speed";

/// The port table's column header and the layout facts derived from it.
///
/// ```text
/// Index Slot Port Address Media Speed State     Proto
/// ==================================================
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderContext {
    line: String,
    has_slot: bool,
    has_address: bool,
}

impl HeaderContext {
    /// Capture a header line.
    pub fn new(line: &str) -> Self {
        let line = line.trim().to_string();
        Self {
            has_slot: line.contains("Slot"),
            has_address: line.contains("Address"),
            line,
        }
    }

    /// Check if a line is the column header.
    pub fn is_header(line: &str) -> bool {
        line.contains(HEADER_MARKER)
    }

    /// Check if a line is the rule between header and table body.
    pub fn is_separator(line: &str) -> bool {
        let line = line.trim();
        line.len() >= 3 && line.chars().all(|c| c == '=')
    }

    /// The header line as captured.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Ports are qualified by slot (bladed chassis).
    pub fn has_slot(&self) -> bool {
        self.has_slot
    }

    /// Lines carry a fabric address column.
    pub fn has_address(&self) -> bool {
        self.has_address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bladed_header() {
        let header = HeaderContext::new("Index Slot Port Address Media Speed State     Proto");
        assert!(header.has_slot());
        assert!(header.has_address());
    }

    #[test]
    fn test_fixed_header() {
        let header = HeaderContext::new("Area Port Media Speed State");
        assert!(!header.has_slot());
        assert!(!header.has_address());
        assert_eq!(header.line(), "Area Port Media Speed State");
    }

    #[test]
    fn test_separator() {
        assert!(HeaderContext::is_separator("=============================================="));
        assert!(HeaderContext::is_separator("  ======  "));
        assert!(!HeaderContext::is_separator(""));
        assert!(!HeaderContext::is_separator("==> not a rule"));
    }

    #[test]
    fn test_is_header() {
        assert!(HeaderContext::is_header("Index Port Address Media Speed State Proto"));
        assert!(!HeaderContext::is_header("switchState:    Online"));
    }
}
