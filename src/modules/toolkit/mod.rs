//! Offline tools over the checker ABI: selector table, encode, decode

pub mod decode;
pub mod encode;
pub mod selector;

/// Result of a toolkit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub title: String,
    pub content: Vec<(String, String)>, // (label, value) pairs
}

impl ToolResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    pub fn add(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.content.push((label.into(), value.into()));
        self
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.content
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, value)| value.as_str())
    }

    /// Title line followed by aligned `label  value` rows
    pub fn render(&self) -> String {
        let width = self
            .content
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0);
        let mut out = self.title.clone();
        for (label, value) in &self.content {
            out.push('\n');
            out.push_str(&format!("  {label:<width$}  {value}"));
        }
        out
    }
}

pub(crate) fn strip_hex(input: &str) -> &str {
    let input = input.trim();
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}
