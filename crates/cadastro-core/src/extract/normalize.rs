//! Input normalization.

/// Characters that OCR engines and copy-paste leave behind but never carry
/// content.
const INVISIBLE: [char; 6] = [
    '\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}', '\u{00AD}',
];

/// Line separators other than `\n`.
const LINE_BREAKS: [char; 4] = ['\r', '\u{2028}', '\u{2029}', '\u{0085}'];

/// Ordered, trimmed, non-empty lines of one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInput {
    lines: Vec<String>,
    full_text: String,
}

impl RawInput {
    /// Normalized lines in input order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined with `\n`.
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Normalize raw text blocks into a [`RawInput`].
///
/// Blocks are joined with line breaks, every line-break variant becomes
/// `\n`, invisible characters are removed, whitespace runs collapse to a
/// single space and empty lines are dropped. Never fails.
pub fn normalize<S: AsRef<str>>(blocks: &[S]) -> RawInput {
    let joined = blocks
        .iter()
        .map(|b| b.as_ref())
        .collect::<Vec<_>>()
        .join("\n");

    let unified = joined
        .replace("\r\n", "\n")
        .replace(&LINE_BREAKS[..], "\n");

    let lines: Vec<String> = unified
        .split('\n')
        .map(clean_line)
        .filter(|l| !l.is_empty())
        .collect();

    let full_text = lines.join("\n");

    RawInput { lines, full_text }
}

fn clean_line(line: &str) -> String {
    let visible: String = line.chars().filter(|c| !INVISIBLE.contains(c)).collect();
    visible.split_whitespace().collect::<Vec<_>>().join(" ")
}
