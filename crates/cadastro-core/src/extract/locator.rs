//! Label-proximity search.

use super::labels::LabelIndex;
use crate::models::record::Field;

/// Where to look for a value relative to its label line.
#[derive(Debug, Clone, Copy)]
pub struct LocateOptions {
    /// Accept a value printed after the label on the same line.
    pub same_line: bool,
    /// Accept a value on one of the following lines.
    pub next_lines: bool,
    /// How many non-blank lines after the label to inspect.
    pub lookahead: usize,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            same_line: true,
            next_lines: true,
            lookahead: 3,
        }
    }
}

impl LocateOptions {
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }
}

/// Finds field values next to their labels.
pub struct LabelLocator<'a> {
    labels: &'a LabelIndex,
}

impl<'a> LabelLocator<'a> {
    pub fn new(labels: &'a LabelIndex) -> Self {
        Self { labels }
    }

    /// Return the first value near a `field` label that `validate` accepts.
    pub fn locate<F>(
        &self,
        lines: &[String],
        field: Field,
        options: LocateOptions,
        validate: F,
    ) -> Option<String>
    where
        F: Fn(&str) -> bool,
    {
        self.locate_map(lines, field, options, |candidate| {
            validate(candidate).then(|| candidate.to_string())
        })
    }

    /// Like [`locate`](Self::locate), but `accept` may transform the
    /// candidate (extract a substring, reformat digits).
    ///
    /// Scanning after a label stops at the first line that is a label for a
    /// different field or a section header, so one field never takes a
    /// value from another field's block. Label lines are never values.
    pub fn locate_map<T, F>(
        &self,
        lines: &[String],
        field: Field,
        options: LocateOptions,
        mut accept: F,
    ) -> Option<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        for (i, line) in lines.iter().enumerate() {
            let Some(hit) = self.labels.classify(line) else {
                continue;
            };
            if !hit.names(field) {
                continue;
            }

            if options.same_line {
                if let Some(value) = hit.value.as_deref() {
                    if let Some(found) = accept(value) {
                        return Some(found);
                    }
                }
            }

            if !options.next_lines {
                continue;
            }

            let mut inspected = 0;
            for next in &lines[i + 1..] {
                if inspected >= options.lookahead {
                    break;
                }
                let next = next.trim();
                if next.is_empty() {
                    continue;
                }
                inspected += 1;

                if let Some(other) = self.labels.classify(next) {
                    if other.names(field) {
                        continue;
                    }
                    break;
                }
                if self.labels.is_section_header(next) {
                    break;
                }

                if let Some(found) = accept(next) {
                    return Some(found);
                }
            }
        }

        None
    }
}
