//! Code fence detection.
//!
//! Image tags inside fenced code blocks are documentation of the syntax, not
//! invocations, so the processor leaves them alone.

use std::ops::Range;

/// Tracks code fence state during line-by-line scanning.
///
/// Fences use backticks or tildes (three or more). The closing fence must use
/// the same character and be at least as long as the opening fence.
#[derive(Debug, Default)]
struct FenceTracker {
    fence_char: Option<char>,
    fence_len: usize,
}

impl FenceTracker {
    fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Feed one line. Returns `true` if it opened or closed a fence.
    fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        if let Some(fence_char) = self.fence_char {
            if is_closing_fence(trimmed, fence_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
                return true;
            }
            false
        } else if let Some((ch, len)) = detect_fence(trimmed) {
            self.fence_char = Some(ch);
            self.fence_len = len;
            true
        } else {
            false
        }
    }
}

fn detect_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

fn is_closing_fence(trimmed: &str, expected: char, min_len: usize) -> bool {
    if !trimmed.starts_with(expected) {
        return false;
    }

    let count = trimmed.chars().take_while(|&c| c == expected).count();
    count >= min_len && trimmed[count..].chars().all(char::is_whitespace)
}

/// Byte ranges of fenced code blocks in `text`, fence lines included.
///
/// An unclosed fence runs to the end of the text.
pub(crate) fn fenced_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut tracker = FenceTracker::default();
    let mut open_at = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let was_open = tracker.in_fence();
        if tracker.update(line) {
            if was_open {
                if let Some(start) = open_at.take() {
                    ranges.push(start..offset + line.len());
                }
            } else {
                open_at = Some(offset);
            }
        }
        offset += line.len();
    }

    if let Some(start) = open_at {
        ranges.push(start..text.len());
    }
    ranges
}
