// OutlierCrab - GPL-3.0-or-later
// This file is part of OutlierCrab.
//
// Copyright (C) 2026 OutlierCrab contributors
//
// OutlierCrab is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// OutlierCrab is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with OutlierCrab.  If not, see <https://www.gnu.org/licenses/>.

//! Greedy hard-wrapping of summary text.

const TAB_SIZE: usize = 8;

/// Wrap `text` into lines of at most `width` characters joined by `\n`.
///
/// Tabs expand to the next multiple of eight columns and other line-break
/// characters become spaces. Lines break only at runs of spaces; the run at
/// a break is dropped. A word longer than `width` gets a line of its own.
pub fn fill(text: &str, width: usize) -> String {
    let width = width.max(1);
    let normalized = normalize_whitespace(text);
    let chunks = split_chunks(&normalized);

    let mut lines: Vec<String> = Vec::new();
    let mut i = 0;

    while i < chunks.len() {
        if !lines.is_empty() && is_space(chunks[i]) {
            i += 1;
            continue;
        }

        let mut line: Vec<&str> = Vec::new();
        let mut line_len = 0;
        while i < chunks.len() {
            let chunk_len = chunks[i].chars().count();
            if line_len + chunk_len > width {
                break;
            }
            line.push(chunks[i]);
            line_len += chunk_len;
            i += 1;
        }

        if line.is_empty() {
            line.push(chunks[i]);
            i += 1;
        }

        if line.last().is_some_and(|chunk| is_space(chunk)) {
            line.pop();
        }
        if !line.is_empty() {
            lines.push(line.concat());
        }
    }

    lines.join("\n")
}

fn is_space(chunk: &str) -> bool {
    chunk.starts_with(' ')
}

fn normalize_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut column = 0;

    for c in text.chars() {
        match c {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                normalized.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' | '\r' => {
                normalized.push(' ');
                column = 0;
            }
            '\x0b' | '\x0c' => {
                normalized.push(' ');
                column += 1;
            }
            other => {
                normalized.push(other);
                column += 1;
            }
        }
    }
    normalized
}

/// Alternating runs of spaces and non-spaces.
fn split_chunks(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut in_space = None;

    for (idx, c) in text.char_indices() {
        let space = c == ' ';
        if in_space.is_some_and(|previous| previous != space) {
            chunks.push(&text[start..idx]);
            start = idx;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}
