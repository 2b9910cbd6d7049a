// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name resolution and filename sanitization.

use super::registry::EventRegistry;
use specline_tree::SuiteId;

/// Resolves the fully-qualified name for a suite.
///
/// Dot-notation mode (and any filename use) walks the ancestor chain and
/// joins descriptions root-to-leaf with `.`; otherwise the framework's own
/// full name is used with markup-unsafe characters escaped. Filenames retain
/// only word characters and literal dots — everything else is dropped, not
/// encoded.
pub(crate) fn qualified_suite_name(
    registry: &EventRegistry,
    id: &SuiteId,
    for_filename: bool,
    use_dot_notation: bool,
) -> String {
    let full_name = if use_dot_notation || for_filename {
        let mut parts = Vec::new();
        let mut cursor = Some(id.clone());
        while let Some(current) = cursor {
            match registry.suite(&current) {
                Some(entry) => {
                    parts.push(entry.node.description.clone());
                    cursor = entry.parent_id().cloned();
                }
                None => break,
            }
        }
        parts.reverse();
        parts.join(".")
    } else {
        registry
            .suite(id)
            .map(|entry| entry.node.full_name.clone())
            .unwrap_or_default()
    };

    if for_filename {
        full_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
            .collect()
    } else {
        escape_markup(&full_name)
    }
}

/// Escapes characters that are unsafe to embed in markup-bearing formats.
pub(crate) fn escape_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Reduces a description to a safe screenshot filename: whitespace runs
/// become a single dash, anything else outside `[A-Za-z0-9-]` is dropped.
pub(crate) fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('-');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            if c.is_ascii_alphanumeric() || c == '-' {
                out.push(c);
            }
        }
    }
    out
}
