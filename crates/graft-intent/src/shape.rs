//! Textual shape helpers shared by the classifier and its consumers.
//!
//! These predicates describe what a line or block *looks like*; they make no
//! claim about what it means to a compiler.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lines that declare a dependency: `import`, `from … import`, `use`,
/// `#include`, and `require(…)` bound to a variable.
pub fn is_import_line(line: &str) -> bool {
    let t = line.trim_start();
    if t.starts_with("import ") || t.starts_with("use ") || t.starts_with("#include") {
        return true;
    }
    if t.starts_with("from ") && t.contains(" import ") {
        return true;
    }
    if t.contains("require(") {
        return t.starts_with("const ") || t.starts_with("let ") || t.starts_with("var ");
    }
    false
}

/// Comment-only lines across the comment styles the classifier recognizes.
pub fn is_comment_line(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("//")
        || t.starts_with('*')
        || t.starts_with("/*")
        || t.starts_with("<!--")
        || (t.starts_with('#') && !t.starts_with("#!"))
}

pub fn is_shebang(line: &str) -> bool {
    line.trim_start().starts_with("#!")
}

static PATH_COMMENT_FORMS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^//\s*(\S+)\s*$",
        r"^#\s*(\S+)\s*$",
        r"^/\*\s*(\S+)\s*\*/\s*$",
        r"^<!--\s*(\S+)\s*-->\s*$",
        r#"^"""\s*(\S+)\s*"""\s*$"#,
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static MARKDOWN_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+(.+)$").unwrap());

/// Extracts a file path from a line shaped like a path-bearing comment:
/// `// src/app.ts`, `# tools/run.py`, `/* a/b.c */`, `<!-- x.html -->`,
/// `""" m.py """`.
pub fn path_from_comment(line: &str) -> Option<String> {
    let line = line.trim();
    if is_shebang(line) {
        return None;
    }
    for form in PATH_COMMENT_FORMS.iter() {
        if let Some(captures) = form.captures(line) {
            let candidate = &captures[1];
            if looks_like_file_path(candidate) {
                return Some(candidate.to_string());
            }
        }
    }
    None
}

/// Extracts a file path from a markdown heading naming a file, e.g.
/// ``## `utils/date.ts` ``.
pub fn path_from_heading(line: &str) -> Option<String> {
    let captures = MARKDOWN_HEADING.captures(line.trim())?;
    for token in captures[1].split_whitespace() {
        let token = token.trim_matches(|c| matches!(c, '`' | '*' | '_' | ':' | ','));
        if looks_like_file_path(token) {
            return Some(token.to_string());
        }
    }
    None
}

/// Either header form: path-bearing comment first, then heading.
pub fn path_from_first_line(line: &str) -> Option<String> {
    path_from_comment(line).or_else(|| path_from_heading(line))
}

/// Splits a `lang:path` fence tag into its language and path halves.
pub fn language_tag_path(tag: &str) -> Option<(&str, &str)> {
    let (lang, path) = tag.split_once(':')?;
    let path = path.trim();
    if path.is_empty() || path.contains(char::is_whitespace) {
        return None;
    }
    if looks_like_file_path(path) || path.contains('/') {
        return Some((lang.trim(), path));
    }
    None
}

/// Removes a leading path-bearing header line (comment or heading form) so
/// the path does not end up inside the created file.
pub fn strip_path_header(code: &str) -> &str {
    let trimmed = code.trim_start();
    let first_line = trimmed.lines().next().unwrap_or("");
    if path_from_first_line(first_line).is_none() {
        return code;
    }
    match trimmed.split_once('\n') {
        Some((_, rest)) => rest.trim_start_matches(['\r', '\n']),
        None => "",
    }
}

fn looks_like_file_path(candidate: &str) -> bool {
    if candidate.contains("://") || candidate.starts_with('-') {
        return false;
    }
    let name = candidate.rsplit('/').next().unwrap_or(candidate);
    match name.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty()
                && (1..=10).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        }
        None => false,
    }
}

static ENTRY_POINT_FORMS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?m)^\s*fn main\s*\(",
        r"(?m)^\s*def main\s*\(",
        r#"(?m)^\s*if __name__ == ['"]__main__['"]"#,
        r"(?m)^\s*(?:async\s+)?function main\s*\(",
        r"public static void main",
        r"\.listen\s*\(",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

fn has_entry_point(code: &str) -> bool {
    ENTRY_POINT_FORMS.iter().any(|form| form.is_match(code))
}

fn has_export(code: &str) -> bool {
    code.lines().any(|line| {
        let t = line.trim_start();
        t.starts_with("export ") || t.starts_with("pub ") || t.contains("module.exports")
    })
}

fn has_import_near_top(code: &str) -> bool {
    code.lines()
        .filter(|line| !line.trim().is_empty())
        .take(5)
        .any(is_import_line)
}

/// A block "looks like a complete file" when at least two of these hold:
/// a shebang, an import near the top, a recognizable entry point, an export.
pub fn looks_like_complete_file(code: &str) -> bool {
    let trimmed = code.trim_start();
    let signals = [
        is_shebang(trimmed.lines().next().unwrap_or("")),
        has_import_near_top(trimmed),
        has_entry_point(trimmed),
        has_export(trimmed),
    ];
    signals.iter().filter(|present| **present).count() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_lines_across_languages() {
        assert!(is_import_line("import { useState } from 'react';"));
        assert!(is_import_line("from collections import defaultdict"));
        assert!(is_import_line("use std::fmt;"));
        assert!(is_import_line("#include <stdio.h>"));
        assert!(is_import_line("const fs = require('fs');"));

        assert!(!is_import_line("from the start"));
        assert!(!is_import_line("importantly, this is prose"));
        assert!(!is_import_line("fs.require(thing)"));
    }

    #[test]
    fn path_comment_forms() {
        assert_eq!(
            path_from_first_line("// src/app.ts"),
            Some("src/app.ts".to_string())
        );
        assert_eq!(
            path_from_first_line("# tools/run.py"),
            Some("tools/run.py".to_string())
        );
        assert_eq!(
            path_from_first_line("/* lib/util.c */"),
            Some("lib/util.c".to_string())
        );
        assert_eq!(
            path_from_first_line("<!-- index.html -->"),
            Some("index.html".to_string())
        );
        assert_eq!(
            path_from_first_line(r#"""" models.py """"#),
            Some("models.py".to_string())
        );
    }

    #[test]
    fn heading_with_filename() {
        assert_eq!(
            path_from_first_line("## `utils/date.ts`"),
            Some("utils/date.ts".to_string())
        );
        assert_eq!(path_from_first_line("# Overview"), None);
    }

    #[test]
    fn rejects_non_path_comments_and_shebangs() {
        assert_eq!(path_from_first_line("// TODO fix this"), None);
        assert_eq!(path_from_first_line("// see https://example.com/a.ts"), None);
        assert_eq!(path_from_first_line("#!/usr/bin/env python"), None);
    }

    #[test]
    fn lang_tag_paths() {
        assert_eq!(
            language_tag_path("ts:src/app.ts"),
            Some(("ts", "src/app.ts"))
        );
        assert_eq!(language_tag_path("python"), None);
        assert_eq!(language_tag_path("ts: "), None);
    }

    #[test]
    fn strips_path_headers_only() {
        assert_eq!(
            strip_path_header("// src/app.ts\nexport const x = 1;\n"),
            "export const x = 1;\n"
        );
        assert_eq!(
            strip_path_header("export const x = 1;\n"),
            "export const x = 1;\n"
        );
        assert_eq!(strip_path_header("// src/app.ts"), "");
    }

    #[test]
    fn complete_file_needs_two_signals() {
        let complete = "#!/usr/bin/env node\nconst http = require('http');\nconsole.log('hi');\n";
        assert!(looks_like_complete_file(complete));

        let module = "import fs from 'fs';\n\nexport function read() {}\n";
        assert!(looks_like_complete_file(module));

        let fragment = "const x = compute();\nconsole.log(x);\n";
        assert!(!looks_like_complete_file(fragment));

        let import_only = "import fs from 'fs';\nconst data = fs.readFileSync('x');\n";
        assert!(!looks_like_complete_file(import_only));
    }
}
