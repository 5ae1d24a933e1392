//! Module Extractor - finds the `@module` declaration in one source file.
//!
//! A module declaration is a namespace, followed by a doc-comment carrying
//! an `@module` marker line, followed by the class the comment documents:
//!
//! ```text
//! namespace App\Mail;
//!
//! use App\Support\Queue;
//!
//! /**
//!  * Outgoing mail transport.
//!  * @module svc(priority=1) admin
//!  */
//! final class Mailer
//! {
//! ```
//!
//! This is a lexical scan, not a parser. Extraction is split into three
//! steps so each can be tested on its own:
//! - [`find_namespaces`] - namespace declarations and where they end
//! - [`find_module_marker`] - the category string of the marker line
//! - [`find_type_name`] - the class declared right after the comment
//!
//! Only the first complete declaration in a file is reported.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::category::parse_categories;
use crate::definition::ModuleDefinition;

#[allow(clippy::expect_used)]
static NAMESPACE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bnamespace\s+(\w+(?:\\\w+)*)\s*;").expect("Failed to compile namespace pattern")
});

// No `/` may appear between the namespace and the doc-comment, nor inside
// the comment before the marker.
#[allow(clippy::expect_used)]
static MARKER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A[^/]*/\*\*[^/]*@module ([\w ()=]+)\r?\n")
        .expect("Failed to compile @module marker pattern")
});

// No `{` may appear between the marker line and the class keyword.
#[allow(clippy::expect_used)]
static TYPE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A[^{]*/\s+(?:(?:abstract|final|readonly)\s+)*class\s+(\w+)")
        .expect("Failed to compile class pattern")
});

/// Find every namespace declaration in document order.
///
/// Returns `(namespace, end_offset)` pairs, where `end_offset` is the byte
/// offset just past the terminating `;`.
#[must_use]
pub fn find_namespaces(content: &str) -> Vec<(String, usize)> {
    NAMESPACE_PATTERN
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some((name.as_str().to_string(), whole.end()))
        })
        .collect()
}

/// Find the `@module` marker in the doc-comment that starts `rest`.
///
/// `rest` is the text following a namespace declaration. Returns the
/// trimmed category string and the offset just past the marker line.
#[must_use]
pub fn find_module_marker(rest: &str) -> Option<(String, usize)> {
    let caps = MARKER_PATTERN.captures(rest)?;
    let whole = caps.get(0)?;
    let categories = caps.get(1)?;
    Some((categories.as_str().trim().to_string(), whole.end()))
}

/// Find the class declared after the doc-comment that `rest` is inside.
///
/// `rest` is the text following the marker line.
#[must_use]
pub fn find_type_name(rest: &str) -> Option<String> {
    TYPE_PATTERN
        .captures(rest)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract the module declaration from a file's contents.
///
/// Returns `None` when the file declares no module; that is the normal
/// case for most source files.
#[must_use]
pub fn extract_module(content: &str) -> Option<ModuleDefinition> {
    find_namespaces(content)
        .into_iter()
        .find_map(|(namespace, end)| {
            let rest = &content[end..];
            let (category_string, marker_end) = find_module_marker(rest)?;
            let type_name = find_type_name(&rest[marker_end..])?;
            Some(ModuleDefinition::new(
                namespace,
                parse_categories(&category_string),
                type_name,
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ModuleCategory;

    const MAILER: &str = r"<?php

declare(strict_types=1);

namespace App;

use App\Support\Queue;

/**
 * Outgoing mail transport.
 * @module svc(priority=1) admin
 */
class Mailer extends Queue
{
    public function send(): void {}
}
";

    #[test]
    fn test_find_namespaces_simple_and_qualified() {
        let found = find_namespaces("namespace App;\nnamespace  App\\Mail ;");
        let names: Vec<&str> = found.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["App", "App\\Mail"]);
        assert_eq!(found[0].1, "namespace App;".len());
    }

    #[test]
    fn test_find_namespaces_ignores_identifier_suffix() {
        assert!(find_namespaces("subnamespace App;").is_empty());
    }

    #[test]
    fn test_find_module_marker() {
        let rest = "\n\n/**\n * Doc.\n * @module cli report(format=csv)\n */\nclass X {}";
        let (categories, end) = find_module_marker(rest).unwrap();
        assert_eq!(categories, "cli report(format=csv)");
        assert!(rest[end..].starts_with(" */"));
    }

    #[test]
    fn test_find_module_marker_tolerates_crlf() {
        let rest = "\r\n/**\r\n * @module cli\r\n */\r\nclass X {}";
        let (categories, _) = find_module_marker(rest).unwrap();
        assert_eq!(categories, "cli");
    }

    #[test]
    fn test_find_module_marker_rejects_slash_before_comment() {
        let rest = "\n// helper\n/**\n * @module cli\n */\nclass X {}";
        assert!(find_module_marker(rest).is_none());
    }

    #[test]
    fn test_find_module_marker_rejects_disallowed_characters() {
        let rest = "\n/**\n * @module cli, admin\n */\nclass X {}";
        assert!(find_module_marker(rest).is_none());
    }

    #[test]
    fn test_find_type_name_with_modifiers() {
        assert_eq!(find_type_name(" */\nclass Mailer\n{").as_deref(), Some("Mailer"));
        assert_eq!(
            find_type_name(" */\nfinal class Mailer\n{").as_deref(),
            Some("Mailer")
        );
        assert_eq!(
            find_type_name(" */\nabstract  class Base {").as_deref(),
            Some("Base")
        );
    }

    #[test]
    fn test_find_type_name_rejects_brace_before_class() {
        assert!(find_type_name(" */\nfunction f() { }\n/**/ class Late {}").is_none());
    }

    #[test]
    fn test_extract_module() {
        let module = extract_module(MAILER).unwrap();
        assert_eq!(module.namespace_path, "App");
        assert_eq!(module.type_name, "Mailer");
        assert_eq!(module.categories.len(), 2);
        assert_eq!(module.categories[0].name, "svc");
        assert_eq!(module.categories[0].attribute("priority"), Some("1"));
        assert_eq!(module.categories[1], ModuleCategory::bare("admin"));
    }

    #[test]
    fn test_extract_module_absent_marker() {
        let source = "<?php\nnamespace App;\n\n/**\n * Plain class.\n */\nclass Plain {}\n";
        assert!(extract_module(source).is_none());
    }

    #[test]
    fn test_extract_module_without_namespace() {
        let source = "<?php\n/**\n * @module cli\n */\nclass Orphan {}\n";
        assert!(extract_module(source).is_none());
    }

    #[test]
    fn test_extract_module_reports_first_declaration_only() {
        let source = format!("{MAILER}\nnamespace Other;\n/**\n * @module cli\n */\nclass Second {{}}\n");
        let module = extract_module(&source).unwrap();
        assert_eq!(module.type_name, "Mailer");
    }

    #[test]
    fn test_extract_module_falls_through_to_later_namespace() {
        let source = "namespace First;\n// no module here\nnamespace Second;\n/**\n * @module cli\n */\nclass Tool {}\n";
        let module = extract_module(source).unwrap();
        assert_eq!(module.namespace_path, "Second");
        assert_eq!(module.type_name, "Tool");
    }
}
