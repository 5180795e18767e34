//! Template Scanner: placeholder discovery in prompt text

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("fail to create the placeholder pattern")
});

/// Extract the distinct `{{name}}` placeholders of a template
///
/// Names come back in order of first appearance with duplicates collapsed.
pub fn extract_names(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for captures in PLACEHOLDER_PATTERN.captures_iter(template) {
        let name = &captures[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
