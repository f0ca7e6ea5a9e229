// src/infrastructure/util.rs
use crate::domain::slug::SlugGenerator;

/// Lowercases, transliterates non-ASCII letters and drops punctuation.
/// Literal hyphens survive, each whitespace run becomes one hyphen, and
/// hyphens at either end are trimmed.
pub fn normalize(input: &str) -> String {
    let mut kept = String::with_capacity(input.len());
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            kept.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() {
            kept.push(' ');
        } else if c == '-' {
            kept.push('-');
        } else if c.is_alphanumeric() {
            kept.extend(
                slug::slugify(c.to_string())
                    .chars()
                    .filter(char::is_ascii_alphanumeric),
            );
        }
    }

    let mut out = String::with_capacity(kept.len());
    let mut in_space = false;
    for c in kept.chars() {
        if c == ' ' {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }

    out.trim_matches('-').to_owned()
}

#[derive(Default, Clone)]
pub struct DefaultSlugGenerator;

impl SlugGenerator for DefaultSlugGenerator {
    fn slugify(&self, input: &str) -> String {
        normalize(input)
    }
}
