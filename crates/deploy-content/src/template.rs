//! Template variables and placeholder substitution
//!
//! Placeholders use `{{NAME}}`. Only the three names below are recognized,
//! matched as exact substrings; anything else between braces is left
//! untouched, as is an unclosed `{{`.

/// Values substituted into a template bundle.
///
/// All three fields are required, so a bundle can never be rendered with a
/// variable missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVariables {
    /// `{{APP_NAME}}`
    pub app_name: String,
    /// `{{INGRESS_PATH}}`
    pub ingress_path: String,
    /// `{{STATIC_CONTENT}}`
    pub static_content: String,
}

const PLACEHOLDERS: [&str; 3] = ["APP_NAME", "INGRESS_PATH", "STATIC_CONTENT"];

impl TemplateVariables {
    fn lookup(&self, name: &str) -> &str {
        match name {
            "APP_NAME" => &self.app_name,
            "INGRESS_PATH" => &self.ingress_path,
            _ => &self.static_content,
        }
    }

    /// Placeholder starting right after a `{{`, as (value, bytes consumed).
    fn placeholder_at(&self, text: &str) -> Option<(&str, usize)> {
        PLACEHOLDERS.iter().find_map(|name| {
            text.strip_prefix(name)?
                .starts_with("}}")
                .then(|| (self.lookup(name), name.len() + 2))
        })
    }

    /// Replace every known placeholder in `template`.
    ///
    /// Single left-to-right scan: substituted values are never rescanned, so
    /// a value containing `{{APP_NAME}}` comes out literally. A `{{` that does
    /// not open a known placeholder contributes one `{` and scanning resumes
    /// at the next character, so `{{{APP_NAME}}}` renders as `{value}`.
    pub fn substitute(&self, template: &str) -> String {
        let mut result = String::with_capacity(template.len() + self.static_content.len());
        let mut remaining = template;

        while let Some(start) = remaining.find("{{") {
            result.push_str(&remaining[..start]);
            let after = &remaining[start + 2..];

            match self.placeholder_at(after) {
                Some((value, consumed)) => {
                    result.push_str(value);
                    remaining = &after[consumed..];
                }
                None => {
                    result.push('{');
                    remaining = &remaining[start + 1..];
                }
            }
        }

        result.push_str(remaining);
        result
    }
}
