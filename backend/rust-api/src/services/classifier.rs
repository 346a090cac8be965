//! Local heuristic used when the remote parsing service is unconfigured or
//! unavailable. It only guesses coarse knowledge tags from keywords.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::ParsedProblem;

pub const IMAGE_PLACEHOLDER: &str = "(question derived from image)";

lazy_static! {
    static ref FUNCTION_HEAD: Regex = Regex::new(r"f\s*\(\s*x\s*\)\s*=").unwrap();
    static ref FUNCTION_EQUATION: Regex = Regex::new(r"f\s*\(\s*x\s*\)\s*=\s*[^\r\n\x{2028}\x{2029}]+").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Quadratic,
    Derivative,
    Inequality,
    Reading,
}

/// Evaluated top to bottom, first match wins.
pub const RULES: [(Category, &[&str]); 4] = [
    (
        Category::Quadratic,
        &["function-monotonicity", "quadratic-function"],
    ),
    (
        Category::Derivative,
        &["derivative-rules", "derivative-extrema-discussion"],
    ),
    (Category::Inequality, &["inequality-basic"]),
    (Category::Reading, &["basic-reading-comprehension"]),
];

impl Category {
    pub fn matches(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        match self {
            Category::Quadratic => {
                has_function_definition(text)
                    || text.contains("x^2")
                    || text.contains("二次函数")
                    || lower.contains("quadratic function")
            }
            Category::Derivative => {
                ["求导", "导数", "f'"].iter().any(|k| text.contains(k))
                    || ["derivative", "differentiat"]
                        .iter()
                        .any(|k| lower.contains(k))
            }
            Category::Inequality => {
                text.contains("不等式")
                    || lower.contains("inequality")
                    || text.contains(['≥', '≤', '<', '>'])
            }
            Category::Reading => !text.is_empty(),
        }
    }

    /// Extra fields a category fills in besides its tags.
    fn equations(&self, text: &str) -> Vec<String> {
        match self {
            Category::Quadratic => {
                let equation = FUNCTION_EQUATION
                    .find(text)
                    .map(|m| m.as_str())
                    .unwrap_or(text);
                vec![equation.to_string()]
            }
            _ => Vec::new(),
        }
    }
}

/// `f(x)=` preceded by a word boundary. The boundary is checked by hand so that
/// CJK text directly before the `f` still counts as a boundary.
fn has_function_definition(text: &str) -> bool {
    FUNCTION_HEAD.find_iter(text).any(|m| {
        text[..m.start()]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_'))
    })
}

pub fn first_match(text: &str) -> Option<(Category, &'static [&'static str])> {
    RULES
        .iter()
        .find(|(category, _)| category.matches(text))
        .copied()
}

pub fn classify(text: &str, has_image: bool) -> ParsedProblem {
    let text = text.trim();

    let question = if !text.is_empty() {
        text.to_string()
    } else if has_image {
        IMAGE_PLACEHOLDER.to_string()
    } else {
        String::new()
    };

    let (equations, knowledge_tags) = match first_match(text) {
        Some((category, tags)) => (
            category.equations(text),
            tags.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    let summary = format!("Fallback parse: found {} tags.", knowledge_tags.len());

    ParsedProblem {
        question,
        equations,
        diagram_desc: None,
        knowledge_tags,
        summary,
    }
}
