//! MIME-only classification for file types that never need a model call.

use crate::mime;
use crate::models::{Category, ClassificationResult};
use tracing::debug;

#[derive(Debug, Clone)]
pub enum Condition {
    MimePrefix { prefix: &'static str },
    Mime { mime: &'static str },
    Or { any: Vec<Condition> },
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: &'static str,
    pub condition: Condition,
    pub category: Category,
    pub tags: &'static [&'static str],
}

pub fn matches(condition: &Condition, mime_type: &str) -> bool {
    match condition {
        Condition::MimePrefix { prefix } => mime_type.starts_with(prefix),
        Condition::Mime { mime } => mime_type == *mime,
        Condition::Or { any } => any.iter().any(|c| matches(c, mime_type)),
    }
}

/// Ordered rule list; the first matching rule wins.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    rules: Vec<Rule>,
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }
}

impl RuleClassifier {
    /// `None` means no rule applies, not a failure.
    pub fn classify(&self, mime_type: &str) -> Option<ClassificationResult> {
        self.rules
            .iter()
            .find(|r| matches(&r.condition, mime_type))
            .map(|r| {
                debug!(rule = r.name, mime_type, "mime rule matched");
                ClassificationResult {
                    category: r.category,
                    tags: r.tags.iter().map(|t| t.to_string()).collect(),
                    error: None,
                }
            })
    }
}

fn builtin_rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "video",
            condition: Condition::MimePrefix { prefix: "video/" },
            category: Category::Videos,
            tags: &["video"],
        },
        Rule {
            name: "presentation",
            condition: Condition::Or {
                any: vec![
                    Condition::Mime { mime: mime::PPTX },
                    Condition::Mime { mime: mime::PPT },
                ],
            },
            category: Category::Presentations,
            tags: &["presentation", "slides"],
        },
        Rule {
            name: "spreadsheet",
            condition: Condition::Or {
                any: vec![
                    Condition::Mime { mime: mime::XLSX },
                    Condition::Mime { mime: mime::XLS },
                    Condition::Mime { mime: mime::CSV },
                ],
            },
            category: Category::Spreadsheets,
            tags: &["spreadsheet", "data"],
        },
    ]
}
