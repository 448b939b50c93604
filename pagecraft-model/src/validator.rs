//! Structural checks over a whole document.
//!
//! Nothing here rejects a document: the editor hands over half-finished pages
//! all the time. Each problem is reported as a [`ModelIssue`] and the compiler
//! decides how to degrade.

use crate::component::Component;
use crate::document::PageDocument;
use crate::props::ComponentProps;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

const NAMED_COLORS: &[&str] = &[
    "red",
    "blue",
    "green",
    "white",
    "black",
    "transparent",
    "yellow",
    "orange",
    "purple",
    "pink",
    "gray",
    "grey",
    "inherit",
    "currentColor",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    DuplicateId,
    SelfParent,
    DanglingParent,
    InvalidColor,
    ConditionalUnknownField,
    ConditionalDisabledField,
    ConditionalSelfReference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelIssue {
    pub kind: IssueKind,
    pub component_id: String,
    pub message: String,
}

impl fmt::Display for ModelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.component_id, self.message)
    }
}

/// Run every structural check and collect the issues, in list order
pub fn validate_document(doc: &PageDocument) -> Vec<ModelIssue> {
    let mut issues = Vec::new();
    validate_ids(&doc.components, &mut issues);
    validate_parents(&doc.components, &mut issues);
    for component in &doc.components {
        validate_component(component, &mut issues);
    }
    issues
}

fn validate_ids(components: &[Component], issues: &mut Vec<ModelIssue>) {
    let mut seen = HashSet::new();
    for component in components {
        if !seen.insert(component.id.as_str()) {
            issues.push(ModelIssue {
                kind: IssueKind::DuplicateId,
                component_id: component.id.clone(),
                message: format!(
                    "Duplicate id '{}': component ids must be unique within the document",
                    component.id
                ),
            });
        }
    }
}

fn validate_parents(components: &[Component], issues: &mut Vec<ModelIssue>) {
    let ids: HashSet<&str> = components.iter().map(|c| c.id.as_str()).collect();
    for component in components {
        let Some(parent) = component.parent_id.as_deref() else {
            continue;
        };
        if parent == component.id {
            issues.push(ModelIssue {
                kind: IssueKind::SelfParent,
                component_id: component.id.clone(),
                message: "Component lists itself as its parent".to_string(),
            });
        } else if !ids.contains(parent) {
            issues.push(ModelIssue {
                kind: IssueKind::DanglingParent,
                component_id: component.id.clone(),
                message: format!("Parent '{}' does not exist", parent),
            });
        }
    }
}

fn validate_component(component: &Component, issues: &mut Vec<ModelIssue>) {
    // Type and prop-shape problems are the compiler's to report
    let Ok(props) = component.typed_props() else {
        return;
    };

    let styles = match &props {
        ComponentProps::Header(p) => Some(&p.styles),
        ComponentProps::Footer(p) => Some(&p.styles),
        ComponentProps::Div(p) => Some(&p.styles),
        ComponentProps::Columns(p) => Some(&p.styles),
        ComponentProps::PopUp(p) => Some(&p.styles),
        _ => None,
    };
    if let Some(styles) = styles {
        for (property, value) in styles.color_slots() {
            if !is_valid_color(value) {
                issues.push(ModelIssue {
                    kind: IssueKind::InvalidColor,
                    component_id: component.id.clone(),
                    message: format!(
                        "Invalid color value '{}' for '{}': expected a hex color, a named color, or a $theme reference",
                        value, property
                    ),
                });
            }
        }
    }

    if let Some(fields) = props.form_fields() {
        let enabled: HashMap<&str, bool> = fields
            .iter()
            .map(|f| (f.id.as_str(), f.enabled))
            .collect();
        for field in fields.iter().filter(|f| f.enabled) {
            let Some(condition) = field.condition() else {
                continue;
            };
            let (kind, message) = if condition.field == field.id {
                (
                    IssueKind::ConditionalSelfReference,
                    format!("Field '{}' is conditioned on itself", field.id),
                )
            } else {
                match enabled.get(condition.field.as_str()) {
                    None => (
                        IssueKind::ConditionalUnknownField,
                        format!(
                            "Field '{}' is conditioned on unknown field '{}'",
                            field.id, condition.field
                        ),
                    ),
                    Some(false) => (
                        IssueKind::ConditionalDisabledField,
                        format!(
                            "Field '{}' is conditioned on disabled field '{}'; it will always be shown",
                            field.id, condition.field
                        ),
                    ),
                    Some(true) => continue,
                }
            };
            issues.push(ModelIssue {
                kind,
                component_id: component.id.clone(),
                message,
            });
        }
    }
}

/// Hex (`#rgb`, `#rrggbb`, `#rrggbbaa`), a small set of named colors,
/// functional `rgb()/rgba()/hsl()` notation, or a `$theme.` reference
pub fn is_valid_color(color: &str) -> bool {
    static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    static FUNCTIONAL_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    let hex = HEX_COLOR_REGEX.get_or_init(|| {
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("static regex")
    });
    let functional = FUNCTIONAL_COLOR_REGEX.get_or_init(|| {
        Regex::new(r"^(?:rgba?|hsla?)\([0-9.,%\s]+\)$").expect("static regex")
    });

    hex.is_match(color)
        || functional.is_match(color)
        || NAMED_COLORS.contains(&color)
        || color.starts_with("$theme.")
}
