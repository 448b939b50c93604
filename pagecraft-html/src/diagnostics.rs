use pagecraft_model::{IssueKind, ModelIssue};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticKind {
    UnknownType,
    InvalidProps,
    MissingRequired,
    Orphan,
    Cycle,
    DuplicateId,
    DepthLimit,
    InvalidAction,
    InvalidBinding,
    InvalidColor,
    ConditionalFallback,
    AbTestSkipped,
}

/// A non-fatal problem found while compiling. Returned alongside the markup
/// and mirrored to `tracing`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub component_id: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(kind: DiagnosticKind, component_id: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            component_id: Some(component_id.to_string()),
            message: message.into(),
        }
    }

    pub fn info(kind: DiagnosticKind, component_id: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            kind,
            component_id: Some(component_id.to_string()),
            message: message.into(),
        }
    }

    pub(crate) fn log(&self) {
        let id = self.component_id.as_deref().unwrap_or("-");
        match self.severity {
            Severity::Warning => {
                tracing::warn!(kind = ?self.kind, component = id, "{}", self.message)
            }
            Severity::Info => {
                tracing::debug!(kind = ?self.kind, component = id, "{}", self.message)
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.component_id {
            Some(id) => write!(f, "[{:?}] {}: {}", self.kind, id, self.message),
            None => write!(f, "[{:?}] {}", self.kind, self.message),
        }
    }
}

/// Validator issues that the compositor or renderers do not already report
pub(crate) fn from_model_issue(issue: ModelIssue) -> Option<Diagnostic> {
    let kind = match issue.kind {
        IssueKind::InvalidColor => DiagnosticKind::InvalidColor,
        // tree problems are reported by the compositor and conditionals by the
        // form renderer, each with the decision taken
        IssueKind::DuplicateId
        | IssueKind::SelfParent
        | IssueKind::DanglingParent
        | IssueKind::ConditionalUnknownField
        | IssueKind::ConditionalDisabledField
        | IssueKind::ConditionalSelfReference => return None,
    };
    Some(Diagnostic {
        severity: Severity::Info,
        kind,
        component_id: Some(issue.component_id),
        message: issue.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(kind: IssueKind) -> ModelIssue {
        ModelIssue {
            kind,
            component_id: "c".to_string(),
            message: "m".to_string(),
        }
    }

    #[test]
    fn test_only_color_issues_pass_through() {
        let color = from_model_issue(issue(IssueKind::InvalidColor)).unwrap();
        assert_eq!(color.kind, DiagnosticKind::InvalidColor);
        assert_eq!(color.severity, Severity::Info);
        assert!(from_model_issue(issue(IssueKind::DanglingParent)).is_none());
        assert!(from_model_issue(issue(IssueKind::ConditionalSelfReference)).is_none());
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::warning(DiagnosticKind::Orphan, "x", "parent missing");
        assert_eq!(d.to_string(), "[Orphan] x: parent missing");
    }
}
