//! Conditional field engine for forms.
//!
//! Every enabled field renders statically visible; this module only decides
//! which fields get a runtime show/hide rule and builds the configuration the
//! shared `conditions` runtime evaluates in the browser.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use pagecraft_model::FormField;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Shown unconditionally
    Always,
    /// Shown while `dependency` (a field id) currently has `value`
    Runtime { dependency: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    /// Index into the form's field list
    pub index: usize,
    pub field_id: String,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Default)]
pub struct ConditionPlan {
    /// Enabled fields only, in declaration order
    pub fields: Vec<FieldPlan>,
    pub diagnostics: Vec<Diagnostic>,
}

/// One rule as the browser runtime reads it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeRule<'a> {
    pub field: &'a str,
    pub depends_on: &'a str,
    pub value: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConditionConfig<'a> {
    pub form: &'a str,
    pub rules: Vec<RuntimeRule<'a>>,
}

/// Classify each enabled field of a form
pub fn plan(fields: &[FormField], component_id: &str) -> ConditionPlan {
    let mut out = ConditionPlan::default();
    let mut first_enabled = true;

    for (index, field) in fields.iter().enumerate() {
        if !field.enabled {
            continue;
        }
        let visibility = match field.condition() {
            None => Visibility::Always,
            Some(_) if first_enabled => {
                out.diagnostics.push(Diagnostic::info(
                    DiagnosticKind::ConditionalFallback,
                    component_id,
                    format!("field '{}' is the first field; its condition is ignored", field.id),
                ));
                Visibility::Always
            }
            Some(condition) => {
                match fields.iter().find(|f| f.id == condition.field) {
                    None => {
                        out.diagnostics.push(Diagnostic::info(
                            DiagnosticKind::ConditionalFallback,
                            component_id,
                            format!(
                                "field '{}' depends on unknown field '{}'; always shown",
                                field.id, condition.field
                            ),
                        ));
                        Visibility::Always
                    }
                    Some(dependency) if !dependency.enabled => {
                        out.diagnostics.push(Diagnostic::info(
                            DiagnosticKind::ConditionalFallback,
                            component_id,
                            format!(
                                "field '{}' depends on disabled field '{}'; always shown",
                                field.id, condition.field
                            ),
                        ));
                        Visibility::Always
                    }
                    Some(_) => {
                        if condition.field == field.id {
                            tracing::debug!(component = component_id, field = %field.id, "self-referencing condition left to runtime");
                        }
                        Visibility::Runtime {
                            dependency: condition.field.clone(),
                            value: condition.value.clone(),
                        }
                    }
                }
            }
        };
        first_enabled = false;
        out.fields.push(FieldPlan {
            index,
            field_id: field.id.clone(),
            visibility,
        });
    }
    out
}

impl ConditionPlan {
    pub fn has_runtime_rules(&self) -> bool {
        self.fields
            .iter()
            .any(|f| matches!(f.visibility, Visibility::Runtime { .. }))
    }

    pub fn visibility_of(&self, field_id: &str) -> Option<&Visibility> {
        self.fields
            .iter()
            .find(|f| f.field_id == field_id)
            .map(|f| &f.visibility)
    }

    /// Runtime configuration for the form with DOM id `form_dom_id`
    pub fn config<'a>(&'a self, form_dom_id: &'a str) -> ConditionConfig<'a> {
        let rules = self
            .fields
            .iter()
            .filter_map(|f| match &f.visibility {
                Visibility::Runtime { dependency, value } => Some(RuntimeRule {
                    field: &f.field_id,
                    depends_on: dependency,
                    value,
                }),
                Visibility::Always => None,
            })
            .collect();
        ConditionConfig {
            form: form_dom_id,
            rules,
        }
    }
}
