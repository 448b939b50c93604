//! Form renderer.
//!
//! The form posts back to the page itself. When a data extension is known
//! (the form's own key or the page default) a server-side block in front of
//! the form stores the submission; a redirect action and a success message
//! hook into the same request. The redirect target is fixed at compile time
//! and never read from the request.

use super::{ComponentRenderer, Fragment};
use crate::conditional::{self, ConditionPlan};
use crate::context::{Children, NodeContext, PageContext};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::escape;
use crate::scripts::{self, SharedScript};
use pagecraft_model::props::{FieldOption, Form};
use pagecraft_model::{Action, FieldType, FormField};
use serde::Serialize;

/// Hidden input naming the submitted form
pub const FORM_TOKEN_FIELD: &str = "__pc_form";

const REQUIRED_TEXT: &str = "This field is required.";
const EMAIL_TEXT: &str = "Please enter a valid email address.";
const PHONE_TEXT: &str = "Please enter a valid phone number.";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationConfig<'a> {
    form: &'a str,
    required_text: &'a str,
    email_text: &'a str,
    phone_text: &'a str,
}

fn input_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Email => "email",
        FieldType::Phone => "tel",
        FieldType::Number => "number",
        FieldType::Date => "date",
        FieldType::Hidden => "hidden",
        _ => "text",
    }
}

fn data_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "text",
        FieldType::Email => "email",
        FieldType::Phone => "phone",
        FieldType::Number => "number",
        FieldType::Textarea => "textarea",
        FieldType::Select => "select",
        FieldType::Radio => "radio",
        FieldType::Checkbox => "checkbox",
        FieldType::Date => "date",
        FieldType::Hidden => "hidden",
    }
}

/// Server-side variable flagged once this form's submission was stored
fn status_variable(cx: &NodeContext) -> String {
    let name: String = cx
        .dom_id
        .trim_start_matches("pc-")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("pc_{}", name)
}

/// Server-side redirect call for the form's `redirect` action, plus the
/// reason when the action cannot be used
fn redirect_call(page: &PageContext, action: &Action) -> (Option<String>, Option<String>) {
    if *action == Action::None {
        return (None, None);
    }
    let (href, problem) = page.href(action);
    if problem.is_some() {
        return (None, problem);
    }
    match action {
        Action::Page { page_id: Some(id) } => (Some(format!("Redirect(CloudPagesURL({}))", id.trim())), None),
        _ if href.starts_with("%%=") => (
            None,
            Some("redirect url must be a literal address, not a merge placeholder".to_string()),
        ),
        _ => (Some(format!("Redirect(\"{}\")", escape::placeholder_ident(&href))), None),
    }
}

fn option_markup(option: &FieldOption, selected: bool) -> String {
    format!(
        "<option value=\"{}\"{}>{}</option>",
        escape::attr(option.value()),
        if selected { " selected" } else { "" },
        escape::html(option.label())
    )
}

fn field_control(field: &FieldSlot) -> String {
    let f = field.config;
    let name = escape::attr(f.submit_name());
    let required = if f.required { " required aria-required=\"true\"" } else { "" };
    let placeholder = f
        .placeholder
        .as_deref()
        .map(|p| format!(" placeholder=\"{}\"", escape::attr(p)))
        .unwrap_or_default();
    let default = f.default_value.as_deref().unwrap_or("");

    match f.field_type {
        FieldType::Textarea => format!(
            "<textarea id=\"{}\" name=\"{}\" rows=\"4\"{}{}>{}</textarea>",
            field.dom_id,
            name,
            placeholder,
            required,
            escape::html(default)
        ),
        FieldType::Select => {
            let mut out = format!("<select id=\"{}\" name=\"{}\"{}>", field.dom_id, name, required);
            out.push_str(&format!(
                "<option value=\"\">{}</option>",
                escape::html(f.placeholder.as_deref().unwrap_or("Select..."))
            ));
            for option in &f.options {
                out.push_str(&option_markup(option, option.value() == default));
            }
            out.push_str("</select>");
            out
        }
        FieldType::Radio => f
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                format!(
                    "<label class=\"pc-choice\"><input type=\"radio\" id=\"{}-{}\" name=\"{}\" value=\"{}\"{}{}> {}</label>",
                    field.dom_id,
                    i,
                    name,
                    escape::attr(option.value()),
                    if option.value() == default { " checked" } else { "" },
                    if i == 0 { required } else { "" },
                    escape::html(option.label())
                )
            })
            .collect(),
        FieldType::Checkbox => format!(
            "<label class=\"pc-choice\"><input type=\"checkbox\" id=\"{}\" name=\"{}\" value=\"true\"{}{}> {}</label>",
            field.dom_id,
            name,
            if default == "true" { " checked" } else { "" },
            required,
            escape::html(&f.label)
        ),
        other => format!(
            "<input type=\"{}\" id=\"{}\" name=\"{}\" value=\"{}\"{}{}>",
            input_type(other),
            field.dom_id,
            name,
            escape::attr(default),
            placeholder,
            required
        ),
    }
}

/// A field paired with the DOM id of its control
struct FieldSlot<'a> {
    config: &'a FormField,
    dom_id: String,
}

fn field_markup(field: &FieldSlot) -> String {
    let f = field.config;
    let hidden = f.field_type == FieldType::Hidden;
    let mut out = format!(
        "<div class=\"pc-field\" data-field=\"{}\" data-type=\"{}\"{}{}>",
        escape::attr(&f.id),
        data_type(f.field_type),
        if f.required { " data-required" } else { "" },
        if hidden { " style=\"display:none;\"" } else { "" }
    );
    // checkboxes carry their label inline
    if !hidden && f.field_type != FieldType::Checkbox && !f.label.is_empty() {
        let tag_for = if f.field_type == FieldType::Radio {
            String::new()
        } else {
            format!(" for=\"{}\"", field.dom_id)
        };
        out.push_str(&format!(
            "<label{}>{}{}</label>",
            tag_for,
            escape::html(&f.label),
            if f.required { " <span aria-hidden=\"true\">*</span>" } else { "" }
        ));
    }
    out.push_str(&field_control(field));
    if !hidden {
        out.push_str("<span class=\"pc-field-error\" aria-live=\"polite\"></span>");
    }
    out.push_str("</div>");
    out
}

fn server_block(
    cx: &NodeContext,
    data_extension: Option<&str>,
    fields: &[&FormField],
    redirect: Option<&str>,
) -> Option<String> {
    if data_extension.is_none() && redirect.is_none() {
        return None;
    }
    let mut block = format!(
        "%%[\nIF RequestParameter(\"{}\") == \"{}\" THEN\n",
        FORM_TOKEN_FIELD,
        escape::placeholder_ident(&cx.dom_id)
    );
    if let Some(key) = data_extension {
        let pairs: Vec<String> = fields
            .iter()
            .map(|f| {
                let name = escape::placeholder_ident(f.submit_name());
                format!("\"{0}\", RequestParameter(\"{0}\")", name)
            })
            .collect();
        if !pairs.is_empty() {
            block.push_str(&format!(
                "  InsertData(\"{}\", {})\n",
                escape::placeholder_ident(key),
                pairs.join(", ")
            ));
        }
        block.push_str(&format!("  SET @{} = \"submitted\"\n", status_variable(cx)));
    }
    if let Some(call) = redirect {
        block.push_str(&format!("  {}\n", call));
    }
    block.push_str("ENDIF\n]%%");
    Some(block)
}

impl ComponentRenderer for Form {
    fn render(&self, cx: &NodeContext, _children: &Children, page: &PageContext) -> Fragment {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let plan: ConditionPlan = conditional::plan(&self.fields, cx.id());
        diagnostics.extend(plan.diagnostics.iter().cloned());

        let enabled: Vec<&FormField> = self.fields.iter().filter(|f| f.enabled).collect();
        let mut seen = std::collections::HashSet::new();
        for field in &enabled {
            if field.id.trim().is_empty() {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::InvalidProps,
                    cx.id(),
                    "form field without an id cannot be targeted by conditions",
                ));
            } else if !seen.insert(field.id.as_str()) {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::InvalidProps,
                    cx.id(),
                    format!("form field id '{}' is used twice", field.id),
                ));
            }
        }

        let (redirect, redirect_problem) = redirect_call(page, &self.redirect);
        if let Some(reason) = redirect_problem {
            diagnostics.push(Diagnostic::warning(DiagnosticKind::InvalidAction, cx.id(), reason));
        }

        let data_extension = page.data_extension_key(self.data_extension_key.as_deref());
        let mut html = String::new();
        if let Some(block) = server_block(cx, data_extension, &enabled, redirect.as_deref()) {
            html.push_str(&block);
        }

        let mut form = format!(
            "<form id=\"{}\" class=\"pc-form\" data-component=\"{}\" method=\"post\" action=\"\" novalidate",
            escape::attr(&cx.dom_id),
            escape::attr(&cx.component.component_type)
        );
        form.push('>');
        if let Some(title) = &self.title {
            form.push_str(&format!("<h3 class=\"pc-form-title\">{}</h3>", escape::html(title)));
        }
        form.push_str(&format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
            FORM_TOKEN_FIELD,
            escape::attr(&cx.dom_id)
        ));
        for field in &enabled {
            let field = FieldSlot {
                config: field,
                dom_id: cx.child_id(&field.id),
            };
            form.push_str(&field_markup(&field));
        }
        let button_color = page
            .color(self.button_color.as_deref())
            .unwrap_or_else(|| page.theme_color());
        form.push_str(&format!(
            "<button type=\"submit\" class=\"pc-button pc-button-primary\" style=\"background-color:{0};border:2px solid {0};color:#ffffff;\">{1}</button>",
            button_color,
            escape::html(&self.submit_label)
        ));
        form.push_str("</form>");

        match &self.success_message {
            Some(message) => {
                // with a data extension, success means the row was stored
                let submitted = match data_extension {
                    Some(_) => format!("@{} == \"submitted\"", status_variable(cx)),
                    None => format!(
                        "RequestParameter(\"{}\") == \"{}\"",
                        FORM_TOKEN_FIELD,
                        escape::placeholder_ident(&cx.dom_id)
                    ),
                };
                html.push_str(&format!(
                    "%%[ IF {} THEN ]%%<div class=\"pc-form-success\" role=\"status\">{}</div>%%[ ELSE ]%%{}%%[ ENDIF ]%%",
                    submitted,
                    escape::placeholder_literal(message),
                    form
                ));
            }
            None => html.push_str(&form),
        }

        html.push_str(&scripts::enqueue(
            "validation",
            &ValidationConfig {
                form: &cx.dom_id,
                required_text: REQUIRED_TEXT,
                email_text: EMAIL_TEXT,
                phone_text: PHONE_TEXT,
            },
        ));
        let runtime_rules = plan.has_runtime_rules();
        if runtime_rules {
            html.push_str(&scripts::enqueue("conditions", &plan.config(&cx.dom_id)));
        }
        let fragment = Fragment::flow(html).require(SharedScript::FormValidation);
        let fragment = if runtime_rules {
            fragment.require(SharedScript::FormConditions)
        } else {
            fragment
        };
        fragment.with_diagnostics(diagnostics)
    }
}
