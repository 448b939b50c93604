use pagecraft_model::props::{CalendarProvider, FieldOption};
use pagecraft_model::{
    parse_document, parse_document_yaml, validate_document, Action, Alignment, BackgroundType, BannerPosition,
    ComponentProps, FieldType, FlexDirection, IssueKind, ModelError, PageDocument, TextAlign,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn get_fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(filename);
    path
}

fn read_fixture(filename: &str) -> String {
    fs::read_to_string(get_fixture_path(filename)).unwrap()
}

fn landing() -> PageDocument {
    parse_document(&read_fixture("landing.json")).unwrap()
}

// Document-level decoding

#[test]
fn test_landing_document_decodes() {
    let doc = landing();
    assert_eq!(doc.components.len(), 4);
    assert_eq!(doc.meta.title, "Webinar: scaling support");
    assert_eq!(doc.meta.lang, "pt-BR");
    assert_eq!(doc.meta.data_extension_key.as_deref(), Some("Webinar_Registrations"));
    assert_eq!(doc.meta.tracking.google_tag_manager.active_id(), Some("GTM-AB12CD"));
    assert_eq!(doc.meta.tracking.facebook_pixel.active_id(), None);
    assert_eq!(doc.cookie_banner.position, BannerPosition::Top);
    assert_eq!(doc.cookie_banner.accept_label, "Accept");
    assert_eq!(doc.cookie_banner.decline_label.as_deref(), Some("No"));
}

#[test]
fn test_page_styles_and_theme_references() {
    let doc = landing();
    assert_eq!(doc.styles.resolve("$theme.primary").as_deref(), Some("#7c3aed"));
    assert_eq!(doc.styles.resolve("$theme.secondary").as_deref(), Some("#f59e0b"));
    assert_eq!(doc.styles.resolve("$theme.accent").as_deref(), Some("#10b981"));
    assert_eq!(doc.styles.max_width, "1200px");
}

#[test]
fn test_yaml_document_decodes() {
    let doc = parse_document_yaml(&read_fixture("landing.yaml")).unwrap();
    assert_eq!(doc.meta.title, "Webinar from YAML");
    assert_eq!(doc.components[1].parent_id.as_deref(), Some("hero"));
    match doc.components[1].typed_props().unwrap() {
        ComponentProps::Title(title) => {
            assert_eq!(title.text, "Hello");
            assert_eq!(title.data_binding.as_deref(), Some("FirstName"));
        }
        other => panic!("expected a Title, got {:?}", other),
    }
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(matches!(parse_document("{\"components\": ["), Err(ModelError::Json(_))));
    assert!(matches!(parse_document_yaml("components: [\n  - {"), Err(ModelError::Yaml(_))));
}

// Typed props

#[test]
fn test_container_props() {
    let doc = landing();
    let ComponentProps::Div(hero) = doc.components[0].typed_props().unwrap() else {
        panic!("hero should be a Div");
    };
    assert_eq!(hero.anchor.as_deref(), Some("top"));
    assert_eq!(hero.styles.background_type, BackgroundType::Image);
    assert_eq!(hero.styles.overlay_opacity, Some(40.0));
    assert_eq!(hero.styles.extra.get("padding"), Some(&serde_json::json!("4rem")));
    assert_eq!(hero.layout.direction, FlexDirection::Row);
    assert_eq!(hero.layout.vertical_align, Some(Alignment::Center));
    assert_eq!(hero.layout.horizontal_align, Some(Alignment::Between));
}

#[test]
fn test_title_props_with_flattened_text_style() {
    let doc = landing();
    let ComponentProps::Title(title) = doc.components[1].typed_props().unwrap() else {
        panic!("headline should be a Title");
    };
    assert_eq!(title.level, 2);
    assert_eq!(title.text_style.align, TextAlign::Left);
    assert_eq!(title.data_binding.as_deref(), Some("FirstName"));
}

#[test]
fn test_form_fields() {
    let doc = landing();
    let props = doc.components[2].typed_props().unwrap();
    let fields = props.form_fields().unwrap();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].field_type, FieldType::Email);
    assert!(fields[0].required);
    assert!(fields[0].enabled);
    assert_eq!(fields[1].field_type, FieldType::Radio);
    assert_eq!(
        fields[1].options,
        vec![
            FieldOption::Labeled {
                label: "Agent".to_string(),
                value: "agent".to_string()
            },
            FieldOption::Plain("Manager".to_string()),
        ]
    );
    let condition = fields[2].condition().unwrap();
    assert_eq!(condition.field, "role");
    assert_eq!(condition.value, "Manager");

    let ComponentProps::Form(form) = props else {
        panic!("register should be a Form");
    };
    assert_eq!(
        form.redirect,
        Action::Page {
            page_id: Some("9001".to_string())
        }
    );
    assert_eq!(form.submit_label, "Submit");
}

#[test]
fn test_calendar_alias_lifts_to_add_to_calendar() {
    let doc = landing();
    let props = doc.components[3].typed_props().unwrap();
    assert_eq!(props.type_name(), "AddToCalendar");
    let ComponentProps::AddToCalendar(calendar) = props else {
        panic!("expected AddToCalendar");
    };
    assert_eq!(calendar.providers, vec![CalendarProvider::Google, CalendarProvider::Apple]);
    assert_eq!(calendar.start_time.as_deref(), Some("2025-09-10T15:00:00Z"));
    assert_eq!(calendar.label, "Add to calendar");
}

#[test]
fn test_containers() {
    let doc = landing();
    let containers: Vec<bool> = doc
        .components
        .iter()
        .map(|c| c.typed_props().unwrap().is_container())
        .collect();
    assert_eq!(containers, vec![true, false, false, false]);
}

// Leniency

#[test]
fn test_half_edited_document_still_decodes() {
    let doc = parse_document(&read_fixture("half-edited.json")).unwrap();
    assert_eq!(doc.styles.max_width, "");
    assert!(doc.meta.keywords.is_empty());
    assert!(!doc.meta.tracking.google_analytics.enabled);

    let first = &doc.components[0];
    assert_eq!(first.id, "42");
    assert_eq!(first.parent_id, None);
    assert_eq!(first.order, 0);
    let ComponentProps::Paragraph(paragraph) = first.typed_props().unwrap() else {
        panic!("expected a Paragraph");
    };
    assert_eq!(paragraph.text, "3.5");

    let ComponentProps::Columns(columns) = doc.components[1].typed_props().unwrap() else {
        panic!("expected Columns");
    };
    assert_eq!(columns.count, 0);
    assert!(!columns.stack_on_mobile);

    let ComponentProps::Button(button) = doc.components[2].typed_props().unwrap() else {
        panic!("expected a Button");
    };
    assert_eq!(button.label, "");
    assert_eq!(button.action, Action::Url { url: None, new_tab: false });
    assert_eq!(doc.components[2].column, 1);

    assert_eq!(doc.components[3].id, "");
    assert!(matches!(
        doc.components[4].typed_props(),
        Err(ModelError::PropsNotObject { .. })
    ));
}

// Validation

#[test]
fn test_validator_reports_every_structural_problem() {
    let doc = parse_document(&read_fixture("invalid.json")).unwrap();
    let issues = validate_document(&doc);
    let summary: Vec<(IssueKind, &str)> = issues
        .iter()
        .map(|i| (i.kind, i.component_id.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (IssueKind::DuplicateId, "box"),
            (IssueKind::DanglingParent, "ghost-child"),
            (IssueKind::SelfParent, "me"),
            (IssueKind::InvalidColor, "box"),
            (IssueKind::InvalidColor, "box"),
        ]
    );
    assert!(issues[3].message.contains("backgroundColor"));
    assert!(issues[4].message.contains("gradientTo"));
}

#[test]
fn test_clean_landing_has_no_issues() {
    assert!(validate_document(&landing()).is_empty());
}
