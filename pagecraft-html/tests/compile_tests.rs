use pagecraft_html::{compile, compile_json, CompileOptions, CompileOutput, DiagnosticKind, Severity};
use pagecraft_model::{Component, PageDocument};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

fn get_fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(filename);
    path
}

fn load_fixture(filename: &str) -> PageDocument {
    let json = fs::read_to_string(get_fixture_path(filename)).unwrap();
    PageDocument::from_json(&json).unwrap()
}

fn compile_fixture(filename: &str) -> CompileOutput {
    compile(&load_fixture(filename), &CompileOptions::default().with_page("test-page"))
}

fn kinds(output: &CompileOutput) -> Vec<DiagnosticKind> {
    output.diagnostics.iter().map(|d| d.kind).collect()
}

fn position(html: &str, needle: &str) -> usize {
    html.find(needle)
        .unwrap_or_else(|| panic!("'{}' not found in output", needle))
}

// Whole-document properties

#[test]
fn test_compile_is_deterministic() {
    let doc = load_fixture("landing.json");
    let options = CompileOptions::default();
    let first = compile(&doc, &options);
    let second = compile(&doc, &options);
    assert_eq!(first.html, second.html);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_every_component_renders_exactly_once() {
    let doc = load_fixture("landing.json");
    let output = compile(&doc, &CompileOptions::default());
    for component in &doc.components {
        let marker = format!("id=\"pc-{}\"", component.id);
        assert_eq!(output.html.matches(&marker).count(), 1, "{}", component.id);
    }
}

#[test]
fn test_landing_compiles_without_warnings() {
    let output = compile_fixture("landing.json");
    let warnings: Vec<String> = output.warnings().map(|d| d.to_string()).collect();
    assert!(warnings.is_empty(), "{:?}", warnings);
}

#[test]
fn test_document_shell() {
    let html = compile_fixture("landing.json").html;
    assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n"));
    assert!(html.contains("<title>Spring open house</title>"));
    assert!(html.contains("<meta name=\"keywords\" content=\"campus, open house\">"));
    assert!(html.contains("gtag('config','G-OPEN2025')"));
    assert!(!html.contains("1234567890"));
    assert!(html.contains("--pc-theme:#0f766e;"));
    assert!(html.contains(".pc-title{letter-spacing:-0.02em;}"));
    assert!(position(&html, "data-pagecraft-custom") < position(&html, "</head>"));
}

#[test]
fn test_header_before_bound_title() {
    let doc = PageDocument::with_components(vec![
        Component::new("h", "Header").with_position(0, 0),
        Component::new("t", "Title")
            .with_position(0, 1)
            .with_props(json!({"text": "Hi", "dataBinding": "FirstName"})),
    ]);
    let html = compile(&doc, &CompileOptions::default()).html;
    let header = position(&html, "data-component=\"Header\"");
    let title = position(&html, "data-component=\"Title\"");
    assert!(header < title);
    assert!(html.contains(
        "%%=IIF(Empty(AttributeValue(\"FirstName\")), \"Hi\", AttributeValue(\"FirstName\"))=%%"
    ));
}

#[test]
fn test_children_follow_tree_order() {
    let html = compile_fixture("landing.json").html;
    let hero = position(&html, "id=\"pc-hero\"");
    let headline = position(&html, "id=\"pc-headline\"");
    let intro = position(&html, "id=\"pc-intro\"");
    let split = position(&html, "id=\"pc-split\"");
    let footer = position(&html, "id=\"pc-bottom\"");
    assert!(hero < headline && headline < intro && intro < split && split < footer);
    assert!(html.contains("Doors open at 10am.<br>Bring a friend."));
}

#[test]
fn test_columns_place_children_in_lanes() {
    let html = compile_fixture("landing.json").html;
    assert!(html.contains("grid-template-columns:2fr 1fr;"));
    let first_lane = position(&html, "data-column=\"0\"");
    let signup = position(&html, "id=\"pc-signup\"");
    let second_lane = position(&html, "data-column=\"1\"");
    let faq = position(&html, "id=\"pc-faq\"");
    assert!(first_lane < signup && signup < second_lane && second_lane < faq);
}

// Shared runtime and overlays

#[test]
fn test_shared_scripts_emitted_once_for_two_forms() {
    let html = compile_fixture("landing.json").html;
    assert_eq!(html.matches("pagecraft.register(\"validation\"").count(), 1);
    assert_eq!(html.matches("push([\"validation\"").count(), 2);
    assert_eq!(html.matches("data-pagecraft-runtime").count(), 1);
    assert_eq!(html.matches("pc.boot = function").count(), 1);
}

#[test]
fn test_overlays_come_after_body_and_runtime() {
    let html = compile_fixture("landing.json").html;
    let footer = position(&html, "id=\"pc-bottom\"");
    let runtime = position(&html, "data-pagecraft-runtime");
    let floating = position(&html, "id=\"pc-cta-float\"");
    let banner = position(&html, "id=\"pagecraft-cookies\"");
    assert!(footer < runtime);
    assert!(runtime < floating);
    assert!(floating < banner);
    assert!(html.contains("pagecraft.register(\"floating\""));
    assert!(html.contains("pagecraft.register(\"cookies\""));
}

#[test]
fn test_structural_style_keys_never_leak() {
    let html = compile_fixture("landing.json").html;
    for leaked in [
        "overlay-opacity",
        "overlayOpacity",
        "gradient-from",
        "gradientFrom",
        "is-full-width",
        "isFullWidth",
        "background-type",
    ] {
        assert!(!html.contains(leaked), "{}", leaked);
    }
    assert!(html.contains("linear-gradient(180deg, #0f766e, #134e4a)"));
    assert!(html.contains("padding:64px 24px;"));
}

// Forms

#[test]
fn test_conditional_field_is_visible_by_default() {
    let html = compile_fixture("landing.json").html;
    let guest = position(&html, "data-field=\"guest\"");
    let tag_end = html[guest..].find('>').unwrap();
    assert!(!html[guest..guest + tag_end].contains("hidden"));
    assert!(html.contains("\"dependsOn\":\"attending\""));
    assert_eq!(html.matches("pagecraft.register(\"conditions\"").count(), 1);
}

#[test]
fn test_form_writes_to_page_data_extension() {
    let html = compile_fixture("landing.json").html;
    assert!(html.contains("IF RequestParameter(\"__pc_form\") == \"pc-signup\" THEN"));
    assert!(html.contains(
        "InsertData(\"OpenHouse_Signups\", \"email\", RequestParameter(\"email\"), \"attending\", RequestParameter(\"attending\"), \"guest\", RequestParameter(\"guest\"))"
    ));
    assert!(html.contains("<div class=\"pc-form-success\" role=\"status\">See you there!</div>"));
    assert!(html.contains("InsertData(\"OpenHouse_Signups\", \"address\", RequestParameter(\"address\"))"));
}

#[test]
fn test_disabled_dependency_falls_back_to_always_shown() {
    let doc = PageDocument::with_components(vec![Component::new("f", "Form").with_props(json!({
        "fields": [
            {"id": "name"},
            {"id": "plan", "enabled": false},
            {"id": "seats", "conditional": {"field": "plan", "value": "team"}}
        ]
    }))]);
    let output = compile(&doc, &CompileOptions::default());
    assert!(output.html.contains("data-field=\"seats\""));
    assert!(!output.html.contains("data-field=\"plan\""));
    assert!(!output.html.contains("push([\"conditions\""));
    assert_eq!(kinds(&output), vec![DiagnosticKind::ConditionalFallback]);
}

// Tree repair

#[test]
fn test_cycles_and_orphans_still_render_everything() {
    let doc = load_fixture("cycles.json");
    let output = compile(&doc, &CompileOptions::default());
    for component in &doc.components {
        let marker = format!("id=\"pc-{}\"", component.id);
        assert_eq!(output.html.matches(&marker).count(), 1, "{}", component.id);
    }
    assert_eq!(
        kinds(&output),
        vec![DiagnosticKind::Orphan, DiagnosticKind::Cycle, DiagnosticKind::Cycle]
    );
    let intro = position(&output.html, "id=\"pc-intro\"");
    let stray = position(&output.html, "id=\"pc-stray\"");
    let loop_a = position(&output.html, "id=\"pc-loop-a\"");
    let inside = position(&output.html, "id=\"pc-inside\"");
    assert!(intro < stray && stray < loop_a && loop_a < inside);
}

#[test]
fn test_duplicate_ids_render_with_distinct_dom_ids() {
    let doc = PageDocument::with_components(vec![
        Component::new("promo", "Paragraph").with_props(json!({"text": "one"})),
        Component::new("promo", "Paragraph").with_props(json!({"text": "two"})),
    ]);
    let output = compile(&doc, &CompileOptions::default());
    assert!(output.html.contains("id=\"pc-promo\""));
    assert!(output.html.contains("id=\"pc-promo-2\""));
    assert_eq!(kinds(&output), vec![DiagnosticKind::DuplicateId]);
}

// A/B

#[test]
fn test_ab_variants_and_assignment_script() {
    let output = compile_fixture("ab_test.json");
    let html = &output.html;
    assert!(html.contains("data-ab-test=\"cta\""));
    assert!(html.contains("<div data-ab-variant=\"A\" hidden>"));
    assert!(html.contains("<div data-ab-variant=\"B\" hidden>"));
    assert!(html.contains("Buy now"));
    assert!(html.contains("Get yours today"));
    assert!(html.contains("\"pagecraft:ab:test-page:cta\""));
    assert!(html.contains("w=25.0,"));
    let read = position(html, "sessionStorage.getItem");
    let draw = position(html, "Math.random()");
    assert!(read < draw);
}

#[test]
fn test_derived_ids_never_collide_with_component_ids() {
    let output = compile_fixture("id_collisions.json");
    let html = &output.html;
    assert_eq!(html.matches("id=\"pc-cta-a\"").count(), 1);
    assert_eq!(html.matches("id=\"pc-cta.a\"").count(), 1);
    assert_eq!(html.matches("id=\"pc-cta.b\"").count(), 1);
    assert_eq!(html.matches("id=\"pc-signup-email\"").count(), 1);
    assert_eq!(html.matches("id=\"pc-signup.email\"").count(), 1);
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_ab_skipped_for_container_with_children_and_missing_variant() {
    let output = compile_fixture("ab_test.json");
    assert!(!output.html.contains("data-ab-test=\"banner\""));
    assert!(!output.html.contains("data-ab-test=\"lonely\""));
    assert_eq!(output.html.matches("id=\"pc-banner-text\"").count(), 1);

    let skipped: Vec<(&str, Severity)> = output
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::AbTestSkipped)
        .map(|d| (d.component_id.as_deref().unwrap_or(""), d.severity))
        .collect();
    assert_eq!(
        skipped,
        vec![("banner", Severity::Info), ("lonely", Severity::Warning)]
    );
}

// Degradation and escaping

#[test]
fn test_add_to_calendar_without_title_degrades() {
    let output = compile_fixture("degraded.json");
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::MissingRequired && d.component_id.as_deref() == Some("cal")));
    assert!(output.html.contains("<div class=\"pc-warning\" role=\"note\" data-component=\"cal\">"));
    assert!(!output.html.contains("pagecraft.register(\"calendar\""));
    assert!(output.html.contains("still rendered"));
}

#[test]
fn test_unknown_type_and_bad_props_are_flagged() {
    let output = compile_fixture("degraded.json");
    let kinds = kinds(&output);
    assert!(kinds.contains(&DiagnosticKind::UnknownType));
    assert!(kinds.contains(&DiagnosticKind::InvalidProps));
    assert!(output.html.contains("unknown component type &#39;Carousel3D&#39;"));
}

#[test]
fn test_user_text_cannot_close_script_or_placeholder() {
    let output = compile_fixture("degraded.json");
    assert!(!output.html.contains("</script><script>alert(1)"));
    assert!(output.html.contains("&lt;/script&gt;&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(kinds(&output).contains(&DiagnosticKind::InvalidBinding));
    assert!(!output.html.contains("AttributeValue(\"Name"));
}

#[test]
fn test_publish_mode_hides_warnings() {
    let doc = load_fixture("degraded.json");
    let output = compile(&doc, &CompileOptions::publish());
    assert!(!output.html.contains("class=\"pc-warning\""));
    assert!(output.html.contains("<!-- pagecraft: AddToCalendar 'cal':"));
    assert!(!output.diagnostics.is_empty());
}

#[test]
fn test_compile_json_reports_decode_errors() {
    assert!(compile_json("{ not json", &CompileOptions::default()).is_err());
    let output = compile_json(r#"{"components": []}"#, &CompileOptions::default()).unwrap();
    assert!(output.diagnostics.is_empty());
    assert!(!output.html.contains("data-pagecraft-runtime"));
}
