mod common;

use chrono::NaiveDate;
use serde_json::{json, Value};

use legacy_planner_server::config::{BillingMode, ComposerConfig};
use legacy_planner_server::document::fields::{ItemFormat, ListSpec};
use legacy_planner_server::document::format::format_list;
use legacy_planner_server::document::generators::{
    generate, generator_for, DocumentKind, GenerateOptions, GenerationContext, GeneratorError,
};
use legacy_planner_server::document::layout::{DrawOp, Page, CONTINUED_MARKER, WATERMARK_TEXT};

const SSN: &str = "123-45-6789";
const DOB: &str = "1950-02-03";

fn context(config: &ComposerConfig) -> GenerationContext<'_> {
    GenerationContext {
        config,
        logo: None,
        generated_on: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    }
}

#[test]
fn test_jane_doe_binder_end_to_end() {
    let config = ComposerConfig::default();
    let ctx = context(&config);
    let data = common::jane_doe_plan();
    let generator = generator_for(DocumentKind::PlanBinder);

    let composed = generator.compose(&data, &GenerateOptions::default(), &ctx);
    assert!(composed.page_text(0).contains("Jane Doe"));
    assert!(composed.page_text(0).contains("June 1, 2024"));

    let contacts_page = composed
        .section_page("contacts")
        .expect("contacts section rendered");
    assert!(composed
        .page_text(contacts_page)
        .contains("John Doe - (executor) - 555-1234"));

    let doc = generator
        .generate(&data, &GenerateOptions::default(), &ctx)
        .unwrap();
    assert_eq!(doc.filename, "Planner-Doe-Jane.pdf");
    assert!(doc.pdf.starts_with(b"%PDF"));
    assert_eq!(doc.page_count, composed.page_count());
    assert_eq!(doc.generated_on, "June 1, 2024");
}

#[test]
fn test_privacy_fields_never_rendered() {
    let config = ComposerConfig::default();
    let ctx = context(&config);
    let mut data = common::jane_doe_plan();
    data["personal_profile"]["ssn"] = json!(SSN);
    data["personal_profile"]["date_of_birth"] = json!(DOB);
    data["personal_profile"]["dob"] = json!(DOB);
    data["notify_contacts"][0]["social_security_number"] = json!(SSN);
    data["notify_contacts"][0]["birth_date"] = json!(DOB);

    for kind in DocumentKind::ALL {
        let generator = generator_for(kind);
        let text = generator
            .compose(&data, &GenerateOptions::default(), &ctx)
            .all_text();
        assert!(!text.contains(SSN), "{} leaked the SSN", kind);
        assert!(!text.contains(DOB), "{} leaked the date of birth", kind);

        let doc = generator
            .generate(&data, &GenerateOptions::default(), &ctx)
            .unwrap();
        let bytes = String::from_utf8_lossy(&doc.pdf);
        assert!(!bytes.contains(SSN));
        assert!(!bytes.contains(DOB));
    }
}

#[test]
fn test_every_kind_survives_odd_payloads() {
    let config = ComposerConfig::default();
    let ctx = context(&config);
    let payloads: Vec<Value> = vec![
        json!(null),
        json!({}),
        json!([1, 2, 3]),
        json!({"personal_profile": "Jane"}),
        json!({"notify_contacts": {"name": "not a list"}, "pets": [null, 3, "Rex", {"name": "Tom"}]}),
        json!({"notes": {"messages": "\u{1F600} emoji \u{200D} and \u{0007} control"}}),
    ];

    for data in &payloads {
        for kind in DocumentKind::ALL {
            let doc = generate(kind, data, &GenerateOptions::default(), &ctx).unwrap();
            assert!(doc.page_count >= 1);
            assert!(doc.filename.starts_with("Planner"));
        }
    }
}

#[test]
fn test_every_kind_renders_sections_in_fixed_order() {
    let config = ComposerConfig::default();
    let ctx = context(&config);
    let expected: [(DocumentKind, Vec<&str>); 8] = [
        (
            DocumentKind::PlanBinder,
            vec![
                "personal", "family", "military", "contacts", "funeral", "financial",
                "property", "pets", "business", "digital", "legal", "messages", "instructions",
            ],
        ),
        (
            DocumentKind::PrePlanningChecklist,
            vec!["documents", "decisions", "conversations", "storage"],
        ),
        (
            DocumentKind::AfterDeathChecklist,
            vec!["first-24-hours", "people-to-call", "first-week", "first-month", "ongoing"],
        ),
        (
            DocumentKind::ReferenceGuide,
            vec!["key-contacts", "wishes", "where-to-find", "accounts"],
        ),
        (
            DocumentKind::WillPrepSummary,
            vec!["about", "testator", "fiduciaries", "assets", "wishes"],
        ),
        (
            DocumentKind::WillPrepOutline,
            vec![
                "about", "identification", "executor", "guardianship", "bequests",
                "residuary", "signing",
            ],
        ),
        (
            DocumentKind::AttorneyPacket,
            vec!["client", "family", "assets", "liabilities", "advisors", "questions"],
        ),
        (DocumentKind::FaqSheet, vec!["planning", "privacy"]),
    ];

    for (kind, sections) in expected {
        let composed = generator_for(kind).compose(&common::jane_doe_plan(), &GenerateOptions::default(), &ctx);
        assert_eq!(composed.section_ids(), sections, "{}", kind);
    }
}

#[test]
fn test_section_subset_keeps_layout_order() {
    let config = ComposerConfig::default();
    let ctx = context(&config);
    let options = GenerateOptions {
        draft: false,
        sections: Some(vec![
            "funeral".to_string(),
            "no-such-section".to_string(),
            "personal".to_string(),
        ]),
    };
    let composed = generator_for(DocumentKind::PlanBinder).compose(&common::jane_doe_plan(), &options, &ctx);
    assert_eq!(composed.section_ids(), vec!["personal", "funeral"]);
}

fn watermarked(page: &Page) -> bool {
    page.ops
        .iter()
        .any(|op| matches!(op, DrawOp::Watermark { text } if text == WATERMARK_TEXT))
}

#[test]
fn test_trial_billing_forces_watermark() {
    let config = ComposerConfig {
        billing_mode: BillingMode::Trial,
        ..ComposerConfig::default()
    };
    let ctx = context(&config);
    let composed = generator_for(DocumentKind::FaqSheet).compose(&json!({}), &GenerateOptions::default(), &ctx);
    assert!(composed.pages.iter().all(watermarked));

    let config = ComposerConfig::default();
    let ctx = context(&config);
    let composed = generator_for(DocumentKind::FaqSheet).compose(&json!({}), &GenerateOptions::default(), &ctx);
    assert!(!composed.pages.iter().any(watermarked));
}

#[test]
fn test_will_preparation_flag_disables_will_documents() {
    let mut config = ComposerConfig::default();
    config.features.will_preparation = false;
    let ctx = context(&config);

    let result = generate(
        DocumentKind::WillPrepSummary,
        &json!({}),
        &GenerateOptions::default(),
        &ctx,
    );
    assert!(matches!(
        result,
        Err(GeneratorError::FeatureDisabled(DocumentKind::WillPrepSummary))
    ));
    assert!(generate(DocumentKind::PlanBinder, &json!({}), &GenerateOptions::default(), &ctx).is_ok());
}

#[test]
fn test_long_notes_continue_without_truncation() {
    let config = ComposerConfig::default();
    let ctx = context(&config);
    let message: String = (1..=400)
        .map(|i| format!("sentence{} of my message.", i))
        .collect::<Vec<_>>()
        .join(" ");
    let data = json!({"notes": {"messages": message}});

    let composed = generator_for(DocumentKind::PlanBinder).compose(&data, &GenerateOptions::default(), &ctx);
    let text = composed.all_text();
    assert!(text.contains(CONTINUED_MARKER));
    assert!(text.contains("sentence1 "));
    assert!(text.contains("sentence400"));
}

#[test]
fn test_list_cap_boundary() {
    let spec = ListSpec::new("notify_contacts", "People", 3, ItemFormat::Contact);
    let contact = |i: usize| json!({"name": format!("Person {}", i)});

    let exactly_cap: Vec<Value> = (0..3).map(contact).collect();
    let lines = format_list(&exactly_cap, &spec);
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| !l.contains("more")));

    let over_cap: Vec<Value> = (0..4).map(contact).collect();
    let lines = format_list(&over_cap, &spec);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[3], "and 1 more");
    assert_eq!(lines[..3].iter().filter(|l| l.starts_with("Person")).count(), 3);
}
