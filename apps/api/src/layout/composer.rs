//! Lays out a whole résumé: header, profile, then each section in order.
//!
//! The run is synchronous and owns all of its state. The same document always
//! produces the same pages; a failure anywhere returns the error and no pages.

use tracing::debug;

use crate::errors::LayoutError;
use crate::layout::blocks::{BlockRenderer, TextStyle};
use crate::layout::config::{LayoutConfig, COLOR_PRIMARY};
use crate::layout::font_metrics::{StandardFontMetrics, TextMeasure};
use crate::layout::page::{Page, TextAlign};
use crate::layout::sections::render_section;
use crate::models::resume::{PersonalInfo, ResumeDocument};

const PROFILE_HEADING: &str = "PROFILE";

/// Lays out `document` on A4 pages with the built-in Helvetica metrics.
pub fn compose_document(document: &ResumeDocument) -> Result<Vec<Page>, LayoutError> {
    compose_with(document, &LayoutConfig::a4(), &StandardFontMetrics)
}

/// Lays out `document` with an explicit configuration and measurement provider.
pub fn compose_with<M: TextMeasure>(
    document: &ResumeDocument,
    config: &LayoutConfig,
    measure: &M,
) -> Result<Vec<Page>, LayoutError> {
    let mut renderer = BlockRenderer::new(config, measure);

    draw_header(&mut renderer, &document.personal_info)?;

    if let Some(summary) = document.personal_info.summary.as_deref() {
        renderer.advance(config.section_spacing / 2.0);
        draw_section_heading(&mut renderer, PROFILE_HEADING)?;
        renderer.draw_paragraph(
            summary,
            config.margin,
            config.content_width(),
            TextStyle::body(config),
        )?;
    }

    let mut rendered = 0usize;
    for section in &document.sections {
        let items = section.valid_items();
        if items.is_empty() {
            debug!(
                section_type = section.kind.as_str(),
                title = %section.title,
                "Skipping section with no valid items"
            );
            continue;
        }

        renderer.advance(config.section_spacing);
        draw_section_heading(&mut renderer, &section.title.to_uppercase())?;
        render_section(&mut renderer, section, &items)?;
        rendered += 1;
    }

    let pages = renderer.into_pages();
    debug!(
        pages = pages.len(),
        sections = rendered,
        skipped = document.sections.len() - rendered,
        "Layout complete"
    );
    Ok(pages)
}

/// Name, job title and contact line, each centered and each only when present.
fn draw_header<M: TextMeasure>(
    renderer: &mut BlockRenderer<'_, M>,
    info: &PersonalInfo,
) -> Result<(), LayoutError> {
    let config = renderer.config();
    let centered = |style: TextStyle| style.align(TextAlign::Center);

    if let Some(name) = info.full_name.as_deref() {
        renderer.draw_paragraph(
            name,
            config.margin,
            config.content_width(),
            centered(
                TextStyle::body(config)
                    .bold()
                    .size(config.font_size_h1)
                    .line_height(config.line_height_tight),
            ),
        )?;
        renderer.advance(config.gap_after_name);
    }

    if let Some(job_title) = info.job_title.as_deref() {
        renderer.draw_paragraph(
            job_title,
            config.margin,
            config.content_width(),
            centered(
                TextStyle::body(config)
                    .size(config.font_size_h2)
                    .color(COLOR_PRIMARY)
                    .line_height(config.line_height_tight),
            ),
        )?;
        renderer.advance(config.gap_after_job_title);
    }

    let contact = contact_line(info, config.list_separator);
    if !contact.is_empty() {
        renderer.draw_paragraph(
            &contact,
            config.margin,
            config.content_width(),
            centered(TextStyle::secondary(config)),
        )?;
        renderer.advance(config.gap_after_contact);
    }
    Ok(())
}

/// Email, phone and address joined by `separator`, skipping the absent ones.
pub fn contact_line(info: &PersonalInfo, separator: &str) -> String {
    [&info.email, &info.phone, &info.address]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Divider, gap, then the upper-cased heading text.
fn draw_section_heading<M: TextMeasure>(
    renderer: &mut BlockRenderer<'_, M>,
    heading: &str,
) -> Result<(), LayoutError> {
    let gap = renderer.config().divider_title_gap;
    let divider = renderer.draw_divider()?;
    renderer.advance(gap);
    let placed = renderer.draw_heading(heading)?;
    if divider.page_broke || placed.page_broke {
        debug!(heading, page = placed.page + 1, "Section starts on a new page");
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::COLOR_GRAY;
    use crate::layout::font_metrics::{FontSpec, FontStyle};
    use crate::layout::page::{DrawOp, TextRun};
    use serde_json::{json, Value};

    fn doc(value: Value) -> ResumeDocument {
        serde_json::from_value(value).unwrap()
    }

    fn all_runs(pages: &[Page]) -> Vec<(usize, TextRun)> {
        pages
            .iter()
            .enumerate()
            .flat_map(|(i, p)| p.text_runs().cloned().map(move |r| (i, r)))
            .collect()
    }

    fn line_count(pages: &[Page]) -> usize {
        pages
            .iter()
            .flat_map(|p| &p.elements)
            .filter(|op| matches!(op, DrawOp::Line(_)))
            .count()
    }

    fn ada() -> Value {
        json!({
            "personalInfo": { "fullName": "Ada Lovelace" },
            "sections": [
                {
                    "id": "s1", "type": "workExperience", "title": "Experience",
                    "items": [{ "jobTitle": "Engineer", "company": "Analytical Co",
                                "date": "2020", "description": "Built things" }]
                },
                {
                    "id": "s2", "type": "skills", "title": "Skills",
                    "items": [{ "name": "Math" }, { "name": "" }]
                }
            ]
        })
    }

    #[test]
    fn test_end_to_end_ada() {
        let config = LayoutConfig::a4();
        let pages = compose_document(&doc(ada())).unwrap();
        assert_eq!(pages.len(), 1);

        let runs: Vec<TextRun> = all_runs(&pages).into_iter().map(|(_, r)| r).collect();
        let order: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "Ada Lovelace",
                "EXPERIENCE",
                "Engineer",
                "Analytical Co",
                "Built things",
                "2020",
                "SKILLS",
                "Math",
            ]
        );
        assert_eq!(line_count(&pages), 2);

        let name = &runs[0];
        assert_eq!(name.align, TextAlign::Center);
        assert_eq!(name.style, FontStyle::Bold);
        assert_eq!(name.font_size, config.font_size_h1);
        let left_gap = name.x - config.margin;
        let right_gap = config.page_width - config.margin - (name.x + name.width);
        assert!((left_gap - right_gap).abs() < 1e-3);

        assert_eq!(runs[2].style, FontStyle::Bold);
        assert_eq!(runs[3].color, COLOR_GRAY);
        assert_eq!(runs[5].align, TextAlign::Right);
        assert_eq!(runs[5].y, runs[2].y);
        assert!(!runs[7].text.contains('\u{2022}'));
    }

    #[test]
    fn test_layout_is_deterministic() {
        let document = doc(ada());
        let first = compose_document(&document).unwrap();
        let second = compose_document(&document).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_empty_section_contributes_nothing() {
        let with_empty = doc(json!({
            "personalInfo": { "fullName": "Ada Lovelace" },
            "sections": [
                { "type": "skills", "title": "Skills", "items": [{ "name": "Math" }] },
                { "type": "education", "title": "Ghost Section", "items": [{ "institution": "Nowhere" }] },
                { "type": "languages", "title": "Languages", "items": [{ "name": "English" }] }
            ]
        }));
        let without_empty = doc(json!({
            "personalInfo": { "fullName": "Ada Lovelace" },
            "sections": [
                { "type": "skills", "title": "Skills", "items": [{ "name": "Math" }] },
                { "type": "languages", "title": "Languages", "items": [{ "name": "English" }] }
            ]
        }));
        let a = compose_document(&with_empty).unwrap();
        let b = compose_document(&without_empty).unwrap();
        assert_eq!(a, b);
        assert!(all_runs(&a).iter().all(|(_, r)| !r.text.contains("GHOST")));
    }

    #[test]
    fn test_section_with_only_blank_item_has_no_heading() {
        let pages = compose_document(&doc(json!({
            "sections": [
                { "type": "workExperience", "title": "Experience",
                  "items": [{ "jobTitle": "   ", "company": "Acme" }] }
            ]
        })))
        .unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_unknown_section_with_name_only_items_is_skipped() {
        let pages = compose_document(&doc(json!({
            "sections": [
                { "type": "awards", "title": "Awards", "items": [{ "name": "Prize" }] }
            ]
        })))
        .unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_contact_line_skips_blank_fields() {
        let cases = [
            (json!({ "email": "a@b.c", "phone": "", "address": "London" }), "a@b.c \u{2022} London"),
            (json!({ "email": "", "phone": "123", "address": " " }), "123"),
            (json!({ "email": "a@b.c", "phone": "123", "address": "London" }), "a@b.c \u{2022} 123 \u{2022} London"),
            (json!({}), ""),
        ];
        for (info, expected) in cases {
            let info: PersonalInfo = serde_json::from_value(info).unwrap();
            assert_eq!(contact_line(&info, " \u{2022} "), expected);
        }
    }

    #[test]
    fn test_header_renders_contact_line_centered() {
        let pages = compose_document(&doc(json!({
            "personalInfo": { "fullName": "Ada", "jobTitle": "Mathematician",
                              "email": "ada@example.com", "address": "London" }
        })))
        .unwrap();
        let runs: Vec<TextRun> = all_runs(&pages).into_iter().map(|(_, r)| r).collect();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].color, COLOR_PRIMARY);
        assert_eq!(runs[2].text, "ada@example.com \u{2022} London");
        assert_eq!(runs[2].align, TextAlign::Center);
    }

    #[test]
    fn test_profile_heading_precedes_summary() {
        let pages = compose_document(&doc(json!({
            "personalInfo": { "fullName": "Ada", "summary": "Analyst of engines." }
        })))
        .unwrap();
        let order: Vec<String> = all_runs(&pages).into_iter().map(|(_, r)| r.text).collect();
        assert_eq!(order, vec!["Ada", "PROFILE", "Analyst of engines."]);
        assert_eq!(line_count(&pages), 1);
    }

    fn assert_within_margins(pages: &[Page], config: &LayoutConfig) {
        for page in pages {
            for op in &page.elements {
                let (top, bottom) = op.vertical_extent();
                assert!(top >= config.margin - 1e-3, "element above top margin: {op:?}");
                assert!(
                    bottom <= config.bottom_limit() + 1e-3,
                    "element crosses bottom margin: {op:?}"
                );
            }
        }
    }

    #[test]
    fn test_long_document_keeps_every_element_inside_margins() {
        let config = LayoutConfig::a4();
        let items: Vec<Value> = (0..25)
            .map(|i| {
                json!({
                    "jobTitle": format!("Role {i}"),
                    "company": "Analytical Co",
                    "date": "1843",
                    "description": "Wrote notes on the engine and its programs. ".repeat(4)
                })
            })
            .collect();
        let pages = compose_document(&doc(json!({
            "personalInfo": { "fullName": "Ada" },
            "sections": [{ "type": "workExperience", "title": "Experience", "items": items }]
        })))
        .unwrap();
        assert!(pages.len() >= 2);
        assert_within_margins(&pages, &config);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
        }
    }

    #[test]
    fn test_summary_crossing_bottom_starts_at_top_of_next_page() {
        let config = LayoutConfig {
            page_height: 320.0,
            ..LayoutConfig::a4()
        };
        let measure = StandardFontMetrics;
        let summary = "Curious analyst of computing engines and their notation. ".repeat(30);
        let lines = measure
            .wrap_to_width(
                summary.trim(),
                FontSpec::new(config.font_size_body, FontStyle::Normal),
                config.content_width(),
            )
            .unwrap();
        let block = lines.len() as f32 * 13.0;
        assert!(block <= config.usable_height());

        let pages = compose_with(
            &doc(json!({ "personalInfo": { "fullName": "Ada", "summary": summary } })),
            &config,
            &measure,
        )
        .unwrap();
        assert_eq!(pages.len(), 2);

        let runs = all_runs(&pages);
        let heading = runs.iter().find(|(_, r)| r.text == PROFILE_HEADING).unwrap();
        assert_eq!(heading.0, 0);
        assert!(heading.1.y + 18.0 + block > config.bottom_limit());

        let summary_runs: Vec<&(usize, TextRun)> = runs
            .iter()
            .filter(|(_, r)| r.font_size == config.font_size_body)
            .collect();
        assert_eq!(summary_runs.len(), lines.len());
        assert!(summary_runs.iter().all(|(page, _)| *page == 1));
        assert_eq!(summary_runs[0].1.y, config.margin);
        assert_within_margins(&pages, &config);
    }

    #[test]
    fn test_unknown_section_falls_back_to_generic_layout() {
        let pages = compose_document(&doc(json!({
            "sections": [{ "type": "awards", "title": "Awards",
                           "items": [{ "title": "Best Paper", "description": "Bernoulli numbers" }] }]
        })))
        .unwrap();
        let order: Vec<String> = all_runs(&pages).into_iter().map(|(_, r)| r.text).collect();
        assert_eq!(order, vec!["AWARDS", "Best Paper", "Bernoulli numbers"]);
    }

    #[test]
    fn test_sections_not_an_array_renders_header_only() {
        let pages = compose_document(&doc(json!({
            "personalInfo": { "fullName": "Ada" },
            "sections": { "type": "skills" }
        })))
        .unwrap();
        let order: Vec<String> = all_runs(&pages).into_iter().map(|(_, r)| r.text).collect();
        assert_eq!(order, vec!["Ada"]);
    }

    #[test]
    fn test_page_limit_fails_whole_run() {
        let config = LayoutConfig {
            max_pages: 1,
            ..LayoutConfig::a4()
        };
        let items: Vec<Value> = (0..30)
            .map(|i| json!({ "jobTitle": format!("Role {i}"), "description": "Did work. ".repeat(20) }))
            .collect();
        let document = doc(json!({
            "sections": [{ "type": "workExperience", "title": "Work", "items": items }]
        }));
        let err = compose_with(&document, &config, &StandardFontMetrics).unwrap_err();
        assert_eq!(err, LayoutError::PageLimitExceeded { limit: 1 });
    }
}
