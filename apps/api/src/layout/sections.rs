//! Per-archetype layout of the items of one section.
//!
//! Three strategies:
//! - `Entries`: title / subtitle / description with a right-aligned date pinned to
//!   the top of the entry (work, education, projects, certifications, custom).
//! - `InlineList`: every item joined into one wrapped line (skills, languages).
//! - `Generic`: bold title plus description, for section types we don't know.
//!
//! Strategies only ever receive items that already passed the validity check.

use tracing::warn;

use crate::errors::LayoutError;
use crate::layout::blocks::{BlockRenderer, TextStyle};
use crate::layout::font_metrics::TextMeasure;
use crate::models::resume::{Section, SectionItem, SectionKind};

const UNTITLED_PLACEHOLDER: &str = "Untitled entry";
const NO_DETAILS_PLACEHOLDER: &str = "No details provided";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Entries,
    InlineList,
    Generic,
}

impl Strategy {
    pub fn for_kind(kind: &SectionKind) -> Self {
        match kind {
            SectionKind::WorkExperience
            | SectionKind::Education
            | SectionKind::Projects
            | SectionKind::Certifications
            | SectionKind::Custom => Strategy::Entries,
            SectionKind::Skills | SectionKind::Languages => Strategy::InlineList,
            SectionKind::Unknown(_) => Strategy::Generic,
        }
    }
}

/// Lays out `items` (the section's valid items) below the section heading.
pub fn render_section<M: TextMeasure>(
    renderer: &mut BlockRenderer<'_, M>,
    section: &Section,
    items: &[&SectionItem],
) -> Result<(), LayoutError> {
    match Strategy::for_kind(&section.kind) {
        Strategy::Entries => render_entries(renderer, items),
        Strategy::InlineList => render_inline_list(renderer, items),
        Strategy::Generic => {
            warn!(
                section_type = section.kind.as_str(),
                title = %section.title,
                "Unknown section type; using generic layout"
            );
            render_generic(renderer, items)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Itemized entries
// ────────────────────────────────────────────────────────────────────────────

/// The display slots of an itemized entry, resolved per item variant.
#[derive(Debug, Default, PartialEq)]
struct Entry<'i> {
    primary: Option<&'i str>,
    secondary: Option<&'i str>,
    description: Option<&'i str>,
    date: Option<&'i str>,
    credential_id: Option<&'i str>,
}

impl<'i> Entry<'i> {
    fn from_item(item: &'i SectionItem) -> Self {
        match item {
            SectionItem::Work(work) => Entry {
                primary: work.job_title.as_deref(),
                secondary: work.company.as_deref(),
                description: work.description.as_deref(),
                date: work.date.as_deref(),
                credential_id: None,
            },
            SectionItem::Education(edu) => Entry {
                primary: edu.degree.as_deref(),
                secondary: edu.institution.as_deref(),
                description: edu.description.as_deref(),
                date: edu.date.as_deref(),
                credential_id: None,
            },
            SectionItem::Project(project) => Entry {
                primary: project.name.as_deref(),
                secondary: project.link.as_deref(),
                description: project.description.as_deref(),
                date: project.date.as_deref(),
                credential_id: None,
            },
            SectionItem::Certification(cert) => Entry {
                primary: cert.name.as_deref(),
                secondary: cert.issuer.as_deref(),
                description: cert.description.as_deref(),
                date: cert.date.as_deref(),
                credential_id: cert.credential_id.as_deref(),
            },
            // Custom entries never show a subtitle.
            SectionItem::Custom(custom) => Entry {
                primary: custom.title.as_deref(),
                secondary: None,
                description: custom.description.as_deref(),
                date: custom.date.as_deref(),
                credential_id: None,
            },
            SectionItem::Skill(skill) => Entry {
                primary: skill.name.as_deref(),
                ..Entry::default()
            },
            SectionItem::Language(language) => Entry {
                primary: language.name.as_deref(),
                secondary: language.level.as_deref(),
                ..Entry::default()
            },
            SectionItem::Generic(generic) => Entry {
                primary: generic.title.as_deref().or(generic.name.as_deref()),
                description: generic.description.as_deref(),
                ..Entry::default()
            },
        }
    }
}

/// Tracks the left column of one entry while it is drawn.
#[derive(Default)]
struct Column {
    /// Page and line-box top of the first element actually drawn.
    anchor: Option<(usize, f32)>,
    has_content: bool,
}

impl Column {
    /// Draws one left-column element, preceded by `gap` only when something was
    /// already drawn above it. Absent text adds neither content nor space.
    fn draw<M: TextMeasure>(
        &mut self,
        renderer: &mut BlockRenderer<'_, M>,
        text: Option<&str>,
        gap: f32,
        width: f32,
        style: TextStyle,
    ) -> Result<(), LayoutError> {
        let Some(text) = text else {
            return Ok(());
        };
        if self.has_content {
            renderer.advance(gap);
        }
        let x = renderer.config().margin;
        let placed = renderer.draw_paragraph(text, x, width, style)?;
        if !placed.is_empty() {
            self.anchor.get_or_insert((placed.page, placed.top));
            self.has_content = true;
        }
        Ok(())
    }
}

fn render_entries<M: TextMeasure>(
    renderer: &mut BlockRenderer<'_, M>,
    items: &[&SectionItem],
) -> Result<(), LayoutError> {
    let config = renderer.config();
    let date_style = TextStyle::secondary(config);

    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            renderer.advance(config.item_spacing);
        }

        let entry = Entry::from_item(item);
        // A date wider than its column wraps inside it; the left column takes the rest.
        let (date_width, date_height) = match entry.date {
            Some(date) => renderer.measure_pinned(date, config.max_date_width(), date_style)?,
            None => (0.0, 0.0),
        };
        let column_width = if date_width > 0.0 {
            config.content_width() - date_width - config.date_gutter
        } else {
            config.content_width()
        };
        if date_height > 0.0 {
            renderer.reserve(date_height)?;
        }

        let sub = config.sub_item_spacing;
        let mut column = Column::default();
        column.draw(
            renderer,
            entry.primary,
            0.0,
            column_width,
            TextStyle::body(config)
                .bold()
                .line_height(config.line_height_tight),
        )?;
        column.draw(
            renderer,
            entry.secondary,
            sub,
            column_width,
            TextStyle::secondary(config),
        )?;
        column.draw(
            renderer,
            entry.description,
            sub * 1.5,
            column_width,
            TextStyle::body(config),
        )?;
        let credential = entry.credential_id.map(|id| format!("Credential ID: {id}"));
        column.draw(
            renderer,
            credential.as_deref(),
            sub,
            column_width,
            TextStyle::secondary(config)
                .size(config.font_size_xsmall)
                .line_height(config.line_height_normal),
        )?;

        if let Some(date) = entry.date {
            let (page, top) = column
                .anchor
                .unwrap_or((renderer.page_index(), renderer.cursor_y()));
            let pinned =
                renderer.draw_pinned(date, page, top, config.max_date_width(), date_style)?;
            // A date stack taller than the column pushes the next item down.
            if pinned.page == renderer.page_index() && pinned.bottom > renderer.cursor_y() {
                renderer.advance(pinned.bottom - renderer.cursor_y());
            }
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Inline list
// ────────────────────────────────────────────────────────────────────────────

/// `name` for skills, `name (level)` for languages with a level.
fn inline_label(item: &SectionItem) -> Option<String> {
    match item {
        SectionItem::Skill(skill) => skill.name.clone(),
        SectionItem::Language(language) => {
            let name = language.name.as_deref()?;
            Some(match language.level.as_deref() {
                Some(level) => format!("{name} ({level})"),
                None => name.to_string(),
            })
        }
        other => Entry::from_item(other).primary.map(str::to_string),
    }
}

fn render_inline_list<M: TextMeasure>(
    renderer: &mut BlockRenderer<'_, M>,
    items: &[&SectionItem],
) -> Result<(), LayoutError> {
    let config = renderer.config();
    let labels: Vec<String> = items.iter().filter_map(|item| inline_label(item)).collect();
    let text = labels.join(config.list_separator);
    if text.trim().is_empty() {
        return Ok(());
    }
    renderer.draw_paragraph(
        &text,
        config.margin,
        config.content_width(),
        TextStyle::body(config),
    )?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Generic fallback
// ────────────────────────────────────────────────────────────────────────────

fn render_generic<M: TextMeasure>(
    renderer: &mut BlockRenderer<'_, M>,
    items: &[&SectionItem],
) -> Result<(), LayoutError> {
    let config = renderer.config();
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            renderer.advance(config.item_spacing);
        }
        let entry = Entry::from_item(item);
        renderer.draw_paragraph(
            entry.primary.unwrap_or(UNTITLED_PLACEHOLDER),
            config.margin,
            config.content_width(),
            TextStyle::body(config)
                .bold()
                .line_height(config.line_height_tight),
        )?;
        renderer.advance(config.sub_item_spacing);
        renderer.draw_paragraph(
            entry.description.unwrap_or(NO_DETAILS_PLACEHOLDER),
            config.margin,
            config.content_width(),
            TextStyle::body(config),
        )?;
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::{LayoutConfig, COLOR_GRAY};
    use crate::layout::font_metrics::FontStyle;
    use crate::layout::font_metrics::StandardFontMetrics;
    use crate::layout::page::{Page, TextAlign, TextRun};
    use crate::models::resume::{
        CertificationItem, CustomItem, GenericItem, LanguageItem, SkillItem, WorkItem,
    };

    fn section(kind: SectionKind, items: Vec<SectionItem>) -> Section {
        Section {
            id: None,
            kind,
            title: "Title".to_string(),
            items,
        }
    }

    fn run_section(section: &Section) -> Vec<Page> {
        let config = LayoutConfig::a4();
        let measure = StandardFontMetrics;
        let mut renderer = BlockRenderer::new(&config, &measure);
        let items = section.valid_items();
        render_section(&mut renderer, section, &items).unwrap();
        renderer.into_pages()
    }

    fn texts(pages: &[Page]) -> Vec<TextRun> {
        pages.iter().flat_map(|p| p.text_runs().cloned()).collect()
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_strategy_selection() {
        assert_eq!(Strategy::for_kind(&SectionKind::Education), Strategy::Entries);
        assert_eq!(Strategy::for_kind(&SectionKind::Custom), Strategy::Entries);
        assert_eq!(Strategy::for_kind(&SectionKind::Languages), Strategy::InlineList);
        assert_eq!(
            Strategy::for_kind(&SectionKind::Unknown("awards".to_string())),
            Strategy::Generic
        );
    }

    #[test]
    fn test_work_entry_layout() {
        let s = section(
            SectionKind::WorkExperience,
            vec![SectionItem::Work(WorkItem {
                job_title: some("Engineer"),
                company: some("Analytical Co"),
                date: some("2020"),
                description: some("Built things"),
            })],
        );
        let runs = texts(&run_section(&s));
        let order: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(order, vec!["Engineer", "Analytical Co", "Built things", "2020"]);

        assert_eq!(runs[0].style, FontStyle::Bold);
        assert_eq!(runs[1].color, COLOR_GRAY);
        assert_eq!(runs[1].font_size, 9.0);
        assert_eq!(runs[3].align, TextAlign::Right);
        // Date is pinned to the top of the entry, not to where the column ended.
        assert_eq!(runs[3].y, runs[0].y);
    }

    #[test]
    fn test_date_stays_pinned_when_left_column_wraps() {
        let long = "Designed and operated the difference engine workflow ".repeat(8);
        let s = section(
            SectionKind::WorkExperience,
            vec![SectionItem::Work(WorkItem {
                job_title: Some(long.trim().to_string()),
                company: None,
                date: some("1843 - 1852"),
                description: None,
            })],
        );
        let runs = texts(&run_section(&s));
        let date = runs.iter().find(|r| r.text == "1843 - 1852").unwrap();
        let title_lines: Vec<&TextRun> = runs.iter().filter(|r| r.text != "1843 - 1852").collect();
        assert!(title_lines.len() > 1);
        assert_eq!(date.y, title_lines[0].y);
        // The wrapped title never runs under the date column.
        for line in &title_lines {
            assert!(line.x + line.width <= date.x);
        }
    }

    #[test]
    fn test_blank_elements_add_no_spacing() {
        let config = LayoutConfig::a4();
        let with_company = section(
            SectionKind::WorkExperience,
            vec![SectionItem::Work(WorkItem {
                job_title: some("Engineer"),
                company: None,
                date: None,
                description: some("Built things"),
            })],
        );
        let runs = texts(&run_section(&with_company));
        // title (11pt box) + sub*1.5 gap, then description.
        let expected = runs[0].y + 11.0 + config.sub_item_spacing * 1.5;
        assert!((runs[1].y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_custom_entry_has_no_subtitle() {
        let s = section(
            SectionKind::Custom,
            vec![SectionItem::Custom(CustomItem {
                title: some("Hiking"),
                date: None,
                description: some("Exploring trails"),
            })],
        );
        let order: Vec<String> = texts(&run_section(&s)).into_iter().map(|r| r.text).collect();
        assert_eq!(order, vec!["Hiking", "Exploring trails"]);
    }

    #[test]
    fn test_certification_credential_line() {
        let s = section(
            SectionKind::Certifications,
            vec![SectionItem::Certification(CertificationItem {
                name: some("Kubernetes Admin"),
                issuer: some("CNCF"),
                date: None,
                description: None,
                credential_id: some("TP-123"),
            })],
        );
        let runs = texts(&run_section(&s));
        let credential = runs.last().unwrap();
        assert_eq!(credential.text, "Credential ID: TP-123");
        assert_eq!(credential.font_size, 8.0);
    }

    #[test]
    fn test_certification_description_precedes_credential() {
        let s = section(
            SectionKind::Certifications,
            vec![SectionItem::Certification(CertificationItem {
                name: some("CKA"),
                issuer: some("CNCF"),
                date: None,
                description: some("Cluster admin exam"),
                credential_id: some("X1"),
            })],
        );
        let order: Vec<String> = texts(&run_section(&s)).into_iter().map(|r| r.text).collect();
        assert_eq!(
            order,
            vec!["CKA", "CNCF", "Cluster admin exam", "Credential ID: X1"]
        );
    }

    #[test]
    fn test_long_date_wraps_beside_the_title() {
        let config = LayoutConfig::a4();
        let date = "January 2019 - Present, part time and remote, with two long sabbaticals";
        let item = |title: &str| {
            SectionItem::Work(WorkItem {
                job_title: some(title),
                company: None,
                date: some(date),
                description: None,
            })
        };
        let s = section(
            SectionKind::WorkExperience,
            vec![item("Principal engineer of the analytical engine"), item("Next")],
        );
        let runs = texts(&run_section(&s));
        let first_title = runs.iter().position(|r| r.style == FontStyle::Bold).unwrap();
        let next = runs.iter().position(|r| r.text == "Next").unwrap();
        let titles: Vec<&TextRun> = runs[first_title..next]
            .iter()
            .filter(|r| r.style == FontStyle::Bold)
            .collect();
        let dates: Vec<&TextRun> = runs[first_title..next]
            .iter()
            .filter(|r| r.align == TextAlign::Right)
            .collect();

        assert!(dates.len() > 1);
        assert_eq!(dates[0].y, titles[0].y);
        for date_line in &dates {
            assert!(date_line.width <= config.max_date_width() + 1e-3);
            for title in &titles {
                assert!(title.x + title.width <= date_line.x);
            }
        }
        let date_bottom = dates.last().map(|r| r.y + r.line_height).unwrap();
        assert!(runs[next].y >= date_bottom + config.item_spacing - 1e-3);
    }

    #[test]
    fn test_items_are_separated_by_item_spacing() {
        let config = LayoutConfig::a4();
        let item = |t: &str| {
            SectionItem::Work(WorkItem {
                job_title: some(t),
                ..WorkItem::default()
            })
        };
        let s = section(SectionKind::WorkExperience, vec![item("First"), item("Second")]);
        let runs = texts(&run_section(&s));
        assert!((runs[1].y - runs[0].y - (11.0 + config.item_spacing)).abs() < 1e-3);
    }

    #[test]
    fn test_skills_join_valid_names_only() {
        let s = section(
            SectionKind::Skills,
            vec![
                SectionItem::Skill(SkillItem { name: some("Math") }),
                SectionItem::Skill(SkillItem { name: None }),
                SectionItem::Skill(SkillItem { name: some("Poetry") }),
            ],
        );
        let runs = texts(&run_section(&s));
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Math \u{2022} Poetry");
    }

    #[test]
    fn test_languages_include_level_when_present() {
        let s = section(
            SectionKind::Languages,
            vec![
                SectionItem::Language(LanguageItem {
                    name: some("English"),
                    level: some("Native"),
                }),
                SectionItem::Language(LanguageItem {
                    name: some("French"),
                    level: None,
                }),
            ],
        );
        let runs = texts(&run_section(&s));
        assert_eq!(runs[0].text, "English (Native) \u{2022} French");
    }

    #[test]
    fn test_generic_fallback_uses_placeholders() {
        let s = section(
            SectionKind::Unknown("awards".to_string()),
            vec![SectionItem::Generic(GenericItem {
                title: some("Best Paper"),
                name: None,
                description: None,
            })],
        );
        let order: Vec<String> = texts(&run_section(&s)).into_iter().map(|r| r.text).collect();
        assert_eq!(order, vec!["Best Paper", NO_DETAILS_PLACEHOLDER]);
    }

    #[test]
    fn test_generic_name_is_shown_when_title_is_missing() {
        let s = section(
            SectionKind::Unknown("awards".to_string()),
            vec![SectionItem::Generic(GenericItem {
                title: None,
                name: some("Turing Award"),
                description: some("For the notes"),
            })],
        );
        let order: Vec<String> = texts(&run_section(&s)).into_iter().map(|r| r.text).collect();
        assert_eq!(order, vec!["Turing Award", "For the notes"]);
    }
}
