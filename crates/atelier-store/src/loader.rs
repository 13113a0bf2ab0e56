//! One load cycle: fetch every expected resource, then assemble a snapshot.
//!
//! Fetches for all categories run concurrently. A failed fetch only
//! removes that one resource; the cycle itself never fails. Single-file
//! categories fill missing fields from built-in defaults, sequence
//! categories fall back to their built-in list only when nothing at all
//! was fetched for them. If assembly rejects the fetched data, the whole
//! built-in snapshot is published instead.

use std::collections::HashSet;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, error, warn};

use atelier_content::{
    defaults, parse_frontmatter, About, Category, ContentSnapshot, Footer, FrontmatterRecord,
    FrontmatterValue, GalleryItem, Hero, Project, ResourceDescriptor, Service,
};
use atelier_core::{Error, Result};

use crate::source::ContentSource;

/// What happened during one load cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleReport {
    /// Resources the descriptor asked for.
    pub requested: usize,
    /// Resources fetched successfully.
    pub fetched: usize,
    /// Resources whose fetch failed.
    pub failed: usize,
    /// Sequence items hidden by `published: false`.
    pub unpublished: usize,
    /// Categories that used built-in content because nothing usable was fetched.
    pub fallback_categories: Vec<Category>,
    /// Whether assembly failed and the full built-in snapshot was published.
    pub used_full_fallback: bool,
}

/// Fetched records for every category, in descriptor order.
///
/// `None` marks a failed fetch.
#[derive(Debug, Default)]
struct RawContent {
    hero: Vec<Option<FrontmatterRecord>>,
    about: Vec<Option<FrontmatterRecord>>,
    services: Vec<Option<FrontmatterRecord>>,
    projects: Vec<Option<FrontmatterRecord>>,
    gallery: Vec<Option<FrontmatterRecord>>,
    footer: Vec<Option<FrontmatterRecord>>,
}

impl RawContent {
    fn all(&self) -> impl Iterator<Item = &Option<FrontmatterRecord>> {
        self.hero
            .iter()
            .chain(&self.about)
            .chain(&self.services)
            .chain(&self.projects)
            .chain(&self.gallery)
            .chain(&self.footer)
    }
}

/// Run one load cycle against `source`.
///
/// Always produces a snapshot with `loading == false`.
pub async fn load_snapshot(
    source: &dyn ContentSource,
    descriptor: &ResourceDescriptor,
) -> (ContentSnapshot, CycleReport) {
    let raw = fetch_all(source, descriptor).await;

    let mut report = CycleReport {
        requested: descriptor.total_resources(),
        ..Default::default()
    };
    report.fetched = raw.all().filter(|r| r.is_some()).count();
    report.failed = raw.all().filter(|r| r.is_none()).count();

    match assemble(raw, &mut report) {
        Ok(snapshot) => (snapshot, report),
        Err(e) => {
            error!(error = %e, "content aggregation failed, publishing built-in content");
            report.used_full_fallback = true;
            report.fallback_categories = Category::ALL.to_vec();
            (ContentSnapshot::fallback(), report)
        }
    }
}

async fn fetch_all(source: &dyn ContentSource, descriptor: &ResourceDescriptor) -> RawContent {
    let (hero, about, services, projects, gallery, footer) = futures::join!(
        fetch_category(source, descriptor, Category::Hero),
        fetch_category(source, descriptor, Category::About),
        fetch_category(source, descriptor, Category::Services),
        fetch_category(source, descriptor, Category::Projects),
        fetch_category(source, descriptor, Category::Gallery),
        fetch_category(source, descriptor, Category::Footer),
    );
    RawContent {
        hero,
        about,
        services,
        projects,
        gallery,
        footer,
    }
}

async fn fetch_category(
    source: &dyn ContentSource,
    descriptor: &ResourceDescriptor,
    category: Category,
) -> Vec<Option<FrontmatterRecord>> {
    let paths = descriptor.paths(category);
    join_all(paths.iter().map(|path| fetch_record(source, category, path))).await
}

async fn fetch_record(
    source: &dyn ContentSource,
    category: Category,
    path: &str,
) -> Option<FrontmatterRecord> {
    match source.fetch(path).await {
        Ok(text) => {
            let record = parse_frontmatter(&text);
            if record.is_empty() {
                debug!(%category, path, "resource has no frontmatter");
            }
            Some(record)
        }
        Err(e) => {
            warn!(%category, path, error = %e, "content resource unavailable");
            None
        }
    }
}

fn assemble(raw: RawContent, report: &mut CycleReport) -> Result<ContentSnapshot> {
    let hero = single(raw.hero, Category::Hero, report).map_or_else(Hero::default, Hero::from_record);
    let about =
        single(raw.about, Category::About, report).map_or_else(About::default, About::from_record);
    let footer = single(raw.footer, Category::Footer, report)
        .map_or_else(Footer::default, Footer::from_record);

    let services = sequence(raw.services, Category::Services, report, |record, _| {
        Service::from_record(record)
    })
    .unwrap_or_else(defaults::services);

    let projects = sequence(raw.projects, Category::Projects, report, Project::from_record)
        .unwrap_or_else(defaults::projects);
    ensure_unique_ids(Category::Projects, projects.iter().map(|p| p.id))?;

    let mut gallery = sequence(raw.gallery, Category::Gallery, report, GalleryItem::from_record)
        .unwrap_or_else(defaults::gallery);
    ensure_unique_ids(Category::Gallery, gallery.iter().map(|g| g.id))?;
    gallery.sort_by_key(|item| item.order);

    Ok(ContentSnapshot {
        hero: Some(hero),
        about: Some(about),
        services,
        projects,
        gallery,
        footer: Some(footer),
        loading: false,
    })
}

/// The record for a single-file category, if one was fetched.
///
/// A missing record means every field takes its default.
fn single(
    records: Vec<Option<FrontmatterRecord>>,
    category: Category,
    report: &mut CycleReport,
) -> Option<FrontmatterRecord> {
    let record = records.into_iter().flatten().find(|r| !r.is_empty());
    if record.is_none() {
        report.fallback_categories.push(category);
    }
    record
}

/// Build a sequence category from its fetched records.
///
/// Returns `None` when no resource yielded a non-empty record, which
/// selects the built-in list. Otherwise unpublished records are dropped
/// and the rest keep descriptor order. `build` receives the record and the
/// id to use if the record declares none (see [`fallback_ids`]).
fn sequence<T>(
    records: Vec<Option<FrontmatterRecord>>,
    category: Category,
    report: &mut CycleReport,
    build: impl Fn(FrontmatterRecord, i64) -> T,
) -> Option<Vec<T>> {
    let yielded: Vec<(usize, FrontmatterRecord)> = records
        .into_iter()
        .enumerate()
        .filter_map(|(position, record)| {
            record
                .filter(|r| !r.is_empty())
                .map(|record| (position, record))
        })
        .collect();

    if yielded.is_empty() {
        debug!(%category, "no resources fetched, using built-in content");
        report.fallback_categories.push(category);
        return None;
    }

    let total = yielded.len();
    let published: Vec<(usize, FrontmatterRecord)> = yielded
        .into_iter()
        .filter(|(_, record)| record.is_published())
        .collect();
    let ids = fallback_ids(&published);
    let items: Vec<T> = published
        .into_iter()
        .zip(ids)
        .map(|((_, record), id)| build(record, id))
        .collect();

    let hidden = total - items.len();
    if hidden > 0 {
        debug!(%category, hidden, "skipped unpublished items");
        report.unpublished += hidden;
    }
    Some(items)
}

/// Ids for records that do not declare an integer `id`.
///
/// Such a record gets one past its descriptor position, moved up past any
/// id declared or already handed out in the same category. Entries for
/// records that declare an id are that id.
fn fallback_ids(records: &[(usize, FrontmatterRecord)]) -> Vec<i64> {
    let declared = |record: &FrontmatterRecord| record.get("id").and_then(FrontmatterValue::as_i64);
    let mut taken: HashSet<i64> = records.iter().filter_map(|(_, r)| declared(r)).collect();
    records
        .iter()
        .map(|(position, record)| {
            declared(record).unwrap_or_else(|| {
                let mut id = *position as i64 + 1;
                while !taken.insert(id) {
                    id += 1;
                }
                id
            })
        })
        .collect()
}

fn ensure_unique_ids(category: Category, ids: impl Iterator<Item = i64>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::invalid_data(format!("duplicate {category} id {id}")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::source::{MockResponse, MockSource};

    fn doc(fields: &str) -> String {
        format!("---\n{fields}\n---\nBody text\n")
    }

    #[tokio::test]
    async fn test_all_failures_produce_builtin_snapshot() {
        let source = MockSource::failing();
        let (snapshot, report) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        assert_eq!(snapshot, ContentSnapshot::fallback());
        assert!(!snapshot.loading);
        assert_eq!(report.requested, 17);
        assert_eq!(report.failed, 17);
        assert_eq!(report.fetched, 0);
        assert_eq!(report.fallback_categories.len(), 6);
        assert!(!report.used_full_fallback);
    }

    #[tokio::test]
    async fn test_partial_services_are_not_padded() {
        let source = MockSource::new()
            .with_body("/services/interior-design.md", doc("title: Interiors"))
            .with_body("/services/party-wall.md", doc("title: Party Wall"));
        let (snapshot, report) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        let titles: Vec<_> = snapshot
            .services
            .iter()
            .map(|s| s.title.as_deref().unwrap())
            .collect();
        assert_eq!(titles, vec!["Interiors", "Party Wall"]);
        assert!(!report.fallback_categories.contains(&Category::Services));
        assert_eq!(report.fetched, 2);
    }

    #[tokio::test]
    async fn test_hero_fields_merge_with_defaults() {
        let source = MockSource::new().with_body("/hero/hero.md", doc("title: New Title"));
        let (snapshot, _) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        let hero = snapshot.hero.unwrap();
        assert_eq!(hero.title, "New Title");
        assert_eq!(hero.subtitle, defaults::HERO_SUBTITLE);
        assert_eq!(hero.background_image, defaults::HERO_BACKGROUND_IMAGE);
    }

    #[tokio::test]
    async fn test_gallery_sorted_by_order() {
        let source = MockSource::new()
            .with_body("/gallery/design-1.md", doc("id: 10\norder: 3\nsrc: /c.jpg"))
            .with_body("/gallery/design-2.md", doc("id: 11\norder: 1\nsrc: /a.jpg"))
            .with_body("/gallery/design-3.md", doc("id: 12\norder: 2\nsrc: /b.jpg"));
        let (snapshot, _) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        let orders: Vec<i64> = snapshot.gallery.iter().map(|g| g.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(snapshot.gallery[0].src.as_deref(), Some("/a.jpg"));
    }

    #[tokio::test]
    async fn test_gallery_missing_order_sorts_first_and_stable() {
        let source = MockSource::new()
            .with_body("/gallery/design-1.md", doc("order: 2\nsrc: /x.jpg"))
            .with_body("/gallery/design-2.md", doc("src: /y.jpg"))
            .with_body("/gallery/design-3.md", doc("src: /z.jpg"));
        let (snapshot, _) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        let srcs: Vec<_> = snapshot
            .gallery
            .iter()
            .map(|g| g.src.as_deref().unwrap())
            .collect();
        assert_eq!(srcs, vec!["/y.jpg", "/z.jpg", "/x.jpg"]);
    }

    #[tokio::test]
    async fn test_unpublished_items_are_hidden() {
        let source = MockSource::new()
            .with_body("/projects/enscape.md", doc("id: 1\ntitle: Shown"))
            .with_body(
                "/projects/urban-office.md",
                doc("id: 2\ntitle: Hidden\npublished: false"),
            );
        let (snapshot, report) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        assert_eq!(snapshot.projects.len(), 1);
        assert_eq!(snapshot.projects[0].title.as_deref(), Some("Shown"));
        assert_eq!(report.unpublished, 1);
    }

    #[tokio::test]
    async fn test_all_unpublished_yields_empty_sequence() {
        let source = MockSource::new().with_body(
            "/services/party-wall.md",
            doc("title: Draft\npublished: false"),
        );
        let (snapshot, report) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        assert!(snapshot.services.is_empty());
        assert!(!report.fallback_categories.contains(&Category::Services));
    }

    #[tokio::test]
    async fn test_records_without_frontmatter_count_as_missing() {
        let source = MockSource::new()
            .with_body("/services/party-wall.md", "<!doctype html><html></html>")
            .with_body("/hero/hero.md", "# no frontmatter");
        let (snapshot, report) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        assert_eq!(snapshot.services, defaults::services());
        assert_eq!(snapshot.hero, Some(Hero::default()));
        assert!(report.fallback_categories.contains(&Category::Services));
        assert!(report.fallback_categories.contains(&Category::Hero));
    }

    #[tokio::test]
    async fn test_project_ids_default_to_position() {
        let source = MockSource::new()
            .with_body("/projects/work-space.md", doc("title: Third"))
            .with_body("/projects/enscape.md", doc("title: First"));
        let (snapshot, _) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        let ids: Vec<i64> = snapshot.projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_position_ids_skip_declared_ids() {
        let source = MockSource::new()
            .with_body("/projects/enscape.md", doc("title: First"))
            .with_body("/projects/urban-office.md", doc("id: 1\ntitle: Second"))
            .with_body("/projects/commercial.md", doc("title: Third"));
        let (snapshot, report) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        assert!(!report.used_full_fallback);
        let ids: Vec<i64> = snapshot.projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 4]);
        assert_eq!(snapshot.projects[0].title.as_deref(), Some("First"));
    }

    #[test]
    fn test_fallback_ids() {
        let records = vec![
            (0, FrontmatterRecord::new().with("title", "a")),
            (1, FrontmatterRecord::new().with("id", 1_i64)),
            (2, FrontmatterRecord::new().with("id", 2_i64)),
            (3, FrontmatterRecord::new().with("id", "abc")),
        ];
        assert_eq!(fallback_ids(&records), vec![3, 1, 2, 4]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_publish_builtin_snapshot() {
        let source = MockSource::new()
            .with_body("/hero/hero.md", doc("title: Lost"))
            .with_body("/projects/enscape.md", doc("id: 7"))
            .with_body("/projects/commercial.md", doc("id: 7"));
        let (snapshot, report) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        assert_eq!(snapshot, ContentSnapshot::fallback());
        assert!(report.used_full_fallback);
        assert_eq!(report.fallback_categories, Category::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_transient_and_missing_failures_counted() {
        let source = MockSource::new()
            .with_response("/hero/hero.md", MockResponse::Status(500))
            .with_response("/about/about.md", MockResponse::NetworkError)
            .with_body("/footer/footer.md", doc("companyName: Studio"));
        let (snapshot, report) = load_snapshot(&source, &ResourceDescriptor::default()).await;

        assert_eq!(report.fetched, 1);
        assert_eq!(report.failed, 16);
        assert_eq!(snapshot.footer.unwrap().company_name, "Studio");
    }

    #[tokio::test]
    async fn test_every_resource_fetched_once() {
        let source = MockSource::new();
        let descriptor = ResourceDescriptor::default();
        let _ = load_snapshot(&source, &descriptor).await;
        assert_eq!(source.fetch_count(), descriptor.total_resources());
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = CycleReport {
            fallback_categories: vec![Category::Gallery],
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["fallbackCategories"], serde_json::json!(["gallery"]));
        assert_eq!(json["usedFullFallback"], serde_json::json!(false));
    }
}
