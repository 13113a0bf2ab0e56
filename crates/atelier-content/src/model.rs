//! Typed site sections and the published content snapshot.
//!
//! Each section keeps the fields the site renders as named members and
//! carries every other frontmatter key in `extra`, so content editors can
//! add fields without a code change.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::defaults;
use crate::value::FrontmatterRecord;

/// Landing banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    /// Main heading.
    pub title: String,
    /// Line under the heading.
    pub subtitle: String,
    /// Background image URL.
    pub background_image: String,
    /// Unrecognised frontmatter fields.
    #[serde(flatten)]
    pub extra: FrontmatterRecord,
}

impl Hero {
    /// Build from a parsed record; missing fields take the default text.
    pub fn from_record(mut record: FrontmatterRecord) -> Self {
        record.remove("published");
        Self {
            title: record
                .take_text("title")
                .unwrap_or_else(|| defaults::HERO_TITLE.to_string()),
            subtitle: record
                .take_text("subtitle")
                .unwrap_or_else(|| defaults::HERO_SUBTITLE.to_string()),
            background_image: record
                .take_text("backgroundImage")
                .unwrap_or_else(|| defaults::HERO_BACKGROUND_IMAGE.to_string()),
            extra: record,
        }
    }
}

impl Default for Hero {
    fn default() -> Self {
        Self::from_record(FrontmatterRecord::new())
    }
}

/// Firm introduction with vision and approach statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    /// Section heading.
    pub title: String,
    /// Illustration URL.
    pub image: String,
    /// Introductory paragraph.
    pub description: String,
    /// Vision heading.
    pub vision_title: String,
    /// Vision statement.
    pub vision_text: String,
    /// Approach heading.
    pub approach_title: String,
    /// Approach statement.
    pub approach_text: String,
    /// Unrecognised frontmatter fields.
    #[serde(flatten)]
    pub extra: FrontmatterRecord,
}

impl About {
    /// Build from a parsed record; missing fields take the default text.
    pub fn from_record(mut record: FrontmatterRecord) -> Self {
        record.remove("published");
        let mut field = |key: &str, fallback: &str| {
            record
                .take_text(key)
                .unwrap_or_else(|| fallback.to_string())
        };
        let title = field("title", defaults::ABOUT_TITLE);
        let image = field("image", defaults::ABOUT_IMAGE);
        let description = field("description", defaults::ABOUT_DESCRIPTION);
        let vision_title = field("visionTitle", defaults::ABOUT_VISION_TITLE);
        let vision_text = field("visionText", defaults::ABOUT_VISION_TEXT);
        let approach_title = field("approachTitle", defaults::ABOUT_APPROACH_TITLE);
        let approach_text = field("approachText", defaults::ABOUT_APPROACH_TEXT);
        Self {
            title,
            image,
            description,
            vision_title,
            vision_text,
            approach_title,
            approach_text,
            extra: record,
        }
    }
}

impl Default for About {
    fn default() -> Self {
        Self::from_record(FrontmatterRecord::new())
    }
}

/// One offered service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Short pitch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unrecognised frontmatter fields.
    #[serde(flatten)]
    pub extra: FrontmatterRecord,
}

impl Service {
    /// Build from a parsed record.
    pub fn from_record(mut record: FrontmatterRecord) -> Self {
        record.remove("published");
        Self {
            title: record.take_text("title"),
            description: record.take_text("description"),
            extra: record,
        }
    }

    pub(crate) fn literal(title: &str, description: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            extra: FrontmatterRecord::new(),
        }
    }
}

/// One portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Stable identifier.
    pub id: i64,
    /// Project name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Sector, e.g. "Residential".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Completion year as written by the editor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Short summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the project is highlighted.
    #[serde(default)]
    pub featured: bool,
    /// Unrecognised frontmatter fields.
    #[serde(flatten)]
    pub extra: FrontmatterRecord,
}

impl Project {
    /// Build from a parsed record.
    ///
    /// `fallback_id` is used when the file does not declare an integer id.
    pub fn from_record(mut record: FrontmatterRecord, fallback_id: i64) -> Self {
        record.remove("published");
        Self {
            id: record.take_i64("id").unwrap_or(fallback_id),
            title: record.take_text("title"),
            category: record.take_text("category"),
            year: record.take_text("year"),
            image: record.take_text("image"),
            description: record.take_text("description"),
            featured: record.take_bool("featured").unwrap_or(false),
            extra: record,
        }
    }
}

/// One gallery image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    /// Stable identifier.
    pub id: i64,
    /// Image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Alternative text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Caption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Sort key, ascending.
    #[serde(default)]
    pub order: i64,
    /// Unrecognised frontmatter fields.
    #[serde(flatten)]
    pub extra: FrontmatterRecord,
}

impl GalleryItem {
    /// Build from a parsed record; a missing `order` sorts as 0.
    pub fn from_record(mut record: FrontmatterRecord, fallback_id: i64) -> Self {
        record.remove("published");
        Self {
            id: record.take_i64("id").unwrap_or(fallback_id),
            src: record.take_text("src"),
            alt: record.take_text("alt"),
            title: record.take_text("title"),
            order: record.take_i64("order").unwrap_or(0),
            extra: record,
        }
    }
}

/// A footer navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FooterLink {
    /// Link label.
    pub text: String,
    /// Target, usually an in-page anchor.
    pub url: String,
}

impl FooterLink {
    /// Create a link.
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// Footer branding and navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    /// Legal company name.
    pub company_name: String,
    /// Short slogan.
    pub tagline: String,
    /// Year printed in the copyright line.
    pub copyright_year: String,
    /// Navigation links.
    pub links: Vec<FooterLink>,
    /// Unrecognised frontmatter fields.
    #[serde(flatten)]
    pub extra: FrontmatterRecord,
}

impl Footer {
    /// Build from a parsed record; missing fields take the default text.
    ///
    /// `links` is a JSON array of `{"text", "url"}` objects stored in a
    /// single frontmatter string. An unparsable value is logged and the
    /// default links are used instead.
    pub fn from_record(mut record: FrontmatterRecord) -> Self {
        record.remove("published");
        let links = match record.take_text("links") {
            Some(raw) => serde_json::from_str::<Vec<FooterLink>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "footer links are not a JSON link array, using defaults");
                defaults::footer_links()
            }),
            None => defaults::footer_links(),
        };
        Self {
            company_name: record
                .take_text("companyName")
                .unwrap_or_else(|| defaults::FOOTER_COMPANY_NAME.to_string()),
            tagline: record
                .take_text("tagline")
                .unwrap_or_else(|| defaults::FOOTER_TAGLINE.to_string()),
            copyright_year: record
                .take_text("copyrightYear")
                .unwrap_or_else(|| defaults::FOOTER_COPYRIGHT_YEAR.to_string()),
            links,
            extra: record,
        }
    }
}

impl Default for Footer {
    fn default() -> Self {
        Self::from_record(FrontmatterRecord::new())
    }
}

/// The complete content state for one load cycle.
///
/// Snapshots are immutable once published; a refresh builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    /// Landing banner.
    pub hero: Option<Hero>,
    /// About section.
    pub about: Option<About>,
    /// Services in descriptor order.
    pub services: Vec<Service>,
    /// Projects in descriptor order.
    pub projects: Vec<Project>,
    /// Gallery items sorted by `order`.
    pub gallery: Vec<GalleryItem>,
    /// Footer.
    pub footer: Option<Footer>,
    /// True only before the first load cycle completes.
    pub loading: bool,
}

impl ContentSnapshot {
    /// The state consumers see before any load cycle has finished.
    pub fn pending() -> Self {
        Self {
            hero: None,
            about: None,
            services: Vec::new(),
            projects: Vec::new(),
            gallery: Vec::new(),
            footer: None,
            loading: true,
        }
    }

    /// The complete built-in content, used when a load cycle cannot
    /// assemble anything better.
    pub fn fallback() -> Self {
        Self {
            hero: Some(Hero::default()),
            about: Some(About::default()),
            services: defaults::services(),
            projects: defaults::projects(),
            gallery: defaults::gallery(),
            footer: Some(Footer::default()),
            loading: false,
        }
    }

    /// Featured projects, in display order.
    pub fn featured_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.featured)
    }
}
