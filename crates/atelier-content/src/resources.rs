//! Content categories and the fixed list of resources fetched per cycle.

use std::collections::HashSet;
use std::fmt;

use atelier_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// One of the six content groupings of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Landing banner.
    Hero,
    /// Firm introduction, vision and approach.
    About,
    /// Offered services, one file each.
    Services,
    /// Portfolio projects, one file each.
    Projects,
    /// Gallery images, one file each.
    Gallery,
    /// Footer branding and links.
    Footer,
}

impl Category {
    /// Every category, in load order.
    pub const ALL: [Category; 6] = [
        Category::Hero,
        Category::About,
        Category::Services,
        Category::Projects,
        Category::Gallery,
        Category::Footer,
    ];

    /// Directory name under the content root.
    pub fn dir(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Services => "services",
            Self::Projects => "projects",
            Self::Gallery => "gallery",
            Self::Footer => "footer",
        }
    }

    /// Whether the category is an ordered sequence of files.
    pub fn is_sequence(self) -> bool {
        matches!(self, Self::Services | Self::Projects | Self::Gallery)
    }

    /// Path of one resource relative to the content root.
    pub fn resource_path(self, name: &str) -> String {
        format!("/{}/{}.md", self.dir(), name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// Expected resource identifiers for the sequence categories.
///
/// The lists are fixed when the store is built; nothing is discovered by
/// listing directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceDescriptor {
    /// Service file stems, in display order.
    pub services: Vec<String>,
    /// Project file stems, in display order.
    pub projects: Vec<String>,
    /// Gallery file stems; display order comes from each item's `order`.
    pub gallery: Vec<String>,
}

impl Default for ResourceDescriptor {
    fn default() -> Self {
        fn owned(names: &[&str]) -> Vec<String> {
            names.iter().map(|n| (*n).to_string()).collect()
        }

        Self {
            services: owned(&[
                "architectural-design",
                "interior-design",
                "structural-design",
                "building-work",
                "party-wall",
            ]),
            projects: owned(&["enscape", "urban-office", "work-space", "commercial"]),
            gallery: owned(&["design-1", "design-2", "design-3", "design-4", "design-5"]),
        }
    }
}

impl ResourceDescriptor {
    /// Resource names for a category.
    ///
    /// Single-file categories have exactly one resource named after the
    /// category itself (`/hero/hero.md`).
    pub fn names(&self, category: Category) -> Vec<&str> {
        match category {
            Category::Services => self.services.iter().map(String::as_str).collect(),
            Category::Projects => self.projects.iter().map(String::as_str).collect(),
            Category::Gallery => self.gallery.iter().map(String::as_str).collect(),
            single => vec![single.dir()],
        }
    }

    /// Resource paths for a category, in descriptor order.
    pub fn paths(&self, category: Category) -> Vec<String> {
        self.names(category)
            .into_iter()
            .map(|name| category.resource_path(name))
            .collect()
    }

    /// Total number of resources fetched by one load cycle.
    pub fn total_resources(&self) -> usize {
        Category::ALL.iter().map(|c| self.names(*c).len()).sum()
    }

    /// Reject names that would escape their directory or collide.
    pub fn validate(&self) -> Result<()> {
        for category in [Category::Services, Category::Projects, Category::Gallery] {
            let mut seen = HashSet::new();
            for name in self.names(category) {
                if name.trim().is_empty() {
                    return Err(Error::config(format!("empty {category} resource name")));
                }
                if name.contains('/') || name.contains('\\') || name.contains("..") {
                    return Err(Error::config(format!(
                        "{category} resource name '{name}' must be a plain file stem"
                    )));
                }
                if !seen.insert(name) {
                    return Err(Error::config(format!(
                        "duplicate {category} resource name '{name}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_category_paths() {
        let descriptor = ResourceDescriptor::default();
        assert_eq!(descriptor.paths(Category::Hero), vec!["/hero/hero.md"]);
        assert_eq!(descriptor.paths(Category::About), vec!["/about/about.md"]);
        assert_eq!(descriptor.paths(Category::Footer), vec!["/footer/footer.md"]);
    }

    #[test]
    fn test_sequence_paths_keep_order() {
        let descriptor = ResourceDescriptor::default();
        let paths = descriptor.paths(Category::Services);
        assert_eq!(paths.len(), 5);
        assert_eq!(paths[0], "/services/architectural-design.md");
        assert_eq!(paths[4], "/services/party-wall.md");
    }

    #[test]
    fn test_total_resources() {
        // hero + about + 5 services + 4 projects + 5 gallery + footer
        assert_eq!(ResourceDescriptor::default().total_resources(), 17);
    }

    #[test]
    fn test_is_sequence() {
        assert!(Category::Gallery.is_sequence());
        assert!(!Category::Footer.is_sequence());
    }

    #[test]
    fn test_validate_default() {
        assert!(ResourceDescriptor::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_traversal() {
        let descriptor = ResourceDescriptor {
            projects: vec!["../secrets".into()],
            ..Default::default()
        };
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let descriptor = ResourceDescriptor {
            gallery: vec!["a".into(), "a".into()],
            ..Default::default()
        };
        let err = descriptor.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate gallery"));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let descriptor = ResourceDescriptor {
            services: vec![" ".into()],
            ..Default::default()
        };
        assert!(descriptor.validate().is_err());
    }

    #[test]
    fn test_descriptor_partial_json_keeps_defaults() {
        let descriptor: ResourceDescriptor =
            serde_json::from_str(r#"{"services": ["only-one"]}"#).unwrap();
        assert_eq!(descriptor.services, vec!["only-one"]);
        assert_eq!(descriptor.projects.len(), 4);
    }
}
