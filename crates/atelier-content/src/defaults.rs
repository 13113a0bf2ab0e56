//! Built-in content shown whenever the content host has nothing better.

#![allow(missing_docs)]

use crate::model::{FooterLink, GalleryItem, Project, Service};
use crate::value::FrontmatterRecord;

pub const HERO_TITLE: &str = "Shaping the Future";
pub const HERO_SUBTITLE: &str = "Client Satisfaction Is Our Profit";
pub const HERO_BACKGROUND_IMAGE: &str = "/images/bg-hero-hs.jpg";

pub const ABOUT_TITLE: &str = "About Us";
pub const ABOUT_IMAGE: &str = "/images/bedroom-hs.jpg";
pub const ABOUT_DESCRIPTION: &str = "Welcome to our architectural and interior designing firm, \
where dreams come true and creativity and functionality collide. Our passion is to create \
environments that uplift, soothe, and tell a story of yours. We are committed to creating \
environments that represent the individuality and requirements of our clients, whether they \
are institutional, commercial, or residential, and we have a great regard for the art and \
science of design. We transform spaces into captivating environments that resonate with \
those who inhabit them.";
pub const ABOUT_VISION_TITLE: &str = "Our Vision";
pub const ABOUT_VISION_TEXT: &str = "To produce timeless, inventive, and sustainable designs \
that improves everyday life and the human experience.";
pub const ABOUT_APPROACH_TITLE: &str = "Our Approach";
pub const ABOUT_APPROACH_TEXT: &str = "We support a team-based approach to design. We try to \
comprehend our clients' goals, preferences, and needs by working closely with them. We are \
able to translate concepts into beautiful and useful designs that strike a balance between \
purpose and aesthetics through the relationship-centric approach.";

pub const FOOTER_COMPANY_NAME: &str = "H S Planning Ltd.";
pub const FOOTER_TAGLINE: &str = "Shaping the Future";
pub const FOOTER_COPYRIGHT_YEAR: &str = "2024";

/// Default footer navigation.
pub fn footer_links() -> Vec<FooterLink> {
    vec![
        FooterLink::new("Home", "#home"),
        FooterLink::new("About", "#about"),
        FooterLink::new("Contact", "#contact"),
    ]
}

/// Default services, in display order.
pub fn services() -> Vec<Service> {
    [
        (
            "Architectural Design",
            "From the very first idea to the building process, we create buildings that blend \
             in with their surroundings while retaining their individuality.",
        ),
        (
            "Interior Design",
            "By carefully choosing materials, colours, textures, and furnishings that reflect \
             the spirit of the room and its occupants, we bring spaces to life.",
        ),
        (
            "Structural Design",
            "We evaluate stresses, loads, and forces operating on structures, ensuring designs \
             adhere to industry standards, safety laws, and building codes.",
        ),
        (
            "Building Work",
            "With years of experience, we provide outstanding craftsmanship, creative designs, \
             and dependable service for new construction and renovations.",
        ),
        (
            "Party Wall",
            "We assist with party wall agreements, protecting property owners' interests \
             during construction near shared boundaries.",
        ),
    ]
    .into_iter()
    .map(|(title, description)| Service::literal(title, description))
    .collect()
}

/// Default projects, in display order.
pub fn projects() -> Vec<Project> {
    [
        (
            "Enscape",
            "Residential",
            "2023",
            "/images/escape1.png",
            "Contemporary living space with sustainable materials",
        ),
        (
            "Urban Office",
            "Commercial",
            "2023",
            "/images/enscape2.jpg",
            "Smart office design for the modern workforce",
        ),
        (
            "Work space",
            "Hospitality",
            "2022",
            "/images/enscape3.jpg",
            "Sustainable luxury in harmony with nature",
        ),
        (
            "Commercial",
            "Cultural",
            "2022",
            "/images/blbrd_trh_02.jpg",
            "A landmark cultural institution",
        ),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (title, category, year, image, description))| Project {
        id: index as i64 + 1,
        title: Some(title.to_string()),
        category: Some(category.to_string()),
        year: Some(year.to_string()),
        image: Some(image.to_string()),
        description: Some(description.to_string()),
        featured: true,
        extra: FrontmatterRecord::new(),
    })
    .collect()
}

/// Default gallery, already in `order` sequence.
pub fn gallery() -> Vec<GalleryItem> {
    [
        "/images/37 wiltshire lane, pinner, eastcote, hillingdon, ha5 2ly-model0022 .jpg",
        "/images/blbrd_trh_01.jpg",
        "/images/enscape2.jpg",
        "/images/family room.png",
        "/images/enscape_2024-08-23-17-25-12.jpg",
    ]
    .into_iter()
    .enumerate()
    .map(|(index, src)| {
        let n = index as i64 + 1;
        let label = format!("Architectural Design {n}");
        GalleryItem {
            id: n,
            src: Some(src.to_string()),
            alt: Some(label.clone()),
            title: Some(label),
            order: n,
            extra: FrontmatterRecord::new(),
        }
    })
    .collect()
}
