// src/backend/models/defaults.rs
use crate::models::content::*;
use chrono::{Datelike, Utc};

/// Placeholder shown until real content arrives from the cache or the remote source.
///
/// It always passes validation.
pub fn placeholder_document() -> ContentDocument {
    ContentDocument {
        version: "1".to_string(),
        profile: Profile {
            name: "—".to_string(),
            role_headline: "Loading portfolio…".to_string(),
            hero_cta_text: "See My Work".to_string(),
            avatar_image: PortfolioImage {
                src: "https://via.placeholder.com/600x600.png?text=Avatar".to_string(),
                alt: "Avatar placeholder".to_string(),
            },
        },
        navigation: [
            ("Home", "#home"),
            ("About", "#about"),
            ("Personal Photo", "#photo"),
            ("Contact", "#contact"),
        ]
        .into_iter()
        .map(|(label, href)| NavigationItem {
            label: label.to_string(),
            href: href.to_string(),
        })
        .collect(),
        featured_projects: FeaturedProjects {
            title: "FEATURED PROJECTS".to_string(),
            items: Vec::new(),
        },
        skills: Skills {
            title: "SKILLS & EXPERTISE".to_string(),
            items: Vec::new(),
        },
        newsletter: Newsletter {
            enabled: true,
            title: "Hi, I’m —. I craft digital experiences.".to_string(),
            description: "This is a placeholder block while your content JSON loads. Replace it in your portfolio JSON.".to_string(),
            placeholder: "Type your email".to_string(),
            button_text: "Subscribe".to_string(),
        },
        footer: Footer {
            columns: Vec::new(),
            social: Vec::new(),
            copyright: format!("© {} My Personal Portfolio", Utc::now().year()),
        },
    }
}
