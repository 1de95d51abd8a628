// src/backend/models/content.rs
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PortfolioImage {
    pub src: String,
    pub alt: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationItem {
    pub label: String,
    pub href: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub role_headline: String,
    pub hero_cta_text: String,
    pub avatar_image: PortfolioImage,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedProject {
    pub title: String,
    pub description: String,
    pub image: PortfolioImage,
    pub cta_label: String,
    pub cta_href: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FeaturedProjects {
    pub title: String,
    pub items: Vec<FeaturedProject>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillItem {
    pub label: String,
    pub icon: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Skills {
    pub title: String,
    pub items: Vec<SkillItem>,
}

/// Newsletter block. The copy strings are only required while `enabled` is set.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Newsletter {
    pub enabled: bool,
    pub title: String,
    pub description: String,
    pub placeholder: String,
    pub button_text: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FooterLink {
    pub label: String,
    pub href: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FooterColumn {
    pub title: String,
    pub links: Vec<FooterLink>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FooterSocial {
    #[serde(rename = "type")]
    pub kind: String,
    pub href: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Footer {
    pub columns: Vec<FooterColumn>,
    pub social: Vec<FooterSocial>,
    pub copyright: String,
}

/// The validated content payload driving page rendering.
///
/// Values of this type are only produced by the validator (or the built-in
/// placeholder), so every required field is already sanitized and non-empty.
/// Edits replace the whole value rather than mutating a shared instance.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    pub version: String,
    pub profile: Profile,
    pub navigation: Vec<NavigationItem>,
    pub featured_projects: FeaturedProjects,
    pub skills: Skills,
    pub newsletter: Newsletter,
    pub footer: Footer,
}

impl ContentDocument {
    /// Pretty-printed JSON (2-space indentation) as used for save and export.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
