// src/backend/services/validation_service.rs
// Turns untrusted JSON into a ContentDocument, collecting every problem in one pass.

use crate::models::content::*;
use crate::utils::sanitize::{is_valid_href, is_valid_https_url, sanitize_plain_text};
use serde_json::{Map, Value};

pub type ValidationResult<T> = Result<T, Vec<String>>;

fn as_record(value: Option<&Value>) -> Option<&Map<String, Value>> {
    value.and_then(Value::as_object)
}

fn as_array(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn as_str(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or("")
}

/// Sanitized text field; anything that is not a string becomes "".
fn text(record: &Map<String, Value>, field: &str) -> String {
    sanitize_plain_text(as_str(record.get(field)))
}

/// Href fields are trimmed but otherwise kept verbatim.
fn href(record: &Map<String, Value>, field: &str) -> String {
    as_str(record.get(field)).trim().to_string()
}

struct Collector {
    errors: Vec<String>,
}

impl Collector {
    fn push(&mut self, message: String) {
        self.errors.push(message);
    }

    fn require(&mut self, value: &str, path: &str) {
        if value.is_empty() {
            self.push(format!("{} is required", path));
        }
    }

    fn require_href(&mut self, value: &str, path: &str, message: &str) {
        if value.is_empty() || !is_valid_href(value) {
            self.push(format!("{} {}", path, message));
        }
    }

    fn image(&mut self, raw: Option<&Value>, path: &str) -> PortfolioImage {
        let Some(img) = as_record(raw) else {
            self.push(format!("{} must be an object", path));
            return PortfolioImage::default();
        };
        let src = text(img, "src");
        let alt = text(img, "alt");
        if !is_valid_https_url(&src) {
            self.push(format!("{}.src must be https URL", path));
        }
        self.require(&alt, &format!("{}.alt", path));
        PortfolioImage { src, alt }
    }

    fn profile(&mut self, raw: Option<&Value>) -> Profile {
        let profile = match as_record(raw) {
            Some(p) => Profile {
                name: text(p, "name"),
                role_headline: text(p, "roleHeadline"),
                hero_cta_text: text(p, "heroCtaText"),
                avatar_image: self.image(p.get("avatarImage"), "profile.avatarImage"),
            },
            None => {
                self.push("profile must be an object".to_string());
                Profile::default()
            }
        };
        self.require(&profile.name, "profile.name");
        self.require(&profile.role_headline, "profile.roleHeadline");
        self.require(&profile.hero_cta_text, "profile.heroCtaText");
        profile
    }

    fn navigation(&mut self, raw: Option<&Value>) -> Vec<NavigationItem> {
        as_array(raw)
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let path = format!("navigation[{}]", index);
                let Some(item) = item.as_object() else {
                    self.push(format!("{} must be an object", path));
                    return NavigationItem::default();
                };
                let label = text(item, "label");
                let href = href(item, "href");
                self.require(&label, &format!("{}.label", path));
                self.require_href(&href, &format!("{}.href", path), "must be a valid URL or /path");
                NavigationItem { label, href }
            })
            .collect()
    }

    fn project(&mut self, raw: &Value, index: usize) -> FeaturedProject {
        let path = format!("featuredProjects.items[{}]", index);
        let Some(p) = raw.as_object() else {
            self.push(format!("{} must be an object", path));
            return FeaturedProject::default();
        };
        let title = text(p, "title");
        let description = text(p, "description");
        let cta_label = text(p, "ctaLabel");
        let cta_href = href(p, "ctaHref");
        let image = self.image(p.get("image"), &format!("{}.image", path));

        self.require(&title, &format!("{}.title", path));
        self.require(&description, &format!("{}.description", path));
        self.require(&cta_label, &format!("{}.ctaLabel", path));
        self.require_href(&cta_href, &format!("{}.ctaHref", path), "must be a valid URL or /path");

        FeaturedProject {
            title,
            description,
            image,
            cta_label,
            cta_href,
        }
    }

    fn featured_projects(&mut self, raw: Option<&Value>) -> FeaturedProjects {
        let section = match as_record(raw) {
            Some(fp) => FeaturedProjects {
                title: text(fp, "title"),
                items: as_array(fp.get("items"))
                    .iter()
                    .enumerate()
                    .map(|(index, p)| self.project(p, index))
                    .collect(),
            },
            None => {
                self.push("featuredProjects must be an object".to_string());
                FeaturedProjects::default()
            }
        };
        self.require(&section.title, "featuredProjects.title");
        section
    }

    fn skills(&mut self, raw: Option<&Value>) -> Skills {
        let section = match as_record(raw) {
            Some(s) => Skills {
                title: text(s, "title"),
                items: as_array(s.get("items"))
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let path = format!("skills.items[{}]", index);
                        let Some(item) = item.as_object() else {
                            self.push(format!("{} must be an object", path));
                            return SkillItem::default();
                        };
                        let label = text(item, "label");
                        let icon = text(item, "icon");
                        self.require(&label, &format!("{}.label", path));
                        self.require(&icon, &format!("{}.icon", path));
                        SkillItem { label, icon }
                    })
                    .collect(),
            },
            None => {
                self.push("skills must be an object".to_string());
                Skills::default()
            }
        };
        self.require(&section.title, "skills.title");
        section
    }

    fn newsletter(&mut self, raw: Option<&Value>) -> Newsletter {
        let newsletter = match as_record(raw) {
            Some(n) => Newsletter {
                enabled: n.get("enabled").and_then(Value::as_bool).unwrap_or(false),
                title: text(n, "title"),
                description: text(n, "description"),
                placeholder: text(n, "placeholder"),
                button_text: text(n, "buttonText"),
            },
            None => {
                self.push("newsletter must be an object".to_string());
                Newsletter::default()
            }
        };
        if newsletter.enabled {
            for (value, field) in [
                (&newsletter.title, "title"),
                (&newsletter.placeholder, "placeholder"),
                (&newsletter.button_text, "buttonText"),
            ] {
                if value.is_empty() {
                    self.push(format!("newsletter.{} is required when enabled", field));
                }
            }
        }
        newsletter
    }

    fn footer_column(&mut self, raw: &Value, index: usize) -> FooterColumn {
        let path = format!("footer.columns[{}]", index);
        let Some(c) = raw.as_object() else {
            self.push(format!("{} must be an object", path));
            return FooterColumn::default();
        };
        let title = text(c, "title");
        self.require(&title, &format!("{}.title", path));
        let links = as_array(c.get("links"))
            .iter()
            .enumerate()
            .map(|(li, l)| {
                let link_path = format!("{}.links[{}]", path, li);
                let Some(l) = l.as_object() else {
                    self.push(format!("{} must be an object", link_path));
                    return FooterLink::default();
                };
                let label = text(l, "label");
                let href = href(l, "href");
                self.require(&label, &format!("{}.label", link_path));
                self.require_href(&href, &format!("{}.href", link_path), "must be valid");
                FooterLink { label, href }
            })
            .collect();
        FooterColumn { title, links }
    }

    fn footer(&mut self, raw: Option<&Value>) -> Footer {
        let footer = match as_record(raw) {
            Some(f) => Footer {
                columns: as_array(f.get("columns"))
                    .iter()
                    .enumerate()
                    .map(|(index, c)| self.footer_column(c, index))
                    .collect(),
                social: as_array(f.get("social"))
                    .iter()
                    .enumerate()
                    .map(|(index, s)| {
                        let path = format!("footer.social[{}]", index);
                        let Some(s) = s.as_object() else {
                            self.push(format!("{} must be an object", path));
                            return FooterSocial::default();
                        };
                        let kind = text(s, "type");
                        let href = href(s, "href");
                        self.require(&kind, &format!("{}.type", path));
                        self.require_href(&href, &format!("{}.href", path), "must be valid");
                        FooterSocial { kind, href }
                    })
                    .collect(),
                copyright: text(f, "copyright"),
            },
            None => {
                self.push("footer must be an object".to_string());
                Footer::default()
            }
        };
        self.require(&footer.copyright, "footer.copyright");
        footer
    }
}

/// Validates an untyped JSON value against the content schema.
///
/// Never panics. On failure the error list names every offending path, in
/// document order; on success the document is fully sanitized and defaulted.
pub fn validate_content(raw: &Value) -> ValidationResult<ContentDocument> {
    let Some(root) = raw.as_object() else {
        return Err(vec!["Root JSON must be an object".to_string()]);
    };

    let mut c = Collector { errors: Vec::new() };

    let version = text(root, "version");
    c.require(&version, "version");

    let document = ContentDocument {
        version,
        profile: c.profile(root.get("profile")),
        navigation: c.navigation(root.get("navigation")),
        featured_projects: c.featured_projects(root.get("featuredProjects")),
        skills: c.skills(root.get("skills")),
        newsletter: c.newsletter(root.get("newsletter")),
        footer: c.footer(root.get("footer")),
    };

    if c.errors.is_empty() {
        Ok(document)
    } else {
        Err(c.errors)
    }
}

/// Re-validates an already typed document, e.g. an editor draft.
pub fn validate_document(document: &ContentDocument) -> ValidationResult<ContentDocument> {
    let value = serde_json::to_value(document)
        .map_err(|e| vec![format!("document could not be serialized: {}", e)])?;
    validate_content(&value)
}

/// Outcome of validating JSON text: the text may not parse at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextValidation {
    Valid(ContentDocument),
    Invalid(Vec<String>),
    Unparseable(String),
}

pub fn validate_json_text(raw: &str) -> TextValidation {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => match validate_content(&value) {
            Ok(document) => TextValidation::Valid(document),
            Err(errors) => TextValidation::Invalid(errors),
        },
        Err(e) => TextValidation::Unparseable(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::defaults::placeholder_document;
    use serde_json::json;

    fn placeholder_value() -> Value {
        serde_json::to_value(placeholder_document()).unwrap()
    }

    fn errors_of(value: &Value) -> Vec<String> {
        validate_content(value).expect_err("expected validation to fail")
    }

    #[test]
    fn accepts_the_placeholder_document() {
        let document = validate_content(&placeholder_value()).unwrap();
        assert_eq!(document, placeholder_document());
    }

    #[test]
    fn empty_profile_name_is_reported() {
        let mut value = placeholder_value();
        value["profile"]["name"] = json!("");
        assert!(errors_of(&value).contains(&"profile.name is required".to_string()));
    }

    #[test]
    fn control_characters_do_not_count_as_content() {
        let mut value = placeholder_value();
        value["profile"]["name"] = json!(" \u{0007}\n ");
        assert_eq!(errors_of(&value), vec!["profile.name is required"]);
    }

    #[test]
    fn text_fields_are_sanitized() {
        let mut value = placeholder_value();
        value["profile"]["name"] = json!("  Ada\u{0000} Lovelace ");
        let document = validate_content(&value).unwrap();
        assert_eq!(document.profile.name, "Ada Lovelace");
    }

    #[test]
    fn allows_hash_mailto_and_tel_hrefs() {
        let mut value = placeholder_value();
        value["navigation"] = json!([
            { "label": "Home", "href": "#home" },
            { "label": "Contact", "href": "mailto:test@example.com" },
            { "label": "Phone", "href": "tel:+1234567890" },
        ]);
        value["footer"]["columns"] = json!([{
            "title": "Contact",
            "links": [
                { "label": "Email", "href": "mailto:test@example.com" },
                { "label": "Call", "href": "tel:+1234567890" },
            ],
        }]);
        assert!(validate_content(&value).is_ok());
    }

    #[test]
    fn rejects_javascript_href() {
        let mut value = placeholder_value();
        value["navigation"] = json!([{ "label": "Evil", "href": "javascript:alert(1)" }]);
        assert_eq!(
            errors_of(&value),
            vec!["navigation[0].href must be a valid URL or /path"]
        );
    }

    #[test]
    fn reports_project_image_path() {
        let mut value = placeholder_value();
        let project = json!({
            "title": "P",
            "description": "D",
            "image": { "src": "https://example.com/p.png", "alt": "p" },
            "ctaLabel": "Open",
            "ctaHref": "/projects/p",
        });
        let mut bad = project.clone();
        bad["image"]["src"] = json!("http://example.com/p.png");
        value["featuredProjects"]["items"] = json!([project.clone(), project, bad]);

        assert_eq!(
            errors_of(&value),
            vec!["featuredProjects.items[2].image.src must be https URL"]
        );
    }

    #[test]
    fn collects_every_error_in_one_pass() {
        let value = json!({
            "version": 3,
            "profile": "nope",
            "navigation": [7],
            "featuredProjects": { "title": "", "items": [] },
            "skills": { "title": "S", "items": [{ "label": "Rust" }] },
            "newsletter": { "enabled": true },
            "footer": { "columns": [], "social": [{ "type": "gh", "href": "ftp://x" }], "copyright": "c" },
        });

        assert_eq!(
            errors_of(&value),
            vec![
                "version is required",
                "profile must be an object",
                "profile.name is required",
                "profile.roleHeadline is required",
                "profile.heroCtaText is required",
                "navigation[0] must be an object",
                "featuredProjects.title is required",
                "skills.items[0].icon is required",
                "newsletter.title is required when enabled",
                "newsletter.placeholder is required when enabled",
                "newsletter.buttonText is required when enabled",
                "footer.social[0].href must be valid",
            ]
        );
    }

    #[test]
    fn newsletter_copy_is_optional_when_disabled() {
        let mut value = placeholder_value();
        value["newsletter"] = json!({ "enabled": false });
        let document = validate_content(&value).unwrap();
        assert!(!document.newsletter.enabled);
        assert_eq!(document.newsletter.title, "");
    }

    #[test]
    fn non_boolean_enabled_defaults_to_false() {
        let mut value = placeholder_value();
        value["newsletter"]["enabled"] = json!("yes");
        value["newsletter"]["title"] = json!("");
        assert!(!validate_content(&value).unwrap().newsletter.enabled);
    }

    #[test]
    fn missing_sections_are_reported() {
        let errors = errors_of(&json!({ "version": "1" }));
        for expected in [
            "profile must be an object",
            "featuredProjects must be an object",
            "skills must be an object",
            "newsletter must be an object",
            "footer must be an object",
            "footer.copyright is required",
        ] {
            assert!(errors.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn root_must_be_an_object() {
        assert_eq!(errors_of(&json!([1, 2])), vec!["Root JSON must be an object"]);
        assert_eq!(errors_of(&Value::Null), vec!["Root JSON must be an object"]);
    }

    #[test]
    fn revalidating_serialized_output_is_stable() {
        let mut value = placeholder_value();
        value["profile"]["name"] = json!("  Grace\tHopper  ");
        value["skills"]["items"] = json!([{ "label": " Rust ", "icon": "crab" }]);
        value["unknownField"] = json!(true);

        let first = validate_content(&value).unwrap();
        let text = first.to_pretty_json().unwrap();
        let second = validate_content(&serde_json::from_str(&text).unwrap()).unwrap();
        assert_eq!(first, second);
        assert_eq!(validate_document(&second).unwrap(), second);
    }

    #[test]
    fn json_text_outcomes() {
        assert!(matches!(validate_json_text("{"), TextValidation::Unparseable(_)));
        assert!(matches!(validate_json_text("{}"), TextValidation::Invalid(_)));
        let text = placeholder_document().to_pretty_json().unwrap();
        assert!(matches!(validate_json_text(&text), TextValidation::Valid(_)));
    }
}
