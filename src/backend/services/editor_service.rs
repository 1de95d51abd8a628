// src/backend/services/editor_service.rs
// Passphrase-gated editing of a draft ContentDocument.

use crate::error::PortfolioError;
use crate::models::common::{ConfigStatus, EditorMode};
use crate::models::content::*;
use crate::models::defaults::placeholder_document;
use crate::services::auth_service::CredentialGate;
use crate::services::validation_service::{validate_document, validate_json_text, TextValidation};
use crate::storage::ContentCache;
use crate::utils::guards::require_unlocked;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MIN_PASSPHRASE_LEN: usize = 6;
pub const EXPORT_FILE_NAME: &str = "portfolio.json";

const DRAFT_ERROR_LIMIT: usize = 8;
const IMPORT_ERROR_LIMIT: usize = 10;

/// Structured edit of an ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayOp<T> {
    Add(T),
    Remove(usize),
    Move { from: usize, to: usize },
    Update { index: usize, value: T },
}

/// Applies `op` to `items`, returning the new sequence. Out-of-range indices
/// leave the sequence unchanged.
pub fn array_apply<T: Clone>(items: &[T], op: ArrayOp<T>) -> Vec<T> {
    match op {
        ArrayOp::Add(value) => {
            let mut next = items.to_vec();
            next.push(value);
            next
        }
        ArrayOp::Remove(index) => items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, v)| v.clone())
            .collect(),
        ArrayOp::Update { index, value } => items
            .iter()
            .enumerate()
            .map(|(i, v)| if i == index { value.clone() } else { v.clone() })
            .collect(),
        ArrayOp::Move { from, to } => {
            let mut next = items.to_vec();
            if from == to || from >= items.len() || to >= items.len() {
                return next;
            }
            let picked = next.remove(from);
            next.insert(to, picked);
            next
        }
    }
}

pub struct EditorSession {
    gate: CredentialGate,
    cache: ContentCache,
    idle_timeout: Duration,
    mode: EditorMode,
    draft: ContentDocument,
    message: Option<String>,
}

impl EditorSession {
    /// Computes the starting mode once and seeds the draft from the cache,
    /// falling back to the placeholder when the cache is empty or invalid.
    pub fn open(gate: CredentialGate, cache: ContentCache, idle_timeout: Duration) -> Self {
        let mode = if gate.is_unlocked(idle_timeout) {
            EditorMode::Editor
        } else if gate.config_status() == ConfigStatus::Configured {
            EditorMode::Login
        } else {
            EditorMode::Setup
        };

        let draft = match cache.read_raw().map(|raw| validate_json_text(&raw)) {
            Some(TextValidation::Valid(document)) => document,
            _ => placeholder_document(),
        };

        Self {
            gate,
            cache,
            idle_timeout,
            mode,
            draft,
            message: None,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn draft(&self) -> &ContentDocument {
        &self.draft
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn say(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    fn unlock(&mut self, message: &str) {
        self.gate.set_unlocked(true);
        self.mode = EditorMode::Editor;
        self.say(message);
    }

    /// Creates the credential in setup mode, or checks it in login mode.
    pub fn submit_passphrase(&mut self, passphrase: &str) -> Result<(), PortfolioError> {
        self.message = None;
        if self.mode == EditorMode::Editor {
            return Ok(());
        }

        if passphrase.trim().chars().count() < MIN_PASSPHRASE_LEN {
            let message = format!("Passphrase must be at least {} characters.", MIN_PASSPHRASE_LEN);
            self.say(message.clone());
            return Err(PortfolioError::InvalidInput(message));
        }

        if self.mode == EditorMode::Setup {
            self.gate.configure(passphrase)?;
            self.unlock("Passphrase saved. You're unlocked.");
            return Ok(());
        }

        if let Err(e) = self.gate.verify(passphrase) {
            self.say(e.to_string());
            return Err(e.into());
        }
        self.unlock("Unlocked.");
        Ok(())
    }

    /// "Reset on this device": lets a locked user define a new passphrase.
    pub fn begin_reset(&mut self) {
        if self.mode == EditorMode::Login {
            self.mode = EditorMode::Setup;
            self.message = None;
        }
    }

    pub fn lock(&mut self) {
        self.gate.set_unlocked(false);
        self.mode = match self.gate.config_status() {
            ConfigStatus::Configured => EditorMode::Login,
            ConfigStatus::NotConfigured => EditorMode::Setup,
        };
        self.say("Locked.");
    }

    /// Pointer, key or scroll input while the editor is open.
    pub fn record_activity(&self) {
        if self.mode == EditorMode::Editor {
            self.gate.touch_activity();
        }
    }

    /// Drops back to login once the session has idled out. Returns true when it locked.
    pub fn poll_idle(&mut self) -> bool {
        if self.mode != EditorMode::Editor || self.gate.is_unlocked(self.idle_timeout) {
            return false;
        }
        self.gate.set_unlocked(false);
        self.mode = EditorMode::Login;
        self.say("Session locked due to inactivity.");
        true
    }

    fn ensure_editing(&self) -> Result<(), PortfolioError> {
        if self.mode != EditorMode::Editor {
            return Err(PortfolioError::Locked);
        }
        require_unlocked(&self.gate, self.idle_timeout)?;
        self.gate.touch_activity();
        Ok(())
    }

    fn edit(&mut self, change: impl FnOnce(&ContentDocument) -> ContentDocument) -> Result<(), PortfolioError> {
        self.ensure_editing()?;
        self.draft = change(&self.draft);
        Ok(())
    }

    pub fn edit_navigation(&mut self, op: ArrayOp<NavigationItem>) -> Result<(), PortfolioError> {
        self.edit(|d| ContentDocument {
            navigation: array_apply(&d.navigation, op),
            ..d.clone()
        })
    }

    pub fn edit_projects(&mut self, op: ArrayOp<FeaturedProject>) -> Result<(), PortfolioError> {
        self.edit(|d| ContentDocument {
            featured_projects: FeaturedProjects {
                title: d.featured_projects.title.clone(),
                items: array_apply(&d.featured_projects.items, op),
            },
            ..d.clone()
        })
    }

    pub fn edit_skills(&mut self, op: ArrayOp<SkillItem>) -> Result<(), PortfolioError> {
        self.edit(|d| ContentDocument {
            skills: Skills {
                title: d.skills.title.clone(),
                items: array_apply(&d.skills.items, op),
            },
            ..d.clone()
        })
    }

    pub fn edit_footer_columns(&mut self, op: ArrayOp<FooterColumn>) -> Result<(), PortfolioError> {
        self.edit(|d| ContentDocument {
            footer: Footer {
                columns: array_apply(&d.footer.columns, op),
                ..d.footer.clone()
            },
            ..d.clone()
        })
    }

    pub fn edit_footer_links(&mut self, column: usize, op: ArrayOp<FooterLink>) -> Result<(), PortfolioError> {
        self.ensure_editing()?;
        let Some(current) = self.draft.footer.columns.get(column) else {
            return Err(PortfolioError::InvalidInput(format!("footer column {} does not exist", column)));
        };
        let updated = FooterColumn {
            title: current.title.clone(),
            links: array_apply(&current.links, op),
        };
        self.edit_footer_columns(ArrayOp::Update {
            index: column,
            value: updated,
        })
    }

    pub fn edit_social(&mut self, op: ArrayOp<FooterSocial>) -> Result<(), PortfolioError> {
        self.edit(|d| ContentDocument {
            footer: Footer {
                social: array_apply(&d.footer.social, op),
                ..d.footer.clone()
            },
            ..d.clone()
        })
    }

    pub fn update_profile(&mut self, profile: Profile) -> Result<(), PortfolioError> {
        self.edit(|d| ContentDocument { profile, ..d.clone() })
    }

    pub fn update_newsletter(&mut self, newsletter: Newsletter) -> Result<(), PortfolioError> {
        self.edit(|d| ContentDocument { newsletter, ..d.clone() })
    }

    pub fn set_version(&mut self, version: &str) -> Result<(), PortfolioError> {
        self.edit(|d| ContentDocument {
            version: version.to_string(),
            ..d.clone()
        })
    }

    pub fn set_projects_title(&mut self, title: &str) -> Result<(), PortfolioError> {
        self.edit(|d| ContentDocument {
            featured_projects: FeaturedProjects {
                title: title.to_string(),
                items: d.featured_projects.items.clone(),
            },
            ..d.clone()
        })
    }

    pub fn set_skills_title(&mut self, title: &str) -> Result<(), PortfolioError> {
        self.edit(|d| ContentDocument {
            skills: Skills {
                title: title.to_string(),
                items: d.skills.items.clone(),
            },
            ..d.clone()
        })
    }

    pub fn set_copyright(&mut self, copyright: &str) -> Result<(), PortfolioError> {
        self.edit(|d| ContentDocument {
            footer: Footer {
                copyright: copyright.to_string(),
                ..d.footer.clone()
            },
            ..d.clone()
        })
    }

    /// Replaces the draft with the placeholder. Nothing is persisted.
    pub fn reset_draft(&mut self) -> Result<(), PortfolioError> {
        self.edit(|_| placeholder_document())?;
        self.say("Reset draft to defaults (not saved yet).\nClick Save to persist.");
        Ok(())
    }

    /// Validates the draft and serializes it; shared by save and every export path.
    fn validated_json(&mut self) -> Result<String, PortfolioError> {
        self.ensure_editing()?;
        match validate_document(&self.draft) {
            Ok(document) => document
                .to_pretty_json()
                .map_err(|e| PortfolioError::InternalError(format!("Failed to serialize draft: {}", e))),
            Err(errors) => {
                self.say(format!(
                    "Draft is invalid:\n{}",
                    PortfolioError::validation_prefix(&errors, DRAFT_ERROR_LIMIT)
                ));
                Err(PortfolioError::Validation(errors))
            }
        }
    }

    /// Commits the draft to the local content cache.
    pub fn save(&mut self) -> Result<(), PortfolioError> {
        let text = self.validated_json()?;
        self.cache.write_raw(&text);
        tracing::info!(bytes = text.len(), "draft saved to local cache");
        self.say("Saved.");
        Ok(())
    }

    /// Pretty-printed JSON of the validated draft, for copying. Nothing is persisted.
    pub fn export_json(&mut self) -> Result<String, PortfolioError> {
        let text = self.validated_json()?;
        self.say("Copied JSON to clipboard.");
        Ok(text)
    }

    /// Writes `portfolio.json` into `dir`. The content cache is untouched.
    pub fn download_json(&mut self, dir: &Path) -> Result<PathBuf, PortfolioError> {
        let text = self.validated_json()?;
        let path = dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, text).map_err(|e| PortfolioError::Storage(e.to_string()))?;
        self.say(format!("Downloaded {}", EXPORT_FILE_NAME));
        Ok(path)
    }

    /// Parses and validates `text`; on success it replaces the draft without saving.
    pub fn import_json(&mut self, text: &str) -> Result<(), PortfolioError> {
        self.ensure_editing()?;
        match validate_json_text(text) {
            TextValidation::Valid(document) => {
                self.draft = document;
                self.say("Imported into draft (not saved yet).\nClick Save to persist.");
                Ok(())
            }
            TextValidation::Invalid(errors) => {
                self.say(format!(
                    "Import failed:\n{}",
                    PortfolioError::validation_prefix(&errors, IMPORT_ERROR_LIMIT)
                ));
                Err(PortfolioError::Validation(errors))
            }
            TextValidation::Unparseable(e) => {
                self.say("Import failed: invalid JSON.");
                Err(PortfolioError::InvalidInput(e))
            }
        }
    }

    pub async fn import_file(&mut self, path: &Path) -> Result<(), PortfolioError> {
        self.ensure_editing()?;
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "import read failed");
                self.say("Failed to read file.");
                return Err(PortfolioError::Storage(e.to_string()));
            }
        };
        self.import_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CredentialError;
    use crate::storage::{LocalStore, MemoryStore};
    use crate::utils::time::ManualClock;
    use std::sync::Arc;

    const TIMEOUT: Duration = Duration::from_secs(600);

    struct Fixture {
        clock: Arc<ManualClock>,
        gate: CredentialGate,
        cache: ContentCache,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let durable = LocalStore::new(Arc::new(MemoryStore::new()));
        let session = LocalStore::new(Arc::new(MemoryStore::new()));
        let gate = CredentialGate::new(durable.clone(), session, clock.clone(), 1_000);
        let cache = ContentCache::new(durable, clock.clone());
        Fixture { clock, gate, cache }
    }

    fn open(f: &Fixture) -> EditorSession {
        EditorSession::open(f.gate.clone(), f.cache.clone(), TIMEOUT)
    }

    fn unlocked(f: &Fixture) -> EditorSession {
        let mut editor = open(f);
        editor.submit_passphrase("correct horse").unwrap();
        assert_eq!(editor.mode(), EditorMode::Editor);
        editor
    }

    fn nav(label: &str) -> NavigationItem {
        NavigationItem {
            label: label.to_string(),
            href: format!("#{}", label.to_lowercase()),
        }
    }

    #[test]
    fn array_ops() {
        let items = vec![1, 2, 3];
        assert_eq!(array_apply(&items, ArrayOp::Add(4)), vec![1, 2, 3, 4]);
        assert_eq!(array_apply(&items, ArrayOp::Remove(1)), vec![1, 3]);
        assert_eq!(array_apply(&items, ArrayOp::Remove(9)), items);
        assert_eq!(array_apply(&items, ArrayOp::Update { index: 2, value: 9 }), vec![1, 2, 9]);
        assert_eq!(array_apply(&items, ArrayOp::Move { from: 0, to: 2 }), vec![2, 3, 1]);
        assert_eq!(array_apply(&items, ArrayOp::Move { from: 2, to: 0 }), vec![3, 1, 2]);
    }

    #[test]
    fn move_is_a_no_op_for_equal_or_out_of_range_indices() {
        let items = vec!["a", "b", "c"];
        assert_eq!(array_apply(&items, ArrayOp::Move { from: 1, to: 1 }), items);
        assert_eq!(array_apply(&items, ArrayOp::Move { from: 3, to: 0 }), items);
        assert_eq!(array_apply(&items, ArrayOp::Move { from: 0, to: 3 }), items);
    }

    #[test]
    fn initial_mode_follows_credential_and_session() {
        let f = fixture();
        assert_eq!(open(&f).mode(), EditorMode::Setup);

        f.gate.configure("correct horse").unwrap();
        assert_eq!(open(&f).mode(), EditorMode::Login);

        f.gate.set_unlocked(true);
        assert_eq!(open(&f).mode(), EditorMode::Editor);
    }

    #[test]
    fn short_passphrase_is_rejected_before_the_gate() {
        let f = fixture();
        let mut editor = open(&f);
        assert!(matches!(editor.submit_passphrase("  abc  "), Err(PortfolioError::InvalidInput(_))));
        assert_eq!(editor.message(), Some("Passphrase must be at least 6 characters."));
        assert_eq!(f.gate.config_status(), ConfigStatus::NotConfigured);
    }

    #[test]
    fn setup_then_login_flow() {
        let f = fixture();
        let mut editor = unlocked(&f);
        assert_eq!(editor.message(), Some("Passphrase saved. You're unlocked."));

        editor.lock();
        assert_eq!(editor.mode(), EditorMode::Login);
        assert_eq!(editor.message(), Some("Locked."));

        assert_eq!(
            editor.submit_passphrase("wrong passphrase"),
            Err(PortfolioError::Credential(CredentialError::InvalidPassphrase))
        );
        assert_eq!(editor.message(), Some("Invalid passphrase."));
        assert_eq!(editor.mode(), EditorMode::Login);

        editor.submit_passphrase("correct horse").unwrap();
        assert_eq!(editor.mode(), EditorMode::Editor);
        assert_eq!(editor.message(), Some("Unlocked."));
    }

    #[test]
    fn reset_on_device_returns_to_setup() {
        let f = fixture();
        let mut editor = unlocked(&f);
        editor.lock();
        editor.begin_reset();
        assert_eq!(editor.mode(), EditorMode::Setup);
        editor.submit_passphrase("another secret").unwrap();
        assert_eq!(f.gate.verify("correct horse"), Err(CredentialError::InvalidPassphrase));
    }

    #[test]
    fn idle_poll_locks_and_activity_keeps_alive() {
        let f = fixture();
        let mut editor = unlocked(&f);

        f.clock.advance(500_000);
        editor.record_activity();
        f.clock.advance(500_000);
        assert!(!editor.poll_idle());
        assert_eq!(editor.mode(), EditorMode::Editor);

        f.clock.advance(600_001);
        assert!(editor.poll_idle());
        assert_eq!(editor.mode(), EditorMode::Login);
        assert_eq!(editor.message(), Some("Session locked due to inactivity."));
        assert!(!f.gate.is_unlocked(TIMEOUT));
    }

    #[test]
    fn edits_require_an_unlocked_session() {
        let f = fixture();
        let mut editor = open(&f);
        assert_eq!(editor.edit_navigation(ArrayOp::Add(nav("Blog"))), Err(PortfolioError::Locked));
        assert_eq!(editor.save(), Err(PortfolioError::Locked));

        let mut editor = unlocked(&f);
        f.clock.advance(TIMEOUT.as_millis() as u64 + 1);
        assert_eq!(editor.set_version("2"), Err(PortfolioError::Locked));
    }

    #[test]
    fn structured_edits_build_new_drafts() {
        let f = fixture();
        let mut editor = unlocked(&f);
        let before = editor.draft().clone();

        editor.edit_navigation(ArrayOp::Add(nav("Blog"))).unwrap();
        editor.edit_navigation(ArrayOp::Move { from: 4, to: 0 }).unwrap();
        editor.edit_navigation(ArrayOp::Remove(1)).unwrap();
        let labels: Vec<_> = editor.draft().navigation.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Blog", "About", "Personal Photo", "Contact"]);

        editor.edit_skills(ArrayOp::Add(SkillItem { label: "Rust".into(), icon: "crab".into() })).unwrap();
        editor.edit_footer_columns(ArrayOp::Add(FooterColumn { title: "More".into(), links: vec![] })).unwrap();
        editor
            .edit_footer_links(0, ArrayOp::Add(FooterLink { label: "Mail".into(), href: "mailto:a@b.c".into() }))
            .unwrap();
        editor.edit_social(ArrayOp::Add(FooterSocial { kind: "github".into(), href: "https://github.com/x".into() })).unwrap();
        editor.set_skills_title("TOOLS").unwrap();
        editor.set_copyright("© me").unwrap();

        let draft = editor.draft();
        assert_eq!(draft.skills.title, "TOOLS");
        assert_eq!(draft.skills.items.len(), 1);
        assert_eq!(draft.footer.columns[0].links[0].href, "mailto:a@b.c");
        assert_eq!(draft.footer.social.len(), 1);
        assert_eq!(draft.footer.copyright, "© me");
        assert_eq!(before.navigation.len(), 4);

        assert!(matches!(
            editor.edit_footer_links(7, ArrayOp::Remove(0)),
            Err(PortfolioError::InvalidInput(_))
        ));
    }

    #[test]
    fn save_persists_only_valid_drafts() {
        let f = fixture();
        let mut editor = unlocked(&f);

        let mut profile = editor.draft().profile.clone();
        profile.name = String::new();
        editor.update_profile(profile).unwrap();
        assert!(matches!(editor.save(), Err(PortfolioError::Validation(_))));
        assert!(editor.message().unwrap().starts_with("Draft is invalid:\nprofile.name is required"));
        assert_eq!(f.cache.read_raw(), None);

        let mut profile = editor.draft().profile.clone();
        profile.name = "Ada".into();
        editor.update_profile(profile).unwrap();
        editor.save().unwrap();
        assert_eq!(editor.message(), Some("Saved."));

        let saved = f.cache.read_raw().unwrap();
        assert_eq!(saved, editor.draft().to_pretty_json().unwrap());
        assert!(saved.contains("\n  \"version\""));

        // A fresh editor picks the saved draft up from the cache.
        assert_eq!(open(&f).draft().profile.name, "Ada");
    }

    #[test]
    fn export_and_download_do_not_persist() {
        let f = fixture();
        let mut editor = unlocked(&f);
        let text = editor.export_json().unwrap();
        assert_eq!(text, placeholder_document().to_pretty_json().unwrap());
        assert_eq!(editor.message(), Some("Copied JSON to clipboard."));

        let dir = tempfile::tempdir().unwrap();
        let path = editor.download_json(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("portfolio.json"));
        assert_eq!(editor.message(), Some("Downloaded portfolio.json"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), text);
        assert_eq!(f.cache.read_raw(), None);
    }

    #[test]
    fn import_replaces_draft_without_saving() {
        let f = fixture();
        let mut editor = unlocked(&f);

        assert!(matches!(editor.import_json("{oops"), Err(PortfolioError::InvalidInput(_))));
        assert_eq!(editor.message(), Some("Import failed: invalid JSON."));

        assert!(matches!(editor.import_json("{\"version\":\"1\"}"), Err(PortfolioError::Validation(_))));
        assert!(editor.message().unwrap().starts_with("Import failed:\n"));

        let mut incoming = placeholder_document();
        incoming.profile.name = "Imported".into();
        editor.import_json(&incoming.to_pretty_json().unwrap()).unwrap();
        assert_eq!(editor.draft(), &incoming);
        assert_eq!(f.cache.read_raw(), None);

        editor.reset_draft().unwrap();
        assert_eq!(editor.draft(), &placeholder_document());
    }

    #[tokio::test]
    async fn import_file_reads_from_disk() {
        let f = fixture();
        let mut editor = unlocked(&f);
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(editor.import_file(&missing).await, Err(PortfolioError::Storage(_))));
        assert_eq!(editor.message(), Some("Failed to read file."));

        let path = dir.path().join("in.json");
        std::fs::write(&path, placeholder_document().to_pretty_json().unwrap()).unwrap();
        editor.import_file(&path).await.unwrap();
        assert_eq!(editor.draft(), &placeholder_document());
    }
}
