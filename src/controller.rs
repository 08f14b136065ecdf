//! Refresh Controller: turns host events into decoration refreshes.
//!
//! The controller owns the active document snapshot, the [`Session`], the
//! font loader and the host surface. Events arm the [`RefreshScheduler`];
//! the host's event loop calls [`RefreshController::poll`] and sleeps until
//! [`RefreshController::next_deadline`] in between.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use icon_lens_config::Config;
use serde::Serialize;

use crate::completion::{self, CompletionItem};
use crate::host::{DecorationHandle, DecorationSurface, SourceDocument, TextDocument, TokenRange};
use crate::loader::FontLoader;
use crate::scanner;
use crate::scheduler::RefreshScheduler;
use crate::session::Session;

/// Events delivered by the host editor.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// The focused document changed; `None` when no document is focused.
    ActiveDocumentChanged(Option<SourceDocument>),
    /// A document's contents changed; carries the new snapshot.
    DocumentEdited(SourceDocument),
    /// The configuration was replaced.
    ConfigurationChanged(Config),
}

/// Ranges applied for one decoration handle in a refresh pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedGroup {
    pub name: String,
    pub handle: DecorationHandle,
    pub ranges: Vec<TokenRange>,
}

/// Outcome of one refresh pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    /// Document the pass ran over
    pub document: Option<String>,
    /// Number of token occurrences found
    pub occurrences: usize,
    /// Groups applied to the surface, in order of first occurrence
    pub groups: Vec<AppliedGroup>,
    /// Distinct names that did not resolve
    pub skipped: Vec<String>,
    /// Handles from the previous pass that were cleared
    pub cleared: Vec<DecorationHandle>,
}

pub struct RefreshController<S: DecorationSurface> {
    session: Session,
    loader: FontLoader,
    surface: S,
    scheduler: RefreshScheduler,
    active: Option<SourceDocument>,
    /// Handles that currently have ranges on the surface
    applied: BTreeSet<DecorationHandle>,
}

impl<S: DecorationSurface> RefreshController<S> {
    pub fn new(session: Session, loader: FontLoader, surface: S) -> Self {
        let delay = Duration::from_millis(session.config().refresh_debounce_ms);
        Self {
            session,
            loader,
            surface,
            scheduler: RefreshScheduler::new(delay),
            active: None,
            applied: BTreeSet::new(),
        }
    }

    /// Start up: load the font and paint `document` without delay.
    ///
    /// A font load failure is logged and leaves rendering inactive until a
    /// later configuration change loads successfully.
    pub fn activate(&mut self, document: Option<SourceDocument>, now: Instant) {
        log::info!(
            "Activating (mode: {})",
            self.session.config().mode.display_name()
        );
        self.reload_font();
        self.active = document;
        if self.active.is_some() {
            self.scheduler.request_immediate(now);
        }
    }

    fn reload_font(&mut self) {
        if let Err(e) = self.session.load_font(&self.loader) {
            if self.session.has_font() {
                log::error!("Icon font reload failed, keeping previous font: {}", e);
            } else {
                log::error!("Icon font load failed, icon rendering inactive: {}", e);
            }
        }
    }

    pub fn handle_event(&mut self, event: HostEvent, now: Instant) {
        match event {
            HostEvent::ActiveDocumentChanged(document) => {
                self.active = document;
                if let Some(document) = &self.active {
                    log::debug!("Active document changed to {}", document.uri());
                    self.scheduler.request_immediate(now);
                }
            }
            HostEvent::DocumentEdited(document) => {
                let is_active = self
                    .active
                    .as_ref()
                    .is_some_and(|active| active.uri() == document.uri());
                if !is_active {
                    log::trace!("Ignoring edit to inactive document {}", document.uri());
                    return;
                }
                self.active = Some(document);
                self.scheduler.request_debounced(now);
            }
            HostEvent::ConfigurationChanged(config) => {
                log::info!("Configuration changed, rebuilding decorations");
                self.scheduler.cancel();
                self.session.dispose_all(&mut self.surface);
                self.applied.clear();

                self.scheduler
                    .set_delay(Duration::from_millis(config.refresh_debounce_ms));
                if self.session.apply_config(config) {
                    self.reload_font();
                }
                self.scheduler.request_immediate(now);
            }
        }
    }

    /// Run the pending refresh if it is due.
    pub fn poll(&mut self, now: Instant) -> Option<RefreshReport> {
        if !self.scheduler.take_due(now) {
            return None;
        }
        let report = self.refresh();
        self.scheduler.finish();
        Some(report)
    }

    /// When `poll` next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Scan the active document and apply decorations grouped by handle.
    pub fn refresh(&mut self) -> RefreshReport {
        let Some(document) = &self.active else {
            return RefreshReport::default();
        };

        let occurrences = scanner::scan(document);
        let mut report = RefreshReport {
            document: Some(document.uri().to_string()),
            occurrences: occurrences.len(),
            ..RefreshReport::default()
        };

        if !self.session.has_font() {
            log::debug!("No icon font loaded, skipping decoration pass");
        }

        // One resolution per distinct name per pass
        let mut resolved: HashMap<String, Option<usize>> = HashMap::new();
        for occurrence in &occurrences {
            let slot = match resolved.get(&occurrence.text) {
                Some(slot) => *slot,
                None => {
                    let slot = self.resolve(&occurrence.text, &mut report);
                    resolved.insert(occurrence.text.clone(), slot);
                    slot
                }
            };
            if let Some(index) = slot {
                report.groups[index].ranges.push(occurrence.range());
            }
        }

        let mut current = BTreeSet::new();
        for group in &report.groups {
            self.surface.set_decorations(group.handle, &group.ranges);
            current.insert(group.handle);
        }
        for handle in self.applied.difference(&current) {
            self.surface.set_decorations(*handle, &[]);
            report.cleared.push(*handle);
        }
        self.applied = current;

        log::debug!(
            "Refreshed {}: {} occurrences, {} decorations, {} skipped",
            report.document.as_deref().unwrap_or(""),
            report.occurrences,
            report.groups.len(),
            report.skipped.len()
        );
        report
    }

    /// Resolve `name` to a group index in `report`, or record it as skipped.
    fn resolve(&mut self, name: &str, report: &mut RefreshReport) -> Option<usize> {
        if !self.session.has_font() {
            report.skipped.push(name.to_string());
            return None;
        }
        match self.session.decoration(name, &mut self.surface) {
            Ok(handle) => {
                if let Some(index) = report.groups.iter().position(|g| g.handle == handle) {
                    return Some(index);
                }
                report.groups.push(AppliedGroup {
                    name: name.to_string(),
                    handle,
                    ranges: Vec::new(),
                });
                Some(report.groups.len() - 1)
            }
            Err(e) => {
                log::debug!("Skipping {}: {}", name, e);
                report.skipped.push(name.to_string());
                None
            }
        }
    }

    /// Completion items for the text before the cursor.
    pub fn complete(&mut self, line_prefix: &str) -> Option<Vec<CompletionItem>> {
        completion::provide_completions(line_prefix, &mut self.session, &mut self.surface)
    }

    /// Release every decoration and drop any pending refresh.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel();
        self.session.dispose_all(&mut self.surface);
        self.applied.clear();
        log::info!("Deactivated");
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn active_document(&self) -> Option<&SourceDocument> {
        self.active.as_ref()
    }
}

impl<S: DecorationSurface + std::fmt::Debug> std::fmt::Debug for RefreshController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshController")
            .field("session", &self.session)
            .field("surface", &self.surface)
            .field("scheduler", &self.scheduler)
            .field("active", &self.active.as_ref().map(|d| d.uri()))
            .finish_non_exhaustive()
    }
}
