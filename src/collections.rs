//! The interactive collection generator.
//!
//! A menu loop over four workflows:
//!
//! ```text
//!            ┌──────────── 1 ──→ CreatingCollection ──(add now? y)──┐
//!            │                          │                            ▼
//!   Menu ────┼──────────── 2 ──→ (select collection) ──→ AddingArtworks
//!    ▲       │                          │                            │
//!    │       ├──────────── 3 ──→ Listing                             │
//!    │       └──── 4 / end of input ──→ Exit                         │
//!    └──────────────── done, validation error, cancel ◀──────────────┘
//! ```
//!
//! Each mutating workflow reads the store and index fresh from disk, stages
//! every file it changes in a [`Changeset`], and commits once at the end. A
//! validation error or a declined confirmation returns to the menu before
//! anything is staged for disk. A fatal error ends the run. The index is
//! backed up right before each commit and the backup is removed once the
//! commit succeeds, so a failure only ever rolls back the workflow that
//! failed; earlier workflows of the same run stay committed.

use crate::generate::{collection_href, render_collection_card, render_collection_page};
use crate::naming::{page_filename, require_filename};
use crate::output::{self, Palette};
use crate::prompt::Prompter;
use crate::scan::{extract_primary_image, scan_gallery};
use crate::session::{self, Backup, Changeset, Project, WorkflowError, required};
use crate::splice::{remove_matching_block, upsert_card};
use crate::store::CollectionStore;
use crate::types::{Artwork, Collection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Menu,
    CreatingCollection,
    AddingArtworks,
    Listing,
    Exit,
}

impl State {
    /// Menu transition for a typed choice; `None` for anything but 1-4.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::CreatingCollection),
            "2" => Some(Self::AddingArtworks),
            "3" => Some(Self::Listing),
            "4" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Parse a comma-separated list of 1-based positions.
///
/// Returns the valid positions (deduplicated, in typed order) and the entries
/// that were not numbers in `1..=max`.
pub fn parse_selection(input: &str, max: usize) -> (Vec<usize>, Vec<String>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.parse::<usize>() {
            Ok(n) if (1..=max).contains(&n) => {
                if !valid.contains(&n) {
                    valid.push(n);
                }
            }
            _ => invalid.push(entry.to_string()),
        }
    }
    (valid, invalid)
}

/// Drives the collection workflows for one project.
pub struct Orchestrator<'a, P: Prompter> {
    project: &'a Project,
    prompter: &'a mut P,
    palette: Palette,
    /// Backup guarding a commit that has not completed
    backup: Option<Backup>,
    backed_up: bool,
}

impl<'a, P: Prompter> Orchestrator<'a, P> {
    pub fn new(project: &'a Project, prompter: &'a mut P, palette: Palette) -> Self {
        Self {
            project,
            prompter,
            palette,
            backup: None,
            backed_up: false,
        }
    }

    /// Run the menu loop until Exit.
    ///
    /// On a fatal error during a commit the index is restored from that
    /// commit's backup and the error is returned.
    pub fn run(mut self) -> Result<(), WorkflowError> {
        let banner = output::format_banner(&self.palette, "Collection Generator");
        self.prompter.say_lines(&banner)?;

        match self.menu_loop() {
            Ok(()) => {
                if let Some(backup) = self.backup.take() {
                    backup.discard()?;
                }
                let bye = self.palette.success("👋 Goodbye!");
                self.prompter.say("")?;
                self.prompter.say(&bye)?;
                Ok(())
            }
            Err(e) => {
                if let Some(backup) = &self.backup
                    && let Err(restore) = backup.restore()
                {
                    tracing::error!(error = %restore, "could not restore index from backup");
                }
                Err(e)
            }
        }
    }

    fn menu_loop(&mut self) -> Result<(), WorkflowError> {
        let mut state = State::Menu;
        loop {
            state = match state {
                State::Menu => self.menu()?,
                State::CreatingCollection => {
                    if let Some(Some(key)) = self.recover(|s| s.create_collection())? {
                        self.recover(|s| s.add_artworks(&key))?;
                    }
                    State::Menu
                }
                State::AddingArtworks => {
                    if let Some(Some(key)) = self.recover(|s| s.select_collection_for_adding())? {
                        self.recover(|s| s.add_artworks(&key))?;
                    }
                    State::Menu
                }
                State::Listing => {
                    self.list_collections()?;
                    State::Menu
                }
                State::Exit => return Ok(()),
            };
        }
    }

    fn menu(&mut self) -> Result<State, WorkflowError> {
        let menu = output::format_menu(&self.palette);
        self.prompter.say_lines(&menu)?;
        let choice = match self.prompter.ask("\nEnter your choice (1-4): ", "") {
            Ok(choice) => choice,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                tracing::debug!("input closed at menu");
                return Ok(State::Exit);
            }
            Err(e) => return Err(e.into()),
        };
        match State::from_choice(&choice) {
            Some(next) => Ok(next),
            None => {
                let msg = self.palette.error("Invalid choice. Please enter 1-4.");
                self.prompter.say(&msg)?;
                Ok(State::Menu)
            }
        }
    }

    /// Run a workflow step, turning recoverable errors into a message and
    /// `None`. Fatal errors propagate.
    fn recover<T>(
        &mut self,
        step: impl FnOnce(&mut Self) -> Result<T, WorkflowError>,
    ) -> Result<Option<T>, WorkflowError> {
        match step(self) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                if e.is_input_closed() {
                    tracing::debug!("input closed inside a workflow");
                }
                let msg = self.palette.error(&format!("❌ {e}"));
                self.prompter.say(&msg)?;
                self.prompter.say("")?;
                Ok(None)
            }
        }
    }

    /// Back up the index, write the staged files, then drop the backup.
    ///
    /// The backup is only held while the commit is in flight; if the commit
    /// fails it stays behind for [`run`](Self::run) to restore.
    fn commit(&mut self, changes: Changeset) -> Result<(), WorkflowError> {
        let project = self.project;
        self.backup = Some(Backup::take(&project.paths.index, &project.paths.backup)?);
        if !self.backed_up {
            self.backed_up = true;
            let msg = self
                .palette
                .info(&format!("📋 Created backup of {}", project.index_name()));
            self.prompter.say(&msg)?;
        }
        changes.commit()?;
        if let Some(backup) = self.backup.take() {
            backup.discard()?;
        }
        Ok(())
    }

    fn success(&mut self, text: &str) -> Result<(), WorkflowError> {
        let line = self.palette.success(&format!("✅ {text}"));
        Ok(self.prompter.say(&line)?)
    }

    fn warn(&mut self, text: &str) -> Result<(), WorkflowError> {
        let line = self.palette.warn(&format!("⚠️  {text}"));
        Ok(self.prompter.say(&line)?)
    }

    // ========================================================================
    // Workflows
    // ========================================================================

    /// Create (or overwrite) a collection: record, page and index card.
    ///
    /// Returns the new key when the operator wants to add artworks right away.
    pub fn create_collection(&mut self) -> Result<Option<String>, WorkflowError> {
        let project = self.project;
        let config = &project.config;
        let paths = &project.paths;

        let heading = self.palette.emphasis("Create a New Collection");
        self.prompter.say(&heading)?;
        self.prompter.say("")?;

        let name = required(
            self.prompter.ask("Collection name: ", "")?,
            "Collection name is required",
        )?;
        let description = required(
            self.prompter.ask("Collection description: ", "")?,
            "Collection description is required",
        )?;
        let key = require_filename(
            &self
                .prompter
                .ask("HTML filename (without .html extension): ", "")?,
        )?;
        let filename = page_filename(&key);
        let page_path = paths.collection_page(&filename);

        let mut store = CollectionStore::load(&paths.store)?;
        let previous = store.get(&key).cloned();
        if previous.is_some() || page_path.exists() {
            let question = format!("Collection {filename} already exists. Overwrite? (y/N): ");
            if !self.prompter.confirm(&question)? {
                return Err(WorkflowError::Cancelled(
                    "Operation cancelled - collection already exists".to_string(),
                ));
            }
        }

        let defaults = &config.defaults;
        let background_image = self.prompter.ask(
            &format!(
                "Background image path (relative to {}/, default: {}): ",
                config.paths.collections_dir, defaults.background_image
            ),
            &defaults.background_image,
        )?;
        let background_image = background_image.trim().to_string();
        let background_overlay = self.prompter.ask(
            &format!(
                "Background overlay color (default: {}): ",
                defaults.background_overlay
            ),
            &defaults.background_overlay,
        )?;

        if !paths.collections_dir.join(&background_image).exists() {
            self.warn(&format!("Warning: Background image not found at {background_image}"))?;
            if !self.prompter.confirm("Continue anyway? (y/N): ")? {
                return Err(WorkflowError::Cancelled(
                    "Setup cancelled - please ensure background image path is correct"
                        .to_string(),
                ));
            }
        }

        // Overwriting keeps the members: their cards are already gone from
        // the art grid, so dropping them would lose them from the site.
        let record = Collection {
            name,
            description,
            filename: filename.clone(),
            background_image,
            background_overlay: background_overlay.trim().to_string(),
            artworks: previous.map(|c| c.artworks).unwrap_or_default(),
        };
        store.upsert_collection(&key, record.clone())?;

        let index = project.read_index()?;
        let index = upsert_card(
            &index,
            &config.markup.series_grid,
            &config.markup.series_card_class,
            &collection_href(&record, config),
            &render_collection_card(&record, config).into_string(),
        )?;

        let mut changes = Changeset::new();
        changes.stage(&paths.store, store.to_json()?);
        changes.stage(&page_path, render_collection_page(&record, config).into_string());
        changes.stage(&paths.index, index);
        self.commit(changes)?;
        tracing::info!(key, "created collection");

        self.success(&format!("Created collection: {filename}"))?;
        self.success("Added collection to main gallery series section")?;

        if self
            .prompter
            .confirm("Add artworks to this collection now? (y/N): ")?
        {
            Ok(Some(key))
        } else {
            Ok(None)
        }
    }

    /// Pick a collection by its listing number.
    pub fn select_collection_for_adding(&mut self) -> Result<Option<String>, WorkflowError> {
        let store = CollectionStore::load(&self.project.paths.store)?;
        if store.is_empty() {
            self.warn("No collections found. Please create a collection first.")?;
            return Ok(None);
        }

        let choices = output::format_collection_choices(&self.palette, &store);
        self.prompter.say_lines(&choices)?;
        let answer = self.prompter.ask("\nEnter collection number: ", "")?;

        answer
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| store.key_at(n))
            .map(|key| Some(key.to_string()))
            .ok_or_else(|| WorkflowError::Validation("Invalid collection number.".to_string()))
    }

    /// Move loose artworks from the index's art grid into a collection.
    pub fn add_artworks(&mut self, key: &str) -> Result<(), WorkflowError> {
        let project = self.project;
        let config = &project.config;
        let paths = &project.paths;

        let mut store = CollectionStore::load(&paths.store)?;
        let name = store
            .get(key)
            .ok_or_else(|| WorkflowError::UnknownCollection(key.to_string()))?
            .name
            .clone();

        let heading = self
            .palette
            .emphasis(&format!("Adding Artworks to \"{name}\""));
        self.prompter.say("")?;
        self.prompter.say(&heading)?;
        self.prompter.say("")?;

        let mut index = project.read_index()?;
        let loose = scan_gallery(&index, &config.markup)?;
        if loose.is_empty() {
            self.warn("No artworks available in main gallery to add to collection.")?;
            return Ok(());
        }

        let listing = output::format_gallery_listing(&self.palette, &loose);
        self.prompter.say_lines(&listing)?;
        let answer = self
            .prompter
            .ask("Enter artwork numbers to add (comma-separated): ", "")?;
        if answer.trim().is_empty() {
            return Ok(());
        }

        let (selected, invalid) = parse_selection(&answer, loose.len());
        for entry in &invalid {
            self.warn(&format!("Ignoring invalid selection: {entry}"))?;
        }
        if selected.is_empty() {
            self.warn("No valid artwork numbers selected.")?;
            return Ok(());
        }

        let mut moving: Vec<Artwork> = Vec::new();
        for pos in selected {
            let artwork = &loose[pos - 1];
            let page = paths.artwork_page(&artwork.filename);
            if !page.is_file() {
                self.warn(&format!("Warning: Artwork file {} not found", artwork.filename))?;
                continue;
            }
            let Some(image) = extract_primary_image(&session::read(&page)?) else {
                self.warn(&format!(
                    "Could not extract image information from {}",
                    artwork.filename
                ))?;
                continue;
            };
            moving.push(Artwork {
                image,
                ..artwork.clone()
            });
        }

        let outcome = store.append_artworks(key, moving)?;
        for artwork in &outcome.skipped {
            self.warn(&format!("\"{}\" is already in this collection", artwork.title))?;
        }
        for artwork in &outcome.added {
            let (edited, removed) = remove_matching_block(
                &index,
                &config.markup.art_grid,
                &artwork.filename,
                &config.markup.art_card_class,
            )?;
            index = edited;
            tracing::debug!(filename = %artwork.filename, removed, "moved card out of art grid");
            self.success(&format!(
                "Added \"{}\" to collection and removed from main gallery",
                artwork.title
            ))?;
        }

        let updated = store
            .get(key)
            .ok_or_else(|| WorkflowError::UnknownCollection(key.to_string()))?
            .clone();
        let index = upsert_card(
            &index,
            &config.markup.series_grid,
            &config.markup.series_card_class,
            &collection_href(&updated, config),
            &render_collection_card(&updated, config).into_string(),
        )?;

        let mut changes = Changeset::new();
        changes.stage(&paths.store, store.to_json()?);
        changes.stage(
            paths.collection_page(&updated.filename),
            render_collection_page(&updated, config).into_string(),
        );
        changes.stage(&paths.index, index);
        self.commit(changes)?;
        tracing::info!(key, added = outcome.added.len(), "updated collection");

        self.success(&format!("Updated collection: {}", updated.filename))?;
        self.success("Updated collection in main gallery series section")?;
        Ok(())
    }

    pub fn list_collections(&mut self) -> Result<(), WorkflowError> {
        let store = CollectionStore::load(&self.project.paths.store)?;
        let lines = output::format_collection_list(&self.palette, &store);
        self.prompter.say_lines(&lines)?;
        Ok(())
    }
}
