//! The artwork generator.
//!
//! One pass: ask for the artwork's details, write its detail page into the
//! project root and put its card into the index's art grid. Unlike the
//! collection generator there is no menu to fall back to, so any validation
//! error or declined confirmation ends the run with nothing written.

use crate::generate::{render_artwork_page, render_gallery_card};
use crate::naming::{page_filename, require_filename};
use crate::output::{self, Palette};
use crate::prompt::Prompter;
use crate::session::{Backup, Changeset, Project, WorkflowError, required};
use crate::splice::upsert_card;
use crate::types::{ArtworkDetails, split_paragraphs};
use chrono::Datelike;

/// Ask for every field of an artwork page.
///
/// `current_year` is the default for the year prompt.
pub fn collect_details<P: Prompter>(
    project: &Project,
    prompter: &mut P,
    palette: &Palette,
    current_year: i32,
) -> Result<ArtworkDetails, WorkflowError> {
    let defaults = &project.config.defaults;

    let title = required(prompter.ask("Artwork title: ", "")?, "Artwork title is required")?;
    let price = required(prompter.ask("Price (e.g., $450): ", "")?, "Price is required")?;
    let short_description = required(
        prompter.ask("Short description (for gallery card): ", "")?,
        "Short description is required",
    )?;
    let description = required(
        prompter.ask("Full description (use \\n for paragraphs): ", "")?,
        "Full description is required",
    )?;
    let medium = required(
        prompter.ask("Medium (e.g., Oil on Canvas): ", "")?,
        "Medium is required",
    )?;
    let dimensions = required(
        prompter.ask("Dimensions (e.g., 18\" × 24\" (45cm × 60cm)): ", "")?,
        "Dimensions are required",
    )?;
    let year = required(
        prompter.ask("Year: ", &current_year.to_string())?,
        "Year is required",
    )?;
    let frame = prompter
        .ask(
            &format!("Frame (e.g., {}): ", defaults.frame),
            &defaults.frame,
        )?
        .trim()
        .to_string();
    let availability = prompter
        .ask("Availability (Available/Sold): ", &defaults.availability)?
        .trim()
        .to_string();

    prompter.say("")?;
    prompter.say(&palette.emphasis("Image paths (relative to project root):"))?;
    let main_image = required(
        prompter.ask("Main image path (e.g., Artpieces/artwork_name.jpg): ", "")?,
        "Main image path is required",
    )?;
    if !project.paths.root.join(&main_image).exists() {
        prompter.say(&palette.warn(&format!(
            "⚠️  Warning: Main image file not found at {main_image}"
        )))?;
        if !prompter.confirm("Continue anyway? (y/N): ")? {
            return Err(WorkflowError::Cancelled(
                "Setup cancelled - please ensure image path is correct".to_string(),
            ));
        }
    }

    let mut images = vec![main_image];
    loop {
        let question = format!(
            "Additional image {} path (or press Enter to skip): ",
            images.len()
        );
        let answer = prompter.ask(&question, "")?;
        let answer = answer.trim();
        if answer.is_empty() {
            break;
        }
        images.push(answer.to_string());
    }

    Ok(ArtworkDetails {
        title,
        price,
        short_description,
        paragraphs: split_paragraphs(&description),
        medium,
        dimensions,
        year,
        frame,
        availability,
        images,
    })
}

/// Run the artwork generator against `project`.
pub fn run<P: Prompter>(
    project: &Project,
    prompter: &mut P,
    palette: Palette,
) -> Result<(), WorkflowError> {
    let config = &project.config;
    let paths = &project.paths;

    prompter.say_lines(&output::format_banner(&palette, "Artwork Generator"))?;
    prompter.say(&palette.emphasis("Please enter the artwork details:"))?;
    prompter.say("")?;

    let details = collect_details(project, prompter, &palette, chrono::Local::now().year())?;

    let slug = require_filename(&prompter.ask(
        "HTML filename (without .html extension, e.g., \"golden-way\"): ",
        "",
    )?)?;
    let filename = page_filename(&slug);
    let page_path = paths.artwork_page(&filename);
    if page_path.exists() {
        let question = format!("File {filename} already exists. Overwrite? (y/N): ");
        if !prompter.confirm(&question)? {
            return Err(WorkflowError::Cancelled(
                "Setup cancelled - file already exists".to_string(),
            ));
        }
    }

    let card = render_gallery_card(&details.to_artwork(&filename), "", config).into_string();
    let index = upsert_card(
        &project.read_index()?,
        &config.markup.art_grid,
        &config.markup.art_card_class,
        &filename,
        &card,
    )?;

    let mut changes = Changeset::new();
    changes.stage(&page_path, render_artwork_page(&details, config).into_string());
    changes.stage(&paths.index, index);

    let backup = Backup::take(&paths.index, &paths.backup)?;
    if let Err(e) = changes.commit() {
        if let Err(restore) = backup.restore() {
            tracing::error!(error = %restore, "could not restore index from backup");
        }
        return Err(e);
    }
    backup.discard()?;
    tracing::info!(filename, "created artwork page");

    prompter.say(&palette.success(&format!("✅ Created {filename}")))?;
    prompter.say(&palette.success(&format!(
        "✅ Added gallery card to {}",
        project.index_name()
    )))?;
    prompter.say_lines(&output::format_artwork_summary(
        &palette,
        &details,
        &filename,
        project.index_name(),
    ))?;
    Ok(())
}
