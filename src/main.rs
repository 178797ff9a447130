use clap::{Parser, Subcommand};
use gallery_tools::output::{self, Palette};
use gallery_tools::prompt::LinePrompter;
use gallery_tools::session::{Project, WorkflowError};
use gallery_tools::{artwork, collections, config, logging};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "gallery-tools")]
#[command(about = "Page generators for a hand-authored art gallery site")]
#[command(long_about = "\
Page generators for a hand-authored art gallery site

The gallery's index.html is written by hand. These tools add to it: an
artwork detail page plus its card in the art grid, or a collection page plus
its card in the series grid, moving artworks out of the main gallery into the
collection.

Project layout:

  ./
  ├── gallery.toml                 # Optional overrides (see gen-config)
  ├── index.html                   # Hand-authored gallery page
  ├── collections.json             # Collection records, written by `collections`
  ├── golden-way.html              # Artwork pages, written by `artwork`
  ├── Artpieces/                   # Artwork images
  └── collections/
      ├── final-test.html          # Collection pages
      └── collection_bgs/          # Collection background images

Before editing, index.html is copied to index.html.backup. The copy is put
back if a run fails and removed when it finishes.

Run 'gallery-tools gen-config' to print a documented gallery.toml.")]
#[command(version)]
struct Cli {
    /// Project directory containing index.html
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an artwork detail page and add its card to the gallery
    Artwork,
    /// Create collections and move gallery artworks into them
    Collections,
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init() {
        eprintln!("{e}");
    }

    let palette = Palette::new(!cli.no_color && std::io::stdout().is_terminal());
    match run(&cli, palette) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            eprintln!("{}", output::format_failure(&palette, &e.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, palette: Palette) -> Result<(), WorkflowError> {
    match cli.command {
        Command::Artwork => {
            let project = Project::open(&cli.root)?;
            let mut prompter = LinePrompter::stdio();
            artwork::run(&project, &mut prompter, palette)
        }
        Command::Collections => {
            let project = Project::open(&cli.root)?;
            let mut prompter = LinePrompter::stdio();
            collections::Orchestrator::new(&project, &mut prompter, palette).run()
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
    }
}
