use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use combotui::{sample_accounts, ComboOption, ComboboxConfig, Variant};

mod app;
mod ui;
mod widgets;

use app::App;

/// Accessible combobox: type to filter, arrows to highlight, Enter to select
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Selection model
    #[arg(long, value_enum, default_value_t = Variant::Default)]
    variant: Variant,

    /// Only allow options from the option set (no freeform entries)
    #[arg(long)]
    predefined_only: bool,

    /// Start with the listbox open
    #[arg(long)]
    open: bool,

    /// Instance id used to derive every DOM id
    #[arg(long, default_value = "combobox-unique-id")]
    id: String,

    /// Field label
    #[arg(long, default_value = "Search")]
    label: String,

    /// Placeholder shown while the input is empty
    #[arg(long, default_value = "Search Salesforce")]
    placeholder: String,

    /// Discard Enter on free text when nothing matched
    #[arg(long)]
    no_freeform_on_no_match: bool,

    /// JSON file with an array of options (defaults to sample accounts)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Write engine logs to this file (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Generate usage spec for this tool
    #[arg(long)]
    usage: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    // Handle --usage flag to output usage spec
    if args.usage {
        let mut cmd = Args::command();
        let bin_name = std::env::args()
            .next()
            .unwrap_or_else(|| "combotui".to_string());
        let mut buf = Vec::new();
        clap_usage::generate(&mut cmd, bin_name, &mut buf);
        print!("{}", String::from_utf8_lossy(&buf));
        return Ok(());
    }

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let options = match args.options {
        Some(ref path) => load_options(path)?,
        None => sample_accounts(),
    };

    let config = ComboboxConfig::new(args.id.clone())
        .with_variant(args.variant)
        .with_predefined_options_only(args.predefined_only)
        .with_open(args.open)
        .with_labels(args.label.clone(), args.placeholder.clone())
        .with_freeform_on_no_match(!args.no_freeform_on_no_match);
    let mut app = App::new(config, options)
        .map_err(|e| color_eyre::eyre::eyre!("Invalid --id '{}': {}", args.id, e))?;

    // Enable mouse capture before initializing the terminal
    crossterm::execute!(std::io::stderr(), crossterm::event::EnableMouseCapture)?;

    let mut terminal = ratatui::init();
    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal and disable mouse capture
    ratatui::restore();
    crossterm::execute!(std::io::stderr(), crossterm::event::DisableMouseCapture)?;

    result?;
    for label in app.selection_labels() {
        println!("{label}");
    }
    Ok(())
}

/// Read an options file: a JSON array of `{ id, label, subTitle, icon, type }`.
fn load_options(path: &Path) -> color_eyre::Result<Vec<ComboOption>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        color_eyre::eyre::eyre!("Failed to read options file '{}': {}", path.display(), e)
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        color_eyre::eyre::eyre!(
            "Failed to parse options file '{}': {}",
            path.display(),
            e
        )
    })
}

/// Route tracing output to a file so it never lands on the alternate screen.
fn init_logging(path: &Path) -> color_eyre::Result<()> {
    let file = File::create(path).map_err(|e| {
        color_eyre::eyre::eyre!("Failed to create log file '{}': {}", path.display(), e)
    })?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("combotui=debug")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> color_eyre::Result<()> {
    use crossterm::event::{self, Event, KeyEventKind};

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        let action = match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                app.handle_key(key)
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            Event::FocusLost => {
                app.dispatch(combotui::Event::Blur);
                app::Action::None
            }
            // Terminal will be redrawn on next loop iteration
            _ => app::Action::None,
        };

        if action == app::Action::Quit {
            return Ok(());
        }
    }
}
