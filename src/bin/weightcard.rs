use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use weightcard::api::{FlipCardWidget, LoadState, WidgetConfig};
use weightcard::core::{TABLE_COLUMNS, TableLine};
use weightcard::interaction::WidgetEvent;
use weightcard::render::{NullRenderer, Renderer};

#[derive(Parser)]
#[command(version, about = "Inspect and render a course-weight flip card")]
struct Cli {
    /// Widget config JSON; defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the table face as text.
    Table {
        data: PathBuf,
        /// Events applied before printing, e.g. `sort-table:Weight`.
        #[arg(short, long = "event")]
        events: Vec<String>,
    },
    /// Replay events and print the JSON snapshot contract.
    Snapshot {
        data: PathBuf,
        #[arg(short, long = "event")]
        events: Vec<String>,
    },
    /// Replay events and write the resulting card as PNG.
    #[cfg(feature = "cairo-backend")]
    Render {
        data: PathBuf,
        #[arg(short, long = "event")]
        events: Vec<String>,
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let _ = weightcard::telemetry::init_default_tracing();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Table { data, events } => {
            let widget = replay(NullRenderer::default(), config, &data, &events)?;
            print_table(&widget);
            Ok(())
        }
        Commands::Snapshot { data, events } => {
            let widget = replay(NullRenderer::default(), config, &data, &events)?;
            let json = widget
                .snapshot_json_contract_v1_pretty()
                .map_err(|err| err.to_string())?;
            println!("{json}");
            Ok(())
        }
        #[cfg(feature = "cairo-backend")]
        Commands::Render {
            data,
            events,
            output,
        } => render_png(config, &data, &events, &output),
    }
}

fn load_config(path: Option<&Path>) -> Result<WidgetConfig, String> {
    let Some(path) = path else {
        return Ok(WidgetConfig::default());
    };
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("failed to read `{}`: {err}", path.display()))?;
    WidgetConfig::from_json_str(&raw).map_err(|err| err.to_string())
}

fn replay<R: Renderer>(
    renderer: R,
    config: WidgetConfig,
    data: &Path,
    events: &[String],
) -> Result<FlipCardWidget<R>, String> {
    let config = config.with_data_source(data.display().to_string());
    let mut widget = FlipCardWidget::new(renderer, config).map_err(|err| err.to_string())?;
    widget.load_path(data).map_err(|err| err.to_string())?;
    if let LoadState::Failed { message } = widget.load_state() {
        return Err(message.clone());
    }

    for raw in events {
        let event = raw
            .parse::<WidgetEvent>()
            .map_err(|err| err.to_string())?;
        widget.handle_event(&event).map_err(|err| err.to_string())?;
    }
    Ok(widget)
}

fn print_table<R: Renderer>(widget: &FlipCardWidget<R>) {
    let sort = widget.state().table_sort();
    let header: Vec<String> = TABLE_COLUMNS
        .iter()
        .map(|column| match sort.indicator(*column) {
            Some(indicator) => format!("{} {indicator}", column.label()),
            None => column.label().to_owned(),
        })
        .collect();
    println!("{:<40} {:<12} {:>8}", header[0], header[1], header[2]);

    for line in widget.table_lines() {
        match line {
            TableLine::GroupHeader { component } => println!("[{component}]"),
            TableLine::Entry {
                deliverable,
                kind,
                weight_label,
                ..
            } => println!("    {deliverable:<36} {kind:<12} {weight_label:>8}"),
        }
    }
}

#[cfg(feature = "cairo-backend")]
fn render_png(
    config: WidgetConfig,
    data: &Path,
    events: &[String],
    output: &Path,
) -> Result<(), String> {
    use weightcard::render::CairoRenderer;

    // Replay headless first: the card height depends on the final view.
    let probe = replay(NullRenderer::default(), config.clone(), data, events)?;
    let card = probe.card_viewport();
    let width = i32::try_from(card.width).map_err(|err| err.to_string())?;
    let height = i32::try_from(card.height).map_err(|err| err.to_string())?;

    let renderer = CairoRenderer::new(width, height).map_err(|err| err.to_string())?;
    let widget = replay(renderer, config, data, events)?;
    widget
        .renderer()
        .write_png(output)
        .map_err(|err| err.to_string())?;
    println!("wrote {}", output.display());
    Ok(())
}
