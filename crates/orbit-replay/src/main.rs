mod config;
mod events;
mod sim;
mod sys;

use anyhow::Context;
use clap::{Parser, Subcommand};
use orbit::index::{MARKER_LABEL, OmitLayout};
use orbit::interp::Curve;
use sim::app::{ReplayApp, WidgetKind};
use std::path::PathBuf;
use sys::runtime::{self, Services};

#[derive(Parser, Debug)]
#[command(name = "orbit-replay", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Write the default tuning file if none exists.
    Init,
    /// Replay a timed gesture script through one widget.
    Replay {
        /// Script with one `<at_ms> <command> [args...]` per line
        script: PathBuf,

        #[arg(short, long, value_enum, default_value_t = WidgetKind::Floating)]
        widget: WidgetKind,

        /// Hot-reload tuning.toml while replaying
        #[arg(long)]
        watch: bool,
    },
    /// Print the circular index layout for a list size.
    Omit {
        #[arg(short, long)]
        items: usize,

        #[arg(short, long)]
        slots: Option<usize>,

        /// Leading items that are never folded into a marker
        #[arg(short, long, default_value_t = 0)]
        reserved: usize,
    },
    /// Print the built-in animation curves.
    Curve {
        #[arg(short, long, default_value_t = 10)]
        steps: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let (path, written) =
                config::write_default_tuning().context("Failed to write default tuning")?;
            if written {
                println!("Wrote {}", path.display());
            } else {
                println!("{} already exists", path.display());
            }
        }
        Commands::Replay {
            script,
            widget,
            watch,
        } => replay(script, widget, watch)?,
        Commands::Omit {
            items,
            slots,
            reserved,
        } => {
            let slots = slots.unwrap_or_else(|| config::load_or_default().index.max_slots);
            print_omit(&OmitLayout::compute(items, slots, reserved));
        }
        Commands::Curve { steps } => print_curves(steps.max(1)),
    }

    Ok(())
}

fn replay(script: PathBuf, widget: WidgetKind, watch: bool) -> anyhow::Result<()> {
    if !script.exists() {
        anyhow::bail!("Script {} not found", script.display());
    }

    let tuning = config::load_or_default();
    let mut app = ReplayApp::new(widget, tuning)?;

    let (tx, rx) = async_channel::bounded(64);
    runtime::start_background_services(Services { script, watch }, tx)
        .context("Failed to start background services")?;

    log::info!("Replaying through the {} widget", widget);
    while let Ok(event) = rx.recv_blocking() {
        if !app.handle(event) {
            break;
        }
    }
    Ok(())
}

fn print_omit(layout: &OmitLayout) {
    for (i, slot) in layout.slots().iter().enumerate() {
        let marker = if slot.is_marker() { MARKER_LABEL } else { " " };
        println!(
            "{:>3} {:>6.1} {} {:?}",
            i, slot.angle, marker, slot.items
        );
    }
    println!(
        "{} items, {} slots, {} markers",
        layout.item_count(),
        layout.slot_count(),
        layout.marker_count()
    );
}

fn print_curves(steps: usize) {
    let curves = [Curve::Linear, Curve::GlideOut, Curve::Decelerate];
    println!("{:>6} {:>8} {:>8} {:>8}", "p", "linear", "glide", "decel");
    for i in 0..=steps {
        let p = i as f64 / steps as f64;
        let values: Vec<String> = curves
            .iter()
            .map(|c| format!("{:>8.4}", c.transform(p)))
            .collect();
        println!("{:>6.3} {}", p, values.join(" "));
    }
}
