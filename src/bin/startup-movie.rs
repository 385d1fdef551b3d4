use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};
use startup_movie::{MovieLayout, MovieSwitcher, TransitionOutcome};

#[derive(Parser, Debug)]
#[command(name = "startup-movie", version)]
struct Cli {
    /// Layout JSON (fields not given keep their UDK defaults).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Movies directory; overrides the layout's `movies_dir`.
    #[arg(long, global = true)]
    movies_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show which slots are occupied and which level the state file records.
    Status(StatusArgs),
    /// Run one level transition, exactly as the host would.
    Switch(SwitchArgs),
}

#[derive(Parser, Debug)]
struct StatusArgs {
    /// Print machine-readable JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct SwitchArgs {
    /// Level being left.
    #[arg(long)]
    from: String,

    /// Level about to load.
    #[arg(long)]
    to: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let layout = load_layout(cli.config.as_deref(), cli.movies_dir)?;
    let switcher = MovieSwitcher::on_disk(layout);
    match cli.cmd {
        Command::Status(args) => cmd_status(&switcher, args),
        Command::Switch(args) => cmd_switch(&switcher, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_layout(
    config: Option<&std::path::Path>,
    movies_dir: Option<PathBuf>,
) -> anyhow::Result<MovieLayout> {
    let mut layout = match config {
        Some(path) => MovieLayout::from_path(path)?,
        None => MovieLayout::udk_default(),
    };
    if let Some(dir) = movies_dir {
        layout.movies_dir = dir;
    }
    Ok(layout)
}

fn cmd_status(switcher: &MovieSwitcher, args: StatusArgs) -> anyhow::Result<()> {
    let layout = switcher.layout();
    let snapshot = switcher
        .snapshot()
        .with_context(|| format!("inspect '{}'", layout.movies_dir.display()))?;
    let persisted = switcher.persisted_level();

    if args.json {
        let out = serde_json::json!({
            "movies_dir": layout.movies_dir,
            "persisted": persisted,
            "slots": snapshot,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let occupied = |b: bool| if b { "present" } else { "empty" };
    println!("movies dir:  {}", layout.movies_dir.display());
    println!("active:      {}", occupied(snapshot.active));
    println!("default:     {}", occupied(snapshot.default));
    match &persisted {
        Some(id) => println!("persisted:   {id}"),
        None => println!("persisted:   (none)"),
    }
    if snapshot.active_holds_default() {
        println!("in active:   default movie");
    } else if let Some(id) = persisted.as_ref().filter(|_| snapshot.active) {
        println!("in active:   movie of {id}");
    }
    if snapshot.levels.is_empty() {
        println!("parked:      (none)");
    } else {
        for id in &snapshot.levels {
            println!("parked:      {id}");
        }
    }
    Ok(())
}

fn cmd_switch(switcher: &MovieSwitcher, args: SwitchArgs) -> anyhow::Result<()> {
    let outcome = switcher
        .set_startup_movie(&args.from, &args.to)
        .with_context(|| format!("switch '{}' -> '{}'", args.from, args.to))?;

    match outcome {
        TransitionOutcome::Unchanged(reason) => eprintln!("unchanged ({reason:?})"),
        TransitionOutcome::Rotated { report, resumed } => {
            if resumed {
                eprintln!("resumed interrupted transition");
            }
            eprintln!("{:?}: {} step(s)", report.case, report.applied.len());
            for step in &report.applied {
                eprintln!("  {step}");
            }
        }
    }
    Ok(())
}
