use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use assist_chords::chord_export;
use assist_chords::config::AppConfig;
use assist_chords::data_mapper::{ConnectionMode, DataMapper};
use assist_chords::goal_record::load_goal_records;
use assist_chords::palette::arc_colors_seeded;

#[derive(Parser, Debug)]
#[command(author, version, about = "Assist network tools for a goal score sheet")]
struct Cli {
    /// Score sheet CSV (defaults to GOALS_CSV or data/goals.csv)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Connection counting: "all" or "scorer-assist"
    #[arg(short, long, global = true)]
    mode: Option<ConnectionMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Command {
    /// Write the chord diagram as JSON and/or an xlsx workbook
    Export {
        /// JSON output for a chord renderer
        #[arg(long)]
        json: Option<PathBuf>,

        /// Workbook output with matrix, player and chord sheets
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// Seed for the arc palette
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print player and chord summaries
    Report {
        /// Number of chords to list
        #[arg(short, long, default_value_t = 10)]
        top: usize,
    },
}

fn main() {
    sensible_env_logger::init!();
    run().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = AppConfig::from_env();
    if let Some(input) = cli.input {
        cfg.goals_csv = input;
    }
    if let Some(mode) = cli.mode {
        cfg.connection_mode = mode;
    }

    let records = load_goal_records(&cfg.goals_csv)?;
    let mut mapper = DataMapper::with_mode(cfg.connection_mode);
    mapper.set_source(records);

    match cli.command {
        Command::Export { json, xlsx, seed } => {
            if json.is_none() && xlsx.is_none() {
                bail!("nothing to export: pass --json and/or --xlsx");
            }
            let colors = arc_colors_seeded(mapper.player_count()?, seed.or(cfg.palette_seed));
            let report =
                chord_export::export_chords(&mapper, &colors, json.as_deref(), xlsx.as_deref())
                    .context("export chord diagram")?;
            println!("Export complete");
            println!("Players: {}", report.players);
            println!("Chords: {}", report.chords);
            if let Some(path) = json.filter(|_| report.json_written) {
                println!("JSON: {}", path.display());
            }
            if let Some(path) = xlsx.filter(|_| report.xlsx_written) {
                println!("Workbook: {}", path.display());
            }
        }
        Command::Report { top } => print_report(&mapper, top)?,
    }

    Ok(())
}

fn print_report(mapper: &DataMapper, top: usize) -> Result<()> {
    println!("Goals: {}", mapper.total_goal_count());
    match mapper.last_update() {
        Ok(last) => println!("Last update: {last}"),
        Err(err) => println!("Last update: - ({err})"),
    }
    println!("Connection mode: {}", mapper.mode());
    println!();

    for (idx, player) in mapper.players()?.iter().enumerate() {
        println!("{}", player.name);
        for line in mapper.player_info(idx)?.lines() {
            println!("  {line}");
        }
    }

    let chords = mapper.chords()?;
    if !chords.is_empty() {
        println!();
        println!("Top chords:");
    }
    for edge in chords.iter().take(top) {
        println!(
            " - {} / {} ({} connections, {} shared goals)",
            mapper.player_name(edge.source)?,
            mapper.player_name(edge.target)?,
            edge.value,
            mapper.shared_goals(edge.source, edge.target)?
        );
        for line in mapper.chord_info(edge)?.lines() {
            println!("     {line}");
        }
    }
    Ok(())
}
