pub mod commands;
pub mod moment;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{
    process_add_command, process_charts_command, process_list_command, process_move_command,
    process_order_command, process_reset_command, process_stats_command,
};
use moment::MomentArgs;
use tracing::level_filters::LevelFilter;

use crate::{
    charts::ChartKind,
    utils::{
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Statboard", version, long_about = None)]
#[command(about = "Browse creation records and their activity charts", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Add a new record")]
    Add {
        #[arg(help = "Title of the record")]
        title: Option<String>,
        #[command(flatten)]
        moment: MomentArgs,
    },
    #[command(about = "Show latest records")]
    List {
        #[arg(short = 'n', long, default_value_t = 20, help = "Amount of records to show")]
        limit: usize,
    },
    #[command(about = "Show all charts in their current order")]
    Charts {
        #[command(flatten)]
        moment: MomentArgs,
        #[arg(long, help = "Print charts as json")]
        json: bool,
    },
    #[command(about = "Move a chart to the place of another chart and remember the new order")]
    Move {
        #[arg(help = "Chart to move: heatmap, bar, pie or line")]
        dragged: ChartKind,
        #[arg(help = "Chart whose place it takes")]
        onto: ChartKind,
    },
    #[command(about = "Show the current chart order")]
    Order {},
    #[command(about = "Forget the saved chart order")]
    Reset {},
    #[command(about = "Show overall statistics")]
    Stats {
        #[command(flatten)]
        moment: MomentArgs,
        #[arg(long, help = "Print a summary ready to be shared")]
        share: bool,
        #[arg(long, help = "Print statistics as json", conflicts_with = "share")]
        json: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;
    enable_logging(CLI_PREFIX, &dir, logging_level, args.log)?;

    match args.commands {
        Commands::Add { title, moment } => process_add_command(&dir, title, moment).await,
        Commands::List { limit } => process_list_command(&dir, limit).await,
        Commands::Charts { moment, json } => process_charts_command(&dir, moment, json).await,
        Commands::Move { dragged, onto } => process_move_command(&dir, dragged, onto).await,
        Commands::Order {} => process_order_command(&dir).await,
        Commands::Reset {} => process_reset_command(&dir).await,
        Commands::Stats {
            moment,
            share,
            json,
        } => process_stats_command(&dir, moment, share, json).await,
    }
}
