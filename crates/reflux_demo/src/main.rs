use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use reflux_core::ViewModel;
use reflux_demo::config::{load_config, DemoConfig};
use reflux_demo::console::{attach_status_line, attach_transition_log, parse_command, Command, HELP};
use reflux_demo::list::{AnyListViewModel, AsyncLoader, ListMachine};
use reflux_logging::log::LevelFilter;
use reflux_logging::{reflux_info, LogDestination};
use reflux_runtime::build_runtime;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::LocalSet;

#[derive(Debug, Parser)]
#[command(name = "reflux_demo", about = "List screen driven by the reflux event loop")]
struct Args {
    /// RON config file; missing means defaults.
    #[arg(long, default_value = "reflux_demo.ron")]
    config: PathBuf,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    log: LogTarget,

    /// Log every event, not just transitions.
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogTarget {
    Terminal,
    File,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    reflux_logging::initialize(args.log.into(), level);

    let config = load_config(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    let runtime = build_runtime().context("starting runtime")?;
    LocalSet::new().block_on(&runtime, run(config))
}

async fn run(config: DemoConfig) -> anyhow::Result<()> {
    let loader = AsyncLoader::new(Rc::new(config.source()), config.load_delay());
    let view_model: AnyListViewModel = ViewModel::new(ListMachine::new(loader)).into();

    let stdout = Rc::new(RefCell::new(std::io::stdout()));
    let _status = attach_status_line(&view_model, stdout);
    let _journal = attach_transition_log(&view_model);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match parse_command(&line) {
            Ok(Command::Send(event)) => view_model.receive(event),
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Quit) => break,
            Err(err) => println!("{err}"),
        }
    }

    reflux_info!("Leaving in {:?}", view_model.state());
    view_model.dispose();
    Ok(())
}
