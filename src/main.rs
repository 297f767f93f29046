use clap::Parser;

use ascii_reel::cli::{self, Args, Command};
use ascii_reel::config::Config;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> Result<(), cli::CommandError> {
    if let Command::Config { action } = args.command {
        return cli::handle_config_action(action, args.config.as_deref());
    }

    let config = Config::load(args.config.as_deref())?;
    match args.command {
        Command::Convert(convert) => cli::convert(convert, &config).map(|_| ()),
        Command::Play { export, no_loop } => cli::play(&export, no_loop),
        Command::Ramp(ramp) => cli::ramp(ramp, &config),
        Command::Config { .. } => Ok(()),
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
