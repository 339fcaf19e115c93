use clap::Parser;
use query_planner::cli::{self, CliArgs};

fn main() {
    let _ = env_logger::Builder::from_default_env()
        .filter_module("query_planner", log::LevelFilter::Warn)
        .parse_default_env()
        .is_test(false)
        .try_init();

    let args = CliArgs::parse();
    let result = cli::resolve_config(&args).and_then(|cfg| {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        cli::run(&args, &cfg, &mut out)
    });

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
