use clap::Parser;
use gitline::{LOG_FILE_NAME, Res, cli::Args, error::Error};
use log::LevelFilter;

pub fn main() -> Res<()> {
    let args = Args::parse();

    if args.version {
        let git_version = git_version::git_version!(
            args = ["--tags", "--always", "--dirty=-modified"],
            fallback = "unknown"
        );

        println!("gitline {} ({})", env!("CARGO_PKG_VERSION"), git_version);
        return Ok(());
    }

    if args.log {
        simple_logging::log_to_file(LOG_FILE_NAME, LevelFilter::Debug)
            .map_err(Error::OpenLogFile)?;
    }

    let config = gitline::load_config(&args)?;

    match gitline::run(&args, &config) {
        Ok(line) if line.is_empty() => (),
        Ok(line) => println!("{}", line),
        Err(e) => log::error!("{}", e),
    }

    Ok(())
}
