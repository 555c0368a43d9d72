use clap::Parser;
use portsweep::cli::{self, Cli};
use portsweep::{logging, output};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    logging::init(args.verbose);

    let settings = match args.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            output::print_error(&e.to_string(), !args.no_color);
            return ExitCode::FAILURE;
        }
    };

    match cli::execute(&args, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e), args.use_color(&settings));
            ExitCode::FAILURE
        }
    }
}
