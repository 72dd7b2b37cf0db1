use clap::Parser;
use runkeeper::app::{handle_fatal_error, init_logging, AppConfig};
use runkeeper::cli::{execute_command, Cli};

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let config = match AppConfig::new(verbose) {
        Ok(config) => config,
        Err(e) => handle_fatal_error(e, verbose),
    };
    init_logging(&config);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => handle_fatal_error(e.into(), verbose),
    };

    let result = runtime.block_on(execute_command(cli, &config));

    // A startup cleanup abandoned by the watchdog must not hold the process open.
    runtime.shutdown_background();

    if let Err(e) = result {
        handle_fatal_error(e, verbose);
    }
}
