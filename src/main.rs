mod args;
mod buildinfo;
mod cli;
mod config;
mod error;
mod library_import;
mod metadata;
mod orchestrator;
mod runner;
mod tagging;
mod text;
mod utils;
mod ytdlp_download;

pub use error::*;

use cli::*;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::parse_args(std::env::args_os().skip(1)) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    let config = match cli.into_invocation() {
        Ok(Invocation::Version) => {
            println!("{}", buildinfo::string());
            return;
        }
        Ok(Invocation::Run(config)) => config,
        Err(e) => fail(e),
    };

    log::debug!("running with {:?}", config);
    if let Err(e) = orchestrator::run(&config, std::io::stdout()).await {
        fail(e);
    }
}

fn fail(e: Error) -> ! {
    eprintln!("Error: {}", e);
    if e.is_validation() {
        eprintln!("\n{}", Cli::usage());
    }
    std::process::exit(e.exit_code());
}
