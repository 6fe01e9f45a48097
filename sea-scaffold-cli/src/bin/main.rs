use clap::Parser;
use dotenvy::dotenv;
use sea_scaffold_cli::{handle_error, run_generate_command, Cli, Commands};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    let verbose = cli.verbose;

    match cli.command {
        Commands::Generate(command) => {
            run_generate_command(command, verbose)
                .await
                .unwrap_or_else(handle_error);
        }
    }
}
