//! The `atelier` binary.

use atelier_cli::{AtelierCli, CliArgs};
use clap::Parser;

#[tokio::main]
async fn main() -> atelier_core::Result<()> {
    let args = CliArgs::parse();
    AtelierCli::init_logging(args.verbose, args.quiet);
    let cli = AtelierCli::from_args("atelier", &args)?;
    cli.run(args).await
}
