mod cli;
mod core;
mod extract;
mod http;
mod oracle;
mod reporting;

use crate::cli::args::Cli;
use crate::core::context::Context;
use crate::core::engine::Engine;
use clap::Parser;
use tracing::Level;

const BANNER: &str = r#"
 ╔════════════════════════════════════════════════════════════════════╗
 ║                                                                    ║
 ║    ████████╗ █████╗ ██╗     ██╗  ██╗   ██╗                         ║
 ║    ╚══██╔══╝██╔══██╗██║     ██║  ╚██╗ ██╔╝                         ║
 ║       ██║   ███████║██║     ██║   ╚████╔╝                          ║
 ║       ██║   ██╔══██║██║     ██║    ╚██╔╝                           ║
 ║       ██║   ██║  ██║███████╗███████╗██║                            ║
 ║       ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝                            ║
 ║                                                                    ║
 ║    Blind extraction through count-returning filter injection       ║
 ║                                                                    ║
 ║    Version : 0.1.0                                                 ║
 ║    License : Apache-2.0                                            ║
 ║                                                                    ║
 ╚════════════════════════════════════════════════════════════════════╝
"#;

fn print_banner() {
    println!("\x1b[36m{}\x1b[0m", BANNER); // Cyan color
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.no_banner && !cli.quiet {
        print_banner();
    }

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let ctx = Context::from_cli(cli)?;
    let engine = Engine::new(ctx)?;
    engine.run().await?;

    Ok(())
}
