use abap_assistant_core::{execute_assistant_flow, style, CoreCliArgs};
use clap::Parser;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli_args = CoreCliArgs::parse();

    // logging goes to stderr so --json output stays clean
    let level = if cli_args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    if let Err(e) = execute_assistant_flow(cli_args) {
        eprintln!(
            "{} {} {}",
            style("❌"),
            style("abap-assistant failed:").red().bold(),
            style(format!("{e:#}")).red()
        );
        std::process::exit(1);
    }
}
