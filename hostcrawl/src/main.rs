use colored::Colorize;
use hostcrawl::commands::command_argument_builder;
use hostcrawl::handlers::{handle_crawl, print_banner};

#[tokio::main]
async fn main() {
    let chosen_command = command_argument_builder().get_matches();

    // Show banner unless --quiet flag is set
    if !chosen_command.get_flag("quiet") {
        print_banner();
    }

    let outcome = match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => handle_crawl(primary_command).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
