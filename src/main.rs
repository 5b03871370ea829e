use clap::Parser;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging, showing progress unless RUST_LOG says otherwise
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Invalid settings are rejected by the run before any browser is started
    let config = match args.into_run_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Note: scraping requires a WebDriver server (e.g., ChromeDriver).");
    println!("Set WEBDRIVER_URL if not using the default {}", config.webdriver_url);

    let start_time = std::time::Instant::now();
    match listing_scrape::run(&config).await {
        Ok(result) => {
            if let Some(halt) = &result.halted {
                eprintln!(
                    "Warning: stopped at page {} of {}: {}",
                    halt.page, config.max_pages, halt.error
                );
            }
            if !result.skipped_pages.is_empty() {
                eprintln!("Warning: skipped pages {:?}", result.skipped_pages);
            }
            println!(
                "Data saved to {} ({} records from {} pages in {:.2} seconds)",
                config.output_path.display(),
                result.records.len(),
                result.pages_visited,
                start_time.elapsed().as_secs_f64()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Scrape failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
