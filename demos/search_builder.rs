use clap::Parser;
use std::error::Error;
use std::time::Duration;
use storefront::{Storefront, render};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the product service
    #[arg(short, long)]
    url: String,

    /// Queries typed one after another, as keystrokes would arrive
    #[arg(required = true)]
    queries: Vec<String>,

    /// JSON configuration string
    #[arg(short, long)]
    config: Option<String>,

    /// Debounce interval in milliseconds
    #[arg(short, long)]
    debounce_ms: Option<u64>,

    /// Pause between queries in milliseconds
    #[arg(short, long, default_value_t = 100)]
    pause_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    println!("Searching products at: {}", args.url);

    let mut storefront = Storefront::new(&args.url);

    // Apply configuration from string if specified
    if let Some(config_str) = args.config {
        println!("Applying configuration from string");
        storefront = storefront
            .with_config_str(&config_str)?
            .with_api_base_url(&args.url);
    }

    if let Some(debounce_ms) = args.debounce_ms {
        println!("Overriding debounce: {}ms", debounce_ms);
        storefront = storefront.with_debounce_ms(debounce_ms);
    }

    let handle = storefront.search()?;
    let start_time = std::time::Instant::now();

    // Queries closer together than the debounce interval collapse into one request
    for query in &args.queries {
        println!("Typing {:?}", query);
        handle.set_query(query.as_str());
        tokio::time::sleep(Duration::from_millis(args.pause_ms)).await;
    }

    let snapshot = handle.settled().await;
    handle.shutdown();

    println!("{}", render::render_search(&snapshot));
    println!(
        "Settled on {:?} with {} results in {:.2} seconds.",
        snapshot.query,
        snapshot.results.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
