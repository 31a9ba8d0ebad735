use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use storefront::product::ProductPage;
use storefront::{ProductId, Storefront, StorefrontConfig, render};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to client configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Product ids to load
    #[arg(required = true)]
    ids: Vec<String>,

    /// Override request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    // Load configuration from file, then the environment
    let config = StorefrontConfig::from_file(&args.config)?.with_env_overrides();

    println!("Client configuration:");
    println!("  API base URL: {}", config.api_base_url);
    println!("  Product path: {}", config.product_path);
    println!("  Request timeout: {}s", config.request_timeout_secs);
    println!("  Session file: {}", config.session_file.display());

    let mut storefront = Storefront::new(&config.api_base_url).with_config(config);

    if let Some(timeout) = args.timeout {
        println!("Overriding request timeout: {}s", timeout);
        storefront = storefront.with_request_timeout(timeout);
    }

    let api = storefront.api()?;
    let start_time = std::time::Instant::now();

    let mut loaded = 0;
    for id in args.ids {
        let page = ProductPage::load(&api, &ProductId::Text(id)).await;
        if matches!(page, ProductPage::Loaded(_)) {
            loaded += 1;
        }
        println!("{}\n", render::render_product_page(&page));
    }

    println!(
        "Loaded {} products in {:.2} seconds.",
        loaded,
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
