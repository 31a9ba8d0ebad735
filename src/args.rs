use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "Search the product catalog, view products and manage your account")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the product and auth services (overrides config and STOREFRONT_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Debounce interval in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// File holding the persisted session
    #[arg(long)]
    pub session_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive search: every line typed replaces the query
    Search,

    /// Run a single search and print the results
    Find {
        /// Search text
        text: String,
    },

    /// Show a product detail page
    Product {
        /// Product id
        id: String,
    },

    /// Log in and store the session
    Login {
        username: String,

        /// Password (falls back to STOREFRONT_PASSWORD)
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        username: String,

        email: String,

        /// Password (falls back to STOREFRONT_PASSWORD)
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,

        /// Accept the terms of service
        #[arg(long)]
        accept_terms: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Open a client route such as /product/42 or a full URL
    Open {
        /// Path or URL
        target: String,
    },
}
