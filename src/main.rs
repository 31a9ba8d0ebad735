use clap::Parser;
use std::error::Error;
use storefront::auth::{self, AuthError, LoginForm, RegisterForm};
use storefront::product::ProductPage;
use storefront::render;
use storefront::{ProductId, Route, Storefront, StorefrontConfig};
use tokio::io::{AsyncBufReadExt, BufReader};

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let storefront = match build_storefront(&args) {
        Ok(storefront) => storefront,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    ::log::info!("Using API at {}", storefront.config().api_base_url);

    if let Err(e) = run(&storefront, args.command).await {
        ::log::error!("Command failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Config file, then environment, then command-line flags
fn build_storefront(args: &Args) -> Result<Storefront, Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => {
            ::log::debug!("Loading configuration from {}", path.display());
            StorefrontConfig::from_file(path)?
        }
        None => StorefrontConfig::default(),
    }
    .with_env_overrides();

    let mut storefront = Storefront::new(&config.api_base_url).with_config(config);
    if let Some(api_url) = &args.api_url {
        storefront = storefront.with_api_base_url(api_url);
    }
    if let Some(debounce_ms) = args.debounce_ms {
        storefront = storefront.with_debounce_ms(debounce_ms);
    }
    if let Some(session_file) = &args.session_file {
        storefront = storefront.with_session_file(session_file.clone());
    }
    storefront.config().validate()?;
    Ok(storefront)
}

async fn run(storefront: &Storefront, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Search => interactive_search(storefront).await,
        Command::Find { text } => find(storefront, &text).await,
        Command::Product { id } => show_product(storefront, ProductId::Text(id)).await,
        Command::Login { username, password } => {
            login(storefront, LoginForm { username, password }).await
        }
        Command::Register {
            username,
            email,
            password,
            accept_terms,
        } => {
            let form = RegisterForm {
                username,
                email,
                confirm_password: password.clone(),
                password,
                accept_terms,
            };
            register(storefront, form).await
        }
        Command::Logout => {
            storefront.session().logout()?;
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            match storefront.session().username()? {
                Some(username) => println!("Logged in as {}", username),
                None => println!("Not logged in"),
            }
            Ok(())
        }
        Command::Open { target } => open(storefront, &target).await,
    }
}

async fn open(storefront: &Storefront, target: &str) -> Result<(), Box<dyn Error>> {
    let route = Route::parse(target);
    ::log::debug!("Opening {}", route.path());
    match route {
        Route::Search => interactive_search(storefront).await,
        Route::Product(id) => show_product(storefront, id).await,
        Route::Login => {
            println!("Log in with: storefront login <username> --password <password>");
            Ok(())
        }
        Route::Register => {
            println!(
                "Register with: storefront register <username> <email> --password <password> --accept-terms"
            );
            Ok(())
        }
    }
}

/// Reads query changes from stdin and prints the result area as it changes
async fn interactive_search(storefront: &Storefront) -> Result<(), Box<dyn Error>> {
    let handle = storefront.search()?;

    let mut updates = handle.subscribe();
    let printer = tokio::spawn(async move {
        let mut last_printed = String::new();
        while updates.changed().await.is_ok() {
            let text = render::render_search(&updates.borrow_and_update());
            if text != last_printed {
                println!("{}\n", text);
                last_printed = text;
            }
        }
    });

    println!("Type to search products, one query per line (Ctrl-D to finish)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        handle.set_query(line);
    }

    // Let the last cycle finish before closing the view
    handle.settled().await;
    handle.shutdown();
    let _ = printer.await;
    Ok(())
}

async fn find(storefront: &Storefront, text: &str) -> Result<(), Box<dyn Error>> {
    let handle = storefront.search()?;
    handle.set_query(text);
    let snapshot = handle.settled().await;
    handle.shutdown();

    println!("{}", render::render_search(&snapshot));
    Ok(())
}

async fn show_product(storefront: &Storefront, id: ProductId) -> Result<(), Box<dyn Error>> {
    let api = storefront.api()?;
    let page = ProductPage::load(&api, &id).await;
    println!("{}", render::render_product_page(&page));
    Ok(())
}

async fn login(storefront: &Storefront, form: LoginForm) -> Result<(), Box<dyn Error>> {
    let api = storefront.api()?;
    let session = storefront.session();
    match auth::login(&api, &session, &form).await {
        Ok(username) => println!("Logged in as {}", username),
        Err(AuthError::Rejected(failure)) => println!("{}", failure.login_message()),
        Err(AuthError::Validation(errors)) => print_form_errors(&errors),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn register(storefront: &Storefront, form: RegisterForm) -> Result<(), Box<dyn Error>> {
    let api = storefront.api()?;
    match auth::register(&api, &form).await {
        Ok(email) => println!("Registration complete. Log in to continue ({})", email),
        Err(AuthError::Rejected(failure)) => println!("{}", failure.register_message()),
        Err(AuthError::Validation(errors)) => print_form_errors(&errors),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn print_form_errors(errors: &auth::FormErrors) {
    for (field, message) in errors.iter() {
        println!("  {}: {}", field, message);
    }
}
