mod api;
mod config;
mod models;
mod ui;

use config::Config;
use ui::setup::run_setup_wizard;
use ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let debug = args.contains(&"--debug".to_string()) || args.contains(&"--logging".to_string());

    if args.contains(&"--help".to_string()) || args.contains(&"-h".to_string()) {
        print_help();
        return Ok(());
    }

    if args.contains(&"--version".to_string()) || args.contains(&"-v".to_string()) {
        println!("cliptui v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if debug { "debug" } else { "warn" }),
    )
    .init();

    // Load or create config
    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("could not load config: {}", e);
        Config::default()
    });

    // Check if setup is needed
    if config.needs_setup() || args.contains(&"--setup".to_string()) {
        config = run_setup_wizard()?;
    }

    log::debug!("starting cliptui against {:?}", config.api_base_url);

    // Run app
    let mut app = App::new(config);
    app.run()?;

    Ok(())
}

fn print_help() {
    println!("cliptui v{}", env!("CARGO_PKG_VERSION"));
    println!("Fast terminal UI for TV-quote clip search with filmstrip preview and GIF export\n");
    println!("USAGE:");
    println!("    cliptui [OPTIONS]\n");
    println!("OPTIONS:");
    println!("    -h, --help       Print help information");
    println!("    -v, --version    Print version information");
    println!("    --setup          Run setup wizard");
    println!("    --debug          Enable debug logging to stderr");
    println!("    --logging        Same as --debug\n");
    println!("CONTROLS:");
    println!("    Type            Search quotes (searches after you pause typing)");
    println!("    ↑↓              Navigate results");
    println!("    Enter           Open the highlighted clip");
    println!("    Tab             Switch focus (search/results)");
    println!("    g               Export the open clip as a GIF");
    println!("    ESC             Quit application\n");
    println!("LOGGING:");
    println!("    Log lines go to stderr; redirect them when using the TUI,");
    println!("    e.g. cliptui --debug 2>cliptui.log (RUST_LOG overrides the level)\n");
    println!("FIRST RUN:");
    println!("    Run without arguments to start the setup wizard");
    println!("    You'll need a running clyper clip-search server\n");
    println!("CONFIG:");
    println!("    Config stored at: ~/.config/cliptui/config.json");
}
