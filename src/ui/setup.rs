use std::io::{self, Write};

use crate::api::ClipClient;
use crate::config::{Config, DEFAULT_API_BASE_URL};

pub fn run_setup_wizard() -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::load().unwrap_or_default();

    println!("═══════════════════════════════════════════════════════════");
    println!("            cliptui First-Time Setup");
    println!("═══════════════════════════════════════════════════════════\n");

    println!("Backend address");
    println!("cliptui talks to a clyper clip-search server over HTTP.");
    println!("If you run one locally with the default port, just press Enter.");

    loop {
        print!("\nBackend URL [{}]: ", DEFAULT_API_BASE_URL);
        io::stdout().flush()?;

        let mut url = String::new();
        io::stdin().read_line(&mut url)?;
        let url = url.trim();
        let url = if url.is_empty() { DEFAULT_API_BASE_URL } else { url };

        if !url.starts_with("http://") && !url.starts_with("https://") {
            println!("✗ The URL must start with http:// or https://. Please try again.");
            continue;
        }

        let client = ClipClient::new(url);
        match client.ping() {
            Ok(()) => {
                config.api_base_url = Some(client.base_url().to_string());
                println!("✓ Server reachable at {}\n", client.base_url());
                break;
            }
            Err(e) => {
                println!("✗ Could not reach the server: {}", e);
                println!("  Check the address (and that the server is running), then try again.");
                print!("  Save it anyway? [y/N]: ");
                io::stdout().flush()?;

                let mut answer = String::new();
                io::stdin().read_line(&mut answer)?;
                if answer.trim().eq_ignore_ascii_case("y") {
                    config.api_base_url = Some(client.base_url().to_string());
                    println!("✓ Saved unverified\n");
                    break;
                }
            }
        }
    }

    config.save()?;
    println!("✓ Setup complete! Config saved to:");
    if let Ok(path) = Config::config_path() {
        println!("  {}", path.display());
    }
    println!("\nStarting cliptui...\n");

    Ok(config)
}
