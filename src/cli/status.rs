use crate::endpoint::DEFAULT_ENDPOINT_URL;
use crate::error::Result;
use crate::settings::{load_settings, log_path, settings_path};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let path = settings_path();

    println!(
        "Settings:   {}{}",
        path.display(),
        if path.exists() { "" } else { " (not created, using defaults)" }
    );
    println!("Log file:   {}", log_path().display());
    println!(
        "Endpoint:   {}{}",
        settings.endpoint_url,
        if settings.endpoint_url == DEFAULT_ENDPOINT_URL { " (built-in)" } else { "" }
    );
    Ok(())
}
