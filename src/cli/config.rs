use crate::endpoint::DEFAULT_ENDPOINT_URL;
use crate::error::Result;
use crate::settings::{load_settings, save_settings, validate_endpoint_url};

pub fn run(set_endpoint: Option<String>, reset: bool) -> Result<()> {
    let mut settings = load_settings();

    if reset {
        settings.endpoint_url = DEFAULT_ENDPOINT_URL.to_string();
        save_settings(&settings)?;
        println!("Endpoint reset to the built-in script URL.");
    } else if let Some(url) = set_endpoint {
        validate_endpoint_url(&url)?;
        settings.endpoint_url = url.trim().to_string();
        save_settings(&settings)?;
        println!("Endpoint set to {}", settings.endpoint_url);
    } else {
        println!("Endpoint: {}", settings.endpoint_url);
    }
    Ok(())
}
