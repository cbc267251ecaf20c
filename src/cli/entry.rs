use std::sync::Arc;

use crate::controller::FormController;
use crate::endpoint::HttpEndpoint;
use crate::error::Result;
use crate::form::ExpenseForm;
use crate::settings::resolve_endpoint;

/// Open the interactive expense form.
pub fn run(endpoint_override: Option<&str>) -> Result<()> {
    let url = resolve_endpoint(endpoint_override);
    let desc = endpoint_host(&url);
    let mut form = ExpenseForm::new(FormController::default(), desc);
    form.run(Arc::new(HttpEndpoint::new(url)))
}

/// Short host label for the header, e.g. "script.google.com".
fn endpoint_host(url: &str) -> String {
    url.split("://")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .unwrap_or(url)
        .to_string()
}
