use crate::error::Result;
use crate::models::{ExpenseRecord, ScriptResponse};

/// Google Apps Script web app the form posts to.
pub const DEFAULT_ENDPOINT_URL: &str = "https://script.google.com/macros/s/AKfycbzp78Q8A4uSd18HLZ64z_gjU1wr7YzXKUD3NNMglmkq76sqcVuAtfEG06jXVE8h0Q2SsQ/exec";

/// The remote collaborator that stores records. One call per submit, no retry.
pub trait Endpoint: Send + Sync {
    fn post(&self, record: &ExpenseRecord) -> Result<ScriptResponse>;
}

pub struct HttpEndpoint {
    http: reqwest::blocking::Client,
    url: String,
}

impl HttpEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            url: url.into(),
        }
    }
}

impl Endpoint for HttpEndpoint {
    fn post(&self, record: &ExpenseRecord) -> Result<ScriptResponse> {
        // Plain string body, no content-type: the script reads the raw post data.
        let body = serde_json::to_string(record)?;
        let res = self.http.post(&self.url).body(body).send()?;
        let text = res.text()?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        Ok(ScriptResponse::from_value(&value))
    }
}
