use serde::Deserialize;

/// Outbound hand-off for a contact submission that passed every gate.
pub trait MailRelay: Send + Sync {
    fn submit(&self, fields: &[(String, String)]) -> Result<(), String>;
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    result: String,
    #[serde(default)]
    error: Option<String>,
}

/// Posts the form, form-encoded, to a mail-relay web app (e.g. a deployed
/// Apps Script) answering `{"result": "success"}` or `{"result": ..., "error": ...}`.
/// One attempt; no retry.
pub struct WebAppRelay {
    endpoint: String,
}

impl WebAppRelay {
    pub fn new(endpoint: &str) -> Self {
        WebAppRelay {
            endpoint: endpoint.to_string(),
        }
    }
}

impl MailRelay for WebAppRelay {
    fn submit(&self, fields: &[(String, String)]) -> Result<(), String> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| format!("HTTP client error: {}", e))?;

        let resp = client
            .post(&self.endpoint)
            .form(fields)
            .send()
            .map_err(|e| format!("Failed to send message: {}", e))?;

        let body = resp
            .text()
            .map_err(|e| format!("Failed to send message: {}", e))?;

        parse_response(&body)
    }
}

pub fn parse_response(body: &str) -> Result<(), String> {
    let parsed: RelayResponse = serde_json::from_str(body)
        .map_err(|e| format!("Failed to send message: {}", e))?;
    if parsed.result == "success" {
        Ok(())
    } else {
        Err(parsed
            .error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "Unknown error occurred".to_string()))
    }
}
