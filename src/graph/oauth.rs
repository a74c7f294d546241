//! OAuth2 client credentials flow for Microsoft Graph.

use reqwest::Client;
use serde::Deserialize;

pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    /// Lifetime of the token in seconds
    pub expires_in: Option<u64>,
}

/// Acquire an app-only access token for the tenant.
pub async fn acquire_token_for_client(
    client: &Client,
    login_url: &str,
    tenant_id: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<TokenResponse, anyhow::Error> {
    let url = format!(
        "{}/{}/oauth2/v2.0/token",
        login_url.trim_end_matches('/'),
        urlencoding::encode(tenant_id)
    );
    let params = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("scope", GRAPH_SCOPE),
        ("grant_type", "client_credentials"),
    ];
    let res = client.post(&url).form(&params).send().await?;
    let status = res.status();
    let text = res.text().await.unwrap_or_default();
    if !status.is_success() {
        anyhow::bail!("Token request failed: {} ({})", status, text);
    }
    let token: TokenResponse = serde_json::from_str(&text)?;
    Ok(token)
}
