/// Request timeout for the login handshake requests.
pub const LIGHT_TIMEOUT_SECS: u64 = 10;
/// Request timeout for the stats fetch, which aggregates server-side.
pub const HEAVY_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Build the blocking session client: cookie jar on so the login handshake
/// carries its session cookie forward, redirects off so the post-login 301
/// is observed raw.
///
/// # Errors
///
/// Returns an error if the client cannot be constructed (e.g., invalid TLS
/// config).
pub fn build_session_client() -> anyhow::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .timeout(std::time::Duration::from_secs(LIGHT_TIMEOUT_SECS))
        .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(concat!("errmon/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| anyhow::anyhow!("could not build HTTP client: {e}"))
}
