//! Dashboard session login: fetch the login page, lift the CSRF token out
//! of the markup, post the credential form over the same cookie-carrying
//! client.

use std::fmt;

use reqwest::StatusCode;
use reqwest::blocking::Client;

/// Pattern for the hidden `_csrf` input on the login page.
const CSRF_TOKEN_PATTERN: &str = r#"name="_csrf"\s+[^>]*value="([^"]+)""#;

/// Login POST statuses that mean the session is authenticated. The client
/// never follows redirects, so the post-login redirect arrives raw as 301.
const ACCEPTED_LOGIN_STATUSES: [StatusCode; 2] =
    [StatusCode::OK, StatusCode::MOVED_PERMANENTLY];

pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Manual Debug impl to redact the password secret
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
pub enum AuthError {
    /// A login request failed at the transport level.
    PageRequest { source: reqwest::Error },
    /// The login page answered with a non-success status.
    PageUnreachable { status: StatusCode },
    /// No `_csrf` hidden input in the login page markup.
    TokenNotFound,
    /// The credential POST came back outside the accepted status set.
    RejectedCredentials { status: StatusCode },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageRequest { source } => write!(f, "login request failed: {source}"),
            Self::PageUnreachable { status } => {
                write!(f, "login page returned HTTP {status}")
            }
            Self::TokenNotFound => write!(f, "CSRF token not found on the login page"),
            Self::RejectedCredentials { status } => {
                write!(f, "login rejected with HTTP {status}")
            }
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PageRequest { source } => Some(source),
            _ => None,
        }
    }
}

/// Extract the `_csrf` hidden-input value from login-page markup.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let re = regex::Regex::new(CSRF_TOKEN_PATTERN).ok()?;
    let captures = re.captures(html)?;
    Some(captures.get(1)?.as_str().to_string())
}

/// Run the login handshake and return the raw credential-POST status.
///
/// The page fetch seeds the cookie jar with the pre-auth session cookie;
/// the form POST then carries both that cookie and the extracted token.
/// A rejected credential POST is not an error here — callers judge the
/// returned status with [`login_accepted`].
///
/// # Errors
///
/// Returns an error when either request fails at the transport level, the
/// page answers with a non-success status, or the markup carries no token.
pub fn login(
    client: &Client,
    base_url: &str,
    login_path: &str,
    credentials: &Credentials,
) -> Result<StatusCode, AuthError> {
    let url = format!("{base_url}{login_path}");

    let page = client
        .get(&url)
        .send()
        .map_err(|source| AuthError::PageRequest { source })?;
    let page_status = page.status();
    if !page_status.is_success() {
        return Err(AuthError::PageUnreachable { status: page_status });
    }

    let html = page
        .text()
        .map_err(|source| AuthError::PageRequest { source })?;
    let token = extract_csrf_token(&html).ok_or(AuthError::TokenNotFound)?;
    tracing::debug!("csrf token extracted, posting credentials to {url}");

    let form = [
        ("email", credentials.email.as_str()),
        ("password", credentials.password.as_str()),
        ("remember", "on"),
        ("_csrf", token.as_str()),
    ];
    let resp = client
        .post(&url)
        .form(&form)
        .send()
        .map_err(|source| AuthError::PageRequest { source })?;
    Ok(resp.status())
}

/// Whether a login POST status counts as an authenticated session.
pub fn login_accepted(status: StatusCode) -> bool {
    ACCEPTED_LOGIN_STATUSES.contains(&status)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_from_hidden_input() {
        let html = r#"<form><input type="hidden" name="_csrf" value="abc123"/></form>"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("abc123"));
    }

    #[test]
    fn extracts_token_with_attributes_between_name_and_value() {
        let html = r#"<input name="_csrf" id="csrf" class="c" value="tok-9f8e"/>"#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("tok-9f8e"));
    }

    #[test]
    fn first_token_wins_when_repeated() {
        let html = r#"
            <input name="_csrf" value="first"/>
            <input name="_csrf" value="second"/>
        "#;
        assert_eq!(extract_csrf_token(html).as_deref(), Some("first"));
    }

    #[test]
    fn missing_token_yields_none() {
        assert_eq!(extract_csrf_token("<html><body>login</body></html>"), None);
    }

    #[test]
    fn value_before_name_is_not_matched() {
        // The dashboard always renders name first; the pattern is anchored
        // to that order.
        let html = r#"<input value="tok" name="_csrf"/>"#;
        assert_eq!(extract_csrf_token(html), None);
    }

    #[test]
    fn empty_token_value_yields_none() {
        let html = r#"<input name="_csrf" value=""/>"#;
        assert_eq!(extract_csrf_token(html), None);
    }

    #[test]
    fn accepted_statuses_are_ok_and_moved_permanently() {
        assert!(login_accepted(StatusCode::OK));
        assert!(login_accepted(StatusCode::MOVED_PERMANENTLY));
        assert!(!login_accepted(StatusCode::FOUND));
        assert!(!login_accepted(StatusCode::FORBIDDEN));
        assert!(!login_accepted(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials {
            email: "ops@example.com".to_string(),
            password: "super-secret".to_string(),
        };
        let debug = format!("{creds:?}");
        assert!(debug.contains("ops@example.com"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("super-secret"));
    }
}
