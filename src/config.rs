/// Default local listen port for the OAuth redirect.
pub const DEFAULT_CALLBACK_PORT: u16 = 3003;

/// Description of the OAuth client application.
///
/// Set once before starting a flow; the library never mutates it. The
/// redirect URI registered with the provider must match
/// `http://localhost:<port><callback_path>` exactly, port included.
#[derive(Debug, Clone)]
pub struct Config {
    /// Application client id issued by the provider.
    pub client_id: String,
    /// Application client secret, required for the code-for-token exchange.
    pub secret: String,
    /// Path the provider redirects to on the local listener, e.g. `/auth`.
    pub callback_path: String,
    /// Local listen port for the redirect.
    pub port: u16,
    /// Requested scopes, in order.
    pub scopes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            secret: String::new(),
            callback_path: String::new(),
            port: DEFAULT_CALLBACK_PORT,
            scopes: Vec::new(),
        }
    }
}
