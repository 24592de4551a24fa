//! The authorization/token state machine.

use rand::{rngs::StdRng, RngCore, SeedableRng};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::{
    callback::{CallbackRequest, CallbackServer},
    config::Config,
    encode,
    error::{Error, Result},
    provider::Provider,
    schema::{GamesResponse, TokenData, UsersResponse, ValidationAnswer},
};

/// Progress of one authorization session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No flow has run yet.
    NotStarted,
    /// Interactive flow in progress; browser/user action pending.
    Authorizing,
    /// Terminal failure. Re-run [`AuthProcess::generate_new_token`] to retry.
    CompletedError,
    /// Terminal success; the token is authoritative.
    CompletedOk,
}

/// OAuth2 authorization-code session against the provider.
///
/// [`AuthProcess::start`] first tries to validate the currently held token
/// (set via [`AuthProcess::set_token`] from the caller's storage); only when
/// that fails does it run the interactive browser flow: bind the localhost
/// listener, surface the authorize URL, await the single redirect, verify
/// the CSRF state, and exchange the code for a token. Once authorized, the
/// session issues authenticated Helix calls.
///
/// The token held here is only authoritative while
/// [`AuthProcess::auth_state`] is [`AuthState::CompletedOk`].
pub struct AuthProcess {
    config: Config,
    provider: Provider,
    http: reqwest::Client,
    rng: StdRng,
    on_authorize_url: Option<Box<dyn Fn(&Url) + Send + Sync>>,

    auth_state: AuthState,
    token: TokenData,

    // Transient per-attempt authorization state.
    state: String,
    scopes_str: String,
    redirect_uri: String,
    recv_state: String,
    recv_scope: String,
    recv_code: String,
    full_answer: String,
}

impl AuthProcess {
    /// New session against the production Twitch endpoints.
    pub fn new(config: Config) -> Self {
        Self::with_provider(config, Provider::twitch())
    }

    /// New session against an explicit endpoint set.
    pub fn with_provider(config: Config, provider: Provider) -> Self {
        Self {
            config,
            provider,
            http: reqwest::Client::new(),
            rng: StdRng::from_entropy(),
            on_authorize_url: None,
            auth_state: AuthState::NotStarted,
            token: TokenData::default(),
            state: String::new(),
            scopes_str: String::new(),
            redirect_uri: String::new(),
            recv_state: String::new(),
            recv_scope: String::new(),
            recv_code: String::new(),
            full_answer: String::new(),
        }
    }

    /// Replace the random source used for CSRF state generation. Seeded
    /// generators make the flow deterministic in tests.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Register a hook invoked with the authorize URL once the callback
    /// listener is up. This is how callers open a browser; the library
    /// itself only logs the URL.
    pub fn on_authorize_url<F>(&mut self, hook: F)
    where
        F: Fn(&Url) + Send + Sync + 'static,
    {
        self.on_authorize_url = Some(Box::new(hook));
    }

    pub fn auth_state(&self) -> AuthState {
        self.auth_state
    }

    pub fn token(&self) -> &TokenData {
        &self.token
    }

    /// Install a previously persisted token, e.g. loaded from disk.
    pub fn set_token(&mut self, token: TokenData) {
        self.token = token;
    }

    /// Raw body of the last token-endpoint response, kept for diagnostics.
    pub fn last_answer(&self) -> &str {
        &self.full_answer
    }

    /// Obtain a usable access token: validate the held token, or fall back
    /// to the interactive authorization flow.
    pub async fn start(&mut self) -> Result<()> {
        match self.validate().await {
            Ok(()) => Ok(()),
            Err(e) => {
                debug!(error = %e, "held token is not usable, starting interactive authorization");
                self.generate_new_token().await
            }
        }
    }

    /// Check the held token against the provider's validation endpoint.
    ///
    /// Succeeds only if the token decodes as a validation answer whose
    /// `client_id` matches this application; a token issued to some other
    /// client is rejected even though the HTTP call succeeded.
    pub async fn validate(&mut self) -> Result<()> {
        let value = self.auth_get(&self.provider.validate_url).await?;
        let answer: ValidationAnswer = serde_json::from_value(value)?;

        if answer.client_id != self.config.client_id {
            warn!(token_client_id = %answer.client_id, "held token belongs to a different client");
            return Err(Error::ClientIdMismatch {
                expected: self.config.client_id.clone(),
                received: answer.client_id,
            });
        }

        debug!(login = %answer.login, user_id = %answer.user_id, "token validated");
        self.token.expires_in = answer.expires_in;
        self.auth_state = AuthState::CompletedOk;
        Ok(())
    }

    /// Run the interactive authorization flow: bind the callback listener,
    /// surface the authorize URL, await the provider redirect, then exchange
    /// the authorization code for a token.
    pub async fn generate_new_token(&mut self) -> Result<()> {
        if self.config.client_id.is_empty() {
            return Err(Error::InvalidConfiguration("client_id is empty".to_string()));
        }
        if self.config.secret.is_empty() {
            return Err(Error::InvalidConfiguration("secret is empty".to_string()));
        }
        if self.config.callback_path.is_empty() {
            return Err(Error::InvalidConfiguration(
                "callback_path is empty".to_string(),
            ));
        }

        self.scopes_str = encode::scope_string(&self.config.scopes);
        self.state = random_state(&mut self.rng);
        self.redirect_uri = format!(
            "http://localhost:{}{}",
            self.config.port, self.config.callback_path
        );

        let authorize_url = encode::authorize_url(
            &self.provider.authorize_url,
            &self.config.client_id,
            &self.redirect_uri,
            &self.scopes_str,
            &self.state,
        );
        let authorize_url = Url::parse(&authorize_url)
            .map_err(|e| Error::InvalidConfiguration(format!("bad authorize URL: {e}")))?;

        let mut server = CallbackServer::bind(self.config.port).await?;

        self.auth_state = AuthState::Authorizing;
        info!(%authorize_url, "waiting for authorization, open this URL in a browser");
        if let Some(hook) = &self.on_authorize_url {
            hook(&authorize_url);
        }

        let request = match server.recv().await {
            Ok(request) => request,
            Err(e) => {
                self.auth_state = AuthState::CompletedError;
                return Err(e);
            }
        };

        // The redirect has been answered; the listener stays bound until the
        // end of this scope so the browser's connection is not cut short.
        self.handle_callback(request).await
    }

    async fn handle_callback(&mut self, request: CallbackRequest) -> Result<()> {
        if request.path != self.config.callback_path {
            warn!(path = %request.path, "redirect arrived on an unexpected path");
            self.auth_state = AuthState::CompletedError;
            return Err(Error::UnexpectedCallbackPath(request.path));
        }

        self.recv_code = request.params.get("code").cloned().unwrap_or_default();
        self.recv_scope = request.params.get("scope").cloned().unwrap_or_default();
        self.recv_state = request.params.get("state").cloned().unwrap_or_default();
        debug!(scope = %self.recv_scope, "authorization redirect received");

        self.request_token().await
    }

    /// Exchange the received authorization code for a token. The echoed
    /// `state` must match the one generated for this attempt before any
    /// request is made.
    async fn request_token(&mut self) -> Result<()> {
        if self.recv_state != self.state {
            error!(expected = %self.state, received = %self.recv_state, "callback state does not match");
            self.auth_state = AuthState::CompletedError;
            return Err(Error::StateMismatch {
                expected: self.state.clone(),
                received: self.recv_state.clone(),
            });
        }

        // redirect_uri must be byte-identical to the one in the authorize
        // URL; the provider rejects the exchange otherwise.
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.secret.as_str()),
            ("code", self.recv_code.as_str()),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let response = match self
            .http
            .post(&self.provider.token_url)
            .form(&form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.auth_state = AuthState::CompletedError;
                return Err(Error::Transport(format!("token exchange failed: {e}")));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                self.auth_state = AuthState::CompletedError;
                return Err(Error::Transport(format!(
                    "failed to read token response: {e}"
                )));
            }
        };
        self.full_answer = body.clone();

        if !status.is_success() {
            self.auth_state = AuthState::CompletedError;
            return Err(Error::AuthorizationFailed(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        match serde_json::from_str::<TokenData>(&body) {
            Ok(token) => {
                self.token = token;
                self.auth_state = AuthState::CompletedOk;
                info!("access token obtained");
                Ok(())
            }
            Err(e) => {
                self.auth_state = AuthState::CompletedError;
                Err(Error::MalformedTokenResponse(format!("{e}; body: {body}")))
            }
        }
    }

    /// Authenticated GET returning the raw JSON payload. The typed wrappers
    /// below cover the known endpoints; this is the escape hatch for
    /// anything else.
    pub async fn auth_get(&self, url: &str) -> Result<serde_json::Value> {
        if self.token.access_token.is_empty() {
            return Err(Error::MissingToken);
        }

        let response = self
            .http
            .get(url)
            .header("Client-ID", &self.config.client_id)
            .header("Accept", "application/vnd.twitchtv.v5+json")
            .header(
                "Authorization",
                format!("Bearer {}", self.token.access_token),
            )
            .send()
            .await
            .map_err(|e| Error::Transport(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response from {url}: {e}")))?;

        if !status.is_success() {
            return Err(Error::AuthorizationFailed(format!(
                "{url} returned {status}: {body}"
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch the authorized user's record from the users endpoint. An empty
    /// `data` array is not an error.
    pub async fn get_user_info(&self) -> Result<UsersResponse> {
        let value = self.auth_get(&self.provider.users_url).await?;
        let users: UsersResponse = serde_json::from_value(value)?;
        if let Some(user) = users.data.first() {
            info!(id = %user.id, login = %user.login, "fetched user info");
        }
        Ok(users)
    }

    /// Look up a game id by name. Returns the empty string when the provider
    /// knows no such game; "not found" is not a failure.
    pub async fn get_game(&self, name: &str) -> Result<String> {
        let url = format!(
            "{}?name={}",
            self.provider.games_url,
            urlencoding::encode(name)
        );
        let value = self.auth_get(&url).await?;
        let games: GamesResponse = serde_json::from_value(value)?;
        Ok(games.data.first().map(|g| g.id.clone()).unwrap_or_default())
    }
}

/// 16 random bytes as 32 lowercase hex characters, fresh per attempt.
fn random_state(rng: &mut StdRng) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
