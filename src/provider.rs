/// The fixed endpoint set of one provider deployment.
///
/// Production code uses [`Provider::twitch`]; tests point these at a local
/// mock server.
#[derive(Debug, Clone)]
pub struct Provider {
    pub authorize_url: String,
    pub token_url: String,
    pub validate_url: String,
    pub users_url: String,
    pub games_url: String,
}

impl Provider {
    /// The production Twitch endpoints.
    pub fn twitch() -> Self {
        Self {
            authorize_url: "https://id.twitch.tv/oauth2/authorize".to_string(),
            token_url: "https://id.twitch.tv/oauth2/token".to_string(),
            validate_url: "https://id.twitch.tv/oauth2/validate".to_string(),
            users_url: "https://api.twitch.tv/helix/users".to_string(),
            games_url: "https://api.twitch.tv/helix/games".to_string(),
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::twitch()
    }
}
