//! Wire-schema value types exchanged with the provider.

use serde::{Deserialize, Serialize};

/// The authorization result returned by the token endpoint.
///
/// Empty until an exchange (or an external load by the caller) succeeds,
/// then overwritten wholesale on each successful exchange; never partially
/// merged. This is also the persisted on-disk schema — the field names
/// round-trip exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub token_type: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until expiry, refreshed by validation.
    pub expires_in: u64,
    /// Scopes granted by the provider; may differ from the requested set.
    pub scope: Vec<String>,
}

/// Payload of the token-validation endpoint. Decoded transiently during
/// validation, not retained.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationAnswer {
    pub client_id: String,
    pub login: String,
    pub user_id: String,
    pub expires_in: u64,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Envelope of the Helix users endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersResponse {
    pub data: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Envelope of the Helix game-lookup endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamesResponse {
    pub data: Vec<Game>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_art_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_data_round_trips() {
        let token = TokenData {
            token_type: "bearer".to_string(),
            access_token: "abcdef0123456789".to_string(),
            refresh_token: "fedcba9876543210".to_string(),
            expires_in: 14124,
            scope: vec![
                "user:read:email".to_string(),
                "channel:read:polls".to_string(),
            ],
        };

        let json = serde_json::to_string(&token).unwrap();
        let parsed: TokenData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn token_data_decodes_provider_response() {
        let body = r#"{
            "access_token": "rfx2uswqe8l4g1mkagrvg5tv0ks3",
            "expires_in": 14124,
            "refresh_token": "5b93chm6hdve3mycz05zfzatkfdenfspp1h1ar2xxdalen01",
            "scope": ["channel:moderate", "chat:edit", "chat:read"],
            "token_type": "bearer"
        }"#;

        let token: TokenData = serde_json::from_str(body).unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.scope.len(), 3);
    }

    #[test]
    fn token_data_rejects_missing_fields() {
        let body = r#"{"access_token": "only-this"}"#;
        assert!(serde_json::from_str::<TokenData>(body).is_err());
    }

    #[test]
    fn validation_answer_decodes() {
        let body = r#"{
            "client_id": "wbmytr93xzw8zbg0p1izqyzzc5mbiz",
            "login": "twitchdev",
            "scopes": ["channel:read:subscriptions"],
            "user_id": "141981764",
            "expires_in": 5520838
        }"#;

        let answer: ValidationAnswer = serde_json::from_str(body).unwrap();
        assert_eq!(answer.login, "twitchdev");
        assert_eq!(answer.user_id, "141981764");
        assert_eq!(answer.expires_in, 5520838);
    }

    #[test]
    fn game_decodes_without_optional_fields() {
        let body = r#"{"data":[{"id":"743"}]}"#;
        let games: GamesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(games.data[0].id, "743");
        assert!(games.data[0].name.is_empty());
    }
}
