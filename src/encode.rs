//! Query encoding helpers for provider-facing URLs.

/// Encode the requested scopes as a single authorize-URL query value:
/// each scope percent-encoded, joined with `+`. Order is preserved.
pub(crate) fn scope_string(scopes: &[String]) -> String {
    scopes
        .iter()
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}

/// Assemble the browser-facing authorize URL. `scopes_str` and `state` are
/// already URL-safe; the other values are percent-encoded here.
pub(crate) fn authorize_url(
    endpoint: &str,
    client_id: &str,
    redirect_uri: &str,
    scopes_str: &str,
    state: &str,
) -> String {
    format!(
        "{endpoint}?response_type=code&client_id={}&redirect_uri={}&scope={scopes_str}&state={state}",
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
    )
}
