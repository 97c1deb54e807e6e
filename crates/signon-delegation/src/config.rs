//! Delegation configuration.

use url::Url;

/// Configuration for the external identity-verification handoff.
#[derive(Debug, Clone)]
pub struct DelegationConfig {
    /// This service's client id at the external provider. Doubles as the
    /// `iss` of outbound request objects.
    pub client_id: String,
    /// The external provider's audience value for outbound tokens.
    pub audience: String,
    /// The external provider's authorize endpoint.
    pub authorize_uri: Url,
}

impl DelegationConfig {
    /// Creates a configuration for the given provider.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        audience: impl Into<String>,
        authorize_uri: Url,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            audience: audience.into(),
            authorize_uri,
        }
    }

    /// Builds the authorize redirect carrying an encrypted request object.
    #[must_use]
    pub fn authorization_url(&self, request_object: &str) -> Url {
        let mut url = self.authorize_uri.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("request", request_object);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_url_carries_request_object() {
        let config = DelegationConfig::new(
            "signon-client",
            "https://identity.example/audience",
            Url::parse("https://identity.example/authorize").unwrap(),
        );

        let url = config.authorization_url("eyJhbGciOiJSU0EtT0FFUC0yNTYifQ.a.b.c.d");
        assert_eq!(url.host_str(), Some("identity.example"));
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("client_id".to_string(), "signon-client".to_string())));
        assert!(query.contains(&("response_type".to_string(), "code".to_string())));
        assert!(query.iter().any(|(k, _)| k == "request"));
    }
}
