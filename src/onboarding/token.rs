//! The onboarding token carried by the activation link.

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

/// Query parameter that carries the token.
pub const TOKEN_PARAM: &str = "token";

/// Opaque token correlating the candidate with an offer on the backend.
///
/// Kept secret so it never shows up in logs or debug output.
pub struct OnboardingToken(SecretString);

impl OnboardingToken {
    /// Wrap a raw token as-is. Only an empty string is no token at all.
    pub fn new(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            None
        } else {
            Some(Self(SecretString::from(raw)))
        }
    }

    /// Extract the token from an activation link's query string.
    ///
    /// Returns `None` when the link is not a URL, has no `token`
    /// parameter, or the parameter is empty.
    pub fn from_activation_url(link: &str) -> Option<Self> {
        let url = Url::parse(link.trim()).ok()?;
        let (_, value) = url.query_pairs().find(|(key, _)| key == TOKEN_PARAM)?;
        Self::new(&value)
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for OnboardingToken {
    fn clone(&self) -> Self {
        Self(SecretString::from(self.expose()))
    }
}

impl std::fmt::Debug for OnboardingToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OnboardingToken([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token_from_query() {
        let token =
            OnboardingToken::from_activation_url("https://portal.example.com/?token=abc123").unwrap();
        assert_eq!(token.expose(), "abc123");
    }

    #[test]
    fn token_among_other_params_is_decoded() {
        let token = OnboardingToken::from_activation_url(
            "https://portal.example.com/onboard?ref=mail&token=a%2Bb%3D&x=1",
        )
        .unwrap();
        assert_eq!(token.expose(), "a+b=");
    }

    #[test]
    fn absent_or_empty_token_is_none() {
        assert!(OnboardingToken::from_activation_url("https://portal.example.com/").is_none());
        assert!(OnboardingToken::from_activation_url("https://portal.example.com/?token=").is_none());
        assert!(OnboardingToken::from_activation_url("https://portal.example.com/?tok=abc").is_none());
    }

    #[test]
    fn decoded_value_is_kept_verbatim() {
        let token = OnboardingToken::from_activation_url(
            "https://portal.example.com/?token=%20abc%20",
        )
        .unwrap();
        assert_eq!(token.expose(), " abc ");

        let blank = OnboardingToken::from_activation_url("https://portal.example.com/?token=%20").unwrap();
        assert_eq!(blank.expose(), " ");
    }

    #[test]
    fn non_url_is_none() {
        assert!(OnboardingToken::from_activation_url("not a link").is_none());
        assert!(OnboardingToken::from_activation_url("").is_none());
    }

    #[test]
    fn debug_is_redacted() {
        let token = OnboardingToken::new("abc123").unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains("abc123"));
        assert_eq!(token.clone().expose(), "abc123");
    }
}
