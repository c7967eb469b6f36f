//! Navigation interception policy
//!
//! The shell hosts a single operator-controlled origin. Without an allow-list
//! every request is delegated to the embedded engine, cross-origin included.
//! With one, only the target origin and the listed origins stay in the shell.

use serde::Serialize;
use url::{Origin, Url};

use crate::error::NavigationError;
use crate::Result;

/// Schemes the engine uses internally; these are never intercepted.
const INTERNAL_SCHEMES: &[&str] = &["about", "data", "blob", "tauri"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationDecision {
    /// Let the embedded surface load the URL itself
    Delegate,
    /// Keep the URL out of the surface; the host decides what to do with it
    Intercept,
}

impl NavigationDecision {
    /// `shouldOverrideUrlLoading` semantics: true means "intercepted"
    pub fn intercepts(&self) -> bool {
        matches!(self, NavigationDecision::Intercept)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavigationPolicy {
    allowed: Option<Vec<Origin>>,
}

impl NavigationPolicy {
    /// Delegate every navigation to the engine.
    pub fn allow_all() -> Self {
        Self { allowed: None }
    }

    /// Restrict the surface to `target`'s origin plus `origins`.
    ///
    /// An empty `origins` list keeps the delegate-everything behavior.
    pub fn with_allowed_origins(target: &Url, origins: &[String]) -> Result<Self> {
        if origins.is_empty() {
            return Ok(Self::allow_all());
        }

        let mut allowed = vec![target.origin()];
        for raw in origins {
            let origin = parse_origin(raw)?;
            if !allowed.contains(&origin) {
                allowed.push(origin);
            }
        }

        tracing::debug!(count = allowed.len(), "Navigation allow-list configured");

        Ok(Self {
            allowed: Some(allowed),
        })
    }

    pub fn is_restricted(&self) -> bool {
        self.allowed.is_some()
    }

    pub fn decide(&self, url: &Url) -> NavigationDecision {
        let Some(allowed) = &self.allowed else {
            return NavigationDecision::Delegate;
        };

        if INTERNAL_SCHEMES.contains(&url.scheme()) {
            return NavigationDecision::Delegate;
        }

        if allowed.contains(&url.origin()) {
            NavigationDecision::Delegate
        } else {
            NavigationDecision::Intercept
        }
    }

    /// Same as [`decide`](Self::decide) for an unparsed URL string.
    pub fn decide_str(&self, url: &str) -> Result<NavigationDecision> {
        let parsed = Url::parse(url.trim()).map_err(|_| NavigationError::InvalidUrl(url.to_string()))?;
        Ok(self.decide(&parsed))
    }
}

fn parse_origin(raw: &str) -> Result<Origin> {
    let parsed =
        Url::parse(raw.trim()).map_err(|_| NavigationError::InvalidOrigin(raw.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(NavigationError::InvalidOrigin(raw.to_string()));
    }

    Ok(parsed.origin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_allow_all_never_intercepts() {
        let policy = NavigationPolicy::allow_all();
        for target in [
            "https://example.com/app",
            "https://other.example.org/",
            "http://insecure.test/path?q=1",
            "mailto:someone@example.com",
            "about:blank",
        ] {
            assert!(!policy.decide(&url(target)).intercepts(), "{target}");
        }
        assert!(!policy.is_restricted());
    }

    #[test]
    fn test_empty_allow_list_delegates_everything() {
        let policy =
            NavigationPolicy::with_allowed_origins(&url("https://example.com/app"), &[]).unwrap();
        assert!(!policy.is_restricted());
        assert_eq!(
            policy.decide(&url("https://elsewhere.test/")),
            NavigationDecision::Delegate
        );
    }

    #[test]
    fn test_allow_list_intercepts_foreign_origins() {
        let policy = NavigationPolicy::with_allowed_origins(
            &url("https://example.com/app"),
            &["https://cdn.example.com".to_string()],
        )
        .unwrap();

        assert_eq!(
            policy.decide(&url("https://example.com/app/page2")),
            NavigationDecision::Delegate
        );
        assert_eq!(
            policy.decide(&url("https://cdn.example.com/login")),
            NavigationDecision::Delegate
        );
        assert_eq!(
            policy.decide(&url("https://tracker.test/")),
            NavigationDecision::Intercept
        );
        // Different scheme is a different origin
        assert_eq!(
            policy.decide(&url("http://example.com/app")),
            NavigationDecision::Intercept
        );
        assert_eq!(policy.decide(&url("about:blank")), NavigationDecision::Delegate);
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let target = url("https://example.com/");
        assert!(
            NavigationPolicy::with_allowed_origins(&target, &["not a url".to_string()]).is_err()
        );
        assert!(
            NavigationPolicy::with_allowed_origins(&target, &["file:///etc".to_string()]).is_err()
        );
    }

    #[test]
    fn test_decide_str_rejects_garbage() {
        let policy = NavigationPolicy::allow_all();
        assert!(policy.decide_str("::nope::").is_err());
        assert_eq!(
            policy.decide_str("  https://example.com  ").unwrap(),
            NavigationDecision::Delegate
        );
    }
}
