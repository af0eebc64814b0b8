//! Resolved configuration types shared with the scrape handler and the TLS
//! client factory.
//!
//! [`ResolvedConfig`] is an immutable snapshot. Its credential map and
//! certificate list live behind [`Arc`], so clones handed to consumers are
//! cheap and every consumer sees the same read-only storage.

use std::{
    collections::{HashMap, hash_map},
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};

/// Identifier of a remote device instance to be scraped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,)]
pub struct Target(String,);

impl Target
{
    /// Wraps the provided identifier.
    pub fn new<S: Into<String,>,>(value: S,) -> Self
    {
        Self(value.into(),)
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self,) -> &str
    {
        &self.0
    }
}

impl fmt::Display for Target
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(&self.0,)
    }
}

/// Opaque credential used when authenticating against a single [`Target`].
///
/// The [`fmt::Debug`] output is redacted so tokens never reach the logs.
#[derive(Clone, PartialEq, Eq,)]
pub struct Token(String,);

impl Token
{
    /// Wraps the provided credential.
    pub fn new<S: Into<String,>,>(value: S,) -> Self
    {
        Self(value.into(),)
    }

    /// Exposes the raw credential for building outbound requests.
    pub fn expose(&self,) -> &str
    {
        &self.0
    }
}

impl fmt::Debug for Token
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str("Token(<redacted>)",)
    }
}

impl<'de,> Deserialize<'de,> for Target
{
    fn deserialize<D,>(deserializer: D,) -> Result<Self, D::Error,>
    where
        D: Deserializer<'de,>,
    {
        deserializer.deserialize_any(ScalarText("a target name",),).map(Self,)
    }
}

impl<'de,> Deserialize<'de,> for Token
{
    fn deserialize<D,>(deserializer: D,) -> Result<Self, D::Error,>
    where
        D: Deserializer<'de,>,
    {
        deserializer.deserialize_any(ScalarText("a token string",),).map(Self,)
    }
}

/// Accepts string, integer, float and boolean scalars as their text.
///
/// Null is rejected: `~`, `null` and an empty value are all the same YAML
/// null and must not turn into a credential.
struct ScalarText(&'static str,);

impl Visitor<'_,> for ScalarText
{
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        formatter.write_str(self.0,)
    }

    fn visit_str<E,>(self, value: &str,) -> Result<Self::Value, E,>
    where
        E: serde::de::Error,
    {
        Ok(value.to_owned(),)
    }

    fn visit_string<E,>(self, value: String,) -> Result<Self::Value, E,>
    where
        E: serde::de::Error,
    {
        Ok(value,)
    }

    fn visit_i64<E,>(self, value: i64,) -> Result<Self::Value, E,>
    where
        E: serde::de::Error,
    {
        Ok(value.to_string(),)
    }

    fn visit_u64<E,>(self, value: u64,) -> Result<Self::Value, E,>
    where
        E: serde::de::Error,
    {
        Ok(value.to_string(),)
    }

    fn visit_f64<E,>(self, value: f64,) -> Result<Self::Value, E,>
    where
        E: serde::de::Error,
    {
        Ok(value.to_string(),)
    }

    fn visit_bool<E,>(self, value: bool,) -> Result<Self::Value, E,>
    where
        E: serde::de::Error,
    {
        Ok(value.to_string(),)
    }
}

/// Mapping from [`Target`] to [`Token`] loaded from the authentication file.
///
/// The YAML document must be a flat mapping of scalar keys to scalar values;
/// null keys or values are rejected. When a key appears more than once the
/// last occurrence wins. An empty or `null` document yields an empty map.
///
/// # Examples
///
/// ```
/// use fortigate_exporter_config::AuthKeys;
///
/// let yaml = "device-a: s3cr3t-token-1\ndevice-b: s3cr3t-token-2\n";
/// let keys: AuthKeys = serde_yaml::from_str(yaml,).expect("valid auth map",);
/// assert_eq!(keys.len(), 2);
/// assert_eq!(keys.token_for("device-a",).map(|t| t.expose()), Some("s3cr3t-token-1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct AuthKeys
{
    entries: HashMap<Target, Token,>,
}

impl AuthKeys
{
    /// Number of distinct targets.
    pub fn len(&self,) -> usize
    {
        self.entries.len()
    }

    /// Returns `true` when no credentials were loaded.
    pub fn is_empty(&self,) -> bool
    {
        self.entries.is_empty()
    }

    /// Looks up the token configured for `target`.
    pub fn token_for(&self, target: &str,) -> Option<&Token,>
    {
        self.entries.get(&Target::new(target,),)
    }

    /// Iterates over all target and token pairs in arbitrary order.
    pub fn iter(&self,) -> hash_map::Iter<'_, Target, Token,>
    {
        self.entries.iter()
    }
}

impl FromIterator<(Target, Token,),> for AuthKeys
{
    fn from_iter<I: IntoIterator<Item = (Target, Token,),>,>(iter: I,) -> Self
    {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'de,> Deserialize<'de,> for AuthKeys
{
    fn deserialize<D,>(deserializer: D,) -> Result<Self, D::Error,>
    where
        D: Deserializer<'de,>,
    {
        deserializer.deserialize_any(AuthKeysVisitor,)
    }
}

struct AuthKeysVisitor;

impl<'de,> Visitor<'de,> for AuthKeysVisitor
{
    type Value = AuthKeys;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        formatter.write_str("a flat mapping of target names to token strings",)
    }

    fn visit_unit<E,>(self,) -> Result<Self::Value, E,>
    where
        E: serde::de::Error,
    {
        Ok(AuthKeys::default(),)
    }

    fn visit_none<E,>(self,) -> Result<Self::Value, E,>
    where
        E: serde::de::Error,
    {
        Ok(AuthKeys::default(),)
    }

    fn visit_map<A,>(self, mut map: A,) -> Result<Self::Value, A::Error,>
    where
        A: MapAccess<'de,>,
    {
        let mut entries = HashMap::with_capacity(map.size_hint().unwrap_or(0,),);
        while let Some((target, token,),) = map.next_entry::<Target, Token>()? {
            // later duplicates overwrite earlier ones
            entries.insert(target, token,);
        }

        Ok(AuthKeys {
            entries,
        },)
    }
}

/// Extra trust anchor read from disk.
///
/// The content is kept as raw bytes; it is expected to be PEM but is neither
/// parsed nor validated here.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct LocalCert
{
    /// Location the certificate was read from, kept for diagnostics.
    pub path:    PathBuf,
    /// Raw file content.
    pub content: Vec<u8,>,
}

impl LocalCert
{
    /// Builds a certificate record from its source path and content.
    pub fn new<P: Into<PathBuf,>,>(path: P, content: Vec<u8,>,) -> Self
    {
        Self {
            path: path.into(),
            content,
        }
    }

    /// Returns the source path.
    pub fn path(&self,) -> &Path
    {
        &self.path
    }
}

/// Immutable configuration snapshot published once at startup.
///
/// The [`Default`] value is the zero configuration: empty listen address,
/// zero timeouts, no credentials and no extra certificates.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct ResolvedConfig
{
    listen:              String,
    scrape_timeout_secs: u64,
    tls_timeout_secs:    u64,
    tls_insecure:        bool,
    auth_keys:           Arc<AuthKeys,>,
    tls_extra_cas:       Arc<[LocalCert],>,
}

impl ResolvedConfig
{
    /// Assembles a snapshot from already loaded parts.
    pub fn new(
        listen: String,
        scrape_timeout_secs: u64,
        tls_timeout_secs: u64,
        tls_insecure: bool,
        auth_keys: AuthKeys,
        tls_extra_cas: Vec<LocalCert,>,
    ) -> Self
    {
        Self {
            listen,
            scrape_timeout_secs,
            tls_timeout_secs,
            tls_insecure,
            auth_keys: Arc::new(auth_keys,),
            tls_extra_cas: tls_extra_cas.into(),
        }
    }

    /// Address the exporter's server binds to.
    pub fn listen(&self,) -> &str
    {
        &self.listen
    }

    /// Scrape timeout exactly as supplied, in seconds.
    pub fn scrape_timeout_secs(&self,) -> u64
    {
        self.scrape_timeout_secs
    }

    /// TLS handshake timeout exactly as supplied, in seconds.
    pub fn tls_timeout_secs(&self,) -> u64
    {
        self.tls_timeout_secs
    }

    /// Scrape timeout as a [`Duration`].
    pub fn scrape_timeout(&self,) -> Duration
    {
        Duration::from_secs(self.scrape_timeout_secs,)
    }

    /// TLS handshake timeout as a [`Duration`].
    pub fn tls_timeout(&self,) -> Duration
    {
        Duration::from_secs(self.tls_timeout_secs,)
    }

    /// Whether certificate validation is disabled for outbound TLS.
    pub fn tls_insecure(&self,) -> bool
    {
        self.tls_insecure
    }

    /// Credentials keyed by target.
    pub fn auth_keys(&self,) -> &AuthKeys
    {
        &self.auth_keys
    }

    /// Extra trust anchors in the order they were listed.
    pub fn tls_extra_cas(&self,) -> &[LocalCert]
    {
        &self.tls_extra_cas
    }
}

#[cfg(test)]
mod tests
{
    use std::sync::Arc;

    use super::{AuthKeys, LocalCert, ResolvedConfig, Target, Token};

    #[test]
    fn parses_flat_mapping()
    {
        let yaml = "device-a: s3cr3t-token-1\ndevice-b: s3cr3t-token-2\n";
        let keys: AuthKeys = serde_yaml::from_str(yaml,).expect("expected valid map",);

        assert_eq!(keys.len(), 2);
        assert_eq!(keys.token_for("device-a").map(Token::expose), Some("s3cr3t-token-1"));
        assert_eq!(keys.token_for("device-b").map(Token::expose), Some("s3cr3t-token-2"));
        assert!(keys.token_for("device-c").is_none());
    }

    #[test]
    fn duplicate_keys_keep_last_occurrence()
    {
        let yaml = "device-a: first\ndevice-b: other\ndevice-a: second\n";
        let keys: AuthKeys = serde_yaml::from_str(yaml,).expect("expected valid map",);

        assert_eq!(keys.len(), 2);
        assert_eq!(keys.token_for("device-a").map(Token::expose), Some("second"));
    }

    #[test]
    fn null_document_yields_empty_map()
    {
        let keys: AuthKeys = serde_yaml::from_str("~",).expect("expected null to be accepted",);
        assert!(keys.is_empty());
    }

    #[test]
    fn rejects_nested_values()
    {
        let yaml = "device-a:\n  token: nested\n";
        let result = serde_yaml::from_str::<AuthKeys,>(yaml,);
        assert!(result.is_err());
    }

    #[test]
    fn null_tokens_are_rejected()
    {
        for yaml in ["fw-1: ~\n", "fw-1: null\n", "fw-1:\n"] {
            let result = serde_yaml::from_str::<AuthKeys,>(yaml,);
            assert!(result.is_err(), "expected {yaml:?} to be rejected");
        }
    }

    #[test]
    fn null_target_is_rejected()
    {
        assert!(serde_yaml::from_str::<AuthKeys,>("~: token\n",).is_err());
    }

    #[test]
    fn quoted_null_is_an_ordinary_token()
    {
        let keys: AuthKeys = serde_yaml::from_str("fw-1: \"~\"\n",).expect("expected valid map",);
        assert_eq!(keys.token_for("fw-1").map(Token::expose), Some("~"));
    }

    #[test]
    fn numeric_and_boolean_scalars_keep_their_text()
    {
        let keys: AuthKeys =
            serde_yaml::from_str("fw-1: 12345\nfw-2: true\n",).expect("expected valid map",);
        assert_eq!(keys.token_for("fw-1").map(Token::expose), Some("12345"));
        assert_eq!(keys.token_for("fw-2").map(Token::expose), Some("true"));
    }

    #[test]
    fn rejects_sequence_values()
    {
        let yaml = "device-a:\n  - one\n  - two\n";
        assert!(serde_yaml::from_str::<AuthKeys,>(yaml,).is_err());
    }

    #[test]
    fn rejects_non_mapping_document()
    {
        assert!(serde_yaml::from_str::<AuthKeys,>("- device-a\n- device-b\n",).is_err());
        assert!(serde_yaml::from_str::<AuthKeys,>("just a string",).is_err());
    }

    #[test]
    fn token_debug_is_redacted()
    {
        let token = Token::new("s3cr3t",);
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("s3cr3t"));

        let keys: AuthKeys = [(Target::new("device-a",), token,)].into_iter().collect();
        assert!(!format!("{keys:?}").contains("s3cr3t"));
    }

    #[test]
    fn default_config_is_zero_valued()
    {
        let config = ResolvedConfig::default();

        assert_eq!(config.listen(), "");
        assert_eq!(config.scrape_timeout_secs(), 0);
        assert_eq!(config.tls_timeout_secs(), 0);
        assert!(!config.tls_insecure());
        assert!(config.auth_keys().is_empty());
        assert!(config.tls_extra_cas().is_empty());
    }

    #[test]
    fn clones_share_backing_storage()
    {
        let config = ResolvedConfig::new(
            ":9710".to_owned(),
            30,
            10,
            false,
            [(Target::new("device-a",), Token::new("t",),)].into_iter().collect(),
            vec![LocalCert::new("ca.pem", b"pem".to_vec(),)],
        );
        let clone = config.clone();

        assert_eq!(config, clone);
        assert!(Arc::ptr_eq(&config.auth_keys, &clone.auth_keys));
        assert!(Arc::ptr_eq(&config.tls_extra_cas, &clone.tls_extra_cas));
        assert_eq!(clone.scrape_timeout(), std::time::Duration::from_secs(30));
        assert_eq!(clone.tls_timeout(), std::time::Duration::from_secs(10));
    }
}
