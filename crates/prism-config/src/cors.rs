use std::time::Duration;

use serde::Deserialize;

/// CORS configuration
///
/// The default policy permits every origin, method and header and allows
/// credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (wildcard "*" or explicit list)
    #[serde(default)]
    pub origins: AnyOrArray,
    /// Allowed HTTP methods (wildcard "*" or explicit list)
    #[serde(default)]
    pub methods: AnyOrArray,
    /// Allowed headers (wildcard "*" or explicit list)
    #[serde(default)]
    pub headers: AnyOrArray,
    /// Headers to expose to the browser
    #[serde(default)]
    pub expose_headers: Vec<String>,
    /// Allow credentials
    #[serde(default = "default_credentials")]
    pub credentials: bool,
    /// Max age for preflight cache in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: AnyOrArray::Any,
            methods: AnyOrArray::Any,
            headers: AnyOrArray::Any,
            expose_headers: Vec::new(),
            credentials: default_credentials(),
            max_age: None,
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_credentials() -> bool {
    true
}

/// Either a wildcard "*" or explicit list of values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnyOrArray {
    /// Match any value
    #[default]
    Any,
    /// Explicit list
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for AnyOrArray {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de;

        struct AnyOrArrayVisitor;

        impl<'de> de::Visitor<'de> for AnyOrArrayVisitor {
            type Value = AnyOrArray;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("\"*\" or array of strings")
            }

            fn visit_str<E>(self, v: &str) -> Result<AnyOrArray, E>
            where
                E: de::Error,
            {
                if v == "*" {
                    Ok(AnyOrArray::Any)
                } else {
                    Ok(AnyOrArray::List(vec![v.to_string()]))
                }
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<AnyOrArray, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut values = Vec::new();
                while let Some(val) = seq.next_element::<String>()? {
                    if val == "*" {
                        return Ok(AnyOrArray::Any);
                    }
                    values.push(val);
                }
                Ok(AnyOrArray::List(values))
            }
        }

        deserializer.deserialize_any(AnyOrArrayVisitor)
    }
}

impl CorsConfig {
    /// Get max age as Duration
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        cors: CorsConfig,
    }

    fn parse(input: &str) -> CorsConfig {
        toml::from_str::<Wrapper>(input).unwrap().cors
    }

    #[test]
    fn empty_table_is_fully_permissive() {
        let cors = parse("[cors]");
        assert_eq!(cors.origins, AnyOrArray::Any);
        assert_eq!(cors.methods, AnyOrArray::Any);
        assert_eq!(cors.headers, AnyOrArray::Any);
        assert!(cors.credentials);
    }

    #[test]
    fn wildcard_inside_list_collapses_to_any() {
        let cors = parse("[cors]\norigins = [\"https://a.example\", \"*\"]");
        assert_eq!(cors.origins, AnyOrArray::Any);
    }

    #[test]
    fn explicit_origins_and_max_age() {
        let cors = parse("[cors]\norigins = [\"https://a.example\"]\ncredentials = false\nmax_age = 60");
        assert_eq!(cors.origins, AnyOrArray::List(vec!["https://a.example".to_owned()]));
        assert!(!cors.credentials);
        assert_eq!(cors.max_age_duration(), Some(Duration::from_secs(60)));
    }
}
