use super::{ConfigError, Settings};
use std::collections::BTreeMap;

pub const BASE_URL_TOKEN: &str = "{{BASE-URL}}";
const ID_TOKEN_OPEN: &str = "{{ID-";
const TOKEN_CLOSE: &str = "}}";

/// Expands the placeholder forms allowed in tool URLs, function paths and
/// panel file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRewriter {
    base_url: String,
    port_paths: BTreeMap<u16, String>,
    session: BTreeMap<String, String>,
}

impl UrlRewriter {
    pub fn new(
        base_url: impl Into<String>,
        port_paths: BTreeMap<u16, String>,
        session: BTreeMap<String, String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            port_paths,
            session,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.base_url.trim(),
            settings.effective_port_paths(),
            settings.session.clone(),
        )
    }

    /// Rewrites both `{{BASE-URL}}[:port][/tail]` and `{{ID-<key>}}` forms.
    pub fn rewrite(&self, raw: &str) -> Result<String, ConfigError> {
        let expanded = self.interpolate_ids(raw)?;
        self.expand_base_url(&expanded)
    }

    /// Replaces every `{{ID-<key>}}` token with the session value for `key`,
    /// trailing slashes stripped.
    pub fn interpolate_ids(&self, raw: &str) -> Result<String, ConfigError> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(start) = rest.find(ID_TOKEN_OPEN) {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + ID_TOKEN_OPEN.len()..];
            let Some(end) = after_open.find(TOKEN_CLOSE) else {
                return Err(ConfigError::UnknownPlaceholder {
                    placeholder: rest[start..].to_string(),
                    raw: raw.to_string(),
                });
            };
            let key = &after_open[..end];
            let value =
                self.session
                    .get(key)
                    .ok_or_else(|| ConfigError::UnknownPlaceholder {
                        placeholder: format!("{ID_TOKEN_OPEN}{key}{TOKEN_CLOSE}"),
                        raw: raw.to_string(),
                    })?;
            out.push_str(value.trim_end_matches('/'));
            rest = &after_open[end + TOKEN_CLOSE.len()..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn expand_base_url(&self, raw: &str) -> Result<String, ConfigError> {
        let Some(start) = raw.find(BASE_URL_TOKEN) else {
            return Ok(raw.to_string());
        };
        let head = &raw[..start];
        let after = &raw[start + BASE_URL_TOKEN.len()..];

        let (port_path, tail) = match after.strip_prefix(':') {
            Some(port_and_tail) => {
                let digits = port_and_tail
                    .chars()
                    .take_while(|ch| ch.is_ascii_digit())
                    .count();
                let port = port_and_tail[..digits].parse::<u16>().map_err(|_| {
                    ConfigError::UnknownPlaceholder {
                        placeholder: format!("{BASE_URL_TOKEN}:{}", &port_and_tail[..digits]),
                        raw: raw.to_string(),
                    }
                })?;
                let path =
                    self.port_paths
                        .get(&port)
                        .ok_or_else(|| ConfigError::UnknownPlaceholder {
                            placeholder: format!("{BASE_URL_TOKEN}:{port}"),
                            raw: raw.to_string(),
                        })?;
                (path.trim_end_matches('/'), &port_and_tail[digits..])
            }
            None => ("", after),
        };

        Ok(format!(
            "{head}{}{port_path}{tail}",
            self.base_url.trim_end_matches('/')
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_port_paths;

    fn rewriter() -> UrlRewriter {
        UrlRewriter::new(
            "https://play.example.org/",
            default_port_paths(),
            BTreeMap::from([
                ("tools".to_string(), "https://raw.example.org/tools/".to_string()),
                ("activity".to_string(), "lab-1".to_string()),
            ]),
        )
    }

    #[test]
    fn base_url_with_port_uses_port_table() {
        let url = rewriter()
            .rewrite("{{BASE-URL}}:8070/epsilon_tool.json")
            .expect("rewrite");
        assert_eq!(
            url,
            "https://play.example.org/tools/epsilon/services/epsilon_tool.json"
        );
    }

    #[test]
    fn base_url_with_root_port_collapses_slash() {
        let url = rewriter().rewrite("{{BASE-URL}}:8080/run").expect("rewrite");
        assert_eq!(url, "https://play.example.org/run");
    }

    #[test]
    fn base_url_without_port_appends_tail() {
        let url = rewriter().rewrite("{{BASE-URL}}/static/x.json").expect("rewrite");
        assert_eq!(url, "https://play.example.org/static/x.json");
    }

    #[test]
    fn id_placeholder_strips_trailing_slash() {
        let url = rewriter()
            .rewrite("{{ID-tools}}/xtext_tool.json")
            .expect("rewrite");
        assert_eq!(url, "https://raw.example.org/tools/xtext_tool.json");
    }

    #[test]
    fn unknown_port_is_reported() {
        let err = rewriter()
            .rewrite("{{BASE-URL}}:1234/x")
            .expect_err("unknown port");
        assert!(err.to_string().contains("{{BASE-URL}}:1234"));
    }

    #[test]
    fn unknown_session_key_is_reported() {
        let err = rewriter()
            .interpolate_ids("{{ID-missing}}/a")
            .expect_err("unknown key");
        assert!(err.to_string().contains("{{ID-missing}}"));
    }

    #[test]
    fn plain_urls_pass_through() {
        let url = rewriter()
            .rewrite("https://cdn.example.org/tool.json")
            .expect("rewrite");
        assert_eq!(url, "https://cdn.example.org/tool.json");
    }
}
