use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Matches `{{ env.VAR }}` and `{{ env.VAR | default("fallback") }}`
///
/// Group 1 is the scoped key, group 2 the optional fallback.
fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in raw TOML text
///
/// A `default("...")` filter supplies the value when the variable is unset.
/// Comment lines are copied through untouched so commented-out settings
/// never require their variables.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut lines = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_owned());
        } else {
            lines.push(expand_line(line)?);
        }
    }

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_line(line: &str) -> Result<String, String> {
    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for captures in placeholder().captures_iter(line) {
        let Some(whole) = captures.get(0) else {
            continue;
        };

        expanded.push_str(&line[cursor..whole.start()]);
        expanded.push_str(&resolve(&captures)?);
        cursor = whole.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(expanded)
}

fn resolve(captures: &Captures<'_>) -> Result<String, String> {
    let key = captures.get(1).map_or("", |m| m.as_str());
    let fallback = captures.get(2).map(|m| m.as_str());

    let Some(var_name) = key.strip_prefix("env.").filter(|name| !name.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(fallback)) => Ok(fallback.to_owned()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "[server]\nlisten_address = \"127.0.0.1:8000\"\n";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn expands_api_key() {
        temp_env::with_var("PRISM_TEST_KEY", Some("sk-test"), || {
            let result = expand_env("api_key = \"{{ env.PRISM_TEST_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"sk-test\"");
        });
    }

    #[test]
    fn expands_several_placeholders_on_one_line() {
        let vars = [("PRISM_HOST", Some("127.0.0.1")), ("PRISM_PORT", Some("9000"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("listen_address = \"{{ env.PRISM_HOST }}:{{env.PRISM_PORT}}\"").unwrap();
            assert_eq!(result, "listen_address = \"127.0.0.1:9000\"");
        });
    }

    #[test]
    fn unset_variable_is_an_error() {
        temp_env::with_var_unset("PRISM_MISSING", || {
            let err = expand_env("api_key = \"{{ env.PRISM_MISSING }}\"").unwrap_err();
            assert!(err.contains("PRISM_MISSING"));
        });
    }

    #[test]
    fn default_applies_only_when_unset() {
        temp_env::with_var_unset("PRISM_OPTIONAL", || {
            let result = expand_env("title = \"{{ env.PRISM_OPTIONAL | default(\"Sales\") }}\"").unwrap();
            assert_eq!(result, "title = \"Sales\"");
        });
        temp_env::with_var("PRISM_OPTIONAL", Some("Revenue"), || {
            let result = expand_env("title = \"{{ env.PRISM_OPTIONAL | default(\"Sales\") }}\"").unwrap();
            assert_eq!(result, "title = \"Revenue\"");
        });
    }

    #[test]
    fn rejects_other_scopes() {
        let err = expand_env("key = \"{{ secrets.KEY }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("PRISM_MISSING", || {
            let input = "  # api_key = \"{{ env.PRISM_MISSING }}\"\n";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }
}
