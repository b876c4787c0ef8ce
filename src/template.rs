//! Path-template substitution and query-string encoding.
//!
//! Path templates use `{name}` placeholders. Substitution is purely textual:
//! every occurrence of a placeholder is replaced with the string form of the
//! supplied value, and a placeholder with no supplied value aborts the check
//! with a configuration error rather than dispatching a broken URI.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ContractError;

/// Matches one `{name}` placeholder; the capture is the bare name.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder pattern is valid"));

/// Substitutes every `{name}` placeholder in `template` from `params`.
///
/// Repeated occurrences of the same name all receive the same value.
///
/// # Errors
///
/// Returns [`ContractError::MissingPathParam`] for the first placeholder
/// with no value in `params`, naming the placeholder and the template.
pub fn resolve_path(
    template: &str,
    params: &BTreeMap<String, String>,
) -> Result<String, ContractError> {
    let mut resolved = template.to_string();
    for captures in PLACEHOLDER.captures_iter(template) {
        let name = &captures[1];
        let Some(value) = params.get(name) else {
            return Err(ContractError::MissingPathParam {
                name: name.to_string(),
                template: template.to_string(),
            });
        };
        resolved = resolved.replace(&format!("{{{name}}}"), value);
    }
    Ok(resolved)
}

/// Encodes query pairs as `application/x-www-form-urlencoded`.
///
/// Empty input yields an empty string; the caller decides whether a `?`
/// separator is warranted.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[rstest]
    #[case("/pets", &[], "/pets")]
    #[case("/pets/{id}", &[("id", "42")], "/pets/42")]
    #[case("/orgs/{org}/repos/{repo}", &[("org", "acme"), ("repo", "api")], "/orgs/acme/repos/api")]
    #[case("/pair/{id}/{id}", &[("id", "7")], "/pair/7/7")]
    #[case("/files/{name}.json", &[("name", "report")], "/files/report.json")]
    fn resolves_placeholders(
        #[case] template: &str,
        #[case] supplied: &[(&str, &str)],
        #[case] expected: &str,
    ) {
        let resolved = resolve_path(template, &params(supplied)).unwrap();
        assert_eq!(resolved, expected);
        assert!(!resolved.contains('{'), "no tokens may remain: {resolved}");
    }

    #[test]
    fn missing_value_is_a_configuration_error() {
        let err = resolve_path("/pets/{id}", &params(&[])).unwrap_err();
        match err {
            ContractError::MissingPathParam { name, template } => {
                assert_eq!(name, "id");
                assert_eq!(template, "/pets/{id}");
            }
            other => panic!("expected MissingPathParam, got {other:?}"),
        }
    }

    #[test]
    fn first_unresolved_placeholder_wins() {
        let err = resolve_path("/orgs/{org}/repos/{repo}", &params(&[("repo", "api")]))
            .unwrap_err();
        assert!(err.to_string().contains("{org}"));
    }

    #[test]
    fn extra_params_are_ignored() {
        let resolved =
            resolve_path("/pets/{id}", &params(&[("id", "1"), ("unused", "x")])).unwrap();
        assert_eq!(resolved, "/pets/1");
    }

    #[test]
    fn encodes_query_pairs() {
        let query = encode_query(&[
            ("limit".to_string(), "10".to_string()),
            ("tag".to_string(), "a b&c".to_string()),
        ]);
        assert_eq!(query, "limit=10&tag=a+b%26c");
    }

    #[test]
    fn empty_query_is_empty_string() {
        assert_eq!(encode_query(&[]), "");
    }
}
