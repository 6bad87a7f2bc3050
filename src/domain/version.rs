use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ReleaseError, Result};

const APP_NAME: &str = "app_name";
const OLD_VERSION: &str = "old_version";
const NEW_VERSION: &str = "new_version";
const PUSH: &str = "push";

/// Versions reported by the release tool's probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub app_name: String,
    pub old_version: String,
    pub new_version: String,
    pub push_descriptor: String,
}

impl VersionInfo {
    /// Whether the new version carries a semver pre-release suffix.
    pub fn is_prerelease(&self) -> bool {
        semver::Version::parse(self.new_version.trim_start_matches('v'))
            .map(|v| !v.pre.is_empty())
            .unwrap_or(false)
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {}",
            self.app_name, self.old_version, self.new_version
        )
    }
}

/// Output layout of the version probe
///
/// Different releases of the release tool print either comma separated
/// `key:value` tokens or an object literal with quoted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeFormat {
    #[default]
    Auto,
    KeyValue,
    ObjectLiteral,
}

/// Parse the probe output into a complete [VersionInfo].
///
/// Fails when any of the four fields is missing or empty; partial version
/// data is never returned.
pub fn parse_probe_output(output: &str, format: ProbeFormat) -> Result<VersionInfo> {
    match format {
        ProbeFormat::KeyValue => complete(&parse_key_value(output)),
        ProbeFormat::ObjectLiteral => complete(&parse_object_literal(output)?),
        ProbeFormat::Auto => {
            let key_value = parse_key_value(output);
            if let Ok(info) = complete(&key_value) {
                return Ok(info);
            }
            let object = parse_object_literal(output)?;
            if let Ok(info) = complete(&object) {
                return Ok(info);
            }
            let best = if object.len() > key_value.len() {
                object
            } else {
                key_value
            };
            complete(&best)
        }
    }
}

/// `app_name:shop,old_version:1.2.0,new_version:1.3.0,push:true`
fn parse_key_value(output: &str) -> HashMap<String, String> {
    output
        .split([',', '\n'])
        .filter_map(|token| token.split_once(':'))
        .map(|(key, value)| {
            (
                key.trim().to_string(),
                value.trim().trim_matches(|c| c == '\'' || c == '"').to_string(),
            )
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// `{ app_name: 'shop', old_version: '1.2.0', new_version: '1.3.0', push: 'true' }`
fn parse_object_literal(output: &str) -> Result<HashMap<String, String>> {
    let re = Regex::new(r#"(\w+)\s*:\s*(?:'([^']*)'|"([^"]*)")"#)
        .map_err(|e| ReleaseError::version(format!("invalid probe pattern: {}", e)))?;

    Ok(re
        .captures_iter(output)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str().trim().to_string();
            Some((key, value))
        })
        .collect())
}

fn complete(fields: &HashMap<String, String>) -> Result<VersionInfo> {
    let field = |name: &str| {
        fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    };

    let missing: Vec<&str> = [APP_NAME, OLD_VERSION, NEW_VERSION, PUSH]
        .into_iter()
        .filter(|name| field(name).is_none())
        .collect();

    if !missing.is_empty() {
        return Err(ReleaseError::version(format!(
            "Could not get release version (missing {}). Please make sure you have the correct configuration in the package.json or manifest.json file.",
            missing.join(", ")
        )));
    }

    Ok(VersionInfo {
        app_name: field(APP_NAME).unwrap_or_default(),
        old_version: field(OLD_VERSION).unwrap_or_default(),
        new_version: field(NEW_VERSION).unwrap_or_default(),
        push_descriptor: field(PUSH).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_format() {
        let info = parse_probe_output(
            "app_name:shop.store,old_version:1.2.0,new_version:1.3.0,push:true",
            ProbeFormat::Auto,
        )
        .unwrap();
        assert_eq!(info.app_name, "shop.store");
        assert_eq!(info.old_version, "1.2.0");
        assert_eq!(info.new_version, "1.3.0");
        assert_eq!(info.push_descriptor, "true");
    }

    #[test]
    fn test_object_literal_format() {
        let output = "{ app_name: 'shop.store', old_version: '1.2.0', new_version: '1.3.0-beta.0', push: 'git push origin HEAD' }";
        let info = parse_probe_output(output, ProbeFormat::Auto).unwrap();
        assert_eq!(info.new_version, "1.3.0-beta.0");
        assert_eq!(info.push_descriptor, "git push origin HEAD");
        assert!(info.is_prerelease());
    }

    #[test]
    fn test_forced_format_does_not_fall_back() {
        let output = "{ app_name: 'shop', old_version: '1.0.0', new_version: '1.0.1', push: 'true' }";
        assert!(parse_probe_output(output, ProbeFormat::KeyValue).is_err());
        assert!(parse_probe_output(output, ProbeFormat::ObjectLiteral).is_ok());
    }

    #[test]
    fn test_empty_new_version_is_rejected() {
        let err = parse_probe_output(
            "app_name:myapp,old_version:1.2.0,new_version:",
            ProbeFormat::Auto,
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, ReleaseError::VersionResolution(_)));
        assert!(msg.contains("new_version"));
        assert!(msg.contains("push"));
    }

    #[test]
    fn test_every_missing_field_is_rejected() {
        let full = [
            ("app_name", "shop"),
            ("old_version", "1.0.0"),
            ("new_version", "1.1.0"),
            ("push", "true"),
        ];

        for skipped in 0..full.len() {
            let output: Vec<String> = full
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skipped)
                .map(|(_, (k, v))| format!("{}:{}", k, v))
                .collect();
            let result = parse_probe_output(&output.join(","), ProbeFormat::Auto);
            assert!(result.is_err(), "missing {} should fail", full[skipped].0);
        }
    }

    #[test]
    fn test_empty_output_is_rejected() {
        assert!(parse_probe_output("", ProbeFormat::Auto).is_err());
        assert!(parse_probe_output("   \n", ProbeFormat::ObjectLiteral).is_err());
    }

    #[test]
    fn test_stable_version_is_not_prerelease() {
        let info = VersionInfo {
            app_name: "shop".to_string(),
            old_version: "1.2.0".to_string(),
            new_version: "1.3.0".to_string(),
            push_descriptor: "true".to_string(),
        };
        assert!(!info.is_prerelease());
        assert_eq!(info.to_string(), "shop 1.2.0 -> 1.3.0");
    }
}
