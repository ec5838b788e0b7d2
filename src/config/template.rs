//! Template merging and placeholder substitution

use crate::domain::CheckFields;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Placeholder replaced by the check's own name
const NAME_PLACEHOLDER: &str = "{name}";

/// Configuration file as written
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Shared field values, referenced by checks through `template`
    #[serde(default)]
    pub templates: BTreeMap<String, RawFields>,
    /// Declared checks, keyed by name
    #[serde(default)]
    pub checks: BTreeMap<String, RawFields>,
}

/// Field values of a check or template before expansion
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFields {
    pub template: Option<String>,
    pub require: Option<String>,
    pub get_version: Option<String>,
    pub pattern: Option<String>,
    pub suggestion_text: Option<String>,
    pub suggestion: Option<String>,
    pub depends: Option<Depends>,
}

/// `depends` as a comma-separated string or an array of names
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Depends {
    List(Vec<String>),
    Text(String),
}

impl Depends {
    fn into_entries(self) -> Vec<String> {
        match self {
            Depends::List(list) => list,
            Depends::Text(text) => vec![text],
        }
    }
}

impl RawFields {
    /// Fills every unset field from `template`
    fn merged_with(self, template: &RawFields) -> RawFields {
        RawFields {
            template: self.template,
            require: self.require.or_else(|| template.require.clone()),
            get_version: self.get_version.or_else(|| template.get_version.clone()),
            pattern: self.pattern.or_else(|| template.pattern.clone()),
            suggestion_text: self
                .suggestion_text
                .or_else(|| template.suggestion_text.clone()),
            suggestion: self.suggestion.or_else(|| template.suggestion.clone()),
            depends: self.depends.or_else(|| template.depends.clone()),
        }
    }

    fn resolve(self, name: &str) -> CheckFields {
        let fill = |value: Option<String>| value.map(|v| substitute_name(&v, name));
        CheckFields {
            require: fill(self.require),
            get_version: fill(self.get_version),
            pattern: fill(self.pattern),
            suggestion_text: fill(self.suggestion_text),
            suggestion: fill(self.suggestion),
            depends: self
                .depends
                .map(Depends::into_entries)
                .unwrap_or_default()
                .iter()
                .map(|d| substitute_name(d, name))
                .collect(),
        }
    }
}

/// Replaces every `{name}` in `value`
pub fn substitute_name(value: &str, name: &str) -> String {
    value.replace(NAME_PLACEHOLDER, name)
}

/// Merges templates into checks and substitutes placeholders
pub fn expand_checks(raw: RawConfig) -> Result<BTreeMap<String, CheckFields>, ConfigError> {
    if let Some((name, _)) = raw.templates.iter().find(|(_, t)| t.template.is_some()) {
        return Err(ConfigError::NestedTemplate {
            template: name.clone(),
        });
    }

    let mut resolved = BTreeMap::new();
    for (name, fields) in raw.checks {
        let merged = match fields.template.as_deref() {
            Some(template_name) => {
                let template = raw.templates.get(template_name).ok_or_else(|| {
                    ConfigError::UnknownTemplate {
                        check: name.clone(),
                        template: template_name.to_string(),
                    }
                })?;
                fields.merged_with(template)
            }
            None => fields,
        };
        let fields = merged.resolve(&name);
        resolved.insert(name, fields);
    }
    Ok(resolved)
}
