//! Service environment variables.
//!
//! A service's variables are always replaced as a whole, so the unit of
//! change here is the [`VariableSet`], never a single [`EnvVar`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A name/value pair scoped to one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered set of variables with unique names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VariableSet(Vec<EnvVar>);

impl VariableSet {
    /// Build a set, rejecting the first duplicated name.
    pub fn new(vars: Vec<EnvVar>) -> Result<Self, String> {
        let mut seen = HashSet::new();
        for var in &vars {
            if !seen.insert(var.name.as_str()) {
                return Err(var.name.clone());
            }
        }
        Ok(Self(vars))
    }

    /// Build a set from platform data, keeping the first value of a repeated name.
    #[must_use]
    pub fn from_remote(vars: Vec<EnvVar>) -> Self {
        let mut seen = HashSet::new();
        let vars = vars
            .into_iter()
            .filter(|var| seen.insert(var.name.clone()))
            .collect();
        Self(vars)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|var| var.name == name)
            .map(|var| var.value.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvVar> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|var| var.name.as_str())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[EnvVar] {
        &self.0
    }
}

impl IntoIterator for VariableSet {
    type Item = EnvVar;
    type IntoIter = std::vec::IntoIter<EnvVar>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Presence state of a required variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    /// Set to a real value.
    Present,
    /// Set, but empty or still a placeholder.
    Placeholder,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckItem {
    pub name: String,
    pub state: CheckState,
}

impl CheckItem {
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.state == CheckState::Present
    }
}

/// True when `value` is empty or contains any placeholder marker.
#[must_use]
pub fn is_placeholder(value: &str, markers: &[String]) -> bool {
    value.trim().is_empty()
        || markers
            .iter()
            .filter(|marker| !marker.is_empty())
            .any(|marker| value.contains(marker.as_str()))
}

/// Evaluate each required name against `vars`, in the order given.
#[must_use]
pub fn checklist(vars: &VariableSet, required: &[String], markers: &[String]) -> Vec<CheckItem> {
    required
        .iter()
        .map(|name| {
            let state = match vars.get(name) {
                None => CheckState::Missing,
                Some(value) if is_placeholder(value, markers) => CheckState::Placeholder,
                Some(_) => CheckState::Present,
            };
            CheckItem {
                name: name.clone(),
                state,
            }
        })
        .collect()
}

const SENSITIVE_MARKERS: [&str; 4] = ["KEY", "SECRET", "PASSWORD", "TOKEN"];

/// True when a variable name suggests its value is a credential.
#[must_use]
pub fn is_sensitive(name: &str, extra: &[&str]) -> bool {
    let upper = name.to_ascii_uppercase();
    SENSITIVE_MARKERS.iter().any(|m| upper.contains(m)) || extra.iter().any(|n| *n == name)
}

/// Mask a value for display: short values vanish, longer ones keep a prefix.
#[must_use]
pub fn mask(value: &str) -> String {
    const VISIBLE: usize = 6;
    if value.chars().count() <= VISIBLE * 2 {
        return "***".to_string();
    }
    let prefix: String = value.chars().take(VISIBLE).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<String> {
        vec!["从PostgreSQL服务复制".into(), "你的".into()]
    }

    fn required() -> Vec<String> {
        ["DATABASE_URL", "JWT_SECRET", "PORT"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = VariableSet::new(vec![EnvVar::new("A", "1"), EnvVar::new("A", "2")]);
        assert_eq!(err, Err("A".to_string()));
    }

    #[test]
    fn remote_duplicates_keep_first_value() {
        let set = VariableSet::from_remote(vec![EnvVar::new("A", "1"), EnvVar::new("A", "2")]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("A"), Some("1"));
    }

    #[test]
    fn checklist_classifies_each_required_name() {
        let vars = VariableSet::new(vec![
            EnvVar::new("DATABASE_URL", "从PostgreSQL服务复制"),
            EnvVar::new("JWT_SECRET", "s3cret-value"),
        ])
        .unwrap();

        let items = checklist(&vars, &required(), &markers());
        let states: Vec<_> = items.iter().map(|i| i.state).collect();
        assert_eq!(
            states,
            vec![
                CheckState::Placeholder,
                CheckState::Present,
                CheckState::Missing
            ]
        );
    }

    #[test]
    fn empty_value_is_a_placeholder() {
        assert!(is_placeholder("", &[]));
        assert!(is_placeholder("请填写你的密钥", &markers()));
        assert!(!is_placeholder("production", &markers()));
    }

    #[test]
    fn sensitive_names_and_masking() {
        assert!(is_sensitive("GOOGLE_API_KEY", &[]));
        assert!(is_sensitive("DATABASE_URL", &["DATABASE_URL"]));
        assert!(!is_sensitive("NODE_ENV", &[]));
        assert_eq!(mask("short"), "***");
        assert_eq!(mask("postgresql://root:pw@host/db"), "postgr...");
    }
}
