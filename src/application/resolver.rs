//! Heuristic entity resolution.
//!
//! Maps an operator's intent ("the xhs project", "the app service") onto
//! discovered entities. A [`RankedResolver`] tries its rules in rank order;
//! within a rule the first candidate in discovery order wins. When no rule
//! matches, it either falls back to the first candidate or reports
//! [`Resolution::NotFound`].
//!
//! Resolution never touches the network: callers pass in the candidates
//! they already fetched.

use std::fmt;

use serde::Deserialize;

use crate::domain::{Deployment, Project, Service, ServiceKind};

/// How confident a selection is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// A rule matched.
    Exact,
    /// Nothing matched; the first candidate was taken.
    Fallback,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact match"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// Tagged outcome of a resolution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Exact(T),
    Fallback(T),
    NotFound,
}

impl<T> Resolution<T> {
    #[must_use]
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Resolution<U> {
        match self {
            Self::Exact(v) => Resolution::Exact(f(v)),
            Self::Fallback(v) => Resolution::Fallback(f(v)),
            Self::NotFound => Resolution::NotFound,
        }
    }

    /// Split into the value and its confidence.
    pub fn into_resolved(self) -> Option<Resolved<T>> {
        match self {
            Self::Exact(value) => Some(Resolved {
                value,
                confidence: Confidence::Exact,
            }),
            Self::Fallback(value) => Some(Resolved {
                value,
                confidence: Confidence::Fallback,
            }),
            Self::NotFound => None,
        }
    }
}

/// A selected entity together with how it was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub confidence: Confidence,
}

impl<T> Resolved<T> {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.confidence == Confidence::Fallback
    }
}

impl<T> std::ops::Deref for Resolved<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

type Rule<'r, T> = Box<dyn Fn(&T) -> bool + 'r>;

/// Ordered rules plus a fallback policy.
pub struct RankedResolver<'r, T> {
    rules: Vec<Rule<'r, T>>,
    fallback_to_first: bool,
}

impl<'r, T> RankedResolver<'r, T> {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback_to_first: false,
        }
    }

    /// Append a rule ranked below the existing ones.
    #[must_use]
    pub fn rule(mut self, rule: impl Fn(&T) -> bool + 'r) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Take the first candidate when no rule matches.
    #[must_use]
    pub fn fallback_to_first(mut self) -> Self {
        self.fallback_to_first = true;
        self
    }

    pub fn resolve<'c>(&self, candidates: &'c [T]) -> Resolution<&'c T> {
        for rule in &self.rules {
            if let Some(found) = candidates.iter().find(|c| rule(*c)) {
                return Resolution::Exact(found);
            }
        }
        match candidates.first() {
            Some(first) if self.fallback_to_first => Resolution::Fallback(first),
            _ => Resolution::NotFound,
        }
    }
}

impl<T> Default for RankedResolver<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// How a project name is compared with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive equality.
    #[default]
    Exact,
    /// Case-insensitive substring.
    Contains,
}

impl MatchMode {
    #[must_use]
    pub fn matches(self, name: &str, target: &str) -> bool {
        let name = name.to_lowercase();
        let target = target.to_lowercase();
        match self {
            Self::Exact => name == target,
            Self::Contains => name.contains(&target),
        }
    }
}

/// What identifies the application service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCriteria {
    /// Case-insensitive name fragment.
    pub name_fragment: String,
    /// Declared types that count as application-like.
    pub kinds: Vec<ServiceKind>,
}

impl ServiceCriteria {
    #[must_use]
    pub fn matches(&self, service: &Service) -> bool {
        let fragment = self.name_fragment.to_lowercase();
        (!fragment.is_empty() && service.name.to_lowercase().contains(&fragment))
            || self.kinds.contains(&service.kind)
    }
}

/// Pick the active project: a name match anywhere in the list, else the first.
pub fn select_project<'c>(
    projects: &'c [Project],
    target: &str,
    mode: MatchMode,
) -> Resolution<&'c Project> {
    RankedResolver::new()
        .rule(|p: &Project| mode.matches(&p.name, target))
        .fallback_to_first()
        .resolve(projects)
}

/// Pick the application service: the first whose name contains the fragment
/// or whose type is application-like, else the first service.
pub fn select_app_service<'c>(
    services: &'c [Service],
    criteria: &ServiceCriteria,
) -> Resolution<&'c Service> {
    RankedResolver::new()
        .rule(|s: &Service| criteria.matches(s))
        .fallback_to_first()
        .resolve(services)
}

/// Pick the managed database service. There is no fallback.
pub fn select_database_service<'c>(
    services: &'c [Service],
    kind: &ServiceKind,
) -> Resolution<&'c Service> {
    RankedResolver::new()
        .rule(|s: &Service| &s.kind == kind)
        .resolve(services)
}

/// The most recent deployment; history is ordered newest first.
#[must_use]
pub fn latest_deployment(deployments: &[Deployment]) -> Option<&Deployment> {
    deployments.first()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects(names: &[&str]) -> Vec<Project> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Project::new(format!("p{i}"), *name))
            .collect()
    }

    fn service(id: &str, name: &str, kind: &str) -> Service {
        Service::new(id, "p0", name, kind)
    }

    fn app_criteria() -> ServiceCriteria {
        ServiceCriteria {
            name_fragment: "content-generator".into(),
            kinds: vec![ServiceKind::Dockerfile, ServiceKind::Nodejs],
        }
    }

    #[test]
    fn exact_project_match_wins_regardless_of_position() {
        let list = projects(&["alpha", "beta", "XHS"]);
        let chosen = select_project(&list, "xhs", MatchMode::Exact);
        assert_eq!(chosen, Resolution::Exact(&list[2]));
    }

    #[test]
    fn no_project_match_falls_back_to_first() {
        let list = projects(&["alpha", "beta"]);
        let chosen = select_project(&list, "xhs", MatchMode::Exact);
        assert_eq!(chosen, Resolution::Fallback(&list[0]));
    }

    #[test]
    fn empty_project_list_is_not_found() {
        let chosen = select_project(&[], "xhs", MatchMode::Exact);
        assert_eq!(chosen, Resolution::NotFound);
    }

    #[test]
    fn exact_mode_does_not_match_substrings() {
        let list = projects(&["xhs-staging", "xhs"]);
        assert_eq!(
            select_project(&list, "xhs", MatchMode::Exact),
            Resolution::Exact(&list[1])
        );
        assert_eq!(
            select_project(&list, "xhs", MatchMode::Contains),
            Resolution::Exact(&list[0])
        );
    }

    #[test]
    fn app_service_matches_by_name_or_type_in_order() {
        let list = vec![
            service("s0", "postgresql", "POSTGRES"),
            service("s1", "web", "NODEJS"),
            service("s2", "Content-Generator", "PREBUILT"),
        ];
        let chosen = select_app_service(&list, &app_criteria());
        assert_eq!(chosen, Resolution::Exact(&list[1]));
    }

    #[test]
    fn app_service_falls_back_to_first() {
        let list = vec![
            service("s0", "postgresql", "POSTGRES"),
            service("s1", "redis", "REDIS"),
        ];
        let chosen = select_app_service(&list, &app_criteria());
        assert_eq!(chosen, Resolution::Fallback(&list[0]));
        assert_eq!(select_app_service(&[], &app_criteria()), Resolution::NotFound);
    }

    #[test]
    fn configured_custom_type_matches_regardless_of_case() {
        let criteria = ServiceCriteria {
            name_fragment: String::new(),
            kinds: vec![ServiceKind::from("prebuilt")],
        };
        let list = vec![
            service("s0", "db", "POSTGRES"),
            service("s1", "app", "PREBUILT"),
        ];
        let chosen = select_app_service(&list, &criteria);
        assert_eq!(chosen, Resolution::Exact(&list[1]));
    }

    #[test]
    fn database_service_has_no_fallback() {
        let list = vec![service("s0", "web", "DOCKERFILE")];
        assert_eq!(
            select_database_service(&list, &ServiceKind::Postgres),
            Resolution::NotFound
        );

        let list = vec![
            service("s0", "web", "DOCKERFILE"),
            service("s1", "db", "POSTGRES"),
        ];
        assert_eq!(
            select_database_service(&list, &ServiceKind::Postgres),
            Resolution::Exact(&list[1])
        );
    }

    #[test]
    fn rules_are_ranked() {
        let list = vec![1, 2, 3, 4];
        let resolver = RankedResolver::new()
            .rule(|n: &i32| *n == 4)
            .rule(|n: &i32| n % 2 == 0);
        assert_eq!(resolver.resolve(&list), Resolution::Exact(&4));
    }

    #[test]
    fn resolved_carries_confidence() {
        let resolved = Resolution::Fallback("x").into_resolved().unwrap();
        assert!(resolved.is_fallback());
        assert_eq!(*resolved, "x");
        assert!(Resolution::<i32>::NotFound.into_resolved().is_none());
    }

    #[test]
    fn latest_deployment_is_position_zero() {
        let history = vec![
            Deployment::new("d-new", "s", "RUNNING"),
            Deployment::new("d-old", "s", "REMOVED"),
        ];
        assert_eq!(latest_deployment(&history).map(|d| d.id.as_str()), Some("d-new"));
        assert!(latest_deployment(&[]).is_none());
    }
}
