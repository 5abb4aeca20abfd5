use super::template::RouteTemplate;
use crate::error::StartupError;
use std::collections::{HashMap, HashSet};

/// Declarative description of one route, consumed by [`RouteTable::build`].
pub struct RouteDef {
    name: String,
    template: String,
    defaults: Vec<(String, String)>,
    requires_area: bool,
}

/// Start describing a route. Order of the defs passed to
/// [`RouteTable::build`] is the match order.
pub fn route(name: &str, template: &str) -> RouteDef {
    RouteDef {
        name: name.to_string(),
        template: template.to_string(),
        defaults: Vec::new(),
        requires_area: false,
    }
}

impl RouteDef {
    /// Route values applied when the template itself did not bind them
    /// (typically `controller` and `action`).
    pub fn defaults(mut self, defaults: &[(&str, &str)]) -> Self {
        self.defaults = defaults
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    /// Constrain the bound `area` parameter to the table's registered areas.
    /// A route whose area is unknown is skipped, not failed.
    pub fn require_area(mut self) -> Self {
        self.requires_area = true;
        self
    }
}

#[derive(Debug)]
struct Route {
    name: String,
    template: RouteTemplate,
    defaults: Vec<(String, String)>,
    requires_area: bool,
}

/// Result of recognizing a path against the table.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch {
    /// Name of the rule that matched.
    pub route: String,
    pub controller: String,
    pub action: String,
    /// Every bound parameter except `controller` and `action`.
    pub params: HashMap<String, String>,
}

/// Ordered route table. Rules are tried in registration order and the first
/// one that matches wins; the table is immutable once built.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    areas: HashSet<String>,
}

impl RouteTable {
    /// Parse and validate an ordered list of route definitions.
    /// Route names must be unique; templates must be well formed.
    pub fn build(defs: Vec<RouteDef>) -> Result<Self, StartupError> {
        Self::with_areas(defs, &[])
    }

    /// Like [`build`](Self::build), with a set of known area names for
    /// routes carrying the area constraint.
    pub fn with_areas(defs: Vec<RouteDef>, areas: &[&str]) -> Result<Self, StartupError> {
        let mut names = HashSet::new();
        let mut routes = Vec::with_capacity(defs.len());
        for def in defs {
            if !names.insert(def.name.to_ascii_lowercase()) {
                return Err(StartupError::DuplicateRoute(def.name));
            }
            routes.push(Route {
                name: def.name,
                template: RouteTemplate::parse(&def.template)?,
                defaults: def.defaults,
                requires_area: def.requires_area,
            });
        }
        Ok(Self {
            routes,
            areas: areas.iter().map(|a| a.to_ascii_lowercase()).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Match a request path against the rules in order.
    ///
    /// The first template match whose constraints hold and which yields both
    /// a controller and an action produces the result; otherwise matching
    /// continues with the next rule. `None` means not-found.
    pub fn recognize(&self, path: &str) -> Option<RouteMatch> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        for route in &self.routes {
            let Some(mut values) = route.template.matches(&segments) else {
                continue;
            };
            for (key, value) in &route.defaults {
                values
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
            if route.requires_area {
                let known = values
                    .get("area")
                    .map(|a| self.areas.contains(&a.to_ascii_lowercase()))
                    .unwrap_or(false);
                if !known {
                    continue;
                }
            }
            let Some(controller) = values.remove("controller") else {
                continue;
            };
            let Some(action) = values.remove("action") else {
                continue;
            };
            return Some(RouteMatch {
                route: route.name.clone(),
                controller,
                action,
                params: values,
            });
        }
        None
    }
}
