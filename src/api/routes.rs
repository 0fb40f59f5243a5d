//! Explicit route table mapping method and path to handlers.

use crate::api::Reply;
use crate::random::RandomSource;
use hyper::Method;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Route handler. Performs the route's metric mutations and returns its body.
pub type Handler = Arc<dyn Fn(&dyn RandomSource) -> Reply + Send + Sync>;

/// Errors raised while building a route table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("duplicate route: {method} {path}")]
    Duplicate { method: Method, path: String },

    #[error("route path '{0}' must start with '/'")]
    InvalidPath(String),
}

/// A single method + path binding.
#[derive(Clone)]
pub struct Route {
    method: Method,
    path: &'static str,
    handler: Handler,
}

impl Route {
    /// Bind a GET handler to `path`.
    pub fn get<F>(path: &'static str, handler: F) -> Self
    where
        F: Fn(&dyn RandomSource) -> Reply + Send + Sync + 'static,
    {
        Self::new(Method::GET, path, handler)
    }

    /// Bind a handler to `method` and `path`.
    pub fn new<F>(method: Method, path: &'static str, handler: F) -> Self
    where
        F: Fn(&dyn RandomSource) -> Reply + Send + Sync + 'static,
    {
        Self {
            method,
            path,
            handler: Arc::new(handler),
        }
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Run the handler.
    pub fn call(&self, random: &dyn RandomSource) -> Reply {
        (self.handler)(random)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Outcome of looking up a request.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// A route accepts this method and path.
    Matched(&'a Route),
    /// The path exists but only for these methods.
    MethodNotAllowed(Vec<Method>),
    /// No route has this path.
    NotFound,
}

/// Immutable route table, checked for duplicates when built.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table, rejecting duplicate method + path pairs.
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteError> {
        let mut seen = HashSet::new();

        for route in &routes {
            if !route.path.starts_with('/') {
                return Err(RouteError::InvalidPath(route.path.to_string()));
            }
            if !seen.insert((route.method.clone(), route.path)) {
                return Err(RouteError::Duplicate {
                    method: route.method.clone(),
                    path: route.path.to_string(),
                });
            }
        }

        Ok(Self { routes })
    }

    /// Look up a request.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let mut allowed = Vec::new();

        for route in self.routes.iter().filter(|r| r.path == path) {
            if route.method == *method {
                return Resolution::Matched(route);
            }
            allowed.push(route.method.clone());
        }

        if allowed.is_empty() {
            Resolution::NotFound
        } else {
            Resolution::MethodNotAllowed(allowed)
        }
    }

    /// Routes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ThreadRandom;

    fn ok(_: &dyn RandomSource) -> Reply {
        Reply::Status { status: "ok" }
    }

    #[test]
    fn test_resolve_matched() {
        let table = RouteTable::new(vec![Route::get("/a", ok), Route::get("/b", ok)]).unwrap();

        match table.resolve(&Method::GET, "/b") {
            Resolution::Matched(route) => {
                assert_eq!(route.path(), "/b");
                assert_eq!(route.call(&ThreadRandom), Reply::Status { status: "ok" });
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_not_found() {
        let table = RouteTable::new(vec![Route::get("/a", ok)]).unwrap();
        assert!(matches!(table.resolve(&Method::GET, "/missing"), Resolution::NotFound));
        // Paths are matched exactly.
        assert!(matches!(table.resolve(&Method::GET, "/a/"), Resolution::NotFound));
    }

    #[test]
    fn test_resolve_method_not_allowed() {
        let table = RouteTable::new(vec![Route::get("/a", ok)]).unwrap();

        match table.resolve(&Method::POST, "/a") {
            Resolution::MethodNotAllowed(allowed) => assert_eq!(allowed, vec![Method::GET]),
            other => panic!("expected 405, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = RouteTable::new(vec![Route::get("/a", ok), Route::get("/a", ok)]);
        assert_eq!(
            result.unwrap_err(),
            RouteError::Duplicate {
                method: Method::GET,
                path: "/a".to_string(),
            }
        );
    }

    #[test]
    fn test_same_path_different_methods_allowed() {
        let table = RouteTable::new(vec![
            Route::get("/a", ok),
            Route::new(Method::POST, "/a", ok),
        ])
        .unwrap();
        assert_eq!(table.len(), 2);
        assert!(matches!(table.resolve(&Method::POST, "/a"), Resolution::Matched(_)));
    }

    #[test]
    fn test_relative_path_rejected() {
        let result = RouteTable::new(vec![Route::get("a", ok)]);
        assert_eq!(result.unwrap_err(), RouteError::InvalidPath("a".to_string()));
    }
}
