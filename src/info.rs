//! Static application and API metadata.
//!
//! These records are fixed at compile time and only ever read.

use serde::{Serialize, Serializer};

/// Ordered name → path table, serialized as a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMap(&'static [(&'static str, &'static str)]);

impl PathMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self(entries)
    }

    /// Path registered under `name`.
    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, path)| *path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PathMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().copied())
    }
}

/// Application metadata.
#[derive(Debug, Serialize)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub license: &'static str,
    pub repository: &'static str,
    pub keywords: &'static [&'static str],
    pub endpoints: PathMap,
}

/// Versioned API metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub base_url: &'static str,
    pub version_endpoints: PathMap,
    pub supported_versions: &'static [&'static str],
    pub deprecated_versions: &'static [&'static str],
    pub versioning_strategy: &'static str,
    /// Where API documentation is published. Descriptive only: this server
    /// does not serve these paths and they resolve to the 404 envelope.
    pub documentation: PathMap,
}

/// One endpoint exposed by an API version.
#[derive(Debug, Serialize)]
pub struct EndpointDescriptor {
    pub path: &'static str,
    pub method: &'static str,
    pub description: &'static str,
}

/// Metadata for API v1.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVersionInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub root_endpoint: &'static str,
    pub description: &'static str,
    pub release_date: &'static str,
    pub status: &'static str,
    pub endpoints: &'static [EndpointDescriptor],
}

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub static APP_INFO: AppInfo = AppInfo {
    name: "API Template",
    version: VERSION,
    description: "A minimal HTTP API template with a standardized JSON envelope",
    author: env!("CARGO_PKG_AUTHORS"),
    license: env!("CARGO_PKG_LICENSE"),
    repository: "https://github.com/example/api-template",
    keywords: &["api", "template", "axum", "rust", "json"],
    endpoints: PathMap::new(&[("health", "/health"), ("api", "/api")]),
};

pub static API_INFO: ApiInfo = ApiInfo {
    name: "API Template",
    version: VERSION,
    description: "RESTful API with versioning support",
    base_url: "/api",
    version_endpoints: PathMap::new(&[("v1", "/v1"), ("v2", "/v2")]),
    supported_versions: &["v1"],
    deprecated_versions: &[],
    versioning_strategy: "URL path versioning",
    documentation: PathMap::new(&[
        ("swagger", "/api/docs"),
        ("postman", "/api/postman-collection"),
    ]),
};

pub static API_V1_INFO: ApiVersionInfo = ApiVersionInfo {
    name: "API Template - API V1",
    version: VERSION,
    root_endpoint: "/v1",
    description: "First version of the API Template",
    release_date: "2024-01-01",
    status: "stable",
    endpoints: &[
        EndpointDescriptor {
            path: "/",
            method: "GET",
            description: "Root endpoint for API V1",
        },
        EndpointDescriptor {
            path: "/health",
            method: "GET",
            description: "Health check endpoint",
        },
        EndpointDescriptor {
            path: "/info",
            method: "GET",
            description: "API information endpoint",
        },
    ],
};
