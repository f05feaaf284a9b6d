//! HTTP methods and OData query parameter keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::api::error::ConfigError;

/// The closed set of HTTP methods the API accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::Post,
        Method::Patch,
        Method::Put,
        Method::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// PATCH and DELETE address a single existing record
    pub fn requires_resource_id(&self) -> bool {
        matches!(self, Self::Patch | Self::Delete)
    }

    /// POST, PATCH and PUT carry a body
    pub fn requires_payload(&self) -> bool {
        matches!(self, Self::Post | Self::Patch | Self::Put)
    }

    /// PATCH must prove the client's copy is current
    pub fn requires_etag(&self) -> bool {
        matches!(self, Self::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PATCH" => Ok(Self::Patch),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ConfigError::UnsupportedRequestType(s.to_string())),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl TryFrom<&reqwest::Method> for Method {
    type Error = ConfigError;

    fn try_from(method: &reqwest::Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// OData system query options understood by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryParameter {
    Filter,
    Select,
    OrderBy,
    Search,
    Top,
    Skip,
    Exclude,
    Expand,
    Count,
}

impl QueryParameter {
    /// Wire key, e.g. `$filter`
    pub fn key(&self) -> &'static str {
        match self {
            Self::Filter => "$filter",
            Self::Select => "$select",
            Self::OrderBy => "$orderby",
            Self::Search => "$search",
            Self::Top => "$top",
            Self::Skip => "$skip",
            Self::Exclude => "$exclude",
            Self::Expand => "$expand",
            Self::Count => "$count",
        }
    }
}

impl fmt::Display for QueryParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
