//! Transport-independent request dispatch.
//!
//! | Method | Path          | Handler                    |
//! |--------|---------------|----------------------------|
//! | GET    | `/users`      | `UserService::list_users`  |
//! | POST   | `/users`      | `UserService::create_user` |
//! | GET    | `/users/{id}` | `UserService::get_user`    |
//! | PUT    | `/users/{id}` | `UserService::replace_user`|
//! | PATCH  | `/users/{id}` | `UserService::patch_user`  |
//! | GET    | `/metrics`    | Prometheus text            |

use serde::Serialize;
use serde_json::json;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
use crate::service::{ApiError, UserService};

const JSON: &str = "Content-Type: application/json";
#[cfg(feature = "metrics")]
const PROMETHEUS_TEXT: &str = "Content-Type: text/plain; version=0.0.4; charset=utf-8";

/// A fully rendered response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Complete `Content-Type` header line
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                content_type: JSON,
                body,
            },
            Err(e) => {
                log::error!("Failed to encode response: {}", e);
                Self::message(500, "Failed to encode response")
            }
        }
    }

    fn message(status: u16, error: &str) -> Self {
        Self {
            status,
            content_type: JSON,
            body: json!({ "error": error, "errors": [] }).to_string().into_bytes(),
        }
    }

    fn from_error(err: &ApiError) -> Self {
        Self {
            status: err.status(),
            content_type: JSON,
            body: err.body().to_string().into_bytes(),
        }
    }

    /// Body parsed as JSON, for tests and logging
    #[must_use]
    pub fn json_body(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Standard reason phrase for the status codes this service emits
#[must_use]
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        _ => "Internal Server Error",
    }
}

enum Route {
    Users,
    User(String),
    Metrics,
}

fn match_route(path: &str) -> Option<Route> {
    let path = path.split('?').next().unwrap_or(path);
    let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
    match path {
        "/users" => Some(Route::Users),
        "/metrics" => Some(Route::Metrics),
        _ => path
            .strip_prefix("/users/")
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(|rest| Route::User(rest.to_string())),
    }
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::InvalidId(raw.to_string())),
    }
}

/// Dispatch one request
pub fn handle(service: &UserService, method: &str, path: &str, body: &[u8]) -> ApiResponse {
    let Some(route) = match_route(path) else {
        return ApiResponse::message(404, "Not found");
    };

    match (route, method) {
        (Route::Users, "GET") => respond("list", 200, service.list_users()),
        (Route::Users, "POST") => respond("create", 201, service.create_user(body)),
        (Route::User(raw), "GET") => {
            respond("get", 200, parse_id(&raw).and_then(|id| service.get_user(id)))
        }
        (Route::User(raw), "PUT") => respond(
            "replace",
            200,
            parse_id(&raw).and_then(|id| service.replace_user(id, body)),
        ),
        (Route::User(raw), "PATCH") => respond(
            "patch",
            200,
            parse_id(&raw).and_then(|id| service.patch_user(id, body)),
        ),
        (Route::Metrics, "GET") => metrics(),
        _ => ApiResponse::message(405, "Method not allowed"),
    }
}

fn respond<T: Serialize>(operation: &str, status: u16, result: Result<T, ApiError>) -> ApiResponse {
    match result {
        Ok(value) => {
            #[cfg(feature = "metrics")]
            METRICS.record_request(operation, "ok");
            ApiResponse::json(status, &value)
        }
        Err(err) => {
            #[cfg(feature = "metrics")]
            METRICS.record_request(operation, err.kind());
            log::warn!("{} failed: {}", operation, err);
            ApiResponse::from_error(&err)
        }
    }
}

#[cfg(feature = "metrics")]
fn metrics() -> ApiResponse {
    match METRICS.render() {
        Ok(body) => ApiResponse {
            status: 200,
            content_type: PROMETHEUS_TEXT,
            body,
        },
        Err(e) => {
            log::error!("Failed to render metrics: {}", e);
            ApiResponse::message(500, "Failed to render metrics")
        }
    }
}

#[cfg(not(feature = "metrics"))]
fn metrics() -> ApiResponse {
    ApiResponse::message(404, "Not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_route() {
        assert!(matches!(match_route("/users"), Some(Route::Users)));
        assert!(matches!(match_route("/users/"), Some(Route::Users)));
        assert!(matches!(match_route("/users?x=1"), Some(Route::Users)));
        assert!(matches!(match_route("/users/12"), Some(Route::User(id)) if id == "12"));
        assert!(matches!(match_route("/metrics"), Some(Route::Metrics)));
        assert!(match_route("/users/1/friends").is_none());
        assert!(match_route("/").is_none());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("7"), Ok(7));
        assert!(parse_id("0").is_err());
        assert!(parse_id("-3").is_err());
        assert!(parse_id("abc").is_err());
    }

    #[test]
    fn test_reason_phrase() {
        assert_eq!(reason_phrase(201), "Created");
        assert_eq!(reason_phrase(405), "Method Not Allowed");
        assert_eq!(reason_phrase(500), "Internal Server Error");
    }
}
