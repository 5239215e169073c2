use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Bearer-token claims issued by the identity service. A user may act as an
/// employer, a worker, or both; ownership checks happen per row in services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub employer: bool,
    #[serde(default)]
    pub worker: bool,
}

/// Authenticated caller, decoded once in middleware and read from request
/// extensions by handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub employer: bool,
    pub worker: bool,
}

impl CurrentUser {
    pub fn require_employer(&self) -> crate::error::Result<()> {
        if self.employer {
            Ok(())
        } else {
            Err(crate::error::Error::Forbidden(
                "employer account required".to_string(),
            ))
        }
    }

    pub fn require_worker(&self) -> crate::error::Result<()> {
        if self.worker {
            Ok(())
        } else {
            Err(crate::error::Error::Forbidden(
                "worker account required".to_string(),
            ))
        }
    }
}

fn unauthorized(reason: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": reason }))).into_response()
}

pub async fn require_bearer_auth(mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    ) {
        Ok(data) => {
            let Ok(id) = Uuid::parse_str(&data.claims.sub) else {
                return unauthorized("invalid_subject");
            };
            let user = CurrentUser {
                id,
                name: data.claims.name.clone(),
                employer: data.claims.employer,
                worker: data.claims.worker,
            };
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(_) => unauthorized("invalid_token"),
    }
}
