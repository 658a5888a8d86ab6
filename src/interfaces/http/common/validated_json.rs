//! JSON extractor that also runs `validator` rules.
//!
//! Malformed bodies answer 400, rule violations 422 with the field
//! messages joined in the envelope.

use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiError;

/// Like `axum::Json<T>`, but the value has passed `Validate::validate`
pub struct ValidatedJson<T>(pub T);

fn malformed(rejection: JsonRejection) -> ApiError {
    ApiError::new(
        StatusCode::BAD_REQUEST,
        format!("Solicitud inválida: {}", rejection.body_text()),
    )
}

/// Rule messages ordered by field name; the code stands in for a missing message
fn invalid(errors: ValidationErrors) -> ApiError {
    let by_field: BTreeMap<_, _> = errors.field_errors().into_iter().collect();
    let messages: Vec<String> = by_field
        .values()
        .flat_map(|errs| errs.iter())
        .map(|e| match &e.message {
            Some(message) => message.to_string(),
            None => format!("Valor inválido: {}", e.code),
        })
        .collect();

    let message = if messages.is_empty() {
        "Datos inválidos".to_string()
    } else {
        messages.join("; ")
    };
    ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, message)
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(malformed)?;
        value.validate().map_err(invalid)?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    use crate::domain::trabajador::NewTrabajador;

    async fn handler(ValidatedJson(body): ValidatedJson<NewTrabajador>) -> String {
        body.nombre_apellidos
    }

    fn app() -> Router {
        Router::new().route("/personal", post(handler))
    }

    async fn send(req: Request<Body>) -> axum::http::Response<Body> {
        app().oneshot(req).await.unwrap()
    }

    #[tokio::test]
    async fn valid_body_returns_ok() {
        let body = serde_json::json!({"nombreApellidos": "Ana Ruiz", "numeroDocumento": "1020"});
        let req = Request::builder()
            .method("POST")
            .uri("/personal")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        let resp = send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_json_returns_400() {
        let req = Request::builder()
            .method("POST")
            .uri("/personal")
            .header("content-type", "application/json")
            .body(Body::from("not json"))
            .unwrap();

        let resp = send(req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn validation_failure_returns_422() {
        let body = serde_json::json!({"nombreApellidos": "Ana", "numeroDocumento": "1", "genero": "X"});
        let req = Request::builder()
            .method("POST")
            .uri("/personal")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        let resp = send(req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn rule_messages_reach_the_envelope() {
        let body = serde_json::json!({"nombreApellidos": "", "numeroDocumento": ""});
        let req = Request::builder()
            .method("POST")
            .uri("/personal")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();

        let resp = send(req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json["error"],
            "El nombre es obligatorio; El número de documento es obligatorio"
        );
    }
}
