//! JSON body extractor that runs `validator` rules before the handler.
//!
//! A body that cannot be decoded is a `BadRequest`; a decoded body that
//! breaks a rule is a `Validation` error listing every broken rule.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::errors::AppError;

/// Extractor for request bodies carrying `#[derive(Validate)]` rules.
///
/// ```ignore
/// use merch_api::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct AddItemRequest {
///     #[validate(length(min = 1))]
///     product_id: String,
///     #[validate(range(min = 1))]
///     quantity: i32,
/// }
///
/// async fn add_item(ValidatedJson(payload): ValidatedJson<AddItemRequest>) {}
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(describe(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// One message per broken rule, ordered by field name.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Item {
        #[validate(length(min = 1, message = "Product id is required"))]
        product_id: String,
        #[validate(range(min = 1))]
        quantity: i32,
    }

    fn request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let ValidatedJson(item) =
            ValidatedJson::<Item>::from_request(request(r#"{"product_id":"prd1","quantity":2}"#), &())
                .await
                .unwrap();
        assert_eq!(item.product_id, "prd1");
        assert_eq!(item.quantity, 2);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let result = ValidatedJson::<Item>::from_request(request("{not json"), &()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_rule_violations_are_listed() {
        let result =
            ValidatedJson::<Item>::from_request(request(r#"{"product_id":"","quantity":0}"#), &())
                .await;
        match result {
            Err(AppError::Validation(message)) => {
                assert_eq!(message, "Product id is required, quantity is invalid");
            }
            _ => panic!("expected a validation error"),
        }
    }
}
