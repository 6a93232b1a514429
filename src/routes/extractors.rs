use std::ops::Deref;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body whose type errors name the offending field.
///
/// The payload is read through `web::Json`, so the registered `JsonConfig` still
/// handles content type, size limit and syntax errors. The parsed document is then
/// mapped onto `T` while tracking the path, giving messages such as
/// `completed: invalid type: string "yes", expected a boolean`.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for JsonBody<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for JsonBody<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let document = web::Json::<serde_json::Value>::from_request(req, payload);

        Box::pin(async move {
            let web::Json(value) = document.await?;
            serde_path_to_error::deserialize(value)
                .map(JsonBody)
                .map_err(|err| {
                    actix_web::Error::from(AppError::ValidationError(format!(
                        "Invalid request body: {}",
                        err
                    )))
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskCreate, TaskUpdate};
    use actix_web::test::TestRequest;

    async fn extract<T: DeserializeOwned + 'static>(
        body: serde_json::Value,
    ) -> Result<JsonBody<T>, actix_web::Error> {
        let (req, mut payload) = TestRequest::post().set_json(&body).to_http_parts();
        JsonBody::<T>::from_request(&req, &mut payload).await
    }

    #[actix_rt::test]
    async fn test_valid_body_is_extracted() {
        let body = extract::<TaskCreate>(serde_json::json!({ "text": "Buy milk", "list_id": 4 }))
            .await
            .unwrap();

        assert_eq!(body.text, "Buy milk");
        assert_eq!(body.into_inner().list_id, 4);
    }

    #[actix_rt::test]
    async fn test_type_error_names_the_field() {
        let err = extract::<TaskUpdate>(serde_json::json!({ "completed": "yes" }))
            .await
            .unwrap_err();

        assert_eq!(err.as_response_error().status_code(), 422);
        assert!(err.to_string().contains("completed"), "{}", err);
    }
}
