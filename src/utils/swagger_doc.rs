use crate::utils::error::AppError;
use indexmap::IndexMap;
use okapi::openapi3::SchemaObject;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::RefOr;
use rocket_okapi::okapi::openapi3::{MediaType, Response, Responses};
use rocket_okapi::response::OpenApiResponderInner;
use rocket_okapi::swagger_ui::SwaggerUIConfig;
use serde_json::json;

impl<'r> OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();

        // Every error variant shares the same `{ "error": ... }` body
        let error_responses = [
            ("Bad Request", AppError::ValidationError("Bad Request".to_string())),
            ("Unauthorized", AppError::AuthError("Unauthorized".to_string())),
            ("Forbidden", AppError::Forbidden("Forbidden".to_string())),
            ("NotFound", AppError::NotFound("Not Found".to_string())),
            ("Conflict", AppError::Conflict("Conflict".to_string())),
            ("InternalServerError", AppError::DatabaseError("Internal Server Error".to_string())),
            ("Unprocessable", AppError::Unprocessable("Unprocessable".to_string())),
        ];

        for (description, error) in error_responses {
            responses.responses.insert(
                error.status().code.to_string(),
                RefOr::Object(Response {
                    description: description.to_string(),
                    content: {
                        let mut content = IndexMap::new();
                        content.insert(
                            "application/json".to_string(),
                            MediaType {
                                schema: Some(SchemaObject::default()),
                                example: Some(json!({
                                    "error": error.to_string()
                                })),
                                ..Default::default()
                            },
                        );
                        content
                    },
                    ..Default::default()
                }),
            );
        }

        Ok(responses)
    }
}

pub fn swagger_ui() -> SwaggerUIConfig {
    SwaggerUIConfig {
        url: "/api/openapi.json".to_string(),
        deep_linking: true,
        display_request_duration: true,
        ..Default::default()
    }
}
