use crate::utils::error::{AppError, FieldErrors};
use indexmap::IndexMap;
use okapi::openapi3::SchemaObject;
use rocket::http::Status;
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::RefOr;
use rocket_okapi::okapi::openapi3::{MediaType, Response, Responses};
use rocket_okapi::response::OpenApiResponderInner;
use serde_json::json;

impl OpenApiResponderInner for AppError {
    fn responses(_gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        let mut responses = Responses::default();

        let mut example_fields = FieldErrors::new();
        example_fields.insert(
            "contact_email".to_string(),
            vec!["must be a valid email".to_string()],
        );

        let error_responses = [
            (Status::BadRequest, "Bad Request", AppError::BadRequest("Bad Request".to_string())),
            (Status::Unauthorized, "Unauthorized", AppError::AuthError("Unauthorized".to_string())),
            (Status::Forbidden, "Forbidden", AppError::Forbidden("Forbidden".to_string())),
            (Status::NotFound, "Not Found", AppError::NotFound("Not Found".to_string())),
            (Status::Conflict, "Conflict", AppError::Conflict("Conflict".to_string())),
            (Status::UnprocessableEntity, "Invalid Input", AppError::InvalidFields(example_fields)),
            (Status::InternalServerError, "Internal Server Error", AppError::DatabaseError("Internal Server Error".to_string())),
        ];

        for (status, description, error) in error_responses {
            let example = match &error {
                AppError::InvalidFields(fields) => json!({
                    "error": error.to_string(),
                    "fields": fields,
                }),
                _ => json!({
                    "error": error.to_string()
                }),
            };

            responses.responses.insert(
                status.code.to_string(),
                RefOr::Object(Response {
                    description: description.to_string(),
                    content: {
                        let mut content = IndexMap::new();
                        content.insert(
                            "application/json".to_string(),
                            MediaType {
                                schema: Some(SchemaObject::default()),
                                example: Some(example),
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
