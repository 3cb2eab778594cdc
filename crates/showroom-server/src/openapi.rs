use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Showroom API",
        version = "0.1.0",
        description = "Car dealership backend: listing catalogue and storefront notifications."
    ),
    paths(
        crate::routes::list_listings,
        crate::routes::get_listing,
        crate::routes::create_listing,
        crate::routes::send_email,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::CreateListingRequest,
        crate::dto::ListingResponse,
        crate::dto::SendEmailRequest,
        crate::dto::SendEmailResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "listings", description = "Car listing catalogue"),
        (name = "notifications", description = "Contact and order emails"),
        (name = "system", description = "Health and system status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds the admin Bearer token scheme to the OpenAPI document.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("token")
                        .description(Some(
                            "Admin token. Set via SHOWROOM_ADMIN_TOKEN environment variable.",
                        ))
                        .build(),
                ),
            );
        }
    }
}
