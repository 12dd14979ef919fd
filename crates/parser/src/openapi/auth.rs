//! Auth inference from `components.securitySchemes`

use indexmap::IndexMap;
use registry_openapi_common::model::API_KEY_PLACEHOLDER;
use registry_openapi_common::openapi::SecurityScheme;
use registry_openapi_common::AuthDescriptor;
use tracing::debug;

/// Pick the auth descriptor for a provider from its security schemes
///
/// The first scheme that maps to a descriptor wins. Without one, the
/// default `Authorization: {{api-key}}` header is used.
pub fn infer_auth(schemes: &IndexMap<String, SecurityScheme>) -> AuthDescriptor {
    schemes
        .iter()
        .find_map(|(name, scheme)| {
            let auth = auth_from_scheme(scheme);
            match &auth {
                Some(_) => debug!(scheme = name, "Inferred auth from security scheme"),
                None => debug!(
                    scheme = name,
                    scheme_type = %scheme.scheme_type,
                    "Skipping unrecognized security scheme"
                ),
            }
            auth
        })
        .unwrap_or_default()
}

fn auth_from_scheme(scheme: &SecurityScheme) -> Option<AuthDescriptor> {
    match scheme.scheme_type.as_str() {
        "apiKey" => Some(api_key_auth(scheme)),
        "http" => match scheme.scheme.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("basic") => Some(AuthDescriptor::basic()),
            Some("bearer") => Some(AuthDescriptor::bearer()),
            _ => None,
        },
        _ => None,
    }
}

fn api_key_auth(scheme: &SecurityScheme) -> AuthDescriptor {
    let key = scheme
        .name
        .clone()
        .unwrap_or_else(|| "Authorization".to_string());

    match scheme.location.as_deref() {
        Some("query") => AuthDescriptor::query(key, API_KEY_PLACEHOLDER),
        Some("cookie") => AuthDescriptor::cookie(key, API_KEY_PLACEHOLDER),
        Some("header") if key == "Authorization" && mentions_bearer(scheme) => {
            AuthDescriptor::bearer()
        }
        _ => AuthDescriptor::header(key, API_KEY_PLACEHOLDER),
    }
}

fn mentions_bearer(scheme: &SecurityScheme) -> bool {
    scheme
        .description
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains("bearer"))
}
