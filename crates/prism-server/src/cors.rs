use axum::body::Body;
use axum::response::Response;
use http::Method;
use http::header::{self, HeaderName, HeaderValue};
use prism_config::{AnyOrArray, CorsConfig};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer from configuration
///
/// Browsers reject `*` on credentialed requests, so wildcards are answered by
/// mirroring the request's origin, method and headers when credentials are on.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mirror = config.credentials;
    let mut layer = CorsLayer::new();

    // Origins
    layer = match &config.origins {
        AnyOrArray::Any if mirror => layer.allow_origin(AllowOrigin::mirror_request()),
        AnyOrArray::Any => layer.allow_origin(AllowOrigin::any()),
        AnyOrArray::List(origins) => {
            let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            layer.allow_origin(origins)
        }
    };

    // Methods
    layer = match &config.methods {
        AnyOrArray::Any if mirror => layer.allow_methods(AllowMethods::mirror_request()),
        AnyOrArray::Any => layer.allow_methods(AllowMethods::any()),
        AnyOrArray::List(methods) => {
            let methods: Vec<Method> = methods.iter().filter_map(|m| m.parse().ok()).collect();
            layer.allow_methods(methods)
        }
    };

    // Headers
    layer = match &config.headers {
        AnyOrArray::Any if mirror => layer.allow_headers(AllowHeaders::mirror_request()),
        AnyOrArray::Any => layer.allow_headers(AllowHeaders::any()),
        AnyOrArray::List(headers) => {
            let headers: Vec<HeaderName> = headers.iter().filter_map(|h| h.parse().ok()).collect();
            layer.allow_headers(headers)
        }
    };

    // Expose headers
    if !config.expose_headers.is_empty() {
        let headers: Vec<HeaderName> = config.expose_headers.iter().filter_map(|h| h.parse().ok()).collect();
        layer = layer.expose_headers(headers);
    }

    // Credentials
    if config.credentials {
        layer = layer.allow_credentials(true);
    }

    // Max age
    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}

/// Give `OPTIONS` responses answered by the CORS layer the route's `{}` body
pub async fn json_options_body(method: Method, response: Response) -> Response {
    if method != Method::OPTIONS
        || !response.status().is_success()
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Response::from_parts(parts, Body::from("{}"))
}
