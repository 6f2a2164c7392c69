use gamehub_core::{ApiResponse, Method, Outbound, TransportError};
use gloo::net::http::Request;

fn transport_error(err: gloo::net::Error) -> TransportError {
    TransportError::new(err.to_string())
}

/// Performs one request over `fetch`. Statuses are left to the session to
/// interpret; only failures to get any response become errors here.
pub(crate) async fn send(api_url: &str, outbound: &Outbound) -> Result<ApiResponse, TransportError> {
    let url = outbound.request.url(api_url);
    let (name, value) = outbound.header();
    log::debug!("{:?} {}", outbound.request.method(), url);

    let builder = match outbound.request.method() {
        Method::Get => Request::get(&url),
        Method::Post => Request::post(&url),
    }
    .header(name, value);
    let request = match &outbound.request.body {
        Some(body) => builder.json(body),
        None => builder.build(),
    }
    .map_err(transport_error)?;

    let response = request.send().await.map_err(transport_error)?;
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;
    log::trace!("{} answered {}", url, status);

    Ok(ApiResponse::new(status, body))
}
