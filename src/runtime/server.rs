//! Local preview server.
//!
//! Serves a Fezz function over plain HTTP the way Netlify would: every
//! request is turned into a Lambda proxy event, run through the
//! [`LambdaAdapter`], and the invocation result is turned back into an
//! HTTP response.

use crate::function::{FezzError, FezzFunction, FunctionContext};
use crate::http::{FezzResponse, StatusCode};
use crate::lambda::adapter::to_result;
use crate::lambda::{body, LambdaAdapter, LambdaEvent, LambdaResult};
use crate::ordered::OrderedMap;
use crate::runtime::PreviewConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;

/// Preview server for one Fezz function.
pub struct PreviewServer {
    /// Server configuration.
    config: PreviewConfig,
    /// The loaded function.
    adapter: LambdaAdapter,
}

impl PreviewServer {
    /// Load the function and create the server.
    pub async fn new(
        config: PreviewConfig,
        function: Box<dyn FezzFunction>,
    ) -> Result<Self, FezzError> {
        let context = FunctionContext::new(function.name(), "").with_env(config.env.clone());
        let adapter = LambdaAdapter::load(function, context).await?;
        Ok(Self { config, adapter })
    }

    /// Get the adapter serving requests.
    pub fn adapter(&self) -> &LambdaAdapter {
        &self.adapter
    }

    /// Bind the configured address and start the HTTP server.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!(
            "Preview server for '{}' listening on http://{}",
            self.adapter.name(),
            listener.local_addr()?
        );

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);

            let adapter = self.adapter.clone();
            let config = self.config.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let adapter = adapter.clone();
                    let config = config.clone();
                    async move { handle_request(req, adapter, config, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Handle an incoming HTTP request.
async fn handle_request(
    req: Request<Incoming>,
    adapter: LambdaAdapter,
    config: PreviewConfig,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    debug!("Handling request: {} {} from {}", req.method(), req.uri(), remote_addr);

    if config.enable_health && req.uri().path() == "/_health" {
        return Ok(build_response(to_result(FezzResponse::text("OK"))));
    }

    let event = match convert_request(req, &config).await {
        Ok(event) => event,
        Err(response) => return Ok(build_response(to_result(response))),
    };

    let result = match adapter.invoke(event).await {
        Ok(result) => result,
        Err(e) => {
            error!("Function '{}' error: {}", adapter.name(), e);
            to_result(e.into())
        }
    };
    Ok(build_response(result))
}

/// Convert a hyper request into a Lambda proxy event.
async fn convert_request(
    req: Request<Incoming>,
    config: &PreviewConfig,
) -> Result<LambdaEvent, FezzResponse> {
    let (parts, incoming) = req.into_parts();

    let mut headers = OrderedMap::new();
    let mut multi_value_headers: OrderedMap<Vec<String>> = OrderedMap::new();
    for (name, value) in &parts.headers {
        let Ok(value) = value.to_str() else {
            warn!("Dropping non-ASCII header: {}", name);
            continue;
        };
        headers.insert(name.as_str(), value.to_string());
        match multi_value_headers.get_mut(name.as_str()) {
            Some(values) => values.push(value.to_string()),
            None => {
                multi_value_headers.insert(name.as_str(), vec![value.to_string()]);
            }
        }
    }

    let mut query = OrderedMap::new();
    let mut multi_value_query: OrderedMap<Vec<String>> = OrderedMap::new();
    for (name, value) in form_urlencoded::parse(parts.uri.query().unwrap_or_default().as_bytes()) {
        query.insert(&*name, value.to_string());
        match multi_value_query.get_mut(&name) {
            Some(values) => values.push(value.into_owned()),
            None => {
                multi_value_query.insert(name.into_owned(), vec![value.into_owned()]);
            }
        }
    }

    let body_bytes = match Limited::new(incoming, config.max_body_size).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            warn!("Rejecting {} body over {} bytes", parts.uri.path(), config.max_body_size);
            return Err(FezzResponse::error(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large",
            ));
        }
        Err(e) => return Err(FezzResponse::error(StatusCode::BAD_REQUEST, e.to_string())),
    };
    let (body, is_base64_encoded) = if body_bytes.is_empty() {
        (None, false)
    } else {
        match std::str::from_utf8(&body_bytes) {
            Ok(text) => (Some(text.to_string()), false),
            Err(_) => (Some(STANDARD.encode(&body_bytes)), true),
        }
    };

    Ok(LambdaEvent {
        path: parts.uri.path().to_string(),
        http_method: Some(parts.method.to_string()),
        headers: Some(headers),
        multi_value_headers: Some(multi_value_headers),
        query_string_parameters: Some(query),
        multi_value_query_string_parameters: Some(multi_value_query),
        body,
        is_base64_encoded,
    })
}

/// Build a hyper response from an invocation result.
fn build_response(result: LambdaResult) -> Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(result.status_code).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            result.status_code
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let payload = if result.is_base64_encoded {
        match body::decode(&result.body) {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                error!("Function returned an invalid base64 body: {}", e);
                return plain_response(hyper::StatusCode::BAD_GATEWAY, "Invalid function response");
            }
        }
    } else {
        Bytes::from(result.body)
    };

    let mut builder = Response::builder().status(status);
    for (name, value) in result.headers.iter() {
        builder = builder.header(name, value);
    }

    builder.body(Full::new(payload)).unwrap_or_else(|e| {
        error!("Invalid response headers: {}", e);
        plain_response(hyper::StatusCode::BAD_GATEWAY, "Invalid function response")
    })
}

fn plain_response(status: hyper::StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(message.as_bytes())));
    *response.status_mut() = status;
    response
}
