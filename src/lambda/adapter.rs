//! Translation between Netlify invocations and Fezz functions.
//!
//! One invocation moves through three states: the event is received and
//! normalized into a [`FezzRequest`], the request is dispatched to the
//! function, and the [`FezzResponse`] is re-serialized into a
//! [`LambdaResult`]. Application errors are returned unchanged so the
//! platform reports them as function errors.

use crate::function::{FezzError, FezzFunction, FunctionContext};
use crate::http::{FezzRequest, FezzResponse, Method, Query, QueryValue};
use crate::lambda::body;
use crate::lambda::event::{LambdaEvent, LambdaResult};
use crate::lambda::headers;
use std::sync::Arc;
use tracing::debug;
use url::form_urlencoded;
use uuid::Uuid;

/// Merge single- and multi-valued query maps; multi-valued entries win.
pub fn merge_query(event: &LambdaEvent) -> Query {
    let mut query = Query::new();
    if let Some(single) = &event.query_string_parameters {
        for (name, value) in single.iter() {
            query.insert(name, QueryValue::Single(value.clone()));
        }
    }
    if let Some(multi) = &event.multi_value_query_string_parameters {
        for (name, values) in multi.iter() {
            query.insert(name, QueryValue::Multi(values.clone()));
        }
    }
    query
}

/// Append a query to a path. Repeated values become repeated pairs.
pub fn with_query(path: &str, query: &Query) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in query.iter() {
        for v in value.values() {
            serializer.append_pair(name, v);
        }
    }
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{}", serializer.finish())
}

/// Normalize an inbound event into a Fezz request.
pub fn to_request(event: LambdaEvent) -> FezzRequest {
    let query = merge_query(&event);
    let url = with_query(&event.path, &query);
    let headers = headers::to_canonical(event.headers.as_ref(), event.multi_value_headers.as_ref());
    let method = event
        .http_method
        .as_deref()
        .map(Method::from_name)
        .unwrap_or_default();

    FezzRequest {
        method,
        path: event.path,
        url,
        headers,
        query,
        body: event.body,
    }
}

/// Serialize a Fezz response into an invocation result.
pub fn to_result(response: FezzResponse) -> LambdaResult {
    let encoded = body::encode(&response.body);
    LambdaResult {
        status_code: response.status.0,
        headers: headers::from_canonical(&response.headers),
        multi_value_headers: None,
        body: encoded.payload,
        is_base64_encoded: encoded.is_binary,
    }
}

/// Handle one invocation.
pub async fn handle(
    function: &dyn FezzFunction,
    event: LambdaEvent,
    ctx: &FunctionContext,
) -> Result<LambdaResult, FezzError> {
    debug!(
        "Received {} {} [{}]",
        event.http_method.as_deref().unwrap_or("GET"),
        event.path,
        ctx.request_id
    );
    let ctx = ctx.for_invocation(&ctx.request_id, event.is_base64_encoded);
    let request = to_request(event);

    debug!("Dispatching to '{}' [{}]", function.name(), ctx.request_id);
    let response = function.fetch(request, &ctx).await?;

    let result = to_result(response);
    debug!(
        "Responded {} (base64: {}) [{}]",
        result.status_code, result.is_base64_encoded, ctx.request_id
    );
    Ok(result)
}

/// A loaded Fezz function ready to serve invocations.
#[derive(Clone)]
pub struct LambdaAdapter {
    function: Arc<dyn FezzFunction>,
    context: FunctionContext,
}

impl LambdaAdapter {
    /// Load the function and wrap it. Runs `on_load` once.
    pub async fn load(
        mut function: Box<dyn FezzFunction>,
        context: FunctionContext,
    ) -> Result<Self, FezzError> {
        function.on_load(&context).await?;
        debug!("Loaded function '{}'", function.name());
        Ok(Self {
            function: Arc::from(function),
            context,
        })
    }

    /// Function name.
    pub fn name(&self) -> &str {
        self.function.name()
    }

    /// Handle one invocation with a fresh request ID.
    pub async fn invoke(&self, event: LambdaEvent) -> Result<LambdaResult, FezzError> {
        self.invoke_with_id(event, &generate_request_id()).await
    }

    /// Handle one invocation with the platform's request ID.
    pub async fn invoke_with_id(
        &self,
        event: LambdaEvent,
        request_id: &str,
    ) -> Result<LambdaResult, FezzError> {
        let ctx = self.context.for_invocation(request_id, false);
        handle(self.function.as_ref(), event, &ctx).await
    }
}

impl std::fmt::Debug for LambdaAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LambdaAdapter")
            .field("function", &self.function.name())
            .field("context", &self.context)
            .finish()
    }
}

/// Request ID for invocations the platform did not name.
fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
