//! In-process transport that answers from canned responses.
//!
//! Routes are keyed by method and target. Each route holds a queue of
//! responses; the last one repeats once the queue is drained. Every request
//! is recorded so tests can assert on what was (or was not) sent.

use school_console::{HttpRequest, HttpResponse, Method, Transport, TransportError};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Route {
    method: Method,
    target: String,
    responses: VecDeque<Result<HttpResponse, String>>,
}

#[derive(Debug, Default)]
struct MockState {
    routes: Vec<Route>,
    requests: Vec<HttpRequest>,
}

/// Cloneable handle; clones share routes and the request log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method target`.
    pub fn on(&self, method: Method, target: &str, response: HttpResponse) -> &Self {
        self.push(method, target, Ok(response))
    }

    /// Queue a transport failure for `method target`.
    pub fn fail(&self, method: Method, target: &str, message: &str) -> &Self {
        self.push(method, target, Err(message.to_string()))
    }

    fn push(&self, method: Method, target: &str, response: Result<HttpResponse, String>) -> &Self {
        let mut state = self.state.lock().unwrap();
        match state
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.target == target)
        {
            Some(route) => route.responses.push_back(response),
            None => state.routes.push(Route {
                method,
                target: target.to_string(),
                responses: VecDeque::from([response]),
            }),
        }
        self
    }

    /// Drop all queued responses for `method target`.
    pub fn reset_route(&self, method: Method, target: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .routes
            .retain(|r| !(r.method == method && r.target == target));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Number of requests sent to `method target`.
    pub fn count(&self, method: Method, target: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.method == method && r.target == target)
            .count()
    }

    /// Most recent request sent to `method target`.
    pub fn last(&self, method: Method, target: &str) -> Option<HttpRequest> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .rev()
            .find(|r| r.method == method && r.target == target)
            .cloned()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    fn respond(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut state = self.state.lock().unwrap();
        let method = request.method;
        let target = request.target.clone();
        state.requests.push(request);

        let Some(route) = state
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.target == target)
        else {
            return Ok(HttpResponse::new(404, format!("no route for {} {}", method, target)));
        };

        let response = if route.responses.len() > 1 {
            route.responses.pop_front()
        } else {
            route.responses.front().cloned()
        };
        match response {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::unavailable(message)),
            None => Ok(HttpResponse::new(404, "route drained")),
        }
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let result = self.respond(request);
        async move { result }
    }
}
