use crate::{data::CapturedRequest, echo_configuration::EchoConfiguration, error::Error, runner};
use hyper::{body::Bytes, http::request::Parts, Body, HeaderMap, Request, Response, StatusCode};
use std::{
    collections::HashMap,
    convert::Infallible,
    net::{SocketAddr, TcpListener},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread::JoinHandle,
};
use tokio::sync::oneshot;
use tracing::{debug, error};

/// An in-process HTTP server that records every request and answers each one
/// with the same canned response.
///
/// Point the client under test at [`base_url`](EchoServer::base_url), call it,
/// then inspect [`requests`](EchoServer::requests). The listener is released by
/// [`close`](EchoServer::close) or, failing that, when the server is dropped.
///
/// ```no_run
/// use echoback::EchoServer;
///
/// let server = EchoServer::start(r#"{"users":[]}"#)?;
/// // ... drive a client against server.base_url() ...
/// assert_eq!(server.request_count(), 0);
/// server.close()?;
/// # Ok::<(), echoback::Error>(())
/// ```
#[derive(Debug)]
pub struct EchoServer {
    address: SocketAddr,
    base_url: String,
    state: Arc<ServerState>,
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl EchoServer {
    /// Starts a server answering every request with `200 OK` and `response_body`
    /// as JSON.
    ///
    /// # Errors
    /// Fails when the listener cannot be bound or the server thread cannot start.
    pub fn start<B: Into<Bytes>>(response_body: B) -> Result<Self, Error> {
        Self::start_with(EchoConfiguration::json(response_body))
    }

    /// Starts a server from a validated configuration.
    ///
    /// # Errors
    /// Fails when the listener cannot be bound or the server thread cannot start.
    pub fn start_with(configuration: EchoConfiguration) -> Result<Self, Error> {
        let listener = TcpListener::bind(configuration.bind_address())?;
        let address = listener.local_addr()?;
        let state = Arc::new(ServerState::new(configuration));
        let (shutdown, shutdown_signal) = oneshot::channel();

        let join_handle = runner::spawn(listener, state.clone(), shutdown_signal)?;
        debug!(%address, "echo server listening");

        Ok(Self {
            address,
            base_url: format!("http://{}", address),
            state,
            shutdown: Some(shutdown),
            join_handle: Some(join_handle),
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Base URL to inject as the backend endpoint of the client under test.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    /// Snapshot of every request captured so far, in arrival order.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        lock(&self.state.requests).clone()
    }

    pub fn request(&self, index: usize) -> Option<CapturedRequest> {
        lock(&self.state.requests).get(index).cloned()
    }

    pub fn last_request(&self) -> Option<CapturedRequest> {
        lock(&self.state.requests).last().cloned()
    }

    /// Body of the most recent request.
    pub fn last_body(&self) -> Option<Vec<u8>> {
        lock(&self.state.requests)
            .last()
            .map(|request| request.body.clone())
    }

    pub fn request_count(&self) -> usize {
        lock(&self.state.requests).len()
    }

    /// Reports the first failure the server hit while handling a request.
    ///
    /// # Errors
    /// Returns the recorded failure, once.
    pub fn ensure_healthy(&self) -> Result<(), Error> {
        match lock(&self.state.failure).take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Stops the server and releases the listening socket.
    ///
    /// # Errors
    /// Fails when the server thread panicked or a request could not be read.
    pub fn close(mut self) -> Result<(), Error> {
        self.shutdown()?;
        self.ensure_healthy()
    }

    fn shutdown(&mut self) -> Result<(), Error> {
        if let Some(shutdown) = self.shutdown.take() {
            // the server thread may already be gone
            let _ = shutdown.send(());
        }

        if let Some(join_handle) = self.join_handle.take() {
            join_handle.join().map_err(|_| Error::ServerPanicked)?;
            debug!(address = %self.address, "echo server closed");
        }

        Ok(())
    }
}

impl Drop for EchoServer {
    fn drop(&mut self) {
        if let Err(error) = self.shutdown() {
            error!(address = %self.address, %error, "couldn't shut the echo server down");
        }
    }
}

#[derive(Debug)]
pub(crate) struct ServerState {
    configuration: EchoConfiguration,
    requests: Mutex<Vec<CapturedRequest>>,
    failure: Mutex<Option<Error>>,
}

impl ServerState {
    fn new(configuration: EchoConfiguration) -> Self {
        Self {
            configuration,
            requests: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    pub(crate) async fn handle_request(
        &self,
        request: Request<Body>,
    ) -> Result<Response<Body>, Infallible> {
        let (parts, body) = request.into_parts();

        match hyper::body::to_bytes(body).await {
            Ok(body) => {
                let index = self.capture(&parts, body.to_vec());
                debug!(index, method = %parts.method, uri = %parts.uri, "captured request");
                Ok(self.canned_response())
            }
            Err(e) => {
                let index = lock(&self.requests).len();
                error!(index, error = %e, "couldn't read the request body");
                self.set_failure(Error::InvalidBody {
                    index,
                    reason: e.to_string(),
                });

                let mut response = Response::new(Body::empty());
                *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                Ok(response)
            }
        }
    }

    fn capture(&self, parts: &Parts, body: Vec<u8>) -> usize {
        let mut requests = lock(&self.requests);
        let index = requests.len();

        requests.push(CapturedRequest {
            index,
            method: parts.method.to_string(),
            uri: parts.uri.to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(String::from),
            headers: extract_headers(&parts.headers),
            body,
        });

        index
    }

    fn canned_response(&self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.configuration.response_body().clone()));
        *response.status_mut() = self.configuration.status();
        *response.headers_mut() = self.configuration.headers().clone();
        response
    }

    pub(crate) fn set_failure(&self, error: Error) {
        let mut failure = lock(&self.failure);
        // keep the first failure, it is the one the test tripped over
        if failure.is_none() {
            *failure = Some(error);
        }
    }
}

fn extract_headers(header_map: &HeaderMap) -> HashMap<String, String> {
    // values with opaque bytes are dropped
    header_map
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
