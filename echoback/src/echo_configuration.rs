use crate::error::Error;
use hyper::{
    body::Bytes,
    header::{HeaderName, HeaderValue, CONTENT_TYPE},
    HeaderMap, StatusCode,
};
use std::net::{Ipv4Addr, SocketAddr};

/// Optional knobs for an echo server. Every `None` falls back to a default.
#[derive(Debug, Clone, Default)]
pub struct EchoOptions {
    /// Status of every canned response. Defaults to `200`.
    pub status_code: Option<u16>,
    /// Headers of every canned response. Defaults to `content-type: application/json`.
    pub headers: Option<Vec<(String, String)>>,
    /// Address to bind. Defaults to an ephemeral port on the loopback interface.
    pub bind_address: Option<SocketAddr>,
}

/// A validated echo server configuration.
#[derive(Debug, Clone)]
pub struct EchoConfiguration {
    response_body: Bytes,
    status: StatusCode,
    headers: HeaderMap,
    bind_address: SocketAddr,
}

impl EchoConfiguration {
    /// Validates `options` and pairs them with the canned response body.
    ///
    /// # Errors
    /// Fails when the status code is outside `100..=999` or a header name or
    /// value is not valid HTTP.
    pub fn new<B: Into<Bytes>>(response_body: B, options: EchoOptions) -> Result<Self, Error> {
        let status = match options.status_code {
            Some(code) => StatusCode::from_u16(code).map_err(|_| Error::InvalidStatusCode(code))?,
            None => StatusCode::OK,
        };

        let headers = match options.headers {
            Some(pairs) => {
                let mut headers = HeaderMap::new();
                for (name, value) in &pairs {
                    let name = HeaderName::from_lowercase(name.to_lowercase().as_bytes())?;
                    headers.append(name, HeaderValue::from_str(value)?);
                }
                headers
            }
            None => default_headers(),
        };

        Ok(Self {
            response_body: response_body.into(),
            status,
            headers,
            bind_address: options.bind_address.unwrap_or_else(default_bind_address),
        })
    }

    /// A `200 OK` JSON configuration on an ephemeral loopback port, the same
    /// as `new` with default options.
    pub fn json<B: Into<Bytes>>(response_body: B) -> Self {
        Self {
            response_body: response_body.into(),
            status: StatusCode::OK,
            headers: default_headers(),
            bind_address: default_bind_address(),
        }
    }

    pub fn response_body(&self) -> &Bytes {
        &self.response_body
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
}
