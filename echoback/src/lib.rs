//! An in-process HTTP echo server for testing HTTP client libraries.
//!
//! Every request the server receives is captured and answered with one canned
//! response, so a test can assert exactly what a client put on the wire
//! without a live backend.

mod data;
mod echo_configuration;
mod echo_server;
mod error;
mod fixture;
mod iterator_contract;
mod logging;
mod path_template;
mod runner;

pub use data::CapturedRequest;
pub use echo_configuration::{EchoConfiguration, EchoOptions};
pub use echo_server::EchoServer;
pub use echoback_codegen::echo_test;
pub use error::Error;
pub use fixture::{load_fixture, FixtureCase, Mismatches};
pub use iterator_contract::{verify_iterator_contract, verify_page_queries, PageExpectation};
pub use logging::{init_test_tracing, LOG_ENV};
pub use path_template::PathTemplate;
