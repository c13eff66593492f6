//! Contract checks for cursor-paginated listings.
//!
//! A listing iterator yields `Some(Ok(item))` per item, `Some(Err(_))` on a
//! fault and `None` once the backend has no more pages. After the first `None`
//! it keeps returning `None` without talking to the backend again.

use crate::{echo_server::EchoServer, fixture::Mismatches};
use std::fmt::{Debug, Display};

/// How many times `next()` is called again after the terminal signal.
const EXHAUSTED_CALLS: usize = 2;

/// What the last request of a listing walk should look like.
#[derive(Debug, Clone, Copy)]
pub struct PageExpectation<'a> {
    /// Resource path of every page request.
    pub path: &'a str,
    /// Canonical query of the final page request.
    pub query: &'a str,
}

/// Drives `iter` for exactly `expected.len()` items and checks the listing
/// contract against the requests `server` captured.
///
/// Checked, in order: each item equals its counterpart in `expected`; the
/// iterator then reports exhaustion exactly once and stays exhausted; no HTTP
/// request is issued once the expected items were yielded; the last request
/// hit `expectation.path` with `expectation.query`. A fault from the iterator stops the walk.
pub fn verify_iterator_contract<I, T, E>(
    context: &str,
    server: &EchoServer,
    mut iter: I,
    expected: &[T],
    expectation: PageExpectation<'_>,
) -> Mismatches
where
    I: Iterator<Item = Result<T, E>>,
    T: PartialEq + Debug,
    E: Display,
{
    let mut mismatches = Mismatches::new();
    let mut count = 0;

    for want in expected {
        match iter.next() {
            Some(Ok(got)) => {
                mismatches.check_eq(&format!("{} item #{}", context, count), &got, want);
                count += 1;
            }
            Some(Err(e)) => {
                mismatches.record(format!("{} item #{} failed: {}", context, count, e));
                return mismatches;
            }
            None => break,
        }
    }

    if count != expected.len() {
        mismatches.record(format!("{} = {} items; want = {}", context, count, expected.len()));
    }

    let requests_at_exhaustion = server.request_count();
    match iter.next() {
        None => {}
        Some(Ok(extra)) => mismatches.record(format!(
            "{} yielded {:?} past the end; want = exhausted",
            context, extra
        )),
        Some(Err(e)) => mismatches.record(format!(
            "{} = {}; want = exhausted",
            context, e
        )),
    }

    for call in 0..EXHAUSTED_CALLS {
        if iter.next().is_some() {
            mismatches.record(format!(
                "{} left the exhausted state on extra call #{}",
                context, call
            ));
        }
    }
    mismatches.check_eq(
        &format!("{} requests after exhaustion", context),
        &server.request_count(),
        &requests_at_exhaustion,
    );

    match server.last_request() {
        Some(request) => {
            mismatches.check_path(context, &request, expectation.path);
            mismatches.check_query(context, &request, expectation.query);
        }
        None => mismatches.record(format!("{} issued no request", context)),
    }

    mismatches
}

/// Checks the canonical queries of the page requests captured from index
/// `first` onwards, one entry of `queries` per page.
pub fn verify_page_queries(
    context: &str,
    server: &EchoServer,
    first: usize,
    queries: &[&str],
) -> Mismatches {
    let mut mismatches = Mismatches::new();
    let requests = server.requests();
    let pages = requests.get(first..).unwrap_or_default();

    mismatches.check_eq(&format!("{} page requests", context), &pages.len(), &queries.len());

    for (page, (request, want)) in pages.iter().zip(queries).enumerate() {
        mismatches.check_query(&format!("{} page #{}", context, page), request, want);
    }

    mismatches
}
