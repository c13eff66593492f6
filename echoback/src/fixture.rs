use crate::{data::CapturedRequest, error::Error};
use serde::Serialize;
use serde_json::Value;
use std::{fmt::Debug, fs, path::Path};

/// One row of a data-driven test: the parameters handed to the operation under
/// test and the logical request it is expected to put on the wire.
#[derive(Debug, Clone)]
pub struct FixtureCase<P, R> {
    pub name: &'static str,
    pub params: P,
    pub expected: R,
}

impl<P, R> FixtureCase<P, R> {
    pub fn new(name: &'static str, params: P, expected: R) -> Self {
        Self {
            name,
            params,
            expected,
        }
    }
}

/// Reads a canned response body from disk.
///
/// # Errors
/// Fails when the file cannot be read.
pub fn load_fixture<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, Error> {
    Ok(fs::read(path)?)
}

/// Collects assertion failures so that one test reports every mismatch at once
/// instead of stopping at the first.
#[derive(Debug, Default)]
#[must_use = "call assert_none() to fail the test on mismatches"]
pub struct Mismatches {
    failures: Vec<String>,
}

impl Mismatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<S: Into<String>>(&mut self, failure: S) {
        self.failures.push(failure.into());
    }

    pub fn check<S: Into<String>>(&mut self, condition: bool, failure: S) {
        if !condition {
            self.record(failure);
        }
    }

    pub fn check_eq<T: PartialEq + Debug + ?Sized>(&mut self, context: &str, got: &T, want: &T) {
        if got != want {
            self.record(format!("{} = {:?}; want = {:?}", context, got, want));
        }
    }

    pub fn check_method(&mut self, context: &str, request: &CapturedRequest, want: &str) {
        if request.method != want {
            self.record(format!(
                "{} Method = {:?}; want = {:?}",
                context, request.method, want
            ));
        }
    }

    pub fn check_path(&mut self, context: &str, request: &CapturedRequest, want: &str) {
        if request.path != want {
            self.record(format!("{} URL = {:?}; want = {:?}", context, request.path, want));
        }
    }

    /// Compares the canonical (key-sorted) query of `request` with `want`.
    pub fn check_query(&mut self, context: &str, request: &CapturedRequest, want: &str) {
        let got = request.canonical_query();
        if got != want {
            self.record(format!("{} query = {:?}; want = {:?}", context, got, want));
        }
    }

    /// Serializes `want` to JSON and compares it byte for byte with the body.
    pub fn check_json_body<T: Serialize>(
        &mut self,
        context: &str,
        request: &CapturedRequest,
        want: &T,
    ) {
        match serde_json::to_vec(want) {
            Ok(want) if want == request.body => {}
            Ok(want) => self.record(format!(
                "{} request = {}; want = {}",
                context,
                request.body_str(),
                String::from_utf8_lossy(&want)
            )),
            Err(e) => self.record(format!("{} couldn't serialize the expectation: {}", context, e)),
        }
    }

    /// Checks that every top-level field of `want` appears in the JSON body with
    /// an equal value. Fields the body has in addition are ignored.
    pub fn check_json_fields(&mut self, context: &str, request: &CapturedRequest, want: &Value) {
        let got: Value = match request.json() {
            Ok(got) => got,
            Err(e) => {
                self.record(format!("{} body is not JSON: {}", context, e));
                return;
            }
        };

        let want = match want.as_object() {
            Some(want) => want,
            None => {
                self.record(format!("{} expectation is not a JSON object", context));
                return;
            }
        };

        for (key, value) in want {
            match got.get(key) {
                Some(got_value) if got_value == value => {}
                got_value => self.record(format!(
                    "{} request({:?}) = {:?}; want = {}",
                    context, key, got_value, value
                )),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn extend(&mut self, other: Mismatches) {
        self.failures.extend(other.failures);
    }

    /// Panics with every recorded mismatch, if there are any.
    #[track_caller]
    pub fn assert_none(self) {
        if !self.failures.is_empty() {
            panic!(
                "{} mismatch(es):\n  {}",
                self.failures.len(),
                self.failures.join("\n  ")
            );
        }
    }
}
