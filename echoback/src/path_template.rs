use crate::error::Error;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex =
        Regex::new(r"\{(?P<name>[A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid");
}

/// A resource path with `{name}` placeholders, such as
/// `/projects/{project}/tenants/{tenant}/accounts:lookup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    template: String,
}

impl PathTemplate {
    pub fn new<S: Into<String>>(template: S) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Names of the placeholders in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        PLACEHOLDER_REGEX
            .captures_iter(&self.template)
            .filter_map(|captures| captures.name("name"))
            .map(|name| name.as_str())
            .collect()
    }

    /// Substitutes every placeholder with its value from `values`.
    ///
    /// # Errors
    /// Fails on the first placeholder without a value.
    pub fn expand<'a, I>(&self, values: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let values: HashMap<&str, &str> = values.into_iter().collect();

        if let Some(missing) = self
            .placeholders()
            .into_iter()
            .find(|name| !values.contains_key(name))
        {
            return Err(Error::UnresolvedPlaceholder(missing.to_string()));
        }

        Ok(PLACEHOLDER_REGEX
            .replace_all(&self.template, |captures: &Captures| {
                values
                    .get(&captures["name"])
                    .map(|value| value.to_string())
                    .unwrap_or_default()
            })
            .into_owned())
    }
}

impl From<&str> for PathTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}
