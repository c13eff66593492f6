use crate::error::Error;
use std::{collections::VecDeque, fmt, iter::FusedIterator};

/// One page of a listing endpoint.
#[derive(Debug)]
pub(crate) struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    HasMore,
    Exhausted,
}

/// Walks a cursor-paginated listing one item at a time, fetching pages lazily.
///
/// `None` marks exhaustion; a failed page fetch is returned once as
/// `Some(Err(_))` and ends the walk. Once exhausted the iterator never issues
/// another request.
pub struct PageIterator<'a, T> {
    fetch: Box<dyn FnMut(&str) -> Result<Page<T>, Error> + 'a>,
    page_token: String,
    buffer: VecDeque<T>,
    state: State,
}

impl<'a, T> PageIterator<'a, T> {
    /// `page_token` is the cursor of the first page to fetch; empty means the
    /// start of the listing.
    pub(crate) fn new<F>(page_token: &str, fetch: F) -> Self
    where
        F: FnMut(&str) -> Result<Page<T>, Error> + 'a,
    {
        Self {
            fetch: Box::new(fetch),
            page_token: page_token.to_string(),
            buffer: VecDeque::new(),
            state: State::HasMore,
        }
    }

    /// Cursor of the next page to fetch, empty once the last page was fetched.
    pub fn page_token(&self) -> &str {
        &self.page_token
    }

    /// Items fetched but not yet yielded.
    pub fn remaining(&self) -> usize {
        self.buffer.len()
    }
}

impl<'a, T> Iterator for PageIterator<'a, T> {
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }

            if self.state == State::Exhausted {
                return None;
            }

            match (self.fetch)(&self.page_token) {
                Ok(page) => {
                    if page.next_page_token.is_empty() {
                        self.state = State::Exhausted;
                    }
                    self.page_token = page.next_page_token;
                    self.buffer.extend(page.items);
                }
                Err(e) => {
                    self.state = State::Exhausted;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<'a, T> FusedIterator for PageIterator<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for PageIterator<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageIterator")
            .field("page_token", &self.page_token)
            .field("buffer", &self.buffer)
            .field("state", &self.state)
            .finish()
    }
}
