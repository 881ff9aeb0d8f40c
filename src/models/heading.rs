// src/models/heading.rs
// =============================================================================
// A heading found in a markdown file.
//
// Links like "guide.md#getting-started" point at a heading by its anchor id.
// The id is either given explicitly ("## Setup {#install}") or derived from
// the heading text the way most markdown renderers do it. Repeated ids in
// one document get a counter: "setup", "setup-1", "setup-2".
// =============================================================================

use crate::models::Location;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    location: Location,
    title: String,
    id: String,
}

impl Heading {
    // An explicit id wins over the slug of the title. One slugger is shared
    // by all headings of a document so repeated titles get distinct ids.
    pub fn new(location: Location, title: impl Into<String>, explicit_id: Option<&str>, slugger: &mut Slugger) -> Self {
        let title = title.into();
        let id = match explicit_id {
            Some(id) if !id.is_empty() => {
                slugger.reserve(id);
                id.to_string()
            }
            _ => slugger.next_id(&title),
        };

        Self { location, title, id }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Turns heading text into an anchor id
///
/// Lowercases, keeps letters, digits, '-' and '_', turns spaces into '-'
/// and drops everything else. "Getting Started!" becomes "getting-started".
pub fn slugify(title: &str) -> String {
    title
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Hands out unique anchor ids within one document
#[derive(Debug, Default)]
pub struct Slugger {
    // lowercased id -> how many times its base slug was repeated
    seen: HashMap<String, usize>,
}

impl Slugger {
    /// The slug of `title`, with "-N" appended if it's already taken
    pub fn next_id(&mut self, title: &str) -> String {
        let base = slugify(title);
        let mut id = base.clone();

        while self.seen.contains_key(&id) {
            let count = self.seen.entry(base.clone()).or_insert(0);
            *count += 1;
            id = format!("{}-{}", base, count);
        }

        self.seen.insert(id.clone(), 0);
        id
    }

    /// Marks an explicit or HTML anchor id as taken
    pub fn reserve(&mut self, id: &str) {
        self.seen.entry(id.to_lowercase()).or_insert(0);
    }
}
