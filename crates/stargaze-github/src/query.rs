//! Structured GraphQL query composition.
//!
//! A bulk lookup asks GitHub for N independent repositories in one document.
//! GraphQL responses are keyed by field name, so every lookup is addressed
//! under a synthetic alias (`repository0`, `repository1`, ...) derived from
//! its position in the input. Owner and name never enter the query text; they
//! travel as typed variables, so no input can change the shape of the document.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::RepositoryReference;

/// Fields requested for every aliased repository.
const REPOSITORY_SELECTION: &str = "owner { login } name stargazers { totalCount }";

/// Fields requested for the rate limit.
const RATE_LIMIT_SELECTION: &str = "remaining limit resetAt";

/// Position-derived field alias, unique within one batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alias(usize);

impl Alias {
    /// Alias for the reference at `index` in the caller's input.
    #[must_use]
    pub const fn indexed(index: usize) -> Self {
        Self(index)
    }

    /// Position in the caller's input.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "repository{}", self.0)
    }
}

/// A repository reference paired with its alias for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Synthetic field name the response is keyed by.
    pub alias: Alias,

    /// The reference as supplied by the caller.
    pub reference: RepositoryReference,
}

impl Cue {
    /// Assign an alias to every reference by position. Duplicates get their
    /// own alias.
    #[must_use]
    pub fn assign(references: &[RepositoryReference]) -> Vec<Self> {
        references
            .iter()
            .enumerate()
            .map(|(index, reference)| Self {
                alias: Alias::indexed(index),
                reference: reference.clone(),
            })
            .collect()
    }
}

/// One selection in the root of a query document.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    Repository(Alias),
    RateLimit,
}

/// Serialized request body for the GraphQL endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    /// Query document text.
    pub query: String,

    /// Variable values referenced by the document.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub variables: Map<String, Value>,
}

/// A query document assembled from typed fragments.
#[derive(Debug, Clone)]
pub struct QueryDocument {
    operation: &'static str,
    fragments: Vec<Fragment>,
    variables: Map<String, Value>,
}

impl QueryDocument {
    fn named(operation: &'static str) -> Self {
        Self {
            operation,
            fragments: Vec::new(),
            variables: Map::new(),
        }
    }

    /// Query for the bulk protocol's own rate limit.
    #[must_use]
    pub fn rate_limit() -> Self {
        let mut document = Self::named("RateLimit");
        document.fragments.push(Fragment::RateLimit);
        document
    }

    /// One aliased repository lookup per cue.
    #[must_use]
    pub fn repositories<'a>(cues: impl IntoIterator<Item = &'a Cue>) -> Self {
        let mut document = Self::named("Repositories");
        for cue in cues {
            document.push_repository(cue);
        }
        document
    }

    /// Append a repository lookup addressed under the cue's alias.
    pub fn push_repository(&mut self, cue: &Cue) {
        let (owner_var, name_var) = variable_names(&cue.alias);
        self.variables
            .insert(owner_var, Value::String(cue.reference.owner().to_string()));
        self.variables
            .insert(name_var, Value::String(cue.reference.name().to_string()));
        self.fragments.push(Fragment::Repository(cue.alias.clone()));
    }

    /// Number of root selections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the document selects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Serialize the document once into a request body.
    #[must_use]
    pub fn render(&self) -> GraphQLRequest {
        let mut declarations = Vec::new();
        let mut selections = Vec::with_capacity(self.fragments.len());

        for fragment in &self.fragments {
            match fragment {
                Fragment::Repository(alias) => {
                    let (owner_var, name_var) = variable_names(alias);
                    declarations.push(format!("${owner_var}: String!"));
                    declarations.push(format!("${name_var}: String!"));
                    selections.push(format!(
                        "{alias}: repository(owner: ${owner_var}, name: ${name_var}) {{ {REPOSITORY_SELECTION} }}"
                    ));
                }
                Fragment::RateLimit => {
                    selections.push(format!("rateLimit {{ {RATE_LIMIT_SELECTION} }}"));
                }
            }
        }

        let signature = if declarations.is_empty() {
            String::new()
        } else {
            format!("({})", declarations.join(", "))
        };

        GraphQLRequest {
            query: format!(
                "query {}{signature} {{ {} }}",
                self.operation,
                selections.join(" ")
            ),
            variables: self.variables.clone(),
        }
    }
}

fn variable_names(alias: &Alias) -> (String, String) {
    (format!("{alias}Owner"), format!("{alias}Name"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn reference(owner: &str, name: &str) -> RepositoryReference {
        RepositoryReference::new(owner, name).unwrap()
    }

    #[test]
    fn test_cue_aliases_follow_input_positions() {
        let cues = Cue::assign(&[reference("a", "b"), reference("c", "d")]);
        let aliases: Vec<String> = cues.iter().map(|c| c.alias.to_string()).collect();
        assert_eq!(aliases, ["repository0", "repository1"]);
    }

    #[test]
    fn test_duplicate_references_get_independent_aliases() {
        let cues = Cue::assign(&[reference("a", "b"), reference("a", "b")]);
        assert_ne!(cues[0].alias, cues[1].alias);
        assert_eq!(cues[0].reference, cues[1].reference);
    }

    #[test]
    fn test_repositories_query_uses_variables() {
        let cues = Cue::assign(&[reference("golang", "go"), reference("rust-lang", "rust")]);
        let request = QueryDocument::repositories(&cues).render();

        assert!(request.query.starts_with("query Repositories("));
        assert!(request.query.contains("$repository0Owner: String!"));
        assert!(request.query.contains(
            "repository0: repository(owner: $repository0Owner, name: $repository0Name)"
        ));
        assert!(request.query.contains(
            "repository1: repository(owner: $repository1Owner, name: $repository1Name)"
        ));
        assert!(request.query.contains("stargazers { totalCount }"));
        assert!(!request.query.contains("golang"));

        assert_eq!(request.variables["repository0Owner"], "golang");
        assert_eq!(request.variables["repository1Name"], "rust");
    }

    #[test]
    fn test_chunked_document_keeps_global_aliases() {
        let cues = Cue::assign(&[reference("a", "b"), reference("c", "d"), reference("e", "f")]);
        let request = QueryDocument::repositories(&cues[2..]).render();

        assert!(request.query.contains("repository2: repository("));
        assert!(!request.query.contains("repository0"));
        assert_eq!(request.variables.len(), 2);
    }

    #[test]
    fn test_rate_limit_query_has_no_variables() {
        let request = QueryDocument::rate_limit().render();
        assert_eq!(
            request.query,
            "query RateLimit { rateLimit { remaining limit resetAt } }"
        );
        assert!(request.variables.is_empty());

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("variables").is_none());
    }
}
