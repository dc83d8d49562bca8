//! Batch query processing
//!
//! Typed records for driving a [`DynamicForest`] from a list of
//! `check` / `link` / `cut` instructions, as read from a query file or
//! assembled programmatically. Dispatch is sequential; answers to `check`
//! queries are collected in input order, and a rejected mutation aborts the
//! batch carrying its position instead of being silently dropped.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::forest::{DynamicForest, ForestError};
use crate::tour::Vertex;

/// The three query verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum QueryKind {
    /// Ask whether the two vertices share a component.
    Check,
    /// Add the edge between the two vertices.
    Link,
    /// Remove the edge between the two vertices.
    Cut,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryKind::Check => "check",
            QueryKind::Link => "link",
            QueryKind::Cut => "cut",
        })
    }
}

/// A query verb that is none of `check`, `link`, `cut`.
#[derive(Debug, Error)]
#[error("unknown query kind {0:?}, expected check, link or cut")]
pub struct ParseQueryKindError(String);

impl FromStr for QueryKind {
    type Err = ParseQueryKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "check" => Ok(QueryKind::Check),
            "link" => Ok(QueryKind::Link),
            "cut" => Ok(QueryKind::Cut),
            other => Err(ParseQueryKindError(other.to_owned())),
        }
    }
}

/// One instruction of a batch: a verb and its two vertex arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Query {
    /// What to do.
    pub kind: QueryKind,
    /// First vertex argument.
    pub u: Vertex,
    /// Second vertex argument.
    pub v: Vertex,
}

impl Query {
    /// Connectivity question between `u` and `v`.
    pub fn check(u: Vertex, v: Vertex) -> Self {
        Self {
            kind: QueryKind::Check,
            u,
            v,
        }
    }

    /// Edge insertion between `u` and `v`.
    pub fn link(u: Vertex, v: Vertex) -> Self {
        Self {
            kind: QueryKind::Link,
            u,
            v,
        }
    }

    /// Edge removal between `u` and `v`.
    pub fn cut(u: Vertex, v: Vertex) -> Self {
        Self {
            kind: QueryKind::Cut,
            u,
            v,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.u, self.v)
    }
}

/// A query the forest rejected, tagged with its batch position.
#[derive(Debug, Error)]
#[error("query #{index} ({query}) failed")]
pub struct QueryError {
    /// Zero-based position of the failing query in the batch.
    pub index: usize,
    /// The query that failed.
    pub query: Query,
    /// The forest's reason for rejecting it.
    #[source]
    pub source: ForestError,
}

/// Apply `queries` to `forest` in order.
///
/// Returns the answers to the `check` queries, one `bool` each, in input
/// order. The first rejected query aborts the batch; mutations applied
/// before it remain in effect.
///
/// # Errors
///
/// [`QueryError`] wrapping the forest's rejection and the offending query's
/// position.
pub fn process_queries(
    forest: &mut DynamicForest,
    queries: &[Query],
) -> Result<Vec<bool>, QueryError> {
    let mut answers = Vec::new();
    for (index, &query) in queries.iter().enumerate() {
        let applied = match query.kind {
            QueryKind::Check => forest.connected(query.u, query.v).map(|answer| {
                answers.push(answer);
            }),
            QueryKind::Link => forest.link(query.u, query.v),
            QueryKind::Cut => forest.cut(query.u, query.v),
        };
        applied.map_err(|source| QueryError {
            index,
            query,
            source,
        })?;
    }
    debug!(
        queries = queries.len(),
        answers = answers.len(),
        "batch applied"
    );
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_the_canonical_spellings() {
        assert_eq!("check".parse::<QueryKind>().unwrap(), QueryKind::Check);
        assert_eq!("link".parse::<QueryKind>().unwrap(), QueryKind::Link);
        assert_eq!("cut".parse::<QueryKind>().unwrap(), QueryKind::Cut);
        assert!("merge".parse::<QueryKind>().is_err());
        assert!("Check".parse::<QueryKind>().is_err(), "spellings are exact");
    }

    #[test]
    fn kind_display_round_trips() {
        for kind in [QueryKind::Check, QueryKind::Link, QueryKind::Cut] {
            assert_eq!(kind.to_string().parse::<QueryKind>().unwrap(), kind);
        }
    }

    #[test]
    fn star_batch_answers_in_order() {
        let mut forest = DynamicForest::from_edges(3, &[(0, 1), (0, 2)]).unwrap();
        let queries = [
            Query::check(0, 1),
            Query::check(0, 2),
            Query::check(1, 2),
            Query::cut(0, 1),
            Query::check(0, 1),
            Query::check(1, 2),
            Query::check(0, 2),
        ];
        let answers = process_queries(&mut forest, &queries).unwrap();
        assert_eq!(answers, vec![true, true, true, false, false, true]);
    }

    #[test]
    fn rejected_query_carries_its_position() {
        let mut forest = DynamicForest::new(4);
        let queries = [
            Query::link(0, 1),
            Query::check(0, 1),
            Query::link(1, 0),
            Query::check(2, 3),
        ];
        let err = process_queries(&mut forest, &queries).unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.query, Query::link(1, 0));
        assert!(matches!(
            err.source,
            ForestError::AlreadyConnected { u: 1, v: 0 }
        ));
        // The batch stopped, but the earlier link stayed applied.
        assert!(forest.connected(0, 1).unwrap());
    }

    #[test]
    fn check_failures_are_positioned_too() {
        let mut forest = DynamicForest::new(2);
        let err = process_queries(&mut forest, &[Query::check(0, 9)]).unwrap_err();
        assert_eq!(err.index, 0);
        assert!(matches!(
            err.source,
            ForestError::VertexOutOfRange { vertex: 9, .. }
        ));
    }
}
