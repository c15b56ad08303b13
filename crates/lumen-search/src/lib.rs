//! Search parameter parsing and query normalization for the Lumen FHIR
//! server.
//!
//! The crate turns the raw query component of a FHIR search URL into typed,
//! value-domain-aware parameter nodes, and can re-emit those nodes in a
//! canonical percent-decoded form. Parsing is a pure function of the input
//! and the descriptor registry: no I/O, no locks, no global state, safe to
//! call from any number of workers concurrently.
//!
//! The pieces, bottom up:
//! - [`escape`]: the shared escape-aware splitter for `| , $ \`
//! - [`parameters`]: descriptor metadata and comparator prefixes
//! - [`registry`]: read-only descriptor lookup per resource type
//! - [`types`]: one parser per value type, plus the OR combinator
//! - [`query`]: tokenization, dispatch, and normalization

pub mod error;
pub mod escape;
pub mod parameters;
pub mod query;
pub mod registry;
pub mod types;

pub use error::{Result, SearchError};
pub use parameters::{Prefix, SearchParamInfo, SearchParamPath, SearchParamType};
pub use query::{
    COUNT_PARAM, DEFAULT_COUNT, DEFAULT_OFFSET, OFFSET_PARAM, Query, QueryOptions, QueryValues,
    encode_query_values,
};
pub use registry::SearchParamRegistry;
pub use types::{
    CompositeParam, DateParam, NumberParam, OrParam, QuantityParam, Reference, ReferenceParam,
    SearchParam, StringParam, TokenParam, UntypedParam, UriParam, parse_search_param,
};
