//! routedoc: turn annotated endpoint handlers into structured API docs.
//!
//! Reads the `@resource`, `@describe`, `@default` and `@response` tags of a
//! handler's doc comments, combines them with facts the host supplies about
//! the route (URI pattern, parameter types, query validation rules) and
//! produces one [`RouteSummary`] per endpoint, grouped by resource.
//!
//! `@response` bodies use a shorthand that expands to JSON:
//!
//! - `int[]` -> `[{"$ref": "int"}]`
//! - `{ year :: int }` -> `{"year": {"$ref": "int"}}`
//! - `[ :: { id :: int } ]` -> `[{"$ref": {"id": {"$ref": "int"}}}]`
//!
//! Rendering the summaries to a page or an export format is left to callers.

pub mod config;
pub mod docblock;
pub mod error;
pub mod facts;
pub mod generate;
pub mod humanize;
pub mod model;
pub mod params;
pub mod quote;
pub mod route;
pub mod transform;

pub use config::GeneratorConfig;
pub use docblock::{DocComment, Tag};
pub use error::{DocError, PipelineError};
pub use facts::{
    Endpoint, Handler, HandlerRef, NoQueryRules, ParameterFacts, QueryRuleSource, QueryRules,
    RawRule, StaticQueryRules,
};
pub use generate::{Failure, Generator, Report};
pub use model::{
    Parameters, PathParameter, QueryParameter, ResourceGroup, ResponseShape, RouteSummary,
};
pub use params::Location;
pub use route::RouteDoc;
