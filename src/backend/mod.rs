// Backend collaborators: form properties, GraphQL submission

pub mod client;
pub mod errors;
pub mod gateway;
pub mod properties;

pub use client::{build_http_client, GraphQlClient};
pub use errors::{ConfigFetchError, FieldError, SubmissionError, SubmissionResult, TransportFailure};
pub use gateway::{build_mutation, GraphQlGateway, SubmissionGateway};
pub use properties::{ConfigLoader, HttpConfigLoader};
