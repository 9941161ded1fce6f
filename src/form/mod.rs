// Form lifecycle: configuration, field values, submission and outcome
//
// `FormLifecycle` is the synchronous state machine; `FormSession` drives it
// from async collaborators and is what front ends hold on to.

pub mod errors;
pub mod fields;
pub mod schema;
pub mod session;
pub mod state_machine;
pub mod types;
pub mod view;

#[cfg(test)]
pub mod mocks;


pub use errors::FormError;
pub use fields::FieldValues;
pub use schema::{FieldKind, FieldSpec, FormSchema, FormVariant};
pub use session::{FormServices, FormSession, SessionSettings};
pub use state_machine::{FormEvent, FormLifecycle};
pub use types::{ChallengeToken, FieldValue, FormConfig, Phase, SecurityTokens, SubmissionId, SubmissionOutcome};
pub use view::{Banner, BannerKind, FormView};
