// Authentication: identity provider client, session resolution, extractors
// Decision: Provider access goes through the IdentityGateway trait so tests can stub it

pub mod config;
pub mod gateway;
pub mod middleware;
pub mod resolver;

pub use config::{AuthConfig, ProviderFailurePolicy};
pub use gateway::OryGateway;
pub use middleware::{AuthState, CurrentSession, MaybeSession};
pub use resolver::SessionResolver;
