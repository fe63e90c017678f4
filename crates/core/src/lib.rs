// Session and authorization core
//
// This crate provides the DB-agnostic, HTTP-agnostic half of the
// Source Cooperative session boundary.
//
// Key design decisions:
// - Domain entities (Account, Product, Membership, ApiKey) are plain serde types
// - The identity provider and the resource store are traits so the server can
//   swap real backends for stubs in tests
// - Authorization is a pure function over (session, resource, action)
// - Redirect destinations are computed here as pure functions; the server only
//   turns them into HTTP responses

// Domain entity types
pub mod account;
pub mod api_key;
pub mod membership;
pub mod product;
pub mod session;

// Authorization
pub mod action;
pub mod authz;

pub mod error;
pub mod ids;
pub mod navigation;
pub mod traits;
pub mod urls;

// In-memory store for dev mode and tests
pub mod memory;

// Telemetry (tracing subscriber + optional OTLP export)
pub mod telemetry;

// Re-exports for convenience
pub use account::{Account, AccountFlag, AccountProfile, AccountType};
pub use action::Action;
pub use api_key::ApiKey;
pub use authz::{is_admin, is_authorized, Resource};
pub use error::{AuthError, Result};
pub use membership::{Membership, MembershipRole, MembershipState};
pub use memory::{InMemoryStore, SeedData};
pub use navigation::Destination;
pub use product::{DataMode, Product, ProductVisibility};
pub use session::{Identity, IdentityMetadata, IdentitySession, UserSession, VerifiableAddress};
pub use traits::{IdentityGateway, ResourceStore};
