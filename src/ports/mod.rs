//! Port traits defining external boundaries.
//!
//! The mirror talks to two outside systems: the network (`http`) and the
//! team/org membership directory consulted by the access policy
//! (`directory`). Transport implementations live in `src/adapters/`; the
//! directory is implemented by [`crate::github::GithubClient`].

pub mod directory;
pub mod http;

pub use directory::{MembershipDirectory, Team};
pub use http::{HttpRequest, HttpResponse, HttpTransport, Method};
