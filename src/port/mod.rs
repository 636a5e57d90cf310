//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Two ports: [`Transport`] moves one GraphQL envelope over the wire, and
//! [`ControlPlane`] exposes the typed operations workflows need. The reqwest
//! adapter implements the first, the Zeabur client implements the second on
//! top of any transport, and the testkit's scripted transport stands in for
//! the network in tests.

pub mod control_plane;
pub mod transport;

pub use control_plane::ControlPlane;
pub use transport::{
    GraphqlError, GraphqlRequest, GraphqlResponse, TlsVerification, Transport, TransportError,
};
