//! The paymail request pipeline.
//!
//! 1. **Configuration** (`config`): enabled sub-protocols and pipeline options
//! 2. **Registrars** (`protocols`): one per sub-protocol, yielding routes plus the
//!    capability they advertise
//! 3. **Discovery** (`discovery`): the `/.well-known/bsvalias` document
//! 4. **Stages** (`stages`): CORS, not-found fallback and the terminal error stage
//! 5. **Composition** (`router`): validates the base URL and assembles everything

pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod protocols;
pub mod router;
pub mod stages;

pub use config::{BodyConfig, CorsConfig, PaymailConfig, SubProtocol, SubProtocols};
pub use error::{ErrorHandler, JsonErrorHandler, RequestError, RequestInfo};
pub use protocols::Registration;
pub use router::PaymailRouter;
