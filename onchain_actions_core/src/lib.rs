pub mod actions;
pub mod config;
pub mod error;
pub mod network;
pub mod provider;
pub mod registry;
pub mod schema;

pub use actions::{
    to_result_string, Action, ActionDescriptor, ActionHandler, ActionMetadata, ActionSet,
};
pub use error::{ActionError, ActionResult, ErrorKind};
pub use network::{Network, ProtocolFamily};
pub use provider::{collect_actions, ActionProvider, ProvidedAction};
pub use registry::ActionRegistry;
pub use schema::{ActionArgs, FieldSpec, FieldType, Schema};

// Handler return type.
pub use futures::future::BoxFuture;
