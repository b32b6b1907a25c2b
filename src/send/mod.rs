//! Send Orchestrator
//!
//! Request and result types, token path selection and the orchestrator that
//! drives a send attempt.

pub mod orchestrator;
pub mod plan;
pub mod request;
pub mod result;
pub mod state;

pub use orchestrator::{
    SendOrchestrator, INVALID_RECIPIENT, NO_ACTIVE_WALLET, NO_RECIPIENT, NO_TOKEN_SELECTED,
    TOKEN_NOT_SUPPORTED,
};
pub use plan::{plan_send, resolve_route, select_path, Route, RouteError, SendPlan, TokenPath};
pub use request::{PrebuiltHandler, SendRequest};
pub use result::{PendingTransactionRecord, SendResult, FIXED_FEE_SEND_FAILED};
pub use state::{SendFlags, SendState};
