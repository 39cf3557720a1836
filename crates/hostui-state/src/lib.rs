//! UI-facing state for the host: the app snapshot shared by pages and the
//! push channel, agent list page state, and pure converters from wire DTOs.

pub mod agent_state;
pub mod app_state;
pub mod convert;
pub mod store;

pub use agent_state::AgentState;
pub use app_state::*;
pub use store::AppStateStore;
