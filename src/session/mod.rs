pub mod guard;
pub mod handle;
pub mod store;

pub use guard::{check, GuardDecision, Route};
pub use handle::{AuthState, Session, SessionHandle, OWNER_ACTIVE_TAB, TENANT_ACTIVE_TAB};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoredState};
