mod form;
mod store;

pub use form::{DraftForm, FormError};
pub use store::{DraftStore, FileDraftStore, MemoryDraftStore, PersistenceError};

pub(crate) use form::hand_off;
