pub mod firestore;
pub mod store;
pub mod token;
pub mod value;

pub use firestore::FirestoreClient;
pub use store::{CommitResult, DocumentStore, StoredDocument};
pub use value::{FieldValue, Fields};
