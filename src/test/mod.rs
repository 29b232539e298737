
pub mod helpers;

pub use helpers::*;
pub use store::{RecordingStore, StoreCall};
