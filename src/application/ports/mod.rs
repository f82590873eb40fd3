pub mod connectivity;
pub mod local_store;
pub mod remote_gateway;

pub use connectivity::{LinkState, LivenessProbe};
pub use local_store::{OutboxStore, PreferenceStore, RecordStore};
pub use remote_gateway::{PushOutcome, RemoteGateway};
