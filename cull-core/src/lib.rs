pub mod confirm;
pub mod controller;
pub mod error;
pub mod executor;
pub mod host;
pub mod item;
pub mod selection;
pub mod sim;
pub mod sync;

pub use confirm::{ConfirmMachine, ConfirmPhase, RequestOutcome};
pub use controller::{Controller, HostEvent, Timing};
pub use error::DeleteError;
pub use executor::{BatchRun, RunTally, StepOutcome};
pub use host::{ChromeSurface, ContentIndex, Host, IdentityResolver, SingleItemDeleter};
pub use item::{ItemId, NodeRef};
pub use selection::SelectionStore;
pub use sim::{ActionControl, SimHost};
pub use sync::{SyncReport, Synchronizer};
