pub mod controller;
pub mod errors;
pub mod queue;
pub mod settings;
pub mod tasks;

pub use controller::QueueController;
pub use errors::TorchLearnError;
pub use queue::{
    QueueError,
    QueueState,
};
pub use settings::{
    Settings,
    SourceKind,
};
