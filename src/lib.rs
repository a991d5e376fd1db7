pub mod adjustment;
pub mod error;
pub mod export;
pub mod parameters;
pub mod presentation;
pub mod roster;
mod scaler;
pub mod session;
pub mod statistics;

// re-exports
pub use crate::adjustment::{adjust, Adjustment, PASS_THRESHOLD};
pub use crate::error::{ExportError, LoadError, ParametersError};
pub use crate::parameters::Parameters;
pub use crate::presentation::{JsonPresenter, Presenter, TextPresenter, View};
pub use crate::roster::Roster;
pub use crate::session::Session;
pub use crate::statistics::{FailingStudent, Histogram, Statistics};
