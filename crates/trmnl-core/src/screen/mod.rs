//! Current screen polling: parse the API response, fetch the image, keep
//! [`StateStore`] current and re-arm the refresh timer.

pub mod controller;
pub mod errors;
pub mod fetcher;
pub mod parser;
pub mod scheduler;
pub mod store;
pub mod types;

pub use controller::RefreshController;
pub use errors::RefreshError;
pub use fetcher::ImageFetcher;
pub use parser::ResponseBody;
pub use scheduler::{RefreshScheduler, TimerFired};
pub use store::StateStore;
pub use types::{ScreenDescriptor, ScreenState};
