pub mod config;
pub mod controller;
pub mod error;
pub mod state;
pub mod transport;
pub mod validation;

pub use config::{load_settings, ClientSettings};
pub use controller::PostsController;
pub use error::{RequestError, SubmitError};
pub use state::{Editor, PostsState, SubmitAction};
pub use transport::{ApiResponse, ReqwestRestClient, RestClient};
pub use validation::{Field, FormValidator, ValidationErrors};
