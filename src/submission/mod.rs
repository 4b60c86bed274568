pub mod model;
pub mod service;
pub mod store;
pub mod validate;

pub use model::{
    FieldError, FormField, Notification, NotificationVariant, PersistenceMode, SubmissionError,
    SubmissionForm, SubmissionReceipt,
};
pub use service::SubmissionService;
pub use validate::validate;
