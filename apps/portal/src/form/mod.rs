pub mod controller;
pub mod draft;
pub mod tags;
pub mod validation;

pub use controller::{FormController, FormState};
pub use draft::ProfileDraft;
pub use tags::TagCollection;
