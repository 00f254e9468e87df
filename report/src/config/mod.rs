pub mod settings;

pub use settings::{Endpoints, ReportSettings};
