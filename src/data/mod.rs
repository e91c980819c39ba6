mod builtin;
mod loader;

pub use builtin::nuora_funnel;
pub use loader::{load_funnel_from_json, parse_funnel, validate, LoadError};
