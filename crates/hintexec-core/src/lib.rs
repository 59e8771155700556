pub mod error;
pub mod flow;
pub mod hint;
pub mod value;

// Re-export commonly used types
pub use error::{CoreError, Raised};
pub use flow::Flow;
pub use hint::{HintKind, TypeHint};
pub use value::{Value, ValueKind};
