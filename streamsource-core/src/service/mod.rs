pub mod stream;

pub use stream::{SourceRequest, StreamService};
