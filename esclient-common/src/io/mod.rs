//! Wire codec used for request envelopes exchanged with the cluster

mod stream;

pub use stream::{from_bytes, to_bytes, StreamInput, StreamOutput, Streamable};
