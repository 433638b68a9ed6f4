//! Request decorators that attach credentials to outgoing requests.

mod bearer;

pub use bearer::Bearer;
