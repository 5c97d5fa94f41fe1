pub mod caller;

pub use caller::{CallerIdentity, caller_of};
