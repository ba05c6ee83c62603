pub mod resolve;

pub use resolve::{
    ResolutionOutcome, ResolveLocationCommand, ResolveLocationError, ResolveLocationResponse,
};
