pub mod record;
pub mod submit;

pub use record::{RecordObservationsCommand, RecordObservationsError, RecordObservationsResponse};
pub use submit::{
    SubmitObservationsCommand, SubmitObservationsError, SubmitObservationsResponse, WrittenEvent,
};
