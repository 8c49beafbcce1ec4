//! Error taxonomy for the HSM engine.
//!
//! Per the error-handling design: an unhandled signal is normal control
//! flow (`dispatch` returns `Ok(false)`), while depth-exceeded and
//! impossible-transition are programmer errors surfaced as `Err` so a host
//! application can log-and-abort instead of the process hard-crashing.
use thiserror::Error;

pub type HSMResult<T> = std::result::Result<T, HSMError>;

#[derive(Error, Debug)]
pub enum HSMError {
    #[error("StateMachine used before open() was called")]
    NotOpened,

    #[error("StateMachine::open() called twice on the same machine")]
    MachineAlreadyOpen,

    #[error("path buffer exceeded STATEMACHINE_MAX_DEPTH ({0}); hierarchy is too deep")]
    DepthExceeded(usize),

    #[error("no dispatch case matched pitcher/target relationship while handling {0}: {1}")]
    ImpossibleTransition(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_exceeded_carries_the_bound() {
        let err = HSMError::DepthExceeded(20);
        assert_eq!(err.to_string(), "path buffer exceeded STATEMACHINE_MAX_DEPTH (20); hierarchy is too deep");
    }
}
