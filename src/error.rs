use thiserror::Error;

/// Failures raised by the graduation engine.
///
/// `DataIntegrity` never escapes `evaluate`; it is folded into an ineligible
/// verdict so one bad row cannot break a bulk listing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraduationError {
    #[error("{0}")]
    DataIntegrity(String),

    /// `apply_promotion` was called with a verdict that does not allow it.
    #[error("invalid promotion: {0}")]
    InvalidPromotion(String),

    #[error("student already has the maximum of {stripes} stripes")]
    StripeLimit { stripes: u8 },
}

pub type Result<T> = std::result::Result<T, GraduationError>;
