use thiserror::Error;

use crate::ScalarKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseRepError {
    #[error("unknown numeric type `{0}`")]
    UnknownKind(String),
    #[error("`{literal}` is not a valid {kind} literal")]
    InvalidLiteral { kind: ScalarKind, literal: String },
    #[error("complex literal `{0}` needs a real and an imaginary part separated by `,`")]
    MissingImaginary(String),
}
