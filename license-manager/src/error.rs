use thiserror::Error;

#[derive(Debug, Error)]
pub enum LicenseError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("The activation code is not valid for this machine.")]
    InvalidActivationCode,
}
