use std::num::TryFromIntError;

use error_stack::Report;
use kernel::KernelError;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    SqlX(sqlx::Error),
    #[error(transparent)]
    Conversion(anyhow::Error),
}

impl From<sqlx::Error> for DriverError {
    fn from(value: sqlx::Error) -> Self {
        Self::SqlX(value)
    }
}

impl From<TryFromIntError> for DriverError {
    fn from(value: TryFromIntError) -> Self {
        Self::Conversion(anyhow::Error::new(value))
    }
}

pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, DriverError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| match error {
            DriverError::SqlX(sqlx::Error::PoolTimedOut) => {
                Report::from(error).change_context(KernelError::Timeout)
            }
            _ => Report::from(error).change_context(KernelError::Internal),
        })
    }
}

impl<T> ConvertError for Result<T, sqlx::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(DriverError::from).convert_error()
    }
}
