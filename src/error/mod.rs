mod app_error;

pub use app_error::{API_NOT_FOUND_MESSAGE, AppError, AppResult, INTERNAL_ERROR_MESSAGE};
