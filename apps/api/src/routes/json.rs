use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` for request bodies; rejections become `AppError::Validation`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
