// src/web/extract.rs
use crate::error::AppError;
use axum::extract::{FromRequest, FromRequestParts};

/// `Json` que rejeita corpos inválidos com o formato de erro da API.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Query` com o mesmo tratamento de erro que `ApiJson`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Campo de texto obrigatório: `None` quando ausente ou em branco.
pub fn required_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_counts_as_missing() {
        assert_eq!(required_text(Some("  ".into())), None);
        assert_eq!(required_text(None), None);
        assert_eq!(required_text(Some(" Cálculo ".into())).as_deref(), Some("Cálculo"));
    }
}
