use rust_decimal::Decimal;
use validator::ValidationError;

use crate::common::error::AppError;

// Validação customizada usada pelos payloads com valores monetários / quantidades.
pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// Mesma regra, para checar um registro inteiro depois de aplicar um patch.
pub fn ensure_not_negative(field: &str, val: Decimal) -> Result<(), AppError> {
    if val < Decimal::ZERO {
        return Err(AppError::ConstraintViolation(format!(
            "O campo '{}' não pode ser negativo.",
            field
        )));
    }
    Ok(())
}

// Categoria livre: vazio ou só espaços cai em "other".
pub fn normalize_category(category: Option<&str>) -> String {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_lowercase)
        .unwrap_or_else(|| "other".to_string())
}
