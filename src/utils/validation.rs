use crate::utils::error::{BackofficeError, Result};
use std::net::SocketAddr;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> BackofficeError {
    BackofficeError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<()> {
    if addr.trim().is_empty() {
        return Err(invalid(field_name, addr, "Address cannot be empty"));
    }
    addr.parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|e| invalid(field_name, addr, format!("Invalid socket address: {}", e)))
}

/// Seed, labels and asset paths: non-empty, free of NUL bytes, no unresolved `${VAR}`.
pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    match path {
        "" => Err(invalid(field_name, path, "Path cannot be empty")),
        p if p.contains("${") => Err(BackofficeError::MissingConfigError {
            field: field_name.to_string(),
        }),
        p if p.contains('\0') => Err(invalid(field_name, path, "Path contains null bytes")),
        _ => Ok(()),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(field_name, value, format!("Value must be at least {}", min_value)));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(invalid(field_name, value, format!("Allowed values: {}", allowed.join(", "))))
}
