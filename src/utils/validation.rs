use url::Url;

use crate::utils::error::{DoltError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DoltError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(DoltError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// Remotes are either scheme'd URLs (https, file, aws, gs) or bare
/// `org/name` database paths.
pub fn validate_remote_url(field_name: &str, url_str: &str) -> Result<()> {
    validate_non_empty_string(field_name, url_str)?;

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" | "file" | "aws" | "gs" => Ok(()),
            scheme => Err(DoltError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        // not URL-shaped; accept org/name style database paths
        Err(_) => {
            if url_str.contains('\0') {
                return Err(DoltError::InvalidConfigValue {
                    field: field_name.to_string(),
                    value: url_str.to_string(),
                    reason: "Path contains null bytes".to_string(),
                });
            }
            Ok(())
        }
    }
}

/// At most one of the named flags may be set.
pub fn validate_at_most_one(context: &str, flags: &[(&str, bool)]) -> Result<()> {
    let set: Vec<&str> = flags.iter().filter(|(_, v)| *v).map(|(n, _)| *n).collect();
    if set.len() > 1 {
        return Err(DoltError::args(format!(
            "at most one of {} can be set for {}; found {}",
            names(flags),
            context,
            set.join(", ")
        )));
    }
    Ok(())
}

/// Exactly one of the named flags must be set.
pub fn validate_exactly_one(context: &str, flags: &[(&str, bool)]) -> Result<()> {
    let count = flags.iter().filter(|(_, v)| *v).count();
    if count != 1 {
        return Err(DoltError::args(format!(
            "exactly one of {} must be set for {}",
            names(flags),
            context
        )));
    }
    Ok(())
}

fn names(flags: &[(&str, bool)]) -> String {
    flags
        .iter()
        .map(|(n, _)| *n)
        .collect::<Vec<_>>()
        .join(", ")
}
