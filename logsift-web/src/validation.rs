use axum::http::StatusCode;

/// Maximum allowed filename length
const MAX_FILENAME_LENGTH: usize = 255;

#[derive(Debug, Clone)]
pub enum ValidationError {
    FilenameEmpty,
    FilenameTooLong(usize),
    FilenameInvalid(String),
    FileTooLarge(String),
}

impl ValidationError {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            ValidationError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE, // 413
            ValidationError::FilenameInvalid(_) => StatusCode::UNPROCESSABLE_ENTITY, // 422
            _ => StatusCode::BAD_REQUEST, // 400
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            ValidationError::FilenameEmpty => "Filename cannot be empty".to_string(),
            ValidationError::FilenameTooLong(len) => {
                format!(
                    "Filename too long: {} characters (max {})",
                    len, MAX_FILENAME_LENGTH
                )
            }
            ValidationError::FilenameInvalid(name) => {
                format!("Filename contains invalid characters: '{}'", name)
            }
            ValidationError::FileTooLarge(msg) => msg.clone(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Sanitize text input by removing control characters and trimming.
pub fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Validate an uploaded filename. Uploads land directly inside the job's
/// input directory, so path separators and traversal sequences are rejected
/// outright.
pub fn validate_filename(filename: &str) -> ValidationResult<()> {
    if filename.is_empty() {
        return Err(ValidationError::FilenameEmpty);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong(filename.len()));
    }

    let dangerous_chars = ['/', '\\', '*', '?', '"', '<', '>', '|', '\0'];
    if filename.chars().any(|c| dangerous_chars.contains(&c)) || filename.contains("..") {
        return Err(ValidationError::FilenameInvalid(filename.to_string()));
    }

    Ok(())
}

/// Validate and sanitize one file upload, returning the safe filename.
pub fn validate_file_upload(
    filename: &str,
    file_size: usize,
    max_size: usize,
) -> ValidationResult<String> {
    let sanitized = sanitize_text(filename);
    validate_filename(&sanitized)?;

    if file_size > max_size {
        return Err(ValidationError::FileTooLarge(format!(
            "File too large: {} bytes (max {})",
            file_size, max_size
        )));
    }

    Ok(sanitized)
}
