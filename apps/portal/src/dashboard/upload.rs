use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::errors::ValidationError;
use crate::models::resume::UploadedResume;

/// Document types accepted as an existing résumé.
pub const ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Converts an uploaded file into a `data:` URL, rejecting anything that is
/// not a PDF or Word document.
pub fn to_uploaded_resume(
    file_name: &str,
    mime_type: &str,
    bytes: &[u8],
) -> Result<UploadedResume, ValidationError> {
    if !ALLOWED_TYPES.contains(&mime_type) {
        return Err(ValidationError::single(
            "file",
            "Only PDF or Word documents are allowed",
        ));
    }

    Ok(UploadedResume {
        file_name: file_name.to_string(),
        mime_type: mime_type.to_string(),
        data_url: format!("data:{mime_type};base64,{}", STANDARD.encode(bytes)),
    })
}
