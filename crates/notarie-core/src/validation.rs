//! Input validation for uploads and contact details.
//!
//! Everything here runs before any network call. A rejected input never
//! leaves the process.

use crate::error::ValidationError;
use crate::identity::Contact;

/// Maximum accepted upload size: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Accepted file extensions: document formats plus common images.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "png", "jpg", "jpeg"];

/// Upload constraints applied at document creation.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Validate a candidate upload by name and size.
    pub fn validate(&self, file_name: &str, size: u64) -> Result<(), ValidationError> {
        if file_name.trim().is_empty() {
            return Err(ValidationError::EmptyFileName);
        }
        let extension = extension_of(file_name).ok_or(ValidationError::UnsupportedFileType {
            extension: String::new(),
        })?;
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ValidationError::UnsupportedFileType { extension });
        }
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }
        if size > self.max_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// The lowercase extension of a file name, if it has one.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// The MIME type submitted with an upload, by extension.
pub fn mime_type(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Validate contact details: names of at least 2 characters and a
/// plausible email.
pub fn validate_contact(contact: &Contact) -> Result<(), ValidationError> {
    if contact.first_name.trim().chars().count() < 2 {
        return Err(ValidationError::NameTooShort {
            field: "first name",
        });
    }
    if contact.last_name.trim().chars().count() < 2 {
        return Err(ValidationError::NameTooShort { field: "last name" });
    }
    validate_email(&contact.email)
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_string());
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(invalid());
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Contact;

    #[test]
    fn test_accepts_allowed_types() {
        let policy = UploadPolicy::default();
        for name in [
            "contract.pdf",
            "letter.doc",
            "letter.docx",
            "notes.txt",
            "scan.png",
            "scan.jpg",
            "scan.JPEG",
        ] {
            assert!(policy.validate(name, 1024).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_rejects_disallowed_types() {
        let policy = UploadPolicy::default();
        assert_eq!(
            policy.validate("run.exe", 1024),
            Err(ValidationError::UnsupportedFileType {
                extension: "exe".into()
            })
        );
        assert!(policy.validate("noextension", 1024).is_err());
        assert!(policy.validate(".hidden", 1024).is_err());
    }

    #[test]
    fn test_rejects_oversize_and_empty() {
        let policy = UploadPolicy::default();
        assert_eq!(
            policy.validate("big.pdf", MAX_UPLOAD_BYTES + 1),
            Err(ValidationError::FileTooLarge {
                size: MAX_UPLOAD_BYTES + 1,
                max: MAX_UPLOAD_BYTES
            })
        );
        assert!(policy.validate("big.pdf", MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(policy.validate("empty.pdf", 0), Err(ValidationError::EmptyFile));
        assert_eq!(policy.validate("", 10), Err(ValidationError::EmptyFileName));
    }

    #[test]
    fn test_contact_validation() {
        let good = Contact::new("John", "Doe", "john.doe@example.com");
        assert!(validate_contact(&good).is_ok());

        let short = Contact::new("J", "Doe", "john@example.com");
        assert_eq!(
            validate_contact(&short),
            Err(ValidationError::NameTooShort {
                field: "first name"
            })
        );

        for bad_email in ["", "plain", "@example.com", "a@", "a@nodot", "a b@example.com"] {
            let contact = Contact::new("John", "Doe", bad_email);
            assert!(validate_contact(&contact).is_err(), "{bad_email}");
        }
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type("pdf"), "application/pdf");
        assert_eq!(mime_type("jpeg"), "image/jpeg");
        assert_eq!(mime_type("bin"), "application/octet-stream");
    }
}
