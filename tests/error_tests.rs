#[cfg(test)]
mod error_tests {
    use serde_json::json;
    use smart_health::{Result, SmartHealthError, ValidationIssue};

    #[test]
    fn test_api_error() {
        let err = SmartHealthError::ApiError("API connection failed".to_string());
        assert_eq!(format!("{}", err), "API error: API connection failed");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_api_error_helper_names_provider() {
        let err = SmartHealthError::api_error("Gemini", "429 Too Many Requests");
        assert_eq!(
            err,
            SmartHealthError::ApiError("Gemini API error: 429 Too Many Requests".to_string())
        );
    }

    #[test]
    fn test_validation_messages() {
        let cases = [
            (ValidationIssue::EmptySymptoms, "Please describe your symptoms"),
            (ValidationIssue::MissingFile, "Please upload a report file"),
            (
                ValidationIssue::UnsupportedFileType {
                    mime_type: "text/plain".to_string(),
                },
                "Please upload a PDF or image file (JPEG/PNG)",
            ),
            (
                ValidationIssue::FileTooLarge {
                    size: 6 * 1024 * 1024,
                    limit: 5 * 1024 * 1024,
                },
                "File size should be less than 5MB",
            ),
            (ValidationIssue::NoSpecialty, "Please analyze your symptoms first."),
        ];

        for (issue, message) in cases {
            assert_eq!(issue.to_string(), message);
            let err: SmartHealthError = issue.clone().into();
            assert!(err.is_validation());
            assert_eq!(err.validation_issue(), Some(&issue));
            assert_eq!(err.to_string(), format!("Validation error: {}", message));
        }
    }

    #[test]
    fn test_timeout_error() {
        let err = SmartHealthError::Timeout;
        assert_eq!(format!("{}", err), "Timeout error");
        assert_eq!(err, SmartHealthError::Timeout);
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_value::<String>(json!(42)).unwrap_err();
        let err: SmartHealthError = json_err.into();

        match err {
            SmartHealthError::JsonError(_) => {}
            _ => panic!("Expected JsonError variant"),
        }
        assert!(format!("{}", err).starts_with("JSON error:"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: SmartHealthError = io_err.into();
        assert!(matches!(err, SmartHealthError::IoError(_)));
        assert_ne!(err, SmartHealthError::Timeout);
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn check(text: &str) -> Result<usize> {
            if text.trim().is_empty() {
                return Err(ValidationIssue::EmptySymptoms.into());
            }
            Ok(text.len())
        }

        fn outer(text: &str) -> Result<usize> {
            let len = check(text)?;
            Ok(len * 2)
        }

        assert_eq!(outer("cough").ok(), Some(10));
        assert!(outer("  ").is_err());
    }
}
