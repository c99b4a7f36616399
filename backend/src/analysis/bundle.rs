//! The three spreadsheets of one upload.

use std::path::Path;

use super::error::AnalysisError;

/// One uploaded spreadsheet. The analysis service recognises files by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a spreadsheet from disk, keeping its file name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AnalysisError::Validation(format!("{} is not a file path", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AnalysisError::Validation(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self { file_name, bytes })
    }

    /// MIME type guessed from the extension.
    pub fn mime_type(&self) -> &'static str {
        let lower = self.file_name.to_lowercase();
        if lower.ends_with(".csv") {
            "text/csv"
        } else if lower.ends_with(".xlsx") {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        } else if lower.ends_with(".xls") {
            "application/vnd.ms-excel"
        } else {
            "application/octet-stream"
        }
    }
}

/// Students, academic records and activity records, in upload order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBundle {
    pub students: UploadFile,
    pub academic: UploadFile,
    pub activity: UploadFile,
}

impl UploadBundle {
    pub fn new(students: UploadFile, academic: UploadFile, activity: UploadFile) -> Self {
        Self {
            students,
            academic,
            activity,
        }
    }

    /// Files in the order the service expects them.
    pub fn files(&self) -> [&UploadFile; 3] {
        [&self.students, &self.academic, &self.activity]
    }

    /// Multipart body with one `files` field per spreadsheet.
    pub(crate) fn to_form(&self) -> Result<reqwest::multipart::Form, reqwest::Error> {
        let mut form = reqwest::multipart::Form::new();
        for file in self.files() {
            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(file.mime_type())?;
            form = form.part("files", part);
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(UploadFile::new("students.CSV", "").mime_type(), "text/csv");
        assert_eq!(
            UploadFile::new("academic_records.xls", "").mime_type(),
            "application/vnd.ms-excel"
        );
        assert_eq!(
            UploadFile::new("notes.txt", "").mime_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_file_order() {
        let bundle = UploadBundle::new(
            UploadFile::new("students.csv", "a"),
            UploadFile::new("academic_records.csv", "b"),
            UploadFile::new("activity_records.csv", "c"),
        );
        let names: Vec<_> = bundle.files().iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["students.csv", "academic_records.csv", "activity_records.csv"]
        );
        assert!(bundle.to_form().is_ok());
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = UploadFile::from_path("/definitely/not/here/students.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(_)));
    }
}
