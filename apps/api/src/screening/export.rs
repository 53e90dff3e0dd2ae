//! Tabular export of passing resumes.

use crate::errors::AppError;
use crate::screening::models::ReportRow;

pub const EXPORT_FILE_NAME: &str = "Industry_Results.csv";

pub const EXPORT_COLUMNS: [&str; 6] = [
    "File Name",
    "ATS Score",
    "College",
    "CGPA",
    "Certifications",
    "Candidate Email",
];

/// Renders the rows as CSV with a header line. Row order is preserved.
pub fn rows_to_csv(rows: &[ReportRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| AppError::Export(e.to_string()))?;

    for row in rows {
        writer
            .write_record([
                row.file_name.as_str(),
                row.ats_score.as_str(),
                row.college.as_str(),
                row.cgpa.as_str(),
                row.certifications.as_str(),
                row.candidate_email.as_str(),
            ])
            .map_err(|e| AppError::Export(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::models::Field;

    fn row(name: &str, college: &str, certs: &str) -> ReportRow {
        ReportRow {
            file_name: name.to_string(),
            ats_score: Field::Present("72".into()),
            college: Field::from_text(college),
            cgpa: Field::NotAvailable,
            certifications: Field::from_text(certs),
            candidate_email: Field::Present(format!("{}@example.com", name.trim_end_matches(".pdf"))),
        }
    }

    #[test]
    fn test_csv_has_header_and_rows_in_order() {
        let csv = rows_to_csv(&[row("b.pdf", "Foo University", ""), row("a.pdf", "", "")]).unwrap();
        let text = String::from_utf8(csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "File Name,ATS Score,College,CGPA,Certifications,Candidate Email"
        );
        assert_eq!(lines[1], "b.pdf,72,Foo University,N/A,N/A,b@example.com");
        assert_eq!(lines[2], "a.pdf,72,N/A,N/A,N/A,a@example.com");
    }

    #[test]
    fn test_csv_quotes_values_with_commas() {
        let csv = rows_to_csv(&[row("c.pdf", "Foo", "AWS SAA, CKA")]).unwrap();
        let text = String::from_utf8(csv).unwrap();
        assert!(text.contains("\"AWS SAA, CKA\""));
    }

    #[test]
    fn test_empty_report_is_header_only() {
        let csv = rows_to_csv(&[]).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 1);
    }
}
