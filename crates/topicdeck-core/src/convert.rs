//! Delimited text to topic records.
//!
//! The [`header_line`] (first line with non-whitespace content, the same line
//! delimiter detection looks at) is the header; every later record contributes
//! one topic per non-empty cell, in row-major order. Rows shorter than the
//! header are padded with empty cells, longer rows keep their extra cells
//! under the empty category.

use crate::config::ConvertConfig;
use crate::delimiter::{header_line, Delimiter};
use crate::identity::topic_id;
use crate::{Result, TopicError};
use csv::{ReaderBuilder, StringRecord};
use topicdeck_protocol::TopicRecord;
use tracing::{debug, info, instrument, warn};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Convert delimited text into topic records
pub fn convert(text: &str) -> Vec<TopicRecord> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let Some((offset, _)) = header_line(text) else {
        return Vec::new();
    };
    let delimiter = Delimiter::detect(text);
    debug!("Detected {} delimiter", delimiter);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(text[offset..].as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut topics = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable record {}: {}", index + 1, e);
                continue;
            }
        };

        match &headers {
            Some(headers) => push_row(&record, headers, &mut topics),
            None => {
                let labels: Vec<String> = record.iter().map(|h| h.trim().to_string()).collect();
                debug!("Header has {} columns", labels.len());
                headers = Some(labels);
            }
        }
    }

    topics
}

/// Read the configured input and convert it.
///
/// Fails with [`TopicError::MissingInput`] before reading anything when the
/// input does not exist.
#[instrument(skip(config), fields(input = %config.input.display()))]
pub fn convert_file(config: &ConvertConfig) -> Result<Vec<TopicRecord>> {
    if !config.input.exists() {
        return Err(TopicError::MissingInput {
            path: config.input.clone(),
        });
    }

    let text = std::fs::read_to_string(&config.input)?;
    let topics = convert(&text);
    info!("Converted {} topics", topics.len());
    Ok(topics)
}

fn push_row(record: &StringRecord, headers: &[String], topics: &mut Vec<TopicRecord>) {
    let width = record.len().max(headers.len());

    for i in 0..width {
        let title = record.get(i).unwrap_or("").trim();
        if title.is_empty() {
            continue;
        }

        let category = headers.get(i).map(String::as_str).unwrap_or("");
        topics.push(TopicRecord::new(topic_id(title, category), title, category));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(topics: &[TopicRecord]) -> Vec<(&str, &str)> {
        topics
            .iter()
            .map(|t| (t.title.as_str(), t.category.as_str()))
            .collect()
    }

    #[test]
    fn test_blank_second_field_is_skipped() {
        let topics = convert("Name,Category\nAlpha, \n");
        assert_eq!(
            topics,
            vec![TopicRecord::new("t6e9e487c5c", "Alpha", "Name")]
        );
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(convert("").is_empty());
        assert!(convert("\n\n  \n").is_empty());
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(convert("A,B,C\n").is_empty());
    }

    #[test]
    fn test_tab_delimited() {
        let topics = convert("A\tB\nx\ty\n");
        assert_eq!(pairs(&topics), vec![("x", "A"), ("y", "B")]);
        assert_eq!(topics[0].id, "t962f38fcb0");
        assert_eq!(topics[1].id, "t4759399910");
    }

    #[test]
    fn test_comma_header_keeps_tabs_inside_cells() {
        let topics = convert("A,B\nx\ty,z\n");
        assert_eq!(pairs(&topics), vec![("x\ty", "A"), ("z", "B")]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let topics = convert("A,B,C\nx\n,,z\n");
        assert_eq!(pairs(&topics), vec![("x", "A"), ("z", "C")]);
    }

    #[test]
    fn test_long_rows_use_empty_category() {
        let topics = convert("A\nx,y,z\n");
        assert_eq!(pairs(&topics), vec![("x", "A"), ("y", ""), ("z", "")]);
        assert_eq!(topics[1].id, topic_id("y", ""));
    }

    #[test]
    fn test_order_is_row_major() {
        let topics = convert("A,B\n1,2\n3,4\n");
        assert_eq!(
            pairs(&topics),
            vec![("1", "A"), ("2", "B"), ("3", "A"), ("4", "B")]
        );
    }

    #[test]
    fn test_headers_and_cells_are_trimmed() {
        let topics = convert("  Subjects , Moods\n  Portrait  ,\tCalm \n");
        assert_eq!(pairs(&topics), vec![("Portrait", "Subjects"), ("Calm", "Moods")]);
    }

    #[test]
    fn test_leading_blank_lines_before_header() {
        let topics = convert("\n   \nA\tB\nx\ty\n");
        assert_eq!(pairs(&topics), vec![("x", "A"), ("y", "B")]);
    }

    #[test]
    fn test_whitespace_only_leading_line_is_not_the_header() {
        let text = "\t\nA\tB\nx\ty\n";
        assert_eq!(Delimiter::detect(text), Delimiter::Tab);
        assert_eq!(pairs(&convert(text)), vec![("x", "A"), ("y", "B")]);

        let text = " \t \nA,B\nx,y\n";
        assert_eq!(Delimiter::detect(text), Delimiter::Comma);
        assert_eq!(pairs(&convert(text)), vec![("x", "A"), ("y", "B")]);
    }

    #[test]
    fn test_header_is_the_line_delimiter_detection_reads() {
        // A quoted empty field is content, so it is the header line for both.
        let text = "\"\"\nA\tB\nx\ty\n";
        assert_eq!(header_line(text), Some((0, "\"\"")));
        assert_eq!(Delimiter::detect(text), Delimiter::Comma);
        assert_eq!(
            pairs(&convert(text)),
            vec![("A\tB", ""), ("x\ty", "")]
        );

        // A line of bare delimiters is also content.
        let text = " , \nx,y\n";
        assert_eq!(pairs(&convert(text)), vec![("x", ""), ("y", "")]);
    }

    #[test]
    fn test_blank_lines_between_rows() {
        let topics = convert("A,B\nx,y\n\n\nz,w\n");
        assert_eq!(topics.len(), 4);
    }

    #[test]
    fn test_quoted_cells_keep_delimiter() {
        let topics = convert("A,B\n\"Cats, dogs\",\"He said \"\"hi\"\"\"\n");
        assert_eq!(
            pairs(&topics),
            vec![("Cats, dogs", "A"), ("He said \"hi\"", "B")]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let topics = convert("A,B\r\nx,y\r\n");
        assert_eq!(pairs(&topics), vec![("x", "A"), ("y", "B")]);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let topics = convert("\u{feff}Name,Category\nAlpha,\n");
        assert_eq!(topics[0].category, "Name");
        assert_eq!(topics[0].id, "t6e9e487c5c");
    }

    #[test]
    fn test_no_record_has_blank_title() {
        let topics = convert("A,B,C\n , \t ,x\n\t,,\ny\n");
        assert!(topics.iter().all(|t| !t.title.trim().is_empty()));
        assert_eq!(pairs(&topics), vec![("x", "C"), ("y", "A")]);
    }

    #[test]
    fn test_all_records_start_open() {
        let topics = convert("A,B\nx,y\n");
        assert!(topics.iter().all(|t| !t.done && t.completed_at.is_none()));
    }

    #[test]
    fn test_duplicate_cells_share_ids() {
        let topics = convert("A,B\nx,x\nx,y\n");
        assert_eq!(topics[0].id, topics[2].id);
        assert_ne!(topics[0].id, topics[1].id);
    }
}
