// Rule template catalog loading.
//
// The catalog is an external CSV table with a header row of
// `protocol,from_port,to_port,description`, maintained by administrators.
// It is read fresh on every invocation -- never cached -- so catalog edits
// take effect on the next run without redeployment.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::error::CatalogError;
use crate::model::RuleTemplate;

/// Load the ordered template collection from a CSV file.
///
/// Row order is preserved: later templates win when two rows expand to the
/// same canonical key. A missing or malformed catalog is run-fatal.
pub fn load_catalog(path: &Path) -> Result<Vec<RuleTemplate>, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut templates = Vec::new();
    for row in reader.deserialize() {
        templates.push(row?);
    }

    debug!(path = %path.display(), templates = templates.len(), "catalog loaded");
    Ok(templates)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::io::Write;

    use super::*;

    fn write_catalog(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_rows_in_order() {
        let file = write_catalog(
            "protocol,from_port,to_port,description\n\
             tcp,443,443,HTTPS to {domain}\n\
             udp,53,53,DNS to {address}\n",
        );

        let templates = load_catalog(file.path()).expect("catalog should load");

        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].protocol, "tcp");
        assert_eq!(templates[0].from_port, 443);
        assert_eq!(templates[1].protocol, "udp");
        assert_eq!(templates[1].description, "DNS to {address}");
    }

    #[test]
    fn trims_whitespace_around_fields() {
        let file = write_catalog(
            "protocol,from_port,to_port,description\n\
             tcp , 88 , 88 , Kerberos\n",
        );

        let templates = load_catalog(file.path()).expect("catalog should load");

        assert_eq!(templates[0].protocol, "tcp");
        assert_eq!(templates[0].from_port, 88);
        assert_eq!(templates[0].description, "Kerberos");
    }

    #[test]
    fn malformed_port_is_an_error() {
        let file = write_catalog(
            "protocol,from_port,to_port,description\n\
             tcp,not-a-port,443,broken\n",
        );

        let result = load_catalog(file.path());

        assert!(matches!(result, Err(CatalogError::Malformed(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_catalog(Path::new("/nonexistent/rules.csv"));

        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
