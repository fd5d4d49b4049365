//! CSV export of flattened lines.

use std::path::Path;

use csv_async::AsyncWriterBuilder;
use tokio::io::AsyncWrite;
use turtle_flatten::FlatLine;

use crate::{CliError, Result};

pub const CSV_HEADER: [&str; 4] = ["Subject", "Predicate", "Index", "Object"];

/// Write `lines` as CSV records to `writer`.
///
/// The predicate and index chains are written in their joined form
/// (`p1|p2`, `1,2`); objects are written verbatim, quotes included.
pub async fn write_csv<W>(
    writer: W,
    lines: &[FlatLine],
    delimiter: u8,
) -> std::result::Result<(), csv_async::Error>
where
    W: AsyncWrite + Unpin,
{
    let mut csv = AsyncWriterBuilder::new()
        .delimiter(delimiter)
        .create_writer(writer);

    csv.write_record(&CSV_HEADER).await?;
    for line in lines {
        let predicate = line.predicate_path();
        let index = line.index_path();
        csv.write_record(&[
            line.subject.as_str(),
            predicate.as_str(),
            index.as_str(),
            line.object.as_str(),
        ])
        .await?;
    }
    csv.flush().await?;
    Ok(())
}

/// Create `path` and export `lines` into it.
pub async fn export_csv(path: &Path, lines: &[FlatLine], delimiter: char) -> Result<()> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(CliError::Delimiter(delimiter))?;

    let file = tokio::fs::File::create(path)
        .await
        .map_err(|source| CliError::Write {
            path: path.to_owned(),
            source,
        })?;
    write_csv(file, lines, delimiter)
        .await
        .map_err(|source| CliError::Csv {
            path: path.to_owned(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_write_csv() -> anyhow::Result<()> {
        let lines = vec![
            "<s> <<p>>[1] \"plain\"".parse::<FlatLine>()?,
            "<s> <<p>|<q>>[2,1] \"a, b\"".parse::<FlatLine>()?,
        ];
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &lines, b',').await?;

        assert_eq!(
            String::from_utf8(buffer)?,
            concat!(
                "Subject,Predicate,Index,Object\n",
                "<s>,<p>,1,\"\"\"plain\"\"\"\n",
                "<s>,<p>|<q>,\"2,1\",\"\"\"a, b\"\"\"\n",
            )
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_custom_delimiter() -> anyhow::Result<()> {
        let lines = vec!["ex:s <ex:p>[1] ex:o".parse::<FlatLine>()?];
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &lines, b'\t').await?;

        assert_eq!(
            String::from_utf8(buffer)?,
            "Subject\tPredicate\tIndex\tObject\nex:s\tex:p\t1\tex:o\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_wide_delimiter() {
        let result = export_csv(Path::new("unused.csv"), &[], '¤').await;
        assert!(matches!(result, Err(CliError::Delimiter('¤'))));
    }
}
