use super::CSV_HEADER;
use crate::rtree::StoredItem;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// 写出查询结果失败
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("could not open output file '{}': {}", .path.display(), .source)]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 把查询结果写成 CSV，返回写出的行数（不含表头）
///
/// 表头总是写出，即使没有结果。名称字段总是加引号（内部引号加倍），数值字段不加。
pub fn write_results<W: Write>(mut out: W, items: &[&StoredItem]) -> Result<usize, OutputError> {
    writeln!(out, "{}", CSV_HEADER.join(","))?;

    for item in items {
        writeln!(
            out,
            "{},{},{},{},{},{},{}",
            item.id,
            quote_name(&item.name),
            item.population,
            item.bounds.min_corner.x,
            item.bounds.min_corner.y,
            item.bounds.max_corner.x,
            item.bounds.max_corner.y,
        )?;
    }
    out.flush()?;

    Ok(items.len())
}

fn quote_name(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// 创建（或覆盖）结果文件并写入查询结果
pub fn write_results_file<P: AsRef<Path>>(path: P, items: &[&StoredItem]) -> Result<usize, OutputError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let written = write_results(BufWriter::new(file), items)?;
    info!("Wrote {} result rows to '{}'", written, path.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csvio::reader::load_csv_file;
    use crate::rtree::{RTree, Rectangle};

    fn render(items: &[&StoredItem]) -> String {
        let mut out = Vec::new();
        write_results(&mut out, items).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(render(&[]), "ID,Name,Population,MinX,MinY,MaxX,MaxY\n");
    }

    #[test]
    fn test_row_format() {
        let item = StoredItem::new(3, "Chicago Area", 2_700_000, Rectangle::new(-88.5, 41.0, -87.0, 42.5));
        let text = render(&[&item]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "3,\"Chicago Area\",2700000,-88.5,41,-87,42.5");
    }

    #[test]
    fn test_names_are_escaped() {
        let item = StoredItem::new(1, "Say \"hi\", world", 1, Rectangle::new(0.0, 0.0, 1.0, 1.0));
        let text = render(&[&item]);
        assert_eq!(text.lines().nth(1).unwrap(), "1,\"Say \"\"hi\"\", world\",1,0,0,1,1");
    }

    #[test]
    fn test_numeric_looking_names_are_quoted() {
        let items = [
            StoredItem::new(1, "42", 10, Rectangle::new(0.0, 0.0, 1.0, 1.0)),
            StoredItem::new(2, "-3.5", 20, Rectangle::new(0.0, 0.0, 1.0, 1.0)),
            StoredItem::new(3, "", 30, Rectangle::new(0.0, 0.0, 1.0, 1.0)),
        ];
        let refs: Vec<&StoredItem> = items.iter().collect();
        let text = render(&refs);
        let lines: Vec<&str> = text.lines().skip(1).collect();

        assert_eq!(lines, vec!["1,\"42\",10,0,0,1,1", "2,\"-3.5\",20,0,0,1,1", "3,\"\",30,0,0,1,1"]);
    }

    #[test]
    fn test_written_file_reloads() {
        let items = [
            StoredItem::new(1, "Alpha, North", 10, Rectangle::new(0.0, 0.0, 1.0, 1.0)),
            StoredItem::new(2, "Beta", 20, Rectangle::new(2.5, 2.5, 3.5, 3.5)),
        ];
        let refs: Vec<&StoredItem> = items.iter().collect();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        assert_eq!(write_results_file(&path, &refs).unwrap(), 2);

        let mut tree = RTree::default();
        let report = load_csv_file(&path, &mut tree).unwrap();
        assert_eq!(report.loaded, 2);
        assert!(report.rejected.is_empty());
        assert_eq!(tree.items(), refs);
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("results.csv");
        let err = write_results_file(&path, &[]).unwrap_err();
        assert!(matches!(err, OutputError::Create { .. }));
    }
}
