use super::CSV_HEADER;
use crate::rtree::{RTree, Rectangle, StoredItem};
use csv::{Position, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 单行记录无法转换为数据条目的原因
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[error("invalid {field} '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("ID={id}: invalid bounds (min > max) {bounds}")]
    InvertedBounds { id: i32, bounds: Rectangle },
    #[error("ID={id}: negative population {population}")]
    NegativePopulation { id: i32, population: i64 },
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// 读取输入文件失败
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("could not open input data file '{}': {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// 被跳过的记录及其行号
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub line: u64,
    pub error: RowError,
}

/// 一次加载的统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// 读到的最后一行的行号（含表头）
    pub lines_processed: u64,
    /// 成功插入的条目数
    pub loaded: usize,
    /// 跳过的注释行
    pub comments: usize,
    /// 因格式或取值问题被拒绝的记录
    pub rejected: Vec<RejectedRow>,
}

impl LoadReport {
    /// 跳过的总行数（注释 + 被拒绝的记录）
    pub fn skipped(&self) -> usize {
        self.comments + self.rejected.len()
    }
}

/// 从任意输入读取 CSV 数据并插入到树中
///
/// 第一行视为表头，与期望不一致时只记录警告。之后以 `#` 开头的行计为注释，
/// 在交给 csv 解析器之前按原始行剔除，因此注释里的引号不会影响后续记录。
/// 空行和只含空白的行直接丢弃。单行问题不会中断加载，只有底层 IO 错误会返回 `Err`。
pub fn load_csv<R: Read>(mut input: R, tree: &mut RTree) -> Result<LoadReport, IngestError> {
    let mut raw = Vec::new();
    input.read_to_end(&mut raw)?;

    let mut report = LoadReport::default();
    let data = blank_skipped_lines(&raw, &mut report.comments);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data.as_slice());

    let mut header_seen = false;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                let line = err
                    .position()
                    .map_or(report.lines_processed + 1, |p| record_line(&data, p));
                report.lines_processed = report.lines_processed.max(line);
                reject(&mut report, line, RowError::Malformed(err.to_string()));
                continue;
            }
        };

        let line = record
            .position()
            .map_or(report.lines_processed + 1, |p| record_line(&data, p));
        report.lines_processed = line;

        if !header_seen {
            header_seen = true;
            check_header(&record);
            continue;
        }

        match parse_record(&record) {
            Ok(item) => {
                tree.insert(item);
                report.loaded += 1;
            }
            Err(error) => reject(&mut report, line, error),
        }
    }

    Ok(report)
}

/// 把第一行之后的注释行和空白行清空，只保留换行符，行号不变
fn blank_skipped_lines(raw: &[u8], comments: &mut usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(raw.len());
    for (index, line) in raw.split_inclusive(|&b| b == b'\n').enumerate() {
        let content = line.strip_suffix(b"\n").unwrap_or(line);
        let content = content.strip_suffix(b"\r").unwrap_or(content);

        let is_comment = index > 0 && content.first() == Some(&b'#');
        let is_blank = content.iter().all(u8::is_ascii_whitespace);
        if is_comment {
            *comments += 1;
        }
        if index == 0 || !(is_comment || is_blank) {
            data.extend_from_slice(content);
        }
        data.extend_from_slice(&line[content.len()..]);
    }
    data
}

/// csv 记录的位置指向上一条记录的结尾，跳过中间的空行才是记录真正所在的行
fn record_line(data: &[u8], position: &Position) -> u64 {
    let start = usize::try_from(position.byte()).unwrap_or(data.len()).min(data.len());
    let skipped = data[start..]
        .iter()
        .take_while(|&&b| b == b'\n' || b == b'\r')
        .filter(|&&b| b == b'\n')
        .count();
    position.line() + skipped as u64
}

/// 打开文件并加载其中的数据
pub fn load_csv_file<P: AsRef<Path>>(path: P, tree: &mut RTree) -> Result<LoadReport, IngestError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loading data from '{}'", path.display());
    let report = load_csv(file, tree)?;
    info!(
        "Loaded {} items from '{}' ({} lines, {} skipped)",
        report.loaded,
        path.display(),
        report.lines_processed,
        report.skipped()
    );
    Ok(report)
}

fn reject(report: &mut LoadReport, line: u64, error: RowError) {
    warn!("Skipping line {}: {}", line, error);
    report.rejected.push(RejectedRow { line, error });
}

fn check_header(record: &StringRecord) {
    if !record.iter().eq(CSV_HEADER.iter().copied()) {
        warn!(
            "CSV header mismatch. Expected '{}', found '{}'",
            CSV_HEADER.join(","),
            record.iter().collect::<Vec<_>>().join(",")
        );
    }
}

/// 把一条记录转换为数据条目
pub fn parse_record(record: &StringRecord) -> Result<StoredItem, RowError> {
    if record.len() != CSV_HEADER.len() {
        return Err(RowError::ColumnCount {
            expected: CSV_HEADER.len(),
            found: record.len(),
        });
    }

    let id: i32 = parse_field(record, 0, "ID")?;
    let name = record[1].to_string();
    let population: i64 = parse_field(record, 2, "Population")?;
    let min_x = parse_coordinate(record, 3, "MinX")?;
    let min_y = parse_coordinate(record, 4, "MinY")?;
    let max_x = parse_coordinate(record, 5, "MaxX")?;
    let max_y = parse_coordinate(record, 6, "MaxY")?;

    let bounds = Rectangle::new(min_x, min_y, max_x, max_y);
    if !bounds.is_valid() {
        return Err(RowError::InvertedBounds { id, bounds });
    }
    if population < 0 {
        return Err(RowError::NegativePopulation { id, population });
    }

    Ok(StoredItem::new(id, name, population, bounds))
}

fn parse_field<T: std::str::FromStr>(
    record: &StringRecord,
    index: usize,
    field: &'static str,
) -> Result<T, RowError> {
    let value = &record[index];
    value.parse().map_err(|_| RowError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// 坐标必须是有限值，溢出为无穷大的数字也视为无效
fn parse_coordinate(record: &StringRecord, index: usize, field: &'static str) -> Result<f64, RowError> {
    let value: f64 = parse_field(record, index, field)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RowError::InvalidNumber {
            field,
            value: record[index].to_string(),
        })
    }
}
