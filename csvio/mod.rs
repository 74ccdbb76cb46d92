// CSV 输入输出
//
// - reader: 读取区域数据文件并插入R-tree，逐行跳过无效记录
// - writer: 把查询结果写成带表头的 CSV 文件

pub mod reader;
pub mod writer;

pub use reader::{load_csv, load_csv_file, IngestError, LoadReport, RejectedRow, RowError};
pub use writer::{write_results, write_results_file, OutputError};

/// 输入与输出文件共用的表头
pub const CSV_HEADER: [&str; 7] = ["ID", "Name", "Population", "MinX", "MinY", "MaxX", "MaxY"];
