pub mod client;
pub mod config;
pub mod csvio;
pub mod regions;
pub mod rtree;

use std::error::Error;

// 重新导出主要的公共接口
pub use rtree::{Node, NodeId, Point, RTree, Rectangle, StoredItem, TreeError};

// 重新导出常用类型，便于二进制文件使用
pub use client::{CliArgs, OutputFormatter, Prompter};
pub use config::SpatidxConfig;
pub use csvio::{load_csv, load_csv_file, write_results, write_results_file, LoadReport};
pub use regions::RegionTable;

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
