use crate::rtree::Rectangle;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "spatidx",
    version,
    about = "Query rectangular regions stored in an R-tree",
    long_about = "spatidx loads rectangular regions with a name and population from a CSV file into an R-tree,\nthen writes every region that overlaps a query rectangle and meets a population threshold to a CSV file.\nQuery parameters not given on the command line are prompted for interactively."
)]
pub struct CliArgs {
    /// 配置文件路径
    #[arg(short, long, default_value = "spatidx.toml")]
    pub config: String,

    /// 生成默认配置文件并退出
    #[arg(long)]
    pub generate_config: bool,

    /// 打印生效的配置摘要
    #[arg(long)]
    pub show_config: bool,

    /// Input CSV file (overrides config file)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output CSV file (overrides config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Named query region, e.g. "canada" or "world"
    #[arg(short, long, conflicts_with = "bounds")]
    pub region: Option<String>,

    /// Query rectangle as MINX,MINY,MAXX,MAXY
    #[arg(short, long, value_parser = parse_bounds, allow_hyphen_values = true)]
    pub bounds: Option<Rectangle>,

    /// Minimum population of reported regions
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..))]
    pub threshold: Option<i64>,

    /// Print the tree structure after loading
    #[arg(long)]
    pub dump: bool,

    /// Write the tree structure as JSON to this file after loading
    #[arg(long)]
    pub dump_json: Option<PathBuf>,

    /// Minimum node fanout (overrides config file)
    #[arg(long)]
    pub min_entries: Option<usize>,

    /// Maximum node fanout (overrides config file)
    #[arg(long)]
    pub max_entries: Option<usize>,

    /// Log level (overrides config file)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(region) = &self.region {
            if region.trim().is_empty() {
                return Err("Region name must not be empty".to_string());
            }
        }

        if let (Some(min), Some(max)) = (self.min_entries, self.max_entries) {
            if max < min {
                return Err(format!(
                    "--max-entries ({}) must not be smaller than --min-entries ({})",
                    max, min
                ));
            }
        }

        Ok(())
    }
}

/// 解析 `MINX,MINY,MAXX,MAXY` 形式的查询矩形
pub fn parse_bounds(value: &str) -> Result<Rectangle, String> {
    let coords = value
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("invalid coordinate '{}'", part))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    match coords.as_slice() {
        &[min_x, min_y, max_x, max_y] => Ok(Rectangle::new(min_x, min_y, max_x, max_y)),
        _ => Err(format!(
            "expected 4 comma-separated coordinates (MINX,MINY,MAXX,MAXY), found {}",
            coords.len()
        )),
    }
}
