use super::formatter::OutputFormatter;
use crate::regions::RegionTable;
use crate::rtree::Rectangle;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// 交互式输入失败
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("input ended while waiting for {0}")]
    UnexpectedEof(&'static str),
}

/// 逐行读取查询参数，输入无效时重新提示直到得到有效值
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// 读取查询矩形：区域名，或 `manual` 后逐个输入四个坐标
    pub fn read_query_rect(&mut self, regions: &RegionTable) -> Result<Rectangle, PromptError> {
        loop {
            let answer = self.ask(
                "\nEnter region name (e.g., United States, China, World) or type 'manual' for coordinates: ",
                "a region name",
            )?;
            let name = answer.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }

            if name == "manual" {
                return self.read_manual_rect();
            }

            match regions.resolve(&name) {
                Some(bounds) => {
                    writeln!(self.output, "{}", OutputFormatter::format_region_found(&name, &bounds))?;
                    return Ok(bounds);
                }
                None => {
                    writeln!(self.output, "{}", OutputFormatter::format_unknown_region(&name))?;
                    writeln!(self.output, "{}", OutputFormatter::format_region_list(regions.names()))?;
                }
            }
        }
    }

    /// 按已给出的区域名取得查询矩形
    ///
    /// `manual` 直接进入坐标输入，未知名称提示后回到交互式选择。
    pub fn resolve_region(&mut self, name: &str, regions: &RegionTable) -> Result<Rectangle, PromptError> {
        if name.trim().eq_ignore_ascii_case("manual") {
            return self.read_manual_rect();
        }

        match regions.resolve(name) {
            Some(bounds) => {
                writeln!(self.output, "{}", OutputFormatter::format_region_found(name, &bounds))?;
                Ok(bounds)
            }
            None => {
                writeln!(self.output, "{}", OutputFormatter::format_unknown_region(name))?;
                self.read_query_rect(regions)
            }
        }
    }

    /// 逐个读取四个坐标，反向边界照用并给出警告
    pub fn read_manual_rect(&mut self) -> Result<Rectangle, PromptError> {
        writeln!(self.output, "Enter bounds manually.")?;
        let min_x = self.read_f64("  Min X (e.g., longitude): ")?;
        let min_y = self.read_f64("  Min Y (e.g., latitude): ")?;
        let max_x = self.read_f64("  Max X (e.g., longitude): ")?;
        let max_y = self.read_f64("  Max Y (e.g., latitude): ")?;

        let bounds = Rectangle::new(min_x, min_y, max_x, max_y);
        if !bounds.is_valid() {
            warn!("manual query bounds {} have min > max, using as entered", bounds);
            writeln!(
                self.output,
                "{}",
                OutputFormatter::format_warning("Invalid rectangle coordinates (min > max). Using as entered.")
            )?;
        }
        Ok(bounds)
    }

    fn read_f64(&mut self, prompt: &str) -> Result<f64, PromptError> {
        loop {
            let answer = self.ask(prompt, "a coordinate")?;
            match answer.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(value),
                _ => writeln!(self.output, "Invalid input. Please enter a number.")?,
            }
        }
    }

    /// 读取非负的人口阈值
    pub fn read_threshold(&mut self) -> Result<i64, PromptError> {
        let mut prompt = "\nEnter minimum population threshold (e.g., 1000000): ";
        loop {
            let answer = self.ask(prompt, "a population threshold")?;
            match answer.trim().parse::<i64>() {
                Ok(value) if value >= 0 => return Ok(value),
                _ => {
                    writeln!(self.output, "Invalid input. Please enter a non-negative integer.")?;
                    prompt = "Enter minimum population threshold (e.g., 1000000): ";
                }
            }
        }
    }

    /// 输出提示并读取一行，输入结束时返回错误
    fn ask(&mut self, prompt: &str, what: &'static str) -> Result<String, PromptError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::UnexpectedEof(what));
        }
        Ok(line)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
