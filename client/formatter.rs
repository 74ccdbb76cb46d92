use crate::csvio::LoadReport;
use crate::rtree::Rectangle;
use colored::*;
use std::path::Path;

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format_banner() -> String {
        "===== R-Tree Spatial Query Application =====".bold().to_string()
    }

    pub fn format_section(title: &str) -> String {
        format!("\n--- {} ---", title).cyan().to_string()
    }

    pub fn format_load_summary(path: &Path, report: &LoadReport) -> String {
        let mut summary = format!(
            "Finished loading '{}':\n  Total lines processed: {}\n  Items loaded successfully: {}\n  Items skipped (comments/errors): {}",
            path.display(),
            report.lines_processed.to_string().cyan(),
            report.loaded.to_string().green(),
            Self::format_count(report.skipped()),
        );
        if report.loaded == 0 {
            let reason = if report.lines_processed <= 1 {
                "Input file seems empty or contains only a header."
            } else {
                "No valid data items were loaded from the input file!"
            };
            summary.push('\n');
            summary.push_str(&Self::format_error(reason));
        }
        summary
    }

    fn format_count(count: usize) -> String {
        if count == 0 {
            count.to_string().green().to_string()
        } else {
            count.to_string().yellow().to_string()
        }
    }

    pub fn format_region_found(name: &str, bounds: &Rectangle) -> String {
        match bounds.center() {
            Some(center) => format!(
                "Found bounds for '{}': {} (center {},{})",
                name.green(),
                bounds,
                center.x,
                center.y
            ),
            None => format!("Found bounds for '{}': {}", name.green(), bounds),
        }
    }

    pub fn format_unknown_region(name: &str) -> String {
        format!(
            "Input '{}' not recognized as a predefined region or 'manual'. Please try again.",
            name.yellow()
        )
    }

    pub fn format_query(bounds: &Rectangle, min_population: i64) -> String {
        format!(
            "Searching within bounds: {} for population >= {}",
            bounds.to_string().cyan(),
            min_population.to_string().cyan()
        )
    }

    pub fn format_result_count(count: usize, output: &Path) -> String {
        if count == 0 {
            "No areas found matching the criteria. CSV file contains only the header."
                .yellow()
                .to_string()
        } else {
            format!(
                "Found {} area(s) matching the criteria.\nSuccessfully wrote results to '{}'.",
                count.to_string().green(),
                output.display()
            )
        }
    }

    pub fn format_warning(message: &str) -> String {
        format!("Warning: {}", message).yellow().to_string()
    }

    pub fn format_error(message: &str) -> String {
        format!("(error) {}", message.red())
    }

    pub fn format_region_list<'a>(names: impl Iterator<Item = &'a str>) -> String {
        let names: Vec<&str> = names.collect();
        format!("Known regions: {}", names.join(", ").blue())
    }
}
