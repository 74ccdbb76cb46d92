use spatidx::config::LoggingConfig;
use spatidx::csvio::{load_csv_file, write_results_file};
use spatidx::{CliArgs, OutputFormatter, Prompter, RTree, RegionTable, Result, SpatidxConfig};
use std::io;
use tracing::{debug, info, warn, Level};

fn main() -> Result<()> {
    let args = CliArgs::parse_args();
    args.validate()?;

    // 生成默认配置文件
    if args.generate_config {
        let config = SpatidxConfig::default();
        config.save_to_file(&args.config)?;
        println!("✅ Generated default configuration: {}", args.config);
        println!("📝 You can edit this file and run spatidx again.");
        return Ok(());
    }

    // 加载配置
    let mut config = SpatidxConfig::from_file(&args.config)?;

    // 命令行参数覆盖配置文件
    if let Some(input) = &args.input {
        config.io.input = input.clone();
    }
    if let Some(output) = &args.output {
        config.io.output = output.clone();
    }
    if let Some(min_entries) = args.min_entries {
        config.index.min_entries = min_entries;
    }
    if let Some(max_entries) = args.max_entries {
        config.index.max_entries = max_entries;
    }
    if let Some(log_level) = &args.log_level {
        config.logging.level = log_level.clone();
    }

    // 验证配置
    config.validate()?;

    // 初始化日志系统
    init_logging(&config.logging)?;
    debug!("spatidx {} starting", env!("CARGO_PKG_VERSION"));

    if args.show_config {
        config.print_summary();
    }

    println!("{}", OutputFormatter::format_banner());

    // 1. 构建索引并加载数据
    let mut tree = RTree::new(config.index.min_entries, config.index.max_entries);
    println!("{}", OutputFormatter::format_section("Loading Data"));
    let report = load_csv_file(&config.io.input, &mut tree)?;
    println!("{}", OutputFormatter::format_load_summary(&config.io.input, &report));

    if tree.is_empty() {
        return Err("R-Tree is empty after attempting to load data. Cannot perform query.".into());
    }
    info!(
        "index ready: {} items, depth {}, {} nodes",
        tree.len(),
        tree.depth(),
        tree.node_count()
    );

    if args.dump {
        tree.print_structure(&mut io::stdout().lock())?;
    }
    if let Some(path) = &args.dump_json {
        std::fs::write(path, tree.export_to_json()?)?;
        info!("tree structure written to '{}'", path.display());
    }

    // 2. 查询参数：命令行优先，缺少的部分交互式输入
    println!("{}", OutputFormatter::format_section("Define Query"));
    let regions = RegionTable::with_extra(&config.regions);
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());

    let query_bounds = match (&args.bounds, &args.region) {
        (Some(bounds), _) => {
            if !bounds.is_valid() {
                warn!("query bounds {} have min > max, using as entered", bounds);
            }
            *bounds
        }
        (None, Some(name)) => prompter.resolve_region(name, &regions)?,
        (None, None) => prompter.read_query_rect(&regions)?,
    };
    let min_population = match args.threshold {
        Some(threshold) => threshold,
        None => prompter.read_threshold()?,
    };

    // 3. 执行查询
    println!("{}", OutputFormatter::format_section("Performing Query"));
    println!("{}", OutputFormatter::format_query(&query_bounds, min_population));
    let results = tree.search_with_population(&query_bounds, min_population);
    info!("query matched {} items", results.len());

    // 4. 写出结果
    println!("{}", OutputFormatter::format_section("Writing Results to CSV File"));
    let written = write_results_file(&config.io.output, &results)?;
    println!("{}", OutputFormatter::format_result_count(written, &config.io.output));

    Ok(())
}

/// 初始化日志系统
///
/// 默认输出到 stderr，避免与标准输出上的交互提示混在一起。
fn init_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    match config.output.as_str() {
        "stdout" => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .with(LevelFilter::from_level(filter))
                .init();
        }
        "file" => {
            let log_file = config
                .log_file
                .as_ref()
                .ok_or("Log output is 'file' but log_file path is not specified")?;

            // 确保日志目录存在
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .map_err(|e| format!("Failed to open log file '{}': {}", log_file.display(), e))?;

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::sync::Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .with(LevelFilter::from_level(filter))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(false),
                )
                .with(LevelFilter::from_level(filter))
                .init();
        }
    }

    Ok(())
}
