// ==========================================
// SpaceNet 货运清单引擎 - 命令行入口
// ==========================================
// 用法:
//   spacenet-manifest <scenario.json> [--config <config.db>] [--output <report.json>]
//                     [--packing-list <packing.csv>] [--log-json]
// 流程: 导入场景 → 自动打包/装载 → 物化装载事件 → 输出报告
// ==========================================

use spacenet_manifest::config::{ConfigManager, ManifestConfig};
use spacenet_manifest::db::default_db_path;
use spacenet_manifest::importer::JsonScenarioSource;
use spacenet_manifest::report::{write_packing_list_file, ManifestReport};
use spacenet_manifest::{logging, Manifest, APP_NAME, VERSION};
use std::error::Error;
use std::path::PathBuf;

const USAGE: &str = "用法: spacenet-manifest <scenario.json> [--config <config.db>] [--output <report.json>] [--packing-list <packing.csv>] [--log-json]";

#[derive(Debug, Default)]
struct CliArgs {
    scenario: PathBuf,
    config_db: Option<PathBuf>,
    output: Option<PathBuf>,
    packing_list: Option<PathBuf>,
    log_json: bool,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut scenario = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => cli.config_db = Some(next_value(&mut args, &arg)?.into()),
            "--output" => cli.output = Some(next_value(&mut args, &arg)?.into()),
            "--packing-list" => cli.packing_list = Some(next_value(&mut args, &arg)?.into()),
            "--log-json" => cli.log_json = true,
            other if other.starts_with("--") => return Err(format!("未知参数: {}", other)),
            other => {
                if scenario.is_some() {
                    return Err(format!("多余的位置参数: {}", other));
                }
                scenario = Some(PathBuf::from(other));
            }
        }
    }

    cli.scenario = scenario.ok_or_else(|| "缺少场景文件".to_string())?;
    Ok(cli)
}

fn next_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Result<String, String> {
    args.next().ok_or_else(|| format!("参数 {} 缺少取值", flag))
}

/// 显式指定的配置库必须可用；默认路径下的配置库仅在存在时读取
fn load_config(cli: &CliArgs) -> Result<ManifestConfig, Box<dyn Error>> {
    let db_path = match &cli.config_db {
        Some(path) => path.clone(),
        None => {
            let path = default_db_path();
            if !path.exists() {
                tracing::info!("未找到配置库，使用内置默认配置");
                return Ok(ManifestConfig::default());
            }
            path
        }
    };

    tracing::info!("使用配置库: {}", db_path.display());
    let manager = ConfigManager::new(&db_path.to_string_lossy())?;
    manager.load_manifest_config()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{}", msg);
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", APP_NAME, VERSION);
    tracing::info!("==================================================");

    let config = load_config(&cli)?;
    let mut manifest = Manifest::new(config);

    let source = JsonScenarioSource::new(&cli.scenario);
    let import = manifest.import_demands(&source)?;
    let summary = manifest.auto_manifest();
    let outcome = manifest.generate_manifest_events();

    if !outcome.is_clean() {
        tracing::warn!(failures = outcome.failures.len(), "部分片段未能物化");
    }

    let report = ManifestReport::build(&manifest, Some(import), Some(summary), outcome);

    match &cli.output {
        Some(path) => {
            report.write_json(path)?;
            tracing::info!("报告已写出: {}", path.display());
        }
        None => println!("{}", report.to_json_pretty()?),
    }

    if let Some(path) = &cli.packing_list {
        let rows = write_packing_list_file(&report, path)?;
        tracing::info!(rows, "装箱清单已写出: {}", path.display());
    }

    tracing::info!(
        containers = report.containers.len(),
        events = report.events.len(),
        unsatisfied = report.unsatisfied_demands(),
        "清单生成完成"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_args_full() {
        let cli = parse_args(args(&[
            "scenario.json",
            "--config",
            "cfg.db",
            "--output",
            "out.json",
            "--packing-list",
            "list.csv",
            "--log-json",
        ]))
        .unwrap();

        assert_eq!(cli.scenario, PathBuf::from("scenario.json"));
        assert_eq!(cli.config_db, Some(PathBuf::from("cfg.db")));
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert_eq!(cli.packing_list, Some(PathBuf::from("list.csv")));
        assert!(cli.log_json);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["a.json", "--output"])).is_err());
        assert!(parse_args(args(&["a.json", "--bogus"])).is_err());
        assert!(parse_args(args(&["a.json", "b.json"])).is_err());
    }
}
