use checklist_weights::adapters::sheet;
use checklist_weights::config::{CliConfig, Command, TomlConfig};
use checklist_weights::core::allocator::{
    format_percent, PercentageAllocator, DEFAULT_TOLERANCE,
};
use checklist_weights::core::ConfigProvider;
use checklist_weights::domain::ports::AuthGateway;
use checklist_weights::utils::error::{ErrorSeverity, Result, WeightError};
use checklist_weights::utils::logger;
use checklist_weights::utils::validation::{
    validate_non_empty_string, validate_required_field, Validate,
};
use checklist_weights::{
    GroupBalance, GroupKind, RestWeightStore, WeightGroupEditor, WeightedEntity,
};
use clap::Parser;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 載入並驗證 TOML 配置
    let settings = match config.config.as_deref().map(load_settings).transpose() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.severity()));
        }
    };

    // 初始化日誌
    let level = settings.as_ref().and_then(|s| s.log_level());
    if settings.as_ref().is_some_and(|s| s.json_logs()) {
        logger::init_json_logger(config.verbose, level);
    } else {
        logger::init_cli_logger(config.verbose, level);
    }

    tracing::info!("Starting checklist-weights");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config.command, settings.as_ref()).await {
        tracing::error!("❌ Command failed: {} (Severity: {:?})", e, e.severity());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let code = exit_code(e.severity());
        if code > 0 {
            std::process::exit(code);
        }
    }

    Ok(())
}

fn load_settings(path: &Path) -> Result<TomlConfig> {
    let settings = TomlConfig::from_file(path)?;
    settings.validate()?;
    Ok(settings)
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

async fn run(command: &Command, settings: Option<&TomlConfig>) -> Result<()> {
    let tolerance = settings.map(|s| s.tolerance()).unwrap_or(DEFAULT_TOLERANCE);
    let allocator = PercentageAllocator::new(tolerance);

    match command {
        Command::Check { sheet: path } => {
            let entities = sheet::read_sheet(path)?;
            print_report(&allocator, &entities);

            match allocator.balance(&entities) {
                GroupBalance::Balanced => Ok(()),
                GroupBalance::Unbalanced {
                    sum, non_positive, ..
                } => Err(WeightError::ValidationFailed {
                    sum,
                    invalid_ids: non_positive,
                }),
            }
        }
        Command::Distribute { sheet: path, output } => {
            let entities = sheet::read_sheet(path)?;
            let distributed = allocator.distribute_equally(&entities);
            save_sheet(path, output.output.as_ref(), &distributed)?;
            print_report(&allocator, &distributed);
            Ok(())
        }
        Command::Set {
            sheet: path,
            id,
            weight,
            output,
        } => {
            let entities = sheet::read_sheet(path)?;
            let updated = allocator.set_weight(&entities, *id, *weight)?;
            save_sheet(path, output.output.as_ref(), &updated)?;
            print_report(&allocator, &updated);
            Ok(())
        }
        Command::Reorder {
            sheet: path,
            from,
            to,
            output,
        } => {
            let entities = sheet::read_sheet(path)?;
            let reordered = allocator.reorder(&entities, *from, *to);
            save_sheet(path, output.output.as_ref(), &reordered)?;
            print_report(&allocator, &reordered);
            Ok(())
        }
        Command::Push {
            sheet: path,
            target,
            username,
            password,
        } => {
            let settings = validate_required_field("--config", &settings)?;
            validate_non_empty_string("--username", username)?;

            let kind = match (target.checklist, target.section) {
                (Some(checklist_id), _) => GroupKind::Sections { checklist_id },
                (None, Some(section_id)) => GroupKind::Items { section_id },
                (None, None) => {
                    return Err(WeightError::MissingConfigError {
                        field: "--checklist or --section".to_string(),
                    })
                }
            };

            // 先讀取工作表，登入之後的每個失敗都會走到登出
            let mut editor = WeightGroupEditor::new(kind, allocator, sheet::read_sheet(path)?);
            let store = RestWeightStore::from_config(*settings)?;
            let session = store.login(username, password).await?;

            let outcome = editor.save(&store, &session).await.map(|saved| saved.to_vec());

            // 不論儲存成功與否都登出
            if let Err(e) = store.logout(session).await {
                tracing::warn!("Logout failed: {}", e);
            }

            let saved = outcome?;
            sheet::write_sheet(path, &saved)?;
            println!("✅ Saved {} ({} entries)", kind, saved.len());
            Ok(())
        }
    }
}

fn save_sheet(
    input: &Path,
    output: Option<&PathBuf>,
    entities: &[WeightedEntity],
) -> Result<()> {
    let target = output.map(PathBuf::as_path).unwrap_or(input);
    sheet::write_sheet(target, entities)?;
    tracing::info!("📁 Sheet saved to: {}", target.display());
    Ok(())
}

fn print_report(allocator: &PercentageAllocator, entities: &[WeightedEntity]) {
    let invalid = allocator.invalid_ids(entities);

    for entity in entities {
        let flag = match entity.id {
            Some(id) if invalid.contains(&id) => "  ⚠ must be above 0%",
            None if entity.weight <= 0.0 => "  ⚠ must be above 0%",
            _ => "",
        };
        println!(
            "{:>3}. {:<30} {:>8}{}",
            entity.order,
            entity.label(),
            format_percent(entity.weight),
            flag
        );
    }

    println!("Total: {}", format_percent(allocator.sum(entities)));
    println!("Remaining: {}", format_percent(allocator.remaining(entities)));
    if allocator.is_valid(entities) {
        println!("✅ Balanced");
    } else {
        println!("❌ Not balanced");
    }
}
