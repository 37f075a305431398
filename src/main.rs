use anyhow::Context;
use clap::Parser;
use dailies::config::environment::detect_dev_mode;
use dailies::config::toml_config::TomlConfig;
use dailies::config::{CliConfig, Command, LogFormat};
use dailies::utils::error::ErrorSeverity;
use dailies::utils::{logger, validation::Validate};
use dailies::{
    AppSettings, Backend, Commission, CommissionStore, DailiesApp, DailiesError, DayKey,
    LogNotifier,
};

type App = DailiesApp<Backend, LogNotifier>;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    let dev_mode = detect_dev_mode();

    // 初始化日誌
    let verbose = cli.verbose || dev_mode;
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(verbose),
        LogFormat::Json => logger::init_json_logger(verbose),
    }

    tracing::info!("Starting dailies");
    if dev_mode {
        tracing::debug!("Development mode, CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let settings = match cli.load_settings() {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let app = match open_app(&settings, dev_mode) {
        Ok(app) => app,
        Err(e) => fail(&e),
    };

    let outcome = run_command(&app, &cli);

    // 不論指令成功與否都先釋放儲存資源
    if let Err(e) = app.shutdown() {
        tracing::error!("❌ Failed to close commission store: {}", e);
    }

    if let Err(err) = outcome {
        match err.downcast_ref::<DailiesError>() {
            Some(e) => fail(e),
            None => return Err(err),
        }
    }

    Ok(())
}

fn open_app(settings: &TomlConfig, dev_mode: bool) -> dailies::Result<App> {
    let backend = Backend::open(
        settings.storage.backend,
        &settings.data_path(),
        settings.time_reference(),
    )?;
    let store = CommissionStore::open(backend);

    let app_settings = AppSettings {
        locale: settings.app.locale.clone(),
        dev_mode,
        notifications: settings.app.notifications,
    };
    Ok(DailiesApp::new(store, LogNotifier, app_settings))
}

fn run_command(app: &App, cli: &CliConfig) -> anyhow::Result<()> {
    let reference = app.store().time_reference();

    match &cli.command {
        Command::List { date, at_ms } => {
            let date_ms = match (date, at_ms) {
                (_, Some(ms)) => *ms,
                (Some(day), None) => reference.timestamp_within(*day)?,
                (None, None) => chrono::Utc::now().timestamp_millis(),
            };
            let day = reference.day_key(date_ms)?;
            let commissions = app.load_commissions(date_ms);

            if cli.json {
                print_json(&commissions)?;
            } else {
                print_day(day, &commissions);
            }
        }
        Command::Create {
            description,
            realm,
            rewards,
            at_ms,
        } => {
            let commission = match at_ms {
                Some(ms) => app.create_task_at(description, realm, rewards, *ms)?,
                None => app.create_task(description, realm, rewards)?,
            };

            if cli.json {
                print_json(&commission)?;
            } else {
                println!("✅ Created commission #{} for {}", commission.id, commission.date);
                println!("{}", format_line(&commission));
            }
        }
        Command::Complete { id } => {
            app.complete_task(*id)?;
            if cli.json {
                print_json(&serde_json::json!({ "id": id, "completed": true }))?;
            } else {
                println!("✅ Commission #{} completed", id);
            }
        }
        Command::Delete { id } => {
            app.delete_task(*id)?;
            if cli.json {
                print_json(&serde_json::json!({ "id": id, "deleted": true }))?;
            } else {
                println!("🗑  Commission #{} deleted", id);
            }
        }
        Command::Info => {
            let store = app.store();
            if cli.json {
                print_json(&serde_json::json!({
                    "locale": app.locale(),
                    "dev_mode": app.is_dev(),
                    "storage": store.location(),
                    "time_reference": store.time_reference(),
                }))?;
            } else {
                println!("Locale:          {}", app.locale());
                println!("Development:     {}", app.is_dev());
                println!("Storage:         {}", store.location());
                println!("Day boundaries:  {} time", store.time_reference());
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let output = serde_json::to_string_pretty(value).context("failed to encode output as JSON")?;
    println!("{}", output);
    Ok(())
}

fn print_day(day: DayKey, commissions: &[Commission]) {
    println!("📅 {} ({} commissions)", day, commissions.len());
    for commission in commissions {
        println!("{}", format_line(commission));
    }
}

fn format_line(commission: &Commission) -> String {
    let mark = if commission.completed { "x" } else { " " };
    let mut line = format!(
        "  [{}] #{} {} ({})",
        mark, commission.id, commission.description, commission.realm
    );
    if !commission.rewards.is_empty() {
        line.push_str(" | ");
        line.push_str(&commission.rewards.summary());
    }
    line
}

/// 記錄錯誤並依嚴重程度決定退出碼
fn fail(e: &DailiesError) -> ! {
    tracing::error!(
        "❌ dailies failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
