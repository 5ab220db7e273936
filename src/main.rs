use boundary_capture::core::{CaptureMode, ConfigProvider};
use boundary_capture::utils::error::ErrorSeverity;
use boundary_capture::utils::{logger, validation::Validate};
use boundary_capture::{
    core::export, session_handle, BoundaryError, BoundarySession, CaptureDriver, CaptureEvent,
    CaptureSettings, CliConfig, LocalStorage, PositionError, ReplayPositionSource, TomlConfig,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    let toml_config = match &args.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let verbose = args.verbose || toml_config.as_ref().is_some_and(|c| c.verbose());
    if args.json_logs || toml_config.as_ref().is_some_and(|c| c.json_logs()) {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting boundary-capture");
    if verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let validation = match &toml_config {
        Some(config) => config.validate(),
        None => args.validate(),
    };
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let fixes = args
        .fixes
        .clone()
        .or_else(|| toml_config.as_ref().and_then(|c| c.fixes_file().map(String::from)));
    let Some(fixes) = fixes else {
        eprintln!("❌ No fixes file given; pass --fixes <path> or set capture.fixes_file");
        std::process::exit(1);
    };

    let outcome = match &toml_config {
        Some(config) => run(config, &fixes).await,
        None => run(&args, &fixes).await,
    };

    match outcome {
        Ok(output_path) => {
            println!("✅ Boundary captured");
            println!("📁 Snapshot saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Capture failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 2,
                ErrorSeverity::Medium => 3,
                ErrorSeverity::High => 1,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run<C: ConfigProvider>(config: &C, fixes_path: &str) -> boundary_capture::Result<String> {
    let source = Arc::new(ReplayPositionSource::from_file(fixes_path).await?);
    tracing::info!("📍 Replaying {} fixes from {}", source.remaining(), fixes_path);

    let settings = CaptureSettings::from_config(config)?;
    let session = session_handle(BoundarySession::create(config.session_name()));
    let (mut driver, mut events) = CaptureDriver::new(source, session.clone(), settings);

    driver.start().await?;

    match config.capture_mode() {
        CaptureMode::Manual => loop {
            let result = driver.capture_now().await;
            while let Ok(event) = events.try_recv() {
                log_event(&event);
            }
            match result {
                Ok(_) => {}
                Err(BoundaryError::PositionUnavailable(PositionError::NoSignal))
                | Err(BoundaryError::PointLimitReached { .. }) => break,
                Err(e) if e.severity() == ErrorSeverity::Low => continue,
                Err(e) => {
                    driver.stop().await;
                    return Err(e);
                }
            }
        },
        CaptureMode::Auto => {
            while let Some(event) = events.recv().await {
                log_event(&event);
                if matches!(
                    event,
                    CaptureEvent::PositionUnavailable(PositionError::NoSignal)
                        | CaptureEvent::LimitReached { .. }
                ) {
                    break;
                }
            }
        }
    }

    driver.stop().await;

    let snapshot = {
        let mut session = session.lock().await;
        session.complete(config.min_points())?;
        println!(
            "🌾 {}: {} points, {:.4} ha, {:.1} m perimeter, accuracy {}, progress {}%",
            session.name(),
            session.len(),
            session.area_hectares(),
            session.perimeter_m(),
            session.accuracy_tier().label(),
            session.progress_percent(config.min_points())
        );
        session.snapshot()
    };

    let storage = LocalStorage::new(config.output_path().to_string());
    let file_name = export::export_snapshot(&storage, &snapshot).await?;
    Ok(storage.full_path(&file_name).display().to_string())
}

fn log_event(event: &CaptureEvent) {
    match event {
        CaptureEvent::PointCaptured {
            order,
            area_hectares,
            perimeter_m,
            accuracy_tier,
            ..
        } => tracing::info!(
            "Point #{} captured: {:.4} ha, {:.1} m, {:?}",
            order,
            area_hectares,
            perimeter_m,
            accuracy_tier
        ),
        CaptureEvent::PositionUnavailable(e) => tracing::warn!("Position unavailable: {}", e),
        CaptureEvent::Rejected { reason } => tracing::warn!("Fix rejected: {}", reason),
        CaptureEvent::LimitReached { max_points } => {
            tracing::warn!("Point limit of {} reached", max_points)
        }
    }
}
