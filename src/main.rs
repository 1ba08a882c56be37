use block_semantics::config::load_config;
use block_semantics::runner::run;
use block_semantics::JsonSceneProvider;
use std::env;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    "Usage: block_semantics <config.json>".to_string()
}

fn run_cli() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config_path = Path::new(&config_path);
    let config = load_config(config_path).map_err(|e| e.to_string())?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));

    let params = config.resolve(base).map_err(|e| e.to_string())?;
    let scene = JsonSceneProvider::load(&config.scene_path(base)).map_err(|e| e.to_string())?;

    let report = run(&scene, &params).map_err(|e| e.to_string())?;
    println!(
        "frames={} failed={} files={} elapsed_ms={:.3}",
        report.frames.len(),
        report.failures.len(),
        report.files_written,
        report.total_ms
    );
    if let Some(path) = &params.report_json {
        println!("JSON report written to {}", path.display());
    }
    Ok(())
}
