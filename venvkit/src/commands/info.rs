//! `venvkit info` — show what a bootstrap would use, without running anything.

use anyhow::Result;
use serde_json::{json, Value};
use venvkit_core::config::BootstrapConfig;
use venvkit_env::installer::Manifest;
use venvkit_env::interpreter;
use venvkit_env::layout::VenvLayout;

fn collect_info(config: &BootstrapConfig) -> Result<Value> {
    let layout = VenvLayout::new(config.venv_path());
    let python = interpreter::find_python(config.python.as_deref()).ok();
    let activation = layout.find_activation_script().ok();
    let manifest = Manifest::load(&config.manifest_path());

    Ok(json!({
        "project_dir": config.project_dir.display().to_string(),
        "venv_dir": layout.root().display().to_string(),
        "venv_exists": layout.exists(),
        "activation_script": activation,
        "python": python.map(|p| p.display().to_string()),
        "manifest": config.manifest_path().display().to_string(),
        "manifest_exists": manifest.is_some(),
        "requirements": manifest.as_ref().map(|m| m.requirements.clone()),
        "manifest_sha256": manifest.as_ref().map(|m| m.sha256.clone()),
    }))
}

pub fn cmd_info(config: &BootstrapConfig, json_output: bool) -> Result<()> {
    let info = collect_info(config)?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let text = |key: &str| info[key].as_str().unwrap_or("-").to_string();
    println!("Project:      {}", text("project_dir"));
    println!(
        "Interpreter:  {}",
        info["python"].as_str().unwrap_or("(not found)")
    );
    let venv_state = if info["venv_exists"].as_bool().unwrap_or(false) {
        "exists"
    } else {
        "missing"
    };
    println!("Venv:         {} ({})", text("venv_dir"), venv_state);
    match info["activation_script"]["path"].as_str() {
        Some(path) => println!("Activation:   {}", path),
        None => println!("Activation:   (not found)"),
    }
    match info["requirements"].as_array() {
        Some(reqs) => println!("Manifest:     {} ({} entries)", text("manifest"), reqs.len()),
        None => println!("Manifest:     {} (missing)", text("manifest")),
    }
    Ok(())
}
