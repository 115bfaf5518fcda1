//! Synthesis commands
//!
//! Each command loads the same three inputs (deployment document,
//! optional defaults, optional network catalogue), synthesizes the plan
//! and renders a different view of it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use super::output::Output;
use crate::domain::StackPlan;
use crate::manifest;
use crate::template::Template;

/// Loads the inputs and runs the full synthesis pass
fn load_plan(
    output: &Output,
    doc_path: &Path,
    defaults_path: Option<&Path>,
    networks_path: Option<&Path>,
) -> Result<StackPlan> {
    output.verbose_ctx(
        "load",
        &format!("Reading deployment document: {}", doc_path.display()),
    );
    let doc = manifest::read_deployment(doc_path)?;
    let defaults = manifest::read_defaults(defaults_path)?;
    let networks = manifest::read_networks(networks_path)?;

    let plan = StackPlan::synthesize(&doc, &defaults, &networks)
        .context("Failed to synthesize deployment plan")?;
    output.verbose_ctx(
        "synth",
        &format!(
            "Synthesized {} resources, {} outputs for app '{}'",
            plan.graph.len(),
            plan.outputs.len(),
            plan.config.app_name
        ),
    );
    Ok(plan)
}

/// Renders the deployment template
pub fn synth(
    output: &Output,
    doc_path: &Path,
    defaults_path: Option<&Path>,
    networks_path: Option<&Path>,
    out_path: Option<&Path>,
) -> Result<()> {
    let plan = load_plan(output, doc_path, defaults_path, networks_path)?;
    let template = Template::render(&plan)?;
    output.verbose_ctx(
        "synth",
        &format!("Template fingerprint: {}", template.fingerprint),
    );

    match out_path {
        Some(path) => {
            let mut content = template.to_json()?;
            content.push('\n');
            fs::write(path, content)
                .with_context(|| format!("Failed to write template: {}", path.display()))?;
            output.success(&format!("Wrote template to {}", path.display()));
        }
        None if output.is_json() => output.data(&template),
        None => println!("{}", template.to_json()?),
    }

    Ok(())
}

/// Shows the resource graph in creation order
pub fn graph(
    output: &Output,
    doc_path: &Path,
    defaults_path: Option<&Path>,
    networks_path: Option<&Path>,
) -> Result<()> {
    let plan = load_plan(output, doc_path, defaults_path, networks_path)?;
    let order = plan.graph.topological_order()?;

    if output.is_json() {
        let items: Vec<_> = order
            .iter()
            .filter_map(|id| plan.graph.node(id))
            .map(|node| {
                json!({
                    "id": node.id,
                    "kind": node.kind,
                    "depends_on": node.depends_on,
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    println!("{:<4} {:<26} {:<18} DEPENDS ON", "#", "ID", "KIND");
    println!("{}", "-".repeat(70));
    for (position, id) in order.iter().enumerate() {
        let Some(node) = plan.graph.node(id) else {
            continue;
        };
        let deps: Vec<&str> = node.depends_on.iter().map(|d| d.as_str()).collect();
        println!(
            "{:<4} {:<26} {:<18} {}",
            position + 1,
            node.id.as_str(),
            node.kind.as_str(),
            if deps.is_empty() {
                "-".to_string()
            } else {
                deps.join(", ")
            }
        );
    }
    println!();
    println!("{} resource(s) in creation order", order.len());

    Ok(())
}

/// Shows the projected outputs
pub fn outputs(
    output: &Output,
    doc_path: &Path,
    defaults_path: Option<&Path>,
    networks_path: Option<&Path>,
) -> Result<()> {
    let plan = load_plan(output, doc_path, defaults_path, networks_path)?;

    if output.is_json() {
        let items: Vec<_> = plan
            .outputs
            .iter()
            .map(|binding| {
                json!({
                    "name": binding.name,
                    "source": binding.source,
                    "attribute": binding.attribute,
                    "value": binding.value(),
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    println!("{:<34} VALUE", "NAME");
    println!("{}", "-".repeat(70));
    for binding in &plan.outputs {
        println!("{:<34} {}", binding.name, binding.value());
    }
    println!();
    println!("{} output(s)", plan.outputs.len());

    Ok(())
}

/// Resolves and reports the effective configuration
pub fn validate(
    output: &Output,
    doc_path: &Path,
    defaults_path: Option<&Path>,
    networks_path: Option<&Path>,
) -> Result<()> {
    let plan = load_plan(output, doc_path, defaults_path, networks_path)?;
    let config = &plan.config;

    if output.is_json() {
        output.data(&json!({
            "valid": true,
            "app_name": config.app_name,
            "cluster_name": config.app_name.cluster_name(),
            "version": config.version,
            "networking_enabled": config.networking_enabled(),
            "access_control_enabled": config.access_control_enabled(),
            "logging_enabled": config.logging_enabled,
            "delivery_mode": config.delivery_mode,
            "event_types": config.enabled_event_types(),
            "resources": plan.graph.len(),
            "outputs": plan.outputs.len(),
        }));
        return Ok(());
    }

    output.success("Configuration valid");
    output.blank();
    output.kv("app", config.app_name.as_str());
    output.kv(
        "cluster",
        &format!(
            "{} (version {})",
            config.app_name.cluster_name(),
            config.version.as_str()
        ),
    );
    output.kv("delivery mode", config.delivery_mode.as_str());
    output.kv(
        "networking",
        &match &config.networking {
            Some(networking) => format!(
                "enabled ({}, {})",
                networking.network_name, networking.subnet_class
            ),
            None => "disabled".to_string(),
        },
    );
    output.kv(
        "access control",
        &match &config.access_control {
            Some(access) => format!("enabled ({})", access.master_user_name),
            None => "disabled".to_string(),
        },
    );
    output.kv(
        "logging",
        if config.logging_enabled {
            "enabled"
        } else {
            "disabled"
        },
    );
    output.kv("event types", &config.enabled_event_types().join(", "));
    output.kv("resources", &plan.graph.len().to_string());
    output.kv("outputs", &plan.outputs.len().to_string());

    Ok(())
}
