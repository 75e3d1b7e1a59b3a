//! Implementation of the `strata new` command.
//!
//! Responsibility: turn CLI arguments and config into a
//! [`GenerationRequest`], run it through [`ScaffoldService`], and report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Datelike;
use serde::Serialize;
use tracing::{debug, info, instrument};

use strata_adapters::LocalFilesystem;
use strata_core::{
    application::{GenerationReport, GenerationRequest, ScaffoldService},
    domain::{
        ContextValue, LayerPlan, MarkerInfix, PruneSet, RenderContext, SourceKind, Visibility,
    },
    error::StrataError,
};

use crate::{
    cli::{NewArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute `strata new`.
///
/// 1. Resolve and validate the target path and project name
/// 2. Refuse a non-empty target unless `--force`
/// 3. Build the layer plan, prune set and render context
/// 4. Stop after describing the plan if `--dry-run`
/// 5. Generate and report
#[instrument(skip_all, fields(path = %args.path.display(), template = %args.template))]
pub async fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let (project_name, project_path) = resolve_project_path(&args.path)?;
    validate_project_name(&project_name)?;
    check_target(&project_path, args.force)?;

    let source_kind = if args.remote {
        SourceKind::Remote
    } else {
        SourceKind::Local
    };
    let plan = LayerPlan::standard(source_kind, &args.language, &args.kind, &args.template)
        .map_err(StrataError::from)?;
    let visibility = Visibility::from_private_flag(args.private);
    let prune_set = PruneSet::new()
        .with_rules(config.prune_rules(&args.language))
        .map_err(StrataError::from)?;
    let marker = MarkerInfix::new(config.templates.marker.as_str()).map_err(StrataError::from)?;
    let context = build_context(&project_name, &args, &config);

    debug!(
        layers = plan.len(),
        visibility = %visibility,
        prune_rules = prune_set.len(),
        context_keys = context.len(),
        "Generation request assembled"
    );

    let request = GenerationRequest {
        target_dir: project_path.clone(),
        plan,
        visibility,
        prune_set,
        context,
    };

    if args.dry_run {
        return show_plan(&request, &project_name, &output);
    }

    let source = super::template_source(&config, args.templates_dir.as_deref())?;
    let service = ScaffoldService::new(source, Arc::new(LocalFilesystem::new()), marker);

    output.header(&format!("Creating '{project_name}'..."))?;
    info!(project = %project_name, path = %project_path.display(), "Generation started");

    let spinner = output.spinner(format!("Generating {project_name}"));
    let result = service.generate(&request).await;
    spinner.finish_and_clear();
    let report = result?;

    info!(project = %project_name, files = report.files_copied, "Generation completed");
    show_report(&report, &project_name, &project_path, &output)
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// The project name is the last segment of the target path.
pub fn resolve_project_path(path: &Path) -> CliResult<(String, PathBuf)> {
    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: path.display().to_string(),
            reason: "cannot extract a project name from the last path segment".into(),
        })?
        .to_string();

    Ok((project_name, path.to_path_buf()))
}

fn validate_project_name(name: &str) -> CliResult<()> {
    if name.trim().is_empty() {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot be empty".into(),
        });
    }
    if name.starts_with('.') {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot start with '.'".into(),
        });
    }
    Ok(())
}

/// A missing or empty directory is fine; anything else needs `--force`.
fn check_target(path: &Path, force: bool) -> CliResult<()> {
    if !path.exists() {
        return Ok(());
    }
    if !path.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' exists and is not a directory", path.display()),
        });
    }
    let occupied = std::fs::read_dir(path)
        .map_err(|e| CliError::IoError {
            message: format!("cannot read '{}'", path.display()),
            source: e,
        })?
        .next()
        .is_some();

    if occupied && !force {
        return Err(CliError::ProjectExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

// ── Render context ────────────────────────────────────────────────────────────

/// Built-in values, then config `variables`, then `--var` overrides.
fn build_context(project_name: &str, args: &NewArgs, config: &AppConfig) -> RenderContext {
    let mut context = RenderContext::new()
        .with("project_name", project_name)
        .with("project_name_snake", to_snake_case(project_name))
        .with("project_name_kebab", to_kebab_case(project_name))
        .with("project_name_pascal", to_pascal_case(project_name))
        .with("year", chrono::Local::now().year())
        .with("language", args.language.as_str())
        .with("kind", args.kind.as_str())
        .with("template", args.template.as_str())
        .with("private", args.private)
        .with("public", !args.private);

    for (key, value) in &config.variables {
        context.insert(key.as_str(), value.clone());
    }
    for (key, value) in &args.vars {
        context.insert(key.as_str(), cli_value(value));
    }
    context
}

/// `--var` values are text, except `true`/`false` so they can gate blocks.
fn cli_value(raw: &str) -> ContextValue {
    match raw {
        "true" => ContextValue::Bool(true),
        "false" => ContextValue::Bool(false),
        other => ContextValue::from(other),
    }
}

/// `MyApp`, `my-app`, `HTTPServer` → `my_app`, `my_app`, `http_server`.
fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Lowercased words split on `_`, `-`, `.`, whitespace, a lower→upper
/// transition, and the end of an acronym (`HTTPServer` → `http`, `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current).to_lowercase());
            }
            continue;
        }

        current.push(c);
        let Some(&next) = chars.peek() else {
            continue;
        };
        let lower_to_upper = c.is_lowercase() && next.is_uppercase();
        // "HTTPServer": the 'S' starts the next word.
        let acronym_end = c.is_uppercase()
            && next.is_uppercase()
            && chars.clone().nth(1).is_some_and(char::is_lowercase);
        if lower_to_upper || acronym_end {
            words.push(std::mem::take(&mut current).to_lowercase());
        }
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }
    words
}

// ── Reporting ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct PlanView<'a> {
    project: &'a str,
    target: String,
    visibility: String,
    layers: Vec<LayerView>,
    prune_rules: Vec<String>,
    context: Vec<(&'a str, String)>,
}

#[derive(Serialize)]
struct LayerView {
    role: String,
    coordinate: String,
    required: bool,
}

fn show_plan(request: &GenerationRequest, project: &str, output: &OutputManager) -> CliResult<()> {
    let view = PlanView {
        project,
        target: request.target_dir.display().to_string(),
        visibility: request.visibility.to_string(),
        layers: request
            .plan
            .iter()
            .map(|layer| LayerView {
                role: layer.role.to_string(),
                coordinate: layer.coordinate.to_string(),
                required: layer.is_required(),
            })
            .collect(),
        prune_rules: if request.visibility.is_private() {
            request.prune_set.iter().map(String::from).collect()
        } else {
            Vec::new()
        },
        context: request
            .context
            .iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect(),
    };

    if output.format() == OutputFormat::Json {
        output.json(&view)?;
        return Ok(());
    }

    output.info(&format!(
        "Dry run: would generate '{}' at {}",
        view.project, view.target
    ))?;
    output.print(&format!("  Visibility:   {}", view.visibility))?;
    output.print("  Layers (lowest precedence first):")?;
    for layer in &view.layers {
        let optional = if layer.required { "" } else { " (optional)" };
        output.print(&format!("    {:<16} {}{optional}", layer.role, layer.coordinate))?;
    }
    if !view.prune_rules.is_empty() {
        output.print(&format!("  Prune:        {}", view.prune_rules.join(", ")))?;
    }
    output.print("  Context:")?;
    for (key, value) in &view.context {
        output.print(&format!("    {key} = {value}"))?;
    }
    Ok(())
}

#[derive(Serialize)]
struct ReportView<'a> {
    project: &'a str,
    target: String,
    layers_applied: usize,
    layers_skipped: usize,
    files_copied: usize,
    entries_pruned: usize,
    files_rendered: usize,
}

fn show_report(
    report: &GenerationReport,
    project: &str,
    path: &Path,
    output: &OutputManager,
) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(&ReportView {
            project,
            target: path.display().to_string(),
            layers_applied: report.layers_applied,
            layers_skipped: report.layers_skipped,
            files_copied: report.files_copied,
            entries_pruned: report.entries_pruned,
            files_rendered: report.files_rendered,
        })?;
        return Ok(());
    }

    output.success(&format!("Project '{project}' created at {}", path.display()))?;
    output.print(&format!(
        "  {} layers applied ({} skipped), {} files copied, {} pruned, {} rendered",
        report.layers_applied,
        report.layers_skipped,
        report.files_copied,
        report.entries_pruned,
        report.files_rendered,
    ))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", path.display()))?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(path: &str) -> NewArgs {
        NewArgs {
            path: PathBuf::from(path),
            language: "rust".into(),
            kind: "cli".into(),
            template: "basic".into(),
            remote: false,
            private: false,
            vars: Vec::new(),
            templates_dir: None,
            force: false,
            dry_run: false,
        }
    }

    // ── resolve_project_path ──────────────────────────────────────────────────

    #[test]
    fn name_is_last_segment() {
        let (name, dir) = resolve_project_path(Path::new("../work/my-app")).unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dir, PathBuf::from("../work/my-app"));
    }

    #[test]
    fn parent_segment_has_no_name() {
        assert!(matches!(
            resolve_project_path(Path::new("..")),
            Err(CliError::InvalidProjectName { .. })
        ));
    }

    #[test]
    fn dotfile_name_is_invalid() {
        assert!(validate_project_name(".hidden").is_err());
        assert!(validate_project_name("  ").is_err());
        assert!(validate_project_name("my_app").is_ok());
    }

    // ── check_target ──────────────────────────────────────────────────────────

    #[test]
    fn empty_or_missing_target_is_accepted() {
        let tmp = TempDir::new().unwrap();
        assert!(check_target(tmp.path(), false).is_ok());
        assert!(check_target(&tmp.path().join("new"), false).is_ok());
    }

    #[test]
    fn non_empty_target_needs_force() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("keep.txt"), "x").unwrap();

        assert!(matches!(
            check_target(tmp.path(), false),
            Err(CliError::ProjectExists { .. })
        ));
        assert!(check_target(tmp.path(), true).is_ok());
    }

    #[test]
    fn file_target_is_rejected_even_with_force() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            check_target(&file, true),
            Err(CliError::InvalidInput { .. })
        ));
    }

    // ── context ───────────────────────────────────────────────────────────────

    #[test]
    fn context_layers_builtins_config_and_vars() {
        let mut config = AppConfig::default();
        config
            .variables
            .insert("author".into(), ContextValue::from("Config Author"));
        config
            .variables
            .insert("license".into(), ContextValue::from("MIT"));

        let mut args = args("MyCoolApp");
        args.private = true;
        args.vars = vec![
            ("author".into(), "Cli Author".into()),
            ("ci".into(), "false".into()),
        ];

        let ctx = build_context("MyCoolApp", &args, &config);

        assert_eq!(ctx.interpolate("project_name"), "MyCoolApp");
        assert_eq!(ctx.interpolate("project_name_snake"), "my_cool_app");
        assert_eq!(ctx.interpolate("project_name_kebab"), "my-cool-app");
        assert_eq!(ctx.interpolate("project_name_pascal"), "MyCoolApp");
        assert_eq!(ctx.interpolate("language"), "rust");
        assert!(ctx.is_truthy("private"));
        assert!(!ctx.is_truthy("public"));
        assert_eq!(ctx.interpolate("author"), "Cli Author");
        assert_eq!(ctx.interpolate("license"), "MIT");
        assert_eq!(ctx.get("ci"), Some(&ContextValue::Bool(false)));
        assert_eq!(ctx.interpolate("year").len(), 4);
    }

    // ── case conversion ───────────────────────────────────────────────────────

    #[test]
    fn splits_every_naming_style() {
        assert_eq!(to_snake_case("MyApp"), "my_app");
        assert_eq!(to_snake_case("my-app"), "my_app");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_snake_case("XMLHttpRequest"), "xml_http_request");
        assert_eq!(to_kebab_case("my awesome_app"), "my-awesome-app");
        assert_eq!(to_pascal_case("my-app"), "MyApp");
        assert_eq!(to_pascal_case("HTTPRequest"), "HttpRequest");
        assert_eq!(to_snake_case("app.v2"), "app_v2");
    }
}
