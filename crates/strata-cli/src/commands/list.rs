//! Implementation of the `strata list` command.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::instrument;

use strata_core::{
    application::{CatalogLevel, TemplateService},
    domain::SourceKind,
};

use crate::{
    cli::{ListArgs, ListFormat, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct Catalogue<'a> {
    source: &'static str,
    level: &'static str,
    language: Option<&'a str>,
    kind: Option<&'a str>,
    names: &'a BTreeSet<String>,
}

#[instrument(skip_all, fields(lang = ?args.language, kind = ?args.kind, remote = args.remote))]
pub async fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let source_kind = if args.remote {
        SourceKind::Remote
    } else {
        SourceKind::Local
    };
    let source = super::template_source(&config, args.templates_dir.as_deref())?;
    let service = TemplateService::new(source);

    let (level, names) = service
        .list(source_kind, args.language.as_deref(), args.kind.as_deref())
        .await?;

    // The global --output-format json wins over --format.
    let format = if output.format() == OutputFormat::Json {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Json => output.json(&Catalogue {
            source: source_kind.as_str(),
            level: level.as_str(),
            language: args.language.as_deref(),
            kind: args.kind.as_deref(),
            names: &names,
        })?,
        // Bypasses OutputManager so piped output stays usable under --quiet.
        ListFormat::List => {
            for name in &names {
                println!("{name}");
            }
        }
        ListFormat::Table => {
            output.header(&heading(level, &args))?;
            if names.is_empty() {
                output.warning("Nothing found")?;
            }
            for name in &names {
                output.print(&format!("  {name}"))?;
            }
        }
    }

    Ok(())
}

fn heading(level: CatalogLevel, args: &ListArgs) -> String {
    match (level, args.language.as_deref(), args.kind.as_deref()) {
        (CatalogLevel::Kinds, Some(lang), _) => format!("Kinds for {lang}:"),
        (CatalogLevel::Templates, Some(lang), Some(kind)) => {
            format!("Templates for {lang}/{kind}:")
        }
        _ => "Languages:".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(language: Option<&str>, kind: Option<&str>) -> ListArgs {
        ListArgs {
            language: language.map(String::from),
            kind: kind.map(String::from),
            remote: false,
            templates_dir: None,
            format: ListFormat::Table,
        }
    }

    #[test]
    fn heading_names_the_level() {
        assert_eq!(heading(CatalogLevel::Languages, &args(None, None)), "Languages:");
        assert_eq!(
            heading(CatalogLevel::Kinds, &args(Some("rust"), None)),
            "Kinds for rust:"
        );
        assert_eq!(
            heading(CatalogLevel::Templates, &args(Some("rust"), Some("cli"))),
            "Templates for rust/cli:"
        );
    }

    #[test]
    fn catalogue_serialises_flat() {
        let names: BTreeSet<String> = ["basic".to_string()].into();
        let json = serde_json::to_value(Catalogue {
            source: "local",
            level: "templates",
            language: Some("rust"),
            kind: Some("cli"),
            names: &names,
        })
        .unwrap();
        assert_eq!(json["level"], "templates");
        assert_eq!(json["names"][0], "basic");
    }
}
