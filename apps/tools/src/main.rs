use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ingest::{export, open_source, IconRegistry, MapController, VisibleSet};
use shared::domain::ActiveFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Base URL prepended to icon file names.
    #[arg(long, default_value = "")]
    icon_base_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every marker a source produces and the rows it skips.
    Inspect { source: String },
    /// List the markers left visible after applying a filter.
    Filter {
        source: String,
        #[arg(long, value_parser = parse_filter)]
        category: ActiveFilter,
    },
    /// Print the visible markers as a GeoJSON FeatureCollection.
    Geojson {
        source: String,
        #[arg(long, value_parser = parse_filter, default_value = "all")]
        category: ActiveFilter,
    },
}

fn parse_filter(raw: &str) -> Result<ActiveFilter, String> {
    raw.parse().map_err(|err: shared::error::ApiException| err.message)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut map = MapController::new(
        IconRegistry::with_base_url(&cli.icon_base_url),
        VisibleSet::default(),
    );

    match cli.command {
        Command::Inspect { source } => {
            let report = load(&mut map, &source).await?;
            for marker in map.markers() {
                print_marker(marker);
            }
            for skipped in &report.skipped {
                println!("skipped line {}: {}", skipped.line, skipped.reason);
            }
            println!(
                "{} markers, {} rows skipped",
                report.added.len(),
                report.skipped.len()
            );
        }
        Command::Filter { source, category } => {
            load(&mut map, &source).await?;
            let outcome = map.apply_filter(category);
            for marker in map.visible_markers() {
                print_marker(marker);
            }
            println!(
                "filter '{}': {} shown, {} hidden",
                outcome.active,
                outcome.shown.len(),
                outcome.hidden.len()
            );
        }
        Command::Geojson { source, category } => {
            load(&mut map, &source).await?;
            map.apply_filter(category);
            let collection = export::feature_collection(map.visible_markers());
            println!("{}", serde_json::to_string_pretty(&collection)?);
        }
    }

    Ok(())
}

async fn load(
    map: &mut MapController<VisibleSet>,
    location: &str,
) -> Result<ingest::IngestReport> {
    let source = open_source(location)?;
    let rows = source
        .fetch_rows()
        .await
        .with_context(|| format!("failed to load '{}'", source.describe()))?;
    Ok(map.ingest(rows))
}

fn print_marker(marker: &ingest::Marker) {
    let position = marker.position();
    println!(
        "#{:<4} {:>10.5} {:>11.5}  {:<18} {}",
        marker.id().0,
        position.lat,
        position.lng,
        marker.category().as_str(),
        marker.name()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use shared::domain::Category;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn filter_flag_accepts_control_values() {
        let cli = Cli::try_parse_from(["tools", "filter", "points.csv", "--category", "Objects Dept"])
            .expect("parse");
        match cli.command {
            Command::Filter { category, .. } => {
                assert_eq!(category, ActiveFilter::Category(Category::ObjectsDept));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn filter_flag_rejects_unknown_categories() {
        let err = Cli::try_parse_from(["tools", "filter", "points.csv", "--category", "brunch"])
            .expect_err("should fail");
        assert!(err.to_string().contains("unknown filter category"));
    }

    #[test]
    fn geojson_defaults_to_all() {
        let cli = Cli::try_parse_from(["tools", "geojson", "points.csv"]).expect("parse");
        match cli.command {
            Command::Geojson { category, .. } => assert_eq!(category, ActiveFilter::All),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
