use std::error::Error;

use clap::Parser;
use route_planner::config::ProviderConfig;
use route_planner::{GeoPoint, RoutePlanner, TravelMode};
use tracing_subscriber::EnvFilter;

/// Compute a traffic-aware route between two points
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Origin as "lat,lon" (e.g. "14.5995,120.9842")
    #[arg(long, allow_hyphen_values = true)]
    from: GeoPoint,

    /// Destination as "lat,lon"
    #[arg(long, allow_hyphen_values = true)]
    to: GeoPoint,

    /// car, bicycle, walking or transit
    #[arg(short, long, default_value = "car")]
    mode: TravelMode,

    /// Print the full result as JSON instead of the summary card
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ProviderConfig::from_env()?;
    let planner = RoutePlanner::from_config(&config)?;

    match planner.compute_route(Some(cli.from), Some(cli.to), cli.mode) {
        Ok(result) if cli.json => println!("{}", serde_json::to_string_pretty(&result)?),
        Ok(result) => println!("{}", result),
        Err(err) => {
            tracing::error!(error = %err, "route computation failed");
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_coordinates_parse() {
        let cli = Cli::try_parse_from([
            "route-planner",
            "--from",
            "-33.8688,151.2093",
            "--to",
            "-33.87,151.21",
            "--mode",
            "walking",
        ])
        .unwrap();
        assert_eq!(cli.from.lat, -33.8688);
        assert_eq!(cli.to.lat, -33.87);
        assert_eq!(cli.mode, TravelMode::Walking);
    }

    #[test]
    fn test_negative_longitude_and_default_mode() {
        let cli = Cli::try_parse_from(["route-planner", "--from", "40.7,-74.0", "--to", "-1.5,-70.25"])
            .unwrap();
        assert_eq!(cli.from.lon, -74.0);
        assert_eq!(cli.to.lat, -1.5);
        assert_eq!(cli.mode, TravelMode::Car);
        assert!(!cli.json);
    }

    #[test]
    fn test_missing_destination_is_rejected() {
        assert!(Cli::try_parse_from(["route-planner", "--from", "-33.8688,151.2093"]).is_err());
    }
}
