//! `gridnav`: classify map images into walkability tiles and query paths
//! over them.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gridnav_core::Point;
use gridnav_paths::DiagonalMovement;

#[derive(Parser, Debug)]
#[command(name = "gridnav", about = "Map walkability grids and shortest paths", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file; fields left out keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a map image and write its tiles as JSON
    Classify {
        /// PNG or JPEG map image
        image: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Find a path over a tile set produced by `classify`
    FindPath {
        /// Tiles JSON: a `classify` output or a bare array of tiles
        #[arg(long)]
        tiles: PathBuf,

        /// Start cell as X,Y
        #[arg(long, value_parser = parse_point)]
        start: Point,

        /// End cell as X,Y
        #[arg(long, value_parser = parse_point)]
        end: Point,

        /// manhattan, euclidean, octile or chebyshev
        #[arg(long, default_value = "manhattan")]
        heuristic: String,

        /// Corner-cutting policy (defaults to the configured one)
        #[arg(long)]
        diagonal: Option<DiagonalMovement>,
    },
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<i32>()
            .map_err(|e| format!("bad coordinate {v:?}: {e}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let service = commands::service(cli.config.as_deref())?;
    match cli.command {
        Commands::Classify { image, output } => {
            commands::classify(&service, &image, output.as_deref()).await
        }
        Commands::FindPath {
            tiles,
            start,
            end,
            heuristic,
            diagonal,
        } => commands::find_path(&service, &tiles, start, end, heuristic, diagonal).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn points() {
        assert_eq!(parse_point("3,4"), Ok(Point::new(3, 4)));
        assert_eq!(parse_point(" -1 , 7"), Ok(Point::new(-1, 7)));
        assert!(parse_point("3").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn find_path_args() {
        let cli = Cli::try_parse_from([
            "gridnav",
            "find-path",
            "--tiles",
            "map.json",
            "--start",
            "0,0",
            "--end",
            "5,9",
            "--heuristic",
            "octile",
            "--diagonal",
            "never",
        ])
        .unwrap();
        match cli.command {
            Commands::FindPath {
                start,
                end,
                heuristic,
                diagonal,
                ..
            } => {
                assert_eq!(start, Point::new(0, 0));
                assert_eq!(end, Point::new(5, 9));
                assert_eq!(heuristic, "octile");
                assert_eq!(diagonal, Some(DiagonalMovement::Never));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn classify_args() {
        let cli = Cli::try_parse_from([
            "gridnav", "classify", "map.png", "-o", "tiles.json", "--config", "c.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
        assert!(matches!(cli.command, Commands::Classify { output: Some(_), .. }));
        let bad_policy = Cli::try_parse_from([
            "gridnav",
            "find-path",
            "--tiles",
            "t.json",
            "--start",
            "0,0",
            "--end",
            "1,1",
            "--diagonal",
            "sometimes",
        ]);
        assert!(bad_policy.is_err());
    }
}
