use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use weather_core::{City, CityDirectory, Config, city::select_by_id};

use crate::{
    client::ProxyClient,
    render::{Marker, feature_collection},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Pick a city and map its current weather")]
pub struct Cli {
    /// Path to a config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the provider API key, proxy URL and city list.
    Configure,

    /// List cities matching a name.
    Search {
        name: String,
    },

    /// Fetch current weather for a city and print its map marker.
    Show {
        /// City name; prompted for when absent.
        name: Option<String>,

        /// City id, to pick among several cities with the same name.
        #[arg(long)]
        id: Option<u64>,

        /// Write the marker as a GeoJSON FeatureCollection.
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = if matches!(self.command, Command::Configure) {
            config_for_configure(self.config.as_deref())
        } else {
            load_config(self.config.as_deref())?
        };

        match self.command {
            Command::Configure => configure(config, self.config),
            Command::Search { name } => {
                let directory = load_directory(&config)?;
                for city in directory.find_by_name(&name)? {
                    println!("{}", city.label());
                }
                Ok(())
            }
            Command::Show { name, id, geojson } => {
                let directory = load_directory(&config)?;
                let name = match name {
                    Some(n) => n,
                    None => Text::new("Please enter a city or state name:").prompt()?,
                };

                let candidates = directory.find_by_name(&name)?;
                let city = choose_city(candidates, id)?;
                let coordinate = city.coordinate()?;

                let client = ProxyClient::new(&config.client)?;
                let marker = Marker::from_record(client.weather(coordinate).await?);

                println!("{}", marker.popup());
                println!("Marker color: {}", marker.bucket);

                if let Some(path) = geojson {
                    let doc = serde_json::to_string_pretty(&feature_collection(&[marker]))?;
                    fs::write(&path, doc)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                Ok(())
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// `configure` must still run when the existing file is broken, so it can overwrite it.
fn config_for_configure(path: Option<&Path>) -> Config {
    load_config(path).unwrap_or_else(|e| {
        tracing::warn!(error = format!("{e:#}"), "ignoring unreadable config, starting from defaults");
        Config::default()
    })
}

fn load_directory(config: &Config) -> Result<CityDirectory> {
    CityDirectory::load(&config.client.city_list).with_context(|| {
        "Could not load the city list.\n\
         Hint: download city.list.json from OpenWeather and set `client.city_list` via `weather configure`."
    })
}

/// A single match is taken as-is; otherwise `id` picks one, or the user is asked.
fn choose_city(mut candidates: Vec<City>, id: Option<u64>) -> Result<City> {
    if let Some(id) = id {
        return Ok(select_by_id(&candidates, id)?.clone());
    }

    if candidates.len() == 1 {
        return Ok(candidates.swap_remove(0));
    }

    let labels: Vec<String> = candidates.iter().map(City::label).collect();
    let picked = Select::new("Several cities match; pick one:", labels.clone()).prompt()?;
    let index = labels.iter().position(|l| *l == picked).unwrap_or_default();
    Ok(candidates.swap_remove(index))
}

fn configure(mut config: Config, path: Option<PathBuf>) -> Result<()> {
    let api_key = Password::new("OpenWeather API key (leave empty to keep current):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.provider.api_key = Some(api_key.trim().to_string());
    }

    config.client.server_url = Text::new("Weather proxy URL:")
        .with_default(&config.client.server_url)
        .prompt()?;

    let city_list = Text::new("Path to city.list.json:")
        .with_default(&config.client.city_list.display().to_string())
        .prompt()?;
    config.client.city_list = PathBuf::from(city_list);

    let saved = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };
    println!("Saved configuration to {}", saved.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::city::CityCoord;

    fn city(id: u64, state: &str) -> City {
        City {
            id,
            name: "Springfield".into(),
            state: state.into(),
            country: "US".into(),
            coord: CityCoord { lat: 39.8, lon: -89.6 },
        }
    }

    #[test]
    fn single_candidate_needs_no_prompt() {
        let picked = choose_city(vec![city(1, "IL")], None).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn id_selects_among_candidates() {
        let picked = choose_city(vec![city(1, "IL"), city(2, "MO")], Some(2)).unwrap();
        assert_eq!(picked.state, "MO");
    }

    #[test]
    fn unknown_id_is_an_error_not_an_exit() {
        let err = choose_city(vec![city(1, "IL"), city(2, "MO")], Some(7)).unwrap_err();
        assert!(err.to_string().contains("city id 7"));
    }

    #[test]
    fn configure_recovers_from_corrupt_config() {
        let dir = std::env::temp_dir().join(format!("weather-cli-corrupt-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[client\nserver_url = ").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));

        let cfg = config_for_configure(Some(&path));
        assert_eq!(cfg.client.city_list, PathBuf::from("city.list.json"));
        assert!(cfg.provider.api_key.is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn parses_show_with_flags() {
        let cli = Cli::try_parse_from(["weather", "show", "berlin", "--id", "2950159", "--geojson", "out.json"])
            .unwrap();

        match cli.command {
            Command::Show { name, id, geojson } => {
                assert_eq!(name.as_deref(), Some("berlin"));
                assert_eq!(id, Some(2950159));
                assert_eq!(geojson, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
