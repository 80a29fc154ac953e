use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};

use forecast_core::{
    Config, DisplayModel, ForecastClient, QUERY_ERROR_MESSAGE, QueryStatus, TempUnit,
    WeatherQueryController,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "City weather forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the forecast API key.
    Configure,

    /// Show current and next-day weather for a city.
    Show {
        /// City name, free text.
        city: String,

        /// Display temperatures in Fahrenheit instead of Celsius.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Repeated lookups in one session; `:unit` switches units without
    /// re-querying, `:quit` or an empty line exits.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, fahrenheit } => show(&city, fahrenheit).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let key = Password::new("WeatherAPI key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(key.trim().to_string());
    config.save()?;

    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn client_from_config() -> Result<ForecastClient> {
    let config = Config::load()?;
    let api_key = config.resolved_api_key()?;

    Ok(ForecastClient::new(config.base_url, api_key)?)
}

async fn show(city: &str, fahrenheit: bool) -> Result<()> {
    let client = client_from_config()?;

    let mut controller = WeatherQueryController::new();
    if fahrenheit {
        controller.toggle_unit();
    }

    controller.run_query(&client, city).await;

    match controller.state().status() {
        QueryStatus::Error => {
            anyhow::bail!("{}", controller.state().error_message().unwrap_or(QUERY_ERROR_MESSAGE))
        }
        _ => {
            if let Some(model) = controller.display() {
                print_display(&model, controller.state().unit());
            }
            Ok(())
        }
    }
}

async fn interactive() -> Result<()> {
    let client = client_from_config()?;
    let mut controller = WeatherQueryController::new();

    println!("Type a city name, `:unit` to switch units, or `:quit` to exit.");

    loop {
        let line = match Text::new("City:").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        match line.trim() {
            "" | ":quit" => break,
            ":unit" => {
                controller.toggle_unit();
                match controller.display() {
                    Some(model) => print_display(&model, controller.state().unit()),
                    None => println!("Units set to {}.", controller.state().unit()),
                }
            }
            city => {
                controller.run_query(&client, city).await;
                report(&controller);
            }
        }
    }

    Ok(())
}

fn report(controller: &WeatherQueryController) {
    match controller.state().status() {
        QueryStatus::Success => {
            if let Some(model) = controller.display() {
                print_display(&model, controller.state().unit());
            }
        }
        QueryStatus::Error => {
            println!("{}", controller.state().error_message().unwrap_or(QUERY_ERROR_MESSAGE));
            // The last good result stays on screen after a failed lookup.
            if let Some(model) = controller.display() {
                println!("Last successful lookup:");
                print_display(&model, controller.state().unit());
            }
        }
        QueryStatus::Idle | QueryStatus::Loading => {}
    }
}

fn print_display(model: &DisplayModel, unit: TempUnit) {
    println!("{}", model.location_label);
    println!("  Now: {}{} ({})", model.current_temp, unit.symbol(), model.current_condition);
    println!(
        "  {}: {}{} ({})",
        model.forecast_date,
        model.forecast_temp,
        unit.symbol(),
        model.forecast_condition
    );
}
