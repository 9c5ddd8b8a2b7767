use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;

use ads_router_service::config::loader::load_config_with_env;
use ads_router_service::config::validate_ams_options;
use ads_router_service::error::EXIT_CONFIG;
use ads_router_service::routing::Route;

#[derive(Parser)]
#[command(name = "route-check")]
#[command(about = "Validate an ADS router configuration and print the resulting route", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "AMSConfiguration.json")]
    config: PathBuf,

    /// Print the configuration and route as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config_with_env(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: cannot load {}: {}", cli.config.display(), e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let ams = match validate_ams_options(&config.ams) {
        Ok(ams) => ams,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };
    let route = Route::from_configuration(&ams);

    if cli.json {
        let report = json!({ "configuration": ams, "route": route });
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Local AMS Net ID:  {}", ams.local_address);
        println!(
            "Route {:?}: {} via {} (resolved: {})",
            route.name, route.remote_address, route.remote_ip, route.resolved
        );
    }

    if !route.resolved {
        eprintln!("Error: {} is not an IP address; the supervisor will refuse this route", route.remote_ip);
        return ExitCode::from(EXIT_CONFIG);
    }
    ExitCode::SUCCESS
}
