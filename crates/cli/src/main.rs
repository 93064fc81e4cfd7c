use clap::{Parser, Subcommand, ValueEnum};
use carenet_core::{
    config::{
        discovery_url_from_env_value, nearby_limit_from_env_value, nearby_radius_from_env_value,
    },
    decide, Action, Coordinate, CoreConfig, CoreResult, DiscoveryQuery, Hospital,
    HospitalDirectory, HttpNearbyTransport, NonEmptyText, QueryStatus, Resolution,
    SelectionStore, SourceCoordinate, UserIdentity,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "carenet")]
#[command(about = "CareNet hospital network CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StateArg {
    Pending,
    Unauthenticated,
    Resolved,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide whether a user may stay on a route
    Guard {
        /// Route path, e.g. /doctor/H1
        path: String,
        /// Identity resolution state
        #[arg(long, value_enum, default_value = "resolved")]
        state: StateArg,
        /// User id (required when resolved)
        #[arg(long)]
        id: Option<String>,
        /// Tier ordinal: 0 patient, 1 doctor, 2 hospital staff, 3 hospital admin, 4 system admin
        #[arg(long)]
        tier: Option<u8>,
        /// Hospital id for doctors and hospital staff
        #[arg(long)]
        hospital_id: Option<String>,
    },
    /// Find hospitals near a coordinate
    Nearby {
        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lng: f64,
        /// Discovery endpoint (overrides CARENET_DISCOVERY_URL)
        #[arg(long, conflicts_with = "directory")]
        url: Option<String>,
        /// Search a local YAML directory instead of calling the endpoint
        #[arg(long)]
        directory: Option<PathBuf>,
    },
    /// Print bed availability for every hospital in a directory file
    Beds {
        /// YAML directory (overrides HOSPITAL_DIRECTORY_FILE)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Guard {
            path,
            state,
            id,
            tier,
            hospital_id,
        }) => match resolution_from_args(state, id, tier, hospital_id) {
            Ok(resolution) => match decide(&resolution, &path) {
                Action::NoOp => println!("allow {}", path),
                Action::RedirectTo(to) => println!("redirect {} -> {}", path, to),
            },
            Err(e) => eprintln!("Error building identity: {}", e),
        },
        Some(Commands::Nearby {
            lat,
            lng,
            url,
            directory,
        }) => {
            let at = Coordinate::new(lat, lng)?;
            let hospitals = match directory {
                Some(file) => search_directory(&file, at, |name| std::env::var(name).ok())?,
                None => {
                    let cfg = CoreConfig::from_env()?;
                    let endpoint = match url {
                        Some(url) => discovery_url_from_env_value(Some(url))?,
                        None => cfg.discovery_url().clone(),
                    };
                    let transport = HttpNearbyTransport::new(endpoint, cfg.request_timeout())?;
                    let query = DiscoveryQuery::new(transport, SelectionStore::new());
                    match query.query(Some(&SourceCoordinate::at(at))).await {
                        QueryStatus::Success(hospitals) => hospitals,
                        QueryStatus::Error(message) => {
                            eprintln!("Error finding nearby hospitals: {}", message);
                            return Ok(());
                        }
                        QueryStatus::Idle | QueryStatus::Loading => Vec::new(),
                    }
                }
            };
            print_hospitals(at, &hospitals);
        }
        Some(Commands::Beds { file }) => {
            let file = match file {
                Some(file) => file,
                None => CoreConfig::from_env()?.directory_file().to_path_buf(),
            };
            let directory = HospitalDirectory::load(&file)?;
            for hospital in directory.hospitals() {
                let stats = hospital.bed_stats();
                println!(
                    "{}: {}/{} beds available",
                    hospital.name, stats.available_beds, stats.total_beds
                );
            }
        }
        None => {
            println!("Use 'carenet --help' for commands");
        }
    }

    Ok(())
}

fn resolution_from_args(
    state: StateArg,
    id: Option<String>,
    tier: Option<u8>,
    hospital_id: Option<String>,
) -> Result<Resolution, String> {
    match state {
        StateArg::Pending => Ok(Resolution::Pending),
        StateArg::Unauthenticated => Ok(Resolution::Unauthenticated),
        StateArg::Resolved => {
            let id = id.ok_or("--id is required for a resolved user")?;
            let id = NonEmptyText::new(id).map_err(|e| format!("--id: {e}"))?;
            let tier = tier.ok_or("--tier is required for a resolved user")?;
            let hospital_id = hospital_id
                .map(NonEmptyText::new)
                .transpose()
                .map_err(|e| format!("--hospital-id: {e}"))?;
            let user = UserIdentity::new(id, tier, hospital_id).map_err(|e| e.to_string())?;
            Ok(Resolution::Resolved(user))
        }
    }
}

/// Offline nearby search over a local directory file.
///
/// Only the radius and limit settings are read, so a broken discovery endpoint setting does not
/// affect it.
fn search_directory(
    file: &Path,
    at: Coordinate,
    var: impl Fn(&str) -> Option<String>,
) -> CoreResult<Vec<Hospital>> {
    let radius_km = nearby_radius_from_env_value(var("NEARBY_RADIUS_KM"))?;
    let limit = nearby_limit_from_env_value(var("NEARBY_LIMIT"))?;
    Ok(HospitalDirectory::load(file)?.nearby(at, radius_km, limit))
}

fn print_hospitals(at: Coordinate, hospitals: &[Hospital]) {
    if hospitals.is_empty() {
        println!("No hospitals found near {}.", at);
        return;
    }
    for hospital in hospitals {
        let stats = hospital.bed_stats();
        println!(
            "{} ({}) {:.1} km, {}/{} beds available, {}",
            hospital.name,
            hospital.id,
            at.distance_km(&hospital.location),
            stats.available_beds,
            stats.total_beds,
            hospital.phone
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn resolved_requires_id_and_tier() {
        assert!(resolution_from_args(StateArg::Resolved, None, Some(1), None).is_err());
        assert!(resolution_from_args(StateArg::Resolved, Some("u1".into()), None, None).is_err());
    }

    #[test]
    fn builds_doctor_identity() {
        let resolution =
            resolution_from_args(StateArg::Resolved, Some("u1".into()), Some(1), Some("H1".into()))
                .expect("valid doctor");
        assert_eq!(
            decide(&resolution, "/admin"),
            Action::RedirectTo("/doctor/H1".into())
        );
    }

    #[test]
    fn doctor_needs_hospital_id() {
        let err = resolution_from_args(StateArg::Resolved, Some("u1".into()), Some(1), None)
            .expect_err("doctor without hospital");
        assert!(err.contains("hospital"), "{err}");
    }

    #[test]
    fn blank_hospital_id_is_rejected() {
        let err = resolution_from_args(
            StateArg::Resolved,
            Some("u1".into()),
            Some(2),
            Some("  ".into()),
        )
        .expect_err("blank hospital id");
        assert!(err.starts_with("--hospital-id"), "{err}");
    }

    fn directory_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(
            b"hospitals:\n  - id: aiims\n    name: AIIMS New Delhi\n    location: { lat: 28.5672, lng: 77.2100 }\n",
        )
        .expect("write directory");
        file
    }

    #[test]
    fn directory_search_ignores_discovery_url() {
        let file = directory_file();
        let at = Coordinate::new(28.57, 77.21).unwrap();
        let env = |name: &str| match name {
            "CARENET_DISCOVERY_URL" => Some("ftp://not-http".to_string()),
            _ => None,
        };

        let found = search_directory(file.path(), at, env).expect("offline search");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "aiims");
    }

    #[test]
    fn directory_search_honours_radius_setting() {
        let file = directory_file();
        let at = Coordinate::new(28.70, 77.10).unwrap();
        let env = |name: &str| (name == "NEARBY_RADIUS_KM").then(|| "1".to_string());

        assert!(search_directory(file.path(), at, env).unwrap().is_empty());
        assert!(search_directory(file.path(), at, |_| Some("x".into())).is_err());
    }

    #[test]
    fn pending_ignores_identity_flags() {
        let resolution =
            resolution_from_args(StateArg::Pending, None, Some(9), None).expect("pending");
        assert_eq!(resolution, Resolution::Pending);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
