use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use patreg_core::{
    store_config_from_env_value, CoreConfig, DemographicsDraft, Diagnosis, PatientDraft,
    PatientError, PatientRecord, PatientService, ShardableUuid,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "patreg")]
#[command(about = "Patient registry CLI")]
struct Cli {
    /// Store URL (memory://, sqlite:..., file://...)
    #[arg(long, global = true, env = "PATIENT_STORE_URL")]
    store: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct DemographicsArgs {
    /// Full name
    #[arg(long)]
    name: Option<String>,
    /// Medical record number
    #[arg(long)]
    mrn: Option<String>,
    /// Age in years
    #[arg(long, allow_negative_numbers = true)]
    age: Option<i64>,
    /// Gender
    #[arg(long)]
    gender: Option<String>,
    /// Contact (repeat for several)
    #[arg(long = "contact")]
    contacts: Vec<String>,
}

impl From<DemographicsArgs> for DemographicsDraft {
    fn from(args: DemographicsArgs) -> Self {
        DemographicsDraft {
            name: args.name,
            medical_record_number: args.mrn,
            age: args.age,
            gender: args.gender,
            contacts: args.contacts,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Show one patient
    Get {
        /// Patient UUID
        id: String,
    },
    /// Register a new patient
    Register {
        #[command(flatten)]
        demographics: DemographicsArgs,
        /// Admitting diagnosis (e.g. BreastCancer, Unspecified)
        #[arg(long)]
        diagnosis: Option<Diagnosis>,
    },
    /// Replace a patient's demographics
    Update {
        /// Patient UUID
        id: String,
        #[command(flatten)]
        demographics: DemographicsArgs,
    },
    /// Delete a patient (only without a diagnosis, or Unspecified)
    Delete {
        /// Patient UUID
        id: String,
    },
}

fn print_patient(record: &PatientRecord) {
    let d = record.demographics();
    println!(
        "ID: {}, Name: {}, MRN: {}, Age: {}, Gender: {}, Contacts: {}",
        record.id(),
        d.name,
        d.medical_record_number,
        d.age,
        d.gender,
        d.contacts.join(", ")
    );
    if let Some(diagnosis) = record.admitting_diagnosis() {
        println!(
            "  Diagnosis: {} ({}), Physician: {}, Department: {}",
            diagnosis,
            diagnosis.code(),
            record.attending_physician().unwrap_or("-"),
            record.department().unwrap_or("-")
        );
    }
}

/// Prints a failed command to stderr, one line per field for validation failures.
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<PatientError>() {
        Some(PatientError::Validation(errors)) => {
            eprintln!("{err}:");
            for (field, messages) in errors.fields() {
                for message in messages {
                    eprintln!("  {field}: {message}");
                }
            }
        }
        _ => eprintln!("{err:#}"),
    }
}

async fn run(service: &PatientService, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List => {
            let patients = service.list().await.context("Error listing patients")?;
            if patients.is_empty() {
                println!("No patients found.");
            }
            patients.iter().for_each(print_patient);
        }
        Commands::Get { id } => {
            let id = ShardableUuid::parse(&id)?;
            let record = service.get(&id).await.context("Error fetching patient")?;
            print_patient(&record);
        }
        Commands::Register {
            demographics,
            diagnosis,
        } => {
            let draft = PatientDraft {
                demographics: demographics.into(),
                admitting_diagnosis: diagnosis,
            };
            let record = service
                .register(draft)
                .await
                .context("Error registering patient")?;
            println!("Registered patient with UUID: {}", record.id());
            print_patient(&record);
        }
        Commands::Update { id, demographics } => {
            let id = ShardableUuid::parse(&id)?;
            let record = service
                .update_demographics(&id, demographics.into())
                .await
                .context("Error updating demographics")?;
            println!("Updated demographics for UUID: {}", id);
            print_patient(&record);
        }
        Commands::Delete { id } => {
            let id = ShardableUuid::parse(&id)?;
            service
                .delete(&id)
                .await
                .context("Error deleting patient")?;
            println!("Deleted patient with UUID: {}", id);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patreg_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let cfg = CoreConfig::new(store_config_from_env_value(cli.store)?);
    let service = PatientService::from_config(&cfg).await?;

    if let Err(err) = run(&service, command).await {
        report(&err);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use patreg_core::MemoryStore;
    use std::sync::Arc;

    fn memory_service() -> PatientService {
        PatientService::new(Arc::new(MemoryStore::new()))
    }

    fn alice_args() -> DemographicsArgs {
        DemographicsArgs {
            name: Some("Alice Smith".into()),
            mrn: Some("MRN1".into()),
            age: Some(40),
            gender: Some("F".into()),
            contacts: vec!["555-0100".into()],
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_register_parses_repeated_contacts_and_diagnosis() {
        let cli = Cli::try_parse_from([
            "patreg",
            "--store",
            "sqlite::memory:",
            "register",
            "--name",
            "Alice Smith",
            "--mrn",
            "MRN1",
            "--age",
            "40",
            "--gender",
            "F",
            "--contact",
            "555-0100",
            "--contact",
            "alice@example.com",
            "--diagnosis",
            "breastcancer",
        ])
        .unwrap();

        assert_eq!(cli.store.as_deref(), Some("sqlite::memory:"));
        let Some(Commands::Register {
            demographics,
            diagnosis,
        }) = cli.command
        else {
            panic!("expected register");
        };
        assert_eq!(diagnosis, Some(Diagnosis::BreastCancer));
        let draft = DemographicsDraft::from(demographics);
        assert_eq!(draft.contacts, vec!["555-0100", "alice@example.com"]);
        assert_eq!(draft.age, Some(40));
    }

    #[test]
    fn test_unknown_diagnosis_is_rejected() {
        let result = Cli::try_parse_from(["patreg", "register", "--diagnosis", "Flu"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_failed_commands_return_errors() {
        let service = memory_service();
        let missing = ShardableUuid::new().to_string();

        let err = run(&service, Commands::Delete { id: missing })
            .await
            .expect_err("deleting a missing patient should fail");
        assert!(matches!(
            err.downcast_ref::<PatientError>(),
            Some(PatientError::NotFound(_))
        ));
        assert_eq!(err.to_string(), "Error deleting patient");

        let err = run(
            &service,
            Commands::Register {
                demographics: DemographicsArgs {
                    contacts: Vec::new(),
                    ..alice_args()
                },
                diagnosis: None,
            },
        )
        .await
        .expect_err("registering without contacts should fail");
        assert!(matches!(
            err.downcast_ref::<PatientError>(),
            Some(PatientError::Validation(_))
        ));

        let err = run(&service, Commands::Get { id: "nope".into() })
            .await
            .expect_err("malformed id should fail");
        assert!(err.to_string().contains("identifier"));
    }

    #[tokio::test]
    async fn test_successful_commands_return_ok() {
        let service = memory_service();
        run(
            &service,
            Commands::Register {
                demographics: alice_args(),
                diagnosis: Some(Diagnosis::Unspecified),
            },
        )
        .await
        .unwrap();

        let id = service.list().await.unwrap()[0].id().to_string();
        run(&service, Commands::Get { id: id.clone() }).await.unwrap();
        run(&service, Commands::Delete { id }).await.unwrap();
        run(&service, Commands::List).await.unwrap();
    }
}
