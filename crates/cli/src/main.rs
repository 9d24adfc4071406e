use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::process::ExitCode;
use telecare_core::workflow::prescription;
use telecare_core::{
    expiry_minutes_from_env_value, ConsultationStatus, ParticipantRole, PrescriptionStatus,
    SessionConfig, SessionIssuer, WorkflowStatus,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const APP_ID_ENV: &str = "TELECARE_APP_ID";
const SESSION_SECRET_ENV: &str = "TELECARE_SESSION_SECRET";
const SESSION_EXPIRY_ENV: &str = "TELECARE_SESSION_EXPIRY_MINUTES";

#[derive(Parser)]
#[command(name = "telecare")]
#[command(about = "Telecare consultation workflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Entity {
    Consultation,
    Prescription,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the statuses reachable from a status
    Transitions {
        entity: Entity,
        /// Status code, e.g. WAITING or PENDING_REVIEW
        status: String,
    },
    /// Check whether a status change is allowed
    Check {
        entity: Entity,
        from: String,
        to: String,
        /// Also require that this role may trigger the change
        #[arg(long)]
        role: Option<String>,
    },
    /// Issue a session credential for a consultation participant
    Issue {
        consultation_id: String,
        participant_id: String,
        /// PATIENT, DOCTOR, EXPERT or PHARMACIST
        role: String,
    },
    /// Validate a session credential
    Validate {
        token: String,
        consultation_id: String,
        participant_id: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("telecare=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Transitions { entity, status }) => {
            match entity {
                Entity::Consultation => {
                    print_transitions::<ConsultationStatus>(&status)?;
                }
                Entity::Prescription => {
                    let status = print_transitions::<PrescriptionStatus>(&status)?;
                    println!("Editable: {}", prescription::is_editable(status));
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Check {
            entity,
            from,
            to,
            role,
        }) => {
            let role = role.map(|r| r.parse::<ParticipantRole>()).transpose()?;
            let allowed = match entity {
                Entity::Consultation => check::<ConsultationStatus>(&from, &to, role)?,
                Entity::Prescription => check::<PrescriptionStatus>(&from, &to, role)?,
            };
            Ok(if allowed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some(Commands::Issue {
            consultation_id,
            participant_id,
            role,
        }) => {
            let issuer = issuer_from_env()?;
            println!(
                "{}",
                issue_json(&issuer, &consultation_id, &participant_id, &role)?
            );
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Validate {
            token,
            consultation_id,
            participant_id,
        }) => {
            let issuer = issuer_from_env()?;
            if issuer.validate(&token, &consultation_id, &participant_id) {
                println!("valid");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("invalid");
                Ok(ExitCode::FAILURE)
            }
        }
        None => {
            println!("Use 'telecare --help' for commands");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_transitions<S: WorkflowStatus>(code: &str) -> anyhow::Result<S> {
    let status = S::parse_code(code)?;
    let next: Vec<&str> = status.allowed_next().iter().map(|s| s.code()).collect();

    println!("Status: {status} ({})", status.description());
    if next.is_empty() {
        println!("Next: (none)");
    } else {
        println!("Next: {}", next.join(", "));
    }
    println!("Terminal: {}", status.is_terminal());
    Ok(status)
}

fn check<S: WorkflowStatus>(
    from: &str,
    to: &str,
    role: Option<ParticipantRole>,
) -> anyhow::Result<bool> {
    let from = S::parse_code(from)?;
    let to = S::parse_code(to)?;

    let result = match role {
        Some(role) => telecare_core::ensure_permitted(role, from, to),
        None => telecare_core::ensure_transition(from, to),
    };

    match result {
        Ok(()) => {
            println!("allowed: {from} -> {to}");
            Ok(true)
        }
        Err(e) => {
            println!("denied: {e}");
            Ok(false)
        }
    }
}

/// Builds the issuer from process environment. Only this binary reads the environment.
fn issuer_from_env() -> anyhow::Result<SessionIssuer> {
    let config = session_config_from(|key| std::env::var(key).ok())?;
    Ok(SessionIssuer::new(config))
}

/// Resolves session configuration through `lookup`, which maps a variable name to its value.
fn session_config_from(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<SessionConfig> {
    let app_id = lookup(APP_ID_ENV).with_context(|| format!("{APP_ID_ENV} is not set"))?;
    let secret =
        lookup(SESSION_SECRET_ENV).with_context(|| format!("{SESSION_SECRET_ENV} is not set"))?;
    let expiry_minutes = expiry_minutes_from_env_value(lookup(SESSION_EXPIRY_ENV))
        .with_context(|| format!("invalid {SESSION_EXPIRY_ENV}"))?;

    SessionConfig::new(&app_id, secret, expiry_minutes).context("invalid session configuration")
}

fn issue_json(
    issuer: &SessionIssuer,
    consultation_id: &str,
    participant_id: &str,
    role: &str,
) -> anyhow::Result<String> {
    let role = role.parse::<ParticipantRole>()?;
    let credential = issuer.issue(consultation_id, participant_id, role)?;
    Ok(serde_json::to_string_pretty(&credential)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn check_reports_denied_transition() {
        let allowed = check::<ConsultationStatus>("WAITING", "FINISHED", None).expect("known codes");
        assert!(!allowed);

        let allowed = check::<PrescriptionStatus>(
            "PENDING_REVIEW",
            "APPROVED",
            Some(ParticipantRole::Pharmacist),
        )
        .expect("known codes");
        assert!(allowed);
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn vars(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let pairs = pairs.to_vec();
        move |key| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn missing_app_id_is_reported_by_name() {
        let err = session_config_from(vars(&[(SESSION_SECRET_ENV, SECRET)]))
            .expect_err("app id missing");
        assert_eq!(err.to_string(), "TELECARE_APP_ID is not set");

        let err = session_config_from(vars(&[(APP_ID_ENV, "telecare-web")]))
            .expect_err("secret missing");
        assert_eq!(err.to_string(), "TELECARE_SESSION_SECRET is not set");
    }

    #[test]
    fn config_uses_default_expiry_when_unset() {
        let config = session_config_from(vars(&[
            (APP_ID_ENV, "telecare-web"),
            (SESSION_SECRET_ENV, SECRET),
        ]))
        .expect("valid config");
        assert_eq!(config.app_id(), "telecare-web");
        assert_eq!(config.expiry().num_minutes(), 30);
    }

    #[test]
    fn bad_expiry_or_short_secret_fails_at_startup() {
        let err = session_config_from(vars(&[
            (APP_ID_ENV, "telecare-web"),
            (SESSION_SECRET_ENV, SECRET),
            (SESSION_EXPIRY_ENV, "forever"),
        ]))
        .expect_err("non-numeric expiry");
        assert!(err.to_string().contains(SESSION_EXPIRY_ENV));

        assert!(session_config_from(vars(&[
            (APP_ID_ENV, "telecare-web"),
            (SESSION_SECRET_ENV, "short"),
        ]))
        .is_err());
    }

    #[test]
    fn issued_credential_validates() {
        let config = session_config_from(vars(&[
            (APP_ID_ENV, "telecare-web"),
            (SESSION_SECRET_ENV, SECRET),
            (SESSION_EXPIRY_ENV, "15"),
        ]))
        .expect("valid config");
        let issuer = SessionIssuer::new(config);

        let json = issue_json(&issuer, "42", "7", "DOCTOR").expect("issued");
        let credential: serde_json::Value = serde_json::from_str(&json).expect("json output");
        assert_eq!(credential["room_id"], "consultation-42");
        assert_eq!(credential["role"], "DOCTOR");

        let token = credential["token"].as_str().expect("token is a string");
        assert!(issuer.validate(token, "42", "7"));
        assert!(!issuer.validate(token, "42", "8"));
    }

    #[test]
    fn issue_rejects_unknown_role() {
        let config = SessionConfig::new("telecare-web", SECRET, 30).expect("valid config");
        let issuer = SessionIssuer::new(config);
        assert!(issue_json(&issuer, "42", "7", "nurse").is_err());
    }

    #[test]
    fn unknown_codes_are_errors() {
        assert!(check::<ConsultationStatus>("WAITING", "DRAFT", None).is_err());
        assert!(print_transitions::<PrescriptionStatus>("waiting").is_err());
    }
}
