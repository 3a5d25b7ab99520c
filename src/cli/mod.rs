//! The `ltl` command-line surface.
//!
//! Each subcommand maps onto one library operation and prints the result as
//! pretty JSON, so the binary doubles as a manual test harness against a
//! live project. Credentials come from flags or `LTL_PASSWORD`; everything
//! else goes through the same config resolution as library consumers.

use std::sync::Arc;

use anyhow::{anyhow, bail};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::SessionManager;
use crate::db::{
    CaseType, ConsultationStatus, ConsultationStore, ConsultationType, DocumentAccessLevel,
    DocumentStore, DocumentType, MessageStore, MessageType, NewConsultation, NewDocument,
    NewMessage, NewQuote, NewRequest, ProfileStore, QuoteStatus, QuoteStore, RequestStatus,
    RequestStore, UpdateProfileParams, UpdateRequestParams, UrgencyLevel, UserRole,
};
use crate::RestBackend;

#[derive(Parser)]
#[command(name = "ltl", version, about = "LinkToLawyers marketplace client")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new account.
    SignUp(SignUpArgs),
    /// Sign in with email and password.
    SignIn(SignInArgs),
    /// Invalidate the current session and clear the local cache.
    SignOut,
    /// Show the signed-in identity.
    Whoami,
    /// Exchange the refresh token for a fresh session.
    Refresh,
    /// Marketplace profiles.
    #[command(subcommand)]
    Profiles(ProfileCommand),
    /// Legal-help requests.
    #[command(subcommand)]
    Requests(RequestCommand),
    /// Attorney quotes on requests.
    #[command(subcommand)]
    Quotes(QuoteCommand),
    /// Message threads on quotes.
    #[command(subcommand)]
    Messages(MessageCommand),
    /// Documents attached to requests and quotes.
    #[command(subcommand)]
    Documents(DocumentCommand),
    /// Scheduled consultations.
    #[command(subcommand)]
    Consultations(ConsultationCommand),
    /// List the case types, urgency levels, and statuses the marketplace knows.
    Catalog,
}

#[derive(Args)]
struct SignUpArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "LTL_PASSWORD", hide_env_values = true)]
    password: String,
    /// Display name; split into first/last for the profile.
    #[arg(long)]
    name: Option<String>,
    /// `client` or `attorney`.
    #[arg(long, default_value = "client")]
    role: String,
}

#[derive(Args)]
struct SignInArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "LTL_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum ProfileCommand {
    /// Fetch one profile by id.
    Get { id: Uuid },
    /// List profiles with a given role.
    ByRole { role: String },
    /// List verified attorneys.
    Attorneys,
    /// Update fields on a profile.
    Update(UpdateProfileArgs),
}

#[derive(Args)]
struct UpdateProfileArgs {
    id: Uuid,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    jurisdiction: Option<String>,
    #[arg(long)]
    bio: Option<String>,
    /// May be repeated.
    #[arg(long = "specialization")]
    specializations: Vec<String>,
}

#[derive(Subcommand)]
enum RequestCommand {
    /// A client's own requests, newest first.
    ByClient { client_id: Uuid },
    /// Requests currently open for quotes.
    Open,
    /// Post a new request.
    Create(CreateRequestArgs),
    /// Update fields on a request.
    Update(UpdateRequestArgs),
}

#[derive(Args)]
struct CreateRequestArgs {
    #[arg(long)]
    client_id: Uuid,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    case_type: String,
    #[arg(long)]
    urgency: Option<String>,
    #[arg(long)]
    budget_min: Option<Decimal>,
    #[arg(long)]
    budget_max: Option<Decimal>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    jurisdiction: Option<String>,
    #[arg(long)]
    language: Option<String>,
    /// Initial status; the backend defaults to `draft` when omitted.
    #[arg(long)]
    status: Option<String>,
}

#[derive(Args)]
struct UpdateRequestArgs {
    id: i64,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    case_type: Option<String>,
    #[arg(long)]
    urgency: Option<String>,
    #[arg(long)]
    budget_min: Option<Decimal>,
    #[arg(long)]
    budget_max: Option<Decimal>,
    #[arg(long)]
    status: Option<String>,
}

#[derive(Subcommand)]
enum QuoteCommand {
    /// Quotes on a request, with the quoting attorney.
    ByRequest { request_id: i64 },
    /// An attorney's quotes, with the quoted request.
    ByAttorney { attorney_id: Uuid },
    /// Submit a quote on a request.
    Create(CreateQuoteArgs),
    /// Accept a quote.
    Accept { id: i64 },
    /// Decline a quote.
    Decline { id: i64 },
}

#[derive(Args)]
struct CreateQuoteArgs {
    #[arg(long)]
    request_id: i64,
    #[arg(long)]
    attorney_id: Uuid,
    #[arg(long)]
    proposal: String,
    #[arg(long)]
    fee: Option<Decimal>,
    #[arg(long)]
    fee_structure: Option<String>,
    #[arg(long)]
    timeline: Option<String>,
    #[arg(long)]
    status: Option<String>,
}

#[derive(Subcommand)]
enum MessageCommand {
    /// A quote's message thread, oldest first.
    Thread { quote_id: i64 },
    /// Send a message on a quote.
    Send(SendMessageArgs),
    /// Mark a message as read.
    MarkRead { id: i64 },
}

#[derive(Args)]
struct SendMessageArgs {
    #[arg(long)]
    quote_id: i64,
    #[arg(long)]
    sender_id: Uuid,
    #[arg(long)]
    recipient_id: Uuid,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    text: String,
    /// `text`, `system`, `document_share`, or `appointment_request`.
    #[arg(long)]
    kind: Option<String>,
}

#[derive(Subcommand)]
enum DocumentCommand {
    /// Documents attached to a request.
    ByRequest { request_id: i64 },
    /// Documents attached to a quote.
    ByQuote { quote_id: i64 },
    /// Register an uploaded document.
    Add(AddDocumentArgs),
}

#[derive(Args)]
struct AddDocumentArgs {
    #[arg(long)]
    request_id: Option<i64>,
    #[arg(long)]
    quote_id: Option<i64>,
    #[arg(long)]
    uploaded_by: Uuid,
    #[arg(long)]
    file_name: String,
    #[arg(long)]
    file_size: i64,
    #[arg(long)]
    file_type: String,
    #[arg(long)]
    document_type: Option<String>,
    #[arg(long)]
    access: Option<String>,
    #[arg(long)]
    storage_path: String,
    #[arg(long)]
    bucket: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Subcommand)]
enum ConsultationCommand {
    /// Consultations scheduled under a quote.
    ByQuote { quote_id: i64 },
    /// A client's consultations, soonest first.
    ByClient { client_id: Uuid },
    /// An attorney's consultations, soonest first.
    ByAttorney { attorney_id: Uuid },
    /// Schedule a consultation.
    Schedule(ScheduleConsultationArgs),
    /// Move a consultation to a new status.
    SetStatus { id: i64, status: String },
}

#[derive(Args)]
struct ScheduleConsultationArgs {
    #[arg(long)]
    quote_id: i64,
    #[arg(long)]
    client_id: Uuid,
    #[arg(long)]
    attorney_id: Uuid,
    #[arg(long)]
    title: String,
    /// `YYYY-MM-DD`.
    #[arg(long)]
    date: NaiveDate,
    /// `HH:MM:SS`.
    #[arg(long)]
    time: NaiveTime,
    #[arg(long)]
    duration_minutes: Option<i32>,
    #[arg(long)]
    timezone: Option<String>,
    #[arg(long)]
    kind: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    meeting_url: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

fn parse_with<T>(raw: &str, what: &str, parse: fn(&str) -> Option<T>) -> anyhow::Result<T> {
    parse(raw).ok_or_else(|| anyhow!("unknown {what}: {raw}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(
    cli: Cli,
    sessions: &Arc<SessionManager>,
    db: &RestBackend,
) -> anyhow::Result<()> {
    match cli.command {
        Command::SignUp(args) => {
            let role = parse_with(&args.role, "role", UserRole::from_db_value)?;
            let outcome = sessions
                .sign_up(&args.email, &args.password, args.name.as_deref(), role)
                .await?;
            match outcome.session {
                Some(_) => println!("signed up and signed in as {}", args.email),
                None => println!("signed up; check {} to confirm the account", args.email),
            }
        }
        Command::SignIn(args) => {
            sessions.sign_in(&args.email, &args.password).await?;
            println!("signed in as {}", args.email);
        }
        Command::SignOut => {
            sessions.sign_out().await?;
            println!("signed out");
        }
        Command::Whoami => print_json(&sessions.user().await?)?,
        Command::Refresh => {
            let session = sessions.refresh().await?;
            println!(
                "session refreshed; expires_at={}",
                session
                    .expires_at
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            );
        }
        Command::Profiles(command) => run_profiles(command, db).await?,
        Command::Requests(command) => run_requests(command, db).await?,
        Command::Quotes(command) => run_quotes(command, db).await?,
        Command::Messages(command) => run_messages(command, db).await?,
        Command::Documents(command) => run_documents(command, db).await?,
        Command::Consultations(command) => run_consultations(command, db).await?,
        Command::Catalog => print_catalog(),
    }
    Ok(())
}

async fn run_profiles(command: ProfileCommand, db: &RestBackend) -> anyhow::Result<()> {
    match command {
        ProfileCommand::Get { id } => print_json(&db.get_by_id(id).await?),
        ProfileCommand::ByRole { role } => {
            let role = parse_with(&role, "role", UserRole::from_db_value)?;
            print_json(&ProfileStore::get_by_role(db, role).await?)
        }
        ProfileCommand::Attorneys => print_json(&db.get_verified_attorneys().await?),
        ProfileCommand::Update(args) => {
            let params = UpdateProfileParams {
                first_name: args.first_name,
                last_name: args.last_name,
                phone: args.phone,
                location: args.location,
                jurisdiction: args.jurisdiction,
                bio: args.bio,
                specializations: if args.specializations.is_empty() {
                    None
                } else {
                    Some(args.specializations)
                },
            };
            print_json(&ProfileStore::update(db, args.id, &params).await?)
        }
    }
}

async fn run_requests(command: RequestCommand, db: &RestBackend) -> anyhow::Result<()> {
    match command {
        RequestCommand::ByClient { client_id } => {
            print_json(&RequestStore::get_by_client(db, client_id).await?)
        }
        RequestCommand::Open => print_json(&db.get_open().await?),
        RequestCommand::Create(args) => {
            let request = NewRequest {
                client_id: args.client_id,
                title: args.title,
                description: args.description,
                case_type: parse_with(&args.case_type, "case type", CaseType::from_db_value)?,
                urgency_level: args
                    .urgency
                    .as_deref()
                    .map(|raw| parse_with(raw, "urgency level", UrgencyLevel::from_db_value))
                    .transpose()?,
                budget_min: args.budget_min,
                budget_max: args.budget_max,
                location: args.location,
                jurisdiction: args.jurisdiction,
                preferred_language: args.language,
                status: args
                    .status
                    .as_deref()
                    .map(|raw| parse_with(raw, "request status", RequestStatus::from_db_value))
                    .transpose()?,
            };
            print_json(&RequestStore::create(db, &request).await?)
        }
        RequestCommand::Update(args) => {
            let params = UpdateRequestParams {
                title: args.title,
                description: args.description,
                case_type: args
                    .case_type
                    .as_deref()
                    .map(|raw| parse_with(raw, "case type", CaseType::from_db_value))
                    .transpose()?,
                urgency_level: args
                    .urgency
                    .as_deref()
                    .map(|raw| parse_with(raw, "urgency level", UrgencyLevel::from_db_value))
                    .transpose()?,
                budget_min: args.budget_min,
                budget_max: args.budget_max,
                status: args
                    .status
                    .as_deref()
                    .map(|raw| parse_with(raw, "request status", RequestStatus::from_db_value))
                    .transpose()?,
                ..UpdateRequestParams::default()
            };
            print_json(&RequestStore::update(db, args.id, &params).await?)
        }
    }
}

async fn run_quotes(command: QuoteCommand, db: &RestBackend) -> anyhow::Result<()> {
    match command {
        QuoteCommand::ByRequest { request_id } => {
            print_json(&QuoteStore::get_by_request(db, request_id).await?)
        }
        QuoteCommand::ByAttorney { attorney_id } => {
            print_json(&QuoteStore::get_by_attorney(db, attorney_id).await?)
        }
        QuoteCommand::Create(args) => {
            let quote = NewQuote {
                request_id: args.request_id,
                attorney_id: args.attorney_id,
                proposal_text: args.proposal,
                fee_amount: args.fee,
                fee_structure: args.fee_structure,
                estimated_timeline: args.timeline,
                terms_and_conditions: None,
                status: args
                    .status
                    .as_deref()
                    .map(|raw| parse_with(raw, "quote status", QuoteStatus::from_db_value))
                    .transpose()?,
                expires_at: None,
            };
            print_json(&QuoteStore::create(db, &quote).await?)
        }
        QuoteCommand::Accept { id } => print_json(&db.accept(id).await?),
        QuoteCommand::Decline { id } => print_json(&db.decline(id).await?),
    }
}

async fn run_messages(command: MessageCommand, db: &RestBackend) -> anyhow::Result<()> {
    match command {
        MessageCommand::Thread { quote_id } => {
            print_json(&MessageStore::get_by_quote(db, quote_id).await?)
        }
        MessageCommand::Send(args) => {
            let message = NewMessage {
                quote_id: args.quote_id,
                sender_id: args.sender_id,
                recipient_id: args.recipient_id,
                message_type: args
                    .kind
                    .as_deref()
                    .map(|raw| parse_with(raw, "message type", MessageType::from_db_value))
                    .transpose()?,
                subject: args.subject,
                message_text: args.text,
            };
            print_json(&db.send(&message).await?)
        }
        MessageCommand::MarkRead { id } => print_json(&db.mark_as_read(id).await?),
    }
}

async fn run_documents(command: DocumentCommand, db: &RestBackend) -> anyhow::Result<()> {
    match command {
        DocumentCommand::ByRequest { request_id } => {
            print_json(&DocumentStore::get_by_request(db, request_id).await?)
        }
        DocumentCommand::ByQuote { quote_id } => {
            print_json(&DocumentStore::get_by_quote(db, quote_id).await?)
        }
        DocumentCommand::Add(args) => {
            if args.request_id.is_none() && args.quote_id.is_none() {
                bail!("a document needs --request-id or --quote-id");
            }
            let document = NewDocument {
                quote_id: args.quote_id,
                request_id: args.request_id,
                uploaded_by: args.uploaded_by,
                file_name: args.file_name,
                file_size: args.file_size,
                file_type: args.file_type,
                document_type: args
                    .document_type
                    .as_deref()
                    .map(|raw| parse_with(raw, "document type", DocumentType::from_db_value))
                    .transpose()?,
                access_level: args
                    .access
                    .as_deref()
                    .map(|raw| {
                        parse_with(raw, "access level", DocumentAccessLevel::from_db_value)
                    })
                    .transpose()?,
                storage_path: args.storage_path,
                storage_bucket: args.bucket,
                description: args.description,
                is_encrypted: None,
            };
            print_json(&DocumentStore::create(db, &document).await?)
        }
    }
}

async fn run_consultations(command: ConsultationCommand, db: &RestBackend) -> anyhow::Result<()> {
    match command {
        ConsultationCommand::ByQuote { quote_id } => {
            print_json(&ConsultationStore::get_by_quote(db, quote_id).await?)
        }
        ConsultationCommand::ByClient { client_id } => {
            print_json(&ConsultationStore::get_by_client(db, client_id).await?)
        }
        ConsultationCommand::ByAttorney { attorney_id } => {
            print_json(&ConsultationStore::get_by_attorney(db, attorney_id).await?)
        }
        ConsultationCommand::Schedule(args) => {
            let consultation = NewConsultation {
                quote_id: args.quote_id,
                client_id: args.client_id,
                attorney_id: args.attorney_id,
                consultation_type: args
                    .kind
                    .as_deref()
                    .map(|raw| {
                        parse_with(raw, "consultation type", ConsultationType::from_db_value)
                    })
                    .transpose()?,
                title: args.title,
                description: args.description,
                scheduled_date: args.date,
                scheduled_time: args.time,
                duration_minutes: args.duration_minutes,
                timezone: args.timezone,
                location: args.location,
                meeting_url: args.meeting_url,
                client_notes: args.notes,
            };
            print_json(&ConsultationStore::create(db, &consultation).await?)
        }
        ConsultationCommand::SetStatus { id, status } => {
            let status =
                parse_with(&status, "consultation status", ConsultationStatus::from_db_value)?;
            print_json(&db.update_status(id, status).await?)
        }
    }
}

fn print_catalog() {
    const CASE_TYPES: [CaseType; 12] = [
        CaseType::PersonalInjury,
        CaseType::FamilyLaw,
        CaseType::CriminalDefense,
        CaseType::BusinessLaw,
        CaseType::RealEstate,
        CaseType::Immigration,
        CaseType::EmploymentLaw,
        CaseType::EstatePlanning,
        CaseType::Bankruptcy,
        CaseType::IntellectualProperty,
        CaseType::TaxLaw,
        CaseType::Other,
    ];
    const URGENCY_LEVELS: [UrgencyLevel; 4] = [
        UrgencyLevel::Low,
        UrgencyLevel::Medium,
        UrgencyLevel::High,
        UrgencyLevel::Urgent,
    ];
    const REQUEST_STATUSES: [RequestStatus; 7] = [
        RequestStatus::Draft,
        RequestStatus::Submitted,
        RequestStatus::UnderReview,
        RequestStatus::OpenForQuotes,
        RequestStatus::Matched,
        RequestStatus::Closed,
        RequestStatus::Cancelled,
    ];
    const QUOTE_STATUSES: [QuoteStatus; 7] = [
        QuoteStatus::Draft,
        QuoteStatus::Submitted,
        QuoteStatus::UnderReview,
        QuoteStatus::Accepted,
        QuoteStatus::Declined,
        QuoteStatus::Withdrawn,
        QuoteStatus::Expired,
    ];

    println!("case types:");
    for case_type in CASE_TYPES {
        println!("  {:24} {}", case_type.as_str(), case_type.label());
    }
    println!("urgency levels:");
    for level in URGENCY_LEVELS {
        println!("  {:24} {}", level.as_str(), level.label());
    }
    println!("request statuses:");
    for status in REQUEST_STATUSES {
        println!("  {:24} {}", status.as_str(), status.label());
    }
    println!("quote statuses:");
    for status in QUOTE_STATUSES {
        println!("  {:24} {}", status.as_str(), status.label());
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command, QuoteCommand, RequestCommand};

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn accept_parses_the_quote_id() {
        let cli = Cli::parse_from(["ltl", "quotes", "accept", "42"]);
        let Command::Quotes(QuoteCommand::Accept { id }) = cli.command else {
            panic!("expected quotes accept");
        };
        assert_eq!(id, 42);
    }

    #[test]
    fn request_create_requires_core_fields() {
        let result = Cli::try_parse_from([
            "ltl",
            "requests",
            "create",
            "--client-id",
            "7f4f78c5-0f12-4f6a-9c3a-0b8f1f3f2a11",
            "--title",
            "Contract review",
        ]);
        assert!(result.is_err(), "description and case type are required");
    }

    #[test]
    fn open_requests_takes_no_arguments() {
        let cli = Cli::parse_from(["ltl", "requests", "open"]);
        assert!(matches!(
            cli.command,
            Command::Requests(RequestCommand::Open)
        ));
    }

    #[test]
    fn sign_in_reads_password_from_flag() {
        let cli = Cli::parse_from([
            "ltl", "sign-in", "--email", "a@b.com", "--password", "pw123456",
        ]);
        let Command::SignIn(args) = cli.command else {
            panic!("expected sign-in");
        };
        assert_eq!(args.email, "a@b.com");
        assert_eq!(args.password, "pw123456");
    }
}
