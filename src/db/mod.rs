//! Typed views of the marketplace schema and the data-access traits.
//!
//! The remote store owns every row's lifecycle; the records here are
//! ephemeral, non-authoritative copies for rendering. Status fields are
//! closed enumerations mirroring the store's constraints; the client never
//! enforces them locally, it only refuses to represent values outside them.
//!
//! Each sub-trait groups one entity's access patterns. [`MarketplaceDb`]
//! combines them so a consumer can hold one `Arc<dyn MarketplaceDb>`; leaf
//! consumers can depend on a single sub-trait instead.

pub mod rest;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

pub use rest::RestBackend;

// ==================== Enumerations ====================

/// Role a profile plays in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Attorney,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Attorney => "attorney",
            Self::Admin => "admin",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "client" => Some(Self::Client),
            "attorney" => Some(Self::Attorney),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Request lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Draft,
    Submitted,
    UnderReview,
    OpenForQuotes,
    Matched,
    Closed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::OpenForQuotes => "open_for_quotes",
            Self::Matched => "matched",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "under_review" => Some(Self::UnderReview),
            "open_for_quotes" => Some(Self::OpenForQuotes),
            "matched" => Some(Self::Matched),
            "closed" => Some(Self::Closed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Human-readable label for display surfaces.
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under Review",
            Self::OpenForQuotes => "Open for Quotes",
            Self::Matched => "Matched",
            Self::Closed => "Closed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Practice area of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    PersonalInjury,
    FamilyLaw,
    CriminalDefense,
    BusinessLaw,
    RealEstate,
    Immigration,
    EmploymentLaw,
    EstatePlanning,
    Bankruptcy,
    IntellectualProperty,
    TaxLaw,
    Other,
}

impl CaseType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PersonalInjury => "personal_injury",
            Self::FamilyLaw => "family_law",
            Self::CriminalDefense => "criminal_defense",
            Self::BusinessLaw => "business_law",
            Self::RealEstate => "real_estate",
            Self::Immigration => "immigration",
            Self::EmploymentLaw => "employment_law",
            Self::EstatePlanning => "estate_planning",
            Self::Bankruptcy => "bankruptcy",
            Self::IntellectualProperty => "intellectual_property",
            Self::TaxLaw => "tax_law",
            Self::Other => "other",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "personal_injury" => Some(Self::PersonalInjury),
            "family_law" => Some(Self::FamilyLaw),
            "criminal_defense" => Some(Self::CriminalDefense),
            "business_law" => Some(Self::BusinessLaw),
            "real_estate" => Some(Self::RealEstate),
            "immigration" => Some(Self::Immigration),
            "employment_law" => Some(Self::EmploymentLaw),
            "estate_planning" => Some(Self::EstatePlanning),
            "bankruptcy" => Some(Self::Bankruptcy),
            "intellectual_property" => Some(Self::IntellectualProperty),
            "tax_law" => Some(Self::TaxLaw),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PersonalInjury => "Personal Injury",
            Self::FamilyLaw => "Family Law",
            Self::CriminalDefense => "Criminal Defense",
            Self::BusinessLaw => "Business Law",
            Self::RealEstate => "Real Estate",
            Self::Immigration => "Immigration",
            Self::EmploymentLaw => "Employment Law",
            Self::EstatePlanning => "Estate Planning",
            Self::Bankruptcy => "Bankruptcy",
            Self::IntellectualProperty => "Intellectual Property",
            Self::TaxLaw => "Tax Law",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Urgent,
}

impl UrgencyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

/// Quote lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Submitted,
    UnderReview,
    Accepted,
    Declined,
    Withdrawn,
    Expired,
}

impl QuoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Withdrawn => "withdrawn",
            Self::Expired => "expired",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "under_review" => Some(Self::UnderReview),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            "withdrawn" => Some(Self::Withdrawn),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
            Self::UnderReview => "Under Review",
            Self::Accepted => "Accepted",
            Self::Declined => "Declined",
            Self::Withdrawn => "Withdrawn",
            Self::Expired => "Expired",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    System,
    DocumentShare,
    AppointmentRequest,
}

impl MessageType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::System => "system",
            Self::DocumentShare => "document_share",
            Self::AppointmentRequest => "appointment_request",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "system" => Some(Self::System),
            "document_share" => Some(Self::DocumentShare),
            "appointment_request" => Some(Self::AppointmentRequest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Contract,
    Evidence,
    Identification,
    FinancialStatement,
    LegalDocument,
    Correspondence,
    Image,
    Other,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contract => "contract",
            Self::Evidence => "evidence",
            Self::Identification => "identification",
            Self::FinancialStatement => "financial_statement",
            Self::LegalDocument => "legal_document",
            Self::Correspondence => "correspondence",
            Self::Image => "image",
            Self::Other => "other",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "contract" => Some(Self::Contract),
            "evidence" => Some(Self::Evidence),
            "identification" => Some(Self::Identification),
            "financial_statement" => Some(Self::FinancialStatement),
            "legal_document" => Some(Self::LegalDocument),
            "correspondence" => Some(Self::Correspondence),
            "image" => Some(Self::Image),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentAccessLevel {
    Private,
    Shared,
    Public,
}

impl DocumentAccessLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Shared => "shared",
            Self::Public => "public",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "private" => Some(Self::Private),
            "shared" => Some(Self::Shared),
            "public" => Some(Self::Public),
            _ => None,
        }
    }
}

/// Consultation lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationStatus {
    Requested,
    Confirmed,
    Rescheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl ConsultationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Confirmed => "confirmed",
            Self::Rescheduled => "rescheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "requested" => Some(Self::Requested),
            "confirmed" => Some(Self::Confirmed),
            "rescheduled" => Some(Self::Rescheduled),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "no_show" => Some(Self::NoShow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationType {
    InitialConsultation,
    FollowUp,
    CaseReview,
    DocumentReview,
    StrategySession,
    Other,
}

impl ConsultationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialConsultation => "initial_consultation",
            Self::FollowUp => "follow_up",
            Self::CaseReview => "case_review",
            Self::DocumentReview => "document_review",
            Self::StrategySession => "strategy_session",
            Self::Other => "other",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        match value {
            "initial_consultation" => Some(Self::InitialConsultation),
            "follow_up" => Some(Self::FollowUp),
            "case_review" => Some(Self::CaseReview),
            "document_review" => Some(Self::DocumentReview),
            "strategy_session" => Some(Self::StrategySession),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

// ==================== Records ====================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub role: UserRole,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub jurisdiction: Option<String>,
    pub verification_status: String,
    pub specializations: Option<Vec<String>>,
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_details: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    pub id: i64,
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub case_type: CaseType,
    pub urgency_level: UrgencyLevel,
    pub budget_min: Option<Decimal>,
    pub budget_max: Option<Decimal>,
    pub location: Option<String>,
    pub jurisdiction: Option<String>,
    pub preferred_language: String,
    pub status: RequestStatus,
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: i64,
    pub request_id: i64,
    pub attorney_id: Uuid,
    pub proposal_text: String,
    pub fee_amount: Option<Decimal>,
    pub fee_structure: Option<String>,
    pub estimated_timeline: Option<String>,
    pub terms_and_conditions: Option<String>,
    pub status: QuoteStatus,
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: i64,
    pub quote_id: i64,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub message_type: MessageType,
    pub subject: Option<String>,
    pub message_text: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: i64,
    pub quote_id: Option<i64>,
    pub request_id: Option<i64>,
    pub uploaded_by: Uuid,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub document_type: DocumentType,
    pub access_level: DocumentAccessLevel,
    pub storage_path: String,
    pub storage_bucket: String,
    pub description: Option<String>,
    pub is_encrypted: bool,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationRecord {
    pub id: i64,
    pub quote_id: i64,
    pub client_id: Uuid,
    pub attorney_id: Uuid,
    pub consultation_type: ConsultationType,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub duration_minutes: i32,
    pub timezone: String,
    pub location: Option<String>,
    pub meeting_url: Option<String>,
    pub status: ConsultationStatus,
    pub client_notes: Option<String>,
    pub attorney_notes: Option<String>,
    pub admin_notes: Option<String>,
    pub reminder_sent: bool,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

// ==================== Joined views ====================
//
// Relationship expansions resolved by the store in the same round-trip.

/// Just enough of a related profile to render a name and role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
}

/// Name-only view of a related profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyName {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteWithAttorney {
    #[serde(flatten)]
    pub quote: QuoteRecord,
    pub attorney: Option<ProfileRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteWithRequest {
    #[serde(flatten)]
    pub quote: QuoteRecord,
    pub request: Option<RequestRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageWithSender {
    #[serde(flatten)]
    pub message: MessageRecord,
    pub sender: Option<SenderProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationWithAttorney {
    #[serde(flatten)]
    pub consultation: ConsultationRecord,
    pub attorney: Option<PartyName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsultationWithClient {
    #[serde(flatten)]
    pub consultation: ConsultationRecord,
    pub client: Option<PartyName>,
}

// ==================== Insert / update payloads ====================
//
// Absent optionals are omitted from the wire payload entirely so the store's
// column defaults apply.

#[derive(Debug, Clone, Serialize)]
pub struct NewRequest {
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub case_type: CaseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<UrgencyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateRequestParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_type: Option<CaseType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<UrgencyLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewQuote {
    pub request_id: i64,
    pub attorney_id: Uuid,
    pub proposal_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_structure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_timeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_and_conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QuoteStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMessage {
    pub quote_id: i64,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
    pub uploaded_by: Uuid,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_level: Option<DocumentAccessLevel>,
    pub storage_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_encrypted: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewConsultation {
    pub quote_id: i64,
    pub client_id: Uuid,
    pub attorney_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation_type: Option<ConsultationType>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfileParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specializations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

// ==================== Sub-traits ====================

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<ProfileRecord, ApiError>;
    async fn get_by_role(&self, role: UserRole) -> Result<Vec<ProfileRecord>, ApiError>;
    async fn get_verified_attorneys(&self) -> Result<Vec<ProfileRecord>, ApiError>;
    async fn update(
        &self,
        id: Uuid,
        params: &UpdateProfileParams,
    ) -> Result<ProfileRecord, ApiError>;
}

#[async_trait]
pub trait RequestStore: Send + Sync {
    /// A client's own requests, newest first.
    async fn get_by_client(&self, client_id: Uuid) -> Result<Vec<RequestRecord>, ApiError>;
    /// Requests currently open for quotes, newest first.
    async fn get_open(&self) -> Result<Vec<RequestRecord>, ApiError>;
    async fn create(&self, request: &NewRequest) -> Result<RequestRecord, ApiError>;
    async fn update(
        &self,
        id: i64,
        params: &UpdateRequestParams,
    ) -> Result<RequestRecord, ApiError>;
}

#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Quotes on a request, with the quoting attorney's profile expanded.
    async fn get_by_request(&self, request_id: i64) -> Result<Vec<QuoteWithAttorney>, ApiError>;
    /// An attorney's own quotes, with the quoted request expanded.
    async fn get_by_attorney(&self, attorney_id: Uuid) -> Result<Vec<QuoteWithRequest>, ApiError>;
    async fn create(&self, quote: &NewQuote) -> Result<QuoteRecord, ApiError>;
    /// Set `status = accepted`; no other field is touched.
    async fn accept(&self, id: i64) -> Result<QuoteRecord, ApiError>;
    /// Set `status = declined`; no other field is touched.
    async fn decline(&self, id: i64) -> Result<QuoteRecord, ApiError>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// A quote's message thread, oldest first, with sender names expanded.
    async fn get_by_quote(&self, quote_id: i64) -> Result<Vec<MessageWithSender>, ApiError>;
    async fn send(&self, message: &NewMessage) -> Result<MessageRecord, ApiError>;
    /// Set `is_read = true`; no other field is touched.
    async fn mark_as_read(&self, id: i64) -> Result<MessageRecord, ApiError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_by_request(&self, request_id: i64) -> Result<Vec<DocumentRecord>, ApiError>;
    async fn get_by_quote(&self, quote_id: i64) -> Result<Vec<DocumentRecord>, ApiError>;
    async fn create(&self, document: &NewDocument) -> Result<DocumentRecord, ApiError>;
}

#[async_trait]
pub trait ConsultationStore: Send + Sync {
    async fn get_by_quote(&self, quote_id: i64) -> Result<Vec<ConsultationRecord>, ApiError>;
    /// A client's consultations, soonest first, with attorney names expanded.
    async fn get_by_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ConsultationWithAttorney>, ApiError>;
    /// An attorney's consultations, soonest first, with client names expanded.
    async fn get_by_attorney(
        &self,
        attorney_id: Uuid,
    ) -> Result<Vec<ConsultationWithClient>, ApiError>;
    async fn create(&self, consultation: &NewConsultation)
        -> Result<ConsultationRecord, ApiError>;
    /// Set `status`; no other field is touched.
    async fn update_status(
        &self,
        id: i64,
        status: ConsultationStatus,
    ) -> Result<ConsultationRecord, ApiError>;
}

/// The whole data-access surface in one object.
pub trait MarketplaceDb:
    ProfileStore
    + RequestStore
    + QuoteStore
    + MessageStore
    + DocumentStore
    + ConsultationStore
    + Send
    + Sync
{
}

impl<T> MarketplaceDb for T where
    T: ProfileStore
        + RequestStore
        + QuoteStore
        + MessageStore
        + DocumentStore
        + ConsultationStore
        + Send
        + Sync
{
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use serde_json::json;
    use uuid::Uuid;

    use super::{
        CaseType, NewQuote, NewRequest, QuoteStatus, QuoteWithAttorney, RequestStatus,
        RequestRecord, UserRole,
    };

    #[test]
    fn status_enums_round_trip_their_db_values() {
        assert_eq!(RequestStatus::OpenForQuotes.as_str(), "open_for_quotes");
        assert_eq!(
            RequestStatus::from_db_value("open_for_quotes"),
            Some(RequestStatus::OpenForQuotes)
        );
        assert_eq!(QuoteStatus::Accepted.as_str(), "accepted");
        assert_eq!(QuoteStatus::from_db_value("bogus"), None);
        assert_eq!(UserRole::from_db_value("attorney"), Some(UserRole::Attorney));
        assert_eq!(CaseType::FamilyLaw.label(), "Family Law");
    }

    #[test]
    fn enum_serde_uses_snake_case_wire_values() {
        assert_eq!(
            serde_json::to_value(RequestStatus::UnderReview).expect("serialize"),
            json!("under_review")
        );
        let parsed: CaseType = serde_json::from_value(json!("personal_injury")).expect("parse");
        assert_eq!(parsed, CaseType::PersonalInjury);
    }

    #[test]
    fn new_request_omits_absent_optionals() {
        let client_id = Uuid::new_v4();
        let request = NewRequest {
            client_id,
            title: "Lease dispute".to_string(),
            description: "Landlord withheld deposit".to_string(),
            case_type: CaseType::RealEstate,
            urgency_level: None,
            budget_min: None,
            budget_max: Some(Decimal::new(150_000, 2)),
            location: None,
            jurisdiction: None,
            preferred_language: None,
            status: None,
        };

        let value = serde_json::to_value(&request).expect("serialize");
        let object = value.as_object().expect("object");
        assert_eq!(object["client_id"], json!(client_id.to_string()));
        assert_eq!(object["case_type"], json!("real_estate"));
        assert!(!object.contains_key("urgency_level"));
        assert!(!object.contains_key("budget_min"));
        assert!(object.contains_key("budget_max"));
    }

    #[test]
    fn new_quote_preserves_foreign_keys() {
        let attorney_id = Uuid::new_v4();
        let quote = NewQuote {
            request_id: 42,
            attorney_id,
            proposal_text: "Flat fee engagement".to_string(),
            fee_amount: Some(Decimal::new(500_000, 2)),
            fee_structure: Some("flat".to_string()),
            estimated_timeline: None,
            terms_and_conditions: None,
            status: Some(QuoteStatus::Submitted),
            expires_at: None,
        };

        let value = serde_json::to_value(&quote).expect("serialize");
        assert_eq!(value["request_id"], json!(42));
        assert_eq!(value["attorney_id"], json!(attorney_id.to_string()));
        assert_eq!(value["status"], json!("submitted"));
    }

    fn request_row(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "client_id": "7f4f78c5-0f12-4f6a-9c3a-0b8f1f3f2a11",
            "title": "Contract review",
            "description": "Review a vendor agreement",
            "case_type": "business_law",
            "urgency_level": "medium",
            "budget_min": 250.0,
            "budget_max": 1000.0,
            "location": null,
            "jurisdiction": "CA",
            "preferred_language": "en",
            "status": "open_for_quotes",
            "admin_notes": null,
            "metadata": {},
            "created_at": "2026-08-01T10:00:00+00:00",
            "updated_at": "2026-08-01T10:00:00+00:00",
            "submitted_at": "2026-08-01T10:00:00+00:00",
            "closed_at": null,
        })
    }

    #[test]
    fn request_row_deserializes() {
        let record: RequestRecord = serde_json::from_value(request_row(7)).expect("parse");
        assert_eq!(record.id, 7);
        assert_eq!(record.status, RequestStatus::OpenForQuotes);
        assert_eq!(record.budget_min, Some(Decimal::new(250, 0)));
        assert!(record.closed_at.is_none());
    }

    #[test]
    fn quote_with_embedded_attorney_deserializes() {
        let row = json!({
            "id": 9,
            "request_id": 7,
            "attorney_id": "2d9f2d5c-58b4-4b5f-8c58-3e5f2a7b9c01",
            "proposal_text": "Happy to help",
            "fee_amount": 1200,
            "fee_structure": "hourly",
            "estimated_timeline": "2 weeks",
            "terms_and_conditions": null,
            "status": "submitted",
            "admin_notes": null,
            "metadata": {},
            "created_at": "2026-08-02T09:00:00+00:00",
            "updated_at": "2026-08-02T09:00:00+00:00",
            "submitted_at": "2026-08-02T09:00:00+00:00",
            "accepted_at": null,
            "declined_at": null,
            "expires_at": null,
            "attorney": {
                "id": "2d9f2d5c-58b4-4b5f-8c58-3e5f2a7b9c01",
                "role": "attorney",
                "email": "counsel@example.com",
                "first_name": "Ada",
                "last_name": "Reyes",
                "phone": null,
                "location": null,
                "jurisdiction": "CA",
                "verification_status": "verified",
                "specializations": ["business_law"],
                "bio": null,
                "profile_details": {},
                "created_at": "2026-01-01T00:00:00+00:00",
                "updated_at": "2026-01-01T00:00:00+00:00",
            },
        });

        let parsed: QuoteWithAttorney = serde_json::from_value(row).expect("parse");
        assert_eq!(parsed.quote.request_id, 7);
        assert_eq!(parsed.quote.status, QuoteStatus::Submitted);
        let attorney = parsed.attorney.expect("embedded attorney");
        assert_eq!(attorney.role, UserRole::Attorney);
        assert_eq!(attorney.first_name.as_deref(), Some("Ada"));
    }
}
