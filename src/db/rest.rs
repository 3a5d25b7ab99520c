//! [`RestBackend`]: the store traits implemented over the hosted backend.
//!
//! Every operation is one declarative [`TableQuery`] sent through
//! [`RestClient`]. The active session's access token (when there is one)
//! rides along as the bearer so row-level security scopes the results; the
//! backend, not this client, decides what a caller may see or change.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::SessionManager;
use crate::db::{
    ConsultationRecord, ConsultationStatus, ConsultationStore, ConsultationWithAttorney,
    ConsultationWithClient, DocumentRecord, DocumentStore, MessageRecord, MessageStore,
    MessageWithSender, NewConsultation, NewDocument, NewMessage, NewQuote, NewRequest,
    ProfileRecord, ProfileStore, QuoteRecord, QuoteStatus, QuoteStore, QuoteWithAttorney,
    QuoteWithRequest, RequestRecord, RequestStatus, RequestStore, UpdateProfileParams,
    UpdateRequestParams, UserRole,
};
use crate::error::ApiError;
use crate::rest::query::TableQuery;
use crate::rest::RestClient;

pub struct RestBackend {
    rest: RestClient,
    sessions: Arc<SessionManager>,
}

impl RestBackend {
    pub fn new(rest: RestClient, sessions: Arc<SessionManager>) -> Self {
        Self { rest, sessions }
    }

    fn token(&self) -> Option<String> {
        self.sessions.access_token()
    }

    async fn rows<T: serde::de::DeserializeOwned>(
        &self,
        query: &TableQuery,
    ) -> Result<Vec<T>, ApiError> {
        let token = self.token();
        self.rest.select(query, token.as_deref()).await
    }

    async fn row<T: serde::de::DeserializeOwned>(&self, query: &TableQuery) -> Result<T, ApiError> {
        let token = self.token();
        self.rest.select_one(query, token.as_deref()).await
    }

    async fn created<T: serde::de::DeserializeOwned, B: Serialize>(
        &self,
        table: &'static str,
        body: &B,
    ) -> Result<T, ApiError> {
        let token = self.token();
        self.rest.insert(table, body, token.as_deref()).await
    }

    async fn updated<T: serde::de::DeserializeOwned, B: Serialize>(
        &self,
        query: &TableQuery,
        body: &B,
    ) -> Result<T, ApiError> {
        let token = self.token();
        self.rest.update_one(query, body, token.as_deref()).await
    }
}

/// Status-only patch body shared by the accept/decline/update-status paths.
#[derive(Serialize)]
struct StatusPatch {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadPatch {
    is_read: bool,
}

// Query constructors live outside the trait impls so tests can inspect the
// rendered parameters without a client.

fn profile_by_id(id: Uuid) -> TableQuery {
    TableQuery::new("profiles").eq("id", id)
}

fn profiles_by_role(role: UserRole) -> TableQuery {
    TableQuery::new("profiles").eq("role", role.as_str())
}

fn verified_attorneys() -> TableQuery {
    TableQuery::new("profiles")
        .eq("role", UserRole::Attorney.as_str())
        .eq("verification_status", "verified")
}

fn requests_by_client(client_id: Uuid) -> TableQuery {
    TableQuery::new("requests")
        .eq("client_id", client_id)
        .order_desc("created_at")
}

fn open_requests() -> TableQuery {
    TableQuery::new("requests")
        .eq("status", RequestStatus::OpenForQuotes.as_str())
        .order_desc("created_at")
}

fn quotes_by_request(request_id: i64) -> TableQuery {
    TableQuery::new("quotes")
        .select("*,attorney:profiles!quotes_attorney_id_fkey(*)")
        .eq("request_id", request_id)
        .order_desc("created_at")
}

fn quotes_by_attorney(attorney_id: Uuid) -> TableQuery {
    TableQuery::new("quotes")
        .select("*,request:requests(*)")
        .eq("attorney_id", attorney_id)
        .order_desc("created_at")
}

fn messages_by_quote(quote_id: i64) -> TableQuery {
    TableQuery::new("messages")
        .select("*,sender:profiles!messages_sender_id_fkey(first_name,last_name,role)")
        .eq("quote_id", quote_id)
        .order_asc("created_at")
}

fn documents_by_request(request_id: i64) -> TableQuery {
    TableQuery::new("documents")
        .eq("request_id", request_id)
        .order_desc("created_at")
}

fn documents_by_quote(quote_id: i64) -> TableQuery {
    TableQuery::new("documents")
        .eq("quote_id", quote_id)
        .order_desc("created_at")
}

fn consultations_by_quote(quote_id: i64) -> TableQuery {
    TableQuery::new("consultations")
        .eq("quote_id", quote_id)
        .order_asc("scheduled_date")
}

fn consultations_by_client(client_id: Uuid) -> TableQuery {
    TableQuery::new("consultations")
        .select("*,attorney:profiles!consultations_attorney_id_fkey(first_name,last_name)")
        .eq("client_id", client_id)
        .order_asc("scheduled_date")
}

fn consultations_by_attorney(attorney_id: Uuid) -> TableQuery {
    TableQuery::new("consultations")
        .select("*,client:profiles!consultations_client_id_fkey(first_name,last_name)")
        .eq("attorney_id", attorney_id)
        .order_asc("scheduled_date")
}

fn row_by_id(table: &'static str, id: i64) -> TableQuery {
    TableQuery::new(table).eq("id", id)
}

#[async_trait]
impl ProfileStore for RestBackend {
    async fn get_by_id(&self, id: Uuid) -> Result<ProfileRecord, ApiError> {
        self.row(&profile_by_id(id)).await
    }

    async fn get_by_role(&self, role: UserRole) -> Result<Vec<ProfileRecord>, ApiError> {
        self.rows(&profiles_by_role(role)).await
    }

    async fn get_verified_attorneys(&self) -> Result<Vec<ProfileRecord>, ApiError> {
        self.rows(&verified_attorneys()).await
    }

    async fn update(
        &self,
        id: Uuid,
        params: &UpdateProfileParams,
    ) -> Result<ProfileRecord, ApiError> {
        self.updated(&profile_by_id(id), params).await
    }
}

#[async_trait]
impl RequestStore for RestBackend {
    async fn get_by_client(&self, client_id: Uuid) -> Result<Vec<RequestRecord>, ApiError> {
        self.rows(&requests_by_client(client_id)).await
    }

    async fn get_open(&self) -> Result<Vec<RequestRecord>, ApiError> {
        self.rows(&open_requests()).await
    }

    async fn create(&self, request: &NewRequest) -> Result<RequestRecord, ApiError> {
        self.created("requests", request).await
    }

    async fn update(
        &self,
        id: i64,
        params: &UpdateRequestParams,
    ) -> Result<RequestRecord, ApiError> {
        self.updated(&row_by_id("requests", id), params).await
    }
}

#[async_trait]
impl QuoteStore for RestBackend {
    async fn get_by_request(&self, request_id: i64) -> Result<Vec<QuoteWithAttorney>, ApiError> {
        self.rows(&quotes_by_request(request_id)).await
    }

    async fn get_by_attorney(&self, attorney_id: Uuid) -> Result<Vec<QuoteWithRequest>, ApiError> {
        self.rows(&quotes_by_attorney(attorney_id)).await
    }

    async fn create(&self, quote: &NewQuote) -> Result<QuoteRecord, ApiError> {
        self.created("quotes", quote).await
    }

    async fn accept(&self, id: i64) -> Result<QuoteRecord, ApiError> {
        let patch = StatusPatch {
            status: QuoteStatus::Accepted.as_str(),
        };
        self.updated(&row_by_id("quotes", id), &patch).await
    }

    async fn decline(&self, id: i64) -> Result<QuoteRecord, ApiError> {
        let patch = StatusPatch {
            status: QuoteStatus::Declined.as_str(),
        };
        self.updated(&row_by_id("quotes", id), &patch).await
    }
}

#[async_trait]
impl MessageStore for RestBackend {
    async fn get_by_quote(&self, quote_id: i64) -> Result<Vec<MessageWithSender>, ApiError> {
        self.rows(&messages_by_quote(quote_id)).await
    }

    async fn send(&self, message: &NewMessage) -> Result<MessageRecord, ApiError> {
        self.created("messages", message).await
    }

    async fn mark_as_read(&self, id: i64) -> Result<MessageRecord, ApiError> {
        let patch = ReadPatch { is_read: true };
        self.updated(&row_by_id("messages", id), &patch).await
    }
}

#[async_trait]
impl DocumentStore for RestBackend {
    async fn get_by_request(&self, request_id: i64) -> Result<Vec<DocumentRecord>, ApiError> {
        self.rows(&documents_by_request(request_id)).await
    }

    async fn get_by_quote(&self, quote_id: i64) -> Result<Vec<DocumentRecord>, ApiError> {
        self.rows(&documents_by_quote(quote_id)).await
    }

    async fn create(&self, document: &NewDocument) -> Result<DocumentRecord, ApiError> {
        self.created("documents", document).await
    }
}

#[async_trait]
impl ConsultationStore for RestBackend {
    async fn get_by_quote(&self, quote_id: i64) -> Result<Vec<ConsultationRecord>, ApiError> {
        self.rows(&consultations_by_quote(quote_id)).await
    }

    async fn get_by_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<ConsultationWithAttorney>, ApiError> {
        self.rows(&consultations_by_client(client_id)).await
    }

    async fn get_by_attorney(
        &self,
        attorney_id: Uuid,
    ) -> Result<Vec<ConsultationWithClient>, ApiError> {
        self.rows(&consultations_by_attorney(attorney_id)).await
    }

    async fn create(
        &self,
        consultation: &NewConsultation,
    ) -> Result<ConsultationRecord, ApiError> {
        self.created("consultations", consultation).await
    }

    async fn update_status(
        &self,
        id: i64,
        status: ConsultationStatus,
    ) -> Result<ConsultationRecord, ApiError> {
        let patch = StatusPatch {
            status: status.as_str(),
        };
        self.updated(&row_by_id("consultations", id), &patch).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use uuid::Uuid;

    use super::{
        consultations_by_attorney, consultations_by_client, messages_by_quote, open_requests,
        quotes_by_attorney, quotes_by_request, row_by_id, verified_attorneys, ReadPatch,
        StatusPatch,
    };
    use crate::db::QuoteStatus;

    fn rendered(query: &crate::rest::query::TableQuery) -> Vec<(String, String)> {
        query.to_query_pairs()
    }

    #[test]
    fn verified_attorneys_filters_role_and_status() {
        assert_eq!(
            rendered(&verified_attorneys()),
            vec![
                ("select".to_string(), "*".to_string()),
                ("role".to_string(), "eq.attorney".to_string()),
                (
                    "verification_status".to_string(),
                    "eq.verified".to_string()
                ),
            ]
        );
    }

    #[test]
    fn open_requests_orders_newest_first() {
        assert_eq!(
            rendered(&open_requests()),
            vec![
                ("select".to_string(), "*".to_string()),
                ("status".to_string(), "eq.open_for_quotes".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn quotes_by_request_embeds_the_attorney() {
        let pairs = rendered(&quotes_by_request(7));
        assert_eq!(
            pairs[0].1,
            "*,attorney:profiles!quotes_attorney_id_fkey(*)"
        );
        assert_eq!(pairs[1], ("request_id".to_string(), "eq.7".to_string()));
    }

    #[test]
    fn quotes_by_attorney_embeds_the_request() {
        let attorney_id = Uuid::new_v4();
        let pairs = rendered(&quotes_by_attorney(attorney_id));
        assert_eq!(pairs[0].1, "*,request:requests(*)");
        assert_eq!(pairs[1].1, format!("eq.{attorney_id}"));
    }

    #[test]
    fn message_thread_reads_oldest_first_with_sender_names() {
        let pairs = rendered(&messages_by_quote(9));
        assert_eq!(
            pairs[0].1,
            "*,sender:profiles!messages_sender_id_fkey(first_name,last_name,role)"
        );
        assert_eq!(
            pairs.last(),
            Some(&("order".to_string(), "created_at.asc".to_string()))
        );
    }

    #[test]
    fn consultation_lists_sort_soonest_first() {
        let client_pairs = rendered(&consultations_by_client(Uuid::new_v4()));
        assert_eq!(
            client_pairs[0].1,
            "*,attorney:profiles!consultations_attorney_id_fkey(first_name,last_name)"
        );
        assert_eq!(
            client_pairs.last(),
            Some(&("order".to_string(), "scheduled_date.asc".to_string()))
        );

        let attorney_pairs = rendered(&consultations_by_attorney(Uuid::new_v4()));
        assert_eq!(
            attorney_pairs[0].1,
            "*,client:profiles!consultations_client_id_fkey(first_name,last_name)"
        );
    }

    #[test]
    fn accept_targets_the_row_and_patches_only_status() {
        assert_eq!(
            rendered(&row_by_id("quotes", 42)),
            vec![
                ("select".to_string(), "*".to_string()),
                ("id".to_string(), "eq.42".to_string()),
            ]
        );
        let patch = StatusPatch {
            status: QuoteStatus::Accepted.as_str(),
        };
        assert_eq!(
            serde_json::to_value(&patch).expect("serialize"),
            json!({"status": "accepted"})
        );
    }

    #[test]
    fn mark_as_read_patches_only_the_flag() {
        let patch = ReadPatch { is_read: true };
        assert_eq!(
            serde_json::to_value(&patch).expect("serialize"),
            json!({"is_read": true})
        );
    }
}
