use crate::application::services::{
    filter_contacts, ContactDetailsForm, Conversation, CreateContactForm, FilterMode,
};
use crate::domain::entities::{AuthUser, Contact, ContactSummary, Template};
use crate::infrastructure::http::middleware::{ApiResult, AppState, AuthenticatedAgent};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub agent: AuthUser,
    pub contacts: Vec<ContactSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactListQuery {
    #[serde(default)]
    pub filter: FilterMode,
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedContactResponse {
    pub contact: Contact,
    pub chat_path: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

pub async fn show_dashboard(
    State(state): State<AppState>,
    Extension(AuthenticatedAgent(agent)): Extension<AuthenticatedAgent>,
) -> ApiResult<Json<DashboardResponse>> {
    let contacts = state.contact_service.list_summaries().await?;
    Ok(Json(DashboardResponse { agent, contacts }))
}

/// Chat list snapshot with the unread/search projection applied
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactListQuery>,
) -> ApiResult<Json<Vec<ContactSummary>>> {
    let summaries = state.contact_service.list_summaries().await?;
    let visible = filter_contacts(&summaries, &query.q, query.filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(visible))
}

pub async fn create_contact(
    State(state): State<AppState>,
    Extension(AuthenticatedAgent(agent)): Extension<AuthenticatedAgent>,
    Json(form): Json<CreateContactForm>,
) -> ApiResult<(StatusCode, Json<CreatedContactResponse>)> {
    let contact = state.contact_service.create_contact(&agent, form).await?;
    let chat_path = contact.chat_path();
    Ok((
        StatusCode::CREATED,
        Json(CreatedContactResponse { contact, chat_path }),
    ))
}

/// Contact with its full message history
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Conversation>> {
    let conversation = state.contact_service.open_conversation(&id).await?;
    Ok(Json(conversation))
}

pub async fn update_contact_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<ContactDetailsForm>,
) -> ApiResult<Json<Contact>> {
    let contact = state.contact_service.update_details(&id, form).await?;
    Ok(Json(contact))
}

pub async fn mark_contact_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.contact_service.mark_read(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Store an outbound message. Blank content is a no-op (204).
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<Response> {
    let response = match state
        .message_service
        .send_text(&id, &request.content)
        .await?
    {
        Some(message) => (StatusCode::CREATED, Json(message)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}

pub async fn list_templates(State(state): State<AppState>) -> ApiResult<Json<Vec<Template>>> {
    let templates = state.template_repo.list_templates().await?;
    Ok(Json(templates))
}
