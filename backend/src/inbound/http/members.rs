//! Members API handlers.
//!
//! ```text
//! POST   /api/v1/members          {"name":"John Doe","email":"john@example.com","phone":"+1-234-567-8901"}
//! GET    /api/v1/members?skip=0&limit=100
//! GET    /api/v1/members/{id}
//! PUT    /api/v1/members/{id}     {"phone":""}
//! DELETE /api/v1/members/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{MAX_LIST_LIMIT, Member, MemberDraft, MemberId, MemberPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{ErrorBody, json_error_handler, query_error_handler};
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/members`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateMemberRequest {
    /// Display name, 2 to 100 characters.
    #[schema(example = "John Doe")]
    pub name: String,
    /// Email address; stored lower-cased.
    #[schema(example = "john@example.com")]
    pub email: String,
    /// Optional phone number with 8 to 15 digits.
    #[serde(default)]
    #[schema(example = "+1-234-567-8901")]
    pub phone: Option<String>,
}

impl From<CreateMemberRequest> for MemberDraft {
    fn from(value: CreateMemberRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
        }
    }
}

/// Request body for `PUT /api/v1/members/{id}`.
///
/// Omitted or `null` fields are left unchanged; an empty `phone` clears the
/// stored number.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateMemberRequest {
    /// Replacement name.
    #[serde(default)]
    pub name: Option<String>,
    /// Replacement email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Replacement phone; an empty string clears it.
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<UpdateMemberRequest> for MemberPatch {
    fn from(value: UpdateMemberRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
        }
    }
}

fn default_limit() -> u64 {
    MAX_LIST_LIMIT
}

/// Paging parameters for `GET /api/v1/members`.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMembersQuery {
    /// Number of members to skip.
    #[serde(default)]
    pub skip: u64,
    /// Page size; values above 100 are clamped.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// Register the member routes and their extractor error handlers.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use member_directory::inbound::http::members;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(members::configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(create_member)
        .service(list_members)
        .service(get_member)
        .service(update_member)
        .service(delete_member);
}

/// Create a member.
#[utoipa::path(
    post,
    path = "/api/v1/members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member created", body = Member),
        (status = 400, description = "Invalid field", body = ErrorBody),
        (status = 409, description = "Email or phone already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["members"],
    operation_id = "createMember"
)]
#[post("/members")]
pub async fn create_member(
    state: web::Data<HttpState>,
    payload: web::Json<CreateMemberRequest>,
) -> ApiResult<HttpResponse> {
    let member = state.members.create(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(member))
}

/// List members in ascending identifier order.
#[utoipa::path(
    get,
    path = "/api/v1/members",
    params(ListMembersQuery),
    responses(
        (status = 200, description = "Members", body = [Member]),
        (status = 400, description = "Invalid query", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["members"],
    operation_id = "listMembers"
)]
#[get("/members")]
pub async fn list_members(
    state: web::Data<HttpState>,
    query: web::Query<ListMembersQuery>,
) -> ApiResult<web::Json<Vec<Member>>> {
    let ListMembersQuery { skip, limit } = query.into_inner();
    Ok(web::Json(state.members.list(skip, limit).await?))
}

/// Fetch one member.
#[utoipa::path(
    get,
    path = "/api/v1/members/{id}",
    params(("id" = i64, Path, description = "Member identifier")),
    responses(
        (status = 200, description = "Member", body = Member),
        (status = 404, description = "No such member", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["members"],
    operation_id = "getMember"
)]
#[get("/members/{id}")]
pub async fn get_member(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<web::Json<Member>> {
    let member = state.members.get(MemberId::new(id.into_inner())).await?;
    Ok(web::Json(member))
}

/// Partially update a member.
#[utoipa::path(
    put,
    path = "/api/v1/members/{id}",
    params(("id" = i64, Path, description = "Member identifier")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Updated member", body = Member),
        (status = 400, description = "Invalid field", body = ErrorBody),
        (status = 404, description = "No such member", body = ErrorBody),
        (status = 409, description = "Email or phone already registered", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["members"],
    operation_id = "updateMember"
)]
#[put("/members/{id}")]
pub async fn update_member(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
    payload: web::Json<UpdateMemberRequest>,
) -> ApiResult<web::Json<Member>> {
    let member = state
        .members
        .update(MemberId::new(id.into_inner()), payload.into_inner().into())
        .await?;
    Ok(web::Json(member))
}

/// Delete a member.
#[utoipa::path(
    delete,
    path = "/api/v1/members/{id}",
    params(("id" = i64, Path, description = "Member identifier")),
    responses(
        (status = 204, description = "Member deleted"),
        (status = 404, description = "No such member", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["members"],
    operation_id = "deleteMember"
)]
#[delete("/members/{id}")]
pub async fn delete_member(
    state: web::Data<HttpState>,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.members.delete(MemberId::new(id.into_inner())).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "members_tests.rs"]
mod tests;
