//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the member endpoints, the health checks and the
//! shared error schema. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::domain::{Member, MemberField};
use crate::inbound::http::error::{ErrorBody, ErrorCode};
use crate::inbound::http::health::ServiceInfo;
use crate::inbound::http::members::{CreateMemberRequest, UpdateMemberRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Member directory API",
        description = "Create, read, update and delete community members with unique email and phone."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::members::create_member,
        crate::inbound::http::members::list_members,
        crate::inbound::http::members::get_member,
        crate::inbound::http::members::update_member,
        crate::inbound::http::members::delete_member,
        crate::inbound::http::health::root,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Member,
        MemberField,
        CreateMemberRequest,
        UpdateMemberRequest,
        ErrorBody,
        ErrorCode,
        ServiceInfo
    )),
    tags(
        (name = "members", description = "Member directory operations"),
        (name = "health", description = "Service metadata and health checks")
    )
)]
pub struct ApiDoc;
