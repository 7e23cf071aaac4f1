use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ListResourceTemplatesResult, ListResourcesResult,
        PaginatedRequestParams, ProtocolVersion, RawResource, RawResourceTemplate,
        ReadResourceRequestParams, ReadResourceResult, Resource, ResourceContents,
        ResourceTemplate, ServerCapabilities, ServerInfo,
    },
    schemars,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde::Serialize;

use crate::domain::catalog::{NewReservation, ReservationId, UnitId, UnitSummary};
use crate::domain::unit_query::{UnitQuery, parse_date};
use crate::error::BookingError;
use crate::service::BookingService;

// ---------- Tool parameter types ----------

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ListUnitsToolParams {
    /// Highest acceptable price (decimal, e.g. "100" or "99.50"). Units priced above it are left out.
    pub max_price: Option<String>,
    /// Check-in date (YYYY-MM-DD format). Must be paired with `check_out`.
    pub check_in: Option<String>,
    /// Check-out date (YYYY-MM-DD format). Must be paired with `check_in`.
    pub check_out: Option<String>,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UnitToolParams {
    /// Unit ID from `units_list`
    pub id: UnitId,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct UnitAvailabilityToolParams {
    /// Unit ID from `units_list`
    pub id: UnitId,
    /// Check-in date (YYYY-MM-DD format)
    pub check_in: String,
    /// Check-out date (YYYY-MM-DD format)
    pub check_out: String,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ReservationToolParams {
    /// Reservation ID
    pub id: ReservationId,
}

#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateReservationToolParams {
    /// Unit ID to reserve
    pub booking_info_id: UnitId,
    /// First day of the stay (YYYY-MM-DD format)
    pub start_date: String,
    /// Last day of the stay (YYYY-MM-DD format). May equal `start_date`.
    pub end_date: String,
}

// ---------- Response helpers ----------

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("failed to serialize response: {e}"), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Validation failures become tool errors carrying their reason code; anything else
/// (a failing store) is surfaced as an internal protocol error.
fn failure(e: &BookingError) -> Result<CallToolResult, McpError> {
    if e.is_client_error() {
        Ok(CallToolResult::error(vec![Content::text(format!(
            "{}: {e}",
            e.code()
        ))]))
    } else {
        tracing::warn!(error = %e, "request failed");
        Err(McpError::internal_error(e.to_string(), None))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceRef {
    Unit(UnitId),
    Reservation(ReservationId),
}

fn parse_resource_uri(uri: &str) -> Option<ResourceRef> {
    let (collection, id) = uri.strip_prefix("booking://")?.split_once('/')?;
    let id = id.parse().ok()?;
    match collection {
        "units" => Some(ResourceRef::Unit(id)),
        "reservations" => Some(ResourceRef::Reservation(id)),
        _ => None,
    }
}

// ---------- MCP Server ----------

#[derive(Clone)]
pub struct BookingMcpServer {
    service: BookingService,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl BookingMcpServer {
    pub fn new(service: BookingService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    /// List bookable units, cheapest first, optionally filtered by price and free dates.
    #[tool(
        name = "units_list",
        description = "List bookable units (apartments and hotel room types) sorted by price ascending. Filter with max_price, and with check_in + check_out (both required together) to keep only units with at least one free room for the whole stay.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn units_list(
        &self,
        Parameters(params): Parameters<ListUnitsToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let query = match UnitQuery::parse(
            params.max_price.as_deref(),
            params.check_in.as_deref(),
            params.check_out.as_deref(),
        ) {
            Ok(query) => query,
            Err(e) => return failure(&e),
        };
        match self.service.list_units(&query).await {
            Ok(units) => {
                let summaries: Vec<UnitSummary> = units.iter().map(|u| u.summary()).collect();
                json_result(&summaries)
            }
            Err(e) => failure(&e),
        }
    }

    /// Get a single unit by ID.
    #[tool(
        name = "units_get",
        description = "Get a single bookable unit by ID: price, title, kind (apartment or hotel), country and city.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn units_get(
        &self,
        Parameters(params): Parameters<UnitToolParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.service.get_unit(params.id).await {
            Ok(unit) => json_result(&unit.summary()),
            Err(e) => failure(&e),
        }
    }

    /// Show room counts for one unit over a stay.
    #[tool(
        name = "units_availability",
        description = "Show how many rooms of a unit are free for a stay: total rooms, overlapping reservations and free rooms.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn units_availability(
        &self,
        Parameters(params): Parameters<UnitAvailabilityToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let dates = parse_date("check_in", &params.check_in)
            .and_then(|check_in| Ok((check_in, parse_date("check_out", &params.check_out)?)));
        let (check_in, check_out) = match dates {
            Ok(dates) => dates,
            Err(e) => return failure(&e),
        };
        match self
            .service
            .unit_availability(params.id, check_in, check_out)
            .await
        {
            Ok(availability) => json_result(&availability),
            Err(e) => failure(&e),
        }
    }

    /// List all reservations.
    #[tool(
        name = "reservations_list",
        description = "List all reservations ordered by end date, then start date.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn reservations_list(&self) -> Result<CallToolResult, McpError> {
        match self.service.list_reservations().await {
            Ok(reservations) => json_result(&reservations),
            Err(e) => failure(&e),
        }
    }

    /// Get a single reservation by ID.
    #[tool(
        name = "reservations_get",
        description = "Get a single reservation by ID.",
        annotations(read_only_hint = true, open_world_hint = false)
    )]
    async fn reservations_get(
        &self,
        Parameters(params): Parameters<ReservationToolParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.service.get_reservation(params.id).await {
            Ok(reservation) => json_result(&reservation),
            Err(e) => failure(&e),
        }
    }

    /// Reserve one room of a unit for a stay.
    #[tool(
        name = "reservations_create",
        description = "Reserve one room of a unit from start_date to end_date (inclusive). Rejected with InvalidDateRange when start_date is after end_date, and with InsufficientCapacity when no room of the unit is free for the stay.",
        annotations(read_only_hint = false, open_world_hint = false)
    )]
    async fn reservations_create(
        &self,
        Parameters(params): Parameters<CreateReservationToolParams>,
    ) -> Result<CallToolResult, McpError> {
        let request = parse_date("start_date", &params.start_date).and_then(|start_date| {
            Ok(NewReservation {
                booking_info_id: params.booking_info_id,
                start_date,
                end_date: parse_date("end_date", &params.end_date)?,
            })
        });
        let request = match request {
            Ok(request) => request,
            Err(e) => return failure(&e),
        };
        match self.service.create_reservation(request).await {
            Ok(created) => json_result(&created),
            Err(e) => failure(&e),
        }
    }

    async fn resource_entries(&self) -> Result<Vec<(String, String)>, BookingError> {
        let units = self.service.list_units(&UnitQuery::default()).await?;
        let reservations = self.service.list_reservations().await?;
        let mut entries: Vec<(String, String)> = units
            .iter()
            .map(|unit| {
                (
                    format!("booking://units/{}", unit.id()),
                    format!("Unit: {unit}"),
                )
            })
            .collect();
        entries.extend(reservations.iter().map(|r| {
            (
                format!("booking://reservations/{}", r.id),
                format!(
                    "Reservation {}: unit {} {} to {}",
                    r.id, r.booking_info_id, r.start_date, r.end_date
                ),
            )
        }));
        Ok(entries)
    }

    async fn read_resource_text(&self, uri: &str) -> Result<String, McpError> {
        let not_found = || McpError::resource_not_found(format!("resource not found: {uri}"), None);
        let text = match parse_resource_uri(uri).ok_or_else(not_found)? {
            ResourceRef::Unit(id) => self
                .service
                .get_unit(id)
                .await
                .map(|unit| serde_json::to_string_pretty(&unit.summary())),
            ResourceRef::Reservation(id) => self
                .service
                .get_reservation(id)
                .await
                .map(|reservation| serde_json::to_string_pretty(&reservation)),
        };
        match text {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(McpError::internal_error(e.to_string(), None)),
            Err(BookingError::NotFound { .. }) => Err(not_found()),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }
}

#[tool_handler]
impl ServerHandler for BookingMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Booking engine for apartments and hotel rooms.\n\
                 \n\
                 ## Units\n\
                 A unit is a priced, bookable apartment or hotel room type.\n\
                 - units_list: all units cheapest first; filter by max_price and by a stay \
                 (check_in + check_out, both required, YYYY-MM-DD)\n\
                 - units_get: one unit by ID\n\
                 - units_availability: total, reserved and free rooms of one unit for a stay\n\
                 \n\
                 ## Reservations\n\
                 - reservations_list: every reservation\n\
                 - reservations_get: one reservation by ID\n\
                 - reservations_create: reserve one room of a unit; fails with InvalidDateRange \
                 or InsufficientCapacity\n\
                 \n\
                 ## Resources\n\
                 Units and reservations are readable as booking://units/{id} and \
                 booking://reservations/{id}."
                    .into(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let entries = self
            .resource_entries()
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let resources: Vec<Resource> = entries
            .into_iter()
            .map(|(uri, name)| Resource {
                annotations: None,
                raw: RawResource {
                    uri,
                    name,
                    title: None,
                    description: None,
                    mime_type: Some("application/json".into()),
                    size: None,
                    icons: None,
                    meta: None,
                },
            })
            .collect();
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        let templates = vec![
            ResourceTemplate {
                annotations: None,
                raw: RawResourceTemplate {
                    uri_template: "booking://units/{id}".into(),
                    name: "Unit".into(),
                    title: Some("Bookable unit".into()),
                    description: Some(
                        "Price, title, kind and location of a unit (same as units_get)".into(),
                    ),
                    mime_type: Some("application/json".into()),
                    icons: None,
                },
            },
            ResourceTemplate {
                annotations: None,
                raw: RawResourceTemplate {
                    uri_template: "booking://reservations/{id}".into(),
                    name: "Reservation".into(),
                    title: Some("Reservation".into()),
                    description: Some(
                        "Unit and dates of a reservation (same as reservations_get)".into(),
                    ),
                    mime_type: Some("application/json".into()),
                    icons: None,
                },
            },
        ];
        Ok(ListResourceTemplatesResult {
            resource_templates: templates,
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let text = self.read_resource_text(&request.uri).await?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(text, request.uri)],
        })
    }
}
