use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::{Extension, State},
    response::Html,
};
use tracing::instrument;

use crate::{AppState, auth::RequestContext};

#[instrument(
    name = "graphql.execute",
    skip(state, ctx, request),
    fields(user_id = ?ctx.user_id())
)]
pub(super) async fn graphql_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let request = request.into_inner().data(ctx);
    state.schema().execute(request).await.into()
}

pub(super) async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
