//! `GET /api/branding`

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::server::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingResponse {
    pub logo_url: String,
    pub site_title: String,
    pub display_title: String,
    pub print_header: String,
}

/// Settings lookups degrade to defaults, so this never fails
pub async fn get_branding(State(state): State<AppState>) -> Json<BrandingResponse> {
    let branding = &state.branding;
    Json(BrandingResponse {
        logo_url: branding.logo_url().await,
        site_title: branding.site_title().await,
        display_title: branding.display_title().await,
        print_header: branding.logo_print_html().await,
    })
}
