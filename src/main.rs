use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use printsync::{
    AppState, config, render::PrintSheet, routes, services::woocommerce::WooCommerceClient,
    templates,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = config::load();

    if settings.admin_password.is_empty() {
        tracing::warn!("ADMIN_PASSWORD is not set; logins will be rejected");
    }

    let woo = WooCommerceClient::new(
        settings.wc_base_url.clone(),
        settings.wc_consumer_key.clone(),
        settings.wc_consumer_secret.clone(),
    );
    let printer = PrintSheet::new(templates::build_handlebars()?);

    let state = AppState::new(settings.clone(), Arc::new(woo), Arc::new(printer));
    let app = routes::app(state);

    let addr = SocketAddr::from((settings.host.parse::<std::net::IpAddr>()?, settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
