use std::net::SocketAddr;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use car_rental::config::database::DatabaseConfig;
use car_rental::config::environment::EnvironmentConfig;
use car_rental::controllers::auth_controller::AuthController;
use car_rental::database::DatabaseConnection;
use car_rental::utils::errors::expose_internal_details;
use car_rental::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🚗 Car Rental API ({})", config.environment);
    info!("================================================");

    expose_internal_details(config.is_development());

    let state = match DatabaseConfig::from_env()? {
        Some(db_config) => {
            let db_connection = match DatabaseConnection::connect(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            db_connection.ensure_schema().await?;
            AppState::postgres(db_connection.pool().clone(), config.clone())
        }
        None => {
            warn!("⚠️ DATABASE_URL no definido, usando almacenamiento en memoria");
            AppState::in_memory(config.clone())
        }
    };

    if let Some(admin) = &config.admin {
        if let Err(e) = AuthController::new(&state).bootstrap_admin(admin).await {
            error!("❌ No se pudo crear el admin inicial: {}", e);
        }
    }

    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("🔐 POST /api/auth/signup | POST /api/auth/signin | GET /api/users/me");
    info!("🚗 GET  /api/cars | GET /api/cars/:id | GET /api/cars/:id/availability");
    info!("   POST /api/cars | PUT /api/cars/:id | DELETE /api/cars/:id (admin)");
    info!("📅 POST /api/bookings | GET /api/bookings | GET/PUT /api/bookings/:id");
    info!("   GET  /api/bookings/admin/all (admin)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| {
        error!("❌ Error del servidor: {}", e);
        e
    })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
