//! Camellia - Govee 温湿度传感器桥接服务

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use camellia::{
    config::Settings,
    errors::AppError,
    routes,
    services::{GoveeClient, SnapshotService},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 初始化日志
    init_tracing();

    info!("🌺 Camellia 服务启动中...");

    // 加载配置
    let settings = Settings::load().context("配置加载失败")?;
    info!("✅ 配置加载完成");

    // 构建 Govee 客户端（密钥来自环境变量）
    let client = GoveeClient::from_settings(&settings).context("Govee 客户端初始化失败")?;

    let scan_interval = settings.effective_scan_interval();
    if scan_interval != settings.govee.scan_interval_seconds {
        warn!(
            configured = settings.govee.scan_interval_seconds,
            effective = scan_interval,
            "轮询间隔低于下限，已抬升"
        );
    }

    let snapshot_service = Arc::new(SnapshotService::new(client, scan_interval));

    // 启动校验：认证失败与空账户是硬性配置错误，连接失败允许降级启动
    match snapshot_service.validate().await {
        Ok(count) => info!(count, "✅ 账户校验完成"),
        Err(err @ AppError::AuthenticationFailed(_)) | Err(err @ AppError::ConfigError(_)) => {
            error!(error = %err, "账户校验失败");
            anyhow::bail!("账户校验失败: {}", err);
        }
        Err(err) => {
            warn!(error = %err, "首次拉取失败，稍后由轮询重试");
        }
    }

    // 启动后台轮询
    let _poller = snapshot_service.clone().spawn_polling();
    info!(interval_seconds = scan_interval, "✅ 后台轮询已启动");

    let server_addr = settings.server_addr();
    let workers = if settings.server.workers == 0 {
        num_cpus::get()
    } else {
        settings.server.workers
    };

    info!("🚀 服务启动在 http://{}", server_addr);
    info!("📊 工作线程数: {}", workers);

    // 启动 HTTP 服务器
    HttpServer::new(move || {
        // 配置 CORS
        let cors = Cors::default()
            .allowed_origin_fn(|origin, _req_head| {
                // 开发环境允许所有来源，生产环境应配置白名单
                origin.as_bytes().starts_with(b"http://localhost")
                    || origin.as_bytes().starts_with(b"https://")
            })
            .allowed_methods(vec!["GET"])
            .allowed_headers(vec!["Content-Type"])
            .max_age(3600);

        App::new()
            // 全局中间件
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            // 注入服务
            .app_data(web::Data::new(snapshot_service.clone()))
            // 配置 HTTP 路由
            .configure(routes::configure)
    })
    .workers(workers)
    .bind(&server_addr)?
    .run()
    .await?;

    Ok(())
}

/// 初始化日志系统
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,camellia=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
