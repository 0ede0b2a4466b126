//! 台股自选清单后端服务
//!
//! 提供自选清单、评级与代码解析的 RESTful API，
//! 前端表格（排序、悬浮理由、走势迷你图）消费本服务的行数据
//! 行情来源：Yahoo Finance

mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use tokio::sync::Mutex;

use crate::config::{AppConfig, QuoteConfig};
use crate::services::cache::HistoryCache;
use crate::services::quote::{QuoteSource, YahooClient};
use crate::services::resolver::TickerResolver;
use crate::services::watchlist::WatchlistStore;

/// 应用共享状态
///
/// 自选清单与行情快取按进程持有一份；如需多会话隔离，
/// 每个会话各建一份 AppState 即可，组件本身不依赖全局状态
pub struct AppState {
    /// 自选清单
    pub store: Mutex<WatchlistStore>,
    /// 历史行情快取
    pub cache: Mutex<HistoryCache>,
    /// 行情数据源
    pub source: Arc<dyn QuoteSource>,
    /// 代码解析器
    pub resolver: TickerResolver,
    /// 行情抓取配置
    pub quote: QuoteConfig,
}

/// 应用程序入口
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load();

    // 初始化日志系统，级别取自配置（可被 RUST_LOG 覆盖）
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    log::info!("启动台股自选清单后端服务，监听 {}", config.bind_addr());

    let state = web::Data::new(AppState {
        store: Mutex::new(WatchlistStore::with_defaults()),
        cache: Mutex::new(HistoryCache::new()),
        source: Arc::new(YahooClient::new(&config.quote)),
        resolver: TickerResolver::with_default_dict(),
        quote: config.quote.clone(),
    });

    let bind_addr = config.bind_addr();
    let workers = config.server.workers;

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(state.clone())
            .configure(handlers::config)  // 配置路由
    });

    if workers > 0 {
        server = server.workers(workers);
    }

    server.bind(bind_addr)?.run().await
}
