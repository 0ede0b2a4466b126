use std::time::Duration;

use actix_web::{web, HttpResponse, Result};

use crate::models::{
    AddRequest, ApiResponse, DisplayRow, WatchlistEntry, WatchlistQuery, WatchlistView,
};
use crate::services::assemble;
use crate::services::rating::RatingLabel;
use crate::services::resolver::ResolveError;
use crate::services::watchlist::AddOutcome;
use crate::AppState;

/// 查询自选清单（组装表格行）
///
/// strong_only=true 时只返回强力买进的标的
pub async fn list_watchlist(
    state: web::Data<AppState>,
    query: web::Query<WatchlistQuery>,
) -> Result<HttpResponse> {
    let mut store = state.store.lock().await;
    let mut cache = state.cache.lock().await;

    let (rows, pruned) = assemble::assemble_watchlist(
        &mut store,
        state.source.as_ref(),
        &mut cache,
        state.quote.lookback(),
        Duration::from_secs(state.quote.cache_ttl_secs),
    )
    .await;
    let total = store.len();

    let strong_only = query.strong_only.unwrap_or(false);
    let rows: Vec<DisplayRow> = if strong_only {
        rows.into_iter()
            .filter(|r| r.rating_style_class == RatingLabel::StrongBuy.style_class())
            .collect()
    } else {
        rows
    };

    let mut notice = if strong_only {
        format!("篩選完成！共找到 {} 檔強勢股", rows.len())
    } else {
        format!("目前顯示全部 {} 檔股票", rows.len())
    };
    if pruned > 0 {
        notice.push_str(&format!("；已自動移除 {} 檔無法取得行情的標的", pruned));
    }

    let view = WatchlistView {
        rows,
        pruned,
        total,
        notice,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

/// 加入自选：解析用户输入后写入清单
///
/// 解析成功但已存在时回报已存在（非错误）；解析失败按原因给出
/// 对应的 HTTP 状态码与提示文字
pub async fn add_to_watchlist(
    state: web::Data<AppState>,
    body: web::Json<AddRequest>,
) -> Result<HttpResponse> {
    match state.resolver.resolve(&body.query, state.source.as_ref()).await {
        Ok((id, name)) => {
            let symbol = id.symbol();
            let mut store = state.store.lock().await;
            let response = match store.add(WatchlistEntry::new(id, name.clone())) {
                AddOutcome::Added => ApiResponse::success_with_message(
                    symbol.clone(),
                    format!("已加入自選：{}（{}）", name, symbol),
                ),
                AddOutcome::AlreadyPresent => ApiResponse::success_with_message(
                    symbol.clone(),
                    format!("{}（{}）已在自選清單中", name, symbol),
                ),
            };
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            let response = ApiResponse::<String>::error(e.to_string());
            let http = match e {
                ResolveError::Malformed | ResolveError::TooShort => {
                    HttpResponse::BadRequest().json(response)
                }
                ResolveError::NotFound | ResolveError::NoMatch => {
                    HttpResponse::NotFound().json(response)
                }
            };
            Ok(http)
        }
    }
}

/// 按完整代码移除自选条目
pub async fn remove_from_watchlist(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let symbol = path.into_inner();
    let mut store = state.store.lock().await;

    if store.remove(&symbol) {
        Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            symbol.clone(),
            format!("已從自選清單移除 {}", symbol),
        )))
    } else {
        Ok(HttpResponse::NotFound()
            .json(ApiResponse::<String>::error(format!("自選清單中沒有 {}", symbol))))
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/watchlist")
            .route("", web::get().to(list_watchlist))
            .route("", web::post().to(add_to_watchlist))
            .route("/{symbol}", web::delete().to(remove_from_watchlist)),
    );
}
