//! 清单批量组装
//!
//! 对自选清单全量发起一次合并行情抓取（经由快取），逐档计算
//! 均线与评级并组装表格行；取不到行情的条目在本轮结束后自动
//! 从清单移除（自愈），移除数作为非致命提示返回

use std::time::Duration;

use crate::models::{DisplayRow, WatchlistEntry};
use crate::services::cache::HistoryCache;
use crate::services::quote::{HistoryOutcome, Lookback, QuoteSource, YahooClient};
use crate::services::watchlist::WatchlistStore;
use crate::services::{rating, sector, series};

/// 走势迷你图最多保留的收盘点数
const TREND_SLICE_LEN: usize = 30;

/// 组装一轮自选清单表格
///
/// 返回（已排序的表格行, 本轮移除的条目数）。
/// 排序规则：最近加入的标的置顶一轮（无视分数），其余按分数降序
pub async fn assemble_watchlist(
    store: &mut WatchlistStore,
    source: &dyn QuoteSource,
    cache: &mut HistoryCache,
    lookback: Lookback,
    cache_ttl: Duration,
) -> (Vec<DisplayRow>, usize) {
    if store.is_empty() {
        return (Vec::new(), 0);
    }

    let symbols: Vec<String> = store.entries().iter().map(|e| e.id.symbol()).collect();

    // 快取命中则复用上一轮结果，否则发起合并抓取并写回
    let outcomes = match cache.lookup(&symbols, lookback, cache_ttl) {
        Some(hit) => hit,
        None => {
            let fetched = source.history(&symbols, lookback).await;
            cache.put(&symbols, lookback, fetched.clone());
            fetched
        }
    };

    let pinned = store.take_last_added();

    let mut scored: Vec<(u8, u8, DisplayRow)> = Vec::new();
    let mut stale: Vec<String> = Vec::new();

    for entry in store.entries() {
        let symbol = entry.id.symbol();
        match outcomes.get(&symbol) {
            Some(HistoryOutcome::Data(closes)) if !closes.is_empty() => {
                let (score, priority, row) = build_row(entry, closes);
                scored.push((score, priority, row));
            }
            _ => {
                // Empty、Failed、整批结果缺项一律视为取不到行情
                stale.push(symbol);
            }
        }
    }

    // 自愈：清掉取不到行情的条目
    let pruned = stale.len();
    for symbol in &stale {
        store.remove(symbol);
        log::info!("自動移除無行情標的 {}", symbol);
    }

    // 分数降序，同分按优先级，再保持加入顺序（稳定排序）
    scored.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));

    let mut rows: Vec<DisplayRow> = scored.into_iter().map(|(_, _, row)| row).collect();

    // 最近加入者置顶一轮，无视分数
    if let Some(pin) = pinned {
        let pin_symbol = pin.symbol();
        if let Some(pos) = rows.iter().position(|r| r.code == pin_symbol) {
            let row = rows.remove(pos);
            rows.insert(0, row);
        }
    }

    (rows, pruned)
}

/// 由收盘序列组装单行数据
fn build_row(entry: &WatchlistEntry, closes: &[f64]) -> (u8, u8, DisplayRow) {
    let current_price = closes.last().copied();
    let ma20 = series::moving_average(closes, 20);
    let ma60 = series::moving_average(closes, 60);
    let sector_tag = sector::sector_of(&entry.id.code);

    let classification = rating::classify(current_price, ma20, ma60, sector_tag);

    let trend_start = closes.len().saturating_sub(TREND_SLICE_LEN);
    let row = DisplayRow {
        code: entry.id.symbol(),
        name: entry.name.clone(),
        reference_url: YahooClient::reference_url(&entry.id.symbol()),
        price: current_price.unwrap_or(0.0),
        change_pct: series::change_pct(closes),
        ma20_display: ma20
            .map(|ma| format!("{:.2}", ma))
            .unwrap_or_else(|| "資料不足".to_string()),
        rating_label: classification.label.display().to_string(),
        rating_style_class: classification.label.style_class().to_string(),
        rationale_html: classification.rationale.clone(),
        trend_slice: closes[trend_start..].to_vec(),
    };

    (classification.score, classification.priority, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InstrumentId, WatchlistEntry};
    use crate::services::quote::testing::MockQuoteSource;

    const TTL: Duration = Duration::from_secs(60);

    fn store_with(codes: &[(&str, &str)]) -> WatchlistStore {
        let mut store = WatchlistStore::new();
        for (code, name) in codes {
            store.add(WatchlistEntry::new(InstrumentId::twse(*code), *name));
        }
        store
    }

    /// 涨势序列：最后 20 笔均值低于现价，评级偏多
    fn rising_series(len: usize) -> HistoryOutcome {
        HistoryOutcome::Data((0..len).map(|i| 100.0 + i as f64).collect())
    }

    fn flat_series(len: usize) -> HistoryOutcome {
        HistoryOutcome::Data(vec![100.0; len])
    }

    #[tokio::test]
    async fn test_assemble_builds_rows_sorted_by_score() {
        let mut store = store_with(&[("1101", "台泥"), ("2330", "台積電")]);
        store.take_last_added(); // 本测试不验证置顶

        let source = MockQuoteSource::default()
            .with_history("1101.TW", flat_series(80)) // 觀察 50 分
            .with_history("2330.TW", rising_series(80)); // 強力買進 90 分

        let mut cache = HistoryCache::new();
        let (rows, pruned) =
            assemble_watchlist(&mut store, &source, &mut cache, Lookback::SixMonths, TTL).await;

        assert_eq!(pruned, 0);
        assert_eq!(rows.len(), 2);
        // 分数高者在前
        assert_eq!(rows[0].code, "2330.TW");
        assert_eq!(rows[1].code, "1101.TW");
    }

    /// 取不到行情的条目自动移除，且第二轮不再报错（幂等）
    #[tokio::test]
    async fn test_self_pruning_idempotent() {
        let mut store = store_with(&[("2330", "台積電"), ("9998", "已下市")]);
        let source = MockQuoteSource::default().with_history("2330.TW", rising_series(80));
        // 9998.TW 未预置 → Empty

        let mut cache = HistoryCache::new();
        let (rows, pruned) =
            assemble_watchlist(&mut store, &source, &mut cache, Lookback::SixMonths, TTL).await;
        assert_eq!(pruned, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(store.len(), 1);

        // 第二轮：条目已不在，正常返回且无移除
        let mut cache = HistoryCache::new();
        let (rows, pruned) =
            assemble_watchlist(&mut store, &source, &mut cache, Lookback::SixMonths, TTL).await;
        assert_eq!(pruned, 0);
        assert_eq!(rows.len(), 1);
    }

    /// 传输失败的条目与确认无数据同样走移除
    #[tokio::test]
    async fn test_failed_fetch_is_pruned() {
        let mut store = store_with(&[("2330", "台積電"), ("2317", "鴻海")]);
        let source = MockQuoteSource::default()
            .with_history("2330.TW", rising_series(80))
            .with_history("2317.TW", HistoryOutcome::Failed("連線逾時".to_string()));

        let mut cache = HistoryCache::new();
        let (rows, pruned) =
            assemble_watchlist(&mut store, &source, &mut cache, Lookback::SixMonths, TTL).await;

        assert_eq!(pruned, 1);
        assert_eq!(rows.len(), 1);
        assert!(!store.contains(&InstrumentId::twse("2317")));
    }

    /// 最近加入者置顶一轮，之后恢复纯分数排序
    #[tokio::test]
    async fn test_pin_to_top_for_one_round() {
        let mut store = store_with(&[("2330", "台積電")]);
        store.take_last_added();
        // 最后加入低分标的
        store.add(WatchlistEntry::new(InstrumentId::twse("1101"), "台泥"));

        let source = MockQuoteSource::default()
            .with_history("2330.TW", rising_series(80))
            .with_history("1101.TW", flat_series(80));

        let mut cache = HistoryCache::new();
        let (rows, _) =
            assemble_watchlist(&mut store, &source, &mut cache, Lookback::SixMonths, TTL).await;
        // 低分的新标的被置顶
        assert_eq!(rows[0].code, "1101.TW");

        // 下一轮置顶已消耗，回到分数降序
        let (rows, _) =
            assemble_watchlist(&mut store, &source, &mut cache, Lookback::SixMonths, TTL).await;
        assert_eq!(rows[0].code, "2330.TW");
    }

    /// 走势切片最多 30 点，取最近一段
    #[tokio::test]
    async fn test_trend_slice_bounded() {
        let mut store = store_with(&[("2330", "台積電")]);
        let source = MockQuoteSource::default().with_history("2330.TW", rising_series(80));

        let mut cache = HistoryCache::new();
        let (rows, _) =
            assemble_watchlist(&mut store, &source, &mut cache, Lookback::SixMonths, TTL).await;

        let slice = &rows[0].trend_slice;
        assert_eq!(slice.len(), 30);
        // 是序列的尾段
        assert_eq!(*slice.last().unwrap(), 179.0);
    }

    /// 年轻序列（不足 20 笔）给出短多/观察，而非乖离分支
    #[tokio::test]
    async fn test_young_series_row() {
        let mut store = store_with(&[("6806", "森崴能源")]);
        let source = MockQuoteSource::default()
            .with_history("6806.TW", HistoryOutcome::Data(vec![100.0, 102.0, 101.0, 99.0, 103.0]));

        let mut cache = HistoryCache::new();
        let (rows, pruned) =
            assemble_watchlist(&mut store, &source, &mut cache, Lookback::SixMonths, TTL).await;

        assert_eq!(pruned, 0);
        assert_eq!(rows[0].ma20_display, "資料不足");
        assert!(rows[0].rationale_html.contains("均線資料不足"));
    }

    /// 空清单直接返回，不发起抓取
    #[tokio::test]
    async fn test_empty_store() {
        let mut store = WatchlistStore::new();
        let source = MockQuoteSource::default();
        let mut cache = HistoryCache::new();

        let (rows, pruned) =
            assemble_watchlist(&mut store, &source, &mut cache, Lookback::SixMonths, TTL).await;
        assert!(rows.is_empty());
        assert_eq!(pruned, 0);
    }
}
